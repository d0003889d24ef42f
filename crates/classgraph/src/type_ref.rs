//! Interpretation of raw type-annotation strings.
//!
//! Type strings are kept verbatim by the extractors. This module turns them
//! into the name of the entity they reference, if any: nullable unions are
//! reduced to their single non-null member, array and container wrappers are
//! peeled off, and built-in names are rejected.

/// Standard-library and primitive type names that never produce a relationship.
pub const BUILTIN_TYPES: &[&str] = &[
    "any",
    "unknown",
    "never",
    "void",
    "null",
    "undefined",
    "string",
    "number",
    "boolean",
    "bigint",
    "symbol",
    "object",
    "this",
    "Object",
    "String",
    "Number",
    "Boolean",
    "BigInt",
    "Symbol",
    "Function",
    "Date",
    "RegExp",
    "Error",
    "TypeError",
    "RangeError",
    "Promise",
    "PromiseLike",
    "Array",
    "ReadonlyArray",
    "Map",
    "ReadonlyMap",
    "Set",
    "ReadonlySet",
    "WeakMap",
    "WeakSet",
    "Record",
    "Partial",
    "Required",
    "Readonly",
    "Pick",
    "Omit",
    "Exclude",
    "Extract",
    "NonNullable",
    "ReturnType",
    "Iterable",
    "Iterator",
    "AsyncIterable",
    "Generator",
    "ArrayBuffer",
    "Uint8Array",
    "JSON",
    "Math",
];

/// Generic wrappers that mark a property as holding a collection of its argument
pub const COLLECTION_WRAPPERS: &[&str] = &[
    "Array",
    "ReadonlyArray",
    "Set",
    "ReadonlySet",
    "List",
    "Collection",
    "Iterable",
];

/// The entity a property type points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Bare type name (last segment of a qualified name)
    pub name: String,
    /// The reference was wrapped in `[]` or a collection generic
    pub is_collection: bool,
}

/// Whether `name` is a primitive or standard-library type
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// Interpret a property type.
///
/// Trailing `[]` and the generics in [`COLLECTION_WRAPPERS`] are stripped and
/// flag the reference as a collection. Any other generic is reduced to its base
/// name, so `Repository<User>` references `Repository`.
pub fn property_target(raw: &str) -> Option<TypeRef> {
    let mut ty = normalize(raw)?;
    let mut is_collection = false;

    loop {
        if let Some(inner) = ty.strip_suffix("[]") {
            ty = normalize(inner)?;
            is_collection = true;
            continue;
        }
        if let Some((base, args)) = split_generic(ty) {
            if args.len() == 1 && COLLECTION_WRAPPERS.contains(&last_segment(base)) {
                ty = normalize(args[0])?;
                is_collection = true;
                continue;
            }
            ty = base;
        }
        break;
    }

    named_target(ty).map(|name| TypeRef {
        name,
        is_collection,
    })
}

/// Interpret a method return or parameter type.
///
/// Unwraps `[]` and then the argument of any single-argument generic, repeatedly,
/// so `Promise<Array<Employee>>` references `Employee`. A generic with several
/// arguments stops unwrapping at its base name.
pub fn signature_target(raw: &str) -> Option<String> {
    let mut ty = normalize(raw)?;

    loop {
        if let Some(inner) = ty.strip_suffix("[]") {
            ty = normalize(inner)?;
            continue;
        }
        match split_generic(ty) {
            Some((_, args)) if args.len() == 1 => {
                ty = normalize(args[0])?;
                continue;
            }
            Some((base, _)) => ty = base,
            None => {}
        }
        break;
    }

    named_target(ty)
}

/// Reduce nullable unions, `readonly` and redundant parentheses
fn normalize(raw: &str) -> Option<&str> {
    let mut ty = raw.trim();
    loop {
        let before = ty;
        ty = strip_nullable(ty)?;
        ty = ty.strip_prefix("readonly ").unwrap_or(ty).trim();
        ty = strip_parens(ty);
        if ty == before {
            return Some(ty);
        }
    }
}

/// `A | null | undefined` → `A`; `None` for unions with several real members
fn strip_nullable(ty: &str) -> Option<&str> {
    let members = split_top_level(ty, '|');
    if members.len() == 1 {
        return Some(ty);
    }

    let mut real = members
        .into_iter()
        .filter(|m| !m.is_empty() && *m != "null" && *m != "undefined");
    match (real.next(), real.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

fn strip_parens(ty: &str) -> &str {
    if !(ty.starts_with('(') && ty.ends_with(')')) {
        return ty;
    }
    // Only when the opening paren closes at the very end
    let mut depth = 0usize;
    for (i, c) in ty.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != ty.len() - 1 {
                    return ty;
                }
            }
            _ => {}
        }
    }
    ty[1..ty.len() - 1].trim()
}

/// Split `Base<A, B<C>>` into `("Base", ["A", "B<C>"])`
fn split_generic(ty: &str) -> Option<(&str, Vec<&str>)> {
    if !ty.ends_with('>') {
        return None;
    }
    let open = ty.find('<')?;
    let base = ty[..open].trim();
    if base.is_empty() {
        return None;
    }
    let inner = &ty[open + 1..ty.len() - 1];
    Some((base, split_top_level(inner, ',')))
}

/// Split on `sep` outside of any bracket pair, trimming each part
fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            // `=>` is not a closing bracket
            '>' if i > 0 && s[..i].ends_with('=') => {}
            '>' | ')' | ']' | '}' => depth -= 1,
            _ if c == sep && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// A bare, non-builtin identifier (qualified names keep their last segment)
fn named_target(ty: &str) -> Option<String> {
    let name = last_segment(ty.trim());
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return None;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return None;
    }
    if is_builtin(name) {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(raw: &str) -> Option<(String, bool)> {
        property_target(raw).map(|t| (t.name, t.is_collection))
    }

    #[test]
    fn test_property_plain_and_array() {
        assert_eq!(prop("Employee"), Some(("Employee".into(), false)));
        assert_eq!(prop("Employee[]"), Some(("Employee".into(), true)));
        assert_eq!(prop("Employee[][]"), Some(("Employee".into(), true)));
        assert_eq!(prop("Array<Employee>"), Some(("Employee".into(), true)));
        assert_eq!(prop("ReadonlyArray<Employee>"), Some(("Employee".into(), true)));
        assert_eq!(prop("Set<Employee>"), Some(("Employee".into(), true)));
        assert_eq!(prop("readonly Employee[]"), Some(("Employee".into(), true)));
    }

    #[test]
    fn test_property_builtins_rejected() {
        for raw in ["string", "number[]", "Date", "Promise<void>", "Map<string, number>", "Error"] {
            assert_eq!(prop(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_property_nullable_unions() {
        assert_eq!(prop("Employee | null"), Some(("Employee".into(), false)));
        assert_eq!(prop("undefined | Employee"), Some(("Employee".into(), false)));
        assert_eq!(prop("(Employee | null)[]"), Some(("Employee".into(), true)));
        assert_eq!(prop("Employee | Manager"), None);
    }

    #[test]
    fn test_property_other_generics_use_base() {
        assert_eq!(prop("Repository<User>"), Some(("Repository".into(), false)));
        assert_eq!(prop("Map<string, Employee>"), None);
        assert_eq!(prop("models.Employee"), Some(("Employee".into(), false)));
    }

    #[test]
    fn test_signature_unwraps_recursively() {
        assert_eq!(signature_target("Promise<Array<Employee>>"), Some("Employee".into()));
        assert_eq!(signature_target("Promise<Employee[]>"), Some("Employee".into()));
        assert_eq!(signature_target("Future<List<Task>>"), Some("Task".into()));
        assert_eq!(signature_target("Employee | undefined"), Some("Employee".into()));
        assert_eq!(signature_target("Promise<void>"), None);
        assert_eq!(signature_target("Map<string, Employee>"), None);
        assert_eq!(signature_target("(e: Employee) => void"), None);
        assert_eq!(signature_target(""), None);
    }

    #[test]
    fn test_split_top_level_ignores_arrows() {
        assert_eq!(
            split_top_level("(a: A) => B, C", ','),
            vec!["(a: A) => B", "C"]
        );
    }
}
