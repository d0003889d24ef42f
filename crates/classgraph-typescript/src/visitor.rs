//! AST visitor for extracting TypeScript/JavaScript classes and interfaces

use classgraph_parser_api::{
    Accessor, EntityKind, ExtractorConfig, Method, Parameter, ParseError, Property, TypeEntity,
    Visibility,
};
use log::{trace, warn};
use std::collections::HashSet;
use thiserror::Error;
use tree_sitter::Node;

/// A declaration the visitor found but could not turn into an entity.
///
/// Reported as a warning diagnostic; sibling declarations are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("Anonymous {kind} cannot be shown in a diagram")]
    MissingName { kind: &'static str },

    #[error("Duplicate declaration of '{name}' ignored")]
    Duplicate { name: String },

    #[error("Unsupported {found} in {context}")]
    UnexpectedNode { found: String, context: &'static str },
}

/// Modifier keywords found directly on a member node
#[derive(Debug, Default)]
struct Modifiers {
    visibility: Option<Visibility>,
    is_static: bool,
    is_readonly: bool,
    is_abstract: bool,
    is_async: bool,
    is_optional: bool,
    accessor: Option<Accessor>,
}

/// Visitor that extracts class and interface entities from a TypeScript AST
pub struct TypeScriptVisitor<'a> {
    source: &'a [u8],
    file_id: &'a str,
    config: &'a ExtractorConfig,
    pub entities: Vec<TypeEntity>,
    pub warnings: Vec<ParseError>,
    seen: HashSet<String>,
}

impl<'a> TypeScriptVisitor<'a> {
    pub fn new(source: &'a [u8], file_id: &'a str, config: &'a ExtractorConfig) -> Self {
        Self {
            source,
            file_id,
            config,
            entities: Vec::new(),
            warnings: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Get text for a node
    fn node_text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    /// Visit a tree-sitter node and every declaration below it, in document order.
    ///
    /// Walks with an explicit stack so deeply nested expressions cannot
    /// exhaust the thread's stack.
    pub fn visit_node(&mut self, root: Node) {
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "class_declaration" | "abstract_class_declaration" => {
                    let result = self.visit_class(node);
                    self.record(node, result);
                }
                // Class expressions: named ones, and the anonymous `export default class {}`
                "class" if node.child_by_field_name("name").is_some() || is_export_value(node) => {
                    let result = self.visit_class(node);
                    self.record(node, result);
                }
                "interface_declaration" => {
                    let result = self.visit_interface(node);
                    self.record(node, result);
                }
                _ => {
                    let mut cursor = node.walk();
                    let children: Vec<Node> = node.children(&mut cursor).collect();
                    stack.extend(children.into_iter().rev());
                }
            }
        }
    }

    fn record(&mut self, node: Node, result: Result<TypeEntity, DeclarationError>) {
        match result {
            Ok(entity) => {
                if self.seen.insert(entity.name.clone()) {
                    trace!("{}: found {} {}", self.file_id, entity.kind, entity.name);
                    self.entities.push(entity);
                } else {
                    self.warn(node, DeclarationError::Duplicate { name: entity.name });
                }
            }
            Err(err) => self.warn(node, err),
        }
    }

    fn warn(&mut self, node: Node, err: DeclarationError) {
        let pos = node.start_position();
        warn!("{}:{}: {err}", self.file_id, pos.row + 1);
        self.warnings
            .push(ParseError::warning(pos.row + 1, pos.column + 1, err.to_string()));
    }

    fn visit_class(&self, node: Node) -> Result<TypeEntity, DeclarationError> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .ok_or(DeclarationError::MissingName { kind: "class" })?;

        let mut entity = TypeEntity::class(name, self.file_id)
            .with_lines(node.start_position().row + 1, node.end_position().row + 1)
            .with_type_parameters(self.type_parameters(node));

        if node.kind() == "abstract_class_declaration" || has_child_kind(node, "abstract") {
            entity = entity.abstract_class();
        }

        let mut parent_class = None;
        let mut implemented_interfaces = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "class_heritage" {
                let (parent, implements) = self.class_heritage(child)?;
                parent_class = parent;
                implemented_interfaces = implements;
            }
        }
        entity.kind = EntityKind::Class {
            parent_class,
            implemented_interfaces,
        };

        if let Some(body) = node.child_by_field_name("body") {
            self.class_members(body, &mut entity);
        }

        Ok(entity)
    }

    fn class_heritage(
        &self,
        heritage: Node,
    ) -> Result<(Option<String>, Vec<String>), DeclarationError> {
        let mut parent = None;
        let mut implements = Vec::new();

        let mut cursor = heritage.walk();
        for clause in heritage.named_children(&mut cursor) {
            match clause.kind() {
                "extends_clause" => {
                    if let Some(value) = clause.child_by_field_name("value") {
                        parent = Some(self.heritage_name(value).ok_or_else(|| {
                            DeclarationError::UnexpectedNode {
                                found: value.kind().to_string(),
                                context: "extends clause",
                            }
                        })?);
                    }
                }
                "implements_clause" => {
                    let mut inner = clause.walk();
                    for ty in clause.named_children(&mut inner) {
                        if let Some(name) = self.type_name(ty) {
                            implements.push(name);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok((parent, implements))
    }

    /// Name of an `extends` target: identifiers and qualified names, last segment
    fn heritage_name(&self, node: Node) -> Option<String> {
        match node.kind() {
            "identifier" | "type_identifier" => Some(self.node_text(node)),
            "member_expression" => node
                .child_by_field_name("property")
                .map(|n| self.node_text(n)),
            "nested_type_identifier" | "generic_type" => node
                .child_by_field_name("name")
                .and_then(|n| self.heritage_name(n)),
            _ => None,
        }
    }

    /// Name of a type reference in an `implements`/`extends` list
    fn type_name(&self, node: Node) -> Option<String> {
        match node.kind() {
            "type_identifier" | "identifier" => Some(self.node_text(node)),
            "generic_type" | "nested_type_identifier" => node
                .child_by_field_name("name")
                .and_then(|n| self.type_name(n)),
            _ => None,
        }
    }

    fn type_parameters(&self, node: Node) -> Vec<String> {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };

        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| p.child_by_field_name("name"))
            .map(|n| self.node_text(n))
            .collect()
    }

    fn class_members(&self, body: Node, entity: &mut TypeEntity) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "public_field_definition" => {
                    if let Some(prop) = self.property(member) {
                        self.push_property(entity, prop);
                    }
                }
                "method_definition" | "method_signature" | "abstract_method_signature" => {
                    let Some(method) = self.method(member) else {
                        continue;
                    };
                    if method.is_constructor() {
                        if let Some(params) = member.child_by_field_name("parameters") {
                            for prop in self.parameter_properties(params) {
                                self.push_property(entity, prop);
                            }
                        }
                    }
                    self.push_method(entity, method);
                }
                _ => {}
            }
        }
    }

    fn visit_interface(&self, node: Node) -> Result<TypeEntity, DeclarationError> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .ok_or(DeclarationError::MissingName { kind: "interface" })?;

        let mut extended = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "extends_type_clause" {
                let mut inner = child.walk();
                for ty in child.named_children(&mut inner) {
                    if let Some(name) = self.type_name(ty) {
                        extended.push(name);
                    }
                }
            }
        }

        let mut entity = TypeEntity::interface(name, self.file_id)
            .with_lines(node.start_position().row + 1, node.end_position().row + 1)
            .with_type_parameters(self.type_parameters(node))
            .with_extends(extended);

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "property_signature" => {
                        if let Some(prop) = self.property(member) {
                            self.push_property(&mut entity, prop);
                        }
                    }
                    "method_signature" => {
                        if let Some(method) = self.method(member) {
                            self.push_method(&mut entity, method);
                        }
                    }
                    // call, construct and index signatures have no diagram line
                    _ => {}
                }
            }
        }

        Ok(entity)
    }

    fn push_property(&self, entity: &mut TypeEntity, prop: Property) {
        if !self.config.include_private && prop.visibility == Visibility::Private {
            return;
        }
        if !self.config.include_static && prop.is_static {
            return;
        }
        entity.properties.push(prop);
    }

    fn push_method(&self, entity: &mut TypeEntity, method: Method) {
        if !self.config.include_private && method.visibility == Visibility::Private {
            return;
        }
        if !self.config.include_static && method.is_static {
            return;
        }
        // Overload signatures repeat the implementation's name
        let duplicate = entity
            .methods
            .iter()
            .any(|m| m.name == method.name && m.accessor == method.accessor);
        if !duplicate {
            entity.methods.push(method);
        }
    }

    /// Field definitions and property signatures
    fn property(&self, node: Node) -> Option<Property> {
        let name_node = node.child_by_field_name("name")?;
        let name = self.member_name(name_node)?;
        let mods = self.modifiers(node);

        let mut prop = Property::new(name).with_visibility(member_visibility(&mods, name_node));
        prop.type_annotation = node
            .child_by_field_name("type")
            .map(|t| self.type_text(t));
        prop.is_static = mods.is_static;
        prop.is_readonly = mods.is_readonly;
        prop.is_abstract = mods.is_abstract;
        prop.is_optional = mods.is_optional;
        Some(prop)
    }

    fn method(&self, node: Node) -> Option<Method> {
        let name_node = node.child_by_field_name("name")?;
        let name = self.member_name(name_node)?;
        let mods = self.modifiers(node);

        let mut method = Method::new(name).with_visibility(member_visibility(&mods, name_node));
        method.parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();
        method.return_type = node
            .child_by_field_name("return_type")
            .map(|t| self.type_text(t));
        method.is_static = mods.is_static;
        method.is_abstract = mods.is_abstract || node.kind() == "abstract_method_signature";
        method.is_async = mods.is_async;
        method.accessor = mods.accessor;
        Some(method)
    }

    fn member_name(&self, node: Node) -> Option<String> {
        match node.kind() {
            "property_identifier" | "private_property_identifier" | "identifier" | "number" => {
                Some(self.node_text(node))
            }
            "string" => Some(
                self.node_text(node)
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string(),
            ),
            // computed names like [Symbol.iterator]
            _ => None,
        }
    }

    fn modifiers(&self, node: Node) -> Modifiers {
        let mut mods = Modifiers::default();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "accessibility_modifier" => {
                    mods.visibility = Visibility::from_keyword(&self.node_text(child));
                }
                "static" => mods.is_static = true,
                "readonly" => mods.is_readonly = true,
                "abstract" => mods.is_abstract = true,
                "async" => mods.is_async = true,
                "?" => mods.is_optional = true,
                "get" => mods.accessor = Some(Accessor::Get),
                "set" => mods.accessor = Some(Accessor::Set),
                _ => {}
            }
        }
        mods
    }

    fn parameters(&self, params: Node) -> Vec<Parameter> {
        let mut result = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if let Some(parameter) = self.parameter(param) {
                result.push(parameter);
            }
        }
        result
    }

    fn parameter(&self, param: Node) -> Option<Parameter> {
        let is_optional = match param.kind() {
            "required_parameter" => false,
            "optional_parameter" => true,
            _ => return None,
        };

        let pattern = param.child_by_field_name("pattern")?;
        let (name, is_rest) = if pattern.kind() == "rest_pattern" {
            let text = self.node_text(pattern);
            (text.trim_start_matches("...").trim().to_string(), true)
        } else {
            (self.node_text(pattern), false)
        };
        if name == "this" {
            return None;
        }

        let mut parameter = Parameter::new(name);
        parameter.type_annotation = param
            .child_by_field_name("type")
            .map(|t| self.type_text(t));
        parameter.is_optional = is_optional;
        parameter.is_rest = is_rest;
        Some(parameter)
    }

    /// Constructor parameters declared with an accessibility or `readonly` modifier
    fn parameter_properties(&self, params: Node) -> Vec<Property> {
        let mut props = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            let mods = self.modifiers(param);
            if mods.visibility.is_none() && !mods.is_readonly {
                continue;
            }
            let Some(parameter) = self.parameter(param) else {
                continue;
            };

            let mut prop = Property::new(parameter.name)
                .with_visibility(mods.visibility.unwrap_or_default());
            prop.type_annotation = parameter.type_annotation;
            prop.is_readonly = mods.is_readonly;
            prop.is_optional = parameter.is_optional;
            props.push(prop);
        }
        props
    }

    /// Type text with the leading `:` dropped and whitespace collapsed
    fn type_text(&self, node: Node) -> String {
        let inner = if node.kind() == "type_annotation" {
            node.named_child(0).unwrap_or(node)
        } else {
            node
        };
        let text = self.node_text(inner);
        text.trim_start_matches(':')
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn member_visibility(mods: &Modifiers, name_node: Node) -> Visibility {
    if name_node.kind() == "private_property_identifier" {
        Visibility::Private
    } else {
        mods.visibility.unwrap_or_default()
    }
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn is_export_value(node: Node) -> bool {
    node.parent()
        .map(|p| p.kind() == "export_statement")
        .unwrap_or(false)
}
