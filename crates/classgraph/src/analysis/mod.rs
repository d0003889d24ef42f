//! Relationship analysis.
//!
//! Infers typed edges between entities by matching the raw names recorded by
//! the extractors against the entities of one analysis call. Names are matched
//! syntactically; no type checking is involved.

mod relationship;

pub use relationship::{relationship_id, Relationship, RelationshipType};

use crate::type_ref::{property_target, signature_target};
use classgraph_parser_api::TypeEntity;
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Analyze a mixed entity collection, split by kind.
pub fn analyze_entities<'a>(entities: impl IntoIterator<Item = &'a TypeEntity>) -> Vec<Relationship> {
    let (classes, interfaces): (Vec<&TypeEntity>, Vec<&TypeEntity>) =
        entities.into_iter().partition(|e| e.is_class());
    analyze(classes, interfaces)
}

/// Compute every relationship between the given classes and interfaces.
///
/// Runs in a fixed order: class inheritance, interface inheritance,
/// realization, association/aggregation, then dependency. A dependency is
/// suppressed when the same pair is already linked by an association or
/// aggregation. When two entities share a name, the first one given wins.
pub fn analyze<'a>(
    classes: impl IntoIterator<Item = &'a TypeEntity>,
    interfaces: impl IntoIterator<Item = &'a TypeEntity>,
) -> Vec<Relationship> {
    let classes: Vec<&TypeEntity> = classes.into_iter().collect();
    let interfaces: Vec<&TypeEntity> = interfaces.into_iter().collect();

    let class_index = index_by_name(&classes);
    let interface_index = index_by_name(&interfaces);
    let lookup = |name: &str| {
        class_index
            .get(name)
            .or_else(|| interface_index.get(name))
            .copied()
    };

    let mut out = Emitter::default();

    // 1. Class inheritance
    for class in &classes {
        if let Some(parent) = class.parent_class_name().and_then(|p| class_index.get(p)) {
            out.emit(RelationshipType::Inheritance, class, parent);
        }
    }

    // 2. Interface inheritance
    for interface in &interfaces {
        for name in interface.extended_interface_names() {
            if let Some(parent) = interface_index.get(name.as_str()) {
                out.emit(RelationshipType::Inheritance, interface, parent);
            }
        }
    }

    // 3. Realization
    for class in &classes {
        for name in class.implemented_interface_names() {
            if let Some(interface) = interface_index.get(name.as_str()) {
                out.emit(RelationshipType::Realization, class, interface);
            }
        }
    }

    let all = || classes.iter().chain(interfaces.iter());

    // 4. Association / aggregation
    let mut member_pairs: HashSet<(&str, &str)> = HashSet::new();
    for entity in all() {
        for prop in &entity.properties {
            let Some(target_ref) = prop.type_annotation.as_deref().and_then(property_target) else {
                continue;
            };
            let Some(target) = lookup(&target_ref.name) else {
                continue;
            };
            let kind = if target_ref.is_collection {
                RelationshipType::Aggregation
            } else {
                RelationshipType::Association
            };
            out.emit(kind, entity, target);
            member_pairs.insert((entity.id.as_str(), target.id.as_str()));
        }
    }

    // 5. Dependency
    for entity in all() {
        for method in &entity.methods {
            let signature_types = method
                .return_type
                .iter()
                .chain(method.parameters.iter().filter_map(|p| p.type_annotation.as_ref()));

            for raw in signature_types {
                let Some(target) = signature_target(raw).and_then(|name| lookup(&name)) else {
                    continue;
                };
                if member_pairs.contains(&(entity.id.as_str(), target.id.as_str())) {
                    trace!("{} -> {}: dependency covered by member", entity.name, target.name);
                    continue;
                }
                out.emit(RelationshipType::Dependency, entity, target);
            }
        }
    }

    debug!(
        "Analyzed {} classes, {} interfaces: {} relationships",
        classes.len(),
        interfaces.len(),
        out.relationships.len()
    );
    out.relationships
}

/// Kind an entity must have to be the target of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetKind {
    /// `extends` on a class
    Class,
    /// `implements` on a class, `extends` on an interface
    Interface,
    /// Property and method signature types
    Any,
}

impl TargetKind {
    pub fn accepts(self, target: &TypeEntity) -> bool {
        match self {
            TargetKind::Class => target.is_class(),
            TargetKind::Interface => target.is_interface(),
            TargetKind::Any => true,
        }
    }
}

/// Names of the entities `entity` would be linked to by [`analyze`], each
/// with the kind [`analyze`] requires of the target.
///
/// The names are not checked against any entity set. References to the
/// entity's own name are dropped.
pub fn references(entity: &TypeEntity) -> BTreeSet<(String, TargetKind)> {
    let mut refs: BTreeSet<(String, TargetKind)> = BTreeSet::new();

    if let Some(parent) = entity.parent_class_name() {
        refs.insert((parent.to_string(), TargetKind::Class));
    }
    for name in entity
        .implemented_interface_names()
        .iter()
        .chain(entity.extended_interface_names())
    {
        refs.insert((name.clone(), TargetKind::Interface));
    }

    for prop in &entity.properties {
        if let Some(target) = prop.type_annotation.as_deref().and_then(property_target) {
            refs.insert((target.name, TargetKind::Any));
        }
    }
    for method in &entity.methods {
        let signature_types = method
            .return_type
            .iter()
            .chain(method.parameters.iter().filter_map(|p| p.type_annotation.as_ref()));
        refs.extend(
            signature_types
                .filter_map(|raw| signature_target(raw))
                .map(|name| (name, TargetKind::Any)),
        );
    }

    refs.retain(|(name, _)| *name != entity.name);
    refs
}

fn index_by_name<'a>(entities: &[&'a TypeEntity]) -> HashMap<&'a str, &'a TypeEntity> {
    let mut index = HashMap::with_capacity(entities.len());
    for entity in entities {
        index.entry(entity.name.as_str()).or_insert(*entity);
    }
    index
}

#[derive(Default)]
struct Emitter {
    relationships: Vec<Relationship>,
    seen: HashSet<String>,
}

impl Emitter {
    fn emit(&mut self, kind: RelationshipType, source: &TypeEntity, target: &TypeEntity) {
        // Self-links only make sense for a member referencing its own type
        if source.id == target.id && !kind.is_member() {
            return;
        }
        let rel = Relationship::new(kind, source, target);
        if self.seen.insert(rel.id.clone()) {
            trace!("{} -{}-> {}", source.name, kind, target.name);
            self.relationships.push(rel);
        }
    }
}
