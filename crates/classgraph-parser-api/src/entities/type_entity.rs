use super::member::{Method, Property};
use crate::traits::FileId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Build the identifier of an entity declared in `file_id`.
///
/// Ids are stable across re-parses for as long as the entity keeps its name.
pub fn entity_id(file_id: &str, name: &str) -> String {
    format!("{file_id}::{name}")
}

/// Kind-specific part of a [`TypeEntity`].
///
/// Heritage links are kept as the raw names written in the source; they are
/// matched against other entities later, by the relationship analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityKind {
    Class {
        /// Single-inheritance parent (`extends`)
        parent_class: Option<String>,

        /// Interfaces listed in `implements`
        implemented_interfaces: Vec<String>,
    },
    Interface {
        /// Interfaces listed in `extends`
        extended_interfaces: Vec<String>,
    },
}

impl EntityKind {
    pub fn class() -> Self {
        EntityKind::Class {
            parent_class: None,
            implemented_interfaces: Vec::new(),
        }
    }

    pub fn interface() -> Self {
        EntityKind::Interface {
            extended_interfaces: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Class { .. } => "class",
            EntityKind::Interface { .. } => "interface",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A class- or interface-like declaration extracted from one source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeEntity {
    /// `fileId::name`, see [`entity_id`]
    pub id: String,

    /// Declared name
    pub name: String,

    /// File the entity was declared in
    pub file_id: FileId,

    #[serde(flatten)]
    pub kind: EntityKind,

    /// Properties in declaration order
    pub properties: Vec<Property>,

    /// Methods in declaration order
    pub methods: Vec<Method>,

    /// Generic type parameter names, left to right
    pub type_parameters: Vec<String>,

    /// Declared `abstract` (classes only)
    pub is_abstract: bool,

    /// Starting line number (1-indexed)
    pub line_start: usize,

    /// Ending line number (1-indexed)
    pub line_end: usize,
}

impl TypeEntity {
    fn with_kind(name: impl Into<String>, file_id: impl Into<FileId>, kind: EntityKind) -> Self {
        let name = name.into();
        let file_id = file_id.into();
        Self {
            id: entity_id(&file_id, &name),
            name,
            file_id,
            kind,
            properties: Vec::new(),
            methods: Vec::new(),
            type_parameters: Vec::new(),
            is_abstract: false,
            line_start: 0,
            line_end: 0,
        }
    }

    pub fn class(name: impl Into<String>, file_id: impl Into<FileId>) -> Self {
        Self::with_kind(name, file_id, EntityKind::class())
    }

    pub fn interface(name: impl Into<String>, file_id: impl Into<FileId>) -> Self {
        Self::with_kind(name, file_id, EntityKind::interface())
    }

    /// Set the parent class. No effect on interfaces.
    pub fn with_parent_class(mut self, parent: impl Into<String>) -> Self {
        if let EntityKind::Class { parent_class, .. } = &mut self.kind {
            *parent_class = Some(parent.into());
        }
        self
    }

    /// Set the implemented interfaces. No effect on interfaces.
    pub fn with_implements(mut self, names: Vec<String>) -> Self {
        if let EntityKind::Class {
            implemented_interfaces,
            ..
        } = &mut self.kind
        {
            *implemented_interfaces = names;
        }
        self
    }

    /// Set the extended interfaces. No effect on classes.
    pub fn with_extends(mut self, names: Vec<String>) -> Self {
        if let EntityKind::Interface {
            extended_interfaces,
        } = &mut self.kind
        {
            *extended_interfaces = names;
        }
        self
    }

    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_type_parameters(mut self, type_params: Vec<String>) -> Self {
        self.type_parameters = type_params;
        self
    }

    pub fn with_lines(mut self, line_start: usize, line_end: usize) -> Self {
        self.line_start = line_start;
        self.line_end = line_end;
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, EntityKind::Class { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, EntityKind::Interface { .. })
    }

    pub fn parent_class_name(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Class { parent_class, .. } => parent_class.as_deref(),
            EntityKind::Interface { .. } => None,
        }
    }

    pub fn implemented_interface_names(&self) -> &[String] {
        match &self.kind {
            EntityKind::Class {
                implemented_interfaces,
                ..
            } => implemented_interfaces,
            EntityKind::Interface { .. } => &[],
        }
    }

    pub fn extended_interface_names(&self) -> &[String] {
        match &self.kind {
            EntityKind::Interface {
                extended_interfaces,
            } => extended_interfaces,
            EntityKind::Class { .. } => &[],
        }
    }

    /// Every heritage name this entity declares, in source order
    pub fn heritage_names(&self) -> impl Iterator<Item = &str> {
        self.parent_class_name()
            .into_iter()
            .chain(self.implemented_interface_names().iter().map(String::as_str))
            .chain(self.extended_interface_names().iter().map(String::as_str))
    }
}
