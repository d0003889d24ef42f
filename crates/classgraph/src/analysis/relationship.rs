//! Typed relationship edges between entities.

use classgraph_parser_api::TypeEntity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UML relationship kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// Class extends class, or interface extends interface
    Inheritance,
    /// Class implements interface
    Realization,
    /// Property holds a single related entity
    Association,
    /// Property holds a collection of related entities
    Aggregation,
    /// Method signature mentions a related entity
    Dependency,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Inheritance => "inheritance",
            RelationshipType::Realization => "realization",
            RelationshipType::Association => "association",
            RelationshipType::Aggregation => "aggregation",
            RelationshipType::Dependency => "dependency",
        }
    }

    /// Relationships that come from a property type
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            RelationshipType::Association | RelationshipType::Aggregation
        )
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship: `source` uses or extends `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub source_id: String,
    pub target_id: String,
}

impl Relationship {
    pub fn new(kind: RelationshipType, source: &TypeEntity, target: &TypeEntity) -> Self {
        Self {
            id: relationship_id(&source.id, &target.id, kind),
            kind,
            source_id: source.id.clone(),
            target_id: target.id.clone(),
        }
    }
}

/// Deterministic id of the `kind` edge from `source_id` to `target_id`
pub fn relationship_id(source_id: &str, target_id: &str, kind: RelationshipType) -> String {
    format!("{source_id}->{target_id}:{kind}")
}
