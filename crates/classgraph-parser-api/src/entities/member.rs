use serde::{Deserialize, Serialize};
use std::fmt;

/// Member visibility. Members without an explicit modifier are public.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Parse a modifier keyword (`public`, `protected`, `private`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim() {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    /// UML visibility marker
    pub fn symbol(&self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Protected => '#',
            Visibility::Private => '-',
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Accessor flavour of a method (`get x()` / `set x(v)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    Get,
    Set,
}

/// Represents a method parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (or the raw pattern text for destructured parameters)
    pub name: String,

    /// Raw type annotation, uninterpreted
    pub type_annotation: Option<String>,

    /// Declared with `?`
    pub is_optional: bool,

    /// Rest parameter (`...args`)
    pub is_rest: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            is_optional: false,
            is_rest: false,
        }
    }

    pub fn with_type(mut self, type_ann: impl Into<String>) -> Self {
        self.type_annotation = Some(type_ann.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn rest(mut self) -> Self {
        self.is_rest = true;
        self
    }
}

/// Represents a property (field) of a class or interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,

    /// Raw type annotation, uninterpreted
    pub type_annotation: Option<String>,

    pub visibility: Visibility,

    pub is_static: bool,

    pub is_readonly: bool,

    pub is_abstract: bool,

    /// Declared with `?`
    pub is_optional: bool,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            visibility: Visibility::Public,
            is_static: false,
            is_readonly: false,
            is_abstract: false,
            is_optional: false,
        }
    }

    pub fn with_type(mut self, type_ann: impl Into<String>) -> Self {
        self.type_annotation = Some(type_ann.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_property(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    pub fn abstract_property(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// Represents a method (or method signature) of a class or interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    /// Method name
    pub name: String,

    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,

    /// Raw return type annotation, uninterpreted
    pub return_type: Option<String>,

    pub visibility: Visibility,

    pub is_static: bool,

    pub is_abstract: bool,

    pub is_async: bool,

    /// Set for `get`/`set` accessors
    pub accessor: Option<Accessor>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_async: false,
            accessor: None,
        }
    }

    pub fn with_parameters(mut self, params: Vec<Parameter>) -> Self {
        self.parameters = params;
        self
    }

    pub fn with_return_type(mut self, ret: impl Into<String>) -> Self {
        self.return_type = Some(ret.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn async_method(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = Some(accessor);
        self
    }

    /// Whether this method is the class constructor
    pub fn is_constructor(&self) -> bool {
        self.name == "constructor"
    }
}
