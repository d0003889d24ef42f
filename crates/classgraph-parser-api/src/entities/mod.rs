pub mod member;
pub mod type_entity;

pub use member::{Accessor, Method, Parameter, Property, Visibility};
pub use type_entity::{entity_id, EntityKind, TypeEntity};
