//! # Inkjet Core
//!
//! Building blocks shared by the Inkjet serializers:
//!
//! - **casing**: [`KeyCase`](casing::KeyCase) strategies for attribute and relationship keys
//! - **model**: schemas, attribute kinds and shared model handles that may form cycles
//! - **registry**: [`SchemaRegistry`](registry::SchemaRegistry) resolving relationship targets by type
//! - **exception**: errors raised by model mutations

pub mod casing;
pub mod exception;
pub mod model;
pub mod registry;

pub use casing::KeyCase;
pub use exception::{ModelError, ModelResult};
pub use model::{
	AttributeDef, AttributeKind, Cardinality, ModelRef, ModelSchema, ModelSchemaBuilder, Related,
	RelationshipDef,
};
pub use registry::SchemaRegistry;
