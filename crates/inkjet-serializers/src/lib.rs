//! # Inkjet Serializers
//!
//! Builds the JSON:API document sent when creating or updating a resource.
//!
//! ## Modules
//!
//! - **attributes**: writable attributes, cased keys and empty-string coercion
//! - **meta**: dirty-only metadata
//! - **include**: include lists as a tree of dotted paths
//! - **relations**: which related models are written, and with which method
//! - **recursive**: per-call cycle detection
//! - **document**: typed JSON:API document shapes
//! - **write_payload**: the entry point tying it all together
//!
//! ## Example
//!
//! ```
//! use inkjet_core::{AttributeKind, KeyCase, ModelRef, ModelSchema};
//! use inkjet_serializers::{SerializerConfig, WritePayload};
//! use serde_json::json;
//!
//! let people = ModelSchema::builder("people")
//!     .key_case(KeyCase::Dash)
//!     .attribute("first_name", AttributeKind::String)
//!     .attribute("age", AttributeKind::Number)
//!     .build();
//! let person = ModelRef::new(&people);
//! person.assign(json!({ "first_name": "Joe", "age": "" })).unwrap();
//!
//! let json = WritePayload::new(&person)
//!     .as_json(&SerializerConfig::default())
//!     .unwrap();
//! assert_eq!(
//!     json,
//!     json!({ "data": { "type": "people", "attributes": { "first-name": "Joe", "age": null } } })
//! );
//! ```

pub mod attributes;
pub mod config;
pub mod document;
pub mod error;
pub mod include;
pub mod meta;
pub mod recursive;
pub mod relations;
pub mod write_payload;

pub use config::SerializerConfig;
pub use document::{
	Document, RelationshipObject, ResourceIdentifier, ResourceLinkage, ResourceObject, WriteMethod,
};
pub use error::{PayloadError, PayloadResult};
pub use include::IncludeDirective;
pub use recursive::SerializationContext;
pub use relations::{
	Linkage, RelationshipResolver, ResolvedRelationship, ResolvedTarget, validate_includes,
};
pub use write_payload::WritePayload;
