//! # Inkjet
//!
//! Builds the JSON:API document a client sends when creating or updating a
//! resource from an in-memory model graph.
//!
//! ## Feature Flags
//!
//! - `core` - Schemas, key casing and model handles
//! - `serializers` (default) - Write-payload rendering
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "serializers")]
//! # {
//! use inkjet::prelude::*;
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new();
//! let books = registry.define("books").build();
//! let authors = registry
//!     .define("authors")
//!     .key_case(KeyCase::Dash)
//!     .attribute("first_name", AttributeKind::String)
//!     .has_many("books", "books")
//!     .build();
//!
//! let book = ModelRef::new(&books);
//! book.set_id("1");
//! book.set_persisted(true);
//!
//! let author = ModelRef::new(&authors);
//! author.assign(json!({ "first_name": "Stephen" })).unwrap();
//! author.set_many("books", vec![book]).unwrap();
//!
//! let json = WritePayload::new(&author)
//!     .as_json(&SerializerConfig::default())
//!     .unwrap();
//! assert_eq!(json["data"]["relationships"]["books"]["data"][0]["id"], "1");
//! # }
//! ```

pub mod core;
pub mod serializers;

/// Re-export commonly used types
pub mod prelude {
	#[cfg(feature = "core")]
	pub use crate::core::{
		AttributeKind, KeyCase, ModelError, ModelRef, ModelSchema, SchemaRegistry,
	};

	#[cfg(feature = "serializers")]
	pub use crate::serializers::{
		Document, IncludeDirective, PayloadError, SerializerConfig, WriteMethod, WritePayload,
	};
}
