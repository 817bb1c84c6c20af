//! Schema registry
//!
//! Relationships name their target by resource type. A [`SchemaRegistry`]
//! maps those types back to schemas, so schemas that reference each other
//! (authors and books) can be declared in any order.

use crate::model::{ModelSchema, ModelSchemaBuilder};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Schemas keyed by resource type
///
/// # Examples
///
/// ```
/// use inkjet_core::{AttributeKind, SchemaRegistry};
///
/// let registry = SchemaRegistry::new();
/// let authors = registry
///     .define("authors")
///     .has_many("books", "books")
///     .build();
/// registry
///     .define("books")
///     .attribute("title", AttributeKind::String)
///     .build();
///
/// let books = authors.target_schema("books").unwrap();
/// assert_eq!(books.jsonapi_type(), "books");
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	schemas: RwLock<HashMap<String, Arc<ModelSchema>>>,
}

impl SchemaRegistry {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Start declaring a schema that is registered when built
	///
	/// Schemas hold the registry weakly; keep the registry alive for as
	/// long as relationship targets need resolving.
	pub fn define(self: &Arc<Self>, jsonapi_type: impl Into<String>) -> ModelSchemaBuilder {
		ModelSchema::registered_builder(jsonapi_type, Arc::downgrade(self))
	}

	/// Register a schema under its resource type, replacing any previous one
	pub fn register(&self, schema: Arc<ModelSchema>) {
		self.schemas
			.write()
			.insert(schema.jsonapi_type().to_string(), schema);
	}

	pub fn get(&self, jsonapi_type: &str) -> Option<Arc<ModelSchema>> {
		self.schemas.read().get(jsonapi_type).cloned()
	}

	pub fn contains(&self, jsonapi_type: &str) -> bool {
		self.schemas.read().contains_key(jsonapi_type)
	}

	/// Registered resource types, sorted
	pub fn types(&self) -> Vec<String> {
		let mut types: Vec<_> = self.schemas.read().keys().cloned().collect();
		types.sort();
		types
	}
}
