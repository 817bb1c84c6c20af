//! Shared model schemas for write payload tests

#![allow(dead_code)]

use inkjet_core::{AttributeKind, KeyCase, ModelRef, ModelSchema, SchemaRegistry};
use rstest::fixture;
use std::sync::Arc;

/// Schemas used across the suite, one per resource class
pub struct Library {
	pub registry: Arc<SchemaRegistry>,
	pub people: Arc<ModelSchema>,
	pub dasherized_people: Arc<ModelSchema>,
	pub authors: Arc<ModelSchema>,
	pub simple_authors: Arc<ModelSchema>,
	pub genres: Arc<ModelSchema>,
	pub books: Arc<ModelSchema>,
}

#[fixture]
pub fn library() -> Library {
	let registry = SchemaRegistry::new();
	Library {
		people: ModelSchema::builder("people")
			.attribute("first_name", AttributeKind::String)
			.attribute("last_name", AttributeKind::String)
			.attribute("age", AttributeKind::Number)
			.build(),
		dasherized_people: ModelSchema::builder("people")
			.key_case(KeyCase::Dash)
			.attribute("first_name", AttributeKind::String)
			.attribute("last_name", AttributeKind::String)
			.build(),
		authors: registry
			.define("authors")
			.key_case(KeyCase::Dash)
			.attribute("first_name", AttributeKind::String)
			.has_one("genre", "genres")
			.has_many("books", "books")
			.has_one("special_book", "books")
			.build(),
		simple_authors: registry
			.define("simple_authors")
			.has_many("books", "books")
			.build(),
		genres: registry
			.define("genres")
			.key_case(KeyCase::Camel)
			.attribute("name", AttributeKind::String)
			.attribute("display_name", AttributeKind::String)
			.has_one("curator", "authors")
			.build(),
		books: registry
			.define("books")
			.attribute("title", AttributeKind::String)
			.attribute("page_count", AttributeKind::Number)
			.has_one("author", "authors")
			.has_one("genre", "genres")
			.build(),
		registry,
	}
}

/// A model the backend already knows about
pub fn persisted(schema: &Arc<ModelSchema>, id: &str) -> ModelRef {
	let model = ModelRef::new(schema);
	model.set_id(id);
	model.set_persisted(true);
	model
}
