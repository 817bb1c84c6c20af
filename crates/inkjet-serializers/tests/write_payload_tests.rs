//! Write Payload Integration Tests
//!
//! End-to-end rendering of write documents from model graphs.
//!
//! # Test Categories
//!
//! - Attributes: casing, empty-string coercion, metadata
//! - Relationships: references, explicit includes, write intents
//! - Cycles: back-references and longer loops terminate
//! - Errors: malformed include lists and configuration

mod fixtures;

use assert_json_diff::assert_json_eq;
use fixtures::{Library, library, persisted};
use inkjet_core::{ModelRef, ModelSchema};
use inkjet_serializers::{PayloadError, SerializerConfig, WritePayload};
use rstest::*;
use serde_json::json;

// =============================================================================
// Attributes and metadata
// =============================================================================

#[rstest]
fn test_attributes_with_empty_string_coercion(library: Library) {
	let person = ModelRef::new(&library.people);
	person
		.assign(json!({ "first_name": "Joe", "age": 23 }))
		.unwrap();
	person.set_attribute("age", "").unwrap();
	person.set_attribute("last_name", "").unwrap();

	let json = WritePayload::new(&person)
		.as_json(&SerializerConfig::attributes_only())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "people",
				"attributes": { "first_name": "Joe", "last_name": "", "age": null }
			}
		})
	);
}

#[rstest]
fn test_dasherized_attribute_keys(library: Library) {
	let person = ModelRef::new(&library.dasherized_people);
	person.assign(json!({ "first_name": "Joe" })).unwrap();

	let json = WritePayload::new(&person)
		.as_json(&SerializerConfig::attributes_only())
		.unwrap();

	assert_json_eq!(
		json,
		json!({ "data": { "type": "people", "attributes": { "first-name": "Joe" } } })
	);
}

#[rstest]
#[case(true, Some(json!({ "mock": "metadata" })))]
#[case(false, None)]
fn test_meta_is_sent_only_when_dirty(
	library: Library,
	#[case] dirty: bool,
	#[case] expected: Option<serde_json::Value>,
) {
	let person = ModelRef::new(&library.people);
	person.assign(json!({ "first_name": "Joe" })).unwrap();
	person.set_meta(json!({ "mock": "metadata" }), dirty).unwrap();

	let json = WritePayload::new(&person)
		.as_json(&SerializerConfig::attributes_only())
		.unwrap();

	assert_eq!(json["data"]["attributes"], json!({ "first_name": "Joe" }));
	assert_eq!(json["data"].get("meta").cloned(), expected);
}

#[rstest]
fn test_empty_model_renders_type_only(library: Library) {
	let person = ModelRef::new(&library.people);

	let document = WritePayload::new(&person)
		.to_document(&SerializerConfig::default())
		.unwrap();

	assert_eq!(
		document.to_json_string().unwrap(),
		r#"{"data":{"type":"people"}}"#
	);
}

#[rstest]
fn test_persisted_root_carries_id(library: Library) {
	let person = persisted(&library.people, "42");
	person.assign(json!({ "first_name": "Joe" })).unwrap();

	let json = WritePayload::new(&person)
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": { "type": "people", "id": "42", "attributes": { "first_name": "Joe" } }
		})
	);
}

// =============================================================================
// Relationships
// =============================================================================

#[rstest]
fn test_circular_graph_terminates(library: Library) {
	let author = ModelRef::new(&library.simple_authors);
	let book = persisted(&library.books, "1");
	author.set_many("books", vec![book.clone()]).unwrap();
	book.set_one("author", Some(author.clone())).unwrap();

	let json = WritePayload::new(&author)
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "simple_authors",
				"relationships": {
					"books": { "data": [{ "id": "1", "type": "books" }] }
				}
			}
		})
	);
}

#[rstest]
fn test_explicit_to_one_is_update_with_body(library: Library) {
	let author = ModelRef::new(&library.authors);
	author.assign(json!({ "first_name": "Stephen" })).unwrap();
	let genre = persisted(&library.genres, "1");
	genre.assign(json!({ "name": "Horror" })).unwrap();
	author.set_one("genre", Some(genre)).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["genre"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "authors",
				"attributes": { "first-name": "Stephen" },
				"relationships": {
					"genre": { "data": { "type": "genres", "id": "1", "method": "update" } }
				}
			},
			"included": [
				{
					"type": "genres",
					"id": "1",
					"method": "update",
					"attributes": { "name": "Horror" }
				}
			]
		})
	);
}

#[rstest]
fn test_explicit_to_many_is_update_with_bodies(library: Library) {
	let author = ModelRef::new(&library.authors);
	let first = persisted(&library.books, "1");
	let second = persisted(&library.books, "2");
	first.assign(json!({ "title": "Carrie" })).unwrap();
	second.assign(json!({ "title": "It", "page_count": "" })).unwrap();
	// Back-references to an unpersisted author are held back
	first.set_one("author", Some(author.clone())).unwrap();
	author.set_many("books", vec![first, second]).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "authors",
				"relationships": {
					"books": {
						"data": [
							{ "type": "books", "id": "1", "method": "update" },
							{ "type": "books", "id": "2", "method": "update" }
						]
					}
				}
			},
			"included": [
				{ "type": "books", "id": "1", "method": "update", "attributes": { "title": "Carrie" } },
				{
					"type": "books",
					"id": "2",
					"method": "update",
					"attributes": { "title": "It", "page_count": null }
				}
			]
		})
	);
}

#[rstest]
fn test_implicit_relationships_are_references_only(library: Library) {
	let author = ModelRef::new(&library.authors);
	let genre = persisted(&library.genres, "7");
	genre.assign(json!({ "name": "Horror" })).unwrap();
	author.set_one("genre", Some(genre)).unwrap();
	author
		.set_one("special_book", Some(persisted(&library.books, "3")))
		.unwrap();

	let json = WritePayload::new(&author)
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "authors",
				"relationships": {
					"genre": { "data": { "type": "genres", "id": "7" } },
					"special-book": { "data": { "type": "books", "id": "3" } }
				}
			}
		})
	);
}

#[rstest]
fn test_unpersisted_targets_are_dropped_by_default(library: Library) {
	let author = ModelRef::new(&library.authors);
	author
		.set_many(
			"books",
			vec![ModelRef::new(&library.books), ModelRef::new(&library.books)],
		)
		.unwrap();
	author
		.set_one("genre", Some(ModelRef::new(&library.genres)))
		.unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books", "genre"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(json, json!({ "data": { "type": "authors" } }));
}

#[rstest]
fn test_inline_creation_writes_create_entries(library: Library) {
	let author = ModelRef::new(&library.authors);
	let book = ModelRef::new(&library.books);
	book.set_temp_id("tmp-1");
	book.assign(json!({ "title": "Misery" })).unwrap();
	author.set_many("books", vec![book]).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books"])
		.unwrap()
		.as_json(&SerializerConfig::default().with_inline_creation(true))
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "authors",
				"relationships": {
					"books": {
						"data": [{ "type": "books", "temp-id": "tmp-1", "method": "create" }]
					}
				}
			},
			"included": [
				{
					"type": "books",
					"temp-id": "tmp-1",
					"method": "create",
					"attributes": { "title": "Misery" }
				}
			]
		})
	);
}

#[rstest]
fn test_back_reference_to_new_root_shares_temp_id(library: Library) {
	let author = ModelRef::new(&library.authors);
	let book = ModelRef::new(&library.books);
	book.set_temp_id("tmp-book");
	book.set_one("author", Some(author.clone())).unwrap();
	author.set_many("books", vec![book]).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books.author"])
		.unwrap()
		.as_json(&SerializerConfig::default().with_inline_creation(true))
		.unwrap();

	let root_temp_id = json["data"]["temp-id"].as_str().unwrap();
	assert!(!root_temp_id.is_empty());
	assert_eq!(
		json["included"][0]["relationships"]["author"]["data"],
		json!({ "type": "authors", "temp-id": root_temp_id, "method": "create" })
	);
	assert_eq!(json["included"].as_array().unwrap().len(), 1);
}

#[rstest]
fn test_write_intent_markers(library: Library) {
	let author = ModelRef::new(&library.authors);
	let destroyed = persisted(&library.books, "1");
	let detached = persisted(&library.books, "2");
	destroyed.mark_for_destruction();
	detached.mark_for_disassociation();
	author.set_many("books", vec![destroyed, detached]).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json["data"]["relationships"]["books"]["data"],
		json!([
			{ "type": "books", "id": "1", "method": "destroy" },
			{ "type": "books", "id": "2", "method": "disassociate" }
		])
	);
	assert_json_eq!(
		json["included"],
		json!([
			{ "type": "books", "id": "1", "method": "destroy" },
			{ "type": "books", "id": "2", "method": "disassociate" }
		])
	);
}

#[rstest]
fn test_traversal_disabled_ignores_includes(library: Library) {
	let author = ModelRef::new(&library.authors);
	author.assign(json!({ "first_name": "Stephen" })).unwrap();
	author
		.set_one("genre", Some(persisted(&library.genres, "1")))
		.unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["genre"])
		.unwrap()
		.as_json(&SerializerConfig::attributes_only())
		.unwrap();

	assert_json_eq!(
		json,
		json!({ "data": { "type": "authors", "attributes": { "first-name": "Stephen" } } })
	);
}

#[rstest]
fn test_each_model_keeps_its_own_key_casing(library: Library) {
	let author = ModelRef::new(&library.authors);
	author.assign(json!({ "first_name": "Stephen" })).unwrap();
	let book = persisted(&library.books, "1");
	book.assign(json!({ "title": "It", "page_count": 1138 })).unwrap();
	let genre = persisted(&library.genres, "5");
	genre.assign(json!({ "display_name": "Horror" })).unwrap();
	book.set_one("genre", Some(genre)).unwrap();
	author.set_one("special_book", Some(book)).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["special_book.genre"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "authors",
				"attributes": { "first-name": "Stephen" },
				"relationships": {
					"special-book": { "data": { "type": "books", "id": "1", "method": "update" } }
				}
			},
			"included": [
				{
					"type": "books",
					"id": "1",
					"method": "update",
					"attributes": { "title": "It", "page_count": 1138 },
					"relationships": {
						"genre": { "data": { "type": "genres", "id": "5", "method": "update" } }
					}
				},
				{
					"type": "genres",
					"id": "5",
					"method": "update",
					"attributes": { "displayName": "Horror" }
				}
			]
		})
	);
}

// =============================================================================
// Cycles
// =============================================================================

#[rstest]
fn test_included_back_reference_is_identifier_only(library: Library) {
	let author = persisted(&library.authors, "9");
	let book = persisted(&library.books, "1");
	book.set_one("author", Some(author.clone())).unwrap();
	author.set_many("books", vec![book]).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books.author"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json,
		json!({
			"data": {
				"type": "authors",
				"id": "9",
				"relationships": {
					"books": { "data": [{ "type": "books", "id": "1", "method": "update" }] }
				}
			},
			"included": [
				{
					"type": "books",
					"id": "1",
					"method": "update",
					"relationships": {
						"author": { "data": { "type": "authors", "id": "9", "method": "update" } }
					}
				}
			]
		})
	);
}

#[rstest]
fn test_three_model_loop_terminates(library: Library) {
	let author = persisted(&library.authors, "9");
	let book = persisted(&library.books, "1");
	let genre = persisted(&library.genres, "5");
	author.set_many("books", vec![book.clone()]).unwrap();
	book.set_one("genre", Some(genre.clone())).unwrap();
	genre.set_one("curator", Some(author.clone())).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books.genre.curator"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json["included"],
		json!([
			{
				"type": "books",
				"id": "1",
				"method": "update",
				"relationships": {
					"genre": { "data": { "type": "genres", "id": "5", "method": "update" } }
				}
			},
			{
				"type": "genres",
				"id": "5",
				"method": "update",
				"relationships": {
					"curator": { "data": { "type": "authors", "id": "9", "method": "update" } }
				}
			}
		])
	);
}

#[rstest]
fn test_shared_target_is_included_once(library: Library) {
	let author = ModelRef::new(&library.authors);
	let book = persisted(&library.books, "1");
	book.assign(json!({ "title": "Carrie" })).unwrap();
	author.set_many("books", vec![book.clone()]).unwrap();
	author.set_one("special_book", Some(book)).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books", "special_book"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json["data"]["relationships"]["special-book"]["data"],
		json!({ "type": "books", "id": "1", "method": "update" })
	);
	assert_eq!(json["included"].as_array().unwrap().len(), 1);
}

#[rstest]
fn test_shared_target_merges_include_paths(library: Library) {
	let author = ModelRef::new(&library.authors);
	let book = persisted(&library.books, "1");
	book.set_one("genre", Some(persisted(&library.genres, "5")))
		.unwrap();
	author.set_many("books", vec![book.clone()]).unwrap();
	author.set_one("special_book", Some(book)).unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books", "special_book.genre"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json["included"],
		json!([
			{
				"type": "books",
				"id": "1",
				"method": "update",
				"relationships": {
					"genre": { "data": { "type": "genres", "id": "5", "method": "update" } }
				}
			},
			{ "type": "genres", "id": "5", "method": "update" }
		])
	);
}

#[rstest]
fn test_back_reference_path_extends_root_includes(library: Library) {
	let author = persisted(&library.authors, "9");
	let book = persisted(&library.books, "1");
	book.set_one("author", Some(author.clone())).unwrap();
	author.set_many("books", vec![book]).unwrap();
	author
		.set_one("genre", Some(persisted(&library.genres, "5")))
		.unwrap();

	let json = WritePayload::new(&author)
		.with_includes(["books.author.genre"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap();

	assert_json_eq!(
		json["data"]["relationships"]["genre"]["data"],
		json!({ "type": "genres", "id": "5", "method": "update" })
	);
	let types: Vec<_> = json["included"]
		.as_array()
		.unwrap()
		.iter()
		.map(|entry| entry["type"].as_str().unwrap().to_string())
		.collect();
	assert_eq!(types, vec!["books", "genres"]);
}

// =============================================================================
// Errors
// =============================================================================

#[rstest]
fn test_unknown_root_relationship(library: Library) {
	let author = ModelRef::new(&library.authors);

	let err = WritePayload::new(&author)
		.with_includes(["publisher"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap_err();

	assert!(matches!(
		err,
		PayloadError::UnknownRelationship { ref resource_type, ref name }
			if resource_type == "authors" && name == "publisher"
	));
}

#[rstest]
fn test_unknown_nested_relationship(library: Library) {
	let author = ModelRef::new(&library.authors);
	author
		.set_many("books", vec![persisted(&library.books, "1")])
		.unwrap();

	let err = WritePayload::new(&author)
		.with_includes(["books.publisher"])
		.unwrap()
		.as_json(&SerializerConfig::default())
		.unwrap_err();

	assert!(matches!(
		err,
		PayloadError::UnknownRelationship { ref resource_type, .. } if resource_type == "books"
	));
}

#[rstest]
#[case(SerializerConfig::default(), false)]
#[case(SerializerConfig::default(), true)]
#[case(SerializerConfig::attributes_only(), false)]
#[case(SerializerConfig::attributes_only(), true)]
fn test_unknown_nested_relationship_regardless_of_graph(
	library: Library,
	#[case] config: SerializerConfig,
	#[case] with_books: bool,
) {
	let author = ModelRef::new(&library.authors);
	if with_books {
		author
			.set_many("books", vec![persisted(&library.books, "1")])
			.unwrap();
	}

	for paths in [["publisher"], ["books.publisher"]] {
		let result = WritePayload::new(&author)
			.with_includes(paths)
			.unwrap()
			.as_json(&config);

		assert!(
			matches!(result, Err(PayloadError::UnknownRelationship { ref name, .. }) if name == "publisher"),
			"{:?} should be rejected",
			paths
		);
	}
}

#[rstest]
fn test_include_through_standalone_schema_is_rejected() {
	let people = ModelSchema::builder("people")
		.has_one("employer", "companies")
		.build();
	let person = ModelRef::new(&people);

	let leaf = WritePayload::new(&person)
		.with_includes(["employer"])
		.unwrap()
		.as_json(&SerializerConfig::default());
	assert!(leaf.is_ok());

	let nested = WritePayload::new(&person)
		.with_includes(["employer.owner"])
		.unwrap()
		.as_json(&SerializerConfig::default());
	assert!(matches!(
		nested,
		Err(PayloadError::UnresolvedRelationshipTarget { ref target, .. }) if target == "companies"
	));
}

#[rstest]
#[case("books..genre")]
#[case(".books")]
#[case("books,")]
fn test_malformed_include_path(library: Library, #[case] path: &str) {
	let author = ModelRef::new(&library.authors);

	let result = WritePayload::new(&author).with_includes([path]);

	assert!(matches!(result, Err(PayloadError::InvalidIncludePath { .. })));
}

#[rstest]
fn test_include_too_deep(library: Library) {
	let author = ModelRef::new(&library.authors);
	let config = SerializerConfig::default().with_max_include_depth(2);

	let err = WritePayload::new(&author)
		.with_includes(["genre", "books.genre.curator"])
		.unwrap()
		.as_json(&config)
		.unwrap_err();

	assert!(matches!(
		err,
		PayloadError::IncludeTooDeep { ref path, depth: 3, max_depth: 2 }
			if path == "books.genre.curator"
	));
}

#[rstest]
fn test_invalid_config_is_rejected(library: Library) {
	let person = ModelRef::new(&library.people);
	let config = SerializerConfig::default().with_max_include_depth(0);

	let result = WritePayload::new(&person).as_json(&config);

	assert!(matches!(result, Err(PayloadError::Config { ref key, .. }) if key == "max_include_depth"));
}
