//! In-memory model layer
//!
//! A [`ModelSchema`] describes a resource class: its wire type, key casing,
//! attribute kinds and relationship cardinalities. A [`ModelRef`] is a shared
//! handle to one instance of that class. Handles are cheap to clone and may
//! reference each other in cycles (an author holding its books, each book
//! holding the author), so identity is the shared allocation rather than the
//! resource id.
//!
//! ## Example
//!
//! ```
//! use inkjet_core::model::{AttributeKind, ModelRef, ModelSchema};
//! use serde_json::json;
//!
//! let people = ModelSchema::builder("people")
//!     .attribute("first_name", AttributeKind::String)
//!     .attribute("age", AttributeKind::Number)
//!     .build();
//!
//! let person = ModelRef::new(&people);
//! person.assign(json!({ "first_name": "Joe", "age": 23 })).unwrap();
//! assert_eq!(person.attribute("age"), Some(json!(23)));
//! assert!(!person.is_persisted());
//! ```

use crate::casing::KeyCase;
use crate::exception::{ModelError, ModelResult};
use crate::registry::SchemaRegistry;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Declared kind of an attribute, consulted when coercing empty strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
	/// Text; an empty string is a meaningful value
	String,
	/// Numeric; an empty string means "no value"
	Number,
	/// Anything else, or a kind that was never declared
	#[default]
	Other,
}

/// Attribute declaration on a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
	pub name: String,
	pub kind: AttributeKind,
	/// `false` for read-only, server-computed attributes that are never written
	pub persist: bool,
}

/// Whether a relationship points at one model or an ordered list of models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
	One,
	Many,
}

impl fmt::Display for Cardinality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Cardinality::One => f.write_str("to-one"),
			Cardinality::Many => f.write_str("to-many"),
		}
	}
}

/// Relationship declaration on a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDef {
	pub name: String,
	pub cardinality: Cardinality,
	/// Resource type of the related models
	pub target: String,
}

/// Class-level description of a resource
#[derive(Debug, Clone)]
pub struct ModelSchema {
	jsonapi_type: String,
	key_case: KeyCase,
	attributes: Vec<AttributeDef>,
	relationships: Vec<RelationshipDef>,
	registry: Option<Weak<SchemaRegistry>>,
}

impl ModelSchema {
	/// Start declaring a schema for the given wire type
	///
	/// The schema is standalone: relationship targets cannot be looked up,
	/// so include paths may not descend through it. Use
	/// [`SchemaRegistry::define`] for schemas that reference each other.
	pub fn builder(jsonapi_type: impl Into<String>) -> ModelSchemaBuilder {
		ModelSchemaBuilder {
			schema: ModelSchema {
				jsonapi_type: jsonapi_type.into(),
				key_case: KeyCase::default(),
				attributes: Vec::new(),
				relationships: Vec::new(),
				registry: None,
			},
		}
	}

	pub(crate) fn registered_builder(
		jsonapi_type: impl Into<String>,
		registry: Weak<SchemaRegistry>,
	) -> ModelSchemaBuilder {
		let mut builder = Self::builder(jsonapi_type);
		builder.schema.registry = Some(registry);
		builder
	}

	pub fn jsonapi_type(&self) -> &str {
		&self.jsonapi_type
	}

	pub fn key_case(&self) -> KeyCase {
		self.key_case
	}

	/// Attribute declarations in declaration order
	pub fn attributes(&self) -> &[AttributeDef] {
		&self.attributes
	}

	pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
		self.attributes.iter().find(|def| def.name == name)
	}

	/// Declared kind of an attribute, [`AttributeKind::Other`] when unknown
	pub fn attribute_kind(&self, name: &str) -> AttributeKind {
		self.attribute(name).map(|def| def.kind).unwrap_or_default()
	}

	/// Relationship declarations in declaration order
	pub fn relationships(&self) -> &[RelationshipDef] {
		&self.relationships
	}

	pub fn relationship(&self, name: &str) -> Option<&RelationshipDef> {
		self.relationships.iter().find(|def| def.name == name)
	}

	/// Schema of the models a relationship points at
	///
	/// `None` when the relationship is undeclared, the schema is standalone,
	/// or the target type was never registered.
	pub fn target_schema(&self, name: &str) -> Option<Arc<ModelSchema>> {
		let def = self.relationship(name)?;
		let registry = self.registry.as_ref()?.upgrade()?;
		registry.get(&def.target)
	}
}

/// Builder returned by [`ModelSchema::builder`]
#[derive(Debug, Clone)]
pub struct ModelSchemaBuilder {
	schema: ModelSchema,
}

impl ModelSchemaBuilder {
	/// Set the key casing used for attribute and relationship names
	pub fn key_case(mut self, key_case: KeyCase) -> Self {
		self.schema.key_case = key_case;
		self
	}

	/// Declare a writable attribute
	pub fn attribute(self, name: impl Into<String>, kind: AttributeKind) -> Self {
		self.push_attribute(name.into(), kind, true)
	}

	/// Declare a read-only attribute that is never sent to the server
	pub fn read_only(self, name: impl Into<String>, kind: AttributeKind) -> Self {
		self.push_attribute(name.into(), kind, false)
	}

	/// Declare a to-one relationship pointing at `target` resources
	pub fn has_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
		self.push_relationship(name.into(), Cardinality::One, target.into())
	}

	/// Declare a to-many relationship pointing at `target` resources
	pub fn has_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
		self.push_relationship(name.into(), Cardinality::Many, target.into())
	}

	/// Finish the schema, registering it when it came from a registry
	pub fn build(self) -> Arc<ModelSchema> {
		let registry = self.schema.registry.as_ref().and_then(Weak::upgrade);
		let schema = Arc::new(self.schema);
		if let Some(registry) = registry {
			registry.register(Arc::clone(&schema));
		}
		schema
	}

	fn push_attribute(mut self, name: String, kind: AttributeKind, persist: bool) -> Self {
		self.schema.attributes.retain(|def| def.name != name);
		self.schema.attributes.push(AttributeDef {
			name,
			kind,
			persist,
		});
		self
	}

	fn push_relationship(mut self, name: String, cardinality: Cardinality, target: String) -> Self {
		self.schema.relationships.retain(|def| def.name != name);
		self.schema.relationships.push(RelationshipDef {
			name,
			cardinality,
			target,
		});
		self
	}
}

/// Current value of a relationship
#[derive(Debug, Clone)]
pub enum Related {
	One(ModelRef),
	Many(Vec<ModelRef>),
}

impl Related {
	pub fn cardinality(&self) -> Cardinality {
		match self {
			Related::One(_) => Cardinality::One,
			Related::Many(_) => Cardinality::Many,
		}
	}

	/// Related models in relationship order
	pub fn models(&self) -> Vec<ModelRef> {
		match self {
			Related::One(model) => vec![model.clone()],
			Related::Many(models) => models.clone(),
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Related::Many(models) if models.is_empty())
	}
}

#[derive(Default)]
struct Record {
	id: Option<String>,
	temp_id: Option<String>,
	persisted: bool,
	values: HashMap<String, Value>,
	relationships: HashMap<String, Related>,
	meta: Option<Map<String, Value>>,
	meta_dirty: bool,
	marked_for_destruction: bool,
	marked_for_disassociation: bool,
}

/// Shared handle to a model instance
///
/// Cloning the handle does not copy the instance; both clones observe the
/// same state and compare equal under [`ModelRef::ptr_eq`].
#[derive(Clone)]
pub struct ModelRef {
	schema: Arc<ModelSchema>,
	record: Arc<RwLock<Record>>,
}

impl ModelRef {
	/// Create a new, unpersisted instance with no attributes carried
	pub fn new(schema: &Arc<ModelSchema>) -> Self {
		Self {
			schema: Arc::clone(schema),
			record: Arc::new(RwLock::new(Record::default())),
		}
	}

	pub fn schema(&self) -> &Arc<ModelSchema> {
		&self.schema
	}

	pub fn resource_type(&self) -> &str {
		self.schema.jsonapi_type()
	}

	/// Stable identity of the shared instance for the lifetime of the handle
	pub fn identity(&self) -> usize {
		Arc::as_ptr(&self.record) as *const () as usize
	}

	pub fn ptr_eq(&self, other: &ModelRef) -> bool {
		Arc::ptr_eq(&self.record, &other.record)
	}

	pub fn id(&self) -> Option<String> {
		self.record.read().id.clone()
	}

	pub fn set_id(&self, id: impl Into<String>) {
		self.record.write().id = Some(id.into());
	}

	pub fn clear_id(&self) {
		self.record.write().id = None;
	}

	pub fn is_persisted(&self) -> bool {
		self.record.read().persisted
	}

	pub fn set_persisted(&self, persisted: bool) {
		self.record.write().persisted = persisted;
	}

	/// Client-assigned identifier for a record the server has not seen yet
	pub fn temp_id(&self) -> Option<String> {
		self.record.read().temp_id.clone()
	}

	pub fn set_temp_id(&self, temp_id: impl Into<String>) {
		self.record.write().temp_id = Some(temp_id.into());
	}

	/// Assign attributes (and optionally `id`) from a JSON object
	///
	/// Every key other than `id` must be a declared attribute, and `id` must
	/// be a string or an integer. Nothing is assigned when any key is
	/// rejected.
	pub fn assign(&self, values: Value) -> ModelResult<()> {
		let values = match values {
			Value::Object(values) => values,
			other => {
				return Err(ModelError::NotAnObject {
					context: format!("'{}' attributes", self.resource_type()),
					found: json_kind(&other).to_string(),
				});
			}
		};

		if let Some(unknown) = values
			.keys()
			.find(|key| key.as_str() != "id" && self.schema.attribute(key).is_none())
		{
			return Err(self.unknown_attribute(unknown));
		}
		let id = match values.get("id") {
			Some(value) => Some(self.id_from_value(value)?),
			None => None,
		};

		let mut record = self.record.write();
		if let Some(id) = id {
			record.id = Some(id);
		}
		for (key, value) in values {
			if key != "id" {
				record.values.insert(key, value);
			}
		}
		Ok(())
	}

	/// Current value of an attribute, `None` if it was never assigned
	pub fn attribute(&self, name: &str) -> Option<Value> {
		self.record.read().values.get(name).cloned()
	}

	pub fn set_attribute(&self, name: &str, value: impl Into<Value>) -> ModelResult<()> {
		if self.schema.attribute(name).is_none() {
			return Err(self.unknown_attribute(name));
		}
		self.record
			.write()
			.values
			.insert(name.to_string(), value.into());
		Ok(())
	}

	/// Stop carrying an attribute, returning its previous value
	pub fn unset_attribute(&self, name: &str) -> Option<Value> {
		self.record.write().values.remove(name)
	}

	/// Current value of a relationship, `None` when absent
	pub fn related(&self, name: &str) -> Option<Related> {
		self.record.read().relationships.get(name).cloned()
	}

	/// Set or clear a to-one relationship
	pub fn set_one(&self, name: &str, target: Option<ModelRef>) -> ModelResult<()> {
		self.expect_cardinality(name, Cardinality::One)?;
		let mut record = self.record.write();
		match target {
			Some(target) => {
				record
					.relationships
					.insert(name.to_string(), Related::One(target));
			}
			None => {
				record.relationships.remove(name);
			}
		}
		Ok(())
	}

	/// Replace the contents of a to-many relationship
	pub fn set_many(&self, name: &str, targets: Vec<ModelRef>) -> ModelResult<()> {
		self.expect_cardinality(name, Cardinality::Many)?;
		self.record
			.write()
			.relationships
			.insert(name.to_string(), Related::Many(targets));
		Ok(())
	}

	/// Append to a to-many relationship
	pub fn push_related(&self, name: &str, target: ModelRef) -> ModelResult<()> {
		self.expect_cardinality(name, Cardinality::Many)?;
		let mut record = self.record.write();
		match record.relationships.get_mut(name) {
			Some(Related::Many(models)) => models.push(target),
			_ => {
				record
					.relationships
					.insert(name.to_string(), Related::Many(vec![target]));
			}
		}
		Ok(())
	}

	/// Set metadata, marking it dirty when `dirty` is true
	///
	/// The dirty flag is sticky: once set, a later call with `dirty = false`
	/// replaces the value but does not clear the flag.
	pub fn set_meta(&self, meta: Value, dirty: bool) -> ModelResult<()> {
		let meta = match meta {
			Value::Object(meta) => meta,
			other => {
				return Err(ModelError::NotAnObject {
					context: format!("'{}' metadata", self.resource_type()),
					found: json_kind(&other).to_string(),
				});
			}
		};
		let mut record = self.record.write();
		record.meta = Some(meta);
		record.meta_dirty |= dirty;
		Ok(())
	}

	pub fn meta(&self) -> Option<Map<String, Value>> {
		self.record.read().meta.clone()
	}

	pub fn is_meta_dirty(&self) -> bool {
		self.record.read().meta_dirty
	}

	/// Metadata if it was explicitly marked dirty, read under a single lock
	pub fn dirty_meta(&self) -> Option<Map<String, Value>> {
		let record = self.record.read();
		if record.meta_dirty {
			record.meta.clone()
		} else {
			None
		}
	}

	/// Forget that metadata was modified, e.g. after a successful save
	pub fn mark_meta_clean(&self) {
		self.record.write().meta_dirty = false;
	}

	pub fn mark_for_destruction(&self) {
		let mut record = self.record.write();
		record.marked_for_destruction = true;
		record.marked_for_disassociation = false;
	}

	pub fn mark_for_disassociation(&self) {
		let mut record = self.record.write();
		record.marked_for_disassociation = true;
		record.marked_for_destruction = false;
	}

	pub fn clear_marks(&self) {
		let mut record = self.record.write();
		record.marked_for_destruction = false;
		record.marked_for_disassociation = false;
	}

	pub fn is_marked_for_destruction(&self) -> bool {
		self.record.read().marked_for_destruction
	}

	pub fn is_marked_for_disassociation(&self) -> bool {
		self.record.read().marked_for_disassociation
	}

	fn expect_cardinality(&self, name: &str, found: Cardinality) -> ModelResult<()> {
		let def = self
			.schema
			.relationship(name)
			.ok_or_else(|| ModelError::UnknownRelationship {
				resource_type: self.resource_type().to_string(),
				name: name.to_string(),
			})?;
		if def.cardinality != found {
			return Err(ModelError::CardinalityMismatch {
				resource_type: self.resource_type().to_string(),
				name: name.to_string(),
				expected: def.cardinality,
				found,
			});
		}
		Ok(())
	}

	fn id_from_value(&self, value: &Value) -> ModelResult<String> {
		match value {
			Value::String(id) => Ok(id.clone()),
			Value::Number(id) if id.is_i64() || id.is_u64() => Ok(id.to_string()),
			other => Err(ModelError::InvalidId {
				resource_type: self.resource_type().to_string(),
				found: json_kind(other).to_string(),
			}),
		}
	}

	fn unknown_attribute(&self, name: &str) -> ModelError {
		ModelError::UnknownAttribute {
			resource_type: self.resource_type().to_string(),
			name: name.to_string(),
		}
	}
}

// Relationships may be cyclic, so Debug never descends into them.
impl fmt::Debug for ModelRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let record = self.record.read();
		f.debug_struct("ModelRef")
			.field("type", &self.schema.jsonapi_type)
			.field("id", &record.id)
			.field("persisted", &record.persisted)
			.field("identity", &format_args!("{:#x}", self.identity()))
			.finish()
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
