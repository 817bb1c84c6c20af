//! Typed JSON:API write document
//!
//! Empty containers are never serialized: `attributes`, `relationships`,
//! `meta` and `included` are skipped when empty so the rendered JSON has the
//! keys absent rather than present-but-empty.

use crate::error::PayloadResult;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// What the server should do with a referenced resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMethod {
	Create,
	Update,
	Destroy,
	Disassociate,
}

/// Minimal `{ type, id }` reference to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
	#[serde(rename = "type")]
	pub resource_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(rename = "temp-id", skip_serializing_if = "Option::is_none")]
	pub temp_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub method: Option<WriteMethod>,
}

impl ResourceIdentifier {
	pub fn new(resource_type: impl Into<String>) -> Self {
		Self {
			resource_type: resource_type.into(),
			id: None,
			temp_id: None,
			method: None,
		}
	}

	pub fn with_id(mut self, id: Option<String>) -> Self {
		self.id = id;
		self
	}

	pub fn with_temp_id(mut self, temp_id: Option<String>) -> Self {
		self.temp_id = temp_id;
		self
	}

	pub fn with_method(mut self, method: WriteMethod) -> Self {
		self.method = Some(method);
		self
	}
}

/// Resource linkage: a single identifier or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceLinkage {
	One(ResourceIdentifier),
	Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipObject {
	pub data: ResourceLinkage,
}

/// A resource body, used both for `data` and for `included` entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
	#[serde(rename = "type")]
	pub resource_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(rename = "temp-id", skip_serializing_if = "Option::is_none")]
	pub temp_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub method: Option<WriteMethod>,
	#[serde(skip_serializing_if = "Map::is_empty")]
	pub attributes: Map<String, Value>,
	#[serde(skip_serializing_if = "IndexMap::is_empty")]
	pub relationships: IndexMap<String, RelationshipObject>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<Map<String, Value>>,
}

impl ResourceObject {
	pub fn new(resource_type: impl Into<String>) -> Self {
		Self {
			resource_type: resource_type.into(),
			id: None,
			temp_id: None,
			method: None,
			attributes: Map::new(),
			relationships: IndexMap::new(),
			meta: None,
		}
	}

	/// Take id, temp-id and method from the identifier pointing here
	pub fn set_identifier(&mut self, identifier: ResourceIdentifier) {
		self.id = identifier.id;
		self.temp_id = identifier.temp_id;
		self.method = identifier.method;
	}
}

/// Top-level write document: `{ data, included? }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
	pub data: ResourceObject,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub included: Vec<ResourceObject>,
}

impl Document {
	pub fn to_value(&self) -> PayloadResult<Value> {
		Ok(serde_json::to_value(self)?)
	}

	pub fn to_json_string(&self) -> PayloadResult<String> {
		Ok(serde_json::to_string(self)?)
	}
}
