//! Attribute extraction and coercion

use inkjet_core::{AttributeKind, ModelRef};
use serde_json::{Map, Value};

/// Coerce a value according to its declared kind
///
/// A numeric attribute holding an empty string (a cleared form input) is
/// sent as `null`; strict backends reject `""` for numbers. String
/// attributes keep `""` verbatim, and attributes of undetermined kind are
/// passed through untouched.
///
/// # Examples
///
/// ```
/// use inkjet_core::AttributeKind;
/// use inkjet_serializers::attributes::coerce;
/// use serde_json::{json, Value};
///
/// assert_eq!(coerce(AttributeKind::Number, json!("")), Value::Null);
/// assert_eq!(coerce(AttributeKind::String, json!("")), json!(""));
/// assert_eq!(coerce(AttributeKind::Number, json!(23)), json!(23));
/// ```
pub fn coerce(kind: AttributeKind, value: Value) -> Value {
	match (kind, &value) {
		(AttributeKind::Number, Value::String(s)) if s.is_empty() => Value::Null,
		_ => value,
	}
}

/// Writable attributes carried by `model`, keyed in the model's casing
///
/// Attributes are emitted in declaration order. Attributes that were never
/// assigned and read-only attributes are left out.
pub fn serialize_attributes(model: &ModelRef) -> Map<String, Value> {
	let schema = model.schema();
	let key_case = schema.key_case();

	let mut attributes = Map::new();
	for def in schema.attributes().iter().filter(|def| def.persist) {
		let Some(value) = model.attribute(&def.name) else {
			continue;
		};
		attributes.insert(key_case.transform(&def.name), coerce(def.kind, value));
	}
	attributes
}
