//! Metadata extraction
//!
//! Metadata is opaque: it is written exactly as the caller set it, with no
//! casing or coercion, and only when the caller marked it dirty.

use inkjet_core::ModelRef;
use serde_json::{Map, Value};

/// Dirty metadata of `model`, or `None` when it must not be sent
pub fn serialize_meta(model: &ModelRef) -> Option<Map<String, Value>> {
	model.dirty_meta().filter(|meta| !meta.is_empty())
}
