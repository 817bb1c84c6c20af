//! Relationship inclusion policy
//!
//! For every declared relationship of a model the resolver decides which
//! related models are written and how:
//!
//! | target      | named in include list            | not named                |
//! |-------------|----------------------------------|--------------------------|
//! | persisted   | identifier + method, full body   | identifier only          |
//! | unpersisted | `create` entry if inline creation is enabled, else dropped | dropped |
//!
//! The resolver only classifies; rendering and cycle detection happen in the
//! write payload. Include lists are checked against schemas up front by
//! [`validate_includes`], independent of which models the graph holds.

use crate::config::SerializerConfig;
use crate::document::WriteMethod;
use crate::error::{PayloadError, PayloadResult};
use crate::include::IncludeDirective;
use inkjet_core::{Cardinality, ModelRef, ModelSchema};
use tracing::trace;

/// Check every path of `directive` against declared relationships
///
/// Each name must be declared on the schema at its level; descending past
/// a name requires its target type to be resolvable through the schema's
/// registry.
pub fn validate_includes(schema: &ModelSchema, directive: &IncludeDirective) -> PayloadResult<()> {
	for (name, nested) in directive.entries() {
		let Some(def) = schema.relationship(name) else {
			return Err(PayloadError::UnknownRelationship {
				resource_type: schema.jsonapi_type().to_string(),
				name: name.to_string(),
			});
		};
		if nested.is_empty() {
			continue;
		}
		let target = schema.target_schema(name).ok_or_else(|| {
			PayloadError::UnresolvedRelationshipTarget {
				resource_type: schema.jsonapi_type().to_string(),
				name: name.to_string(),
				target: def.target.clone(),
			}
		})?;
		validate_includes(&target, nested)?;
	}
	Ok(())
}

/// How a related model appears in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
	/// `{ type, id }` only; the related model is not walked
	Reference,
	/// Identifier with a write method, plus a full body in `included`
	Write(WriteMethod),
}

#[derive(Debug, Clone)]
pub struct ResolvedTarget {
	pub model: ModelRef,
	pub linkage: Linkage,
}

/// A relationship that survived the inclusion policy
#[derive(Debug, Clone)]
pub struct ResolvedRelationship {
	/// Declared (uncased) name
	pub name: String,
	pub cardinality: Cardinality,
	/// Never empty, in the model's own order
	pub targets: Vec<ResolvedTarget>,
}

pub struct RelationshipResolver<'a> {
	config: &'a SerializerConfig,
}

impl<'a> RelationshipResolver<'a> {
	pub fn new(config: &'a SerializerConfig) -> Self {
		Self { config }
	}

	/// Relationships of `model` to write, in declaration order
	///
	/// Names in `directive` that `model` does not declare are ignored;
	/// [`validate_includes`] rejects them before any walk starts.
	pub fn resolve(&self, model: &ModelRef, directive: &IncludeDirective) -> Vec<ResolvedRelationship> {
		if !self.config.traverse_relationships {
			return Vec::new();
		}

		let mut resolved = Vec::new();
		for def in model.schema().relationships() {
			let Some(related) = model.related(&def.name).filter(|related| !related.is_empty()) else {
				continue;
			};
			let explicit = directive.contains(&def.name);

			let targets: Vec<_> = related
				.models()
				.into_iter()
				.filter_map(|target| {
					let linkage = self.classify(&target, explicit);
					if linkage.is_none() {
						trace!(
							resource_type = model.resource_type(),
							relationship = %def.name,
							target_type = target.resource_type(),
							explicit,
							"holding back unrepresentable related model"
						);
					}
					linkage.map(|linkage| ResolvedTarget {
						model: target,
						linkage,
					})
				})
				.collect();

			if targets.is_empty() {
				continue;
			}
			resolved.push(ResolvedRelationship {
				name: def.name.clone(),
				cardinality: def.cardinality,
				targets,
			});
		}
		resolved
	}

	fn classify(&self, target: &ModelRef, explicit: bool) -> Option<Linkage> {
		if target.is_persisted() {
			// A persisted record without an id cannot be referenced
			target.id()?;
			if explicit {
				Some(Linkage::Write(write_method(target)))
			} else {
				Some(Linkage::Reference)
			}
		} else if explicit && self.config.inline_creation {
			Some(Linkage::Write(WriteMethod::Create))
		} else {
			None
		}
	}
}

/// Method an included model is written with
pub(crate) fn write_method(model: &ModelRef) -> WriteMethod {
	if !model.is_persisted() {
		WriteMethod::Create
	} else if model.is_marked_for_destruction() {
		WriteMethod::Destroy
	} else if model.is_marked_for_disassociation() {
		WriteMethod::Disassociate
	} else {
		WriteMethod::Update
	}
}
