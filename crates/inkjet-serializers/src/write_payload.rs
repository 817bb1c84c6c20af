//! Write payload assembly
//!
//! [`WritePayload`] turns a model and an include list into the document sent
//! with a create/update request:
//!
//! ```text
//! { data: { type, id?, temp-id?, attributes?, relationships?, meta? },
//!   included?: [ { type, id | temp-id, method, attributes?, relationships?, meta? } ] }
//! ```
//!
//! Rendering is synchronous and happens in two steps. The walk first plans
//! which models are written in full, following the include list; a model
//! reached through several include paths is planned once with the union of
//! those paths. Each planned model is then rendered exactly once into
//! `included`, parent before children, and every reference to it
//! (including back-references to the root) is an identifier.

use crate::attributes::serialize_attributes;
use crate::config::SerializerConfig;
use crate::document::{
	Document, RelationshipObject, ResourceIdentifier, ResourceLinkage, ResourceObject, WriteMethod,
};
use crate::error::{PayloadError, PayloadResult};
use crate::include::IncludeDirective;
use crate::meta::serialize_meta;
use crate::recursive::SerializationContext;
use crate::relations::{Linkage, RelationshipResolver, validate_includes, write_method};
use inkjet_core::{Cardinality, ModelRef};
use serde_json::Value;
use tracing::{debug, trace};

/// Transient serializer for one model
///
/// # Examples
///
/// ```
/// use inkjet_core::{AttributeKind, ModelRef, ModelSchema};
/// use inkjet_serializers::{SerializerConfig, WritePayload};
/// use serde_json::json;
///
/// let people = ModelSchema::builder("people")
///     .attribute("first_name", AttributeKind::String)
///     .build();
/// let person = ModelRef::new(&people);
/// person.assign(json!({ "first_name": "Joe" })).unwrap();
///
/// let json = WritePayload::new(&person)
///     .as_json(&SerializerConfig::default())
///     .unwrap();
/// assert_eq!(json, json!({ "data": { "type": "people", "attributes": { "first_name": "Joe" } } }));
/// ```
#[derive(Debug, Clone)]
pub struct WritePayload {
	model: ModelRef,
	includes: IncludeDirective,
}

impl WritePayload {
	pub fn new(model: &ModelRef) -> Self {
		Self {
			model: model.clone(),
			includes: IncludeDirective::new(),
		}
	}

	/// Name relationships to write in full, as dotted paths
	pub fn with_includes<I, S>(mut self, paths: I) -> PayloadResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.includes = IncludeDirective::parse(paths)?;
		Ok(self)
	}

	pub fn with_directive(mut self, includes: IncludeDirective) -> Self {
		self.includes = includes;
		self
	}

	pub fn model(&self) -> &ModelRef {
		&self.model
	}

	pub fn includes(&self) -> &IncludeDirective {
		&self.includes
	}

	/// Render the typed document
	///
	/// The include list is checked against the model's schema before any
	/// rendering, so the outcome never depends on which related models the
	/// graph currently holds.
	pub fn to_document(&self, config: &SerializerConfig) -> PayloadResult<Document> {
		config.validate()?;
		let depth = self.includes.depth();
		if depth > config.max_include_depth {
			return Err(PayloadError::IncludeTooDeep {
				path: self.includes.deepest_path(),
				depth,
				max_depth: config.max_include_depth,
			});
		}
		validate_includes(self.model.schema(), &self.includes)?;

		debug!(
			resource_type = self.model.resource_type(),
			includes = %self.includes,
			traverse_relationships = config.traverse_relationships,
			"rendering write payload"
		);

		let document = DocumentAssembler::new(config).assemble(&self.model, &self.includes);

		debug!(
			resource_type = self.model.resource_type(),
			included = document.included.len(),
			"write payload rendered"
		);
		Ok(document)
	}

	/// Render the document as JSON
	pub fn as_json(&self, config: &SerializerConfig) -> PayloadResult<Value> {
		self.to_document(config)?.to_value()
	}
}

struct DocumentAssembler<'a> {
	resolver: RelationshipResolver<'a>,
	context: SerializationContext,
}

impl<'a> DocumentAssembler<'a> {
	fn new(config: &'a SerializerConfig) -> Self {
		Self {
			resolver: RelationshipResolver::new(config),
			context: SerializationContext::new(),
		}
	}

	fn assemble(mut self, root: &ModelRef, includes: &IncludeDirective) -> Document {
		self.context.visit(root, includes);
		self.plan(root);

		let planned: Vec<(ModelRef, IncludeDirective)> = self
			.context
			.planned()
			.map(|(model, includes)| (model.clone(), includes.clone()))
			.collect();

		let mut data = None;
		let mut included = Vec::with_capacity(planned.len().saturating_sub(1));
		for (model, includes) in &planned {
			let mut resource = self.render(model, includes);
			if model.ptr_eq(root) {
				data = Some(resource);
			} else {
				resource.set_identifier(self.identifier_for(model, write_method(model)));
				included.push(resource);
			}
		}

		let mut data = data.unwrap_or_else(|| self.render(root, includes));
		if root.is_persisted() {
			data.id = root.id();
		} else {
			// Generated temp-ids only exist when a back-reference needed one
			data.temp_id = root
				.temp_id()
				.or_else(|| self.context.assigned_temp_id(root));
		}

		Document { data, included }
	}

	/// Walk the models `model` writes in full, recording the include paths
	/// each one is reached with
	fn plan(&mut self, model: &ModelRef) {
		let includes = self.context.includes_for(model).cloned().unwrap_or_default();
		let empty = IncludeDirective::new();

		for relationship in self.resolver.resolve(model, &includes) {
			let nested = includes.get(&relationship.name).unwrap_or(&empty);
			for target in &relationship.targets {
				if target.linkage == Linkage::Reference {
					continue;
				}
				if self.context.visit(&target.model, nested) {
					self.context.enter();
					self.plan(&target.model);
					self.context.leave();
				} else {
					trace!(
						resource_type = target.model.resource_type(),
						depth = self.context.current_depth(),
						"model already planned, writing identifier only"
					);
				}
			}
		}
	}

	/// Body of `model` without id or method
	fn render(&mut self, model: &ModelRef, includes: &IncludeDirective) -> ResourceObject {
		let mut resource = ResourceObject::new(model.resource_type());
		resource.attributes = serialize_attributes(model);
		resource.meta = serialize_meta(model);

		let key_case = model.schema().key_case();
		for relationship in self.resolver.resolve(model, includes) {
			let mut identifiers = Vec::with_capacity(relationship.targets.len());
			for target in &relationship.targets {
				identifiers.push(self.link(&target.model, target.linkage));
			}

			let data = match relationship.cardinality {
				Cardinality::One => match identifiers.pop() {
					Some(identifier) => ResourceLinkage::One(identifier),
					None => continue,
				},
				Cardinality::Many => ResourceLinkage::Many(identifiers),
			};
			resource.relationships.insert(
				key_case.transform(&relationship.name),
				RelationshipObject { data },
			);
		}

		resource
	}

	fn link(&mut self, target: &ModelRef, linkage: Linkage) -> ResourceIdentifier {
		match linkage {
			Linkage::Reference => ResourceIdentifier::new(target.resource_type()).with_id(target.id()),
			Linkage::Write(method) => self.identifier_for(target, method),
		}
	}

	fn identifier_for(&mut self, target: &ModelRef, method: WriteMethod) -> ResourceIdentifier {
		let identifier = ResourceIdentifier::new(target.resource_type()).with_method(method);
		match method {
			WriteMethod::Create => {
				identifier.with_temp_id(Some(self.context.temp_id_for(target)))
			}
			_ => identifier.with_id(target.id()),
		}
	}
}
