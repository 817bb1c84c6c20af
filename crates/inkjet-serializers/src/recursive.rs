//! Cycle detection for a single rendering pass
//!
//! Model graphs may be cyclic (an author referencing its books, each book
//! referencing the author). [`SerializationContext`] records which instances
//! are to be rendered in full during the current pass, keyed by the identity
//! of their shared allocation, so the walk never loops and each resource
//! lands in `included` at most once.
//!
//! A model reached through several include paths is rendered once, with the
//! union of the sub-directives of every path that reached it.

use crate::include::IncludeDirective;
use indexmap::IndexMap;
use inkjet_core::ModelRef;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Planned {
	/// Held so the identity key stays valid for the whole pass
	model: ModelRef,
	includes: IncludeDirective,
}

/// Per-call visitation state
///
/// Created at the start of a rendering call and dropped at its end; it is
/// never stored on the models themselves.
#[derive(Debug, Clone, Default)]
pub struct SerializationContext {
	/// Current depth level (0 = root)
	current_depth: usize,
	/// Models to render in full, in discovery order
	planned: IndexMap<usize, Planned>,
	/// Temp-ids handed out to unpersisted models during this pass
	temp_ids: HashMap<usize, (ModelRef, String)>,
}

impl SerializationContext {
	/// Create a new serialization context
	///
	/// # Examples
	///
	/// ```
	/// use inkjet_serializers::recursive::SerializationContext;
	///
	/// let context = SerializationContext::new();
	/// assert_eq!(context.current_depth(), 0);
	/// assert_eq!(context.visited_count(), 0);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn current_depth(&self) -> usize {
		self.current_depth
	}

	/// Visit a model with the include paths the current route asks for
	///
	/// Returns `true` when the model must be walked: the first time it is
	/// visited, and whenever `includes` adds paths earlier visits did not
	/// request. Returns `false` otherwise, through whichever handle.
	///
	/// # Examples
	///
	/// ```
	/// use inkjet_core::{ModelRef, ModelSchema};
	/// use inkjet_serializers::IncludeDirective;
	/// use inkjet_serializers::recursive::SerializationContext;
	///
	/// let people = ModelSchema::builder("people").build();
	/// let person = ModelRef::new(&people);
	/// let none = IncludeDirective::new();
	///
	/// let mut context = SerializationContext::new();
	/// assert!(context.visit(&person, &none));
	/// assert!(!context.visit(&person.clone(), &none)); // Already visited
	/// ```
	pub fn visit(&mut self, model: &ModelRef, includes: &IncludeDirective) -> bool {
		match self.planned.get_mut(&model.identity()) {
			Some(planned) => planned.includes.merge(includes),
			None => {
				self.planned.insert(
					model.identity(),
					Planned {
						model: model.clone(),
						includes: includes.clone(),
					},
				);
				true
			}
		}
	}

	/// Union of the include paths that reached `model` so far
	pub fn includes_for(&self, model: &ModelRef) -> Option<&IncludeDirective> {
		self.planned
			.get(&model.identity())
			.map(|planned| &planned.includes)
	}

	/// Visited models in discovery order with their merged include paths
	pub fn planned(&self) -> impl Iterator<Item = (&ModelRef, &IncludeDirective)> {
		self.planned
			.values()
			.map(|planned| (&planned.model, &planned.includes))
	}

	pub fn visited_count(&self) -> usize {
		self.planned.len()
	}

	/// Step one level deeper, before walking a related model
	pub fn enter(&mut self) {
		self.current_depth += 1;
	}

	/// Step back up after walking a related model
	pub fn leave(&mut self) {
		self.current_depth = self.current_depth.saturating_sub(1);
	}

	/// Temp-id for an unpersisted model
	///
	/// Uses the model's own temp-id when it has one; otherwise generates a
	/// UUID once per model so every reference within the pass agrees.
	pub fn temp_id_for(&mut self, model: &ModelRef) -> String {
		if let Some(temp_id) = model.temp_id() {
			return temp_id;
		}
		self.temp_ids
			.entry(model.identity())
			.or_insert_with(|| (model.clone(), uuid::Uuid::new_v4().to_string()))
			.1
			.clone()
	}

	/// Temp-id previously generated for `model`, if any
	pub fn assigned_temp_id(&self, model: &ModelRef) -> Option<String> {
		self.temp_ids
			.get(&model.identity())
			.map(|(_, temp_id)| temp_id.clone())
	}
}
