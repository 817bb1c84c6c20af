//! Error types for the model layer

use crate::model::Cardinality;

/// Result type for model mutations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when a model is assigned something its schema does not declare
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
	#[error("'{resource_type}' has no attribute named '{name}'")]
	UnknownAttribute { resource_type: String, name: String },

	#[error("'{resource_type}' has no relationship named '{name}'")]
	UnknownRelationship { resource_type: String, name: String },

	#[error("relationship '{name}' on '{resource_type}' is {expected}, not {found}")]
	CardinalityMismatch {
		resource_type: String,
		name: String,
		expected: Cardinality,
		found: Cardinality,
	},

	#[error("'{resource_type}' id must be a string or an integer, got {found}")]
	InvalidId { resource_type: String, found: String },

	#[error("expected a JSON object for {context}, got {found}")]
	NotAnObject { context: String, found: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_model_error_display() {
		let err = ModelError::UnknownAttribute {
			resource_type: "people".to_string(),
			name: "nickname".to_string(),
		};
		assert_eq!(err.to_string(), "'people' has no attribute named 'nickname'");

		let err = ModelError::CardinalityMismatch {
			resource_type: "authors".to_string(),
			name: "books".to_string(),
			expected: Cardinality::Many,
			found: Cardinality::One,
		};
		assert_eq!(
			err.to_string(),
			"relationship 'books' on 'authors' is to-many, not to-one"
		);
	}
}
