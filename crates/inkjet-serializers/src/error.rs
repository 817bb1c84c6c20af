//! Errors surfaced at the write-payload call boundary
//!
//! Problems inside the graph walk degrade silently (unresolvable
//! relationships are dropped); only malformed caller input ends up here.

/// Result type for write-payload operations
pub type PayloadResult<T> = Result<T, PayloadError>;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
	#[error("'{resource_type}' has no relationship named '{name}'")]
	UnknownRelationship { resource_type: String, name: String },

	#[error(
		"cannot include through '{name}' on '{resource_type}': target type '{target}' is not registered"
	)]
	UnresolvedRelationshipTarget {
		resource_type: String,
		name: String,
		target: String,
	},

	#[error("invalid include path '{path}': {message}")]
	InvalidIncludePath { path: String, message: String },

	#[error("include path '{path}' is {depth} levels deep, maximum is {max_depth}")]
	IncludeTooDeep {
		path: String,
		depth: usize,
		max_depth: usize,
	},

	#[error("invalid value for '{key}': {message}")]
	Config { key: String, message: String },

	#[error("failed to parse serializer config: {0}")]
	ConfigParse(#[from] toml::de::Error),

	#[error("failed to render document: {0}")]
	Json(#[from] serde_json::Error),
}
