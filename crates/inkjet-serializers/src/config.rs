//! Serializer configuration
//!
//! Every recognised option is a field of [`SerializerConfig`]; unknown keys
//! are rejected when loading from TOML.

use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};

/// Options consulted by a single rendering call
///
/// # Examples
///
/// ```
/// use inkjet_serializers::SerializerConfig;
///
/// let config = SerializerConfig::from_toml_str("traverse_relationships = false").unwrap();
/// assert!(!config.traverse_relationships);
/// assert!(!config.inline_creation);
/// assert_eq!(config.max_include_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerConfig {
	/// Walk relationships at all; when false `relationships` and `included`
	/// are omitted regardless of the include list
	pub traverse_relationships: bool,
	/// Write unpersisted, explicitly included targets as `create` entries
	pub inline_creation: bool,
	/// Deepest include path accepted, counted in relationship hops
	pub max_include_depth: usize,
}

impl Default for SerializerConfig {
	fn default() -> Self {
		Self {
			traverse_relationships: true,
			inline_creation: false,
			max_include_depth: 8,
		}
	}
}

impl SerializerConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Configuration that renders attributes and meta only
	pub fn attributes_only() -> Self {
		Self::default().with_traverse_relationships(false)
	}

	pub fn with_traverse_relationships(mut self, traverse: bool) -> Self {
		self.traverse_relationships = traverse;
		self
	}

	pub fn with_inline_creation(mut self, inline_creation: bool) -> Self {
		self.inline_creation = inline_creation;
		self
	}

	pub fn with_max_include_depth(mut self, max_include_depth: usize) -> Self {
		self.max_include_depth = max_include_depth;
		self
	}

	/// Parse and validate a TOML document
	pub fn from_toml_str(source: &str) -> PayloadResult<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> PayloadResult<()> {
		if self.max_include_depth == 0 {
			return Err(PayloadError::Config {
				key: "max_include_depth".to_string(),
				message: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}
