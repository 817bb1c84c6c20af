//! Relationship include directives
//!
//! The caller names the relationships that should be written in full as
//! dotted paths, the same shape as a JSON:API `include` parameter:
//! `"books"` includes the root's books, `"books.genre"` additionally includes
//! each book's genre. Paths are folded into a tree so each level of the walk
//! can look up its own sub-directive.

use crate::error::{PayloadError, PayloadResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tree of relationship names requested for inclusion
///
/// # Examples
///
/// ```
/// use inkjet_serializers::IncludeDirective;
///
/// let directive = IncludeDirective::parse(["books.genre", "genre"]).unwrap();
/// assert!(directive.contains("books"));
/// assert!(directive.get("books").unwrap().contains("genre"));
/// assert_eq!(directive.depth(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeDirective {
	children: BTreeMap<String, IncludeDirective>,
}

impl IncludeDirective {
	/// An empty directive: nothing is explicitly included
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a directive from dotted paths
	///
	/// Each item may itself be a comma-separated list. Empty segments
	/// (`"books..genre"`, `".books"`) are rejected.
	pub fn parse<I, S>(paths: I) -> PayloadResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut directive = Self::new();
		for item in paths {
			for path in item.as_ref().split(',') {
				directive.insert_path(path.trim())?;
			}
		}
		Ok(directive)
	}

	fn insert_path(&mut self, path: &str) -> PayloadResult<()> {
		if path.is_empty() {
			return Err(PayloadError::InvalidIncludePath {
				path: path.to_string(),
				message: "path is empty".to_string(),
			});
		}

		let mut node = self;
		for segment in path.split('.') {
			let segment = segment.trim();
			if segment.is_empty() {
				return Err(PayloadError::InvalidIncludePath {
					path: path.to_string(),
					message: "empty relationship name".to_string(),
				});
			}
			node = node.children.entry(segment.to_string()).or_default();
		}
		Ok(())
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.children.contains_key(name)
	}

	/// Sub-directive governing the related model's own relationships
	pub fn get(&self, name: &str) -> Option<&IncludeDirective> {
		self.children.get(name)
	}

	/// Relationship names at this level with their sub-directives
	pub fn entries(&self) -> impl Iterator<Item = (&str, &IncludeDirective)> {
		self.children
			.iter()
			.map(|(name, child)| (name.as_str(), child))
	}

	/// Add every path of `other` to this directive
	///
	/// Returns `true` when at least one path was new.
	pub fn merge(&mut self, other: &IncludeDirective) -> bool {
		let mut grew = false;
		for (name, child) in &other.children {
			match self.children.get_mut(name) {
				Some(existing) => grew |= existing.merge(child),
				None => {
					self.children.insert(name.clone(), child.clone());
					grew = true;
				}
			}
		}
		grew
	}

	/// Length of the longest path, in relationship hops
	pub fn depth(&self) -> usize {
		self.children
			.values()
			.map(|child| child.depth() + 1)
			.max()
			.unwrap_or(0)
	}

	/// The longest path, for error messages
	pub fn deepest_path(&self) -> String {
		let mut segments = Vec::new();
		let mut node = self;
		while let Some((name, child)) = node
			.children
			.iter()
			.max_by_key(|(_, child)| child.depth())
		{
			segments.push(name.as_str());
			node = child;
		}
		segments.join(".")
	}

	fn write_paths(&self, prefix: &str, out: &mut Vec<String>) {
		for (name, child) in &self.children {
			let path = if prefix.is_empty() {
				name.clone()
			} else {
				format!("{}.{}", prefix, name)
			};
			if child.is_empty() {
				out.push(path);
			} else {
				child.write_paths(&path, out);
			}
		}
	}
}

impl FromStr for IncludeDirective {
	type Err = PayloadError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.trim().is_empty() {
			return Ok(Self::new());
		}
		Self::parse([s])
	}
}

/// Renders the leaf paths comma-separated, e.g. `books.genre,genre`
impl fmt::Display for IncludeDirective {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut paths = Vec::new();
		self.write_paths("", &mut paths);
		f.write_str(&paths.join(","))
	}
}
