//! Key casing strategies
//!
//! Attribute and relationship names are declared once on a model schema and
//! written to the wire in the casing the server expects. [`KeyCase`] is the
//! per-schema strategy; it never touches resource type names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Casing strategy applied to attribute and relationship keys
///
/// Corresponds to the server-side key format of a JSON:API backend.
///
/// # Examples
///
/// ```
/// use inkjet_core::casing::KeyCase;
///
/// assert_eq!(KeyCase::Underscore.transform("firstName"), "first_name");
/// assert_eq!(KeyCase::Dash.transform("first_name"), "first-name");
/// assert_eq!(KeyCase::Camel.transform("first_name"), "firstName");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
	/// snake_case
	#[default]
	#[serde(alias = "snake")]
	Underscore,
	/// kebab-case
	#[serde(alias = "kebab")]
	Dash,
	/// camelCase
	Camel,
}

impl KeyCase {
	/// Transform a key according to the strategy
	///
	/// The input may be written in any of the supported casings; it is split
	/// into words first, so `"firstName"`, `"first_name"` and `"first-name"`
	/// all produce the same output.
	pub fn transform(&self, input: &str) -> String {
		let words = split_words(input);
		match self {
			KeyCase::Underscore => words.join("_"),
			KeyCase::Dash => words.join("-"),
			KeyCase::Camel => Self::to_camel_case(&words),
		}
	}

	fn to_camel_case(words: &[String]) -> String {
		let mut result = String::new();
		for (index, word) in words.iter().enumerate() {
			if index == 0 {
				result.push_str(word);
				continue;
			}
			let mut chars = word.chars();
			if let Some(first) = chars.next() {
				result.extend(first.to_uppercase());
				result.push_str(chars.as_str());
			}
		}
		result
	}
}

impl fmt::Display for KeyCase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			KeyCase::Underscore => "underscore",
			KeyCase::Dash => "dash",
			KeyCase::Camel => "camel",
		};
		f.write_str(name)
	}
}

/// Split an identifier into lowercase words
///
/// Separators are `_`, `-` and spaces. An uppercase letter starts a new word
/// after a lowercase letter or digit, and at the end of an acronym
/// (`"HTTPRequest"` -> `["http", "request"]`).
fn split_words(input: &str) -> Vec<String> {
	let chars: Vec<char> = input.chars().collect();
	let mut words = Vec::new();
	let mut current = String::new();

	for (i, &ch) in chars.iter().enumerate() {
		if ch == '_' || ch == '-' || ch == ' ' {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}
			continue;
		}

		if ch.is_uppercase() && !current.is_empty() {
			// current is non-empty, so i > 0 and the previous char is not a separator
			let prev = chars[i - 1];
			let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
			if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
			{
				words.push(std::mem::take(&mut current));
			}
		}

		current.extend(ch.to_lowercase());
	}

	if !current.is_empty() {
		words.push(current);
	}
	words
}
