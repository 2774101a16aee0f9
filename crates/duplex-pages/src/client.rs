//! Client code generation.
//!
//! [`ClientRenderer`] turns a node tree into JavaScript statements that build
//! the same tree with DOM calls. Attribute behaviour comes from the same
//! handler registry the static renderer uses, in DOM mode, so event listeners,
//! relocated client functions and reactive components behave the same in
//! both outputs.

mod codegen;
mod minify;

pub use codegen::ClientRenderer;
pub use minify::{DOM_MEMBERS, GLOBAL_OBJECTS, minify_globals};

use serde::{Deserialize, Serialize};

use crate::handlers::IdAlphabet;

/// Options for client code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
	/// Variable the root element or fragment is assigned to.
	pub root_variable_name: String,
	/// Prefix for generated element variables.
	pub variable_prefix: String,
	/// Tag of the root element when not rendering into a fragment.
	pub root_tag: String,
	/// Whether to index common globals and DOM members through lookup tables.
	pub minify: bool,
	/// Whether the root is a document fragment instead of an element.
	pub as_fragment: bool,
	/// Whether to run the compaction pass over the generated code.
	pub compact: bool,
	/// Alphabet generated element ids are drawn from.
	pub id_alphabet: IdAlphabet,
}

impl Default for ClientOptions {
	fn default() -> Self {
		Self {
			root_variable_name: "root".to_string(),
			variable_prefix: "e".to_string(),
			root_tag: "div".to_string(),
			minify: false,
			as_fragment: false,
			compact: false,
			id_alphabet: IdAlphabet::default(),
		}
	}
}

impl ClientOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the root variable name.
	pub fn root_variable_name(mut self, name: impl Into<String>) -> Self {
		self.root_variable_name = name.into();
		self
	}

	/// Sets the prefix for generated element variables.
	pub fn variable_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.variable_prefix = prefix.into();
		self
	}

	/// Sets the root element's tag.
	pub fn root_tag(mut self, tag: impl Into<String>) -> Self {
		self.root_tag = tag.into();
		self
	}

	/// Enables or disables global/member minification.
	pub fn minify(mut self, enable: bool) -> Self {
		self.minify = enable;
		self
	}

	/// Renders into a document fragment instead of a root element.
	pub fn as_fragment(mut self, enable: bool) -> Self {
		self.as_fragment = enable;
		self
	}

	/// Enables or disables compaction.
	pub fn compact(mut self, enable: bool) -> Self {
		self.compact = enable;
		self
	}

	/// Sets the alphabet for generated element ids.
	pub fn id_alphabet(mut self, alphabet: IdAlphabet) -> Self {
		self.id_alphabet = alphabet;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_client_options_defaults() {
		let options = ClientOptions::default();
		assert_eq!(options.root_variable_name, "root");
		assert_eq!(options.variable_prefix, "e");
		assert_eq!(options.root_tag, "div");
		assert!(!options.minify && !options.as_fragment && !options.compact);
	}

	#[rstest]
	fn test_client_options_from_settings() {
		let options: ClientOptions =
			serde_json::from_str(r#"{"variable_prefix": "n", "as_fragment": true}"#).unwrap();
		assert_eq!(
			options,
			ClientOptions::new().variable_prefix("n").as_fragment(true)
		);
	}
}
