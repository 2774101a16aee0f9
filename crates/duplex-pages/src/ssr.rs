//! Static (server-side) rendering to an HTML string.
//!
//! [`StaticRenderer`] walks a [`Node`](crate::node::Node) tree, awaits pending
//! values, invokes components, and asks the attribute handlers for each
//! element's markup and trailing scripts. The flat fragment list is then run
//! through [`assemble_document`], which builds a full
//! `<!DOCTYPE html><html><head>…</head><body>…</body></html>` document when
//! the tree contains document-structure elements, and optionally through
//! [`compact`].

mod compact;
mod document;
mod renderer;

pub use compact::compact;
pub(crate) use compact::{protect_literals, restore_literals};
pub use document::assemble_document;
pub use renderer::StaticRenderer;

use serde::{Deserialize, Serialize};

use crate::handlers::IdAlphabet;

/// Options for static rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Whether to run the compaction pass over the output.
	pub minify: bool,
	/// Alphabet generated element ids are drawn from.
	pub id_alphabet: IdAlphabet,
}

impl RenderOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables or disables compaction.
	pub fn minify(mut self, enable: bool) -> Self {
		self.minify = enable;
		self
	}

	/// Sets the alphabet for generated element ids.
	pub fn id_alphabet(mut self, alphabet: IdAlphabet) -> Self {
		self.id_alphabet = alphabet;
		self
	}
}
