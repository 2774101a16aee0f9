//! Attribute handlers.
//!
//! Every attribute of an element is rendered either by a registered
//! [`AttributeHandler`] or by the default rule: `true` becomes a bare
//! attribute name, `false`/null/undefined are left out and anything else is
//! written as an escaped `key="value"` pair (or a `setAttribute` call when
//! generating client code).
//!
//! A handler is keyed by an exact attribute name or by a prefix written with a
//! trailing `*` (`"on*"`, `"data-*"`). Lookup tries exact keys first and then
//! prefixes, each in registration order. Each handler carries up to two
//! strategies, one producing static markup and one producing DOM-construction
//! statements.
//!
//! ## Example
//!
//! ```
//! use duplex_pages::handlers::{AttributeHandler, HandlerRegistry, StaticOutput};
//!
//! let registry = HandlerRegistry::new();
//! registry.register(AttributeHandler::new("data-*").on_static(|cx| StaticOutput {
//! 	html: format!(" {}=\"{}\"", cx.key, cx.value.to_attribute_text()),
//! 	..Default::default()
//! }));
//! assert_eq!(registry.len(), 1);
//! ```

mod registry;
mod standard;

pub use registry::{DomAttributes, HandlerRegistry, StaticAttributes};
pub use standard::standard_handlers;

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::node::{AttrValue, Attributes, Node};

/// Global object the client runtime installs its entry points on.
pub const RUNTIME_NAMESPACE: &str = "duplex";

/// Runtime entry point that mounts a reactive component.
pub const REACTIVE_COMPONENT_ENTRY: &str = "reactiveComponent";

/// Length of generated element ids.
pub const ELEMENT_ID_LENGTH: usize = 16;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const EXTENDED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Symbols generated element ids are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdAlphabet {
	/// `A-Z`, `a-z` and `0-9`.
	#[default]
	Alphanumeric,
	/// The alphanumeric set plus `-` and `_`.
	Extended,
}

impl IdAlphabet {
	fn symbols(self) -> &'static [u8] {
		match self {
			Self::Alphanumeric => ALPHANUMERIC,
			Self::Extended => EXTENDED,
		}
	}
}

/// Generates a random element id.
pub fn generate_element_id(alphabet: IdAlphabet) -> String {
	let symbols = alphabet.symbols();
	let mut rng = rand::thread_rng();
	(0..ELEMENT_ID_LENGTH)
		.map(|_| symbols[rng.gen_range(0..symbols.len())] as char)
		.collect()
}

/// Which attribute keys a handler applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKey {
	Exact(String),
	Prefix(String),
}

impl HandlerKey {
	/// Parses a key; a trailing `*` makes it a prefix.
	pub fn parse(key: &str) -> Self {
		match key.strip_suffix('*') {
			Some(prefix) => Self::Prefix(prefix.to_string()),
			None => Self::Exact(key.to_string()),
		}
	}

	pub fn matches(&self, key: &str) -> bool {
		match self {
			Self::Exact(exact) => exact == key,
			Self::Prefix(prefix) => key.starts_with(prefix.as_str()),
		}
	}

	pub fn is_prefix(&self) -> bool {
		matches!(self, Self::Prefix(_))
	}
}

impl fmt::Display for HandlerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Exact(key) => f.write_str(key),
			Self::Prefix(prefix) => write!(f, "{prefix}*"),
		}
	}
}

/// What a static strategy sees while rendering one attribute.
pub struct StaticContext<'a> {
	/// The attribute key being rendered.
	pub key: &'a str,
	/// The resolved value.
	pub value: AttrValue,
	/// All attributes of the element; handlers may delete keys that have not
	/// been rendered yet.
	pub attributes: &'a mut Attributes,
	/// The element's explicit or generated id.
	pub element_id: &'a str,
	/// Whether `element_id` came from an `id` attribute.
	pub explicit_id: bool,
}

/// What a DOM strategy sees while generating code for one attribute.
pub struct DomContext<'a> {
	pub key: &'a str,
	pub value: AttrValue,
	pub attributes: &'a mut Attributes,
	pub element_id: &'a str,
	pub explicit_id: bool,
	/// Variable holding the element in generated code.
	pub element_var: &'a str,
}

/// A script produced while rendering attributes statically.
#[derive(Debug)]
pub enum Script {
	/// Script source; inline scripts of one element share a `<script>` tag.
	Inline(String),
	/// A node rendered after the element as-is.
	Node(Node),
}

/// Output of a static strategy.
#[derive(Debug, Default)]
pub struct StaticOutput {
	/// Markup appended to the opening tag, including its leading space.
	pub html: String,
	pub scripts: Vec<Script>,
	/// The handler owns the element's children.
	pub lock_children: bool,
}

/// Output of a DOM strategy.
#[derive(Debug, Default)]
pub struct DomOutput {
	/// Statements appended after the element is created.
	pub fragments: Vec<String>,
	pub lock_children: bool,
}

pub type StaticStrategy = Arc<dyn Fn(&mut StaticContext<'_>) -> StaticOutput + Send + Sync>;
pub type DomStrategy = Arc<dyn Fn(&mut DomContext<'_>) -> DomOutput + Send + Sync>;

/// Per-key render behaviour.
///
/// A handler without a strategy for the current mode leaves the attribute to
/// the default rule.
#[derive(Clone)]
pub struct AttributeHandler {
	key: HandlerKey,
	static_strategy: Option<StaticStrategy>,
	dom_strategy: Option<DomStrategy>,
	reads_siblings: bool,
}

impl AttributeHandler {
	/// Creates a handler for `key` (`"name"` or `"prefix*"`).
	pub fn new(key: &str) -> Self {
		Self {
			key: HandlerKey::parse(key),
			static_strategy: None,
			dom_strategy: None,
			reads_siblings: false,
		}
	}

	/// Marks the handler as reading the element's other attributes. Every
	/// attribute still pending is then awaited, in declaration order, before
	/// the handler runs.
	pub fn reads_siblings(mut self) -> Self {
		self.reads_siblings = true;
		self
	}

	pub fn needs_resolved_siblings(&self) -> bool {
		self.reads_siblings
	}

	/// Sets the static markup strategy.
	pub fn on_static<F>(mut self, strategy: F) -> Self
	where
		F: Fn(&mut StaticContext<'_>) -> StaticOutput + Send + Sync + 'static,
	{
		self.static_strategy = Some(Arc::new(strategy));
		self
	}

	/// Sets the DOM code-generation strategy.
	pub fn on_dom<F>(mut self, strategy: F) -> Self
	where
		F: Fn(&mut DomContext<'_>) -> DomOutput + Send + Sync + 'static,
	{
		self.dom_strategy = Some(Arc::new(strategy));
		self
	}

	pub fn key(&self) -> &HandlerKey {
		&self.key
	}

	pub fn static_strategy(&self) -> Option<&StaticStrategy> {
		self.static_strategy.as_ref()
	}

	pub fn dom_strategy(&self) -> Option<&DomStrategy> {
		self.dom_strategy.as_ref()
	}
}

impl fmt::Debug for AttributeHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttributeHandler")
			.field("key", &self.key)
			.field("static", &self.static_strategy.is_some())
			.field("dom", &self.dom_strategy.is_some())
			.field("reads_siblings", &self.reads_siblings)
			.finish()
	}
}
