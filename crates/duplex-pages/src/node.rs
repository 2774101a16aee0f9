//! The node model consumed by both renderers.
//!
//! A [`Node`] is a primitive value, an [`Element`], an array of nodes, or a
//! pending value that resolves to another node. Elements carry either a tag
//! name or a [`Component`]; components are pure substitution and never appear
//! in rendered output.
//!
//! ## Example
//!
//! ```
//! use duplex_pages::node::{Element, Node};
//!
//! let tree = Element::new("div")
//! 	.attr("className", "greeting")
//! 	.child("hello")
//! 	.child(Element::new("br"))
//! 	.into_node();
//!
//! assert!(matches!(tree, Node::Element(_)));
//! ```

mod attributes;
mod component;

pub use attributes::{AttrValue, Attributes, RESERVED_KEYS};
pub use component::{Component, ComponentError, Props};

use std::fmt;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture};

/// Elements that never have children and always render self-closed.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// Returns whether `tag` is a void element.
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS
		.iter()
		.any(|void| void.eq_ignore_ascii_case(tag))
}

/// Renderable content.
pub enum Node {
	/// A string, emitted verbatim.
	Text(String),
	/// A number, formatted the way JavaScript's `String(n)` does.
	Number(f64),
	/// A boolean, rendered as `true` / `false`.
	Bool(bool),
	/// Renders nothing.
	Null,
	/// Renders nothing.
	Undefined,
	/// An element or component invocation.
	Element(Element),
	/// A list of nodes, flattened at render time.
	Array(Vec<Node>),
	/// A value that resolves asynchronously to another node.
	Pending(LocalBoxFuture<'static, Node>),
}

impl Node {
	/// Creates a verbatim text node.
	pub fn text(content: impl Into<String>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a text node whose content is HTML-escaped.
	///
	/// Plain text nodes are emitted verbatim so they can carry script bodies
	/// and raw markup; use this for untrusted content.
	pub fn escaped(content: &str) -> Self {
		Self::Text(crate::escape::escape_html(content))
	}

	/// The HTML5 doctype, as a raw text node.
	pub fn doctype() -> Self {
		Self::Text("<!DOCTYPE html>".to_string())
	}

	/// Creates an array node.
	pub fn fragment<I, N>(children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Node>,
	{
		Self::Array(children.into_iter().map(Into::into).collect())
	}

	/// Creates a node that resolves once `future` completes.
	pub fn pending<F>(future: F) -> Self
	where
		F: Future<Output = Node> + 'static,
	{
		Self::Pending(future.boxed_local())
	}

	/// Returns whether this is a primitive (text, number, boolean, null, undefined).
	pub fn is_primitive(&self) -> bool {
		matches!(
			self,
			Self::Text(_) | Self::Number(_) | Self::Bool(_) | Self::Null | Self::Undefined
		)
	}

	/// Stringifies a primitive node; `None` for elements, arrays and pending nodes.
	///
	/// Null and undefined stringify to the empty string.
	pub fn primitive_text(&self) -> Option<String> {
		match self {
			Self::Text(text) => Some(text.clone()),
			Self::Number(n) => Some(js_number(*n)),
			Self::Bool(b) => Some(b.to_string()),
			Self::Null | Self::Undefined => Some(String::new()),
			_ => None,
		}
	}

	/// Awaits this node until it is no longer pending.
	pub async fn resolve(mut self) -> Node {
		while let Node::Pending(future) = self {
			self = future.await;
		}
		self
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Null => f.write_str("Null"),
			Self::Undefined => f.write_str("Undefined"),
			Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
			Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
			Self::Pending(_) => f.write_str("Pending(..)"),
		}
	}
}

/// Formats a number like JavaScript's `String(n)`.
///
/// Magnitudes of `1e21` and above or below `1e-6` use exponent notation.
pub(crate) fn js_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
	} else if n == 0.0 {
		"0".to_string()
	} else if n.abs() >= 1e21 || n.abs() < 1e-6 {
		let formatted = format!("{n:e}");
		match formatted.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => {
				format!("{mantissa}e+{exponent}")
			}
			_ => formatted,
		}
	} else if n.fract() == 0.0 {
		format!("{n:.0}")
	} else {
		n.to_string()
	}
}

/// What an element renders as.
#[derive(Clone)]
pub enum ElementKind {
	/// A tag name such as `div`.
	Tag(String),
	/// A component invoked with the element's attributes and children.
	Component(Component),
}

impl fmt::Debug for ElementKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
			Self::Component(component) => f.debug_tuple("Component").field(&component.name()).finish(),
		}
	}
}

/// An element: a tag or component, attributes and ordered children.
#[derive(Debug)]
pub struct Element {
	kind: ElementKind,
	attributes: Attributes,
	children: Vec<Node>,
}

impl Element {
	/// Creates an element for a tag name.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			kind: ElementKind::Tag(tag.into()),
			attributes: Attributes::new(),
			children: Vec::new(),
		}
	}

	/// Creates an element that invokes `component`.
	pub fn component(component: Component) -> Self {
		Self {
			kind: ElementKind::Component(component),
			attributes: Attributes::new(),
			children: Vec::new(),
		}
	}

	/// Sets an attribute.
	pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.attributes.insert(key, value);
		self
	}

	/// Appends a child; an array child is spliced in one level deep.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		push_normalized(&mut self.children, child.into());
		self
	}

	/// Appends several children, normalizing each like [`Element::child`].
	pub fn children<I, N>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Node>,
	{
		for child in children {
			push_normalized(&mut self.children, child.into());
		}
		self
	}

	/// Wraps the element in a [`Node`].
	pub fn into_node(self) -> Node {
		Node::Element(self)
	}

	/// Returns what this element renders as.
	pub fn kind(&self) -> &ElementKind {
		&self.kind
	}

	/// Returns the tag name, or `None` for components.
	pub fn tag_name(&self) -> Option<&str> {
		match &self.kind {
			ElementKind::Tag(tag) => Some(tag),
			ElementKind::Component(_) => None,
		}
	}

	/// Returns the attributes.
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Returns the attributes mutably.
	pub fn attributes_mut(&mut self) -> &mut Attributes {
		&mut self.attributes
	}

	/// Returns the child nodes.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Splits the element into its parts.
	pub fn into_parts(self) -> (ElementKind, Attributes, Vec<Node>) {
		(self.kind, self.attributes, self.children)
	}
}

fn push_normalized(children: &mut Vec<Node>, node: Node) {
	match node {
		Node::Array(items) => children.extend(items),
		other => children.push(other),
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(text)
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Node::Text(text.to_string())
	}
}

impl From<&String> for Node {
	fn from(text: &String) -> Self {
		Node::Text(text.clone())
	}
}

impl From<bool> for Node {
	fn from(value: bool) -> Self {
		Node::Bool(value)
	}
}

impl From<f64> for Node {
	fn from(value: f64) -> Self {
		Node::Number(value)
	}
}

macro_rules! impl_from_integer_for_node {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Node {
				fn from(value: $ty) -> Self {
					Node::Number(value as f64)
				}
			}
		)*
	};
}

impl_from_integer_for_node!(i32, i64, u32, u64, usize);

impl From<Vec<Node>> for Node {
	fn from(items: Vec<Node>) -> Self {
		Node::Array(items)
	}
}

impl<T: Into<Node>> From<Option<T>> for Node {
	fn from(value: Option<T>) -> Self {
		value.map_or(Node::Null, Into::into)
	}
}
