//! Handler registry and the per-element attribute passes.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::{
	AttributeHandler, DomContext, IdAlphabet, Script, StaticContext, generate_element_id,
	standard_handlers,
};
use crate::escape::{escape_attribute, js_string};
use crate::node::{AttrValue, Attributes, Element, Node};

static GLOBAL_REGISTRY: LazyLock<HandlerRegistry> =
	LazyLock::new(HandlerRegistry::with_standard_handlers);

/// Result of rendering an element's attributes as markup.
#[derive(Debug, Default)]
pub struct StaticAttributes {
	/// Attribute markup for the opening tag, each entry with a leading space.
	pub attributes: String,
	/// Nodes rendered after the element.
	pub scripts: Vec<Node>,
	pub lock_children: bool,
}

/// Result of generating DOM statements for an element's attributes.
#[derive(Debug, Default)]
pub struct DomAttributes {
	pub fragments: Vec<String>,
	pub lock_children: bool,
}

/// An append-only, ordered list of attribute handlers.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
	handlers: RwLock<Vec<Arc<AttributeHandler>>>,
}

impl HandlerRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the standard handlers.
	pub fn with_standard_handlers() -> Self {
		let registry = Self::new();
		for handler in standard_handlers() {
			registry.register(handler);
		}
		registry
	}

	/// The process-wide registry, seeded with the standard handlers on first use.
	pub fn global() -> &'static HandlerRegistry {
		&GLOBAL_REGISTRY
	}

	/// Appends a handler.
	pub fn register(&self, handler: AttributeHandler) {
		tracing::debug!(key = %handler.key(), "registering attribute handler");
		self.handlers.write().push(Arc::new(handler));
	}

	pub fn len(&self) -> usize {
		self.handlers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.read().is_empty()
	}

	/// Finds the handler for `key`: the first exact match, otherwise the first
	/// matching prefix.
	pub fn lookup(&self, key: &str) -> Option<Arc<AttributeHandler>> {
		let handlers = self.handlers.read();
		handlers
			.iter()
			.find(|handler| !handler.key().is_prefix() && handler.key().matches(key))
			.or_else(|| {
				handlers
					.iter()
					.find(|handler| handler.key().is_prefix() && handler.key().matches(key))
			})
			.cloned()
	}

	/// Renders `attributes` into opening-tag markup plus trailing scripts.
	///
	/// Attributes are processed one at a time in insertion order; pending
	/// values are awaited just before their key is rendered, and keys removed
	/// by an earlier handler are skipped. A handler that reads its siblings
	/// sees every remaining value resolved.
	pub async fn render_static(
		&self,
		attributes: &mut Attributes,
		alphabet: IdAlphabet,
	) -> StaticAttributes {
		attributes.resolve("id").await;
		let explicit = attributes.id();
		let explicit_id = explicit.is_some();
		let element_id = explicit.unwrap_or_else(|| generate_element_id(alphabet));

		let mut html = String::new();
		let mut scripts = Vec::new();
		let mut lock_children = false;

		for key in attributes.serializable_keys() {
			if !attributes.resolve(&key).await {
				continue;
			}
			let Some(value) = attributes.get(&key).map(AttrValue::snapshot) else {
				continue;
			};
			let handler = self.lookup(&key);
			let strategy = handler
				.as_ref()
				.and_then(|handler| handler.static_strategy().cloned());
			if strategy.is_some() && handler.is_some_and(|handler| handler.needs_resolved_siblings()) {
				attributes.resolve_all().await;
			}

			match strategy {
				Some(strategy) => {
					let mut cx = StaticContext {
						key: &key,
						value,
						attributes: &mut *attributes,
						element_id: &element_id,
						explicit_id,
					};
					let output = strategy(&mut cx);
					html.push_str(&output.html);
					scripts.extend(output.scripts);
					lock_children |= output.lock_children;
				}
				None => html.push_str(&default_static(&key, &value)),
			}
		}

		if !scripts.is_empty() && !explicit_id {
			html.insert_str(0, &format!(" id=\"{}\"", escape_attribute(&element_id)));
		}

		StaticAttributes {
			attributes: html,
			scripts: merge_scripts(scripts),
			lock_children,
		}
	}

	/// Generates statements applying `attributes` to the element held in
	/// `element_var`.
	pub async fn render_dom(
		&self,
		attributes: &mut Attributes,
		element_var: &str,
		alphabet: IdAlphabet,
	) -> DomAttributes {
		attributes.resolve("id").await;
		let explicit = attributes.id();
		let explicit_id = explicit.is_some();
		let element_id = explicit.unwrap_or_else(|| generate_element_id(alphabet));

		let mut fragments = Vec::new();
		let mut lock_children = false;

		for key in attributes.serializable_keys() {
			if !attributes.resolve(&key).await {
				continue;
			}
			let Some(value) = attributes.get(&key).map(AttrValue::snapshot) else {
				continue;
			};
			let handler = self.lookup(&key);
			let strategy = handler
				.as_ref()
				.and_then(|handler| handler.dom_strategy().cloned());
			if strategy.is_some() && handler.is_some_and(|handler| handler.needs_resolved_siblings()) {
				attributes.resolve_all().await;
			}

			match strategy {
				Some(strategy) => {
					let mut cx = DomContext {
						key: &key,
						value,
						attributes: &mut *attributes,
						element_id: &element_id,
						explicit_id,
						element_var,
					};
					let output = strategy(&mut cx);
					fragments.extend(output.fragments);
					lock_children |= output.lock_children;
				}
				None => fragments.extend(default_dom(&key, &value, element_var)),
			}
		}

		DomAttributes {
			fragments,
			lock_children,
		}
	}
}

fn default_static(key: &str, value: &AttrValue) -> String {
	match value {
		AttrValue::Bool(true) => format!(" {key}"),
		value if value.is_omitted() => String::new(),
		value => format!(
			" {key}=\"{}\"",
			escape_attribute(&value.to_attribute_text())
		),
	}
}

fn default_dom(key: &str, value: &AttrValue, element_var: &str) -> Option<String> {
	let text = match value {
		AttrValue::Bool(true) => String::new(),
		value if value.is_omitted() => return None,
		value => value.to_attribute_text(),
	};
	Some(format!(
		"{element_var}.setAttribute({}, {});",
		js_string(key),
		js_string(&text)
	))
}

/// Joins inline scripts into one `<script>` node placed where the first inline
/// script appeared; node scripts keep their position.
fn merge_scripts(scripts: Vec<Script>) -> Vec<Node> {
	let mut nodes = Vec::new();
	let mut inline = Vec::new();
	let mut inline_slot = None;

	for script in scripts {
		match script {
			Script::Inline(source) => {
				inline_slot.get_or_insert(nodes.len());
				inline.push(source);
			}
			Script::Node(node) => nodes.push(node),
		}
	}

	if let Some(slot) = inline_slot {
		let merged = Element::new("script")
			.child(Node::Text(inline.join("\n")))
			.into_node();
		nodes.insert(slot, merged);
	}
	nodes
}
