//! Tree walk emitting DOM-construction statements.

use std::cell::Cell;

use futures::future::{FutureExt, LocalBoxFuture, join_all};

use super::{ClientOptions, minify_globals};
use crate::escape::{comment_text, js_string};
use crate::handlers::{DomAttributes, HandlerRegistry};
use crate::node::{Element, ElementKind, Node, Props, is_void_element};
use crate::ssr::compact;

/// Generates JavaScript that rebuilds a node tree in a live document.
///
/// ## Example
///
/// ```
/// use duplex_pages::client::{ClientOptions, ClientRenderer};
/// use duplex_pages::node::Element;
///
/// let tree = Element::new("p").child("hi").into_node();
/// let code = futures::executor::block_on(ClientRenderer::new(ClientOptions::default()).render(tree));
/// assert_eq!(
/// 	code,
/// 	"var root = document.createElement(\"div\");\n\
/// 	 {\n\
/// 	 const e0 = document.createElement(\"p\");\n\
/// 	 root.appendChild(e0);\n\
/// 	 e0.appendChild(document.createTextNode(\"hi\"));\n\
/// 	 }"
/// );
/// ```
pub struct ClientRenderer<'r> {
	registry: &'r HandlerRegistry,
	options: ClientOptions,
	counter: Cell<usize>,
}

impl ClientRenderer<'static> {
	/// Creates a generator backed by the global handler registry.
	pub fn new(options: ClientOptions) -> Self {
		Self::with_registry(HandlerRegistry::global(), options)
	}
}

impl<'r> ClientRenderer<'r> {
	/// Creates a generator backed by `registry`.
	pub fn with_registry(registry: &'r HandlerRegistry, options: ClientOptions) -> Self {
		Self {
			registry,
			options,
			counter: Cell::new(0),
		}
	}

	pub fn options(&self) -> &ClientOptions {
		&self.options
	}

	/// Generates the statements for `node`, starting with the root assignment.
	///
	/// The root is declared with `var` and every other statement sits in a
	/// block, so the same script can be evaluated again in one global scope.
	pub async fn render(&self, node: Node) -> String {
		self.counter.set(0);

		let root = self.options.root_variable_name.clone();
		let declaration = if self.options.as_fragment {
			format!("var {root} = document.createDocumentFragment();")
		} else {
			format!(
				"var {root} = document.createElement({});",
				js_string(&self.options.root_tag)
			)
		};

		let mut statements = Vec::new();
		self.walk(node, root, &mut statements).await;

		let mut code = declaration;
		if !statements.is_empty() {
			code.push_str("\n{\n");
			code.push_str(&statements.join("\n"));
			code.push_str("\n}");
		}
		if self.options.minify {
			code = minify_globals(&code);
		}
		if self.options.compact {
			code = compact(&code);
		}
		code
	}

	fn next_variable(&self) -> String {
		let n = self.counter.get();
		self.counter.set(n + 1);
		format!("{}{n}", self.options.variable_prefix)
	}

	fn walk<'a>(
		&'a self,
		node: Node,
		parent: String,
		out: &'a mut Vec<String>,
	) -> LocalBoxFuture<'a, ()> {
		async move {
			match node.resolve().await {
				Node::Array(items) => {
					let items = join_all(items.into_iter().map(Node::resolve)).await;
					for item in items {
						self.walk(item, parent.clone(), out).await;
					}
				}
				Node::Element(element) => self.walk_element(element, parent, out).await,
				primitive => {
					if let Some(text) = primitive.primitive_text().filter(|text| !text.is_empty()) {
						out.push(format!(
							"{parent}.appendChild(document.createTextNode({}));",
							js_string(&text)
						));
					}
				}
			}
		}
		.boxed_local()
	}

	async fn walk_element(&self, element: Element, parent: String, out: &mut Vec<String>) {
		let (kind, mut attributes, children) = element.into_parts();

		let tag = match kind {
			ElementKind::Component(component) => {
				match component.invoke(Props {
					attributes,
					children,
				}) {
					Ok(node) => self.walk(node, parent, out).await,
					Err(error) => {
						tracing::warn!(component = component.name(), %error, "component failed to render");
						out.push(format!(
							"{parent}.appendChild(document.createComment({}));",
							js_string(&comment_text(&error.to_string()))
						));
					}
				}
				return;
			}
			ElementKind::Tag(tag) => tag,
		};

		let variable = self.next_variable();
		out.push(format!(
			"const {variable} = document.createElement({});",
			js_string(&tag)
		));

		let DomAttributes {
			fragments,
			lock_children,
		} = self
			.registry
			.render_dom(&mut attributes, &variable, self.options.id_alphabet)
			.await;
		out.extend(fragments);
		out.push(format!("{parent}.appendChild({variable});"));

		if !lock_children && !is_void_element(&tag) {
			self.walk(Node::Array(children), variable, out).await;
		}
	}
}
