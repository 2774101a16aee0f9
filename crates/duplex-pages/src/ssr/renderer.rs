//! The static renderer.

use futures::future::{FutureExt, LocalBoxFuture, join_all};

use super::{RenderOptions, assemble_document, compact};
use crate::escape::comment_text;
use crate::handlers::{HandlerRegistry, StaticAttributes};
use crate::node::{Element, ElementKind, Node, Props, is_void_element};

/// Renders node trees to HTML.
///
/// ## Example
///
/// ```
/// use duplex_pages::node::Element;
/// use duplex_pages::ssr::StaticRenderer;
///
/// let tree = Element::new("p").attr("className", "lead").child("hi").into_node();
/// let html = futures::executor::block_on(StaticRenderer::new().render(tree));
/// assert_eq!(html, "<p class=\"lead\">hi</p>");
/// ```
pub struct StaticRenderer<'r> {
	registry: &'r HandlerRegistry,
	options: RenderOptions,
}

impl StaticRenderer<'static> {
	/// Creates a renderer backed by the global handler registry.
	pub fn new() -> Self {
		Self::with_registry(HandlerRegistry::global())
	}
}

impl Default for StaticRenderer<'static> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'r> StaticRenderer<'r> {
	/// Creates a renderer backed by `registry`.
	pub fn with_registry(registry: &'r HandlerRegistry) -> Self {
		Self {
			registry,
			options: RenderOptions::default(),
		}
	}

	/// Sets rendering options.
	pub fn options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}

	/// Renders `node` to an HTML string.
	pub async fn render(&self, node: Node) -> String {
		let fragments = self.render_fragments(node).await;
		let html = assemble_document(&fragments);
		if self.options.minify {
			compact(&html)
		} else {
			html
		}
	}

	/// Renders `node` to its flat fragment list: each opening tag, closing
	/// tag, text and script is one entry, in output order.
	pub fn render_fragments<'a>(&'a self, node: Node) -> LocalBoxFuture<'a, Vec<String>> {
		async move {
			match node.resolve().await {
				Node::Array(items) => join_all(items.into_iter().map(|item| self.render_fragments(item)))
					.await
					.into_iter()
					.flatten()
					.collect(),
				Node::Element(element) => self.render_element(element).await,
				primitive => primitive
					.primitive_text()
					.filter(|text| !text.is_empty())
					.into_iter()
					.collect(),
			}
		}
		.boxed_local()
	}

	async fn render_element(&self, element: Element) -> Vec<String> {
		let (kind, mut attributes, children) = element.into_parts();

		let tag = match kind {
			ElementKind::Component(component) => {
				return match component.invoke(Props {
					attributes,
					children,
				}) {
					Ok(node) => self.render_fragments(node).await,
					Err(error) => {
						tracing::warn!(component = component.name(), %error, "component failed to render");
						vec![format!("<!-- {} -->", comment_text(&error.to_string()))]
					}
				};
			}
			ElementKind::Tag(tag) => tag,
		};

		let StaticAttributes {
			attributes: markup,
			scripts,
			lock_children,
		} = self
			.registry
			.render_static(&mut attributes, self.options.id_alphabet)
			.await;

		let mut fragments = Vec::new();
		if is_void_element(&tag) {
			fragments.push(format!("<{tag}{markup}/>"));
		} else {
			fragments.push(format!("<{tag}{markup}>"));
			if !lock_children {
				fragments.extend(self.render_fragments(Node::Array(children)).await);
			}
			fragments.push(format!("</{tag}>"));
		}

		for script in scripts {
			fragments.extend(self.render_fragments(script).await);
		}
		fragments
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handlers::IdAlphabet;
	use crate::node::{AttrValue, Component};
	use rstest::{fixture, rstest};

	#[fixture]
	fn registry() -> HandlerRegistry {
		HandlerRegistry::with_standard_handlers()
	}

	#[rstest]
	#[case(Node::from("text"), "text")]
	#[case(Node::from(3), "3")]
	#[case(Node::from(0.25), "0.25")]
	#[case(Node::from(false), "false")]
	#[case(Node::Null, "")]
	#[case(Node::Undefined, "")]
	#[tokio::test]
	async fn test_lone_primitive(registry: HandlerRegistry, #[case] node: Node, #[case] expected: &str) {
		let renderer = StaticRenderer::with_registry(&registry);
		assert_eq!(renderer.render(node).await, expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_void_elements_ignore_children(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry);
		let node = Element::new("img")
			.attr("src", "/a.png")
			.child("ignored")
			.into_node();
		assert_eq!(renderer.render(node).await, "<img src=\"/a.png\"/>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_nested_arrays_flatten_in_order(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry);
		let node = Element::new("ol")
			.child(Node::Array(vec![
				Node::pending(async { Node::from("a") }),
				Node::Array(vec![Node::from("b"), Node::Array(vec![Node::from("c")])]),
				Node::from("d"),
			]))
			.into_node();
		assert_eq!(renderer.render(node).await, "<ol>abcd</ol>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_components_are_substituted(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry);
		let badge = Component::new("Badge", |props: Props| {
			let label = props
				.attributes
				.get("label")
				.map(AttrValue::to_attribute_text)
				.unwrap_or_default();
			Element::new("span").child(label).into_node()
		});
		let node = Element::new("div")
			.child(Element::component(badge).attr("label", "new"))
			.into_node();
		assert_eq!(renderer.render(node).await, "<div><span>new</span></div>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_failing_component_renders_comment(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry);
		let broken = Component::fallible("Broken", |_| Err::<Node, _>("missing data"));
		let node = Node::fragment([
			Element::component(broken).into_node(),
			Element::new("p").child("after").into_node(),
		]);
		assert_eq!(
			renderer.render(node).await,
			"<!-- component `Broken` failed: missing data --><p>after</p>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_locked_children_are_skipped(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry);
		let node = Element::new("div")
			.attr("id", "widget")
			.attr("client", "(el) => { el.textContent = 'ready'; }")
			.child("placeholder")
			.into_node();
		let html = renderer.render(node).await;
		assert!(html.starts_with("<div id=\"widget\"></div><script>"));
		assert!(!html.contains("placeholder"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_extended_alphabet_option(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry)
			.options(RenderOptions::new().id_alphabet(IdAlphabet::Extended));
		let node = Element::new("button").attr("onClick", "go").into_node();
		let html = renderer.render(node).await;
		assert!(html.starts_with("<button id=\""));
		assert!(html.contains(".addEventListener(\"click\", go);"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_render_fragments_are_flat(registry: HandlerRegistry) {
		let renderer = StaticRenderer::with_registry(&registry);
		let node = Element::new("p").child("a").child(Element::new("br")).into_node();
		assert_eq!(
			renderer.render_fragments(node).await,
			vec!["<p>", "a", "<br/>", "</p>"]
		);
	}
}
