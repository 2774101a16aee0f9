//! Duplex Pages - one node tree, two renderers
//!
//! Builds HTML on the server and the equivalent DOM-construction script for
//! the browser from the same node description.
//!
//! ## Architecture
//!
//! - [`node`]: the node model (primitives, elements, components, arrays, pending values)
//! - [`function`]: embeddable client callbacks and source extraction
//! - [`handlers`]: pluggable per-attribute render behaviour
//! - [`ssr`]: the static renderer, document assembly and compaction
//! - [`client`]: the client code generator and identifier minification
//!
//! Generated scripts call into the client runtime under the
//! [`RUNTIME_NAMESPACE`](handlers::RUNTIME_NAMESPACE) global.
//!
//! ## Example
//!
//! ```
//! use duplex_pages::client_fn;
//! use duplex_pages::node::Element;
//!
//! let tree = Element::new("div")
//! 	.child("hello")
//! 	.child(Element::new("span").attr("onClick", client_fn!(|event| "console.log(event);")))
//! 	.into_node();
//!
//! let html = futures::executor::block_on(duplex_pages::render_to_string(tree, false));
//! assert!(html.starts_with("<div>hello<span id=\""));
//! assert!(html.contains(".addEventListener(\"click\""));
//! ```

pub mod client;
pub mod escape;
pub mod function;
pub mod handlers;
pub mod node;
pub mod ssr;

pub use client::{ClientOptions, ClientRenderer};
pub use function::{ClientFn, ExtractedFunction, extract_function};
pub use handlers::{AttributeHandler, HandlerKey, HandlerRegistry, IdAlphabet};
pub use node::{AttrValue, Attributes, Component, ComponentError, Element, Node, Props};
pub use ssr::{RenderOptions, StaticRenderer};

/// Renders `node` to HTML with the global handler registry.
pub async fn render_to_string(node: Node, minify: bool) -> String {
	StaticRenderer::new()
		.options(RenderOptions::new().minify(minify))
		.render(node)
		.await
}

/// Generates client code for `node` with the global handler registry.
pub async fn render_to_client_code(node: Node, options: ClientOptions) -> String {
	ClientRenderer::new(options).render(node).await
}
