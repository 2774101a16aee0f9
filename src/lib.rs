//! # duplex
//!
//! One node tree, rendered twice: as HTML on the server and as an equivalent
//! DOM-construction script for the browser. Generated scripts call into the
//! client runtime, which provides hooks, reactive components, a context
//! store and a router.
//!
//! ## Feature Flags
//!
//! - `pages` - node model, attribute handlers, static renderer and client code generator
//! - `runtime` - client runtime (hooks, reactive components, contexts, router)
//! - `full` (default) - both
//!
//! ## Quick Example
//!
//! ```
//! use duplex::pages::client_fn;
//! use duplex::pages::node::Element;
//!
//! let tree = Element::new("div")
//! 	.child("hello")
//! 	.child(Element::new("span").attr("onClick", client_fn!(|event| "console.log(event);")))
//! 	.into_node();
//!
//! let html = futures::executor::block_on(duplex::render_to_string(tree, false));
//! assert!(html.starts_with("<div>hello<span id=\""));
//! ```

#[cfg(feature = "pages")]
pub mod pages;
#[cfg(feature = "runtime")]
pub mod runtime;

#[cfg(feature = "pages")]
pub use duplex_pages::{
	AttrValue, ClientFn, ClientOptions, Component, Element, HandlerRegistry, Node, RenderOptions,
	render_to_client_code, render_to_string,
};

#[cfg(feature = "runtime")]
pub use duplex_runtime::{
	Document, MemoryDocument, Route, RouterConfig, Runtime, RuntimeError, Scope,
};
