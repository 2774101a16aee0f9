//! Server-side rendering and client code generation
//!
//! This module provides access to duplex-pages: the node model, the
//! attribute handler registry, the static renderer and the client code
//! generator.
//!
//! ## Example
//!
//! ```
//! use duplex::pages::{ClientOptions, node::Element};
//!
//! let tree = Element::new("p").child("hi").into_node();
//! let code = futures::executor::block_on(duplex::pages::render_to_client_code(
//! 	tree,
//! 	ClientOptions::new().as_fragment(true),
//! ));
//! assert!(code.starts_with("var root = document.createDocumentFragment();"));
//! ```

// Re-export all duplex-pages functionality
pub use duplex_pages::*;
