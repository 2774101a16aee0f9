//! # duplex-runtime
//!
//! The client runtime that generated duplex scripts call into.
//!
//! A [`Runtime`] owns every piece of client state: hook slots keyed by
//! component id, mounted reactive components, the context store and the
//! routers. It renders into a [`Document`], which is the browser DOM on
//! `wasm32` and a [`MemoryDocument`] everywhere else.
//!
//! ## Hooks
//!
//! Render callbacks receive a [`Scope`], the cursor for the component being
//! rendered. Hooks are identified by call position, so they must be called in
//! the same order on every pass.
//!
//! ```
//! use std::rc::Rc;
//! use duplex_runtime::{Document, MemoryDocument, Runtime};
//!
//! let document = Rc::new(MemoryDocument::new());
//! document.insert_element("counter", "");
//!
//! let runtime = Runtime::new(document.clone());
//! let _mounted = runtime
//! 	.reactive_component("counter", |scope| {
//! 		let (count, _set_count) = scope.use_state(0)?;
//! 		Ok(format!("<b>{count}</b>"))
//! 	})
//! 	.unwrap();
//!
//! assert_eq!(document.inner_html("counter").as_deref(), Some("<b>0</b>"));
//! ```
//!
//! ## Feature Flags
//!
//! - `debug-hooks`: verbose hook and render tracing through [`debug_log!`]

pub mod bindings;
pub mod component;
pub mod context;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod router;
pub mod runtime;

pub use component::Unmount;
pub use context::ContextHandle;
pub use dom::{Document, MemoryDocument};
#[cfg(target_arch = "wasm32")]
pub use dom::BrowserDocument;
pub use error::RuntimeError;
pub use hooks::{Cleanup, Ref, Scope, SetState};
pub use router::{
	NavigationOutcome, Route, RouteMatch, RouteParams, RoutePattern, Router, RouterConfig,
	RouterContext, RouterHandle,
};
pub use runtime::{ComponentState, ListenerId, Runtime};

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

// Used by the logging macros.
#[doc(hidden)]
pub mod __private {
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}
