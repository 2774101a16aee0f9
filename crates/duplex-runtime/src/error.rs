//! Runtime error types.

/// Errors raised by the client runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
	/// A hook was called while no component was rendering.
	#[error("`{hook}` called outside of a component render pass")]
	InvalidHookCall { hook: &'static str },

	/// A hook slot was read with a different type than it was created with,
	/// usually because hooks were called in a different order.
	#[error("hook #{index} of component `{component}` changed type between renders")]
	HookTypeMismatch { component: String, index: usize },

	#[error("element `{id}` not found")]
	ElementNotFound { id: String },

	#[error("context `{id}` does not exist")]
	UnknownContext { id: String },

	#[error("context `{id}` holds a value of a different type")]
	ContextTypeMismatch { id: String },

	#[error("router `{id}` does not exist")]
	UnknownRouter { id: String },

	/// A render callback failed.
	#[error("render failed: {0}")]
	Render(String),
}
