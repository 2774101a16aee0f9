//! The document the runtime renders into.
//!
//! The runtime only needs a handful of operations on the live page: look
//! elements up by id, swap their content, find the ids nested under them,
//! re-run their scripts, and push history entries. [`MemoryDocument`] provides
//! them natively for tests and server-side simulation; on `wasm32`,
//! `BrowserDocument` maps them onto `web-sys`.

#[cfg(target_arch = "wasm32")]
mod browser;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserDocument;
pub use memory::MemoryDocument;

/// Operations the runtime performs on the page.
pub trait Document {
	/// Returns whether an element with `id` exists.
	fn has_element(&self, id: &str) -> bool;

	/// Returns the element's current markup.
	fn inner_html(&self, id: &str) -> Option<String>;

	/// Replaces the element's content; returns `false` if it does not exist.
	fn set_inner_html(&self, id: &str, html: &str) -> bool;

	/// Ids of all elements nested under `id`.
	fn descendant_ids(&self, id: &str) -> Vec<String>;

	/// Re-inserts the `<script>` elements under `id` so they run again.
	fn reexecute_scripts(&self, id: &str);

	/// Appends a history entry.
	fn push_history(&self, path: &str);

	/// The current location path.
	fn location_path(&self) -> String;
}
