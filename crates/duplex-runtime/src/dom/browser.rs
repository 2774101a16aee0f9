//! The page's DOM through `web-sys`.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, NodeList, Window};

use super::Document;
use crate::warn_log;

/// Attributes carried over when a script element is re-created.
const SCRIPT_ATTRIBUTES: &[&str] = &["type", "src", "nonce"];

/// The live browser document.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
	window: Window,
	document: web_sys::Document,
}

impl BrowserDocument {
	/// Returns `None` outside a window context, e.g. in a worker.
	pub fn new() -> Option<Self> {
		let window = web_sys::window()?;
		let document = window.document()?;
		Some(Self { window, document })
	}

	fn element(&self, id: &str) -> Option<Element> {
		self.document.get_element_by_id(id)
	}

	fn elements(list: NodeList) -> impl Iterator<Item = Element> {
		(0..list.length())
			.filter_map(move |i| list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
	}

	fn recreate_script(&self, old: &Element) -> Result<(), JsValue> {
		let fresh = self.document.create_element("script")?;
		for name in SCRIPT_ATTRIBUTES {
			if let Some(value) = old.get_attribute(name) {
				fresh.set_attribute(name, &value)?;
			}
		}
		fresh.set_text_content(old.text_content().as_deref());
		old.replace_with_with_node_1(&fresh)
	}
}

impl Document for BrowserDocument {
	fn has_element(&self, id: &str) -> bool {
		self.element(id).is_some()
	}

	fn inner_html(&self, id: &str) -> Option<String> {
		self.element(id).map(|element| element.inner_html())
	}

	fn set_inner_html(&self, id: &str, html: &str) -> bool {
		match self.element(id) {
			Some(element) => {
				element.set_inner_html(html);
				true
			}
			None => false,
		}
	}

	fn descendant_ids(&self, id: &str) -> Vec<String> {
		let Some(element) = self.element(id) else {
			return Vec::new();
		};
		match element.query_selector_all("[id]") {
			Ok(list) => Self::elements(list)
				.map(|element| element.id())
				.filter(|id| !id.is_empty())
				.collect(),
			Err(error) => {
				warn_log!("failed to query descendants of {}: {:?}", id, error);
				Vec::new()
			}
		}
	}

	fn reexecute_scripts(&self, id: &str) {
		let Some(element) = self.element(id) else {
			return;
		};
		let scripts = match element.query_selector_all("script") {
			Ok(list) => Self::elements(list).collect::<Vec<_>>(),
			Err(error) => {
				warn_log!("failed to query scripts of {}: {:?}", id, error);
				return;
			}
		};
		for script in scripts {
			if let Err(error) = self.recreate_script(&script) {
				warn_log!("failed to re-run script in {}: {:?}", id, error);
			}
		}
	}

	fn push_history(&self, path: &str) {
		let pushed = self
			.window
			.history()
			.and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(path)));
		if let Err(error) = pushed {
			warn_log!("failed to push history entry {}: {:?}", path, error);
		}
	}

	fn location_path(&self) -> String {
		self.window
			.location()
			.pathname()
			.unwrap_or_else(|_| "/".to_string())
	}
}
