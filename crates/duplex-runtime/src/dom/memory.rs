//! An in-memory document.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::Document;

static ID_ATTRIBUTE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"\sid\s*=\s*"([^"]*)""#).expect("valid id attribute pattern"));

static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("valid script pattern")
});

#[derive(Debug, Default)]
struct MemoryElement {
	html: String,
	parent: Option<String>,
}

/// A document that keeps element content as strings.
///
/// Setting an element's content registers every `id="…"` found in the new
/// markup as a child of that element, so [`Document::descendant_ids`] reflects
/// what was rendered into it. Scripts are "executed" by recording their
/// source.
///
/// ```
/// use duplex_runtime::dom::{Document, MemoryDocument};
///
/// let document = MemoryDocument::new();
/// document.insert_element("app", "");
/// document.set_inner_html("app", "<div id=\"counter\"></div>");
///
/// assert!(document.has_element("counter"));
/// assert_eq!(document.descendant_ids("app"), vec!["counter".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryDocument {
	elements: RefCell<BTreeMap<String, MemoryElement>>,
	history: RefCell<Vec<String>>,
	executed_scripts: RefCell<Vec<String>>,
}

impl MemoryDocument {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a top-level element with initial content.
	pub fn insert_element(&self, id: impl Into<String>, html: &str) {
		let id = id.into();
		self.elements.borrow_mut().insert(
			id.clone(),
			MemoryElement {
				html: String::new(),
				parent: None,
			},
		);
		self.set_inner_html(&id, html);
	}

	/// Removes an element and everything nested under it.
	pub fn remove_element(&self, id: &str) {
		let mut removed = self.descendant_ids(id);
		removed.push(id.to_string());
		let mut elements = self.elements.borrow_mut();
		for id in removed {
			elements.remove(&id);
		}
	}

	/// Paths pushed so far.
	pub fn history(&self) -> Vec<String> {
		self.history.borrow().clone()
	}

	/// Sources of every script executed so far.
	pub fn executed_scripts(&self) -> Vec<String> {
		self.executed_scripts.borrow().clone()
	}

	fn is_descendant(elements: &BTreeMap<String, MemoryElement>, id: &str, ancestor: &str) -> bool {
		let mut current = elements.get(id).and_then(|element| element.parent.as_deref());
		while let Some(parent) = current {
			if parent == ancestor {
				return true;
			}
			current = elements.get(parent).and_then(|element| element.parent.as_deref());
		}
		false
	}
}

impl Document for MemoryDocument {
	fn has_element(&self, id: &str) -> bool {
		self.elements.borrow().contains_key(id)
	}

	fn inner_html(&self, id: &str) -> Option<String> {
		self.elements
			.borrow()
			.get(id)
			.map(|element| element.html.clone())
	}

	fn set_inner_html(&self, id: &str, html: &str) -> bool {
		if !self.has_element(id) {
			return false;
		}
		let stale = self.descendant_ids(id);

		let mut elements = self.elements.borrow_mut();
		for child in stale {
			elements.remove(&child);
		}
		if let Some(element) = elements.get_mut(id) {
			element.html = html.to_string();
		}
		for caps in ID_ATTRIBUTE.captures_iter(html) {
			let child = caps[1].to_string();
			if child != id {
				elements.insert(
					child,
					MemoryElement {
						html: String::new(),
						parent: Some(id.to_string()),
					},
				);
			}
		}
		true
	}

	fn descendant_ids(&self, id: &str) -> Vec<String> {
		let elements = self.elements.borrow();
		elements
			.keys()
			.filter(|candidate| Self::is_descendant(&elements, candidate, id))
			.cloned()
			.collect()
	}

	fn reexecute_scripts(&self, id: &str) {
		let Some(html) = self.inner_html(id) else {
			return;
		};
		let mut executed = self.executed_scripts.borrow_mut();
		for caps in SCRIPT.captures_iter(&html) {
			executed.push(caps[1].to_string());
		}
	}

	fn push_history(&self, path: &str) {
		self.history.borrow_mut().push(path.to_string());
	}

	fn location_path(&self) -> String {
		self.history
			.borrow()
			.last()
			.cloned()
			.unwrap_or_else(|| "/".to_string())
	}
}
