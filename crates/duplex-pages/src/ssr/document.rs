//! Document-structure assembly over rendered fragments.

use std::sync::LazyLock;

use regex::Regex;

static STRUCTURAL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^\s*(?:(<!doctype\b[^>]*>)|<(html|head|body)\b([^>]*)>|</(html|head|body)\s*>)\s*$")
		.expect("valid structural marker pattern")
});

enum Marker {
	Doctype,
	Open(Section, String),
	Close(Section),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
	Html,
	Head,
	Body,
}

impl Section {
	fn parse(name: &str) -> Self {
		match name.to_ascii_lowercase().as_str() {
			"head" => Self::Head,
			"body" => Self::Body,
			_ => Self::Html,
		}
	}
}

fn classify(fragment: &str) -> Option<Marker> {
	let caps = STRUCTURAL.captures(fragment)?;
	if caps.get(1).is_some() {
		return Some(Marker::Doctype);
	}
	if let Some(name) = caps.get(2) {
		let attributes = caps.get(3).map_or("", |m| m.as_str()).trim_end_matches('/');
		return Some(Marker::Open(Section::parse(name.as_str()), attributes.to_string()));
	}
	caps.get(4)
		.map(|name| Marker::Close(Section::parse(name.as_str())))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
	Preamble,
	InHead,
	InBody,
	AfterSection,
}

/// Joins rendered fragments, synthesizing a complete HTML document when any
/// fragment is a doctype or an `html`, `head` or `body` tag.
///
/// Attributes of the original `html`, `head` and `body` tags are carried
/// over to the synthesized ones. Content before the first section goes to the
/// head when the tree has `head` or `body` tags and to the body otherwise;
/// content inside the head stays there; everything else, including content
/// after `</head>` or `</body>`, goes to the body.
pub fn assemble_document<S: AsRef<str>>(fragments: &[S]) -> String {
	let markers: Vec<Option<Marker>> = fragments
		.iter()
		.map(|fragment| classify(fragment.as_ref()))
		.collect();

	if markers.iter().all(Option::is_none) {
		return fragments
			.iter()
			.map(|fragment| fragment.as_ref())
			.collect::<String>();
	}

	let has_sections = markers.iter().flatten().any(|marker| {
		matches!(
			marker,
			Marker::Open(Section::Head | Section::Body, _) | Marker::Close(Section::Head | Section::Body)
		)
	});

	let mut html_attributes = String::new();
	let mut head_attributes = String::new();
	let mut body_attributes = String::new();
	let mut head = String::new();
	let mut body = String::new();
	let mut position = Position::Preamble;

	for (fragment, marker) in fragments.iter().zip(markers) {
		match marker {
			Some(Marker::Doctype) | Some(Marker::Close(Section::Html)) => {}
			Some(Marker::Open(Section::Html, attributes)) => html_attributes = attributes,
			Some(Marker::Open(Section::Head, attributes)) => {
				head_attributes = attributes;
				position = Position::InHead;
			}
			Some(Marker::Open(Section::Body, attributes)) => {
				body_attributes = attributes;
				position = Position::InBody;
			}
			Some(Marker::Close(_)) => position = Position::AfterSection,
			None => {
				let bucket = match position {
					Position::Preamble if has_sections => &mut head,
					Position::InHead => &mut head,
					_ => &mut body,
				};
				bucket.push_str(fragment.as_ref());
			}
		}
	}

	format!(
		"<!DOCTYPE html><html{html_attributes}><head{head_attributes}>{head}</head><body{body_attributes}>{body}</body></html>"
	)
}
