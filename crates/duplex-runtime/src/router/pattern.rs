//! Route patterns.

use std::collections::BTreeMap;

use crate::warn_log;

/// Parameters captured by a match. The wildcard remainder is stored under `*`.
pub type RouteParams = BTreeMap<String, String>;

/// Key under which the remainder matched by `*` is stored.
pub const WILDCARD_PARAM: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

/// A path pattern such as `/users/:id` or `/files/*`.
///
/// Segments are literals or `:name` parameters; a `*` segment matches any
/// remainder, including nothing. Only the segments before the first `*` are
/// compared, so anything written after it is ignored. Matching ignores the
/// query string and fragment of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
	source: String,
	segments: Vec<Segment>,
	wildcard: bool,
}

impl RoutePattern {
	pub fn parse(pattern: &str) -> Self {
		let mut parts = split_path(pattern);
		let star = parts.iter().position(|part| *part == WILDCARD_PARAM);
		if let Some(position) = star {
			if position + 1 < parts.len() {
				warn_log!(
					"route pattern {}: segments after `*` are ignored",
					pattern
				);
			}
			parts.truncate(position);
		}
		let wildcard = star.is_some();
		let segments = parts
			.into_iter()
			.map(|part| match part.strip_prefix(':') {
				Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
				_ => Segment::Literal(part.to_string()),
			})
			.collect();

		Self {
			source: pattern.to_string(),
			segments,
			wildcard,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.source
	}

	pub fn has_wildcard(&self) -> bool {
		self.wildcard
	}

	/// Specificity: two points per literal segment, one per parameter.
	pub fn score(&self) -> usize {
		self.segments
			.iter()
			.map(|segment| match segment {
				Segment::Literal(_) => 2,
				Segment::Param(_) => 1,
			})
			.sum()
	}

	/// Matches `path`, returning the captured parameters.
	pub fn matches(&self, path: &str) -> Option<RouteParams> {
		let parts = split_path(path);
		if parts.len() < self.segments.len() || (!self.wildcard && parts.len() != self.segments.len()) {
			return None;
		}

		let mut params = RouteParams::new();
		for (segment, part) in self.segments.iter().zip(&parts) {
			match segment {
				Segment::Literal(literal) if literal.as_str() == *part => {}
				Segment::Literal(_) => return None,
				Segment::Param(name) => {
					params.insert(name.clone(), (*part).to_string());
				}
			}
		}
		if self.wildcard {
			params.insert(
				WILDCARD_PARAM.to_string(),
				parts[self.segments.len()..].join("/"),
			);
		}
		Some(params)
	}

	/// Builds a path from the pattern. Returns `None` when a parameter is
	/// missing; the wildcard defaults to nothing.
	pub fn reverse(&self, params: &RouteParams) -> Option<String> {
		let mut parts = Vec::with_capacity(self.segments.len() + 1);
		for segment in &self.segments {
			match segment {
				Segment::Literal(literal) => parts.push(literal.as_str()),
				Segment::Param(name) => parts.push(params.get(name)?.as_str()),
			}
		}
		if self.wildcard {
			if let Some(rest) = params.get(WILDCARD_PARAM).filter(|rest| !rest.is_empty()) {
				parts.push(rest.trim_matches('/'));
			}
		}
		Some(format!("/{}", parts.join("/")))
	}
}

/// Non-empty path segments, without query string or fragment.
fn split_path(path: &str) -> Vec<&str> {
	let end = path.find(['?', '#']).unwrap_or(path.len());
	path[..end].split('/').filter(|part| !part.is_empty()).collect()
}
