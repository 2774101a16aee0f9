//! Embeddable client callbacks.
//!
//! Callbacks that run in the browser are carried on attributes as [`ClientFn`]
//! values: a parameter list, a statement body and an async flag. They are
//! usually built structurally with [`ClientFn::new`] or the [`client_fn!`]
//! macro. [`ClientFn::from_source`] accepts JavaScript source text instead and
//! runs [`extract_function`], a pattern matcher over a few common callable
//! shapes that degrades to a best-effort fallback for anything else.
//!
//! ```
//! use duplex_pages::client_fn;
//! use duplex_pages::function::ClientFn;
//!
//! let structural = client_fn!(|event| "console.log(event.type);");
//! let parsed = ClientFn::from_source("(event) => { console.log(event.type); }");
//!
//! assert_eq!(structural.params(), parsed.params());
//! assert_eq!(structural.to_js(), "function(event){console.log(event.type);}");
//! ```

use std::sync::LazyLock;

use regex::Regex;

static ARROW: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:async\s+)?(?:\(([^)]*)\)|([A-Za-z_$][\w$]*))\s*=>\s*([\s\S]*?)\s*;?\s*$")
		.expect("valid arrow pattern")
});

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:async\s+)?function\b\s*\*?\s*(?:[A-Za-z_$][\w$]*)?\s*\(([^)]*)\)\s*(\{[\s\S]*\})\s*;?\s*$")
		.expect("valid function pattern")
});

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:async\s+)?[A-Za-z_$][\w$]*\s*\(([^)]*)\)\s*(\{[\s\S]*\})\s*$")
		.expect("valid method pattern")
});

static LOOSE_PARAMS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid parameter pattern"));

static RETURN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\breturn\b").expect("valid return pattern"));

/// The pieces of a callable recovered from its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFunction {
	pub body: String,
	pub params: Vec<String>,
	pub is_async: bool,
}

/// Splits a callable's source into body, parameters and async flag.
///
/// Recognizes, in order, arrow functions, `function` expressions and
/// declarations, and shorthand methods. Anything else goes through a fallback
/// that strips the declarator and trailing brace, and logs a warning. Never
/// fails.
pub fn extract_function(source: &str) -> ExtractedFunction {
	let is_async = source.trim_start().starts_with("async");

	let (raw_params, raw_body) = if let Some(caps) = ARROW.captures(source) {
		let params = caps
			.get(1)
			.or_else(|| caps.get(2))
			.map_or("", |m| m.as_str());
		(params.to_string(), caps[3].to_string())
	} else if let Some(caps) = FUNCTION.captures(source) {
		(caps[1].to_string(), caps[2].to_string())
	} else if let Some(caps) = METHOD.captures(source) {
		(caps[1].to_string(), caps[2].to_string())
	} else {
		tracing::warn!(
			source = %source,
			"unrecognized function shape, falling back to heuristic extraction"
		);
		fallback(source)
	};

	ExtractedFunction {
		body: finalize_body(&raw_body),
		params: split_params(&raw_params),
		is_async,
	}
}

fn fallback(source: &str) -> (String, String) {
	let params = LOOSE_PARAMS
		.captures(source)
		.map(|caps| caps[1].to_string())
		.unwrap_or_default();

	let without_declarator = match source.find('{') {
		Some(open) => &source[open + 1..],
		None => source,
	};
	let trimmed = without_declarator.trim_end();
	let body = trimmed.strip_suffix('}').unwrap_or(trimmed);

	(params, body.to_string())
}

fn finalize_body(raw: &str) -> String {
	let body = raw.trim();
	if body.is_empty() {
		return String::new();
	}
	let body = if !body.starts_with('{') && !RETURN.is_match(body) {
		format!("{};\nreturn;", body.trim_end_matches(';'))
	} else {
		body.to_string()
	};
	let body = body.strip_prefix('{').unwrap_or(&body);
	let body = body.strip_suffix('}').unwrap_or(body);
	body.trim().to_string()
}

/// Splits a parameter list at top-level commas so destructured and defaulted
/// parameters stay intact.
pub(crate) fn split_params(raw: &str) -> Vec<String> {
	let mut params = Vec::new();
	let mut depth = 0usize;
	let mut current = String::new();

	for ch in raw.chars() {
		match ch {
			'{' | '[' | '(' => depth += 1,
			'}' | ']' | ')' => depth = depth.saturating_sub(1),
			',' if depth == 0 => {
				params.push(std::mem::take(&mut current));
				continue;
			}
			_ => {}
		}
		current.push(ch);
	}
	params.push(current);

	params
		.into_iter()
		.map(|param| param.trim().to_string())
		.filter(|param| !param.is_empty())
		.collect()
}

/// A callback that runs in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFn {
	params: Vec<String>,
	body: String,
	is_async: bool,
}

impl ClientFn {
	/// Builds a callback from parameter names and a statement body.
	pub fn new<I, S>(params: I, body: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			params: params.into_iter().map(Into::into).collect(),
			body: body.into(),
			is_async: false,
		}
	}

	/// Parses JavaScript callable source with [`extract_function`].
	pub fn from_source(source: &str) -> Self {
		let ExtractedFunction {
			body,
			params,
			is_async,
		} = extract_function(source);
		Self {
			params,
			body,
			is_async,
		}
	}

	/// Marks the callback as `async`.
	pub fn asynchronous(mut self) -> Self {
		self.is_async = true;
		self
	}

	pub fn params(&self) -> &[String] {
		&self.params
	}

	pub fn body(&self) -> &str {
		&self.body
	}

	pub fn is_async(&self) -> bool {
		self.is_async
	}

	/// Renders the callback as a JavaScript function expression.
	pub fn to_js(&self) -> String {
		format!(
			"{}function({}){{{}}}",
			if self.is_async { "async " } else { "" },
			self.params.join(","),
			self.body
		)
	}
}

/// Builds a [`ClientFn`] from closure-like syntax and a body string.
///
/// ```
/// use duplex_pages::client_fn;
///
/// let handler = client_fn!(|el, props| "el.textContent = props.label;");
/// assert_eq!(handler.params(), ["el", "props"]);
///
/// let loader = client_fn!(async || "await fetch('/ping');");
/// assert!(loader.is_async());
/// ```
#[macro_export]
macro_rules! client_fn {
	(async || $body:expr) => {
		$crate::function::ClientFn::new(::std::vec::Vec::<&str>::new(), $body).asynchronous()
	};
	(async | $($param:ident),* $(,)? | $body:expr) => {
		$crate::function::ClientFn::new(
			::std::vec::Vec::<&str>::from([$(stringify!($param)),*]),
			$body,
		)
		.asynchronous()
	};
	(|| $body:expr) => {
		$crate::function::ClientFn::new(::std::vec::Vec::<&str>::new(), $body)
	};
	(| $($param:ident),* $(,)? | $body:expr) => {
		$crate::function::ClientFn::new(
			::std::vec::Vec::<&str>::from([$(stringify!($param)),*]),
			$body,
		)
	};
}
