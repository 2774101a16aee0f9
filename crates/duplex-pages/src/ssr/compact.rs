//! Whitespace and comment compaction for markup and generated scripts.

use std::sync::LazyLock;

use regex::Regex;

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

static LITERAL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\[\s\S])*`"#)
		.expect("valid literal pattern")
});

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("valid placeholder pattern"));

static HTML_COMMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<!--[\s\S]*?-->").expect("valid html comment pattern"));

static BLOCK_COMMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("valid block comment pattern"));

static LINE_COMMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)(^|[^:\\])//[^\n]*").expect("valid line comment pattern"));

static WHITESPACE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static BETWEEN_TAGS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r">\s+<").expect("valid inter-tag pattern"));

static BEFORE_SELF_CLOSE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s+/>").expect("valid self-close pattern"));

/// Replaces string and template literals with numbered placeholders.
pub(crate) fn protect_literals(source: &str) -> (String, Vec<String>) {
	let mut literals = Vec::new();
	let protected = LITERAL
		.replace_all(source, |caps: &regex::Captures<'_>| {
			literals.push(caps[0].to_string());
			format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", literals.len() - 1)
		})
		.into_owned();
	(protected, literals)
}

/// Puts literals taken by [`protect_literals`] back.
pub(crate) fn restore_literals(source: &str, literals: &[String]) -> String {
	PLACEHOLDER
		.replace_all(source, |caps: &regex::Captures<'_>| {
			caps[1]
				.parse::<usize>()
				.ok()
				.and_then(|index| literals.get(index))
				.cloned()
				.unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}

/// Strips comments and collapses whitespace in markup or script source.
///
/// String and template literals are left untouched. HTML comments, block
/// comments and line comments are removed, whitespace runs become a single
/// space, and whitespace between tags or before `/>` is dropped. Applying it
/// to its own output changes nothing.
pub fn compact(source: &str) -> String {
	let (protected, literals) = protect_literals(source);

	let stripped = HTML_COMMENT.replace_all(&protected, "");
	let stripped = BLOCK_COMMENT.replace_all(&stripped, "");
	let stripped = LINE_COMMENT.replace_all(&stripped, "$1");

	let collapsed = WHITESPACE.replace_all(&stripped, " ");
	let collapsed = BETWEEN_TAGS.replace_all(&collapsed, "><");
	let collapsed = BEFORE_SELF_CLOSE.replace_all(&collapsed, "/>");

	restore_literals(collapsed.trim(), &literals)
}
