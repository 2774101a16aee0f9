//! Escaping helpers shared by both renderers.

use serde_json::Value;

/// Escapes text for use as HTML content.
pub fn escape_html(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Escapes a string for use in a double-quoted HTML attribute value.
pub fn escape_attribute(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Escapes JSON content for safe embedding in HTML script tags.
///
/// `</` becomes `<\/`, which JavaScript reads back as `</` while HTML parsers
/// no longer see a closing tag.
pub fn escape_json_for_script(json: &str) -> String {
	json.replace("</", "<\\/")
}

/// Quotes `s` as a JavaScript string literal that is safe inside `<script>`.
pub fn js_string(s: &str) -> String {
	escape_json_for_script(&Value::String(s.to_owned()).to_string())
}

/// Makes a message safe to place inside an HTML comment.
pub(crate) fn comment_text(s: &str) -> String {
	s.replace("--", "- -")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("<script>", "&lt;script&gt;")]
	#[case("a&b", "a&amp;b")]
	#[case("\"quoted\"", "&quot;quoted&quot;")]
	#[case("it's", "it&#x27;s")]
	fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_html(input), expected);
	}

	#[rstest]
	fn test_escape_attribute_keeps_apostrophes() {
		assert_eq!(escape_attribute("a \"b\" 'c'"), "a &quot;b&quot; 'c'");
	}

	#[rstest]
	fn test_escape_json_for_script() {
		assert_eq!(
			escape_json_for_script("</script><script>alert(1)</script>"),
			"<\\/script><script>alert(1)<\\/script>"
		);
		assert_eq!(
			escape_json_for_script(r#"{"name":"test"}"#),
			r#"{"name":"test"}"#
		);
	}

	#[rstest]
	fn test_js_string_quotes_and_escapes() {
		assert_eq!(js_string("click"), "\"click\"");
		assert_eq!(js_string("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
		assert_eq!(js_string("</script>"), "\"<\\/script>\"");
	}

	#[rstest]
	fn test_comment_text_cannot_close_comment() {
		assert!(!comment_text("boom -->").contains("-->"));
	}
}
