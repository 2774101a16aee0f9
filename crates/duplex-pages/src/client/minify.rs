//! Lookup-table minification of generated client code.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::ssr::{protect_literals, restore_literals};

/// Globals indexed through `$g`.
pub const GLOBAL_OBJECTS: &[&str] = &["document", "window", "location", "self", "top"];

/// DOM members indexed through `$m`.
pub const DOM_MEMBERS: &[&str] = &[
	"createElement",
	"createTextNode",
	"createDocumentFragment",
	"createComment",
	"appendChild",
	"setAttribute",
	"addEventListener",
	"getElementById",
	"className",
];

static MEMBER_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(&format!(r"\.({})\b", DOM_MEMBERS.join("|"))).expect("valid member pattern")
});

static BARE_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(&format!(r"(^|[^\w$.])({})\b", GLOBAL_OBJECTS.join("|")))
		.expect("valid global pattern")
});

/// Binding lists of `const`/`let`/`var` declarations, function parameters
/// and arrow parameters.
static BINDINGS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"\b(?:const|let|var)\s+(\{[^}]*\}|\[[^\]]*\]|[A-Za-z_$][\w$]*)|\bfunction\b[^(]*\(([^)]*)\)|\(([^()]*)\)\s*=>|([A-Za-z_$][\w$]*)\s*=>",
	)
	.expect("valid binding pattern")
});

static IDENTIFIER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*").expect("valid identifier pattern"));

/// Tabulated globals the code declares as locals. Those names are left alone
/// everywhere, since rewriting the declaration would not parse and rewriting
/// the uses would point them at the global.
fn shadowed_globals(code: &str) -> HashSet<&'static str> {
	let mut shadowed = HashSet::new();
	for caps in BINDINGS.captures_iter(code) {
		let Some(list) = caps.iter().skip(1).flatten().next() else {
			continue;
		};
		for name in IDENTIFIER.find_iter(list.as_str()) {
			if let Some(global) = GLOBAL_OBJECTS.iter().find(|global| **global == name.as_str()) {
				shadowed.insert(*global);
			}
		}
	}
	shadowed
}

fn index_of(table: &[&str], name: &str) -> usize {
	table.iter().position(|entry| *entry == name).unwrap_or_default()
}

/// Rewrites tabulated member accesses to `[$m[i]]` and bare tabulated globals
/// to `$g[i]`, and prepends the table declarations.
///
/// String literals are left untouched, as are globals the code redeclares
/// locally.
pub fn minify_globals(code: &str) -> String {
	let (protected, literals) = protect_literals(code);
	let shadowed = shadowed_globals(&protected);

	let members = MEMBER_ACCESS.replace_all(&protected, |caps: &regex::Captures<'_>| {
		format!("[$m[{}]]", index_of(DOM_MEMBERS, &caps[1]))
	});
	let globals = BARE_GLOBAL.replace_all(&members, |caps: &regex::Captures<'_>| {
		if shadowed.contains(&caps[2]) {
			return caps[0].to_string();
		}
		format!("{}$g[{}]", &caps[1], index_of(GLOBAL_OBJECTS, &caps[2]))
	});

	let member_names = DOM_MEMBERS
		.iter()
		.map(|member| format!("\"{member}\""))
		.collect::<Vec<_>>()
		.join(",");
	format!(
		"var $g=[{}],$m=[{member_names}];\n{}",
		GLOBAL_OBJECTS.join(","),
		restore_literals(&globals, &literals)
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(
		"root.appendChild(document.createTextNode(\"hi\"));",
		"root[$m[4]]($g[0][$m[1]](\"hi\"));"
	)]
	#[case("e0.className = \"x\";", "e0[$m[8]] = \"x\";")]
	#[case("window.scrollTo(0, 0);", "$g[1].scrollTo(0, 0);")]
	#[case("e0.self = top;", "e0.self = $g[4];")]
	fn test_rewrites(#[case] input: &str, #[case] expected: &str) {
		let minified = minify_globals(input);
		let body = minified.split_once('\n').map(|(_, body)| body).unwrap();
		assert_eq!(body, expected);
	}

	#[rstest]
	fn test_literals_and_lookalikes_untouched() {
		let minified = minify_globals("log(\"document.createElement\"); mydocument.x; topLevel();");
		let body = minified.split_once('\n').map(|(_, body)| body).unwrap();
		assert_eq!(body, "log(\"document.createElement\"); mydocument.x; topLevel();");
	}

	#[rstest]
	#[case("const {top} = props;\nel.title = top;", "const {top} = props;\nel.title = top;")]
	#[case("const self = props[\"self\"];", "const self = props[\"self\"];")]
	#[case("(function(location){\nlocation.x = 1;\n})(e0);", "(function(location){\nlocation.x = 1;\n})(e0);")]
	#[case("items.map((top) => top + 1);", "items.map((top) => top + 1);")]
	#[case("const {top} = props;\nwindow.x = top;", "const {top} = props;\n$g[1].x = top;")]
	fn test_local_bindings_are_not_rewritten(#[case] input: &str, #[case] expected: &str) {
		let minified = minify_globals(input);
		let body = minified.split_once('\n').map(|(_, body)| body).unwrap();
		assert_eq!(body, expected);
	}

	#[rstest]
	fn test_declaration_lists_tables() {
		let minified = minify_globals("");
		assert!(minified.starts_with("var $g=[document,window,location,self,top],$m=[\"createElement\","));
		assert!(minified.contains("\"className\"];"));
	}
}
