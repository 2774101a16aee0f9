//! Client Code Generator Integration Tests
//!
//! Covers the statement stream for element trees, attribute handlers in DOM
//! mode, and the minify/compact passes.

use duplex_pages::client::{ClientOptions, ClientRenderer, GLOBAL_OBJECTS};
use duplex_pages::handlers::HandlerRegistry;
use duplex_pages::node::{Component, Element, Node, Props};
use duplex_pages::{ClientFn, render_to_client_code};
use rstest::*;

#[fixture]
fn registry() -> HandlerRegistry {
	HandlerRegistry::with_standard_handlers()
}

fn counter(props: Props) -> Node {
	Element::new("button")
		.attr("className", "counter")
		.attr("onClick", "increment")
		.children(props.children)
		.into_node()
}

#[rstest]
#[tokio::test]
async fn test_component_tree_statements(registry: HandlerRegistry) {
	let renderer = ClientRenderer::with_registry(&registry, ClientOptions::default());
	let tree = Element::new("div")
		.child("hello")
		.child(Element::component(Component::new("Counter", counter)).child("+1"))
		.into_node();

	let code = renderer.render(tree).await;

	assert_eq!(
		code.lines().collect::<Vec<_>>(),
		vec![
			"var root = document.createElement(\"div\");",
			"{",
			"const e0 = document.createElement(\"div\");",
			"root.appendChild(e0);",
			"e0.appendChild(document.createTextNode(\"hello\"));",
			"const e1 = document.createElement(\"button\");",
			"e1.className = \"counter\";",
			"e1.addEventListener(\"click\", increment);",
			"e0.appendChild(e1);",
			"e1.appendChild(document.createTextNode(\"+1\"));",
			"}",
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_client_attribute_locks_children(registry: HandlerRegistry) {
	let renderer = ClientRenderer::with_registry(&registry, ClientOptions::default());
	let tree = Element::new("div")
		.attr("client", ClientFn::new(["el"], "el.textContent = 'live';"))
		.child("static placeholder")
		.into_node();

	let code = renderer.render(tree).await;

	assert!(code.contains("(function(el){\nel.textContent = 'live';\n})(e0);"));
	assert!(!code.contains("static placeholder"));
}

#[rstest]
#[tokio::test]
async fn test_text_is_quoted_safely(registry: HandlerRegistry) {
	let renderer = ClientRenderer::with_registry(&registry, ClientOptions::default());
	let code = renderer
		.render(Element::new("p").child("say \"hi\"\n</script>").into_node())
		.await;

	assert!(code.ends_with("e0.appendChild(document.createTextNode(\"say \\\"hi\\\"\\n<\\/script>\"));\n}"));
}

#[rstest]
#[tokio::test]
async fn test_minified_output_has_no_bare_globals(registry: HandlerRegistry) {
	let options = ClientOptions::new().minify(true);
	let renderer = ClientRenderer::with_registry(&registry, options);
	let tree = Element::new("ul")
		.child(Element::new("li").attr("title", "document").child("window"))
		.into_node();

	let code = renderer.render(tree).await;
	let (declaration, body) = code.split_once('\n').unwrap();

	assert!(declaration.starts_with("var $g=["));
	for global in GLOBAL_OBJECTS {
		let bare = format!(" {global}.");
		assert!(!body.contains(&bare), "{global} left bare in {body}");
	}
	assert!(body.contains("\"document\""));
	assert!(body.contains("\"window\""));
	assert!(body.contains("const e0 = $g[0][$m[0]](\"ul\");"));
}

#[rstest]
#[tokio::test]
async fn test_minify_keeps_props_named_like_globals(registry: HandlerRegistry) {
	let renderer = ClientRenderer::with_registry(&registry, ClientOptions::new().minify(true));
	let tree = Element::new("div")
		.attr("top", 12)
		.attr("client", ClientFn::new(["el", "{top}"], "el.style.top = top + 'px';"))
		.into_node();

	let code = renderer.render(tree).await;

	assert!(code.contains("const {top} = props;"));
	assert!(code.contains("el.style.top = top + 'px';"));
	assert!(!code.contains("$g[4]"));
	assert!(code.contains("const e0 = $g[0][$m[0]](\"div\");"));
}

#[rstest]
#[tokio::test]
async fn test_compacted_output_is_single_line(registry: HandlerRegistry) {
	let options = ClientOptions::new().compact(true);
	let renderer = ClientRenderer::with_registry(&registry, options);
	let tree = Element::new("div")
		.attr("onClick", ClientFn::new(["e"], "// log it\nconsole.log(e);"))
		.into_node();

	let code = renderer.render(tree).await;

	assert!(!code.contains('\n'));
	assert!(!code.contains("log it"));
	assert!(code.contains("console.log(e);"));
}

#[rstest]
#[case(ClientOptions::default())]
#[case(ClientOptions::new().minify(true))]
#[case(ClientOptions::new().as_fragment(true).root_variable_name("frag"))]
#[tokio::test]
async fn test_only_var_declarations_reach_global_scope(
	registry: HandlerRegistry,
	#[case] options: ClientOptions,
) {
	let renderer = ClientRenderer::with_registry(&registry, options);
	let tree = Element::new("div")
		.attr("onClick", "toggle")
		.child(Element::new("span").child("a"))
		.into_node();

	let code = renderer.render(tree).await;
	let lines: Vec<&str> = code.lines().collect();
	let open = lines.iter().position(|line| *line == "{").unwrap();

	// `var` may be redeclared when the script runs again; `const` may not.
	assert!(lines[..open].iter().all(|line| line.starts_with("var ")));
	assert_eq!(lines.last(), Some(&"}"));
	assert!(lines[open + 1..].iter().any(|line| line.starts_with("const e0 = ")));
}

#[tokio::test]
async fn test_render_to_client_code_fragment_root() {
	let code = render_to_client_code(
		Node::fragment(["a", "b"]),
		ClientOptions::new().as_fragment(true),
	)
	.await;

	assert_eq!(
		code,
		"var root = document.createDocumentFragment();\n{\nroot.appendChild(document.createTextNode(\"a\"));\nroot.appendChild(document.createTextNode(\"b\"));\n}"
	);
}
