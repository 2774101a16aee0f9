//! Server output mounted by the client runtime.

use std::rc::Rc;

use duplex::pages::handlers::{REACTIVE_COMPONENT_ENTRY, RUNTIME_NAMESPACE};
use duplex::pages::node::Element;
use duplex::pages::{ClientFn, client_fn};
use duplex::runtime::bindings;
use duplex::{Document, MemoryDocument, Route, RouterConfig, Runtime, render_to_string};
use futures::executor::block_on;
use rstest::rstest;

fn counter_markup(id: &str, start: i32) -> String {
	let tree = Element::new("div")
		.attr("id", id)
		.attr("reactive", "renderCounter")
		.child(start)
		.into_node();
	block_on(render_to_string(tree, false))
}

#[rstest]
fn test_generated_scripts_target_runtime_entry_points() {
	assert_eq!(RUNTIME_NAMESPACE, bindings::GLOBAL_NAMESPACE);
	assert_eq!(REACTIVE_COMPONENT_ENTRY, bindings::REACTIVE_COMPONENT);
	assert!(bindings::ENTRY_POINTS.contains(&REACTIVE_COMPONENT_ENTRY));
}

#[rstest]
#[tokio::test]
async fn test_span_click_example() {
	let tree = Element::new("div")
		.child("hello")
		.child(Element::new("span").attr("onClick", client_fn!(|event| "console.log(event.type);")))
		.into_node();

	let html = render_to_string(tree, false).await;

	assert!(html.starts_with("<div>hello<span id=\""));
	assert!(html.contains("></span><script>document.getElementById(\""));
	assert!(html.contains(".addEventListener(\"click\", function(event){console.log(event.type);"));
	assert!(html.ends_with("</script></div>"));
}

#[rstest]
fn test_routed_markup_mounts_reactive_component() {
	let document = Rc::new(MemoryDocument::new());
	document.insert_element("app", "");
	let runtime = Runtime::new(Rc::clone(&document));
	runtime.install();

	let page = counter_markup("counter", 0);
	let router = runtime.create_router(
		RouterConfig::default(),
		vec![
			Route::new("/", |_| "<h1>Home</h1>".to_string()),
			Route::new("/counter", move |_| page.clone()),
		],
	);

	router.navigate("/counter").unwrap();
	let scripts = document.executed_scripts();
	assert_eq!(
		scripts,
		vec![format!(
			"{}(\"counter\", renderCounter);",
			bindings::qualified(bindings::REACTIVE_COMPONENT)
		)]
	);

	// What the host binding does for that script.
	let mounted = runtime
		.reactive_component("counter", |scope| {
			let (count, _) = scope.use_state(1)?;
			Ok(count.to_string())
		})
		.unwrap();
	assert_eq!(document.inner_html("counter").as_deref(), Some("1"));

	router.navigate("/").unwrap();
	assert!(!mounted.is_mounted());
	assert!(runtime.component_state("counter").is_empty());
	assert_eq!(document.inner_html("app").as_deref(), Some("<h1>Home</h1>"));
}

#[rstest]
fn test_relocated_client_function_reads_props() {
	let tree = Element::new("canvas")
		.attr("id", "chart")
		.attr("data-points", "[1,2,3]")
		.attr(
			"client",
			ClientFn::new(["el", "{width}"], "el.width = width;"),
		)
		.attr("width", 320)
		.into_node();

	let html = block_on(render_to_string(tree, false));

	assert!(html.starts_with("<canvas id=\"chart\" data-points=\"[1,2,3]\" width=\"320\"></canvas><script>"));
	assert!(html.contains("const {width} = props;"));
	assert!(html.contains("document.getElementById(\"chart\")"));
}
