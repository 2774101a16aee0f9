//! Hooks, reactive components and contexts driven through a memory document.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use duplex_runtime::{Document, MemoryDocument, Runtime, RuntimeError, SetState};
use rstest::{fixture, rstest};

struct Page {
	runtime: Runtime,
	document: Rc<MemoryDocument>,
}

#[fixture]
fn page() -> Page {
	let document = Rc::new(MemoryDocument::new());
	document.insert_element("app", "<div id=\"counter\"></div><div id=\"badge\"></div>");
	Page {
		runtime: Runtime::new(Rc::clone(&document)),
		document,
	}
}

#[rstest]
fn test_install_is_idempotent(page: Page) {
	assert!(page.runtime.install());
	assert!(!page.runtime.install());
	assert!(page.runtime.is_installed());

	page.runtime.reset();
	assert!(!page.runtime.is_installed());
	assert!(page.runtime.install());
}

#[rstest]
fn test_counter_component(page: Page) {
	let setter: Rc<RefCell<Option<SetState<u32>>>> = Rc::new(RefCell::new(None));
	let slot = Rc::clone(&setter);

	let mounted = page
		.runtime
		.reactive_component("counter", move |scope| {
			let (count, set_count) = scope.use_state(0_u32)?;
			*slot.borrow_mut() = Some(set_count);
			Ok(format!("<button>{count}</button>"))
		})
		.unwrap();

	let set_count = setter.borrow().clone().unwrap();
	assert!(set_count.update(|n| n + 1));
	assert!(set_count.update(|n| n + 1));
	assert!(!set_count.set(2));

	assert_eq!(
		page.document.inner_html("counter").as_deref(),
		Some("<button>2</button>")
	);

	mounted.unmount();
	assert!(!set_count.set(10));
	assert!(page.runtime.component_state("counter").is_empty());
}

#[rstest]
fn test_effect_cleanup_order_across_renders(page: Page) {
	let log = Rc::new(RefCell::new(Vec::<String>::new()));
	let setter: Rc<RefCell<Option<SetState<&'static str>>>> = Rc::new(RefCell::new(None));

	let render_log = Rc::clone(&log);
	let slot = Rc::clone(&setter);
	let mounted = page
		.runtime
		.reactive_component("badge", move |scope| {
			let (label, set_label) = scope.use_state("new")?;
			*slot.borrow_mut() = Some(set_label);

			let effect_log = Rc::clone(&render_log);
			scope.use_effect(
				move || {
					effect_log.borrow_mut().push(format!("subscribe {label}"));
					let cleanup_log = Rc::clone(&effect_log);
					Some(Box::new(move || {
						cleanup_log.borrow_mut().push(format!("unsubscribe {label}"));
					}) as duplex_runtime::Cleanup)
				},
				Some(label),
			)?;
			render_log.borrow_mut().push(format!("render {label}"));
			Ok(label.to_string())
		})
		.unwrap();

	let set_label = setter.borrow().clone().unwrap();
	set_label.set("read");
	mounted.unmount();

	assert_eq!(
		*log.borrow(),
		vec![
			"render new",
			"subscribe new",
			"render read",
			"unsubscribe new",
			"subscribe read",
			"unsubscribe read",
		]
	);
}

#[rstest]
fn test_context_write_rerenders_readers(page: Page) {
	let theme = page.runtime.create_context("theme", "light".to_string()).unwrap();

	let _counter = page
		.runtime
		.reactive_component("counter", |scope| {
			let theme: String = scope.use_context("theme")?;
			Ok(format!("<i class=\"{theme}\"></i>"))
		})
		.unwrap();
	let _badge = page
		.runtime
		.reactive_component("badge", |scope| {
			let theme: String = scope.runtime().use_context("theme")?;
			Ok(theme.to_uppercase())
		})
		.unwrap();

	theme.set("dark".to_string()).unwrap();

	assert_eq!(
		page.document.inner_html("counter").as_deref(),
		Some("<i class=\"dark\"></i>")
	);
	assert_eq!(page.document.inner_html("badge").as_deref(), Some("DARK"));
}

#[rstest]
fn test_render_error_keeps_previous_markup(page: Page) {
	let fail = Rc::new(Cell::new(false));
	let setter: Rc<RefCell<Option<SetState<i32>>>> = Rc::new(RefCell::new(None));

	let flag = Rc::clone(&fail);
	let slot = Rc::clone(&setter);
	let _mounted = page
		.runtime
		.reactive_component("counter", move |scope| {
			let (value, set_value) = scope.use_state(1)?;
			*slot.borrow_mut() = Some(set_value);
			if flag.get() {
				return Err(RuntimeError::Render("broken".into()));
			}
			Ok(value.to_string())
		})
		.unwrap();

	fail.set(true);
	let set_value = setter.borrow().clone().unwrap();
	assert!(set_value.set(2));

	assert_eq!(page.document.inner_html("counter").as_deref(), Some("1"));
}

#[rstest]
fn test_component_state_json(page: Page) {
	let _mounted = page
		.runtime
		.reactive_component("counter", |scope| {
			scope.use_state(0)?;
			scope.use_ref(Vec::<u8>::new())?;
			Ok(String::new())
		})
		.unwrap();

	let state: serde_json::Value =
		serde_json::from_str(&page.runtime.component_state_json("counter")).unwrap();
	assert_eq!(
		state,
		serde_json::json!({
			"hook_index": 2,
			"states": [0],
			"effects": [],
			"refs": [1],
			"listeners": 1,
		})
	);
}
