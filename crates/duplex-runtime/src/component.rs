//! Reactive components mounted on element ids.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::error::RuntimeError;
use crate::hooks::Scope;
use crate::runtime::{ListenerId, Runtime, RuntimeInner};
use crate::{debug_log, error_log};

type RenderFn = Box<dyn Fn(&Scope<'_>) -> Result<String, RuntimeError>>;

/// A mounted component.
pub(crate) struct Instance {
	element_id: String,
	render_fn: RenderFn,
	pub(crate) mounted: Cell<bool>,
	rendering: Cell<bool>,
	listener: Cell<Option<ListenerId>>,
}

impl Instance {
	/// Renders into the element, then flushes the pass's effects.
	///
	/// Does nothing once unmounted or while a render of this instance is
	/// already running; state changes made during the pass are picked up by
	/// that pass.
	fn render(&self, runtime: &Runtime) -> Result<(), RuntimeError> {
		if !self.mounted.get() || self.rendering.replace(true) {
			return Ok(());
		}
		let result = runtime.run_pass(&self.element_id, |scope| (self.render_fn)(scope));
		self.rendering.set(false);

		let html = match result {
			Ok(html) => html,
			Err(error) => {
				runtime.discard_effects(&self.element_id);
				return Err(error);
			}
		};
		if !runtime.document().set_inner_html(&self.element_id, &html) {
			runtime.discard_effects(&self.element_id);
			return Err(RuntimeError::ElementNotFound {
				id: self.element_id.clone(),
			});
		}
		debug_log!("rendered {}", self.element_id);
		runtime.flush_effects(&self.element_id);
		Ok(())
	}
}

impl Runtime {
	/// Mounts a component on the element `element_id` and renders it.
	///
	/// Any component previously mounted on the same element is torn down
	/// first. The component re-renders whenever one of its states changes or
	/// a context is written.
	pub fn reactive_component<F>(&self, element_id: &str, render: F) -> Result<Unmount, RuntimeError>
	where
		F: Fn(&Scope<'_>) -> Result<String, RuntimeError> + 'static,
	{
		if !self.document().has_element(element_id) {
			error_log!("cannot mount component: element `{}` not found", element_id);
			return Err(RuntimeError::ElementNotFound {
				id: element_id.to_string(),
			});
		}

		let previous = self.inner.mounted.borrow_mut().remove(element_id);
		if let Some(previous) = previous {
			self.teardown(&previous);
		}

		let instance = Rc::new(Instance {
			element_id: element_id.to_string(),
			render_fn: Box::new(render),
			mounted: Cell::new(true),
			rendering: Cell::new(false),
			listener: Cell::new(None),
		});

		let runtime = self.downgrade();
		let weak_instance = Rc::downgrade(&instance);
		let listener = self.subscribe_component(element_id, move || {
			let (Some(inner), Some(instance)) = (runtime.upgrade(), weak_instance.upgrade()) else {
				return;
			};
			if let Err(error) = instance.render(&Runtime::from_inner(inner)) {
				error_log!("re-render of `{}` failed: {}", instance.element_id, error);
			}
		});
		instance.listener.set(Some(listener));
		self.inner
			.mounted
			.borrow_mut()
			.insert(element_id.to_string(), Rc::clone(&instance));

		if let Err(error) = instance.render(self) {
			error_log!("mounting `{}` failed: {}", element_id, error);
			self.teardown(&instance);
			return Err(error);
		}
		Ok(Unmount {
			runtime: self.downgrade(),
			instance,
		})
	}

	/// Whether a component is currently mounted on `element_id`.
	pub fn is_mounted(&self, element_id: &str) -> bool {
		self.inner.mounted.borrow().contains_key(element_id)
	}

	/// Tears down whatever is mounted on `element_id`.
	pub(crate) fn unmount_element(&self, element_id: &str) {
		let instance = self.inner.mounted.borrow_mut().remove(element_id);
		if let Some(instance) = instance {
			self.teardown(&instance);
		}
	}

	/// Stops the instance, runs its effect cleanups and deregisters it. Hook
	/// state is purged once no listener is left for the element.
	fn teardown(&self, instance: &Rc<Instance>) {
		instance.mounted.set(false);
		{
			let mut mounted = self.inner.mounted.borrow_mut();
			if mounted
				.get(&instance.element_id)
				.is_some_and(|current| Rc::ptr_eq(current, instance))
			{
				mounted.remove(&instance.element_id);
			}
		}

		let cleanups = self
			.inner
			.hooks
			.borrow_mut()
			.get_mut(&instance.element_id)
			.map(|record| record.take_cleanups())
			.unwrap_or_default();
		for cleanup in cleanups {
			cleanup();
		}

		if let Some(listener) = instance.listener.take() {
			self.unsubscribe_component(&instance.element_id, listener);
		}
		if self.listener_count(&instance.element_id) == 0 {
			self.cleanup_component(&instance.element_id);
		}
		debug_log!("unmounted {}", instance.element_id);
	}
}

/// Returned by [`Runtime::reactive_component`]; unmounts the component.
pub struct Unmount {
	runtime: Weak<RuntimeInner>,
	instance: Rc<Instance>,
}

impl std::fmt::Debug for Unmount {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Unmount")
			.field("element_id", &self.instance.element_id)
			.field("mounted", &self.instance.mounted.get())
			.finish()
	}
}

impl Unmount {
	pub fn element_id(&self) -> &str {
		&self.instance.element_id
	}

	pub fn is_mounted(&self) -> bool {
		self.instance.mounted.get()
	}

	/// Unmounts the component. Calling it again, or after the element was
	/// re-mounted by another component, does nothing.
	pub fn unmount(&self) {
		if !self.instance.mounted.get() {
			return;
		}
		if let Some(inner) = self.runtime.upgrade() {
			Runtime::from_inner(inner).teardown(&self.instance);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::{Document, MemoryDocument};
	use rstest::rstest;
	use std::cell::RefCell;

	fn setup() -> (Runtime, Rc<MemoryDocument>) {
		let document = Rc::new(MemoryDocument::new());
		document.insert_element("app", "");
		(Runtime::new(Rc::clone(&document)), document)
	}

	#[rstest]
	fn test_missing_element() {
		let (runtime, _) = setup();
		let error = runtime
			.reactive_component("nowhere", |_| Ok(String::new()))
			.unwrap_err();
		assert_eq!(error, RuntimeError::ElementNotFound { id: "nowhere".into() });
	}

	#[rstest]
	fn test_state_change_rerenders() {
		let (runtime, document) = setup();
		let setter = Rc::new(RefCell::new(None));
		let slot = Rc::clone(&setter);

		let _mounted = runtime
			.reactive_component("app", move |scope| {
				let (count, set_count) = scope.use_state(0)?;
				slot.borrow_mut().get_or_insert(set_count);
				Ok(format!("<b>{count}</b>"))
			})
			.unwrap();
		assert_eq!(document.inner_html("app").as_deref(), Some("<b>0</b>"));

		let set_count = setter.borrow().clone().unwrap();
		set_count.set(4);
		assert_eq!(document.inner_html("app").as_deref(), Some("<b>4</b>"));
	}

	#[rstest]
	fn test_set_during_render_is_coalesced() {
		let (runtime, document) = setup();
		let renders = Rc::new(Cell::new(0));
		let counter = Rc::clone(&renders);

		let _mounted = runtime
			.reactive_component("app", move |scope| {
				counter.set(counter.get() + 1);
				let (value, set_value) = scope.use_state(1)?;
				set_value.set(2);
				Ok(value.to_string())
			})
			.unwrap();

		assert_eq!(renders.get(), 1);
		assert_eq!(document.inner_html("app").as_deref(), Some("1"));
	}

	#[rstest]
	fn test_unmount_purges_hooks() {
		let (runtime, _) = setup();
		let cleaned = Rc::new(Cell::new(false));
		let flag = Rc::clone(&cleaned);

		let mounted = runtime
			.reactive_component("app", move |scope| {
				scope.use_state(1)?;
				scope.use_ref("node")?;
				let flag = Rc::clone(&flag);
				scope.use_effect(move || Some(Box::new(move || flag.set(true)) as crate::hooks::Cleanup), Some(()))?;
				Ok(String::new())
			})
			.unwrap();
		assert!(!runtime.component_state("app").is_empty());

		mounted.unmount();
		mounted.unmount();

		assert!(cleaned.get());
		assert!(!mounted.is_mounted());
		assert!(!runtime.is_mounted("app"));
		assert!(runtime.component_state("app").is_empty());
	}

	#[rstest]
	fn test_failed_first_render_leaves_nothing_mounted() {
		let (runtime, document) = setup();
		let error = runtime
			.reactive_component("app", |scope| {
				scope.use_state(0)?;
				Err(RuntimeError::Render("boom".into()))
			})
			.unwrap_err();

		assert_eq!(error, RuntimeError::Render("boom".into()));
		assert!(!runtime.is_mounted("app"));
		assert!(runtime.component_state("app").is_empty());
		assert_eq!(document.inner_html("app").as_deref(), Some(""));

		let _mounted = runtime.reactive_component("app", |_| Ok("ok".into())).unwrap();
		assert_eq!(runtime.component_state("app").listeners, 1);
	}

	#[rstest]
	fn test_remount_replaces_previous() {
		let (runtime, document) = setup();
		let first = runtime.reactive_component("app", |_| Ok("first".into())).unwrap();
		let _second = runtime.reactive_component("app", |_| Ok("second".into())).unwrap();

		assert!(!first.is_mounted());
		first.unmount();

		assert!(runtime.is_mounted("app"));
		assert_eq!(runtime.component_state("app").listeners, 1);
		assert_eq!(document.inner_html("app").as_deref(), Some("second"));
	}
}
