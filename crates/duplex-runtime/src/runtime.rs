//! The runtime object and its component bookkeeping.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::component::Instance;
use crate::dom::Document;
use crate::hooks::{HookRecord, PendingEffect, Scope};
use crate::router::Router;
use crate::{debug_log, error_log};

pub(crate) type Listener = Rc<dyn Fn()>;

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub(crate) struct RuntimeInner {
	pub(crate) document: Rc<dyn Document>,
	installed: Cell<bool>,
	current_component: RefCell<Option<String>>,
	pub(crate) hooks: RefCell<HashMap<String, HookRecord>>,
	component_listeners: RefCell<HashMap<String, Vec<(ListenerId, Listener)>>>,
	pub(crate) contexts: RefCell<HashMap<String, Box<dyn Any>>>,
	pub(crate) routers: RefCell<HashMap<String, Router>>,
	pub(crate) mounted: RefCell<HashMap<String, Rc<Instance>>>,
	pub(crate) pending_effects: RefCell<Vec<PendingEffect>>,
	next_listener: Cell<u64>,
}

impl RuntimeInner {
	pub(crate) fn next_listener_id(&self) -> ListenerId {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		ListenerId(id)
	}
}

/// Restores the previously active component when a pass ends.
struct CursorGuard<'a> {
	inner: &'a RuntimeInner,
	previous: Option<String>,
}

impl Drop for CursorGuard<'_> {
	fn drop(&mut self) {
		*self.inner.current_component.borrow_mut() = self.previous.take();
	}
}

/// Debug snapshot of a component's hook slots, keyed by hook index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentState {
	pub hook_index: usize,
	pub states: Vec<usize>,
	pub effects: Vec<usize>,
	pub refs: Vec<usize>,
	pub listeners: usize,
}

impl ComponentState {
	/// True when no hook slot or listener is left for the component.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty() && self.effects.is_empty() && self.refs.is_empty() && self.listeners == 0
	}
}

/// The client runtime.
///
/// Cloning is cheap and every clone shares the same state. The runtime is
/// single-threaded; no internal borrow is held while user callbacks run, so
/// callbacks may freely call back into it.
#[derive(Clone)]
pub struct Runtime {
	pub(crate) inner: Rc<RuntimeInner>,
}

impl std::fmt::Debug for Runtime {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Runtime")
			.field("installed", &self.inner.installed.get())
			.field("components", &self.inner.hooks.borrow().len())
			.field("mounted", &self.inner.mounted.borrow().len())
			.field("routers", &self.inner.routers.borrow().len())
			.finish()
	}
}

impl Runtime {
	/// Creates a runtime rendering into `document`.
	pub fn new<D: Document + 'static>(document: Rc<D>) -> Self {
		Self {
			inner: Rc::new(RuntimeInner {
				document,
				installed: Cell::new(false),
				current_component: RefCell::new(None),
				hooks: RefCell::new(HashMap::new()),
				component_listeners: RefCell::new(HashMap::new()),
				contexts: RefCell::new(HashMap::new()),
				routers: RefCell::new(HashMap::new()),
				mounted: RefCell::new(HashMap::new()),
				pending_effects: RefCell::new(Vec::new()),
				next_listener: Cell::new(0),
			}),
		}
	}

	/// Creates a runtime on the page's `document`.
	#[cfg(target_arch = "wasm32")]
	pub fn browser() -> Option<Self> {
		crate::dom::BrowserDocument::new().map(|document| Self::new(Rc::new(document)))
	}

	pub(crate) fn from_inner(inner: Rc<RuntimeInner>) -> Self {
		Self { inner }
	}

	pub(crate) fn downgrade(&self) -> Weak<RuntimeInner> {
		Rc::downgrade(&self.inner)
	}

	pub fn document(&self) -> Rc<dyn Document> {
		Rc::clone(&self.inner.document)
	}

	/// Marks the runtime as installed. Returns `false` if it already was.
	pub fn install(&self) -> bool {
		if self.inner.installed.replace(true) {
			return false;
		}
		debug_log!("runtime installed");
		true
	}

	pub fn is_installed(&self) -> bool {
		self.inner.installed.get()
	}

	/// Tears everything down: effect cleanups run, mounted components stop
	/// reacting, and hooks, contexts and routers are dropped.
	pub fn reset(&self) {
		let instances: Vec<_> = self.inner.mounted.borrow_mut().drain().map(|(_, i)| i).collect();
		for instance in instances {
			instance.mounted.set(false);
		}
		let records: Vec<_> = self.inner.hooks.borrow_mut().drain().map(|(_, r)| r).collect();
		self.inner.pending_effects.borrow_mut().clear();
		self.inner.component_listeners.borrow_mut().clear();
		self.inner.contexts.borrow_mut().clear();
		self.inner.routers.borrow_mut().clear();
		*self.inner.current_component.borrow_mut() = None;
		self.inner.installed.set(false);

		for record in records {
			record.run_cleanups();
		}
	}

	/// Id of the component currently being rendered, if any.
	pub fn current_component_id(&self) -> Option<String> {
		self.inner.current_component.borrow().clone()
	}

	/// Runs `render` as a render pass of `component_id` and flushes the
	/// effects it queued.
	///
	/// Passes nest: the previously active component is restored afterwards.
	pub fn render_pass<R>(&self, component_id: &str, render: impl FnOnce(&Scope<'_>) -> R) -> R {
		let result = self.run_pass(component_id, render);
		self.flush_effects(component_id);
		result
	}

	pub(crate) fn run_pass<R>(&self, component_id: &str, render: impl FnOnce(&Scope<'_>) -> R) -> R {
		let previous = self
			.inner
			.current_component
			.replace(Some(component_id.to_string()));
		let _guard = CursorGuard {
			inner: &self.inner,
			previous,
		};
		if let Some(record) = self.inner.hooks.borrow_mut().get_mut(component_id) {
			record.hook_index = 0;
		}
		debug_log!("render pass: {}", component_id);
		render(&Scope::new(self, component_id))
	}

	/// Claims the next hook position of `component_id`.
	pub(crate) fn next_hook_index(&self, component_id: &str) -> usize {
		let mut hooks = self.inner.hooks.borrow_mut();
		let record = hooks.entry(component_id.to_string()).or_default();
		let index = record.hook_index;
		record.hook_index += 1;
		index
	}

	/// Registers a callback run whenever `component_id` should re-render.
	pub fn subscribe_component(&self, component_id: &str, listener: impl Fn() + 'static) -> ListenerId {
		let id = self.inner.next_listener_id();
		self.inner
			.component_listeners
			.borrow_mut()
			.entry(component_id.to_string())
			.or_default()
			.push((id, Rc::new(listener)));
		id
	}

	pub fn unsubscribe_component(&self, component_id: &str, listener: ListenerId) -> bool {
		let mut listeners = self.inner.component_listeners.borrow_mut();
		let Some(entries) = listeners.get_mut(component_id) else {
			return false;
		};
		let before = entries.len();
		entries.retain(|(id, _)| *id != listener);
		let removed = entries.len() != before;
		if entries.is_empty() {
			listeners.remove(component_id);
		}
		removed
	}

	pub(crate) fn listener_count(&self, component_id: &str) -> usize {
		self.inner
			.component_listeners
			.borrow()
			.get(component_id)
			.map_or(0, Vec::len)
	}

	/// Calls every listener of `component_id`.
	pub fn notify_component(&self, component_id: &str) {
		let listeners: Vec<Listener> = self
			.inner
			.component_listeners
			.borrow()
			.get(component_id)
			.map(|entries| entries.iter().map(|(_, l)| Rc::clone(l)).collect())
			.unwrap_or_default();
		for listener in listeners {
			listener();
		}
	}

	/// Calls every listener of every component.
	pub fn notify_all_components(&self) {
		let listeners: Vec<Listener> = self
			.inner
			.component_listeners
			.borrow()
			.values()
			.flat_map(|entries| entries.iter().map(|(_, l)| Rc::clone(l)))
			.collect();
		for listener in listeners {
			listener();
		}
	}

	/// Runs the effects queued for `component_id`.
	///
	/// For each effect the previous cleanup runs first, then the effect; its
	/// returned cleanup and dependencies are stored in the slot.
	pub fn flush_effects(&self, component_id: &str) {
		let queued: Vec<PendingEffect> = {
			let mut pending = self.inner.pending_effects.borrow_mut();
			let (ours, rest) = pending
				.drain(..)
				.partition(|effect| effect.component_id == component_id);
			*pending = rest;
			ours
		};

		for effect in queued {
			let previous = self
				.inner
				.hooks
				.borrow_mut()
				.get_mut(&effect.component_id)
				.and_then(|record| record.effects.get_mut(&effect.index))
				.and_then(|slot| slot.cleanup.take());
			if let Some(cleanup) = previous {
				cleanup();
			}

			let cleanup = (effect.run)();

			let orphaned = {
				let mut hooks = self.inner.hooks.borrow_mut();
				match hooks
					.get_mut(&effect.component_id)
					.and_then(|record| record.effects.get_mut(&effect.index))
				{
					Some(slot) => {
						slot.cleanup = cleanup;
						slot.last_deps = effect.deps;
						None
					}
					// The component was cleaned up by its own effect.
					None => cleanup,
				}
			};
			if let Some(cleanup) = orphaned {
				cleanup();
			}
		}
	}

	pub(crate) fn discard_effects(&self, component_id: &str) {
		self.inner
			.pending_effects
			.borrow_mut()
			.retain(|effect| effect.component_id != component_id);
	}

	/// Snapshot of the hook slots held for `component_id`.
	pub fn component_state(&self, component_id: &str) -> ComponentState {
		let listeners = self.listener_count(component_id);
		let hooks = self.inner.hooks.borrow();
		match hooks.get(component_id) {
			Some(record) => ComponentState {
				hook_index: record.hook_index,
				states: record.states.keys().copied().collect(),
				effects: record.effects.keys().copied().collect(),
				refs: record.refs.keys().copied().collect(),
				listeners,
			},
			None => ComponentState {
				listeners,
				..ComponentState::default()
			},
		}
	}

	/// [`component_state`](Self::component_state) as JSON, the shape the
	/// `__getComponentState` debug entry point returns.
	pub fn component_state_json(&self, component_id: &str) -> String {
		match serde_json::to_string(&self.component_state(component_id)) {
			Ok(json) => json,
			Err(error) => {
				error_log!("failed to serialize state of {}: {}", component_id, error);
				String::from("{}")
			}
		}
	}

	/// Drops all hook state of `component_id` after running its effect
	/// cleanups. Listeners registered for it are removed too.
	pub fn cleanup_component(&self, component_id: &str) {
		let record = self.inner.hooks.borrow_mut().remove(component_id);
		self.discard_effects(component_id);
		self.inner.component_listeners.borrow_mut().remove(component_id);
		debug_log!("cleaned up component {}", component_id);
		if let Some(record) = record {
			record.run_cleanups();
		}
	}
}
