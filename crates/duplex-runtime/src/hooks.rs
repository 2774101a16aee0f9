//! Positional hooks.
//!
//! Each component id owns a [`HookRecord`]. A render pass resets its cursor,
//! and every hook call claims the next position, creating the slot on first
//! use. Slots therefore keep their identity across passes as long as hooks
//! are called in the same order.

mod effect;
mod reference;
mod state;

use std::any::Any;
use std::collections::BTreeMap;
use std::rc::Rc;

pub(crate) use effect::{EffectSlot, PendingEffect};
pub use reference::Ref;
pub(crate) use state::StateSlot;
pub use state::SetState;

use crate::error::RuntimeError;
use crate::runtime::Runtime;

/// Teardown returned by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

/// Hook slots of one component.
#[derive(Default)]
pub(crate) struct HookRecord {
	pub(crate) hook_index: usize,
	pub(crate) states: BTreeMap<usize, StateSlot>,
	pub(crate) effects: BTreeMap<usize, EffectSlot>,
	pub(crate) refs: BTreeMap<usize, Rc<dyn Any>>,
}

impl HookRecord {
	/// Runs every stored effect cleanup, consuming the record.
	pub(crate) fn run_cleanups(self) {
		for slot in self.effects.into_values() {
			if let Some(cleanup) = slot.cleanup {
				cleanup();
			}
		}
	}

	/// Takes every stored effect cleanup, leaving the slots in place.
	pub(crate) fn take_cleanups(&mut self) -> Vec<Cleanup> {
		self.effects
			.values_mut()
			.filter_map(|slot| slot.cleanup.take())
			.collect()
	}
}

/// The hook cursor of a render pass.
///
/// Render callbacks receive a `Scope` for the component being rendered.
pub struct Scope<'rt> {
	runtime: &'rt Runtime,
	component_id: String,
}

impl<'rt> Scope<'rt> {
	pub(crate) fn new(runtime: &'rt Runtime, component_id: &str) -> Self {
		Self {
			runtime,
			component_id: component_id.to_string(),
		}
	}

	pub fn component_id(&self) -> &str {
		&self.component_id
	}

	pub fn runtime(&self) -> &'rt Runtime {
		self.runtime
	}

	/// Returns the state at this position and a setter for it.
	///
	/// `initial` is only used the first time the position is reached.
	pub fn use_state<T>(&self, initial: T) -> Result<(T, SetState<T>), RuntimeError>
	where
		T: Clone + PartialEq + 'static,
	{
		state::use_state(self.runtime, &self.component_id, initial)
	}

	/// Queues `effect` to run after this pass when `deps` changed.
	///
	/// `None` deps run the effect after every pass. Otherwise it runs on the
	/// first pass and whenever `deps` differs from the previous pass.
	pub fn use_effect<F, D>(&self, effect: F, deps: Option<D>) -> Result<(), RuntimeError>
	where
		F: FnOnce() -> Option<Cleanup> + 'static,
		D: PartialEq + 'static,
	{
		effect::use_effect(self.runtime, &self.component_id, effect, deps)
	}

	/// Returns the box at this position, created from `initial` on first use.
	pub fn use_ref<T: 'static>(&self, initial: T) -> Result<Ref<T>, RuntimeError> {
		reference::use_ref(self.runtime, &self.component_id, initial)
	}

	/// Reads the current value of a context.
	pub fn use_context<T: Clone + 'static>(&self, context_id: &str) -> Result<T, RuntimeError> {
		self.runtime.context_value(context_id)
	}
}

impl Runtime {
	fn active_scope(&self, hook: &'static str) -> Result<Scope<'_>, RuntimeError> {
		self.current_component_id()
			.map(|id| Scope::new(self, &id))
			.ok_or(RuntimeError::InvalidHookCall { hook })
	}

	/// [`Scope::use_state`] for the component currently rendering.
	pub fn use_state<T>(&self, initial: T) -> Result<(T, SetState<T>), RuntimeError>
	where
		T: Clone + PartialEq + 'static,
	{
		self.active_scope("use_state")?.use_state(initial)
	}

	/// [`Scope::use_effect`] for the component currently rendering.
	pub fn use_effect<F, D>(&self, effect: F, deps: Option<D>) -> Result<(), RuntimeError>
	where
		F: FnOnce() -> Option<Cleanup> + 'static,
		D: PartialEq + 'static,
	{
		self.active_scope("use_effect")?.use_effect(effect, deps)
	}

	/// [`Scope::use_ref`] for the component currently rendering.
	pub fn use_ref<T: 'static>(&self, initial: T) -> Result<Ref<T>, RuntimeError> {
		self.active_scope("use_ref")?.use_ref(initial)
	}

	/// [`Scope::use_context`] for the component currently rendering.
	pub fn use_context<T: Clone + 'static>(&self, context_id: &str) -> Result<T, RuntimeError> {
		self.active_scope("use_context")?.use_context(context_id)
	}
}
