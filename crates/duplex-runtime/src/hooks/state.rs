//! `use_state` and its setter.

use std::any::Any;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::debug_log;
use crate::error::RuntimeError;
use crate::runtime::{Listener, ListenerId, Runtime, RuntimeInner};

pub(crate) struct StateSlot {
	value: Box<dyn Any>,
	listeners: Vec<(ListenerId, Listener)>,
}

pub(super) fn use_state<T>(
	runtime: &Runtime,
	component_id: &str,
	initial: T,
) -> Result<(T, SetState<T>), RuntimeError>
where
	T: Clone + PartialEq + 'static,
{
	let index = runtime.next_hook_index(component_id);
	let mut hooks = runtime.inner.hooks.borrow_mut();
	let record = hooks.entry(component_id.to_string()).or_default();
	let slot = record.states.entry(index).or_insert_with(|| StateSlot {
		value: Box::new(initial),
		listeners: Vec::new(),
	});
	let value = slot
		.value
		.downcast_ref::<T>()
		.cloned()
		.ok_or_else(|| RuntimeError::HookTypeMismatch {
			component: component_id.to_string(),
			index,
		})?;

	Ok((
		value,
		SetState {
			runtime: runtime.downgrade(),
			component_id: component_id.to_string(),
			index,
			_marker: PhantomData,
		},
	))
}

/// Writes a state slot and notifies whoever depends on it.
///
/// The setter stays valid after the render pass that produced it. Once the
/// component has been cleaned up, writes are ignored.
pub struct SetState<T> {
	runtime: Weak<RuntimeInner>,
	component_id: String,
	index: usize,
	_marker: PhantomData<fn(T)>,
}

impl<T> Clone for SetState<T> {
	fn clone(&self) -> Self {
		Self {
			runtime: Weak::clone(&self.runtime),
			component_id: self.component_id.clone(),
			index: self.index,
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for SetState<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SetState")
			.field("component_id", &self.component_id)
			.field("index", &self.index)
			.finish()
	}
}

impl<T: Clone + PartialEq + 'static> SetState<T> {
	/// Stores `value`.
	///
	/// If it equals the current value nothing happens and `false` is
	/// returned. Otherwise the slot's own listeners run, then the component's
	/// listeners, each exactly once.
	pub fn set(&self, value: T) -> bool {
		let Some(inner) = self.runtime.upgrade() else {
			return false;
		};
		let listeners: Vec<Listener> = {
			let mut hooks = inner.hooks.borrow_mut();
			let Some(slot) = hooks
				.get_mut(&self.component_id)
				.and_then(|record| record.states.get_mut(&self.index))
			else {
				return false;
			};
			if slot.value.downcast_ref::<T>() == Some(&value) {
				return false;
			}
			slot.value = Box::new(value);
			slot.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
		};
		debug_log!("state {}#{} changed", self.component_id, self.index);

		for listener in listeners {
			listener();
		}
		Runtime::from_inner(inner).notify_component(&self.component_id);
		true
	}

	/// Computes the next value from the current one.
	pub fn update(&self, next: impl FnOnce(&T) -> T) -> bool {
		match self.get() {
			Some(current) => self.set(next(&current)),
			None => false,
		}
	}

	/// The current value, or `None` once the slot is gone.
	pub fn get(&self) -> Option<T> {
		let inner = self.runtime.upgrade()?;
		let hooks = inner.hooks.borrow();
		hooks
			.get(&self.component_id)
			.and_then(|record| record.states.get(&self.index))
			.and_then(|slot| slot.value.downcast_ref::<T>())
			.cloned()
	}

	/// Registers a callback run after each effective write.
	pub fn subscribe(&self, listener: impl Fn() + 'static) -> Option<ListenerId> {
		let inner = self.runtime.upgrade()?;
		let id = inner.next_listener_id();
		let mut hooks = inner.hooks.borrow_mut();
		let slot = hooks
			.get_mut(&self.component_id)
			.and_then(|record| record.states.get_mut(&self.index))?;
		slot.listeners.push((id, Rc::new(listener)));
		Some(id)
	}

	pub fn unsubscribe(&self, listener: ListenerId) -> bool {
		let Some(inner) = self.runtime.upgrade() else {
			return false;
		};
		let mut hooks = inner.hooks.borrow_mut();
		let Some(slot) = hooks
			.get_mut(&self.component_id)
			.and_then(|record| record.states.get_mut(&self.index))
		else {
			return false;
		};
		let before = slot.listeners.len();
		slot.listeners.retain(|(id, _)| *id != listener);
		slot.listeners.len() != before
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::MemoryDocument;
	use rstest::rstest;
	use std::cell::Cell;

	fn counted(counter: &Rc<Cell<usize>>) -> impl Fn() + 'static {
		let counter = Rc::clone(counter);
		move || counter.set(counter.get() + 1)
	}

	#[rstest]
	#[case(1, 0)]
	#[case(2, 1)]
	fn test_set_notifies_once_per_change(#[case] next: i32, #[case] expected: usize) {
		let runtime = Runtime::new(Rc::new(MemoryDocument::new()));
		let (_, set) = runtime.render_pass("c", |scope| scope.use_state(1).unwrap());

		let state_calls = Rc::new(Cell::new(0));
		let component_calls = Rc::new(Cell::new(0));
		set.subscribe(counted(&state_calls)).unwrap();
		runtime.subscribe_component("c", counted(&component_calls));

		set.set(next);

		assert_eq!(state_calls.get(), expected);
		assert_eq!(component_calls.get(), expected);
	}

	#[rstest]
	fn test_update_and_unsubscribe() {
		let runtime = Runtime::new(Rc::new(MemoryDocument::new()));
		let (_, set) = runtime.render_pass("c", |scope| scope.use_state(10).unwrap());
		let calls = Rc::new(Cell::new(0));
		let listener = set.subscribe(counted(&calls)).unwrap();

		assert!(set.update(|n| n + 1));
		assert!(set.unsubscribe(listener));
		assert!(set.update(|n| n * 2));

		assert_eq!(set.get(), Some(22));
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_setter_after_cleanup() {
		let runtime = Runtime::new(Rc::new(MemoryDocument::new()));
		let (_, set) = runtime.render_pass("c", |scope| scope.use_state(0).unwrap());
		runtime.cleanup_component("c");

		assert!(!set.set(3));
		assert_eq!(set.get(), None);
		assert!(runtime.component_state("c").is_empty());
	}
}
