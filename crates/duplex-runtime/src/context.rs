//! The context store.
//!
//! Contexts are values shared between components under a string id. Writing
//! a context re-renders every mounted component, since the runtime does not
//! track which of them read it.

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Weak;

use crate::debug_log;
use crate::error::RuntimeError;
use crate::runtime::{Runtime, RuntimeInner};

impl Runtime {
	/// Creates the context `id` holding `initial`.
	///
	/// If the context already exists its value is kept and `initial` is
	/// dropped. Fails when the existing value has another type.
	pub fn create_context<T: Clone + 'static>(
		&self,
		id: &str,
		initial: T,
	) -> Result<ContextHandle<T>, RuntimeError> {
		{
			let mut contexts = self.inner.contexts.borrow_mut();
			let value = contexts
				.entry(id.to_string())
				.or_insert_with(|| Box::new(initial) as Box<dyn Any>);
			if !value.is::<T>() {
				return Err(RuntimeError::ContextTypeMismatch { id: id.to_string() });
			}
		}
		debug_log!("context created: {}", id);
		Ok(ContextHandle {
			runtime: self.downgrade(),
			id: id.to_string(),
			_marker: PhantomData,
		})
	}

	/// A handle to an existing context.
	pub fn context<T: Clone + 'static>(&self, id: &str) -> Result<ContextHandle<T>, RuntimeError> {
		self.context_value::<T>(id)?;
		Ok(ContextHandle {
			runtime: self.downgrade(),
			id: id.to_string(),
			_marker: PhantomData,
		})
	}

	pub(crate) fn context_value<T: Clone + 'static>(&self, id: &str) -> Result<T, RuntimeError> {
		let contexts = self.inner.contexts.borrow();
		let value = contexts
			.get(id)
			.ok_or_else(|| RuntimeError::UnknownContext { id: id.to_string() })?;
		value
			.downcast_ref::<T>()
			.cloned()
			.ok_or_else(|| RuntimeError::ContextTypeMismatch { id: id.to_string() })
	}

	/// Removes a context. Returns whether it existed.
	pub fn delete_context(&self, id: &str) -> bool {
		self.inner.contexts.borrow_mut().remove(id).is_some()
	}

	pub fn has_context(&self, id: &str) -> bool {
		self.inner.contexts.borrow().contains_key(id)
	}
}

/// Reads and writes one context.
pub struct ContextHandle<T> {
	runtime: Weak<RuntimeInner>,
	id: String,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ContextHandle<T> {
	fn clone(&self) -> Self {
		Self {
			runtime: Weak::clone(&self.runtime),
			id: self.id.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for ContextHandle<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContextHandle").field("id", &self.id).finish()
	}
}

impl<T: Clone + 'static> ContextHandle<T> {
	pub fn id(&self) -> &str {
		&self.id
	}

	fn runtime(&self) -> Result<Runtime, RuntimeError> {
		self.runtime
			.upgrade()
			.map(Runtime::from_inner)
			.ok_or_else(|| RuntimeError::UnknownContext { id: self.id.clone() })
	}

	pub fn get(&self) -> Result<T, RuntimeError> {
		self.runtime()?.context_value(&self.id)
	}

	/// Replaces the value and notifies every component listener.
	pub fn set(&self, value: T) -> Result<(), RuntimeError> {
		let runtime = self.runtime()?;
		{
			let mut contexts = runtime.inner.contexts.borrow_mut();
			let slot = contexts
				.get_mut(&self.id)
				.ok_or_else(|| RuntimeError::UnknownContext { id: self.id.clone() })?;
			if !slot.is::<T>() {
				return Err(RuntimeError::ContextTypeMismatch { id: self.id.clone() });
			}
			*slot = Box::new(value);
		}
		debug_log!("context updated: {}", self.id);
		runtime.notify_all_components();
		Ok(())
	}

	pub fn update(&self, next: impl FnOnce(&T) -> T) -> Result<(), RuntimeError> {
		let current = self.get()?;
		self.set(next(&current))
	}
}
