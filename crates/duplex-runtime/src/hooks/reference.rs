//! `use_ref`.

use std::any::Any;
use std::cell::{self, RefCell};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::Runtime;

pub(super) fn use_ref<T: 'static>(
	runtime: &Runtime,
	component_id: &str,
	initial: T,
) -> Result<Ref<T>, RuntimeError> {
	let index = runtime.next_hook_index(component_id);
	let slot = {
		let mut hooks = runtime.inner.hooks.borrow_mut();
		let record = hooks.entry(component_id.to_string()).or_default();
		Rc::clone(
			record
				.refs
				.entry(index)
				.or_insert_with(|| Rc::new(RefCell::new(initial)) as Rc<dyn Any>),
		)
	};
	slot.downcast::<RefCell<T>>()
		.map(|cell| Ref { cell })
		.map_err(|_| RuntimeError::HookTypeMismatch {
			component: component_id.to_string(),
			index,
		})
}

/// A mutable box that survives re-renders without triggering them.
pub struct Ref<T> {
	cell: Rc<RefCell<T>>,
}

impl<T> Clone for Ref<T> {
	fn clone(&self) -> Self {
		Self {
			cell: Rc::clone(&self.cell),
		}
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for Ref<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Ref").field(&self.cell.borrow()).finish()
	}
}

impl<T> Ref<T> {
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.cell.borrow().clone()
	}

	pub fn set(&self, value: T) {
		*self.cell.borrow_mut() = value;
	}

	pub fn borrow(&self) -> cell::Ref<'_, T> {
		self.cell.borrow()
	}

	pub fn borrow_mut(&self) -> cell::RefMut<'_, T> {
		self.cell.borrow_mut()
	}

	/// Whether both handles point at the same slot.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.cell, &other.cell)
	}
}
