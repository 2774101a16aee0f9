//! `use_effect`.

use std::any::Any;

use super::Cleanup;
use crate::error::RuntimeError;
use crate::runtime::Runtime;

#[derive(Default)]
pub(crate) struct EffectSlot {
	pub(crate) cleanup: Option<Cleanup>,
	pub(crate) last_deps: Option<Box<dyn Any>>,
}

/// An effect waiting for the end of its render pass.
pub(crate) struct PendingEffect {
	pub(crate) component_id: String,
	pub(crate) index: usize,
	pub(crate) run: Box<dyn FnOnce() -> Option<Cleanup>>,
	pub(crate) deps: Option<Box<dyn Any>>,
}

pub(super) fn use_effect<F, D>(
	runtime: &Runtime,
	component_id: &str,
	effect: F,
	deps: Option<D>,
) -> Result<(), RuntimeError>
where
	F: FnOnce() -> Option<Cleanup> + 'static,
	D: PartialEq + 'static,
{
	let index = runtime.next_hook_index(component_id);
	let should_run = {
		let mut hooks = runtime.inner.hooks.borrow_mut();
		let record = hooks.entry(component_id.to_string()).or_default();
		let slot = record.effects.entry(index).or_default();
		match (&deps, &slot.last_deps) {
			(Some(next), Some(previous)) => previous.downcast_ref::<D>() != Some(next),
			_ => true,
		}
	};

	if should_run {
		runtime.inner.pending_effects.borrow_mut().push(PendingEffect {
			component_id: component_id.to_string(),
			index,
			run: Box::new(effect),
			deps: deps.map(|deps| Box::new(deps) as Box<dyn Any>),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::dom::MemoryDocument;
	use crate::runtime::Runtime;
	use rstest::rstest;
	use std::cell::RefCell;
	use std::rc::Rc;

	fn pass(runtime: &Runtime, log: &Rc<RefCell<Vec<String>>>, deps: Option<i32>) {
		let log = Rc::clone(log);
		runtime.render_pass("c", move |scope| {
			let run_log = Rc::clone(&log);
			scope
				.use_effect(
					move || {
						run_log.borrow_mut().push(format!("run {deps:?}"));
						let cleanup_log = Rc::clone(&run_log);
						Some(Box::new(move || {
							cleanup_log.borrow_mut().push(format!("cleanup {deps:?}"));
						}) as super::Cleanup)
					},
					deps,
				)
				.unwrap();
		});
	}

	#[rstest]
	fn test_effect_runs_when_deps_change() {
		let runtime = Runtime::new(Rc::new(MemoryDocument::new()));
		let log = Rc::new(RefCell::new(Vec::new()));

		pass(&runtime, &log, Some(1));
		pass(&runtime, &log, Some(1));
		pass(&runtime, &log, Some(2));
		runtime.cleanup_component("c");

		assert_eq!(
			*log.borrow(),
			vec!["run Some(1)", "cleanup Some(1)", "run Some(2)", "cleanup Some(2)"]
		);
	}

	#[rstest]
	fn test_effect_without_deps_runs_every_pass() {
		let runtime = Runtime::new(Rc::new(MemoryDocument::new()));
		let log = Rc::new(RefCell::new(Vec::new()));

		pass(&runtime, &log, None);
		pass(&runtime, &log, None);

		assert_eq!(*log.borrow(), vec!["run None", "cleanup None", "run None"]);
	}

	#[rstest]
	fn test_effects_run_after_the_pass() {
		let runtime = Runtime::new(Rc::new(MemoryDocument::new()));
		let log = Rc::new(RefCell::new(Vec::new()));
		let inner_log = Rc::clone(&log);

		runtime.render_pass("c", move |scope| {
			let effect_log = Rc::clone(&inner_log);
			scope
				.use_effect(
					move || {
						effect_log.borrow_mut().push("effect");
						None
					},
					None::<()>,
				)
				.unwrap();
			inner_log.borrow_mut().push("render");
		});

		assert_eq!(*log.borrow(), vec!["render", "effect"]);
	}
}
