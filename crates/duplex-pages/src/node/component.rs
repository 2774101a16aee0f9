//! Components: named callables that substitute for an element at render time.

use std::fmt;
use std::rc::Rc;

use super::{Attributes, Node};

/// Errors raised while invoking a component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
	#[error("component `{component}` failed: {message}")]
	Failed { component: String, message: String },
}

/// The input a component is invoked with.
#[derive(Debug, Default)]
pub struct Props {
	pub attributes: Attributes,
	pub children: Vec<Node>,
}

type RenderFn = dyn Fn(Props) -> Result<Node, ComponentError>;

/// A named render function.
///
/// Cloning is cheap; the callable is shared.
#[derive(Clone)]
pub struct Component {
	name: String,
	render: Rc<RenderFn>,
}

impl Component {
	/// Wraps an infallible render function.
	pub fn new<F>(name: impl Into<String>, render: F) -> Self
	where
		F: Fn(Props) -> Node + 'static,
	{
		Self {
			name: name.into(),
			render: Rc::new(move |props| Ok(render(props))),
		}
	}

	/// Wraps a render function that can fail; the error message ends up in the
	/// rendered output as a comment.
	pub fn fallible<F, E>(name: impl Into<String>, render: F) -> Self
	where
		F: Fn(Props) -> Result<Node, E> + 'static,
		E: fmt::Display,
	{
		let name = name.into();
		let component = name.clone();
		Self {
			name,
			render: Rc::new(move |props| {
				render(props).map_err(|error| ComponentError::Failed {
					component: component.clone(),
					message: error.to_string(),
				})
			}),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Invokes the component.
	pub fn invoke(&self, props: Props) -> Result<Node, ComponentError> {
		(self.render)(props)
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::{AttrValue, Element};
	use rstest::rstest;

	#[rstest]
	fn test_component_receives_props() {
		let greeting = Component::new("Greeting", |props: Props| {
			let name = props
				.attributes
				.get("name")
				.and_then(AttrValue::as_str)
				.unwrap_or("stranger")
				.to_string();
			Element::new("p")
				.child(format!("hi {name}"))
				.children(props.children)
				.into_node()
		});

		let mut attributes = Attributes::new();
		attributes.insert("name", "ada");
		let node = greeting
			.invoke(Props {
				attributes,
				children: vec![Node::from("!")],
			})
			.unwrap();

		let Node::Element(element) = node else {
			panic!("expected element");
		};
		assert_eq!(element.tag_name(), Some("p"));
		assert_eq!(element.child_nodes().len(), 2);
	}

	#[rstest]
	fn test_fallible_component_reports_name() {
		let broken = Component::fallible("Broken", |_| Err::<Node, _>("no data"));
		let error = broken.invoke(Props::default()).unwrap_err();

		assert_eq!(
			error,
			ComponentError::Failed {
				component: "Broken".to_string(),
				message: "no data".to_string(),
			}
		);
		assert_eq!(error.to_string(), "component `Broken` failed: no data");
	}
}
