//! Handlers every registry built with [`HandlerRegistry::with_standard_handlers`]
//! starts with.
//!
//! [`HandlerRegistry::with_standard_handlers`]: super::HandlerRegistry::with_standard_handlers

use super::{
	AttributeHandler, DomContext, DomOutput, REACTIVE_COMPONENT_ENTRY, RUNTIME_NAMESPACE, Script,
	StaticContext, StaticOutput,
};
use crate::escape::{escape_attribute, escape_json_for_script, js_string};
use crate::function::ClientFn;
use crate::node::AttrValue;

/// `className`, `client`, `reactive` and `on*`, in that order.
pub fn standard_handlers() -> Vec<AttributeHandler> {
	vec![class_name(), client(), reactive(), events()]
}

fn class_name() -> AttributeHandler {
	AttributeHandler::new("className")
		.on_static(|cx| {
			let html = if cx.value.is_omitted() {
				String::new()
			} else {
				format!(
					" class=\"{}\"",
					escape_attribute(&cx.value.to_attribute_text())
				)
			};
			StaticOutput {
				html,
				..Default::default()
			}
		})
		.on_dom(|cx| {
			let fragments = if cx.value.is_omitted() {
				Vec::new()
			} else {
				vec![format!(
					"{}.className = {};",
					cx.element_var,
					js_string(&cx.value.to_attribute_text())
				)]
			};
			DomOutput {
				fragments,
				..Default::default()
			}
		})
}

fn client() -> AttributeHandler {
	AttributeHandler::new("client")
		.reads_siblings()
		.on_static(|cx: &mut StaticContext<'_>| {
			let Some(function) = client_function(&cx.value) else {
				return StaticOutput::default();
			};
			let props = cx.attributes.to_props_json(cx.key).to_string();
			let target = format!("document.getElementById({})", js_string(cx.element_id));
			StaticOutput {
				scripts: vec![Script::Inline(client_script(&function, &props, &target))],
				lock_children: true,
				..Default::default()
			}
		})
		.on_dom(|cx: &mut DomContext<'_>| {
			let Some(function) = client_function(&cx.value) else {
				return DomOutput::default();
			};
			let props = cx.attributes.to_props_json(cx.key).to_string();
			DomOutput {
				fragments: vec![client_script(&function, &props, cx.element_var)],
				lock_children: true,
			}
		})
}

fn reactive() -> AttributeHandler {
	AttributeHandler::new("reactive")
		.on_static(|cx| {
			let Some(callback) = listener_source(&cx.value) else {
				return StaticOutput::default();
			};
			StaticOutput {
				scripts: vec![Script::Inline(reactive_call(cx.element_id, &callback))],
				..Default::default()
			}
		})
		.on_dom(|cx| {
			let Some(callback) = listener_source(&cx.value) else {
				return DomOutput::default();
			};
			let mut fragments = Vec::new();
			if !cx.explicit_id {
				fragments.push(format!(
					"{}.id = {};",
					cx.element_var,
					js_string(cx.element_id)
				));
			}
			// The element is only attached once the enclosing script has run.
			fragments.push(format!(
				"queueMicrotask(function(){{{}}});",
				reactive_call(cx.element_id, &callback)
			));
			DomOutput {
				fragments,
				..Default::default()
			}
		})
}

fn events() -> AttributeHandler {
	AttributeHandler::new("on*")
		.on_static(|cx| {
			let Some(listener) = listener_source(&cx.value) else {
				return StaticOutput::default();
			};
			let target = format!("document.getElementById({})", js_string(cx.element_id));
			StaticOutput {
				scripts: vec![Script::Inline(add_listener(&target, cx.key, &listener))],
				..Default::default()
			}
		})
		.on_dom(|cx| {
			let Some(listener) = listener_source(&cx.value) else {
				return DomOutput::default();
			};
			DomOutput {
				fragments: vec![add_listener(cx.element_var, cx.key, &listener)],
				..Default::default()
			}
		})
}

fn client_function(value: &AttrValue) -> Option<ClientFn> {
	match value {
		AttrValue::Function(function) => Some(function.clone()),
		AttrValue::Str(source) => Some(ClientFn::from_source(source)),
		_ => None,
	}
}

/// A function expression for a callback value; strings are taken as raw
/// expressions.
fn listener_source(value: &AttrValue) -> Option<String> {
	match value {
		AttrValue::Function(function) => Some(function.to_js()),
		AttrValue::Str(source) if !source.trim().is_empty() => Some(source.clone()),
		_ => None,
	}
}

fn add_listener(target: &str, key: &str, listener: &str) -> String {
	let event = key.strip_prefix("on").unwrap_or(key).to_lowercase();
	format!(
		"{target}.addEventListener({}, {listener});",
		js_string(&event)
	)
}

fn reactive_call(element_id: &str, callback: &str) -> String {
	format!(
		"{RUNTIME_NAMESPACE}.{REACTIVE_COMPONENT_ENTRY}({}, {callback});",
		js_string(element_id)
	)
}

/// Wraps a relocated client function in an IIFE that binds its extra
/// parameters from the serialized `props` and calls it with the element.
fn client_script(function: &ClientFn, props: &str, target: &str) -> String {
	let mut script = String::from("(function(){\n");
	script.push_str(&format!(
		"const props = {};\n",
		escape_json_for_script(props)
	));

	let (element_param, rest) = match function.params().split_first() {
		Some((first, rest)) => (first.as_str(), rest),
		None => ("", &[][..]),
	};
	for param in rest {
		script.push_str(&declare_param(param));
		script.push('\n');
	}

	let async_prefix = if function.is_async() { "async " } else { "" };
	let argument = if element_param.is_empty() { "" } else { target };
	let call = format!(
		"({async_prefix}function({element_param}){{\n{}\n}})({argument})",
		function.body()
	);
	script.push_str("try {\n");
	if function.is_async() {
		script.push_str(&format!("{call}.catch(console.error);\n"));
	} else {
		script.push_str(&format!("{call};\n"));
	}
	script.push_str("} catch (error) {\nconsole.error(error);\n}\n})();");
	script
}

fn declare_param(param: &str) -> String {
	if param.starts_with('{') || param.starts_with('[') {
		return format!("const {param} = props;");
	}
	match param.split_once('=') {
		Some((name, default)) => {
			let name = name.trim();
			format!(
				"const {name} = props[{}] ?? {};",
				js_string(name),
				default.trim()
			)
		}
		None => format!("const {param} = props[{}];", js_string(param)),
	}
}
