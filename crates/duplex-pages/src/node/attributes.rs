//! Insertion-ordered element attributes.

use std::fmt;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::{Map, Value};

use super::js_number;
use crate::function::ClientFn;

/// Keys that are carried on elements but never serialized as attributes.
pub const RESERVED_KEYS: &[&str] = &["children", "props"];

/// An attribute value.
pub enum AttrValue {
	Str(String),
	Number(f64),
	Bool(bool),
	Null,
	Undefined,
	/// Arbitrary structured data, serialized with `serde_json`.
	Json(Value),
	/// A callback relocated into generated client code.
	Function(ClientFn),
	/// A value that resolves asynchronously.
	Pending(LocalBoxFuture<'static, AttrValue>),
}

impl AttrValue {
	/// Creates a value that resolves once `future` completes.
	pub fn pending<F>(future: F) -> Self
	where
		F: Future<Output = AttrValue> + 'static,
	{
		Self::Pending(future.boxed_local())
	}

	/// Returns whether the value is still pending.
	pub fn is_pending(&self) -> bool {
		matches!(self, Self::Pending(_))
	}

	/// Clones a resolved value. Pending values snapshot as `Undefined`.
	pub fn snapshot(&self) -> AttrValue {
		match self {
			Self::Str(s) => Self::Str(s.clone()),
			Self::Number(n) => Self::Number(*n),
			Self::Bool(b) => Self::Bool(*b),
			Self::Null => Self::Null,
			Self::Undefined | Self::Pending(_) => Self::Undefined,
			Self::Json(value) => Self::Json(value.clone()),
			Self::Function(function) => Self::Function(function.clone()),
		}
	}

	/// Returns the string content, if this is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the callback, if this is a function.
	pub fn as_function(&self) -> Option<&ClientFn> {
		match self {
			Self::Function(function) => Some(function),
			_ => None,
		}
	}

	/// Returns whether this value is left out of rendered attributes.
	pub fn is_omitted(&self) -> bool {
		matches!(
			self,
			Self::Bool(false) | Self::Null | Self::Undefined | Self::Pending(_)
		)
	}

	/// Stringifies the value for an attribute assignment (unescaped).
	pub fn to_attribute_text(&self) -> String {
		match self {
			Self::Str(s) => s.clone(),
			Self::Number(n) => js_number(*n),
			Self::Bool(b) => b.to_string(),
			Self::Null => "null".to_string(),
			Self::Undefined | Self::Pending(_) => "undefined".to_string(),
			Self::Json(Value::String(s)) => s.clone(),
			Self::Json(value) => value.to_string(),
			Self::Function(function) => function.to_js(),
		}
	}

	/// Converts the value to JSON for the serialized `props` literal.
	///
	/// Functions, undefined and pending values have no JSON form.
	pub fn to_json(&self) -> Option<Value> {
		match self {
			Self::Str(s) => Some(Value::String(s.clone())),
			Self::Number(n) => Some(
				serde_json::Number::from_f64(*n)
					.map(Value::Number)
					.unwrap_or(Value::Null),
			),
			Self::Bool(b) => Some(Value::Bool(*b)),
			Self::Null => Some(Value::Null),
			Self::Json(value) => Some(value.clone()),
			Self::Undefined | Self::Function(_) | Self::Pending(_) => None,
		}
	}
}

impl fmt::Debug for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
			Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Null => f.write_str("Null"),
			Self::Undefined => f.write_str("Undefined"),
			Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
			Self::Function(function) => f.debug_tuple("Function").field(function).finish(),
			Self::Pending(_) => f.write_str("Pending(..)"),
		}
	}
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for AttrValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for AttrValue {
	fn from(value: i32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl From<i64> for AttrValue {
	fn from(value: i64) -> Self {
		Self::Number(value as f64)
	}
}

impl From<usize> for AttrValue {
	fn from(value: usize) -> Self {
		Self::Number(value as f64)
	}
}

impl From<Value> for AttrValue {
	fn from(value: Value) -> Self {
		Self::Json(value)
	}
}

impl From<ClientFn> for AttrValue {
	fn from(value: ClientFn) -> Self {
		Self::Function(value)
	}
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// An insertion-ordered map of attribute names to values.
///
/// Re-inserting an existing key replaces its value in place; handlers can
/// delete keys that later entries would otherwise render.
#[derive(Debug, Default)]
pub struct Attributes {
	entries: Vec<(String, AttrValue)>,
}

impl Attributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces an attribute, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.entries.push((key, value));
				None
			}
		}
	}

	pub fn get(&self, key: &str) -> Option<&AttrValue> {
		self.entries
			.iter()
			.find_map(|(k, v)| (k == key).then_some(v))
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut AttrValue> {
		self.entries
			.iter_mut()
			.find_map(|(k, v)| (k == key).then_some(v))
	}

	pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
		let position = self.entries.iter().position(|(k, _)| k == key)?;
		Some(self.entries.remove(position).1)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.iter().any(|(k, _)| k == key)
	}

	/// Keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Snapshot of the keys that render, excluding reserved ones.
	pub fn serializable_keys(&self) -> Vec<String> {
		self.keys()
			.filter(|key| !RESERVED_KEYS.contains(key))
			.map(str::to_string)
			.collect()
	}

	/// Awaits the value under `key` in place until it is no longer pending.
	///
	/// Returns `false` if the key is absent.
	pub async fn resolve(&mut self, key: &str) -> bool {
		loop {
			let Some(slot) = self.get_mut(key) else {
				return false;
			};
			if !slot.is_pending() {
				return true;
			}
			let AttrValue::Pending(future) = std::mem::replace(slot, AttrValue::Undefined) else {
				return true;
			};
			let resolved = future.await;
			if let Some(slot) = self.get_mut(key) {
				*slot = resolved;
			}
		}
	}

	/// Awaits every pending serializable value, one after another in
	/// declaration order.
	pub async fn resolve_all(&mut self) {
		for key in self.serializable_keys() {
			self.resolve(&key).await;
		}
	}

	/// Returns the explicit `id` attribute as text, if one is set and renders.
	pub fn id(&self) -> Option<String> {
		self.get("id")
			.filter(|value| !value.is_omitted())
			.map(AttrValue::to_attribute_text)
	}

	/// Serializes every attribute except `exclude` and the reserved keys into a
	/// JSON object, skipping values without a JSON form.
	pub fn to_props_json(&self, exclude: &str) -> Value {
		let mut map = Map::new();
		for (key, value) in self.iter() {
			if key == exclude || RESERVED_KEYS.contains(&key) {
				continue;
			}
			if let Some(json) = value.to_json() {
				map.insert(key.to_string(), json);
			}
		}
		Value::Object(map)
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<AttrValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attributes = Self::new();
		for (key, value) in iter {
			attributes.insert(key, value);
		}
		attributes
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_insert_preserves_position() {
		let mut attributes = Attributes::new();
		attributes.insert("a", "1");
		attributes.insert("b", "2");
		let previous = attributes.insert("a", "3");

		assert!(matches!(previous, Some(AttrValue::Str(s)) if s == "1"));
		assert_eq!(attributes.keys().collect::<Vec<_>>(), vec!["a", "b"]);
		assert_eq!(attributes.get("a").and_then(AttrValue::as_str), Some("3"));
	}

	#[rstest]
	fn test_serializable_keys_skip_reserved() {
		let attributes: Attributes = [("id", "x"), ("children", "c"), ("props", "p"), ("title", "t")]
			.into_iter()
			.collect();

		assert_eq!(attributes.serializable_keys(), vec!["id", "title"]);
	}

	#[rstest]
	#[case(AttrValue::Bool(false), true)]
	#[case(AttrValue::Null, true)]
	#[case(AttrValue::Undefined, true)]
	#[case(AttrValue::Bool(true), false)]
	#[case(AttrValue::Str(String::new()), false)]
	#[case(AttrValue::Number(0.0), false)]
	fn test_is_omitted(#[case] value: AttrValue, #[case] omitted: bool) {
		assert_eq!(value.is_omitted(), omitted);
	}

	#[tokio::test]
	async fn test_resolve_replaces_pending_in_place() {
		let mut attributes = Attributes::new();
		attributes.insert("title", AttrValue::pending(async { AttrValue::from("late") }));

		assert!(attributes.resolve("title").await);
		assert_eq!(attributes.get("title").and_then(AttrValue::as_str), Some("late"));
		assert!(!attributes.resolve("missing").await);
	}

	#[rstest]
	fn test_props_json_excludes_key_and_functions() {
		let attributes: Attributes = [
			("client", AttrValue::Function(ClientFn::new(Vec::<String>::new(), ""))),
			("count", AttrValue::Number(2.0)),
			("label", AttrValue::from("x")),
			("meta", AttrValue::Json(json!({"k": [1, 2]}))),
		]
		.into_iter()
		.collect();

		assert_eq!(
			attributes.to_props_json("client"),
			json!({"count": 2.0, "label": "x", "meta": {"k": [1, 2]}})
		);
	}

	#[rstest]
	fn test_id_ignores_omitted_values() {
		let mut attributes = Attributes::new();
		attributes.insert("id", AttrValue::Null);
		assert_eq!(attributes.id(), None);

		attributes.insert("id", 7);
		assert_eq!(attributes.id().as_deref(), Some("7"));
	}
}
