// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Property values and the builder callers use to supply them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A validated, composed property map as it appears on an [`EventRecord`](crate::EventRecord).
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// The closed set of value types an event property may hold.
///
/// Dates serialize as `yyyy-MM-dd HH:mm:ss.SSS` (UTC) and sets as JSON arrays.
/// Deserialization tries the variants in declaration order, so a string in
/// the date format comes back as [`PropertyValue::Date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	Boolean(bool),
	Number(Number),
	StringSet(BTreeSet<String>),
	Date(#[serde(with = "date_format")] DateTime<Utc>),
	String(String),
}

impl PropertyValue {
	/// Returns true for [`PropertyValue::Number`].
	pub fn is_number(&self) -> bool {
		matches!(self, PropertyValue::Number(_))
	}

	/// Returns true for [`PropertyValue::StringSet`].
	pub fn is_string_set(&self) -> bool {
		matches!(self, PropertyValue::StringSet(_))
	}

	/// Converts a loosely-typed JSON value, rejecting anything outside the closed set.
	///
	/// Arrays are accepted only when every element is a string.
	pub fn from_json(value: Value) -> Result<Self, &'static str> {
		match value {
			Value::Bool(b) => Ok(PropertyValue::Boolean(b)),
			Value::Number(n) => Ok(PropertyValue::Number(n)),
			Value::String(s) => Ok(PropertyValue::String(s)),
			Value::Array(items) => items
				.into_iter()
				.map(|item| match item {
					Value::String(s) => Ok(s),
					_ => Err("set elements must all be strings"),
				})
				.collect::<Result<BTreeSet<_>, _>>()
				.map(PropertyValue::StringSet),
			Value::Null => Err("null and non-finite numbers are not supported"),
			Value::Object(_) => Err("nested objects are not supported"),
		}
	}
}

impl From<&str> for PropertyValue {
	fn from(s: &str) -> Self {
		PropertyValue::String(s.to_string())
	}
}

impl From<String> for PropertyValue {
	fn from(s: String) -> Self {
		PropertyValue::String(s)
	}
}

impl From<bool> for PropertyValue {
	fn from(b: bool) -> Self {
		PropertyValue::Boolean(b)
	}
}

impl From<DateTime<Utc>> for PropertyValue {
	fn from(date: DateTime<Utc>) -> Self {
		PropertyValue::Date(date)
	}
}

impl From<BTreeSet<String>> for PropertyValue {
	fn from(set: BTreeSet<String>) -> Self {
		PropertyValue::StringSet(set)
	}
}

macro_rules! integer_value {
	($($t:ty),*) => {
		$(
			impl From<$t> for PropertyValue {
				fn from(n: $t) -> Self {
					PropertyValue::Number(Number::from(n))
				}
			}
		)*
	};
}

integer_value!(i32, i64, u32, u64);

/// A property as supplied by the caller, before validation.
///
/// Typed inputs are already inside the closed set; JSON inputs come from
/// loosely-typed sources and are checked when the record is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyInput {
	Value(PropertyValue),
	Json(Value),
}

impl PropertyInput {
	/// Validates the input into a [`PropertyValue`].
	pub fn into_value(self) -> Result<PropertyValue, &'static str> {
		match self {
			PropertyInput::Value(value) => Ok(value),
			PropertyInput::Json(json) => PropertyValue::from_json(json),
		}
	}
}

macro_rules! typed_input {
	($($t:ty),*) => {
		$(
			impl From<$t> for PropertyInput {
				fn from(value: $t) -> Self {
					PropertyInput::Value(PropertyValue::from(value))
				}
			}
		)*
	};
}

typed_input!(&str, String, bool, i32, i64, u32, u64, DateTime<Utc>, BTreeSet<String>);

impl From<PropertyValue> for PropertyInput {
	fn from(value: PropertyValue) -> Self {
		PropertyInput::Value(value)
	}
}

impl From<f64> for PropertyInput {
	fn from(n: f64) -> Self {
		match Number::from_f64(n) {
			Some(n) => PropertyInput::Value(PropertyValue::Number(n)),
			None => PropertyInput::Json(Value::Null),
		}
	}
}

impl From<Value> for PropertyInput {
	fn from(value: Value) -> Self {
		PropertyInput::Json(value)
	}
}

impl From<HashSet<String>> for PropertyInput {
	fn from(set: HashSet<String>) -> Self {
		PropertyInput::Value(PropertyValue::StringSet(set.into_iter().collect()))
	}
}

impl From<Vec<String>> for PropertyInput {
	fn from(items: Vec<String>) -> Self {
		PropertyInput::Value(PropertyValue::StringSet(items.into_iter().collect()))
	}
}

/// A builder for event, super, or profile properties.
///
/// # Example
///
/// ```
/// use loom_track_core::Properties;
///
/// let props = Properties::new()
///     .insert("gold_price", 12.3)
///     .insert("gold_weight", 23)
///     .insert("bank", "CMB")
///     .insert("is_vip", true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
	inner: BTreeMap<String, PropertyInput>,
}

impl Properties {
	/// Creates a new empty Properties builder.
	pub fn new() -> Self {
		Self {
			inner: BTreeMap::new(),
		}
	}

	/// Inserts a key-value pair into the properties.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<PropertyInput>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Merges another Properties into this one.
	///
	/// If both contain the same key, the value from `other` takes precedence.
	pub fn merge(mut self, other: Properties) -> Self {
		self.inner.extend(other.inner);
		self
	}

	/// Removes a key, returning its previous input.
	pub fn remove(&mut self, key: &str) -> Option<PropertyInput> {
		self.inner.remove(key)
	}

	/// Retains only the entries the predicate accepts.
	pub fn retain(&mut self, mut keep: impl FnMut(&str, &PropertyInput) -> bool) {
		self.inner.retain(|k, v| keep(k, v));
	}

	/// Returns true if the properties are empty.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns the number of properties.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Gets an input by key.
	pub fn get(&self, key: &str) -> Option<&PropertyInput> {
		self.inner.get(key)
	}

	/// Iterates entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyInput)> {
		self.inner.iter()
	}
}

impl IntoIterator for Properties {
	type Item = (String, PropertyInput);
	type IntoIter = std::collections::btree_map::IntoIter<String, PropertyInput>;

	fn into_iter(self) -> Self::IntoIter {
		self.inner.into_iter()
	}
}

impl From<Value> for Properties {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(map) => Self::from(map),
			_ => Self::new(),
		}
	}
}

impl From<Map<String, Value>> for Properties {
	fn from(map: Map<String, Value>) -> Self {
		Self {
			inner: map
				.into_iter()
				.map(|(k, v)| (k, PropertyInput::Json(v)))
				.collect(),
		}
	}
}

impl From<PropertyMap> for Properties {
	fn from(map: PropertyMap) -> Self {
		Self {
			inner: map
				.into_iter()
				.map(|(k, v)| (k, PropertyInput::Value(v)))
				.collect(),
		}
	}
}

mod date_format {
	use chrono::{DateTime, NaiveDateTime, Utc};
	use serde::{Deserialize, Deserializer, Serializer};

	const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

	pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&date.format(FORMAT).to_string())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
		let s = String::deserialize(deserializer)?;
		NaiveDateTime::parse_from_str(&s, FORMAT)
			.map(|naive| naive.and_utc())
			.map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use proptest::prelude::*;

	#[test]
	fn test_properties_new_is_empty() {
		let props = Properties::new();
		assert!(props.is_empty());
		assert_eq!(props.len(), 0);
	}

	#[test]
	fn test_insert_typed_values() {
		let props = Properties::new()
			.insert("name", "Alice")
			.insert("count", 42)
			.insert("active", true)
			.insert("price", 99.99);

		assert_eq!(props.len(), 4);
		assert_eq!(
			props.get("name"),
			Some(&PropertyInput::Value(PropertyValue::String("Alice".into())))
		);
		assert_eq!(
			props.get("count"),
			Some(&PropertyInput::Value(PropertyValue::Number(42.into())))
		);
		assert_eq!(
			props.get("active"),
			Some(&PropertyInput::Value(PropertyValue::Boolean(true)))
		);
	}

	#[test]
	fn test_non_finite_float_is_not_a_number() {
		let props = Properties::new().insert("ratio", f64::NAN);
		let input = props.get("ratio").cloned().unwrap();
		assert!(input.into_value().is_err());
	}

	#[test]
	fn test_merge_other_wins() {
		let merged = Properties::new()
			.insert("a", 1)
			.insert("b", 2)
			.merge(Properties::new().insert("b", 20).insert("c", 3));

		assert_eq!(merged.len(), 3);
		assert_eq!(
			merged.get("b"),
			Some(&PropertyInput::Value(PropertyValue::Number(20.into())))
		);
	}

	#[test]
	fn test_from_json_rejects_mixed_array() {
		let result = PropertyValue::from_json(serde_json::json!(["a", 1]));
		assert!(result.is_err());
	}

	#[test]
	fn test_from_json_accepts_string_array() {
		let result = PropertyValue::from_json(serde_json::json!(["b", "a", "b"])).unwrap();
		let expected: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();
		assert_eq!(result, PropertyValue::StringSet(expected));
	}

	#[test]
	fn test_from_json_rejects_object_and_null() {
		assert!(PropertyValue::from_json(serde_json::json!({"k": "v"})).is_err());
		assert!(PropertyValue::from_json(Value::Null).is_err());
	}

	#[test]
	fn test_date_serializes_in_wire_format() {
		let date = Utc.with_ymd_and_hms(2015, 7, 1, 8, 30, 0).unwrap();
		let json = serde_json::to_value(PropertyValue::Date(date)).unwrap();
		assert_eq!(json, serde_json::json!("2015-07-01 08:30:00.000"));
	}

	#[test]
	fn test_date_string_deserializes_as_date() {
		let value: PropertyValue = serde_json::from_str("\"2015-07-01 08:30:00.250\"").unwrap();
		assert!(matches!(value, PropertyValue::Date(_)));

		let value: PropertyValue = serde_json::from_str("\"not a date\"").unwrap();
		assert_eq!(value, PropertyValue::String("not a date".into()));
	}

	#[test]
	fn test_properties_from_json_object() {
		let props = Properties::from(serde_json::json!({"name": "test", "count": 5}));
		assert_eq!(props.len(), 2);
		assert!(matches!(props.get("name"), Some(PropertyInput::Json(_))));
	}

	#[test]
	fn test_properties_from_non_object_value() {
		let props = Properties::from(Value::String("not an object".to_string()));
		assert!(props.is_empty());
	}

	#[test]
	fn test_persisted_properties_reload_equal() {
		let props = Properties::new()
			.insert("plan", "pro")
			.insert("seats", 5)
			.insert("tags", vec!["a".to_string(), "b".to_string()])
			.insert("raw", serde_json::json!({"nested": true}));

		let bytes = serde_json::to_vec(&props).unwrap();
		let reloaded: Properties = serde_json::from_slice(&bytes).unwrap();
		assert_eq!(reloaded, props);
	}

	proptest! {
		#[test]
		fn properties_len_matches_unique_keys(keys in proptest::collection::vec("[a-z]{1,10}", 0..20)) {
			let unique: HashSet<_> = keys.iter().cloned().collect();
			let mut props = Properties::new();
			for key in &keys {
				props = props.insert(key.clone(), "value");
			}
			prop_assert_eq!(props.len(), unique.len());
		}

		#[test]
		fn string_sets_survive_json(items in proptest::collection::btree_set("[a-z]{1,8}", 0..10)) {
			let value = PropertyValue::StringSet(items.clone());
			let json = serde_json::to_value(&value).unwrap();
			prop_assert_eq!(PropertyValue::from_json(json).unwrap(), PropertyValue::StringSet(items));
		}
	}
}
