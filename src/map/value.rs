use std::collections::BTreeMap;

use crate::map::{FieldPath, MapError, PathStep, Result};

/// Schema-independent in-memory instance of any JSON-compatible data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Optional field that is not present.
	#[default]
	Absent,
	/// Explicit null.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Signed integer scalar.
	Int(i64),
	/// 64-bit float scalar.
	Float(f64),
	/// UTF-8 string.
	String(String),
	/// Ordered sequence.
	Seq(Vec<Value>),
	/// String-keyed mapping. Records are keyed by field name.
	Map(BTreeMap<String, Value>),
}

impl Value {
	/// Build a mapping from `(key, value)` pairs.
	pub fn record<K, I>(entries: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, Value)>,
	{
		Self::Map(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
	}

	/// Build a sequence from anything convertible into values.
	pub fn seq<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
		Self::Seq(items.into_iter().map(Into::into).collect())
	}

	/// Human-readable shape name used in diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Absent => "absent",
			Self::Null => "null",
			Self::Bool(_) => "boolean",
			Self::Int(_) => "integer",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Seq(_) => "sequence",
			Self::Map(_) => "mapping",
		}
	}

	/// Whether this is the absent marker.
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}

	/// Follow a field path through mappings and sequences.
	pub fn lookup(&self, path: &FieldPath) -> Option<&Value> {
		let mut current = self;
		for step in &path.steps {
			current = match (step, current) {
				(PathStep::Field(name) | PathStep::Key(name), Self::Map(entries)) => entries.get(name)?,
				(PathStep::Index(index), Self::Seq(items)) => items.get(*index)?,
				_ => return None,
			};
		}
		Some(current)
	}

	/// Take a string.
	pub fn into_string(self) -> Result<String> {
		match self {
			Self::String(value) => Ok(value),
			other => Err(mismatch("string", &other)),
		}
	}

	/// Take an integer.
	pub fn into_i64(self) -> Result<i64> {
		match self {
			Self::Int(value) => Ok(value),
			other => Err(mismatch("integer", &other)),
		}
	}

	/// Take a float, widening integers.
	pub fn into_f64(self) -> Result<f64> {
		match self {
			Self::Float(value) => Ok(value),
			Self::Int(value) => Ok(value as f64),
			other => Err(mismatch("float", &other)),
		}
	}

	/// Take a boolean.
	pub fn into_bool(self) -> Result<bool> {
		match self {
			Self::Bool(value) => Ok(value),
			other => Err(mismatch("boolean", &other)),
		}
	}

	/// Take sequence elements.
	pub fn into_seq(self) -> Result<Vec<Value>> {
		match self {
			Self::Seq(items) => Ok(items),
			other => Err(mismatch("sequence", &other)),
		}
	}

	/// Take mapping entries.
	pub fn into_map(self) -> Result<BTreeMap<String, Value>> {
		match self {
			Self::Map(entries) => Ok(entries),
			other => Err(mismatch("mapping", &other)),
		}
	}

	/// Take record fields for checked per-field extraction.
	pub fn into_fields(self) -> Result<Fields> {
		self.into_map().map(|entries| Fields { entries })
	}
}

fn mismatch(expected: &str, got: &Value) -> MapError {
	MapError::SchemaMismatch {
		path: "$".to_owned(),
		expected: expected.to_owned(),
		got: got.kind_name().to_owned(),
	}
}

/// Record entries with field-scoped extraction helpers.
///
/// Conversion failures are reported at the path of the field being read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
	entries: BTreeMap<String, Value>,
}

impl Fields {
	/// Remove a field, yielding [`Value::Absent`] when it is missing.
	pub fn take(&mut self, name: &str) -> Value {
		self.entries.remove(name).unwrap_or(Value::Absent)
	}

	/// Convert a field that must be present and non-null.
	pub fn required<T>(&mut self, name: &str, convert: impl FnOnce(Value) -> Result<T>) -> Result<T> {
		match self.take(name) {
			Value::Absent => Err(MapError::MissingRequiredField {
				path: "$".to_owned(),
				field: name.to_owned(),
			}),
			value => convert(value).map_err(|err| err.nested_under(&format!("$.{name}"))),
		}
	}

	/// Convert a field that may be absent or null.
	pub fn optional<T>(&mut self, name: &str, convert: impl FnOnce(Value) -> Result<T>) -> Result<Option<T>> {
		match self.take(name) {
			Value::Absent | Value::Null => Ok(None),
			value => convert(value).map(Some).map_err(|err| err.nested_under(&format!("$.{name}"))),
		}
	}

	/// Convert every element of a required sequence field.
	pub fn seq_of<T>(&mut self, name: &str, mut convert: impl FnMut(Value) -> Result<T>) -> Result<Vec<T>> {
		self.required(name, |value| {
			value
				.into_seq()?
				.into_iter()
				.enumerate()
				.map(|(index, item)| convert(item).map_err(|err| err.nested_under(&format!("$[{index}]"))))
				.collect()
		})
	}

	/// Names of fields not yet taken.
	pub fn remaining(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::Seq(items)
	}
}

impl From<BTreeMap<String, Value>> for Value {
	fn from(entries: BTreeMap<String, Value>) -> Self {
		Self::Map(entries)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Absent, Into::into)
	}
}
