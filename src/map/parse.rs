use serde_json::error::Category;

use crate::map::{MapError, ParseCategory, Result};

/// Parse document text. Duplicate object keys keep the last value.
pub(crate) fn parse_document(text: &str) -> Result<serde_json::Value> {
	serde_json::from_str(text).map_err(malformed)
}

pub(crate) fn malformed(err: serde_json::Error) -> MapError {
	let category = match err.classify() {
		Category::Syntax => ParseCategory::Syntax,
		Category::Eof => ParseCategory::Eof,
		Category::Data => ParseCategory::Data,
		Category::Io => ParseCategory::Io,
	};
	MapError::MalformedInput {
		category,
		line: err.line(),
		column: err.column(),
		message: err.to_string(),
	}
}

/// Shape name of a parsed JSON value, using the same vocabulary as [`Value::kind_name`](crate::map::Value::kind_name).
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "boolean",
		serde_json::Value::Number(number) if number.is_f64() => "float",
		serde_json::Value::Number(_) => "integer",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "sequence",
		serde_json::Value::Object(_) => "mapping",
	}
}
