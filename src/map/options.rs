use serde::{Deserialize, Serialize};

use crate::map::{MapError, Result};

/// Handling of JSON keys (or record entries) that the descriptor does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
	/// Drop them.
	Ignore,
	/// Fail with [`MapError::UnknownField`].
	#[default]
	Error,
}

/// Encoding of absent optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullHandling {
	/// Leave the key out.
	#[default]
	Omit,
	/// Emit the key with a null value.
	EmitNull,
}

/// Float rendering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericPrecision {
	/// Shortest text that parses back to the same `f64`.
	#[default]
	Double,
	/// Round to the given number of decimal places before rendering.
	Fixed(u8),
}

impl NumericPrecision {
	/// Apply the rounding rule. Non-finite input is returned unchanged.
	pub fn apply(self, value: f64) -> f64 {
		match self {
			Self::Double => value,
			Self::Fixed(decimals) => {
				if !value.is_finite() {
					return value;
				}
				let text = format!("{value:.prec$}", prec = usize::from(decimals));
				text.parse().unwrap_or(value)
			}
		}
	}
}

/// Resolver behavior for type graphs containing cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CyclicSchemaPolicy {
	/// Fail with [`MapError::CyclicSchema`].
	#[default]
	Reject,
	/// Turn back edges into late-bound references.
	AllowLateBound,
}

/// Mapper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MapperOptions {
	/// Handling of undeclared keys.
	pub unknown_field_policy: UnknownFieldPolicy,
	/// Encoding of absent optional fields.
	pub null_handling: NullHandling,
	/// Float rendering rule.
	pub numeric_precision: NumericPrecision,
	/// Cycle handling used when resolving declarations.
	pub cyclic_schema: CyclicSchemaPolicy,
	/// Maximum nesting depth accepted by the decoder and encoder.
	pub max_depth: u32,
}

impl Default for MapperOptions {
	fn default() -> Self {
		Self {
			unknown_field_policy: UnknownFieldPolicy::Error,
			null_handling: NullHandling::Omit,
			numeric_precision: NumericPrecision::Double,
			cyclic_schema: CyclicSchemaPolicy::Reject,
			max_depth: 64,
		}
	}
}

impl MapperOptions {
	/// Preset for consuming documents produced by other systems: unknown keys are dropped.
	pub fn lenient() -> Self {
		Self {
			unknown_field_policy: UnknownFieldPolicy::Ignore,
			..Self::default()
		}
	}

	/// Parse options from a JSON object; missing keys keep their defaults.
	pub fn from_json_str(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(|err| MapError::InvalidOptions { message: err.to_string() })
	}
}
