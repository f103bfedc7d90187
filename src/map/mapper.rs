use std::sync::Arc;

use crate::map::registry::global;
use crate::map::{CyclicSchemaPolicy, Decoder, Encoder, MapError, MapperOptions, Registry, RegistryBuilder, Result, TypeDecl, Value};

/// Statically typed record with a declaratively registered descriptor.
///
/// Implementations pair a [`TypeDecl`] with conversions to and from [`Value`];
/// the mapper validates shape against the resolved descriptor on both sides.
pub trait Schema: Sized {
	/// Registered type name.
	const NAME: &'static str;

	/// Field declarations for this type.
	fn declare() -> TypeDecl;

	/// Convert into a record value keyed by field name.
	fn to_value(&self) -> Value;

	/// Rebuild from a decoded record value.
	fn from_value(value: Value) -> Result<Self>;
}

/// Decoder and encoder bound to one registry and one set of options.
///
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Mapper {
	registry: Arc<Registry>,
	options: MapperOptions,
}

impl Mapper {
	/// Mapper over an already resolved registry.
	///
	/// Fails with [`MapError::CyclicSchema`] when `options` reject cycles but the registry carries late-bound fields.
	pub fn new(registry: Arc<Registry>, options: MapperOptions) -> Result<Self> {
		if options.cyclic_schema == CyclicSchemaPolicy::Reject
			&& let Some(cycle) = registry.late_bound_cycle()
		{
			return Err(MapError::CyclicSchema { cycle });
		}
		Ok(Self { registry, options })
	}

	/// Resolve `builder` with the cycle policy from `options`.
	pub fn build(builder: RegistryBuilder, options: MapperOptions) -> Result<Self> {
		let registry = builder.freeze(options.cyclic_schema)?;
		Self::new(Arc::new(registry), options)
	}

	/// Mapper over the process-wide registry.
	pub fn from_global(options: MapperOptions) -> Result<Self> {
		let registry = global().ok_or(MapError::RegistryNotInstalled)?;
		Self::new(registry, options)
	}

	/// Registry used for lookups.
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Active options.
	pub fn options(&self) -> &MapperOptions {
		&self.options
	}

	/// Decode JSON text as `type_name`.
	pub fn decode(&self, text: &str, type_name: &str) -> Result<Value> {
		self.decoder().decode_str(text, type_name)
	}

	/// Decode parsed JSON as `type_name`.
	pub fn decode_json(&self, json: &serde_json::Value, type_name: &str) -> Result<Value> {
		self.decoder().decode_json(json, type_name)
	}

	/// Decode JSON text directly into `T`.
	pub fn decode_typed<T: Schema>(&self, text: &str) -> Result<T> {
		T::from_value(self.decode(text, T::NAME)?)
	}

	/// Encode `value` as compact JSON text.
	pub fn encode(&self, value: &Value, type_name: &str) -> Result<String> {
		self.encoder().encode_str(value, type_name)
	}

	/// Encode `value` as indented JSON text.
	pub fn encode_pretty(&self, value: &Value, type_name: &str) -> Result<String> {
		self.encoder().encode_pretty(value, type_name)
	}

	/// Encode `value` into a JSON tree.
	pub fn encode_json(&self, value: &Value, type_name: &str) -> Result<serde_json::Value> {
		self.encoder().encode_json(value, type_name)
	}

	/// Encode a typed record as compact JSON text.
	pub fn encode_typed<T: Schema>(&self, item: &T) -> Result<String> {
		self.encode(&item.to_value(), T::NAME)
	}

	fn decoder(&self) -> Decoder<'_> {
		Decoder::new(&self.registry, &self.options)
	}

	fn encoder(&self) -> Encoder<'_> {
		Encoder::new(&self.registry, &self.options)
	}
}
