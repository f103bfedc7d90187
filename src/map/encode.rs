use serde_json::{Map as JsonMap, Number, Value as Json};
use tracing::{debug, trace};

use crate::map::{
	FieldPath, FieldType, MapError, MapperOptions, NullHandling, PathStep, Presence, PrimitiveKind, Registry, Result, TypeId, UnknownFieldPolicy,
	Value,
};

/// Descriptor-driven conversion from [`Value`] into JSON.
///
/// Record fields are emitted in declaration order under their wire names.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
	registry: &'a Registry,
	options: &'a MapperOptions,
}

impl<'a> Encoder<'a> {
	/// Encoder over a resolved registry.
	pub fn new(registry: &'a Registry, options: &'a MapperOptions) -> Self {
		Self { registry, options }
	}

	/// Encode `value` as compact JSON text.
	pub fn encode_str(&self, value: &Value, type_name: &str) -> Result<String> {
		let json = self.encode_json(value, type_name)?;
		serde_json::to_string(&json).map_err(|err| unrenderable(&err))
	}

	/// Encode `value` as indented JSON text.
	pub fn encode_pretty(&self, value: &Value, type_name: &str) -> Result<String> {
		let json = self.encode_json(value, type_name)?;
		serde_json::to_string_pretty(&json).map_err(|err| unrenderable(&err))
	}

	/// Encode `value` into a JSON tree.
	pub fn encode_json(&self, value: &Value, type_name: &str) -> Result<Json> {
		let (id, _) = self.registry.lookup(type_name)?;
		trace!(type_name, "encode");
		let mut path = FieldPath::root();
		self.encode_record(value, id, &mut path, 0)
	}

	fn encode_record(&self, value: &Value, id: TypeId, path: &mut FieldPath, depth: u32) -> Result<Json> {
		self.enter(path, depth)?;

		let item = self.registry.get(id);
		let Value::Map(entries) = value else {
			return Err(MapError::UnsupportedType {
				path: path.to_string(),
				expected: item.name.to_string(),
				got: value.kind_name().to_owned(),
			});
		};

		for (key, entry) in entries {
			if entry.is_absent() || item.field(key).is_some() {
				continue;
			}
			match self.options.unknown_field_policy {
				UnknownFieldPolicy::Error => {
					return Err(MapError::UnknownField {
						path: path.to_string(),
						field: key.clone(),
					});
				}
				UnknownFieldPolicy::Ignore => debug!(path = %path, field = %key, "dropping undeclared entry"),
			}
		}

		let mut out = JsonMap::with_capacity(item.fields.len());
		for field in &item.fields {
			let entry = entries.get(&*field.name).unwrap_or(&Value::Absent);
			let json = match (entry, field.presence) {
				(Value::Absent, Presence::Required) => {
					return Err(MapError::MissingRequiredField {
						path: path.to_string(),
						field: field.name.to_string(),
					});
				}
				(Value::Absent | Value::Null, Presence::Optional) => match self.options.null_handling {
					NullHandling::Omit => continue,
					NullHandling::EmitNull => Json::Null,
				},
				(Value::Absent | Value::Null, Presence::Nullable) => Json::Null,
				(Value::Null, Presence::Required) if field.ty != FieldType::Primitive(PrimitiveKind::Null) => {
					return Err(MapError::UnsupportedType {
						path: path.with_field(&field.name),
						expected: self.registry.describe(&field.ty),
						got: "null".to_owned(),
					});
				}
				(entry, _) => {
					path.push(PathStep::Field(field.name.to_string()));
					let json = self.encode_type(entry, &field.ty, path, depth + 1)?;
					path.pop();
					json
				}
			};
			out.insert(field.wire_name.to_string(), json);
		}

		Ok(Json::Object(out))
	}

	fn encode_type(&self, value: &Value, ty: &FieldType, path: &mut FieldPath, depth: u32) -> Result<Json> {
		match (ty, value) {
			(FieldType::Primitive(kind), _) => self.encode_primitive(value, *kind, path),
			(FieldType::Ref(id) | FieldType::LateBound(id), _) => self.encode_record(value, *id, path, depth),
			(FieldType::Seq(inner), Value::Seq(items)) => {
				self.enter(path, depth)?;
				let mut out = Vec::with_capacity(items.len());
				for (index, item) in items.iter().enumerate() {
					path.push(PathStep::Index(index));
					out.push(self.encode_type(item, inner, path, depth + 1)?);
					path.pop();
				}
				Ok(Json::Array(out))
			}
			(FieldType::Map(inner), Value::Map(entries)) => {
				self.enter(path, depth)?;
				let mut out = JsonMap::with_capacity(entries.len());
				for (key, item) in entries {
					if item.is_absent() {
						continue;
					}
					path.push(PathStep::Key(key.clone()));
					out.insert(key.clone(), self.encode_type(item, inner, path, depth + 1)?);
					path.pop();
				}
				Ok(Json::Object(out))
			}
			_ => Err(self.unsupported(path, ty, value.kind_name())),
		}
	}

	fn encode_primitive(&self, value: &Value, kind: PrimitiveKind, path: &FieldPath) -> Result<Json> {
		let ty = FieldType::Primitive(kind);
		match (kind, value) {
			(PrimitiveKind::String, Value::String(text)) => Ok(Json::String(text.clone())),
			(PrimitiveKind::Boolean, Value::Bool(flag)) => Ok(Json::Bool(*flag)),
			(PrimitiveKind::Null, Value::Null) => Ok(Json::Null),
			(PrimitiveKind::Integer, Value::Int(number)) => Ok(Json::Number(Number::from(*number))),
			(PrimitiveKind::Float, Value::Float(number)) => self.encode_float(*number, path),
			(PrimitiveKind::Float, Value::Int(number)) => self.encode_float(*number as f64, path),
			_ => Err(self.unsupported(path, &ty, value.kind_name())),
		}
	}

	fn encode_float(&self, number: f64, path: &FieldPath) -> Result<Json> {
		let rounded = self.options.numeric_precision.apply(number);
		Number::from_f64(rounded)
			.map(Json::Number)
			.ok_or_else(|| self.unsupported(path, &FieldType::Primitive(PrimitiveKind::Float), "non-finite float"))
	}

	fn enter(&self, path: &FieldPath, depth: u32) -> Result<()> {
		if depth >= self.options.max_depth {
			return Err(MapError::DepthExceeded {
				max_depth: self.options.max_depth,
				path: path.to_string(),
			});
		}
		Ok(())
	}

	fn unsupported(&self, path: &FieldPath, ty: &FieldType, got: &str) -> MapError {
		MapError::UnsupportedType {
			path: path.to_string(),
			expected: self.registry.describe(ty),
			got: got.to_owned(),
		}
	}
}

fn unrenderable(err: &serde_json::Error) -> MapError {
	MapError::UnsupportedType {
		path: "$".to_owned(),
		expected: "json".to_owned(),
		got: err.to_string(),
	}
}
