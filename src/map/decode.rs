use std::collections::BTreeMap;

use serde_json::Value as Json;
use tracing::{debug, trace};

use crate::map::parse::{json_kind, parse_document};
use crate::map::{
	FieldPath, FieldType, MapError, MapperOptions, PathStep, Presence, PrimitiveKind, Registry, Result, TypeId, UnknownFieldPolicy, Value,
};

/// Descriptor-driven conversion from JSON into [`Value`].
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
	registry: &'a Registry,
	options: &'a MapperOptions,
}

impl<'a> Decoder<'a> {
	/// Decoder over a resolved registry.
	pub fn new(registry: &'a Registry, options: &'a MapperOptions) -> Self {
		Self { registry, options }
	}

	/// Parse `text` and decode it as an instance of `type_name`.
	pub fn decode_str(&self, text: &str, type_name: &str) -> Result<Value> {
		let (id, _) = self.registry.lookup(type_name)?;
		let json = parse_document(text)?;
		self.decode_root(&json, id)
	}

	/// Decode already-parsed JSON as an instance of `type_name`.
	pub fn decode_json(&self, json: &Json, type_name: &str) -> Result<Value> {
		let (id, _) = self.registry.lookup(type_name)?;
		self.decode_root(json, id)
	}

	fn decode_root(&self, json: &Json, id: TypeId) -> Result<Value> {
		trace!(type_name = %self.registry.get(id).name, "decode");
		let mut path = FieldPath::root();
		self.decode_record(json, id, &mut path, 0)
	}

	fn decode_record(&self, json: &Json, id: TypeId, path: &mut FieldPath, depth: u32) -> Result<Value> {
		self.enter(path, depth)?;

		let item = self.registry.get(id);
		let Json::Object(object) = json else {
			return Err(MapError::SchemaMismatch {
				path: path.to_string(),
				expected: item.name.to_string(),
				got: json_kind(json).to_owned(),
			});
		};

		for key in object.keys() {
			if item.field_by_key(key).is_some() {
				continue;
			}
			match self.options.unknown_field_policy {
				UnknownFieldPolicy::Error => {
					return Err(MapError::UnknownField {
						path: path.to_string(),
						field: key.clone(),
					});
				}
				UnknownFieldPolicy::Ignore => debug!(path = %path, field = %key, "ignoring unknown field"),
			}
		}

		let mut out = BTreeMap::new();
		for field in &item.fields {
			let value = match (object.get(&*field.wire_name), field.presence) {
				(None, Presence::Required) => {
					return Err(MapError::MissingRequiredField {
						path: path.to_string(),
						field: field.wire_name.to_string(),
					});
				}
				(None | Some(Json::Null), Presence::Optional) => Value::Absent,
				(None | Some(Json::Null), Presence::Nullable) => Value::Null,
				(Some(Json::Null), Presence::Required) if field.ty != FieldType::Primitive(PrimitiveKind::Null) => {
					return Err(MapError::SchemaMismatch {
						path: path.with_field(&field.wire_name),
						expected: self.registry.describe(&field.ty),
						got: "null".to_owned(),
					});
				}
				(Some(raw), _) => {
					path.push(PathStep::Field(field.wire_name.to_string()));
					let value = self.decode_type(raw, &field.ty, path, depth + 1)?;
					path.pop();
					value
				}
			};
			out.insert(field.name.to_string(), value);
		}

		Ok(Value::Map(out))
	}

	fn decode_type(&self, json: &Json, ty: &FieldType, path: &mut FieldPath, depth: u32) -> Result<Value> {
		match (ty, json) {
			(FieldType::Primitive(kind), _) => self.decode_primitive(json, *kind, path),
			(FieldType::Ref(id) | FieldType::LateBound(id), _) => self.decode_record(json, *id, path, depth),
			(FieldType::Seq(inner), Json::Array(items)) => {
				self.enter(path, depth)?;
				let mut out = Vec::with_capacity(items.len());
				for (index, item) in items.iter().enumerate() {
					path.push(PathStep::Index(index));
					out.push(self.decode_type(item, inner, path, depth + 1)?);
					path.pop();
				}
				Ok(Value::Seq(out))
			}
			(FieldType::Map(inner), Json::Object(entries)) => {
				self.enter(path, depth)?;
				let mut out = BTreeMap::new();
				for (key, item) in entries {
					path.push(PathStep::Key(key.clone()));
					out.insert(key.clone(), self.decode_type(item, inner, path, depth + 1)?);
					path.pop();
				}
				Ok(Value::Map(out))
			}
			_ => Err(self.mismatch(path, ty, json_kind(json))),
		}
	}

	fn decode_primitive(&self, json: &Json, kind: PrimitiveKind, path: &FieldPath) -> Result<Value> {
		let ty = FieldType::Primitive(kind);
		match (kind, json) {
			(PrimitiveKind::String, Json::String(value)) => Ok(Value::String(value.clone())),
			(PrimitiveKind::Boolean, Json::Bool(value)) => Ok(Value::Bool(*value)),
			(PrimitiveKind::Null, Json::Null) => Ok(Value::Null),
			(PrimitiveKind::Integer, Json::Number(number)) => {
				if let Some(value) = number.as_i64() {
					Ok(Value::Int(value))
				} else if number.is_u64() {
					Err(self.mismatch(path, &ty, "integer out of range"))
				} else {
					Err(self.mismatch(path, &ty, "float"))
				}
			}
			(PrimitiveKind::Float, Json::Number(number)) => number
				.as_f64()
				.map(Value::Float)
				.ok_or_else(|| self.mismatch(path, &ty, "number out of range")),
			_ => Err(self.mismatch(path, &ty, json_kind(json))),
		}
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

	fn mismatch(&self, path: &FieldPath, ty: &FieldType, got: &str) -> MapError {
		MapError::SchemaMismatch {
			path: path.to_string(),
			expected: self.registry.describe(ty),
			got: got.to_owned(),
		}
	}
}
