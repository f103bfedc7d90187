use serde::{Deserialize, Serialize};

/// Field presence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
	/// Must be present and non-null.
	#[default]
	Required,
	/// May be omitted; absence is represented by [`Value::Absent`](crate::map::Value::Absent).
	Optional,
	/// Always emitted; may hold null.
	Nullable,
}

/// Unresolved field type expression as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeExpr {
	/// UTF-8 string.
	String,
	/// Signed 64-bit integer.
	Integer,
	/// 64-bit float.
	Float,
	/// Boolean.
	Boolean,
	/// The null literal.
	Null,
	/// Named structured type.
	Ref(String),
	/// Sequence of the inner type.
	Seq(Box<TypeExpr>),
	/// String-keyed mapping to the inner type.
	Map(Box<TypeExpr>),
}

impl TypeExpr {
	/// Reference a named type.
	pub fn named(name: impl Into<String>) -> Self {
		Self::Ref(name.into())
	}

	/// Sequence of `inner`.
	pub fn seq(inner: TypeExpr) -> Self {
		Self::Seq(Box::new(inner))
	}

	/// Mapping of string keys to `inner`.
	pub fn map(inner: TypeExpr) -> Self {
		Self::Map(Box::new(inner))
	}
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
	/// Field name used in [`Value`](crate::map::Value) records.
	pub name: String,
	/// JSON key when it differs from `name`.
	#[serde(default, skip_serializing_if = "Option::is_none", rename = "wireName")]
	pub wire_name: Option<String>,
	/// Field type.
	#[serde(rename = "type")]
	pub ty: TypeExpr,
	/// Presence rule.
	#[serde(default)]
	pub presence: Presence,
}

impl FieldDecl {
	/// Declare a field with an explicit presence rule.
	pub fn new(name: impl Into<String>, ty: TypeExpr, presence: Presence) -> Self {
		Self {
			name: name.into(),
			wire_name: None,
			ty,
			presence,
		}
	}

	/// Use `wire_name` as the JSON key.
	pub fn wire_name(mut self, wire_name: impl Into<String>) -> Self {
		self.wire_name = Some(wire_name.into());
		self
	}

	/// JSON key for this field.
	pub fn key(&self) -> &str {
		self.wire_name.as_deref().unwrap_or(&self.name)
	}
}

/// Declared structured type, prior to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
	/// Unique type name.
	pub name: String,
	/// Fields in declaration (and emission) order.
	pub fields: Vec<FieldDecl>,
}

impl TypeDecl {
	/// Start a declaration with no fields.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
		}
	}

	/// Append a fully specified field.
	pub fn field(mut self, field: FieldDecl) -> Self {
		self.fields.push(field);
		self
	}

	/// Append a required field.
	pub fn required(self, name: impl Into<String>, ty: TypeExpr) -> Self {
		self.field(FieldDecl::new(name, ty, Presence::Required))
	}

	/// Append an optional field.
	pub fn optional(self, name: impl Into<String>, ty: TypeExpr) -> Self {
		self.field(FieldDecl::new(name, ty, Presence::Optional))
	}

	/// Append a nullable field.
	pub fn nullable(self, name: impl Into<String>, ty: TypeExpr) -> Self {
		self.field(FieldDecl::new(name, ty, Presence::Nullable))
	}
}
