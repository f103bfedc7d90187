use std::collections::HashMap;

use crate::map::Presence;

/// Index of a descriptor inside its [`Registry`](crate::map::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
	/// Position in the registry descriptor table.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Scalar JSON kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
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
}

impl PrimitiveKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::Boolean => "boolean",
			Self::Null => "null",
		}
	}
}

/// Resolved field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
	/// Scalar value.
	Primitive(PrimitiveKind),
	/// Nested structured type.
	Ref(TypeId),
	/// Nested structured type reached through a permitted cycle.
	LateBound(TypeId),
	/// Sequence of the inner type.
	Seq(Box<FieldType>),
	/// String-keyed mapping to the inner type.
	Map(Box<FieldType>),
}

impl FieldType {
	/// Structured type referenced by this type, looking through wrappers.
	pub fn target(&self) -> Option<TypeId> {
		match self {
			Self::Primitive(_) => None,
			Self::Ref(id) | Self::LateBound(id) => Some(*id),
			Self::Seq(inner) | Self::Map(inner) => inner.target(),
		}
	}

	/// Whether any reference in this type is late-bound.
	pub fn is_late_bound(&self) -> bool {
		match self {
			Self::LateBound(_) => true,
			Self::Primitive(_) | Self::Ref(_) => false,
			Self::Seq(inner) | Self::Map(inner) => inner.is_late_bound(),
		}
	}
}

/// One resolved field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	/// Field name used in value records.
	pub name: Box<str>,
	/// JSON key.
	pub wire_name: Box<str>,
	/// Resolved type.
	pub ty: FieldType,
	/// Presence rule.
	pub presence: Presence,
}

/// Resolved structured type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
	/// Type name.
	pub name: Box<str>,
	/// Fields in declaration order.
	pub fields: Vec<FieldDescriptor>,
	by_key: HashMap<Box<str>, usize>,
}

impl TypeDescriptor {
	pub(crate) fn new(name: Box<str>, fields: Vec<FieldDescriptor>) -> Self {
		let by_key = fields.iter().enumerate().map(|(idx, field)| (field.wire_name.clone(), idx)).collect();
		Self { name, fields, by_key }
	}

	/// Look up a field by field name.
	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|field| field.name.as_ref() == name)
	}

	/// Look up a field by JSON key.
	pub fn field_by_key(&self, key: &str) -> Option<&FieldDescriptor> {
		self.by_key.get(key).map(|idx| &self.fields[*idx])
	}
}
