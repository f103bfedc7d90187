use std::sync::Arc;

use crate::map::{CyclicSchemaPolicy, FieldDecl, Mapper, MapperOptions, Presence, RegistryBuilder, TypeDecl, TypeExpr};

pub(crate) fn person_builder() -> RegistryBuilder {
	RegistryBuilder::new()
		.register(
			TypeDecl::new("Person")
				.required("name", TypeExpr::String)
				.optional("age", TypeExpr::Integer)
				.nullable("email", TypeExpr::String)
				.optional("height", TypeExpr::Float)
				.optional("active", TypeExpr::Boolean)
				.optional("tags", TypeExpr::seq(TypeExpr::String))
				.optional("scores", TypeExpr::map(TypeExpr::Float))
				.optional("address", TypeExpr::named("Address")),
		)
		.register(
			TypeDecl::new("Address")
				.field(FieldDecl::new("street_name", TypeExpr::String, Presence::Required).wire_name("streetName"))
				.optional("zip", TypeExpr::String),
		)
}

pub(crate) fn person_mapper(options: MapperOptions) -> Mapper {
	let registry = person_builder().freeze(CyclicSchemaPolicy::Reject).expect("person schema resolves");
	Mapper::new(Arc::new(registry), options).expect("person mapper")
}
