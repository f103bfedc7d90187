#![allow(missing_docs)]

use schemap::map::{
	CyclicSchemaPolicy, FieldDecl, Mapper, MapperOptions, Presence, Registry, RegistryBuilder, Result, Schema, TypeDecl, TypeExpr, Value,
};
use schemap_testkit::read_fixture;

#[derive(Debug, Clone, PartialEq)]
struct Description {
	participant_inn: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Product {
	certificate_document: Option<String>,
	certificate_document_date: Option<String>,
	certificate_document_number: Option<String>,
	owner_inn: String,
	producer_inn: String,
	production_date: String,
	tnved_code: String,
	uit_code: Option<String>,
	uitu_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Document {
	description: Description,
	doc_id: String,
	doc_status: String,
	doc_type: String,
	import_request: bool,
	owner_inn: String,
	producer_inn: String,
	production_date: String,
	production_type: String,
	products: Vec<Product>,
	reg_date: String,
	reg_number: Option<String>,
}

fn nullable_string(value: Option<&String>) -> Value {
	value.map_or(Value::Null, |text| Value::from(text.as_str()))
}

impl Schema for Description {
	const NAME: &'static str = "Description";

	fn declare() -> TypeDecl {
		TypeDecl::new(Self::NAME).field(FieldDecl::new("participant_inn", TypeExpr::String, Presence::Required).wire_name("participantInn"))
	}

	fn to_value(&self) -> Value {
		Value::record([("participant_inn", Value::from(self.participant_inn.as_str()))])
	}

	fn from_value(value: Value) -> Result<Self> {
		let mut fields = value.into_fields()?;
		Ok(Self {
			participant_inn: fields.required("participant_inn", Value::into_string)?,
		})
	}
}

impl Schema for Product {
	const NAME: &'static str = "Product";

	fn declare() -> TypeDecl {
		TypeDecl::new(Self::NAME)
			.optional("certificate_document", TypeExpr::String)
			.optional("certificate_document_date", TypeExpr::String)
			.optional("certificate_document_number", TypeExpr::String)
			.required("owner_inn", TypeExpr::String)
			.required("producer_inn", TypeExpr::String)
			.required("production_date", TypeExpr::String)
			.required("tnved_code", TypeExpr::String)
			.nullable("uit_code", TypeExpr::String)
			.nullable("uitu_code", TypeExpr::String)
	}

	fn to_value(&self) -> Value {
		Value::record([
			("certificate_document", Value::from(self.certificate_document.clone())),
			("certificate_document_date", Value::from(self.certificate_document_date.clone())),
			("certificate_document_number", Value::from(self.certificate_document_number.clone())),
			("owner_inn", Value::from(self.owner_inn.as_str())),
			("producer_inn", Value::from(self.producer_inn.as_str())),
			("production_date", Value::from(self.production_date.as_str())),
			("tnved_code", Value::from(self.tnved_code.as_str())),
			("uit_code", nullable_string(self.uit_code.as_ref())),
			("uitu_code", nullable_string(self.uitu_code.as_ref())),
		])
	}

	fn from_value(value: Value) -> Result<Self> {
		let mut fields = value.into_fields()?;
		Ok(Self {
			certificate_document: fields.optional("certificate_document", Value::into_string)?,
			certificate_document_date: fields.optional("certificate_document_date", Value::into_string)?,
			certificate_document_number: fields.optional("certificate_document_number", Value::into_string)?,
			owner_inn: fields.required("owner_inn", Value::into_string)?,
			producer_inn: fields.required("producer_inn", Value::into_string)?,
			production_date: fields.required("production_date", Value::into_string)?,
			tnved_code: fields.required("tnved_code", Value::into_string)?,
			uit_code: fields.optional("uit_code", Value::into_string)?,
			uitu_code: fields.optional("uitu_code", Value::into_string)?,
		})
	}
}

impl Schema for Document {
	const NAME: &'static str = "Document";

	fn declare() -> TypeDecl {
		TypeDecl::new(Self::NAME)
			.required("description", TypeExpr::named(Description::NAME))
			.required("doc_id", TypeExpr::String)
			.required("doc_status", TypeExpr::String)
			.required("doc_type", TypeExpr::String)
			.field(FieldDecl::new("import_request", TypeExpr::Boolean, Presence::Required).wire_name("importRequest"))
			.required("owner_inn", TypeExpr::String)
			.required("producer_inn", TypeExpr::String)
			.required("production_date", TypeExpr::String)
			.required("production_type", TypeExpr::String)
			.required("products", TypeExpr::seq(TypeExpr::named(Product::NAME)))
			.required("reg_date", TypeExpr::String)
			.optional("reg_number", TypeExpr::String)
	}

	fn to_value(&self) -> Value {
		Value::record([
			("description", self.description.to_value()),
			("doc_id", Value::from(self.doc_id.as_str())),
			("doc_status", Value::from(self.doc_status.as_str())),
			("doc_type", Value::from(self.doc_type.as_str())),
			("import_request", Value::Bool(self.import_request)),
			("owner_inn", Value::from(self.owner_inn.as_str())),
			("producer_inn", Value::from(self.producer_inn.as_str())),
			("production_date", Value::from(self.production_date.as_str())),
			("production_type", Value::from(self.production_type.as_str())),
			("products", Value::Seq(self.products.iter().map(Product::to_value).collect())),
			("reg_date", Value::from(self.reg_date.as_str())),
			("reg_number", Value::from(self.reg_number.clone())),
		])
	}

	fn from_value(value: Value) -> Result<Self> {
		let mut fields = value.into_fields()?;
		Ok(Self {
			description: fields.required("description", Description::from_value)?,
			doc_id: fields.required("doc_id", Value::into_string)?,
			doc_status: fields.required("doc_status", Value::into_string)?,
			doc_type: fields.required("doc_type", Value::into_string)?,
			import_request: fields.required("import_request", Value::into_bool)?,
			owner_inn: fields.required("owner_inn", Value::into_string)?,
			producer_inn: fields.required("producer_inn", Value::into_string)?,
			production_date: fields.required("production_date", Value::into_string)?,
			production_type: fields.required("production_type", Value::into_string)?,
			products: fields.seq_of("products", Product::from_value)?,
			reg_date: fields.required("reg_date", Value::into_string)?,
			reg_number: fields.optional("reg_number", Value::into_string)?,
		})
	}
}

fn typed_mapper() -> Mapper {
	let builder = RegistryBuilder::new()
		.register_schema::<Document>()
		.register_schema::<Description>()
		.register_schema::<Product>();
	Mapper::build(builder, MapperOptions::default()).expect("typed schema resolves")
}

#[test]
fn typed_declarations_match_json_declarations() {
	let from_json = RegistryBuilder::new()
		.register_json(&read_fixture("crpt_schema.json"))
		.expect("schema fixture parses")
		.freeze(CyclicSchemaPolicy::Reject)
		.expect("schema fixture resolves");
	let from_types = Registry::resolve(&[Document::declare(), Description::declare(), Product::declare()], CyclicSchemaPolicy::Reject)
		.expect("typed schema resolves");
	assert_eq!(from_json, from_types);
}

#[test]
fn fixture_decodes_into_typed_document() {
	let document: Document = typed_mapper().decode_typed(&read_fixture("crpt_document.json")).expect("typed decode");

	assert_eq!(document.description.participant_inn, "7700000001");
	assert!(document.import_request);
	assert_eq!(document.products.len(), 2);
	assert_eq!(document.products[0].uitu_code, None);
	assert_eq!(document.products[1].certificate_document, None);
	assert_eq!(document.products[1].uitu_code.as_deref(), Some("046030034070000001"));
}

#[test]
fn typed_document_round_trips() {
	let mapper = typed_mapper();
	let document: Document = mapper.decode_typed(&read_fixture("crpt_document.json")).expect("typed decode");

	let text = mapper.encode_typed(&document).expect("typed encode");
	assert!(text.contains(r#""importRequest":true"#), "{text}");
	assert!(text.contains(r#""uitu_code":null"#), "{text}");

	let again: Document = mapper.decode_typed(&text).expect("typed re-decode");
	assert_eq!(again, document);
}

#[test]
fn typed_conversion_errors_carry_paths() {
	let mapper = typed_mapper();
	let mut value = mapper.decode(&read_fixture("crpt_document.json"), Document::NAME).expect("decode");
	let Value::Map(entries) = &mut value else {
		panic!("expected record");
	};
	entries.insert("products".to_owned(), Value::seq([Value::record([("owner_inn", Value::Int(5))])]));

	let err = Document::from_value(value).expect_err("owner_inn is not a string");
	assert_eq!(err.to_string(), "schema mismatch at $.products[0].owner_inn: expected string, got integer");
}
