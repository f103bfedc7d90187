#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use schemap::map::{CyclicSchemaPolicy, Mapper, MapperOptions, NullHandling, RegistryBuilder, TypeDecl, TypeExpr, Value};

fn reading_mapper(options: MapperOptions) -> Mapper {
	let registry = RegistryBuilder::new()
		.register(
			TypeDecl::new("Reading")
				.required("sensor", TypeExpr::String)
				.optional("sequence", TypeExpr::Integer)
				.nullable("note", TypeExpr::String)
				.optional("level", TypeExpr::Float)
				.optional("ok", TypeExpr::Boolean)
				.optional("labels", TypeExpr::seq(TypeExpr::String))
				.optional("samples", TypeExpr::map(TypeExpr::Float))
				.optional("origin", TypeExpr::named("Origin")),
		)
		.register(TypeDecl::new("Origin").required("site", TypeExpr::String).optional("rack", TypeExpr::Integer))
		.freeze(CyclicSchemaPolicy::Reject)
		.expect("reading schema resolves");
	Mapper::new(Arc::new(registry), options).expect("reading mapper")
}

// Quarter steps are exact in binary, so text round trips cannot drift.
fn arb_float() -> impl Strategy<Value = Value> {
	(-4_000_000i32..4_000_000).prop_map(|n| Value::Float(f64::from(n) / 4.0))
}

fn arb_optional(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
	prop_oneof![Just(Value::Absent), inner]
}

fn arb_origin() -> impl Strategy<Value = Value> {
	(".*", arb_optional(any::<i64>().prop_map(Value::Int)))
		.prop_map(|(site, rack)| Value::record([("site", Value::String(site)), ("rack", rack)]))
}

fn arb_reading() -> impl Strategy<Value = Value> {
	(
		".*",
		arb_optional(any::<i64>().prop_map(Value::Int)),
		prop_oneof![Just(Value::Null), ".*".prop_map(Value::String)],
		arb_optional(arb_float()),
		arb_optional(any::<bool>().prop_map(Value::Bool)),
		arb_optional(prop::collection::vec(".*".prop_map(Value::String), 0..4).prop_map(Value::Seq)),
		arb_optional(prop::collection::btree_map(".*", arb_float(), 0..4).prop_map(Value::Map)),
		arb_optional(arb_origin()),
	)
		.prop_map(|(sensor, sequence, note, level, ok, labels, samples, origin)| {
			let entries: BTreeMap<String, Value> = [
				("sensor", Value::String(sensor)),
				("sequence", sequence),
				("note", note),
				("level", level),
				("ok", ok),
				("labels", labels),
				("samples", samples),
				("origin", origin),
			]
			.into_iter()
			.map(|(key, value)| (key.to_owned(), value))
			.collect();
			Value::Map(entries)
		})
}

proptest! {
	#[test]
	fn encode_then_decode_is_identity(reading in arb_reading()) {
		let mapper = reading_mapper(MapperOptions::default());
		let text = mapper.encode(&reading, "Reading").expect("encode");
		let decoded = mapper.decode(&text, "Reading").expect("decode");
		prop_assert_eq!(decoded, reading);
	}

	#[test]
	fn emitted_nulls_decode_back_to_absent(reading in arb_reading()) {
		let options = MapperOptions {
			null_handling: NullHandling::EmitNull,
			..MapperOptions::default()
		};
		let mapper = reading_mapper(options);
		let text = mapper.encode(&reading, "Reading").expect("encode");
		let decoded = mapper.decode(&text, "Reading").expect("decode");
		prop_assert_eq!(decoded, reading);
	}

	#[test]
	fn encoding_is_deterministic(reading in arb_reading()) {
		let mapper = reading_mapper(MapperOptions::default());
		let first = mapper.encode(&reading, "Reading").expect("encode");
		let second = mapper.encode(&reading, "Reading").expect("encode");
		prop_assert_eq!(first, second);
	}
}
