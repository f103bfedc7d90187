use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::map::{
	CyclicSchemaPolicy, FieldDescriptor, FieldType, MapError, Presence, PrimitiveKind, Registry, Result, TypeDecl, TypeDescriptor, TypeExpr, TypeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
	New,
	Active,
	Done,
}

/// Field whose reference closes a cycle.
#[derive(Debug)]
struct BackEdge {
	from: usize,
	field: usize,
	cycle: Vec<usize>,
}

/// Resolve declarations into an immutable registry.
///
/// Type ids follow declaration order, so resolving the same declarations twice yields equal registries.
pub fn resolve(decls: &[TypeDecl], policy: CyclicSchemaPolicy) -> Result<Registry> {
	let mut by_name: HashMap<Box<str>, TypeId> = HashMap::with_capacity(decls.len());
	for (idx, decl) in decls.iter().enumerate() {
		let id = TypeId(idx as u32);
		if by_name.insert(decl.name.as_str().into(), id).is_some() {
			return Err(MapError::DuplicateType { name: decl.name.clone() });
		}
	}

	let mut types = Vec::with_capacity(decls.len());
	for decl in decls {
		types.push(resolve_decl(decl, &by_name)?);
	}

	let targets: Vec<Vec<Option<usize>>> = types
		.iter()
		.map(|item: &TypeDescriptor| item.fields.iter().map(|field| field.ty.target().map(TypeId::index)).collect())
		.collect();

	let back_edges = find_back_edges(&targets);
	if let Some(edge) = back_edges.first()
		&& policy == CyclicSchemaPolicy::Reject
	{
		return Err(MapError::CyclicSchema {
			cycle: cycle_names(decls, &edge.cycle),
		});
	}

	for edge in &back_edges {
		let item: &mut TypeDescriptor = &mut types[edge.from];
		let field = &mut item.fields[edge.field];
		debug!(type_name = %item.name, field = %field.name, "late-bound reference");
		mark_late_bound(&mut field.ty);
	}

	if !back_edges.is_empty() {
		check_inhabited(decls, &types)?;
	}

	debug!(types = types.len(), late_bound = back_edges.len(), "schema registry resolved");
	Ok(Registry::from_parts(types, by_name, policy))
}

fn resolve_decl(decl: &TypeDecl, by_name: &HashMap<Box<str>, TypeId>) -> Result<TypeDescriptor> {
	let mut names = HashSet::with_capacity(decl.fields.len());
	let mut keys = HashSet::with_capacity(decl.fields.len());
	let mut fields = Vec::with_capacity(decl.fields.len());

	for field in &decl.fields {
		if !names.insert(field.name.as_str()) {
			return Err(MapError::DuplicateField {
				type_name: decl.name.clone(),
				field: field.name.clone(),
			});
		}
		if !keys.insert(field.key()) {
			return Err(MapError::DuplicateField {
				type_name: decl.name.clone(),
				field: field.key().to_owned(),
			});
		}

		// An optional null field could not tell an absent value from an explicit null.
		if field.presence == Presence::Optional && field.ty == TypeExpr::Null {
			return Err(MapError::InvalidDeclaration {
				message: format!("{}.{} is optional with type null; declare it nullable", decl.name, field.name),
			});
		}

		let ty = resolve_expr(&field.ty, by_name).map_err(|target| MapError::UnresolvedType {
			type_name: decl.name.clone(),
			field: field.name.clone(),
			target,
		})?;

		fields.push(FieldDescriptor {
			name: field.name.as_str().into(),
			wire_name: field.key().into(),
			ty,
			presence: field.presence,
		});
	}

	Ok(TypeDescriptor::new(decl.name.as_str().into(), fields))
}

fn resolve_expr(expr: &TypeExpr, by_name: &HashMap<Box<str>, TypeId>) -> std::result::Result<FieldType, String> {
	Ok(match expr {
		TypeExpr::String => FieldType::Primitive(PrimitiveKind::String),
		TypeExpr::Integer => FieldType::Primitive(PrimitiveKind::Integer),
		TypeExpr::Float => FieldType::Primitive(PrimitiveKind::Float),
		TypeExpr::Boolean => FieldType::Primitive(PrimitiveKind::Boolean),
		TypeExpr::Null => FieldType::Primitive(PrimitiveKind::Null),
		TypeExpr::Ref(name) => FieldType::Ref(*by_name.get(name.as_str()).ok_or_else(|| name.clone())?),
		TypeExpr::Seq(inner) => FieldType::Seq(Box::new(resolve_expr(inner, by_name)?)),
		TypeExpr::Map(inner) => FieldType::Map(Box::new(resolve_expr(inner, by_name)?)),
	})
}

/// Depth-first search in declaration order, recording every edge into an active node.
fn find_back_edges(targets: &[Vec<Option<usize>>]) -> Vec<BackEdge> {
	let mut marks = vec![Mark::New; targets.len()];
	let mut out = Vec::new();

	for root in 0..targets.len() {
		if marks[root] != Mark::New {
			continue;
		}

		marks[root] = Mark::Active;
		let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

		while let Some(&(node, next)) = stack.last() {
			if next >= targets[node].len() {
				marks[node] = Mark::Done;
				stack.pop();
				continue;
			}
			if let Some(frame) = stack.last_mut() {
				frame.1 += 1;
			}

			let Some(target) = targets[node][next] else {
				continue;
			};

			match marks[target] {
				Mark::New => {
					marks[target] = Mark::Active;
					stack.push((target, 0));
				}
				Mark::Active => {
					let start = stack.iter().position(|(item, _)| *item == target).unwrap_or(0);
					let mut cycle: Vec<usize> = stack[start..].iter().map(|(item, _)| *item).collect();
					cycle.push(target);
					out.push(BackEdge { from: node, field: next, cycle });
				}
				Mark::Done => {}
			}
		}
	}

	out
}

fn mark_late_bound(ty: &mut FieldType) {
	match ty {
		FieldType::Ref(id) => *ty = FieldType::LateBound(*id),
		FieldType::Seq(inner) | FieldType::Map(inner) => mark_late_bound(inner),
		FieldType::Primitive(_) | FieldType::LateBound(_) => {}
	}
}

/// Reject types that can only be satisfied by an infinite instance.
///
/// A type is inhabited once every required field that directly references a record points at an inhabited type.
fn check_inhabited(decls: &[TypeDecl], types: &[TypeDescriptor]) -> Result<()> {
	let required_refs: Vec<Vec<usize>> = types
		.iter()
		.map(|item| {
			item.fields
				.iter()
				.filter(|field| field.presence == Presence::Required)
				.filter_map(|field| match field.ty {
					FieldType::Ref(id) | FieldType::LateBound(id) => Some(id.index()),
					_ => None,
				})
				.collect()
		})
		.collect();

	let mut inhabited = vec![false; types.len()];
	let mut changed = true;
	while changed {
		changed = false;
		for (idx, refs) in required_refs.iter().enumerate() {
			if !inhabited[idx] && refs.iter().all(|target| inhabited[*target]) {
				inhabited[idx] = true;
				changed = true;
			}
		}
	}

	let Some(start) = inhabited.iter().position(|value| !value) else {
		return Ok(());
	};

	let mut path = vec![start];
	let mut current = start;
	loop {
		let Some(next) = required_refs[current].iter().copied().find(|target| !inhabited[*target]) else {
			break;
		};
		if let Some(pos) = path.iter().position(|item| *item == next) {
			let mut cycle = path.split_off(pos);
			cycle.push(next);
			return Err(MapError::CyclicSchema {
				cycle: cycle_names(decls, &cycle),
			});
		}
		path.push(next);
		current = next;
	}

	Err(MapError::CyclicSchema {
		cycle: cycle_names(decls, &path),
	})
}

fn cycle_names(decls: &[TypeDecl], cycle: &[usize]) -> Vec<String> {
	cycle.iter().map(|idx| decls[*idx].name.clone()).collect()
}
