use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::map::resolve::resolve;
use crate::map::{CyclicSchemaPolicy, FieldType, MapError, Result, Schema, TypeDecl, TypeDescriptor, TypeId};

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// Resolved, immutable set of type descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
	types: Vec<TypeDescriptor>,
	by_name: HashMap<Box<str>, TypeId>,
	policy: CyclicSchemaPolicy,
}

impl Registry {
	pub(crate) fn from_parts(types: Vec<TypeDescriptor>, by_name: HashMap<Box<str>, TypeId>, policy: CyclicSchemaPolicy) -> Self {
		Self { types, by_name, policy }
	}

	/// Resolve declarations directly.
	pub fn resolve(decls: &[TypeDecl], policy: CyclicSchemaPolicy) -> Result<Self> {
		resolve(decls, policy)
	}

	/// Number of descriptors.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether no types are registered.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Cycle policy the registry was resolved with.
	pub fn cyclic_schema(&self) -> CyclicSchemaPolicy {
		self.policy
	}

	/// Id of a named type.
	pub fn id_of(&self, name: &str) -> Option<TypeId> {
		self.by_name.get(name).copied()
	}

	/// Descriptor by id.
	pub fn descriptor(&self, id: TypeId) -> Option<&TypeDescriptor> {
		self.types.get(id.index())
	}

	/// Descriptor by name, failing with [`MapError::UnknownType`].
	pub fn lookup(&self, name: &str) -> Result<(TypeId, &TypeDescriptor)> {
		let id = self.id_of(name).ok_or_else(|| MapError::UnknownType { name: name.to_owned() })?;
		Ok((id, &self.types[id.index()]))
	}

	/// All descriptors in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
		self.types.iter().enumerate().map(|(idx, item)| (TypeId(idx as u32), item))
	}

	/// Number of fields that reference their type through a late-bound edge.
	pub fn late_bound_count(&self) -> usize {
		self.types
			.iter()
			.flat_map(|item| item.fields.iter())
			.filter(|field| field.ty.is_late_bound())
			.count()
	}

	/// Type names along the first cycle closed by a late-bound field, first name repeated at the end.
	pub fn late_bound_cycle(&self) -> Option<Vec<String>> {
		let (owner, target) = self.iter().find_map(|(id, item)| {
			item.fields
				.iter()
				.find(|field| field.ty.is_late_bound())
				.and_then(|field| field.ty.target())
				.map(|target| (id, target))
		})?;

		// Shortest route from the late-bound target back to the owning type.
		let mut parent: Vec<Option<TypeId>> = vec![None; self.types.len()];
		let mut queue = VecDeque::from([target]);
		let mut seen = vec![false; self.types.len()];
		seen[target.index()] = true;
		while let Some(current) = queue.pop_front() {
			if current == owner {
				break;
			}
			for next in self.get(current).fields.iter().filter_map(|field| field.ty.target()) {
				if !seen[next.index()] {
					seen[next.index()] = true;
					parent[next.index()] = Some(current);
					queue.push_back(next);
				}
			}
		}

		let mut route = vec![owner];
		let mut current = owner;
		while current != target {
			let Some(prev) = parent[current.index()] else {
				break;
			};
			route.push(prev);
			current = prev;
		}
		route.reverse();
		route.push(target);
		Some(route.into_iter().map(|id| self.get(id).name.to_string()).collect())
	}

	/// Ids handed out by this registry are always in range.
	pub(crate) fn get(&self, id: TypeId) -> &TypeDescriptor {
		&self.types[id.index()]
	}

	/// Render a field type for diagnostics, e.g. `sequence<Product>`.
	pub fn describe(&self, ty: &FieldType) -> String {
		match ty {
			FieldType::Primitive(kind) => kind.as_str().to_owned(),
			FieldType::Ref(id) | FieldType::LateBound(id) => self.get(*id).name.to_string(),
			FieldType::Seq(inner) => format!("sequence<{}>", self.describe(inner)),
			FieldType::Map(inner) => format!("mapping<{}>", self.describe(inner)),
		}
	}
}

/// Collects declarations before a single resolve-and-freeze step.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
	decls: Vec<TypeDecl>,
}

impl RegistryBuilder {
	/// Empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add one declaration.
	pub fn register(mut self, decl: TypeDecl) -> Self {
		self.decls.push(decl);
		self
	}

	/// Add the declaration of a statically typed record.
	pub fn register_schema<T: Schema>(self) -> Self {
		self.register(T::declare())
	}

	/// Add declarations from a JSON array of type declarations.
	pub fn register_json(mut self, text: &str) -> Result<Self> {
		let decls: Vec<TypeDecl> = serde_json::from_str(text).map_err(|err| MapError::InvalidDeclaration { message: err.to_string() })?;
		debug!(count = decls.len(), "declarations loaded from json");
		self.decls.extend(decls);
		Ok(self)
	}

	/// Declarations collected so far.
	pub fn decls(&self) -> &[TypeDecl] {
		&self.decls
	}

	/// Resolve everything registered into an immutable registry.
	pub fn freeze(self, policy: CyclicSchemaPolicy) -> Result<Registry> {
		resolve(&self.decls, policy)
	}
}

/// Install the process-wide registry. Only the first call succeeds.
pub fn install_global(registry: Registry) -> Result<Arc<Registry>> {
	let shared = Arc::new(registry);
	GLOBAL.set(Arc::clone(&shared)).map_err(|_| MapError::RegistryAlreadyInstalled)?;
	debug!(types = shared.len(), "global registry installed");
	Ok(shared)
}

/// Process-wide registry, if one was installed.
pub fn global() -> Option<Arc<Registry>> {
	GLOBAL.get().cloned()
}
