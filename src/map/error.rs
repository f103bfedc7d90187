use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MapError>;

/// Coarse failure categories for callers that branch on error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Input text is not well-formed JSON.
	MalformedInput,
	/// JSON or value shape disagrees with the descriptor.
	SchemaMismatch,
	/// Required field was missing.
	MissingRequiredField,
	/// Field not declared by the descriptor was present.
	UnknownField,
	/// Value shape cannot be represented under the descriptor.
	UnsupportedType,
	/// Type graph contains a cycle that cannot be resolved.
	CyclicSchema,
	/// Declarations are inconsistent (dangling or duplicate names).
	InvalidSchema,
	/// Nesting exceeded the configured depth ceiling.
	DepthExceeded,
	/// Mapper configuration or setup failure.
	Config,
}

/// JSON syntax failure class reported with [`MapError::MalformedInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseCategory {
	/// Invalid JSON syntax.
	Syntax,
	/// Input ended before a complete value.
	Eof,
	/// Syntactically valid but unrepresentable data, such as an out-of-range number.
	Data,
	/// Failure reading the input.
	Io,
}

impl ParseCategory {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Syntax => "syntax",
			Self::Eof => "eof",
			Self::Data => "data",
			Self::Io => "io",
		}
	}
}

impl std::fmt::Display for ParseCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors produced while resolving schemas and mapping values.
#[derive(Debug, Error)]
pub enum MapError {
	/// Document text is not valid JSON.
	#[error("malformed input ({category}) at line {line}, column {column}: {message}")]
	MalformedInput {
		/// Failure class.
		category: ParseCategory,
		/// One-based line of the failure.
		line: usize,
		/// One-based column of the failure.
		column: usize,
		/// Parser message.
		message: String,
	},
	/// JSON type does not match the declared field type.
	#[error("schema mismatch at {path}: expected {expected}, got {got}")]
	SchemaMismatch {
		/// Location inside the document.
		path: String,
		/// Declared shape.
		expected: String,
		/// Observed shape.
		got: String,
	},
	/// Required field was absent.
	#[error("missing required field {field} at {path}")]
	MissingRequiredField {
		/// Location of the enclosing record.
		path: String,
		/// Missing field name.
		field: String,
	},
	/// Undeclared field present while unknown fields are rejected.
	#[error("unknown field {field} at {path}")]
	UnknownField {
		/// Location of the enclosing record.
		path: String,
		/// Offending key.
		field: String,
	},
	/// Value shape cannot be encoded under the declared field type.
	#[error("unsupported type at {path}: expected {expected}, got {got}")]
	UnsupportedType {
		/// Location inside the value.
		path: String,
		/// Declared shape.
		expected: String,
		/// Observed value shape.
		got: String,
	},
	/// Type graph has a cycle that is not permitted.
	#[error("cyclic schema: {}", cycle.join(" -> "))]
	CyclicSchema {
		/// Type names along the cycle, first name repeated at the end.
		cycle: Vec<String>,
	},
	/// Field references a type that was never declared.
	#[error("unresolved type {target} referenced by {type_name}.{field}")]
	UnresolvedType {
		/// Declaring type.
		type_name: String,
		/// Declaring field.
		field: String,
		/// Missing referenced type.
		target: String,
	},
	/// Type name declared more than once.
	#[error("duplicate type {name}")]
	DuplicateType {
		/// Duplicated type name.
		name: String,
	},
	/// Field or wire name declared more than once within a type.
	#[error("duplicate field {field} in {type_name}")]
	DuplicateField {
		/// Declaring type.
		type_name: String,
		/// Duplicated field or wire name.
		field: String,
	},
	/// Requested type is not part of the registry.
	#[error("unknown type {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Nesting exceeded the configured depth ceiling.
	#[error("depth exceeded (max={max_depth}) at {path}")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
		/// Location where the limit was hit.
		path: String,
	},
	/// Type declarations are malformed or declare an unrepresentable field.
	#[error("invalid declaration: {message}")]
	InvalidDeclaration {
		/// Parser or validation message.
		message: String,
	},
	/// Option document could not be parsed.
	#[error("invalid configuration: {message}")]
	InvalidOptions {
		/// Parser message.
		message: String,
	},
	/// Process-wide registry was installed twice.
	#[error("global registry already installed")]
	RegistryAlreadyInstalled,
	/// No process-wide registry has been installed.
	#[error("global registry not installed")]
	RegistryNotInstalled,
	/// Path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Path as written.
		path: String,
	},
}

impl MapError {
	/// Coarse category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::MalformedInput { .. } => ErrorKind::MalformedInput,
			Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
			Self::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
			Self::UnknownField { .. } => ErrorKind::UnknownField,
			Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
			Self::DepthExceeded { .. } => ErrorKind::DepthExceeded,
			Self::CyclicSchema { .. } => ErrorKind::CyclicSchema,
			Self::UnresolvedType { .. }
			| Self::DuplicateType { .. }
			| Self::DuplicateField { .. }
			| Self::UnknownType { .. }
			| Self::InvalidDeclaration { .. } => ErrorKind::InvalidSchema,
			Self::InvalidOptions { .. } | Self::RegistryAlreadyInstalled | Self::RegistryNotInstalled | Self::InvalidFieldPath { .. } => {
				ErrorKind::Config
			}
		}
	}

	/// Re-root a path-carrying error under `prefix` (itself rooted at `$`).
	pub fn nested_under(self, prefix: &str) -> Self {
		let join = |path: String| format!("{prefix}{}", path.strip_prefix('$').unwrap_or(&path));
		match self {
			Self::SchemaMismatch { path, expected, got } => Self::SchemaMismatch {
				path: join(path),
				expected,
				got,
			},
			Self::MissingRequiredField { path, field } => Self::MissingRequiredField { path: join(path), field },
			Self::UnknownField { path, field } => Self::UnknownField { path: join(path), field },
			Self::UnsupportedType { path, expected, got } => Self::UnsupportedType {
				path: join(path),
				expected,
				got,
			},
			Self::DepthExceeded { max_depth, path } => Self::DepthExceeded { max_depth, path: join(path) },
			other => other,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{ErrorKind, MapError, ParseCategory};

	#[test]
	fn cycle_message_joins_type_names() {
		let err = MapError::CyclicSchema {
			cycle: vec!["A".to_owned(), "B".to_owned(), "A".to_owned()],
		};
		assert_eq!(err.to_string(), "cyclic schema: A -> B -> A");
		assert_eq!(err.kind(), ErrorKind::CyclicSchema);
	}

	#[test]
	fn malformed_input_message_names_category() {
		let err = MapError::MalformedInput {
			category: ParseCategory::Eof,
			line: 1,
			column: 9,
			message: "EOF while parsing an object".to_owned(),
		};
		assert!(err.to_string().starts_with("malformed input (eof) at line 1, column 9"));
	}
}
