mod decl;
mod decode;
mod descriptor;
mod encode;
mod error;
mod mapper;
mod options;
mod parse;
mod path;
mod registry;
mod resolve;
#[cfg(test)]
mod test_support;
mod value;

/// Type declarations as written by users or loaded from JSON.
pub use decl::{FieldDecl, Presence, TypeDecl, TypeExpr};
/// Descriptor-driven JSON decoder.
pub use decode::Decoder;
/// Resolved descriptor representation.
pub use descriptor::{FieldDescriptor, FieldType, PrimitiveKind, TypeDescriptor, TypeId};
/// Descriptor-driven JSON encoder.
pub use encode::Encoder;
/// Error and result aliases.
pub use error::{ErrorKind, MapError, ParseCategory, Result};
/// Mapper facade and typed-record trait.
pub use mapper::{Mapper, Schema};
/// Mapper configuration and policies.
pub use options::{CyclicSchemaPolicy, MapperOptions, NullHandling, NumericPrecision, UnknownFieldPolicy};
/// Field path parser and renderer.
pub use path::{FieldPath, PathStep};
/// Registry construction and process-wide installation.
pub use registry::{Registry, RegistryBuilder, global, install_global};
/// Type declaration resolver.
pub use resolve::resolve;
/// In-memory value model.
pub use value::{Fields, Value};
