//! Schema-driven mapping between structured values and JSON documents.

/// Type declarations, descriptor resolution, and the JSON decoder/encoder.
pub mod map;
