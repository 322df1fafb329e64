//! Foundation types for tydb.
//!
//! This crate provides the descriptors shared by every other tydb crate.
//! It owns no values: items live in `tydb-item`, schemas in `tydb-schema`.
//!
//! # Key Types
//!
//! - [`Type`]: Structural descriptor of a value's shape
//! - [`RecordType`]: Ordered field list of a record type
//! - [`Comparison`]: Equality and ordering operators used by filters
//! - [`Digest`]: 256-bit content hash identifying a hashmap key

pub mod comparison;
pub mod digest;
pub mod error;
pub mod ty;

pub use comparison::Comparison;
pub use digest::Digest;
pub use error::TypeError;
pub use ty::{FieldType, RecordType, Type};
