//! Typed values for tydb.
//!
//! Every stored value is an [`Item`] conforming to a [`tydb_types::Type`].
//! Items form a tree rooted at the database root; composite items own their
//! children exclusively.
//!
//! # Item Kinds
//!
//! - scalars -- [`Item::String`], [`Item::Number`], [`Item::Boolean`]
//! - [`Array`] -- ordered elements of one type
//! - [`Record`] -- fixed set of named fields
//! - [`Hashmap`] -- arbitrary-typed keys indexed by content digest
//!
//! # Capabilities
//!
//! Every kind answers the same operations: render as text (`Display`) or
//! JSON, assign from an untyped `serde_json::Value`, report its type,
//! compare, and get/set fields and keys. Operations a kind does not support
//! fail with an [`ItemError`] whose [`Status`] is `Type`; nothing panics.
//!
//! # Design Rules
//!
//! 1. An item's type never changes over its lifetime.
//! 2. Multi-step mutations (bulk assign) are all-or-nothing: the new
//!    contents are built aside and swapped in only on full success.
//! 3. Filters return a new, independently owned container.

pub mod array;
pub mod error;
pub mod hasher;
pub mod hashmap;
pub mod item;
pub mod record;

pub use array::Array;
pub use error::{ItemError, ItemResult, Status};
pub use hasher::KeyHasher;
pub use hashmap::Hashmap;
pub use item::Item;
pub use record::Record;
