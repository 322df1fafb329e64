//! Schema documents for tydb.
//!
//! A [`Schema`] declares the database's root type, optionally in terms of
//! named type declarations. Schemas are written in TOML or JSON; type
//! expressions are either strings in the type syntax
//! (`hashmap<string, array<User>>`) or tables
//! (`{ record = { name = "string" } }`).
//!
//! A schema is validated when it is loaded: every name must be declared,
//! declarations may not shadow builtin types, and declarations may not be
//! recursive. [`Schema::root_type`] then yields the fully resolved
//! [`tydb_types::Type`].

pub mod error;
pub mod expr;
pub mod schema;

pub use error::{SchemaError, SchemaResult};
pub use expr::{parse_type_expr, CompositeExpr, TypeExpr};
pub use schema::Schema;
