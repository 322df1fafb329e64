//! Schema-typed document database.
//!
//! A [`Database`] owns one root [`tydb_item::Item`], created as the zero
//! value of a schema's root type. [`Selector`]s address sub-items of that
//! tree by path:
//!
//! ```text
//! users.alice.age              field steps
//! scores["a b"]                key step
//! users[age >= 18]             filter step on a field of each value
//! scores[> 1]                  filter step on the values themselves
//! users[age >= 18].alice.age   filter used as a guard before a key
//! ```
//!
//! Reads go through [`Database::resolve`]; writes resolve a live reference
//! with [`Database::resolve_mut`] and assign to it in place. There is no
//! staging or commit step, and no internal locking: callers sharing a
//! database across threads must serialise writers themselves.

pub mod database;
pub mod error;
pub mod selector;

pub use database::Database;
pub use error::{DbError, DbResult};
pub use selector::{Filter, Literal, Selector, SelectorError, Step};
