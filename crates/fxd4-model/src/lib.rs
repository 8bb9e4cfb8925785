//! Eloquent-style models over a remote resource API.
//!
//! A [`Model`] is bound to one named resource. Reads go through an
//! immutable [`QueryBuilder`] that accumulates filters and is consumed by a
//! terminal fetch; writes go straight to the resource by identifier.

pub mod error;
pub mod model;
pub mod models;
pub mod query;

pub use error::{ModelError, Result};
pub use model::Model;
pub use query::{Filter, OrderClause, OrderOptions, QueryBuilder, QueryState};

/// One row as returned by the remote resource. Contents are not interpreted.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Identifier column used by `find`, `update` and `delete`.
pub const ID_COLUMN: &str = "id";
