//! The query builder.
//!
//! Reads are composed with [`QueryBuilder`], which accumulates a
//! [`QueryState`] and is consumed by `get`/`first`. Writes use
//! [`InsertQuery`], [`UpdateQuery`] and [`DeleteQuery`], which target one row
//! by identifier and never see builder state.
//!
//! # Submodules
//!
//! - [`clause`]: filters and sort keys, and their query-string spelling.
//! - [`state`]: the accumulated read directives.
//! - [`builder`]: [`QueryBuilder`].
//! - [`insert`], [`update`], [`delete`]: the write path.

pub mod builder;
pub mod clause;
pub mod delete;
pub mod insert;
pub mod state;
pub mod update;

pub use builder::QueryBuilder;
pub use clause::{Filter, OrderClause, OrderOptions};
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use state::QueryState;
pub use update::UpdateQuery;

/// Asks the resource API for a single JSON object instead of an array.
/// Zero or several matching rows make the server answer with `PGRST116`.
pub(crate) const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";
