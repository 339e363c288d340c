//! SQLite glue for modelsql.
//!
//! Implements [`modelsql_core::Preparer`] for a borrowed
//! [`rusqlite::Connection`] and provides [`Session`], which owns the
//! statement cache for that connection and exposes the standard model
//! operations (insert, update, delete, one, limit, all, count, incr-by)
//! plus by-id execution of hand-rolled SQL.

mod error;
mod session;

pub use error::{SessionError, SessionResult};
pub use session::{Session, SqliteStatement, COUNT_CATEGORY, INCR_BY_CATEGORY};
