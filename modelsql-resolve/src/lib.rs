//! Placeholder resolution for modelsql SQL templates.
//!
//! Turns annotated fragments like `{User.Id, Name}` into literal SQL
//! (`users.id, users.name`) using a [`modelsql_schema::SchemaRegistry`].
//! Meant to run at generation time; the resolved text is what per-model
//! accessors feed into the statement cache.

mod error;
mod resolver;

pub use error::{ResolveError, ResolveResult};
pub use resolver::{resolve, PlaceholderResolver};
