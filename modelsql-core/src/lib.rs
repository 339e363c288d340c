//! Runtime support for generated model accessors.
//!
//! Three pieces with real machinery live here:
//! - [`StatementCache`] — maps a ([`Category`], id) pair to a lazily-built,
//!   reusable compiled-SQL entry, shared safely across threads
//! - [`FieldMask`] — a bit vector selecting which of a model's columns an
//!   operation touches, with order-stable value extraction and loading
//! - [`builder`] — the literal SQL builders for the built-in operation
//!   categories, plus the conventional cache-id derivation
//!
//! Database specifics stay behind the [`Preparer`] trait; glue crates such
//! as `modelsql-sqlite` implement it and layer the standard model
//! operations on top. Placeholder templates (`{Model:Field}`) are resolved
//! separately, at generation time, by `modelsql-resolve`.

pub mod builder;
mod cache;
mod error;
mod fields;
mod id;

pub use cache::{CacheEntry, Category, Preparer, SqlTracer, StatementCache};
pub use error::{CacheError, CacheResult};
pub use fields::{FieldMask, Model};
pub use id::IdAllocator;
