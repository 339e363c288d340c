//! Schema registry for modelsql.
//!
//! A [`SchemaRegistry`] answers the two lookups placeholder resolution
//! needs: model name → table name, and field name → column name. It is
//! built by the accessor generation tool and consumed read-only here.

mod registry;

pub use registry::{SchemaRegistry, TableSchema};
