//! Allocation of cache ids for hand-rolled SQL.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing id source for hand-rolled cache keys.
///
/// One allocator is normally enough for a whole program: ids only need to be
/// unique within the (allocator, category) scope the caller establishes, so
/// unrelated model types can share an instance.
///
/// ```
/// use modelsql_core::IdAllocator;
///
/// static SQL_ID: IdAllocator = IdAllocator::new();
///
/// let user_update = SQL_ID.next();
/// let user_delete = SQL_ID.next();
/// assert_ne!(user_update, user_delete);
/// ```
#[derive(Debug, Default)]
pub struct IdAllocator(AtomicU64);

impl IdAllocator {
    /// Creates an allocator whose first `next()` returns 1.
    #[must_use]
    pub const fn new() -> Self {
        IdAllocator(AtomicU64::new(0))
    }

    /// Atomically allocates the next id.
    ///
    /// Safe for unsynchronized concurrent use; concurrent callers receive
    /// unique values but no meaningful relative order.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}
