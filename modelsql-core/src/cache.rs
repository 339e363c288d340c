//! Compiled-SQL statement cache.
//!
//! A [`StatementCache`] maps a ([`Category`], id) pair to an immutable
//! [`CacheEntry`] holding literal SQL text and its prepared statement
//! handle. Entries are built lazily on first use and served from the cache
//! thereafter. The cache is safe to share across threads whenever the
//! statement handle type is; published entries are immutable and read
//! without locking through shared references.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CacheError, CacheResult};

/// The external capability that compiles literal SQL into an executable
/// statement handle. Implemented by database glue crates (for SQLite, by
/// `&rusqlite::Connection`).
pub trait Preparer {
    /// The prepared statement handle.
    type Statement;

    /// The driver's compile error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compiles `sql`. Blocking is allowed; failures propagate to the cache
    /// caller and leave the cache unchanged.
    fn prepare(&self, sql: &str) -> Result<Self::Statement, Self::Error>;
}

/// A class of cached operation with its own id→entry table.
///
/// The six built-in categories cover the standard model operations; callers
/// needing more call [`StatementCache::add_category`] and use the returned
/// value with ids of their own choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category(usize);

impl Category {
    pub const INSERT: Category = Category(0);
    pub const DELETE: Category = Category(1);
    pub const UPDATE: Category = Category(2);
    pub const SELECT_LIMIT: Category = Category(3);
    pub const SELECT_ONE: Category = Category(4);
    pub const SELECT_ALL: Category = Category(5);

    /// Number of built-in categories; also the minimum configured count.
    pub const BUILTIN: usize = 6;

    /// A category beyond the built-in ones. `index` must refer to a
    /// configured category at lookup time.
    #[must_use]
    pub const fn custom(index: usize) -> Self {
        Category(index)
    }

    /// The dense index of this category.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Literal SQL text plus its prepared statement handle.
///
/// Immutable once published; cloning shares the text and handle.
#[derive(Debug)]
pub struct CacheEntry<S> {
    sql: Arc<str>,
    statement: Arc<S>,
}

impl<S> CacheEntry<S> {
    /// The literal SQL text this entry was compiled from.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The prepared statement handle.
    #[must_use]
    pub fn statement(&self) -> &Arc<S> {
        &self.statement
    }
}

impl<S> Clone for CacheEntry<S> {
    fn clone(&self) -> Self {
        CacheEntry {
            sql: Arc::clone(&self.sql),
            statement: Arc::clone(&self.statement),
        }
    }
}

/// Diagnostic sink receiving `(cache_hit, sql)` once per
/// [`StatementCache::get_or_build`] / [`StatementCache::set`] invocation.
///
/// Purely observational; it must not affect control flow. The default is a
/// no-op.
#[derive(Clone)]
pub struct SqlTracer(Arc<dyn Fn(bool, &str) + Send + Sync>);

impl SqlTracer {
    /// A tracer that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        SqlTracer(Arc::new(|_, _| {}))
    }

    /// A tracer calling `sink(cache_hit, sql)` on every access.
    #[must_use]
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(bool, &str) + Send + Sync + 'static,
    {
        SqlTracer(Arc::new(sink))
    }

    /// A tracer emitting `tracing::debug!` events.
    #[must_use]
    pub fn via_tracing() -> Self {
        SqlTracer(Arc::new(|cache_hit, sql| {
            tracing::debug!(cache_hit, sql, "statement cache access");
        }))
    }

    fn trace(&self, cache_hit: bool, sql: &str) {
        (self.0)(cache_hit, sql);
    }
}

impl Default for SqlTracer {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for SqlTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SqlTracer(..)")
    }
}

type EntryTable<S> = RwLock<HashMap<u64, CacheEntry<S>>>;

/// A cache of compiled statements, one id→entry table per category.
///
/// Concurrent `get_or_build` calls for the same key may both miss and both
/// compile; publication is insert-if-absent under the table's write lock,
/// so exactly one result survives and the loser's handle is dropped.
/// [`StatementCache::resize`] takes the category list's write lock and is
/// meant for setup time, before concurrent traffic begins.
pub struct StatementCache<S> {
    categories: RwLock<Vec<EntryTable<S>>>,
    tracer: SqlTracer,
}

impl<S> StatementCache<S> {
    /// Creates a cache with the six built-in categories and a no-op tracer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_categories(Category::BUILTIN)
            .unwrap_or_else(|_| unreachable!("built-in count meets the minimum"))
    }

    /// Creates a cache with `count` categories.
    ///
    /// `count` below [`Category::BUILTIN`] is a configuration error.
    pub fn with_categories(count: usize) -> CacheResult<Self> {
        if count < Category::BUILTIN {
            return Err(CacheError::TooFewCategories {
                requested: count,
                minimum: Category::BUILTIN,
            });
        }
        let mut categories = Vec::with_capacity(count);
        categories.resize_with(count, || RwLock::new(HashMap::new()));
        Ok(StatementCache {
            categories: RwLock::new(categories),
            tracer: SqlTracer::noop(),
        })
    }

    /// Replaces the diagnostic tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: SqlTracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Current category count.
    #[must_use]
    pub fn categories(&self) -> usize {
        self.categories.read().unwrap().len()
    }

    /// Grows or shrinks the category list.
    ///
    /// Growing adds fresh empty tables; shrinking truncates, discarding the
    /// dropped categories' entries. Existing categories keep their entries
    /// either way. Takes the category list exclusively, so it must not run
    /// concurrently with lookups on a loaded cache.
    pub fn resize(&self, count: usize) -> CacheResult<()> {
        if count < Category::BUILTIN {
            return Err(CacheError::TooFewCategories {
                requested: count,
                minimum: Category::BUILTIN,
            });
        }
        let mut categories = self.categories.write().unwrap();
        if count <= categories.len() {
            categories.truncate(count);
        } else {
            categories.resize_with(count, || RwLock::new(HashMap::new()));
        }
        Ok(())
    }

    /// Appends one empty category and returns it.
    pub fn add_category(&self) -> Category {
        let mut categories = self.categories.write().unwrap();
        categories.push(RwLock::new(HashMap::new()));
        Category(categories.len() - 1)
    }

    /// Returns the cached entry for (category, id), or `None`. Never builds.
    pub fn get(&self, category: Category, id: u64) -> CacheResult<Option<CacheEntry<S>>> {
        let categories = self.categories.read().unwrap();
        let table = Self::table(&categories, category)?;
        Ok(table.read().unwrap().get(&id).cloned())
    }

    /// Returns the cached entry for (category, id), building it if absent.
    ///
    /// On a miss, `build` produces the literal SQL text, `preparer` compiles
    /// it, and the result is published under the key. The builder runs at
    /// most once per key under sequential access; under a concurrent
    /// same-key race the first published entry wins and later results are
    /// dropped. A compile failure is returned and nothing is cached, so a
    /// subsequent call retries.
    pub fn get_or_build<P, F>(
        &self,
        preparer: &P,
        category: Category,
        id: u64,
        build: F,
    ) -> CacheResult<CacheEntry<S>>
    where
        P: Preparer<Statement = S>,
        F: FnOnce() -> String,
    {
        let categories = self.categories.read().unwrap();
        let table = Self::table(&categories, category)?;

        if let Some(entry) = table.read().unwrap().get(&id) {
            self.tracer.trace(true, entry.sql());
            return Ok(entry.clone());
        }

        let sql: Arc<str> = build().into();
        self.tracer.trace(false, &sql);
        let statement = prepare(preparer, &sql)?;

        let mut entries = table.write().unwrap();
        let entry = entries.entry(id).or_insert_with(|| CacheEntry {
            sql,
            statement: Arc::new(statement),
        });
        Ok(entry.clone())
    }

    /// Compiles `sql` and caches it under (category, id), overwriting any
    /// existing entry. Used when the SQL is already known rather than
    /// lazily derived.
    pub fn set<P>(
        &self,
        preparer: &P,
        category: Category,
        id: u64,
        sql: impl Into<Arc<str>>,
    ) -> CacheResult<CacheEntry<S>>
    where
        P: Preparer<Statement = S>,
    {
        let categories = self.categories.read().unwrap();
        let table = Self::table(&categories, category)?;

        let sql = sql.into();
        self.tracer.trace(false, &sql);
        let statement = prepare(preparer, &sql)?;

        let entry = CacheEntry {
            sql,
            statement: Arc::new(statement),
        };
        table.write().unwrap().insert(id, entry.clone());
        Ok(entry)
    }

    /// Re-prepares the cached SQL text for (category, id) against
    /// `preparer`, leaving the text unchanged. Used after the underlying
    /// connection is replaced and old handles have gone stale.
    ///
    /// Returns `Ok(None)` when nothing is cached under the key. On compile
    /// failure the stale entry is kept untouched.
    pub fn recompile<P>(
        &self,
        preparer: &P,
        category: Category,
        id: u64,
    ) -> CacheResult<Option<CacheEntry<S>>>
    where
        P: Preparer<Statement = S>,
    {
        let categories = self.categories.read().unwrap();
        let table = Self::table(&categories, category)?;

        let sql = match table.read().unwrap().get(&id) {
            Some(entry) => Arc::clone(&entry.sql),
            None => return Ok(None),
        };
        let statement = prepare(preparer, &sql)?;

        let entry = CacheEntry {
            sql,
            statement: Arc::new(statement),
        };
        table.write().unwrap().insert(id, entry.clone());
        Ok(Some(entry))
    }

    fn table<'a>(
        categories: &'a [EntryTable<S>],
        category: Category,
    ) -> CacheResult<&'a EntryTable<S>> {
        categories
            .get(category.index())
            .ok_or(CacheError::CategoryOutOfRange {
                category: category.index(),
                count: categories.len(),
            })
    }
}

impl<S> Default for StatementCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for StatementCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementCache")
            .field("categories", &self.categories())
            .finish_non_exhaustive()
    }
}

fn prepare<P: Preparer>(preparer: &P, sql: &str) -> CacheResult<P::Statement> {
    preparer
        .prepare(sql)
        .map_err(|e| CacheError::Prepare(Box::new(e)))
}
