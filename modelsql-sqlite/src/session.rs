//! SQLite-backed session executing the standard model operations.

use std::cell::RefCell;

use modelsql_core::{builder, Category, FieldMask, Model, Preparer, SqlTracer, StatementCache};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Statement, ToSql};
use tracing::trace;

use crate::error::{SessionError, SessionResult};

/// Prepared handle the session caches. The connection is single-threaded,
/// so interior mutability via `RefCell` is enough to execute through a
/// shared entry.
pub type SqliteStatement<'conn> = RefCell<Statement<'conn>>;

/// Borrowed connection wrapped so the [`Preparer`] impl lives on a local
/// type, as the orphan rule requires.
#[derive(Clone, Copy)]
pub struct SqlitePreparer<'conn>(pub &'conn Connection);

impl<'conn> Preparer for SqlitePreparer<'conn> {
    type Statement = SqliteStatement<'conn>;
    type Error = rusqlite::Error;

    fn prepare(&self, sql: &str) -> Result<Self::Statement, Self::Error> {
        Connection::prepare(self.0, sql).map(RefCell::new)
    }
}

/// A session over one borrowed [`Connection`], owning the statement cache
/// for it.
///
/// All model operations derive their cache id from the field/where masks
/// via [`builder::stmt_id`], build SQL with the standard builders on a
/// miss, and bind arguments through the field-bitmask protocol, so every
/// distinct (columns, filter) combination compiles exactly once per
/// session.
pub struct Session<'conn> {
    conn: &'conn Connection,
    cache: StatementCache<SqliteStatement<'conn>>,
}

impl<'conn> Session<'conn> {
    /// Creates a session with the built-in categories plus the session's
    /// own (count, incr-by) and no tracing.
    #[must_use]
    pub fn new(conn: &'conn Connection) -> Self {
        Session {
            conn,
            cache: session_cache(),
        }
    }

    /// Creates a session whose cache reports accesses to `tracer`.
    #[must_use]
    pub fn with_tracer(conn: &'conn Connection, tracer: SqlTracer) -> Self {
        Session {
            conn,
            cache: session_cache().with_tracer(tracer),
        }
    }

    /// The underlying statement cache, for custom categories and
    /// maintenance (`add_category`, `recompile`, ...).
    #[must_use]
    pub fn cache(&self) -> &StatementCache<SqliteStatement<'conn>> {
        &self.cache
    }

    /// The borrowed connection.
    #[must_use]
    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Inserts the selected columns of `row`; returns the new rowid.
    pub fn insert<M>(&self, row: &M, fields: FieldMask) -> SessionResult<i64>
    where
        M: Model<Value = Value>,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            Category::INSERT,
            builder::stmt_id(fields, FieldMask::EMPTY, M::field_count()),
            || builder::insert(M::TABLE, M::COLUMNS, fields),
        )?;
        let args = fields.values_of(row);
        entry.statement().borrow_mut().execute(params_from_iter(args))?;
        let rowid = self.conn.last_insert_rowid();
        trace!(table = M::TABLE, rowid, "insert");
        Ok(rowid)
    }

    /// Updates the selected columns of rows matching `where_fields`;
    /// returns the affected row count. Both argument groups come from
    /// `row`, set values first.
    pub fn update<M>(
        &self,
        row: &M,
        fields: FieldMask,
        where_fields: FieldMask,
    ) -> SessionResult<usize>
    where
        M: Model<Value = Value>,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            Category::UPDATE,
            builder::stmt_id(fields, where_fields, M::field_count()),
            || builder::update(M::TABLE, M::COLUMNS, fields, where_fields),
        )?;
        let mut args = Vec::with_capacity(fields.count() + where_fields.count());
        fields.values_into(row, &mut args);
        where_fields.values_into(row, &mut args);
        let rows = entry.statement().borrow_mut().execute(params_from_iter(args))?;
        trace!(table = M::TABLE, rows, "update");
        Ok(rows)
    }

    /// Deletes rows matching `where_fields`; returns the affected count.
    pub fn delete<M>(&self, row: &M, where_fields: FieldMask) -> SessionResult<usize>
    where
        M: Model<Value = Value>,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            Category::DELETE,
            builder::stmt_id(FieldMask::EMPTY, where_fields, M::field_count()),
            || builder::delete(M::TABLE, M::COLUMNS, where_fields),
        )?;
        let args = where_fields.values_of(row);
        let rows = entry.statement().borrow_mut().execute(params_from_iter(args))?;
        trace!(table = M::TABLE, rows, "delete");
        Ok(rows)
    }

    /// Selects one row matching `where_fields` and loads the selected
    /// columns back into `row`. [`SessionError::NoRow`] if nothing matches.
    pub fn one<M>(&self, row: &mut M, fields: FieldMask, where_fields: FieldMask) -> SessionResult<()>
    where
        M: Model<Value = Value>,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            Category::SELECT_ONE,
            builder::stmt_id(fields, where_fields, M::field_count()),
            || builder::select(M::TABLE, M::COLUMNS, fields, where_fields),
        )?;
        let args = where_fields.values_of(row);
        let mut statement = entry.statement().borrow_mut();
        let mut rows = statement.query(params_from_iter(args))?;
        let first = rows.next()?.ok_or(SessionError::NoRow)?;
        let values = row_values(first, fields.count())?;
        fields.load_from(row, values);
        Ok(())
    }

    /// Selects every row matching the where-columns of `example`.
    pub fn all<M>(
        &self,
        example: &M,
        fields: FieldMask,
        where_fields: FieldMask,
    ) -> SessionResult<Vec<M>>
    where
        M: Model<Value = Value> + Default,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            Category::SELECT_ALL,
            builder::stmt_id(fields, where_fields, M::field_count()),
            || builder::select(M::TABLE, M::COLUMNS, fields, where_fields),
        )?;
        let args = where_fields.values_of(example);
        collect_models(&mut entry.statement().borrow_mut(), args, fields)
    }

    /// [`Session::all`] with a `LIMIT offset, count` window.
    pub fn limit<M>(
        &self,
        example: &M,
        fields: FieldMask,
        where_fields: FieldMask,
        offset: i64,
        count: i64,
    ) -> SessionResult<Vec<M>>
    where
        M: Model<Value = Value> + Default,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            Category::SELECT_LIMIT,
            builder::stmt_id(fields, where_fields, M::field_count()),
            || builder::select_limit(M::TABLE, M::COLUMNS, fields, where_fields),
        )?;
        let mut args = where_fields.values_of(example);
        args.push(Value::Integer(offset));
        args.push(Value::Integer(count));
        collect_models(&mut entry.statement().borrow_mut(), args, fields)
    }

    /// Counts rows matching the where-columns of `example`.
    pub fn count<M>(&self, example: &M, where_fields: FieldMask) -> SessionResult<i64>
    where
        M: Model<Value = Value>,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            COUNT_CATEGORY,
            builder::stmt_id(FieldMask::EMPTY, where_fields, M::field_count()),
            || builder::count(M::TABLE, M::COLUMNS, where_fields),
        )?;
        let args = where_fields.values_of(example);
        let mut statement = entry.statement().borrow_mut();
        let mut rows = statement.query(params_from_iter(args))?;
        let first = rows.next()?.ok_or(SessionError::NoRow)?;
        Ok(first.get(0)?)
    }

    /// Adds `delta` to the single column `field` on rows matching the
    /// where-columns of `example`; returns the affected count.
    pub fn incr_by<M>(
        &self,
        example: &M,
        field: u32,
        where_fields: FieldMask,
        delta: i64,
    ) -> SessionResult<usize>
    where
        M: Model<Value = Value>,
    {
        let entry = self.cache.get_or_build(
            &SqlitePreparer(self.conn),
            INCR_BY_CATEGORY,
            builder::stmt_id(FieldMask::bit(field), where_fields, M::field_count()),
            || builder::incr_by(M::TABLE, M::COLUMNS, field, where_fields),
        )?;
        let mut args = vec![Value::Integer(delta)];
        where_fields.values_into(example, &mut args);
        let rows = entry.statement().borrow_mut().execute(params_from_iter(args))?;
        trace!(table = M::TABLE, rows, "incr_by");
        Ok(rows)
    }

    /// Executes hand-rolled SQL cached under (`category`, `id`); `id`
    /// normally comes from an [`modelsql_core::IdAllocator`]. Compiles on
    /// first use, reuses thereafter. Returns the affected row count.
    pub fn exec_by_id(
        &self,
        category: Category,
        id: u64,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> SessionResult<usize> {
        let entry = self
            .cache
            .get_or_build(&SqlitePreparer(self.conn), category, id, || sql.to_owned())?;
        Ok(entry.statement().borrow_mut().execute(params)?)
    }

    /// Queries hand-rolled SQL cached under (`category`, `id`), returning
    /// every row as a vector of column values.
    pub fn query_by_id(
        &self,
        category: Category,
        id: u64,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> SessionResult<Vec<Vec<Value>>> {
        let entry = self
            .cache
            .get_or_build(&SqlitePreparer(self.conn), category, id, || sql.to_owned())?;
        let mut statement = entry.statement().borrow_mut();
        let width = statement.column_count();
        let mut rows = statement.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row_values(row, width)?);
        }
        Ok(out)
    }

}

/// Category for `count` statements.
pub const COUNT_CATEGORY: Category = Category::custom(6);

/// Category for `incr_by` statements. Separate from `UPDATE`: an increment
/// on column *i* and an update setting column *i* derive the same id but
/// build different SQL.
pub const INCR_BY_CATEGORY: Category = Category::custom(7);

const SESSION_CATEGORIES: usize = Category::BUILTIN + 2;

fn session_cache<'conn>() -> StatementCache<SqliteStatement<'conn>> {
    StatementCache::with_categories(SESSION_CATEGORIES)
        .unwrap_or_else(|_| unreachable!("session category count meets the minimum"))
}

fn collect_models<M>(
    statement: &mut Statement<'_>,
    args: Vec<Value>,
    fields: FieldMask,
) -> SessionResult<Vec<M>>
where
    M: Model<Value = Value> + Default,
{
    let mut rows = statement.query(params_from_iter(args))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = row_values(row, fields.count())?;
        let mut model = M::default();
        fields.load_from(&mut model, values);
        out.push(model);
    }
    Ok(out)
}

fn row_values(row: &rusqlite::Row<'_>, width: usize) -> SessionResult<Vec<Value>> {
    let mut values = Vec::with_capacity(width);
    for i in 0..width {
        values.push(row.get(i)?);
    }
    Ok(values)
}
