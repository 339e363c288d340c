//! Literal SQL builders for the built-in categories.
//!
//! These produce the `?`-placeholder statements the standard model
//! operations cache: column subsets come from a [`FieldMask`] over the
//! model's declared column list, so a given (mask, where-mask) pair always
//! builds the same text. They are plain string builders; validation is the
//! database's job.

use crate::fields::FieldMask;

/// Derives the conventional cache id for a (selected, filter) column pair:
/// `(fields << field_count) | where_fields`.
///
/// Every distinct pair gets a unique slot within its category. The combined
/// value must fit in 64 bits, which bounds this convention to models of at
/// most 32 columns; custom categories are free to use any other scheme.
#[must_use]
pub const fn stmt_id(fields: FieldMask, where_fields: FieldMask, field_count: u32) -> u64 {
    (fields.0 << field_count) | where_fields.0
}

/// `INSERT INTO t(a, b) VALUES(?, ?)` for the selected columns.
#[must_use]
pub fn insert(table: &str, columns: &[&str], fields: FieldMask) -> String {
    let cols = column_list(columns, fields);
    let marks = marks(fields.count());
    format!("INSERT INTO {table}({cols}) VALUES({marks})")
}

/// `UPDATE t SET a=?, b=?` plus the where clause.
#[must_use]
pub fn update(table: &str, columns: &[&str], fields: FieldMask, where_fields: FieldMask) -> String {
    let set = assign_list(columns, fields, ", ");
    format!("UPDATE {table} SET {set}{}", where_clause(columns, where_fields))
}

/// `DELETE FROM t` plus the where clause.
#[must_use]
pub fn delete(table: &str, columns: &[&str], where_fields: FieldMask) -> String {
    format!("DELETE FROM {table}{}", where_clause(columns, where_fields))
}

/// `SELECT a, b FROM t` plus the where clause. Serves both the select-one
/// and select-all categories; the difference is how many rows the caller
/// consumes.
#[must_use]
pub fn select(table: &str, columns: &[&str], fields: FieldMask, where_fields: FieldMask) -> String {
    let cols = column_list(columns, fields);
    format!(
        "SELECT {cols} FROM {table}{}",
        where_clause(columns, where_fields)
    )
}

/// [`select`] with a trailing `LIMIT ?, ?` (offset, count).
#[must_use]
pub fn select_limit(
    table: &str,
    columns: &[&str],
    fields: FieldMask,
    where_fields: FieldMask,
) -> String {
    let mut sql = select(table, columns, fields, where_fields);
    sql.push_str(" LIMIT ?, ?");
    sql
}

/// `SELECT COUNT(*) FROM t` plus the where clause.
#[must_use]
pub fn count(table: &str, columns: &[&str], where_fields: FieldMask) -> String {
    format!(
        "SELECT COUNT(*) FROM {table}{}",
        where_clause(columns, where_fields)
    )
}

/// `UPDATE t SET a=a+?` plus the where clause, for a single column `field`.
///
/// `field` must index into `columns`; an out-of-range value is a caller
/// error, like mask bits beyond the declared column count.
#[must_use]
pub fn incr_by(table: &str, columns: &[&str], field: u32, where_fields: FieldMask) -> String {
    let col = columns[field as usize];
    format!(
        "UPDATE {table} SET {col}={col}+?{}",
        where_clause(columns, where_fields)
    )
}

fn column_list(columns: &[&str], mask: FieldMask) -> String {
    let mut out = String::new();
    for field in mask.bits() {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(columns[field as usize]);
    }
    out
}

fn assign_list(columns: &[&str], mask: FieldMask, sep: &str) -> String {
    let mut out = String::new();
    for field in mask.bits() {
        if !out.is_empty() {
            out.push_str(sep);
        }
        out.push_str(columns[field as usize]);
        out.push_str("=?");
    }
    out
}

/// Empty mask: no clause at all.
fn where_clause(columns: &[&str], mask: FieldMask) -> String {
    if mask.is_empty() {
        return String::new();
    }
    format!(" WHERE {}", assign_list(columns, mask, " AND "))
}

fn marks(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}
