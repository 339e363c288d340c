//! Field-bitmask protocol.
//!
//! A [`FieldMask`] selects a subset of a model's declared columns. Bit *i*
//! set means column *i* participates, in the model's fixed declared order.
//! Every traversal visits selected columns in ascending bit order, so two
//! calls with the same mask always produce the same index assignment —
//! callers may compute an argument layout once per mask and reuse it.
//!
//! A model may declare at most 64 columns. Bits at or beyond the declared
//! column count are a caller error and are not defended against.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A row type whose columns can be addressed by position.
///
/// Implementations are normally emitted by the accessor generator: `COLUMNS`
/// lists column names in declared order, `value` reads column *i* and
/// `set_value` stores into it. `Value` is whatever column representation the
/// backend glue uses (for SQLite, `rusqlite::types::Value`).
pub trait Model {
    /// Column value representation.
    type Value;

    /// Table name backing this model.
    const TABLE: &'static str;

    /// Column names in declared order. At most 64 entries.
    const COLUMNS: &'static [&'static str];

    /// Returns the value of column `field` (0-based declared index).
    fn value(&self, field: u32) -> Self::Value;

    /// Stores `value` into column `field`.
    fn set_value(&mut self, field: u32, value: Self::Value);

    /// Number of declared columns.
    #[must_use]
    fn field_count() -> u32 {
        Self::COLUMNS.len() as u32
    }
}

/// A bit vector selecting a subset of a model's declared columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldMask(pub u64);

impl FieldMask {
    /// The "touch nothing" mask, valid and explicit (used by raw-SQL paths).
    pub const EMPTY: FieldMask = FieldMask(0);

    /// Mask with the single bit `field` set.
    #[must_use]
    pub const fn bit(field: u32) -> Self {
        FieldMask(1 << field)
    }

    /// The all-columns mask for a model with `field_count` columns.
    #[must_use]
    pub const fn all(field_count: u32) -> Self {
        if field_count >= 64 {
            FieldMask(u64::MAX)
        } else {
            FieldMask((1 << field_count) - 1)
        }
    }

    /// The all-columns mask for model `M`.
    #[must_use]
    pub fn all_of<M: Model>() -> Self {
        Self::all(M::field_count())
    }

    /// Number of selected columns; used to size argument buffers.
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no column is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if column `field` is selected.
    #[must_use]
    pub const fn contains(self, field: u32) -> bool {
        self.0 & (1 << field) != 0
    }

    /// Iterates selected column indices in ascending order.
    pub fn bits(self) -> impl Iterator<Item = u32> {
        BitIter(self.0)
    }

    /// Appends the selected columns' values to `dest`, in ascending bit
    /// order regardless of how the mask was constructed.
    ///
    /// An empty mask appends nothing; the all-columns mask appends every
    /// column in declared order.
    pub fn values_into<M: Model>(self, row: &M, dest: &mut Vec<M::Value>) {
        if self.is_empty() {
            return;
        }
        if self == Self::all_of::<M>() {
            for field in 0..M::field_count() {
                dest.push(row.value(field));
            }
            return;
        }
        for field in self.bits() {
            dest.push(row.value(field));
        }
    }

    /// Collects the selected columns' values into a fresh vector.
    #[must_use]
    pub fn values_of<M: Model>(self, row: &M) -> Vec<M::Value> {
        let mut dest = Vec::with_capacity(self.count());
        self.values_into(row, &mut dest);
        dest
    }

    /// Populates the selected columns of `row` from `values`, consuming one
    /// value per selected column in the same ascending order `values_into`
    /// uses. Surplus values are left in the iterator.
    pub fn load_from<M, I>(self, row: &mut M, values: I)
    where
        M: Model,
        I: IntoIterator<Item = M::Value>,
    {
        let mut values = values.into_iter();
        for field in self.bits() {
            match values.next() {
                Some(value) => row.set_value(field, value),
                None => return,
            }
        }
    }
}

impl BitOr for FieldMask {
    type Output = FieldMask;

    fn bitor(self, rhs: Self) -> Self {
        FieldMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FieldMask {
    type Output = FieldMask;

    fn bitand(self, rhs: Self) -> Self {
        FieldMask(self.0 & rhs.0)
    }
}

impl From<u64> for FieldMask {
    fn from(bits: u64) -> Self {
        FieldMask(bits)
    }
}

impl fmt::Binary for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

struct BitIter(u64);

impl Iterator for BitIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let field = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(field)
    }
}
