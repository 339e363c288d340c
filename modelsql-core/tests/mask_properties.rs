//! Property-based tests for the field-bitmask laws:
//! - `count` equals the number of set bits for any mask
//! - value extraction depends only on the set bits, in ascending order,
//!   never on how the mask was constructed
//! - extract-then-load over the same mask reproduces the selected columns

use modelsql_core::{FieldMask, Model};
use proptest::prelude::*;

const WIDTH: usize = 8;

#[derive(Debug, Default, Clone, PartialEq)]
struct Wide {
    cols: [i64; WIDTH],
}

impl Model for Wide {
    type Value = i64;

    const TABLE: &'static str = "wide";
    const COLUMNS: &'static [&'static str] = &["c0", "c1", "c2", "c3", "c4", "c5", "c6", "c7"];

    fn value(&self, field: u32) -> i64 {
        self.cols[field as usize]
    }

    fn set_value(&mut self, field: u32, value: i64) {
        self.cols[field as usize] = value;
    }
}

fn mask_strategy() -> impl Strategy<Value = FieldMask> {
    (0u64..1 << WIDTH).prop_map(FieldMask)
}

fn row_strategy() -> impl Strategy<Value = Wide> {
    prop::array::uniform8(any::<i64>()).prop_map(|cols| Wide { cols })
}

proptest! {
    #[test]
    fn count_equals_set_bits(mask in mask_strategy()) {
        prop_assert_eq!(mask.count(), mask.0.count_ones() as usize);
    }

    /// Extraction visits set bits in ascending order, whatever the mask.
    #[test]
    fn extraction_is_ascending_bit_order(mask in mask_strategy(), row in row_strategy()) {
        let expected: Vec<i64> = (0..WIDTH as u32)
            .filter(|f| mask.contains(*f))
            .map(|f| row.value(f))
            .collect();
        prop_assert_eq!(mask.values_of(&row), expected);
    }

    /// A mask reassembled from its own bits in any order extracts
    /// identically: the assignment depends only on the set of bits.
    #[test]
    fn construction_order_is_irrelevant(mask in mask_strategy(), row in row_strategy()) {
        let mut rebuilt = FieldMask::EMPTY;
        for f in mask.bits().collect::<Vec<_>>().into_iter().rev() {
            rebuilt |= FieldMask::bit(f);
        }
        prop_assert_eq!(rebuilt, mask);
        prop_assert_eq!(rebuilt.values_of(&row), mask.values_of(&row));
    }

    /// Extract-then-load reproduces exactly the selected columns.
    #[test]
    fn extract_load_round_trip(mask in mask_strategy(), row in row_strategy()) {
        let values = mask.values_of(&row);
        prop_assert_eq!(values.len(), mask.count());

        let mut copy = Wide::default();
        mask.load_from(&mut copy, values);
        for f in 0..WIDTH as u32 {
            if mask.contains(f) {
                prop_assert_eq!(copy.value(f), row.value(f));
            } else {
                prop_assert_eq!(copy.value(f), 0);
            }
        }
    }
}
