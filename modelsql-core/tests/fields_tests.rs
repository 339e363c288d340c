use modelsql_core::{FieldMask, Model};

#[derive(Debug, Default, Clone, PartialEq)]
struct Account {
    id: i64,
    owner: i64,
    balance: i64,
    flags: i64,
}

impl Model for Account {
    type Value = i64;

    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &["id", "owner", "balance", "flags"];

    fn value(&self, field: u32) -> i64 {
        match field {
            0 => self.id,
            1 => self.owner,
            2 => self.balance,
            3 => self.flags,
            _ => panic!("field {field} out of range"),
        }
    }

    fn set_value(&mut self, field: u32, value: i64) {
        match field {
            0 => self.id = value,
            1 => self.owner = value,
            2 => self.balance = value,
            3 => self.flags = value,
            _ => panic!("field {field} out of range"),
        }
    }
}

fn sample() -> Account {
    Account {
        id: 10,
        owner: 20,
        balance: 30,
        flags: 40,
    }
}

// ── Mask basics ──────────────────────────────────────────────────

#[test]
fn count_matches_set_bits() {
    assert_eq!(FieldMask::EMPTY.count(), 0);
    assert_eq!(FieldMask::bit(0).count(), 1);
    assert_eq!(FieldMask::bit(63).count(), 1);
    assert_eq!(FieldMask::all(4).count(), 4);
    assert_eq!(FieldMask(0b1011).count(), 3);
}

#[test]
fn all_mask_formula() {
    assert_eq!(FieldMask::all(4), FieldMask(0b1111));
    assert_eq!(FieldMask::all(1), FieldMask(0b1));
    assert_eq!(FieldMask::all(64), FieldMask(u64::MAX));
    assert_eq!(FieldMask::all_of::<Account>(), FieldMask(0b1111));
}

#[test]
fn contains_and_bit_ops() {
    let mask = FieldMask::bit(0) | FieldMask::bit(2);
    assert!(mask.contains(0));
    assert!(!mask.contains(1));
    assert!(mask.contains(2));
    assert_eq!(mask & FieldMask::bit(2), FieldMask::bit(2));
}

#[test]
fn bits_iterate_ascending() {
    let mask = FieldMask::bit(3) | FieldMask::bit(0) | FieldMask::bit(2);
    let bits: Vec<u32> = mask.bits().collect();
    assert_eq!(bits, vec![0, 2, 3]);
}

// ── values_into ──────────────────────────────────────────────────

#[test]
fn empty_mask_extracts_nothing() {
    let mut dest = Vec::new();
    FieldMask::EMPTY.values_into(&sample(), &mut dest);
    assert!(dest.is_empty());
}

#[test]
fn all_mask_extracts_every_column_in_declared_order() {
    assert_eq!(FieldMask::all_of::<Account>().values_of(&sample()), vec![10, 20, 30, 40]);
}

#[test]
fn subset_extracts_in_ascending_order() {
    // Constructed high bit first; output is still declared order.
    let mask = FieldMask::bit(3) | FieldMask::bit(1);
    assert_eq!(mask.values_of(&sample()), vec![20, 40]);
}

#[test]
fn values_into_appends_after_existing_content() {
    let mut dest = vec![99];
    FieldMask::bit(2).values_into(&sample(), &mut dest);
    assert_eq!(dest, vec![99, 30]);
}

#[test]
fn same_mask_same_index_assignment() {
    let a = FieldMask::bit(1) | FieldMask::bit(3);
    let b = FieldMask::bit(3) | FieldMask::bit(1);
    assert_eq!(a, b);
    assert_eq!(a.values_of(&sample()), b.values_of(&sample()));
}

// ── load_from ────────────────────────────────────────────────────

#[test]
fn load_assigns_selected_columns_only() {
    let mut row = Account::default();
    let mask = FieldMask::bit(0) | FieldMask::bit(2);
    mask.load_from(&mut row, vec![7, 8]);
    assert_eq!(
        row,
        Account {
            id: 7,
            owner: 0,
            balance: 8,
            flags: 0
        }
    );
}

#[test]
fn load_stops_when_values_run_out() {
    let mut row = Account::default();
    FieldMask::all_of::<Account>().load_from(&mut row, vec![1, 2]);
    assert_eq!(
        row,
        Account {
            id: 1,
            owner: 2,
            balance: 0,
            flags: 0
        }
    );
}

#[test]
fn all_columns_round_trip() {
    let original = sample();
    let all = FieldMask::all_of::<Account>();
    let values = all.values_of(&original);

    let mut copy = Account::default();
    all.load_from(&mut copy, values);
    assert_eq!(copy, original);
}

#[test]
fn subset_round_trip() {
    let original = sample();
    let mask = FieldMask::bit(1) | FieldMask::bit(3);
    let values = mask.values_of(&original);

    let mut copy = Account::default();
    mask.load_from(&mut copy, values);
    assert_eq!(copy.owner, original.owner);
    assert_eq!(copy.flags, original.flags);
    assert_eq!(copy.id, 0);
}
