use modelsql_core::builder;
use modelsql_core::FieldMask;
use pretty_assertions::assert_eq;

const COLUMNS: &[&str] = &["id", "name", "age", "score"];

const ID: FieldMask = FieldMask::bit(0);
const NAME: FieldMask = FieldMask::bit(1);
const AGE: FieldMask = FieldMask::bit(2);
const SCORE: FieldMask = FieldMask::bit(3);

// ── stmt_id ──────────────────────────────────────────────────────

#[test]
fn stmt_id_combines_both_masks() {
    let id = builder::stmt_id(FieldMask(0b0011), FieldMask(0b0100), 4);
    assert_eq!(id, (0b0011 << 4) | 0b0100);
}

#[test]
fn stmt_id_is_unique_per_mask_pair() {
    let mut seen = std::collections::HashSet::new();
    for fields in 0..16u64 {
        for where_fields in 0..16u64 {
            let id = builder::stmt_id(FieldMask(fields), FieldMask(where_fields), 4);
            assert!(seen.insert(id), "collision for {fields:#b}/{where_fields:#b}");
        }
    }
}

// ── builders ─────────────────────────────────────────────────────

#[test]
fn insert_lists_selected_columns_and_marks() {
    let sql = builder::insert("users", COLUMNS, ID | NAME | AGE);
    assert_eq!(sql, "INSERT INTO users(id, name, age) VALUES(?, ?, ?)");
}

#[test]
fn update_sets_fields_and_filters() {
    let sql = builder::update("users", COLUMNS, NAME | SCORE, ID);
    assert_eq!(sql, "UPDATE users SET name=?, score=? WHERE id=?");
}

#[test]
fn update_without_filter_has_no_where_clause() {
    let sql = builder::update("users", COLUMNS, NAME, FieldMask::EMPTY);
    assert_eq!(sql, "UPDATE users SET name=?");
}

#[test]
fn delete_with_multiple_filters_joins_with_and() {
    let sql = builder::delete("users", COLUMNS, NAME | AGE);
    assert_eq!(sql, "DELETE FROM users WHERE name=? AND age=?");
}

#[test]
fn delete_everything() {
    assert_eq!(builder::delete("users", COLUMNS, FieldMask::EMPTY), "DELETE FROM users");
}

#[test]
fn select_projects_in_declared_order() {
    // Mask constructed high-bit-first; projection is declared order.
    let sql = builder::select("users", COLUMNS, SCORE | ID, AGE);
    assert_eq!(sql, "SELECT id, score FROM users WHERE age=?");
}

#[test]
fn select_limit_appends_window() {
    let sql = builder::select_limit("users", COLUMNS, ID | NAME, FieldMask::EMPTY);
    assert_eq!(sql, "SELECT id, name FROM users LIMIT ?, ?");
}

#[test]
fn count_ignores_projection() {
    let sql = builder::count("users", COLUMNS, ID);
    assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE id=?");
}

#[test]
fn incr_by_bumps_one_column() {
    let sql = builder::incr_by("users", COLUMNS, 3, ID);
    assert_eq!(sql, "UPDATE users SET score=score+? WHERE id=?");
}

#[test]
fn identical_masks_build_identical_text() {
    let a = builder::select("users", COLUMNS, ID | AGE, NAME);
    let b = builder::select("users", COLUMNS, AGE | ID, NAME);
    assert_eq!(a, b);
}
