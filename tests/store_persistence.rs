mod common;

use std::fs;

use common::{expense, reopen, temp_store};
use expense_core::{
    core::{ExpenseStore, EXPENSES_SLOT},
    storage::{JsonStorage, StorageBackend},
};
use tempfile::TempDir;

#[test]
fn collection_survives_reload() {
    let (mut store, guard) = temp_store();
    store.add(expense("Coffee", 15050, "Food", 1)).unwrap();
    store.add(expense("Bus pass", 2000, "", 8)).unwrap();

    let reloaded = reopen(&guard);
    assert_eq!(reloaded.all(), store.all());
    assert_eq!(reloaded.all()[0].description, "Bus pass");
}

#[test]
fn save_leaves_no_temp_files() {
    let (mut store, guard) = temp_store();
    store.add(expense("Lunch", 900, "Food", 0)).unwrap();

    let names: Vec<String> = fs::read_dir(guard.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["expenses.json".to_string()]);
}

#[test]
fn corrupt_file_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    storage.write(EXPENSES_SLOT, "{ not json").unwrap();

    let store = ExpenseStore::open(Box::new(storage));
    assert!(store.is_empty());
}

#[test]
fn records_without_category_load_with_blank_label() {
    let temp = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    storage
        .write(
            EXPENSES_SLOT,
            r#"[{"id":"6f1c1e3a-9a55-4c7e-8b1e-2f4f2b7f0c11","description":"Cash","amount":12.5,"date":"2024-06-01T00:00:00Z"}]"#,
        )
        .unwrap();

    let store = ExpenseStore::open(Box::new(storage));
    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].category, "");
    assert_eq!(store.all()[0].group_label(), "Other");
}
