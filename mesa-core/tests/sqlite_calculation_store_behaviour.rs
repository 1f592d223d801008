//! Behavioural tests for `SqliteCalculationStore` using rstest-bdd.
#![cfg(feature = "store-sqlite")]

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
};

use mesa_core::{
    Address, CalculationRequest, CalculationStore, GeoPoint, Member, SqliteCalculationStore,
    Venue, calculate,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// Shared state for store scenarios.
#[derive(Debug)]
struct StoreWorld {
    temp_dir: TempDir,
    store: RefCell<Option<SqliteCalculationStore>>,
    last_saved: Cell<Option<u64>>,
}

impl StoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            store: RefCell::new(None),
            last_saved: Cell::new(None),
        }
    }

    fn database_path(&self) -> PathBuf {
        self.temp_dir.path().join("history.db")
    }

    fn open(&self) {
        let store = SqliteCalculationStore::open(self.database_path()).expect("open store");
        self.store.replace(Some(store));
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut SqliteCalculationStore) -> T) -> T {
        let mut borrowed = self.store.borrow_mut();
        let store = borrowed.as_mut().expect("store should be open");
        f(store)
    }
}

#[fixture]
fn world() -> StoreWorld {
    StoreWorld::new()
}

fn request_for(group_id: u64) -> CalculationRequest {
    CalculationRequest {
        group_id,
        members: vec![
            Member::new(1, "Ana", Address::Known(GeoPoint::from_raw(-12.0, -77.0))),
            Member::new(2, "Rosa", Address::Known(GeoPoint::from_raw(-12.1, -77.05))),
        ],
        venue: Venue::new(
            1,
            "KFC - San Isidro",
            Address::Known(GeoPoint::from_raw(-12.0904, -77.0396)),
        ),
    }
}

#[given("an empty calculation store on disk")]
fn given_store(world: &StoreWorld) {
    world.open();
}

#[when("a calculation for group {group_id} is saved")]
fn when_saved(world: &StoreWorld, group_id: u64) {
    let result = calculate(&request_for(group_id)).expect("calculation");
    let stored = world.with_store(|store| store.save(&result).expect("save"));
    world.last_saved.set(Some(stored.id));
}

#[when("the store is reopened")]
fn when_reopened(world: &StoreWorld) {
    world.store.replace(None);
    world.open();
}

#[when("the last saved calculation is deleted")]
fn when_deleted(world: &StoreWorld) {
    let id = world.last_saved.get().expect("a saved calculation");
    let removed = world.with_store(|store| store.delete(id).expect("delete"));
    assert!(removed, "expected a row to be deleted");
}

#[then("the calculation for group {group_id} is found by its id")]
fn then_found(world: &StoreWorld, group_id: u64) {
    let id = world.last_saved.get().expect("a saved calculation");
    let found = world
        .with_store(|store| store.get(id).expect("get"))
        .expect("stored calculation");
    assert_eq!(found.result.group_id(), group_id);
    assert_eq!(found.result.venue_name(), "KFC - San Isidro");
}

#[then("the history for group {group_id} has {count} entries")]
fn then_history(world: &StoreWorld, group_id: u64, count: usize) {
    let history = world.with_store(|store| store.list_for_group(group_id).expect("list"));
    assert_eq!(history.len(), count);
    assert!(history.iter().all(|row| row.result.group_id() == group_id));
}

#[scenario(path = "tests/features/sqlite_calculation_store.feature", index = 0)]
fn saved_calculation_round_trips(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_calculation_store.feature", index = 1)]
fn history_is_scoped(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_calculation_store.feature", index = 2)]
fn deleted_calculations_disappear(world: StoreWorld) {
    let _ = world;
}
