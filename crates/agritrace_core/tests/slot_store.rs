use agritrace_core::db::open_db_in_memory;
use agritrace_core::{MemorySlotStore, SlotStore, SqliteSlotStore};

fn exercise(slots: &dyn SlotStore) {
    assert_eq!(slots.read_slot("farmer-crops").unwrap(), None);

    slots.write_slot("farmer-crops", "[1]").unwrap();
    slots.write_slot("farmer-crops", "[1,2]").unwrap();
    slots.write_slot("agritrace-user", "{}").unwrap();
    assert_eq!(
        slots.read_slot("farmer-crops").unwrap().as_deref(),
        Some("[1,2]")
    );
    assert_eq!(
        slots.read_slot("agritrace-user").unwrap().as_deref(),
        Some("{}")
    );

    assert!(slots.remove_slot("farmer-crops").unwrap());
    assert!(!slots.remove_slot("farmer-crops").unwrap());
    assert_eq!(slots.read_slot("farmer-crops").unwrap(), None);
}

#[test]
fn sqlite_slots_upsert_and_remove() {
    let conn = open_db_in_memory().unwrap();
    let slots = SqliteSlotStore::try_new(&conn).unwrap();
    exercise(&slots);
}

#[test]
fn memory_slots_upsert_and_remove() {
    exercise(&MemorySlotStore::new());
}

#[test]
fn sqlite_slots_are_shared_per_connection() {
    let conn = open_db_in_memory().unwrap();
    let writer = SqliteSlotStore::try_new(&conn).unwrap();
    let reader = SqliteSlotStore::try_new(&conn).unwrap();

    writer.write_slot("agritrace-settings", "{\"theme\":\"dark\"}").unwrap();
    assert_eq!(
        reader.read_slot("agritrace-settings").unwrap().as_deref(),
        Some("{\"theme\":\"dark\"}")
    );
}
