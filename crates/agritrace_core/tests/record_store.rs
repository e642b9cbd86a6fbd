use agritrace_core::db::open_db_in_memory;
use agritrace_core::{
    Amount, CollectionKey, CropDraft, CropRecord, FixedClock, InventoryDraft, InventoryItem,
    MemorySlotStore, RecordId, RecordStore, SlotStore, SqliteSlotStore, StockDraft, StockItem,
    StoreError,
};

const T0_MS: i64 = 1_729_245_600_000;

fn memory_store() -> RecordStore<MemorySlotStore, FixedClock> {
    RecordStore::with_clock(MemorySlotStore::new(), FixedClock::at_millis(T0_MS))
}

fn tea(location: &str) -> CropDraft {
    CropDraft {
        name: "First Flush".to_string(),
        crop_type: "Tea".to_string(),
        quantity: "50".to_string(),
        expected_price_per_unit: Amount::new(100.0),
        grow_location: Some(location.to_string()),
        ..CropDraft::default()
    }
}

fn lot(in_hand: f64) -> StockDraft {
    StockDraft {
        crop_name: "Basmati".to_string(),
        quantity_in_hand: Amount::new(in_hand),
        buying_price: Amount::new(40.0),
        selling_price: Amount::new(55.0),
        ..StockDraft::default()
    }
}

#[test]
fn append_then_load_contains_the_record_once() {
    let store = memory_store();

    let created = store.create::<CropRecord>(tea("Assam")).unwrap();
    let loaded = store.load::<CropRecord>().unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], created);
    assert_eq!(created.id.as_str(), T0_MS.to_string());
}

#[test]
fn ids_strictly_increase_under_a_frozen_clock() {
    let store = memory_store();

    let first = store.create::<CropRecord>(tea("Assam")).unwrap();
    let second = store.create::<CropRecord>(tea("Kerala")).unwrap();
    let third = store.create::<StockItem>(lot(10.0)).unwrap();

    let first_ms = first.id.as_millis().unwrap();
    let second_ms = second.id.as_millis().unwrap();
    let third_ms = third.id.as_millis().unwrap();
    assert!(first_ms < second_ms);
    assert!(second_ms < third_ms);
}

#[test]
fn stock_in_hand_aggregate_rises_by_the_appended_quantity() {
    let store = memory_store();
    store.append::<StockItem>(lot(35.0)).unwrap();
    let before = store.summarize::<StockItem>().unwrap().total_in_hand;

    store.append::<StockItem>(lot(100.0)).unwrap();
    let after = store.summarize::<StockItem>().unwrap();

    assert_eq!(after.total_in_hand - before, 100.0);
    assert_eq!(after.item_count, 2);
}

#[test]
fn remove_is_idempotent() {
    let store = memory_store();
    let keep = store.create::<InventoryItem>(InventoryDraft::default()).unwrap();
    let drop_me = store.create::<InventoryItem>(InventoryDraft::default()).unwrap();

    let once = store.remove::<InventoryItem>(&drop_me.id).unwrap();
    let twice = store.remove::<InventoryItem>(&drop_me.id).unwrap();

    assert_eq!(once, twice);
    assert_eq!(once, vec![keep]);
}

#[test]
fn replace_with_unmodified_copy_is_structurally_equal() {
    let store = memory_store();
    let crop = store.create::<CropRecord>(tea("Darjeeling")).unwrap();
    let before = store.load::<CropRecord>().unwrap();

    let after = store.replace(&crop.id, crop.clone()).unwrap();

    assert_eq!(before, after);
}

#[test]
fn replace_and_remove_of_unknown_id_do_not_write() {
    let store = memory_store();
    let crop = store.create::<CropRecord>(tea("Punjab")).unwrap();
    let raw_before = store.slots().read_slot("farmer-crops").unwrap();

    let mut ghost = crop.clone();
    ghost.id = RecordId::new("1");
    let replaced = store.replace(&RecordId::new("1"), ghost).unwrap();
    let removed = store.remove::<CropRecord>(&RecordId::new("2")).unwrap();

    assert_eq!(replaced, vec![crop.clone()]);
    assert_eq!(removed, vec![crop]);
    assert_eq!(store.slots().read_slot("farmer-crops").unwrap(), raw_before);
}

#[test]
fn replace_rejects_a_record_with_a_different_id() {
    let store = memory_store();
    let crop = store.create::<CropRecord>(tea("Punjab")).unwrap();
    let mut other = crop.clone();
    other.id = RecordId::new("42");

    let err = store.replace(&crop.id, other).unwrap_err();
    assert!(matches!(err, StoreError::IdMismatch { .. }));
}

#[test]
fn malformed_slot_loads_as_empty() {
    let store = memory_store();
    store
        .slots()
        .write_slot(CollectionKey::DistributorStock.slot_key(), "{not json")
        .unwrap();

    assert!(store.load::<StockItem>().unwrap().is_empty());
    assert_eq!(store.summarize::<StockItem>().unwrap().item_count, 0);
}

#[test]
fn unreadable_record_survives_later_append() {
    let store = memory_store();
    let raw = r#"[
        {"id":"1","name":"Good","type":"Dal","status":"available"},
        {"id":"2","name":"Dal","type":"Dal","status":"sold",
         "distributorName":"Ravi","distributorAccount":"0xabc","soldDate":"2024-10-18"}
    ]"#;
    store
        .slots()
        .write_slot(CollectionKey::FarmerCrops.slot_key(), raw)
        .unwrap();

    let loaded = store.load::<CropRecord>().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Good");

    let after = store.create::<CropRecord>(tea("Assam")).unwrap();
    let names = store
        .load::<CropRecord>()
        .unwrap()
        .into_iter()
        .map(|crop| crop.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Good".to_string(), "First Flush".to_string()]);

    let persisted: Vec<serde_json::Value> = serde_json::from_str(
        &store
            .slots()
            .read_slot(CollectionKey::FarmerCrops.slot_key())
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(persisted.len(), 3);
    assert_eq!(persisted[1]["id"], "2");
    assert_eq!(persisted[1]["distributorName"], "Ravi");
    assert!(persisted[1].get("soldPricePerUnit").is_none());
    assert_eq!(persisted[2]["id"], after.id.as_str());
}

#[test]
fn unreadable_record_survives_update_and_remove() {
    let store = memory_store();
    let raw = r#"[{"id":"5","productName":"Oil","receivedDate":20241018}]"#;
    store
        .slots()
        .write_slot(CollectionKey::RetailerInventory.slot_key(), raw)
        .unwrap();
    let item = store.create::<InventoryItem>(InventoryDraft::default()).unwrap();

    store
        .modify(&item.id, |item: &mut InventoryItem| {
            item.supplier = "Coop".to_string()
        })
        .unwrap();
    let remaining = store.remove::<InventoryItem>(&item.id).unwrap();
    assert!(remaining.is_empty());

    let persisted: Vec<serde_json::Value> = serde_json::from_str(
        &store
            .slots()
            .read_slot(CollectionKey::RetailerInventory.slot_key())
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(persisted, vec![serde_json::json!({
        "id": "5",
        "productName": "Oil",
        "receivedDate": 20241018
    })]);
}

#[test]
fn fresh_ids_skip_ids_of_unreadable_records() {
    let store = memory_store();
    let taken = (T0_MS + 10).to_string();
    let raw = format!(r#"[{{"id":"{taken}","cropName":"Wheat"}}]"#);
    store
        .slots()
        .write_slot(CollectionKey::DistributorStock.slot_key(), &raw)
        .unwrap();

    let item = store.create::<StockItem>(lot(5.0)).unwrap();
    assert_eq!(item.id.as_millis(), Some(T0_MS + 11));
}

#[test]
fn lenient_numeric_fields_decode_to_zero() {
    let store = memory_store();
    let raw = r#"[{"id":"7","productName":"Rice","quantity":"abc","soldQuantity":null,
        "purchasePrice":"12.5","sellingPrice":-3,"receivedDate":"2024-10-01"}]"#;
    store
        .slots()
        .write_slot(CollectionKey::RetailerInventory.slot_key(), raw)
        .unwrap();

    let items = store.load::<InventoryItem>().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].quantity.is_zero());
    assert!(items[0].sold_quantity.is_zero());
    assert_eq!(items[0].purchase_price.get(), 12.5);
    assert!(items[0].selling_price.is_zero());
}

#[test]
fn sqlite_backed_store_persists_across_store_instances() {
    let conn = open_db_in_memory().unwrap();
    let id = {
        let store = RecordStore::new(SqliteSlotStore::try_new(&conn).unwrap());
        store.create::<StockItem>(lot(20.0)).unwrap().id
    };

    let store = RecordStore::new(SqliteSlotStore::try_new(&conn).unwrap());
    let loaded = store.get::<StockItem>(&id).unwrap().unwrap();
    assert_eq!(loaded.quantity_in_hand.get(), 20.0);
}
