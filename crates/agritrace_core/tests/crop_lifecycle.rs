use agritrace_core::model::crop::format_price;
use agritrace_core::{
    Amount, CropDraft, CropRecord, CropService, CropStatus, DemoWallet, FixedClock,
    LedgerPolicy, MemorySlotStore, RecordId, RecordStore, SaleRequest, UnavailableWallet,
    WalletError,
};
use chrono::NaiveDate;

const T0_MS: i64 = 1_729_245_600_000;

fn store() -> RecordStore<MemorySlotStore, FixedClock> {
    RecordStore::with_clock(MemorySlotStore::new(), FixedClock::at_millis(T0_MS))
}

fn draft(location: Option<&str>) -> CropDraft {
    CropDraft {
        name: "First Flush".to_string(),
        crop_type: "Tea".to_string(),
        harvest_date: "2024-10-01".to_string(),
        quantity: "40 kg".to_string(),
        expected_price_per_unit: Amount::new(100.0),
        grow_location: location.map(str::to_string),
        improvement_notes: String::new(),
    }
}

#[test]
fn darjeeling_premium_renders_150() {
    let store = store();
    let crops = CropService::new(&store);

    let crop = crops.add(draft(Some("Darjeeling"))).unwrap();
    assert_eq!(format_price(crop.adjusted_price()), "150.00");
}

#[test]
fn missing_or_unknown_location_uses_unit_multiplier() {
    let store = store();
    let crops = CropService::new(&store);

    let defaulted = crops.add(draft(None)).unwrap();
    let unknown = crops.add(draft(Some("Atlantis"))).unwrap();

    assert_eq!(defaulted.grow_location, "Other");
    assert_eq!(defaulted.location_multiplier(), 1.0);
    assert_eq!(unknown.location_multiplier(), 1.0);
}

#[test]
fn multiplier_follows_location_changes() {
    let store = store();
    let crops = CropService::new(&store);
    let crop = crops.add(draft(Some("Punjab"))).unwrap();

    let listing = crops.update_location(&crop.id, "Kashmir").unwrap();
    assert_eq!(format_price(listing[0].adjusted_price()), "140.00");

    let listing = crops.update_location(&crop.id, "  ").unwrap();
    assert_eq!(listing[0].grow_location, "Other");
}

#[test]
fn selling_sets_every_closing_field_together() {
    let store = store();
    let crops = CropService::new(&store);
    let crop = crops.add(draft(Some("Assam"))).unwrap();
    crops.place_bid(&crop.id, Amount::new(90.0)).unwrap();

    let listing = crops
        .sell(
            &crop.id,
            SaleRequest {
                price_per_unit: Amount::new(95.0),
                distributor_name: "Ravi Traders".to_string(),
                distributor_account: "0x742d35Cc6634C0532925a3b8D404d00Ca11da58F".to_string(),
            },
        )
        .unwrap();

    let closing = listing[0].sale().unwrap();
    assert_eq!(closing.sold_price_per_unit.get(), 95.0);
    assert_eq!(closing.distributor_name, "Ravi Traders");
    assert_eq!(
        closing.distributor_account,
        "0x742d35Cc6634C0532925a3b8D404d00Ca11da58F"
    );
    assert_eq!(closing.sold_date.as_date(), NaiveDate::from_ymd_opt(2024, 10, 18));

    let summary = crops.summary().unwrap();
    assert_eq!(summary.sold_count, 1);
    assert_eq!(summary.total_revenue, 95.0 * 40.0);
}

#[test]
fn bid_and_sale_on_unknown_id_are_noops() {
    let store = store();
    let crops = CropService::new(&store);
    let crop = crops.add(draft(Some("Kerala"))).unwrap();

    let listing = crops.place_bid(&RecordId::new("1"), Amount::new(5.0)).unwrap();

    assert_eq!(listing, vec![crop]);
    assert!(listing[0].is_available());
}

#[test]
fn sold_status_persists_as_flat_wire_shape() {
    let store = store();
    let crops = CropService::new(&store);
    let crop = crops.add(draft(Some("Assam"))).unwrap();
    crops
        .sell(
            &crop.id,
            SaleRequest {
                price_per_unit: Amount::new(80.0),
                distributor_name: "Ravi".to_string(),
                distributor_account: "0xabc".to_string(),
            },
        )
        .unwrap();

    let stored = store.load::<CropRecord>().unwrap();
    let wire = serde_json::to_value(&stored[0]).unwrap();
    assert_eq!(wire["status"], "sold");
    assert_eq!(wire["type"], "Tea");
    assert_eq!(wire["soldPricePerUnit"], 80.0);
    assert_eq!(wire["soldDate"], "2024-10-18");
    assert!(wire.get("locationMultiplier").is_none());
}

#[test]
fn required_ledger_failure_persists_nothing() {
    let store = store();
    let crops = CropService::new(&store);

    let err = crops
        .register(draft(Some("Assam")), &UnavailableWallet, LedgerPolicy::Required)
        .unwrap_err();

    assert!(matches!(
        err,
        agritrace_core::CropServiceError::Ledger(WalletError::Unavailable(_))
    ));
    assert!(crops.list().unwrap().is_empty());
}

#[test]
fn required_ledger_success_stores_crop_with_receipt() {
    let store = store();
    let crops = CropService::new(&store);
    let wallet = DemoWallet::new();

    let registration = crops
        .register(draft(Some("Darjeeling")), &wallet, LedgerPolicy::Required)
        .unwrap();

    let receipt = registration.ledger.unwrap();
    assert_eq!(receipt.batch_id, registration.crop.id.as_str());
    assert_eq!(crops.list().unwrap(), vec![registration.crop]);

    let submitted = wallet.submitted_batches();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].price_per_unit.get(), 150.0);
    assert_eq!(submitted[0].quantity_kg.get(), 40.0);
}

#[test]
fn best_effort_keeps_crop_when_ledger_fails() {
    let store = store();
    let crops = CropService::new(&store);

    let registration = crops
        .register(draft(Some("Assam")), &UnavailableWallet, LedgerPolicy::BestEffort)
        .unwrap();

    assert!(registration.ledger.is_err());
    let stored = crops.list().unwrap();
    assert_eq!(stored, vec![registration.crop]);
    assert!(matches!(stored[0].status, CropStatus::Available));
}
