//! End-to-end pricing and cart scenarios over catalog-shaped JSON.

use std::sync::Arc;

use serde_json::json;
use truffle_cache::{Cache, KvBackend, MemoryBackend};
use truffle_commerce::prelude::*;
use truffle_commerce::pricing::split_pieces;

fn engine() -> (Engine, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    (Engine::new(PricingPolicy::default(), sink.clone()), sink)
}

fn truffle_box(extra: serde_json::Value) -> ProductRecord {
    let mut record = json!({
        "id": "truffle-box",
        "name": "Truffle Box",
        "basePrice": 1500,
        "sizeOptions": [{"id": "six", "name": "Classic Box", "quantity": 6}],
        "typeOptions": [
            {"id": "milk", "name": "Milk", "price": 0},
            {"id": "dark", "name": "Dark", "price": 300}
        ],
        "shapeOptions": [
            {"id": "none", "name": "Regular"},
            {"id": "heart", "name": "Heart", "price": 200}
        ],
        "mixedTypeEnabled": true
    });
    if let (Some(base), Some(extra)) = (record.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(record).unwrap()
}

#[test]
fn test_even_blend_prices_at_sixteen_fifty() {
    let (engine, sink) = engine();
    let product = engine.resolve(&truffle_box(json!({})));
    let quote = engine.quote(&product, &Selection::new().size("six").mixed("milk", "dark", 50.0));

    let mixed = quote.mixed().unwrap();
    assert_eq!(mixed.blend.split.type1_pieces, 3);
    assert_eq!(mixed.blend.split.type2_pieces, 3);
    assert_eq!(mixed.blend.blended_extra, Money::new(150));
    assert_eq!(quote.unit_price.display(), "$16.50");
    assert!(sink.events().is_empty());
}

#[test]
fn test_active_sale_overrides_blend() {
    let (engine, _) = engine();
    let product = engine.resolve(&truffle_box(json!({
        "saleActive": true,
        "salePrice": 1200
    })));

    for selection in [
        Selection::new().mixed("milk", "dark", 50.0),
        Selection::new().single("dark").shape("heart"),
        Selection::new().mixed("milk", "dark", 10.0).shape("heart"),
    ] {
        let quote = engine.quote(&product, &selection);
        assert_eq!(quote.unit_price.display(), "$12.00");
        assert!(quote.on_sale);
    }
}

#[test]
fn test_inactive_sale_is_ignored() {
    let (engine, _) = engine();
    let product = engine.resolve(&truffle_box(json!({
        "saleActive": false,
        "salePrice": 1200
    })));
    let quote = engine.quote(&product, &Selection::new().mixed("milk", "dark", 50.0));
    assert_eq!(quote.unit_price, Money::new(1650));
    assert!(!quote.on_sale);
}

#[test]
fn test_unusable_sale_fields_keep_regular_price() {
    let cases = [
        (json!({"saleActive": true, "salePrice": "TBD"}), true),
        (json!({"saleActive": true, "salePrice": -1200}), true),
        (json!({"saleActive": true, "salePrice": ""}), false),
        (json!({"saleActive": true, "saleType": "fixed", "saleValue": "a lot"}), true),
    ];

    for (fields, reported) in cases {
        let (engine, sink) = engine();
        let product = engine.resolve(&truffle_box(fields.clone()));
        let quote = engine.quote(&product, &Selection::new().mixed("milk", "dark", 50.0));

        assert_eq!(quote.unit_price, quote.regular_unit_price, "{fields}");
        assert_eq!(quote.unit_price, Money::new(1650), "{fields}");
        assert!(!quote.on_sale, "{fields}");
        assert_eq!(sink.kinds().contains(&"invalid_price"), reported, "{fields}");
    }
}

#[test]
fn test_piece_count_from_label() {
    let (engine, sink) = engine();
    let product = engine.resolve(&truffle_box(json!({
        "sizeOptions": [{"id": "small", "name": "Small Box (4 pieces)"}]
    })));
    let quote = engine.quote(&product, &Selection::new().mixed("milk", "dark", 50.0));

    assert_eq!(quote.pieces, 4);
    assert_eq!(quote.type_label(), "2 Milk + 2 Dark");
    assert!(!sink.kinds().contains(&"piece_count_defaulted"));
}

#[test]
fn test_serialized_legacy_catalog() {
    let (engine, sink) = engine();
    let mut record = truffle_box(json!({}));
    record.type_options = Some(serde_json::from_value(json!(
        "[{\"id\":\"milk\",\"name\":\"Milk\"},{\"id\":\"dark\",\"name\":\"Dark\",\"price\":300}]"
    ))
    .unwrap());
    let product = engine.resolve(&record);
    let quote = engine.quote(&product, &Selection::new().single("dark"));

    assert_eq!(quote.unit_price, Money::new(1800));
    assert!(sink.events().is_empty());
}

#[test]
fn test_malformed_catalog_degrades_to_defaults() {
    let (engine, sink) = engine();
    let mut record = truffle_box(json!({}));
    record.type_options = Some(serde_json::from_value(json!("[{broken")).unwrap());
    let product = engine.resolve(&record);

    assert_eq!(product.catalog.types.len(), 2);
    assert_eq!(
        sink.kinds(),
        vec!["catalog_parse_failed", "catalog_defaulted"]
    );

    let quote = engine.quote(&product, &Selection::new());
    assert_eq!(quote.unit_price, Money::new(1500));
}

#[test]
fn test_partition_holds_for_every_ratio() {
    for total in 1..=99u32 {
        let pieces = std::num::NonZeroU32::new(total).unwrap();
        for step in 0..=20 {
            let ratio = f64::from(step) * 5.0;
            let split = split_pieces(ratio, pieces);
            assert_eq!(split.type1_pieces + split.type2_pieces, total);
        }
    }
}

#[test]
fn test_merge_keeps_first_price() {
    let (engine, _) = engine();
    let mut store = CartStore::new(Cache::in_memory(), engine.sink());

    let cheap = engine.resolve(&truffle_box(json!({})));
    let selection = Selection::new().size("six").mixed("milk", "dark", 50.0);
    store.add(engine.compose(&cheap, &selection, 2).unwrap()).unwrap();

    // Same key later priced differently: only the quantity is taken.
    let pricier = engine.resolve(&truffle_box(json!({"basePrice": 2000})));
    let confirmation = store.add(engine.compose(&pricier, &selection, 3).unwrap()).unwrap();

    assert_eq!(confirmation.quantity, 5);
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
    assert_eq!(items[0].price, Money::new(1650));
}

#[test]
fn test_cart_survives_reload_and_reads_old_entries() {
    let dir = tempfile::tempdir().unwrap();
    {
        let backend = truffle_cache::DirectoryBackend::open(dir.path()).unwrap();
        let legacy = json!([
            {"id": "bar", "name": "Dark Bar", "size": "none", "type": "dark", "price": 4.5, "quantity": 2}
        ]);
        backend
            .set("cart", serde_json::to_string(&legacy).unwrap().as_bytes())
            .unwrap();
    }

    let (engine, sink) = engine();
    let mut store = CartStore::new(Cache::open_dir(dir.path()).unwrap(), engine.sink());
    let product = engine.resolve(&truffle_box(json!({})));
    store
        .add(engine.compose(&product, &Selection::new().single("dark"), 1).unwrap())
        .unwrap();

    let mut reloaded = CartStore::new(Cache::open_dir(dir.path()).unwrap(), engine.sink());
    let pricing = reloaded.pricing().unwrap();
    assert_eq!(pricing.item_count, 3);
    // 2 x 4.50 + 1 x 18.00
    assert_eq!(pricing.subtotal, Money::new(2700));
    assert!(!sink.kinds().contains(&"cart_hydrate_failed"));
}

#[test]
fn test_unavailable_storage_is_reported() {
    let backend = MemoryBackend::new();
    backend.set("cart", b"\"not an array\"").unwrap();
    let (engine, sink) = engine();

    let mut store = CartStore::new(Cache::with_backend(backend), engine.sink());
    assert!(store.cart().is_empty());
    assert_eq!(sink.kinds(), vec!["cart_hydrate_failed"]);
}
