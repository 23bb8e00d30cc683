use roads_of_babel::domain::{
    quote_for_zone, quote_shipment, refund_for_country, refund_quote, Dimensions, InvalidInput,
    ItemEstimate, ParcelSpec, RateTable, ShippingZone, VatInput,
};

fn zone(base_rate: f64, per_kg_rate: f64) -> ShippingZone {
    ShippingZone {
        id: "z".to_string(),
        name: "Z".to_string(),
        base_rate,
        per_kg_rate,
    }
}

fn price(weight: f64, l: f64, w: f64, h: f64, z: &ShippingZone) -> f64 {
    let parcel = ParcelSpec::new(weight, Dimensions::new(l, w, h)).unwrap();
    quote_shipment(&parcel, z).total_price
}

#[test]
fn end_to_end_dense_parcel() {
    let parcel = ParcelSpec::new(2.0, Dimensions::new(30.0, 20.0, 15.0)).unwrap();
    let quote = quote_shipment(&parcel, &zone(10.0, 5.0));
    assert!((quote.volumetric_weight - 1.8).abs() < 1e-12);
    assert_eq!(quote.chargeable_weight, 2.0);
    assert_eq!(quote.total_price, 20.0);
    assert!(!quote.volumetric_applied);
}

#[test]
fn zero_volume_boundary() {
    let z = zone(10.0, 5.0);
    let parcel = ParcelSpec::new(1.0, Dimensions::new(0.0, 0.0, 0.0)).unwrap();
    let quote = quote_shipment(&parcel, &z);
    assert_eq!(quote.chargeable_weight, 1.0);
    assert_eq!(quote.total_price, z.base_rate + z.per_kg_rate);
}

#[test]
fn price_never_drops_when_one_input_grows() {
    let z = zone(7.5, 3.25);
    let base = (1.0, 20.0, 20.0, 20.0);
    let steps = [0.5, 1.0, 5.0, 25.0, 100.0];

    for step in steps {
        let (w, l, wd, h) = base;
        let reference = price(w, l, wd, h, &z);
        assert!(price(w + step, l, wd, h, &z) >= reference);
        assert!(price(w, l + step, wd, h, &z) >= reference);
        assert!(price(w, l, wd + step, h, &z) >= reference);
        assert!(price(w, l, wd, h + step, &z) >= reference);
    }
}

#[test]
fn invalid_weights_are_rejected() {
    let dims = Dimensions::new(10.0, 10.0, 10.0);
    for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(ParcelSpec::new(weight, dims).is_err(), "accepted {weight}");
    }
}

#[test]
fn overflowing_volume_is_rejected() {
    let huge = Dimensions::new(1e120, 1e120, 1e120);
    assert_eq!(
        ParcelSpec::new(1.0, huge),
        Err(InvalidInput::NotFinite { field: "volume" })
    );

    let big = ParcelSpec::new(1.0, Dimensions::new(1e100, 1e100, 1e100)).unwrap();
    let free_per_kg = quote_shipment(&big, &zone(10.0, 0.0));
    assert!(free_per_kg.chargeable_weight.is_finite());
    assert_eq!(free_per_kg.total_price, 10.0);

    let z = zone(10.0, 5.0);
    assert!(quote_shipment(&big, &z).total_price >= price(1.0, 1.0, 1.0, 1.0, &z));
}

#[test]
fn unknown_zone_is_rejected_without_fallback() {
    let table = RateTable::embedded().unwrap();
    let parcel = ParcelSpec::new(1.0, Dimensions::default()).unwrap();
    assert_eq!(
        quote_for_zone(&table, "atlantis", &parcel),
        Err(InvalidInput::UnknownZone("atlantis".to_string()))
    );
    assert!(quote_for_zone(&table, "world", &parcel).is_ok());
}

#[test]
fn vision_estimate_prices_like_typed_input() {
    let table = RateTable::embedded().unwrap();
    let estimate = ItemEstimate {
        weight: 1.2,
        length: 30.0,
        width: 20.0,
        height: 10.0,
        category: "Shoes".to_string(),
    };
    let from_estimate = ParcelSpec::try_from(&estimate).unwrap();
    let typed = ParcelSpec::new(1.2, Dimensions::new(30.0, 20.0, 10.0)).unwrap();
    assert_eq!(
        quote_for_zone(&table, "europe", &from_estimate),
        quote_for_zone(&table, "europe", &typed)
    );
}

#[test]
fn vat_reference_values() {
    let quote = refund_quote(VatInput {
        gross_amount: 100.0,
        vat_rate: 0.20,
    })
    .unwrap();
    assert!((quote.vat_portion - 100.0 / 6.0).abs() < 1e-9);
    assert!((quote.handling_fee - 2.5).abs() < 1e-9);
    assert_eq!(format!("{:.2}€", quote.net_refund), "14.17€");

    assert_eq!(
        refund_quote(VatInput {
            gross_amount: 100.0,
            vat_rate: 1.0
        }),
        Err(InvalidInput::VatRateOutOfRange(1.0))
    );
}

#[test]
fn vat_by_country_uses_the_table() {
    let table = RateTable::embedded().unwrap();
    let fr = refund_for_country(&table, "fr", 100.0).unwrap();
    let de = refund_for_country(&table, "de", 100.0).unwrap();
    assert!(fr.net_refund > de.net_refund);
    assert_eq!(
        refund_for_country(&table, "ch", 100.0),
        Err(InvalidInput::UnknownCountry("ch".to_string()))
    );
}
