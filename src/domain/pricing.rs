//! Chargeable-weight shipping price.

use super::entities::{ParcelSpec, PriceQuote, ShippingZone};
use super::error::InvalidInput;
use super::rates::RateTable;

/// IATA divisor: cm³ per kilogram of volumetric weight.
pub const VOLUMETRIC_DIVISOR: f64 = 5000.0;

pub fn volumetric_weight(parcel: &ParcelSpec) -> f64 {
    parcel.dimensions().volume_cm3() / VOLUMETRIC_DIVISOR
}

/// Carriers bill the heavier of actual and volumetric weight.
pub fn chargeable_weight(parcel: &ParcelSpec) -> f64 {
    parcel.weight_kg().max(volumetric_weight(parcel))
}

/// Prices a validated parcel against a zone. No rounding is applied.
pub fn quote_shipment(parcel: &ParcelSpec, zone: &ShippingZone) -> PriceQuote {
    let volumetric_weight = volumetric_weight(parcel);
    let chargeable_weight = parcel.weight_kg().max(volumetric_weight);

    PriceQuote {
        volumetric_weight,
        chargeable_weight,
        total_price: zone.base_rate + chargeable_weight * zone.per_kg_rate,
        volumetric_applied: volumetric_weight > parcel.weight_kg(),
    }
}

/// Resolves `zone_id` in the table, then prices the parcel.
pub fn quote_for_zone(
    table: &RateTable,
    zone_id: &str,
    parcel: &ParcelSpec,
) -> Result<PriceQuote, InvalidInput> {
    let zone = table.zone(zone_id)?;
    Ok(quote_shipment(parcel, zone))
}
