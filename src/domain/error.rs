use thiserror::Error;

/// Rejection reasons for pricing and VAT inputs.
///
/// Every variant is a flavour of the same failure: the caller handed the
/// engine something it cannot price. Nothing here is retried internally.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InvalidInput {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("unknown shipping zone `{0}`")]
    UnknownZone(String),
    #[error("unknown VAT country `{0}`")]
    UnknownCountry(String),
    #[error("VAT rate must lie in [0, 1) (got {0})")]
    VatRateOutOfRange(f64),
}

/// Accepts finite values strictly above zero.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(InvalidInput::NonPositive { field, value });
    }
    Ok(value)
}

/// Accepts finite values at or above zero.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInput::Negative { field, value });
    }
    Ok(value)
}
