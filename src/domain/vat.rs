//! Off-tax refund for purchases made in an EU warehouse country.

use super::entities::{VatInput, VatRefundQuote};
use super::error::{require_non_negative, InvalidInput};
use super::rates::RateTable;

/// Share of the reclaimed VAT kept to cover processing.
pub const VAT_HANDLING_FEE_RATE: f64 = 0.15;

pub fn refund_quote(input: VatInput) -> Result<VatRefundQuote, InvalidInput> {
    let gross = require_non_negative("gross amount", input.gross_amount)?;
    let rate = validate_vat_rate(input.vat_rate)?;

    let vat_portion = gross / (1.0 + rate) * rate;
    let handling_fee = vat_portion * VAT_HANDLING_FEE_RATE;

    Ok(VatRefundQuote {
        vat_portion,
        handling_fee,
        net_refund: vat_portion - handling_fee,
    })
}

/// Looks up the country's rate in the table, then computes the refund.
pub fn refund_for_country(
    table: &RateTable,
    country: &str,
    gross_amount: f64,
) -> Result<VatRefundQuote, InvalidInput> {
    let vat_rate = table.vat_rate(country)?;
    refund_quote(VatInput {
        gross_amount,
        vat_rate,
    })
}

pub(crate) fn validate_vat_rate(rate: f64) -> Result<f64, InvalidInput> {
    if !(0.0..1.0).contains(&rate) {
        return Err(InvalidInput::VatRateOutOfRange(rate));
    }
    Ok(rate)
}
