//! Pricing engine, rate tables and the client-side state around them.

pub mod dashboard;
pub mod entities;
pub mod error;
pub mod i18n;
pub mod pricing;
pub mod rates;
pub mod session;
pub mod vat;

pub use dashboard::{summarize, DashboardSummary};
pub use entities::{
    ChatMessage, ChatRole, Dimensions, ItemEstimate, Package, PackageStatus, ParcelSpec,
    PriceQuote, ShippingZone, User, UserProfile, VatInput, VatRefundQuote, Warehouse,
};
pub use error::InvalidInput;
pub use i18n::{translate, translate_dynamic, Language, MessageKey};
pub use pricing::{
    chargeable_weight, quote_for_zone, quote_shipment, volumetric_weight, VOLUMETRIC_DIVISOR,
};
pub use rates::{RateTable, RateTableError};
pub use session::{AuthSession, SessionState};
pub use vat::{refund_for_country, refund_quote, VAT_HANDLING_FEE_RATE};
