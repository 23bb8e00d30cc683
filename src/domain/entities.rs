use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::{require_non_negative, require_positive, InvalidInput};

/// External parcel dimensions in centimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Volume in cubic centimetres.
    pub fn volume_cm3(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// A validated parcel ready to be priced.
///
/// Weight must be strictly positive. A dimension of zero means "not
/// measured" and contributes no volumetric weight; negative or non-finite
/// values are rejected, as are dimensions whose product overflows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParcelSpec {
    weight_kg: f64,
    dimensions: Dimensions,
}

impl ParcelSpec {
    pub fn new(weight_kg: f64, dimensions: Dimensions) -> Result<Self, InvalidInput> {
        let weight_kg = require_positive("weight", weight_kg)?;
        require_non_negative("length", dimensions.length)?;
        require_non_negative("width", dimensions.width)?;
        require_non_negative("height", dimensions.height)?;
        if !dimensions.volume_cm3().is_finite() {
            return Err(InvalidInput::NotFinite { field: "volume" });
        }
        Ok(Self {
            weight_kg,
            dimensions,
        })
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

impl TryFrom<&ItemEstimate> for ParcelSpec {
    type Error = InvalidInput;

    fn try_from(estimate: &ItemEstimate) -> Result<Self, Self::Error> {
        ParcelSpec::new(
            estimate.weight,
            Dimensions::new(estimate.length, estimate.width, estimate.height),
        )
    }
}

/// Destination pricing tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: String,
    pub name: String,
    pub base_rate: f64,
    pub per_kg_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PriceQuote {
    pub volumetric_weight: f64,
    pub chargeable_weight: f64,
    pub total_price: f64,
    /// True when the volumetric weight exceeded the actual weight.
    pub volumetric_applied: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VatInput {
    /// VAT-inclusive purchase amount.
    pub gross_amount: f64,
    pub vat_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VatRefundQuote {
    pub vat_portion: f64,
    pub handling_fee: f64,
    pub net_refund: f64,
}

/// Dimensions and weight guessed from a photo by the vision service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemEstimate {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub category: String,
}

/// Reception warehouse where customers ship their purchases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub flag: String,
    pub address: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Pending,
    Received,
    Consolidated,
    Shipped,
    Delivered,
}

impl PackageStatus {
    pub const ALL: [PackageStatus; 5] = [
        PackageStatus::Pending,
        PackageStatus::Received,
        PackageStatus::Consolidated,
        PackageStatus::Shipped,
        PackageStatus::Delivered,
    ];

    /// Still sitting in one of our warehouses.
    pub fn is_in_stock(&self) -> bool {
        matches!(self, PackageStatus::Received | PackageStatus::Consolidated)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub tracking_number: String,
    pub origin: String,
    /// Kilograms.
    pub weight: f64,
    pub status: PackageStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_received: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// Name to greet the user with; falls back to the email address.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }

    /// Overlays profile fields from the user service onto auth data.
    pub fn merge_profile(mut self, profile: UserProfile) -> Self {
        if profile.full_name.is_some() {
            self.full_name = profile.full_name;
        }
        if profile.updated_at.is_some() {
            self.updated_at = profile.updated_at;
        }
        if let Some(email) = profile.email.filter(|email| !email.is_empty()) {
            self.email = email;
        }
        self
    }
}

/// Profile record held by the user service. Every field is optional there.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}
