use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name used whenever a listing has no resolvable seller record.
pub const ANONYMOUS_SELLER: &str = "Anonymous";

/// A posted food item available for a buyer to claim.
///
/// Immutable once fetched for the lifetime of a checkout flow; the remote
/// document store owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodListing {
    pub id: String,
    pub title: String,
    /// Price in major currency units (rupees).
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Identifier of the user who posted the listing. Absent on legacy
    /// documents, in which case no seller lookup is attempted.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Read-only profile of the user who posted a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// A latitude/longitude pair selected on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Delivery details collected from the buyer.
///
/// Exists only in transient flow state until submission, when a snapshot of
/// it is embedded in the [`Order`] record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerAddress {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl BuyerAddress {
    /// Required fields that are still empty or whitespace-only.
    ///
    /// Submission is blocked while this is non-empty; address line 2, state
    /// and coordinates are optional at submission time.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.address_line1.trim().is_empty() {
            missing.push("addressLine1");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.pincode.trim().is_empty() {
            missing.push("pincode");
        }
        missing
    }
}

/// One of the six free-text fields of [`BuyerAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Name,
    AddressLine1,
    AddressLine2,
    City,
    State,
    Pincode,
}

/// A persisted record of a buyer's claim on a listing plus delivery details.
///
/// Written exactly once per successful submission and never read back by
/// this flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub food_id: String,
    pub food_title: String,
    pub seller_name: String,
    pub buyer_name: String,
    pub buyer_address: BuyerAddress,
    #[serde(with = "ts_seconds")]
    pub created_at: DateTime<Utc>,
}
