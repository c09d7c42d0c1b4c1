use crate::address::AddressForm;
use crate::error::CheckoutError;
use crate::model::{FoodListing, Order, SellerProfile, ANONYMOUS_SELLER};
use crate::payment::{PaymentGateway, PaymentOutcome, PaymentSession};
use crate::resolver::Resolution;
use crate::storage::OrderStorage;
use common::config::PaymentConfig;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Lifecycle of one checkout flow instance.
///
/// `Failed` returns to `Ready` on the next submission attempt; `Confirmed`
/// is terminal, the buyer continues in the external payment UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Loading,
    Ready,
    Submitting,
    Confirmed,
    Failed,
}

/// Result of a successful submission: the appended order record's id and
/// whatever the payment step reported back.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub order_id: String,
    pub payment: PaymentOutcome,
}

/// Orchestrates one buyer's checkout: listing state, the delivery address
/// collector, order persistence and the payment handoff.
pub struct CheckoutFlow {
    listing_id: String,
    listing: Option<FoodListing>,
    seller: Option<SellerProfile>,
    address: AddressForm,
    orders: Arc<dyn OrderStorage>,
    gateway: Arc<dyn PaymentGateway>,
    payment_config: PaymentConfig,
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    pub fn new(
        listing_id: impl Into<String>,
        orders: Arc<dyn OrderStorage>,
        gateway: Arc<dyn PaymentGateway>,
        payment_config: PaymentConfig,
    ) -> Self {
        Self {
            listing_id: listing_id.into(),
            listing: None,
            seller: None,
            address: AddressForm::new(),
            orders,
            gateway,
            payment_config,
            phase: CheckoutPhase::Loading,
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn listing(&self) -> Option<&FoodListing> {
        self.listing.as_ref()
    }

    pub fn seller_display_name(&self) -> &str {
        self.seller
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or(ANONYMOUS_SELLER)
    }

    pub fn address(&self) -> &AddressForm {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut AddressForm {
        &mut self.address
    }

    pub fn set_address_form(&mut self, address: AddressForm) {
        self.address = address;
    }

    /// Feed a resolver outcome into the flow.
    ///
    /// An absent listing keeps the flow in `Loading` so the consumer renders
    /// its placeholder view; a superseded resolution is dropped entirely.
    pub fn attach_resolution(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Resolved { listing, seller } => {
                info!("Checkout ready for listing {}", listing.id);
                self.listing = Some(listing);
                self.seller = seller;
                if self.phase == CheckoutPhase::Loading {
                    self.phase = CheckoutPhase::Ready;
                }
            }
            Resolution::Absent => {
                info!("Listing {} absent, staying in loading state", self.listing_id);
            }
            Resolution::Superseded => {}
        }
    }

    /// Validate, persist the order and hand off to the payment widget.
    ///
    /// Validation failure leaves the flow state untouched and issues no
    /// remote call. A persistence failure moves the flow to `Failed`, from
    /// which the buyer may correct and resubmit. Persistence is a pure
    /// append: resubmitting after a success would write a second record, so
    /// `Confirmed` refuses further submissions.
    pub async fn submit(&mut self) -> Result<Submission, CheckoutError> {
        match self.phase {
            CheckoutPhase::Confirmed => return Err(CheckoutError::AlreadyConfirmed),
            CheckoutPhase::Failed => {
                // Retry path: a failed attempt returns to Ready.
                self.phase = CheckoutPhase::Ready;
            }
            _ => {}
        }

        let Some(listing) = self.listing.clone() else {
            return Err(CheckoutError::ListingNotLoaded);
        };

        let missing = self.address.missing_required_fields();
        if !missing.is_empty() {
            warn!("Submission blocked, missing required fields: {:?}", missing);
            return Err(CheckoutError::MissingRequiredFields { missing });
        }

        self.phase = CheckoutPhase::Submitting;

        let order = Order {
            food_id: self.listing_id.clone(),
            food_title: listing.title.clone(),
            seller_name: self.seller_display_name().to_string(),
            buyer_name: self.address.buyer().name.clone(),
            buyer_address: self.address.buyer().clone(),
            created_at: chrono::Utc::now(),
        };

        let order_id = match self.orders.add_order(&order).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to append order for {}: {}", self.listing_id, e);
                self.phase = CheckoutPhase::Failed;
                return Err(CheckoutError::OrderWriteFailed(e));
            }
        };

        // The order record exists from here on, whatever the payment step
        // does. No server-side verification of the payment outcome exists,
        // and the record is never reconciled with it.
        self.phase = CheckoutPhase::Confirmed;
        info!("Order {} placed for listing {}", order_id, self.listing_id);

        let session = self.payment_session(&listing);
        let payment = self
            .gateway
            .open(session)
            .await
            .map_err(CheckoutError::PaymentScriptUnavailable)?;

        Ok(Submission { order_id, payment })
    }

    fn payment_session(&self, listing: &FoodListing) -> PaymentSession {
        PaymentSession {
            key: self.payment_config.key_id.clone(),
            amount: amount_minor_units(listing.price),
            currency: self.payment_config.currency.clone(),
            name: self.payment_config.display_name.clone(),
            description: format!("Payment for {}", listing.title),
            prefill_name: self.address.buyer().name.clone(),
        }
    }
}

/// Listing prices are kept in major units; the payment widget wants minor
/// units.
pub fn amount_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_half_rupees() {
        assert_eq!(amount_minor_units(50.0), 5000);
        assert_eq!(amount_minor_units(49.995), 5000);
        assert_eq!(amount_minor_units(0.0), 0);
    }
}
