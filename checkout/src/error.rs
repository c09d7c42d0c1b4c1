use std::error::Error;
use thiserror::Error as ThisError;

/// User-facing failures of the checkout flow.
///
/// Every variant renders as the plain message shown to the buyer; there are
/// no structured error codes and nothing here is fatal to the process. The
/// underlying cause, when one exists, travels along for logging only.
#[derive(Debug, ThisError)]
pub enum CheckoutError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields { missing: Vec<&'static str> },

    #[error("Food listing is not loaded yet")]
    ListingNotLoaded,

    #[error("Order already confirmed")]
    AlreadyConfirmed,

    #[error("Error placing order")]
    OrderWriteFailed(#[source] Box<dyn Error + Send + Sync>),

    #[error("Failed to load the payment checkout script. Please check your connection.")]
    PaymentScriptUnavailable(#[source] Box<dyn Error + Send + Sync>),

    #[error("Could not look up an address for the selected location")]
    GeocodeFailed(#[source] Box<dyn Error + Send + Sync>),

    #[error("Location service is not available")]
    LocationUnavailable(#[source] Box<dyn Error + Send + Sync>),
}

impl CheckoutError {
    /// Whether the buyer can correct their input and retry without any
    /// remote state having changed.
    pub fn is_retryable_input(&self) -> bool {
        matches!(
            self,
            CheckoutError::MissingRequiredFields { .. } | CheckoutError::ListingNotLoaded
        )
    }
}
