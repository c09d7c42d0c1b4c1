use crate::model::{FoodListing, SellerProfile, ANONYMOUS_SELLER};
use crate::storage::ListingStorage;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Listing plus seller handed off by a prior page, so the resolver can skip
/// the redundant remote fetches.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedListing {
    pub listing: Option<FoodListing>,
    pub seller: Option<SellerProfile>,
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved {
        listing: FoodListing,
        seller: Option<SellerProfile>,
    },
    /// No listing record exists for the identifier. The consumer keeps
    /// rendering its loading/placeholder state; this is not an error.
    Absent,
    /// A newer `resolve` call started while this one was in flight; the
    /// result must be discarded.
    Superseded,
}

impl Resolution {
    pub fn seller_display_name(&self) -> &str {
        match self {
            Resolution::Resolved {
                seller: Some(seller),
                ..
            } => &seller.name,
            _ => ANONYMOUS_SELLER,
        }
    }
}

/// Resolves a listing identifier to the listing and its seller profile.
///
/// Resolution runs once per identifier change. Each call advances a
/// generation counter; a call that observes a newer generation after any of
/// its awaits yields [`Resolution::Superseded`] instead of applying a stale
/// result.
pub struct ListingResolver {
    storage: Arc<dyn ListingStorage>,
    generation: AtomicU64,
}

impl ListingResolver {
    pub fn new(storage: Arc<dyn ListingStorage>) -> Self {
        Self {
            storage,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn resolve(
        &self,
        id: &str,
        prefetched: Option<PrefetchedListing>,
    ) -> Result<Resolution, Box<dyn Error + Send + Sync>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Resolving listing {} (generation {})", id, generation);

        let prefetched = prefetched.unwrap_or_default();

        let listing = match prefetched.listing {
            Some(listing) => {
                debug!("Using navigation-carried listing for {}", id);
                listing
            }
            None => {
                let fetched = self.storage.get_listing(id).await?;
                if self.superseded(generation) {
                    return Ok(Resolution::Superseded);
                }
                match fetched {
                    Some(listing) => listing,
                    None => {
                        info!("No listing record for id: {}", id);
                        return Ok(Resolution::Absent);
                    }
                }
            }
        };

        let seller = match (prefetched.seller, listing.user_id.as_deref()) {
            (Some(seller), _) => Some(seller),
            (None, Some(user_id)) => {
                let fetched = self.fetch_seller(user_id).await;
                if self.superseded(generation) {
                    return Ok(Resolution::Superseded);
                }
                fetched
            }
            (None, None) => None,
        };

        info!(
            "Resolved listing {} sold by {}",
            listing.id,
            seller
                .as_ref()
                .map(|s| s.name.as_str())
                .unwrap_or(ANONYMOUS_SELLER)
        );
        Ok(Resolution::Resolved { listing, seller })
    }

    /// Seller lookup failures degrade to the placeholder display name; the
    /// listing itself is still usable without a seller profile.
    async fn fetch_seller(&self, user_id: &str) -> Option<SellerProfile> {
        match self.storage.get_seller(user_id).await {
            Ok(seller) => seller,
            Err(e) => {
                warn!("Seller lookup failed for {}: {}", user_id, e);
                None
            }
        }
    }

    fn superseded(&self, generation: u64) -> bool {
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            debug!(
                "Discarding resolution from generation {} (current {})",
                generation, current
            );
            return true;
        }
        false
    }
}
