use crate::error::CheckoutError;
use crate::geocode::{Geocoder, ResolvedPlace};
use crate::location::LocationProvider;
use crate::model::{AddressField, BuyerAddress, GeoPoint};
use tracing::{debug, warn};

/// Delivery address collector fed by two independent input sources: manual
/// text entry and a map surface driving reverse geocoding.
///
/// Only the most recent map selection is retained (a single marker, not a
/// history).
#[derive(Debug, Default)]
pub struct AddressForm {
    buyer: BuyerAddress,
    marker: Option<GeoPoint>,
}

impl AddressForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an address supplied wholesale, e.g. a request body.
    pub fn from_address(buyer: BuyerAddress) -> Self {
        Self {
            buyer,
            marker: None,
        }
    }

    pub fn buyer(&self) -> &BuyerAddress {
        &self.buyer
    }

    pub fn marker(&self) -> Option<GeoPoint> {
        self.marker
    }

    /// Manual text input: updates exactly the one changed attribute.
    pub fn set_field(&mut self, field: AddressField, value: &str) {
        let slot = match field {
            AddressField::Name => &mut self.buyer.name,
            AddressField::AddressLine1 => &mut self.buyer.address_line1,
            AddressField::AddressLine2 => &mut self.buyer.address_line2,
            AddressField::City => &mut self.buyer.city,
            AddressField::State => &mut self.buyer.state,
            AddressField::Pincode => &mut self.buyer.pincode,
        };
        *slot = value.to_string();
    }

    /// A click on the map surface: drop the marker at the point and fill
    /// the address from the geocoded result.
    pub async fn pick_on_map(
        &mut self,
        point: GeoPoint,
        geocoder: &dyn Geocoder,
    ) -> Result<(), CheckoutError> {
        self.marker = Some(point);
        let place = geocoder.reverse(point).await.map_err(|e| {
            warn!("Reverse geocoding failed for ({}, {}): {}", point.lat, point.lng, e);
            CheckoutError::GeocodeFailed(e)
        })?;
        self.apply_resolved_place(point, &place);
        Ok(())
    }

    /// The "use current location" action: ask the platform for the device
    /// position, then geocode it like a map click.
    pub async fn use_current_location(
        &mut self,
        provider: &dyn LocationProvider,
        geocoder: &dyn Geocoder,
    ) -> Result<(), CheckoutError> {
        let point = provider
            .current_position()
            .await
            .map_err(CheckoutError::LocationUnavailable)?;
        self.pick_on_map(point, geocoder).await
    }

    /// Merge a geocoded place into the address.
    ///
    /// City, state and pincode are overwritten unconditionally, even with
    /// empty results. Address line 1 keeps its current value unless a
    /// non-empty street was resolved. Coordinates always take the new point.
    fn apply_resolved_place(&mut self, point: GeoPoint, place: &ResolvedPlace) {
        debug!(
            "Applying geocoded place for ({}, {}): {:?}",
            point.lat, point.lng, place
        );
        if !place.street.is_empty() {
            self.buyer.address_line1 = place.street.clone();
        }
        self.buyer.city = place.city.clone();
        self.buyer.state = place.state.clone();
        self.buyer.pincode = place.pincode.clone();
        self.buyer.latitude = Some(point.lat);
        self.buyer.longitude = Some(point.lng);
    }

    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        self.buyer.missing_required_fields()
    }
}
