
use async_trait::async_trait;
use checkout::address::AddressForm;
use checkout::error::CheckoutError;
use checkout::geocode::{Geocoder, ResolvedPlace};
use checkout::location::UnsupportedLocationProvider;
use checkout::model::{AddressField, GeoPoint};
use mockall::mock;
use mocks::{fc_road_place, pune_click, FailingGeocoder, FixedLocationProvider, StaticGeocoder};
use std::error::Error;
use std::sync::atomic::Ordering;

mock! {
    pub Geo {}

    #[async_trait]
    impl Geocoder for Geo {
        async fn reverse(
            &self,
            point: GeoPoint,
        ) -> Result<ResolvedPlace, Box<dyn Error + Send + Sync>>;
    }
}

fn prefilled_form() -> AddressForm {
    let mut form = AddressForm::new();
    form.set_field(AddressField::Name, "A");
    form.set_field(AddressField::AddressLine1, "12 Main");
    form.set_field(AddressField::AddressLine2, "Flat 3");
    form.set_field(AddressField::City, "Mumbai");
    form.set_field(AddressField::State, "MH");
    form.set_field(AddressField::Pincode, "400001");
    form
}

#[test]
fn manual_input_updates_exactly_one_field() {
    let mut form = prefilled_form();

    form.set_field(AddressField::City, "Pune");

    let buyer = form.buyer();
    assert_eq!(buyer.city, "Pune");
    assert_eq!(buyer.name, "A");
    assert_eq!(buyer.address_line1, "12 Main");
    assert_eq!(buyer.address_line2, "Flat 3");
    assert_eq!(buyer.state, "MH");
    assert_eq!(buyer.pincode, "400001");
    assert_eq!(buyer.latitude, None);
    assert_eq!(buyer.longitude, None);
}

#[tokio::test]
async fn map_click_fills_address_from_geocoded_place() {
    let mut form = prefilled_form();
    let mut geocoder = MockGeo::new();
    geocoder
        .expect_reverse()
        .withf(|point| point.lat == 18.52 && point.lng == 73.85)
        .times(1)
        .returning(|_| Ok(fc_road_place()));

    form.pick_on_map(pune_click(), &geocoder).await.unwrap();

    let buyer = form.buyer();
    assert_eq!(buyer.address_line1, "FC Road");
    assert_eq!(buyer.city, "Pune");
    assert_eq!(buyer.state, "MH");
    assert_eq!(buyer.pincode, "411001");
    assert_eq!(buyer.latitude, Some(18.52));
    assert_eq!(buyer.longitude, Some(73.85));
    // Untouched by geocoding.
    assert_eq!(buyer.name, "A");
    assert_eq!(buyer.address_line2, "Flat 3");
}

#[tokio::test]
async fn empty_street_preserves_address_line1() {
    let mut form = prefilled_form();
    let geocoder = StaticGeocoder::new(ResolvedPlace {
        street: String::new(),
        ..fc_road_place()
    });

    form.pick_on_map(pune_click(), &geocoder).await.unwrap();

    assert_eq!(form.buyer().address_line1, "12 Main");
    assert_eq!(form.buyer().city, "Pune");
}

#[tokio::test]
async fn empty_results_still_overwrite_city_state_pincode() {
    let mut form = prefilled_form();
    let geocoder = StaticGeocoder::new(ResolvedPlace::default());

    form.pick_on_map(pune_click(), &geocoder).await.unwrap();

    let buyer = form.buyer();
    assert_eq!(buyer.city, "");
    assert_eq!(buyer.state, "");
    assert_eq!(buyer.pincode, "");
    // Line 1 survives an empty street.
    assert_eq!(buyer.address_line1, "12 Main");
    assert_eq!(buyer.latitude, Some(18.52));
    assert_eq!(buyer.longitude, Some(73.85));
}

#[tokio::test]
async fn only_the_latest_marker_is_retained() {
    let mut form = AddressForm::new();
    let geocoder = StaticGeocoder::new(fc_road_place());

    form.pick_on_map(GeoPoint { lat: 10.0, lng: 20.0 }, &geocoder)
        .await
        .unwrap();
    form.pick_on_map(pune_click(), &geocoder).await.unwrap();

    assert_eq!(form.marker(), Some(pune_click()));
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn current_location_feeds_the_same_geocoding_path() {
    let mut form = AddressForm::new();
    let geocoder = StaticGeocoder::new(fc_road_place());
    let provider = FixedLocationProvider(pune_click());

    form.use_current_location(&provider, &geocoder)
        .await
        .unwrap();

    assert_eq!(form.marker(), Some(pune_click()));
    assert_eq!(form.buyer().city, "Pune");
}

#[tokio::test]
async fn unavailable_location_service_is_reported_without_geocoding() {
    let mut form = prefilled_form();
    let geocoder = StaticGeocoder::new(fc_road_place());

    let err = form
        .use_current_location(&UnsupportedLocationProvider, &geocoder)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::LocationUnavailable(_)));
    assert_eq!(err.to_string(), "Location service is not available");
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    // Address untouched, no marker dropped.
    assert_eq!(form.buyer().city, "Mumbai");
    assert_eq!(form.marker(), None);
}

#[tokio::test]
async fn geocoding_failure_is_an_explicit_error_branch() {
    let mut form = prefilled_form();

    let err = form
        .pick_on_map(pune_click(), &FailingGeocoder)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::GeocodeFailed(_)));
    assert_eq!(
        err.to_string(),
        "Could not look up an address for the selected location"
    );
    // The marker was dropped at the click, but the address stays as typed.
    assert_eq!(form.marker(), Some(pune_click()));
    assert_eq!(form.buyer().city, "Mumbai");
    assert_eq!(form.buyer().latitude, None);
}
