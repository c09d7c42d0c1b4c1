use crate::error::CheckoutError;
use crate::flow::CheckoutFlow;
use crate::geocode::Geocoder;
use crate::model::{BuyerAddress, FoodListing, GeoPoint, SellerProfile};
use crate::payment::{PaymentGateway, PaymentOutcome};
use crate::resolver::{ListingResolver, Resolution};
use crate::storage::{ListingStorage, OrderStorage};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::config::{PaymentConfig, ServerConfig};
use http::header;
use serde::{Deserialize, Serialize};
use std::{error::Error, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared handles behind the HTTP surface. A fresh [`ListingResolver`] and
/// [`CheckoutFlow`] are built per request; only the external collaborators
/// are process-wide.
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<dyn ListingStorage>,
    pub orders: Arc<dyn OrderStorage>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub geocoder: Arc<dyn Geocoder>,
    pub payment_config: PaymentConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    /// `None` while the listing is absent; the client keeps rendering its
    /// loading/placeholder view.
    pub listing: Option<FoodListing>,
    pub seller: Option<SellerProfile>,
    pub seller_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    pub payment: PaymentOutcome,
}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    lat: f64,
    lng: f64,
}

pub async fn run_checkout_service(
    config: ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(state);

    tracing::info!("Starting checkout service at {}", config.server_address);
    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/listing/{id}", get(get_listing))
        .route("/checkout/{id}", post(place_order))
        .route("/geocode", get(reverse_geocode))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state)
}

async fn get_listing(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let resolver = ListingResolver::new(state.listings.clone());
    match resolver.resolve(&id, None).await {
        Ok(resolution) => {
            let seller_name = resolution.seller_display_name().to_string();
            let (listing, seller) = match resolution {
                Resolution::Resolved { listing, seller } => (Some(listing), seller),
                _ => (None, None),
            };
            Json(ListingView {
                listing,
                seller,
                seller_name,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, listing_id = %id, "Failed to resolve listing");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading listing").into_response()
        }
    }
}

async fn place_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(address): Json<BuyerAddress>,
) -> Response {
    let resolver = ListingResolver::new(state.listings.clone());
    let resolution = match resolver.resolve(&id, None).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(error = %e, listing_id = %id, "Failed to resolve listing");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error placing order").into_response();
        }
    };

    let mut flow = CheckoutFlow::new(
        id,
        state.orders.clone(),
        state.gateway.clone(),
        state.payment_config.clone(),
    );
    flow.attach_resolution(resolution);
    flow.set_address_form(crate::address::AddressForm::from_address(address));

    match flow.submit().await {
        Ok(submission) => Json(CheckoutResponse {
            order_id: submission.order_id,
            payment: submission.payment,
        })
        .into_response(),
        Err(e) => checkout_error_response(e),
    }
}

async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Response {
    let point = GeoPoint {
        lat: query.lat,
        lng: query.lng,
    };
    match state.geocoder.reverse(point).await {
        Ok(place) => Json(place).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Reverse geocoding failed");
            let message = CheckoutError::GeocodeFailed(e).to_string();
            (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
        }
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}

fn checkout_error_response(e: CheckoutError) -> Response {
    let status = if e.is_retryable_input() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    tracing::warn!(error = %e, "Checkout submission rejected");
    (status, e.to_string()).into_response()
}
