use std::error::Error;
use std::sync::Arc;

use checkout::executable_utils::{initialize_executable, initialize_tracing};
use checkout::geocode::ReverseGeocodeClient;
use checkout::payment::ScriptedGateway;
use checkout::service::{run_checkout_service, AppState};
use checkout::storage::RestDocumentStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting checkout service...");
    let config = initialize_executable()?;
    initialize_tracing(&config.server.log_level);

    let store = Arc::new(RestDocumentStore::new(&config.common)?);
    let gateway = Arc::new(ScriptedGateway::new(config.payment.clone())?);
    let geocoder = Arc::new(ReverseGeocodeClient::new(&config.geocoder)?);

    let state = AppState {
        listings: store.clone(),
        orders: store,
        gateway,
        geocoder,
        payment_config: config.payment.clone(),
    };

    run_checkout_service(config.server, state).await
}
