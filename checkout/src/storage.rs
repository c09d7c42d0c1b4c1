use crate::model::{FoodListing, Order, SellerProfile};
use async_trait::async_trait;
use common::config::CommonConfig;
use serde::{de::DeserializeOwned, Deserialize};
use std::error::Error;
use strum_macros::Display;
use tracing::{debug, info};
use url::Url;

/// Collections of the hosted document store touched by the checkout flow.
/// The store enforces no schema beyond what this flow reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Collection {
    #[strum(to_string = "foods")]
    Foods,
    #[strum(to_string = "users")]
    Users,
    #[strum(to_string = "orders")]
    Orders,
}

/// Read-only point lookups backing the listing resolver.
#[async_trait]
pub trait ListingStorage: Send + Sync {
    /// Point read of a food listing. `Ok(None)` means the record is absent,
    /// which is not an error for the consuming flow.
    async fn get_listing(
        &self,
        id: &str,
    ) -> Result<Option<FoodListing>, Box<dyn Error + Send + Sync>>;

    /// Point read of the seller profile owning a listing.
    async fn get_seller(
        &self,
        user_id: &str,
    ) -> Result<Option<SellerProfile>, Box<dyn Error + Send + Sync>>;
}

/// Write side of the order collection.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Append an order record and return the identifier assigned by the
    /// store. Pure append: no uniqueness check and no idempotency key, so
    /// repeated calls create duplicate records.
    async fn add_order(&self, order: &Order) -> Result<String, Box<dyn Error + Send + Sync>>;
}

#[derive(Deserialize)]
struct CreatedDocument {
    id: String,
}

/// REST client for the hosted document store.
///
/// Point reads are `GET {base}/{collection}/{id}` (404 maps to absence) and
/// appends are `POST {base}/{collection}` returning the generated id.
pub struct RestDocumentStore {
    client: reqwest::Client,
    base: Url,
}

impl RestDocumentStore {
    pub fn new(config: &CommonConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let base = Url::parse(&config.store_base_url)?;
        info!("Connecting document store client to {}", base);
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base.as_str().trim_end_matches('/'),
            collection,
            id
        )
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), collection)
    }

    async fn get_document<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>, Box<dyn Error + Send + Sync>> {
        debug!("Point read from {} for id: {}", collection, id);
        let response = self.client.get(self.document_url(collection, id)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("No {} document for id: {}", collection, id);
            return Ok(None);
        }

        let document = response.error_for_status()?.json::<T>().await?;
        Ok(Some(document))
    }
}

#[async_trait]
impl ListingStorage for RestDocumentStore {
    async fn get_listing(
        &self,
        id: &str,
    ) -> Result<Option<FoodListing>, Box<dyn Error + Send + Sync>> {
        self.get_document(Collection::Foods, id).await
    }

    async fn get_seller(
        &self,
        user_id: &str,
    ) -> Result<Option<SellerProfile>, Box<dyn Error + Send + Sync>> {
        self.get_document(Collection::Users, user_id).await
    }
}

#[async_trait]
impl OrderStorage for RestDocumentStore {
    async fn add_order(&self, order: &Order) -> Result<String, Box<dyn Error + Send + Sync>> {
        info!("Appending order for food: {}", order.food_id);
        let created: CreatedDocument = self
            .client
            .post(self.collection_url(Collection::Orders))
            .json(order)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Successfully appended order {}", created.id);
        Ok(created.id)
    }
}
