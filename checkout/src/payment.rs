use async_trait::async_trait;
use common::config::PaymentConfig;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

/// Configuration object handed to the externally provided payment widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub key: String,
    /// Amount in minor currency units (listing price x 100).
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub prefill_name: String,
}

/// What the flow observes of the payment step. Completion is never verified
/// server-side; at best a client-side acknowledgment comes back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
pub enum PaymentOutcome {
    /// The widget was presented; its outcome is visible only to the buyer's
    /// client.
    Presented { session: PaymentSession },
    /// Client-side acknowledgment from the widget's completion callback.
    Acknowledged { payment_id: String },
}

/// Hands a payment session to the external widget.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn open(
        &self,
        session: PaymentSession,
    ) -> Result<PaymentOutcome, Box<dyn Error + Send + Sync>>;
}

/// Fetches the externally hosted checkout script.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    async fn fetch(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}

pub struct HttpScriptSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpScriptSource {
    pub fn new(script_url: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            client: reqwest::Client::new(),
            url: Url::parse(script_url)?,
        })
    }
}

#[async_trait]
impl ScriptSource for HttpScriptSource {
    async fn fetch(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        debug!("Fetching checkout script from {}", self.url);
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

/// The externally loaded checkout script, a process-lifetime shared
/// resource.
///
/// Initialization is single-flight: concurrent first callers block on one
/// load, so rapid successive submissions cannot inject the script twice.
/// There is no teardown; a loaded script lives as long as the process.
#[derive(Default)]
pub struct CheckoutScript {
    cell: OnceCell<String>,
}

static SHARED_SCRIPT: Lazy<Arc<CheckoutScript>> = Lazy::new(|| Arc::new(CheckoutScript::new()));

impl CheckoutScript {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The process-wide instance.
    pub fn shared() -> Arc<CheckoutScript> {
        Arc::clone(&SHARED_SCRIPT)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Load the script through `source` on first use; later calls return
    /// the cached copy without touching the source again.
    pub async fn ensure_loaded(
        &self,
        source: &dyn ScriptSource,
    ) -> Result<&str, Box<dyn Error + Send + Sync>> {
        let script = self
            .cell
            .get_or_try_init(|| async {
                info!("Loading checkout script");
                source.fetch().await
            })
            .await?;
        Ok(script.as_str())
    }
}

/// Production gateway: ensures the shared checkout script is loaded, then
/// presents the widget session to the buyer's client.
pub struct ScriptedGateway {
    source: Arc<dyn ScriptSource>,
    script: Arc<CheckoutScript>,
    config: PaymentConfig,
}

impl ScriptedGateway {
    pub fn new(config: PaymentConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let source = Arc::new(HttpScriptSource::new(&config.script_url)?);
        Ok(Self::with_script(source, CheckoutScript::shared(), config))
    }

    pub fn with_script(
        source: Arc<dyn ScriptSource>,
        script: Arc<CheckoutScript>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            source,
            script,
            config,
        }
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn open(
        &self,
        session: PaymentSession,
    ) -> Result<PaymentOutcome, Box<dyn Error + Send + Sync>> {
        self.script.ensure_loaded(self.source.as_ref()).await?;
        info!(
            "Presenting payment widget for {} ({} {} minor units)",
            session.description, session.amount, session.currency
        );
        Ok(PaymentOutcome::Presented { session })
    }
}
