use crate::config::AppConfig;
use crate::error::NetworkError;
use crate::models::Property;
use crate::network::{Endpoint, ReqwestTransport, Transport};
use crate::repository::decode::decode_listings;
use crate::repository::normalize::normalize_all;
use crate::repository::traits::PropertyRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const PROPERTIES_PATH: &str = "properties";

/// API-first repository. Any failure on the remote path is retried against
/// the fallback source when one is configured.
pub struct RemotePropertyRepository {
    base_url: String,
    transport: Arc<dyn Transport>,
    fallback: Option<Arc<dyn PropertyRepository>>,
    timeout: Duration,
}

impl RemotePropertyRepository {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            fallback: None,
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build against the real HTTP client using application settings
    pub fn from_config(
        config: &AppConfig,
        fallback: Option<Arc<dyn PropertyRepository>>,
    ) -> Result<Self, NetworkError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let repo = Self::new(config.base_url.clone(), transport).with_timeout(config.api_timeout);
        Ok(match fallback {
            Some(fallback) => repo.with_fallback(fallback),
            None => repo,
        })
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn PropertyRepository>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request, validate, decode and normalize without any fallback
    pub async fn fetch_remote(&self) -> Result<Vec<Property>, NetworkError> {
        let request = Endpoint::get(PROPERTIES_PATH)
            .header("Accept", "application/json")
            .to_request(&self.base_url)?
            .with_timeout(self.timeout);

        debug!("Fetching listings from {}", request.url);

        let response = self.transport.send(&request).await?;

        if !(100..600).contains(&response.status) {
            return Err(NetworkError::InvalidResponse);
        }
        if !(200..300).contains(&response.status) {
            warn!("Listings API returned status: {}", response.status);
            return Err(NetworkError::HttpStatus(response.status));
        }

        let raws = decode_listings(&response.body)?;
        let properties = normalize_all(&raws);

        // A non-empty payload that maps to nothing is a schema mismatch, not an empty page
        if !raws.is_empty() && properties.is_empty() {
            return Err(NetworkError::Decoding(format!(
                "none of {} listings could be mapped",
                raws.len()
            )));
        }

        Ok(properties)
    }
}

#[async_trait]
impl PropertyRepository for RemotePropertyRepository {
    async fn fetch_properties(&self) -> Result<Vec<Property>> {
        let err = match self.fetch_remote().await {
            Ok(properties) => {
                info!("Fetched {} listings from the API", properties.len());
                return Ok(properties);
            }
            Err(err) => err,
        };

        let Some(fallback) = &self.fallback else {
            warn!("Listings API failed and no fallback is configured: {}", err);
            return Err(err.into());
        };

        warn!(
            "Listings API failed ({}), using {} source",
            err,
            fallback.source_name()
        );
        match fallback.fetch_properties().await {
            Ok(properties) => Ok(properties),
            Err(fallback_err) => {
                warn!("Fallback source failed as well: {:#}", fallback_err);
                Err(err.into())
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "API"
    }
}
