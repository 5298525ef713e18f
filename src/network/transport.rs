use crate::error::NetworkError;
use crate::network::ApiRequest;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends a request and hands back the raw response.
/// Swappable so repositories can be exercised without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, NetworkError>;
}

/// [`Transport`] backed by a shared `reqwest` client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, NetworkError> {
        let client = Client::builder()
            .user_agent(concat!("rental-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetworkError::transport)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, NetworkError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(NetworkError::transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(NetworkError::transport)?;

        debug!("Received {} bytes with status {}", body.len(), status);

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
