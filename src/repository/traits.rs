use crate::models::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for every listing source.
/// Remote and bundled sources are interchangeable behind it, so the list
/// controller can be pointed at either one.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Fetch the complete current listing set
    async fn fetch_properties(&self) -> Result<Vec<Property>>;

    /// Get the name of the source, used in logs
    fn source_name(&self) -> &'static str;
}
