use crate::error::LoadError;
use crate::models::Property;
use crate::repository::identity::{content_id, ContentKey};
use crate::repository::traits::PropertyRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads the bundled dataset shipped next to the binary
pub struct LocalPropertyRepository {
    dir: PathBuf,
    name: String,
}

impl LocalPropertyRepository {
    /// `name` is the resource name without the `.json` extension
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.name))
    }
}

impl Default for LocalPropertyRepository {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_RESOURCE_DIR,
            crate::config::DEFAULT_FALLBACK_RESOURCE,
        )
    }
}

#[async_trait]
impl PropertyRepository for LocalPropertyRepository {
    async fn fetch_properties(&self) -> Result<Vec<Property>> {
        let path = self.path();
        debug!("Loading bundled listings from {}", path.display());

        let properties = load_bundle(&path).await?;
        info!("Loaded {} bundled listings", properties.len());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "Bundled"
    }
}

async fn load_bundle(path: &Path) -> Result<Vec<Property>, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut properties: Vec<Property> =
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    for property in &mut properties {
        property.rent = property.rent.max(0);
        property.walk_minutes = property.walk_minutes.max(0);
        if property.id.is_nil() {
            property.id = content_id(&ContentKey {
                title: &property.title,
                area: &property.area,
                nearest_station: &property.nearest_station,
                ward_or_city: &property.ward_or_city,
                layout: &property.layout,
                rent: property.rent,
            });
        }
    }

    Ok(properties)
}
