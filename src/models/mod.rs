pub mod filter;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub use filter::{PropertyFilter, SortOrder};

/// Glyph shown for listings that do not name one
pub const DEFAULT_IMAGE_GLYPH: &str = "house.fill";

/// Placeholder for address-like fields the source left blank
pub const PLACEHOLDER: &str = "—";

/// Core rental listing data model
///
/// Serialized field names match the bundled dataset (`wardOrCity`,
/// `walkMinutes`, `imageSystemName`, ...). A bundled record without an `id`
/// deserializes with the nil UUID; the local loader replaces it with the
/// content-addressed identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, deserialize_with = "nil_if_absent")]
    pub id: Uuid,
    pub title: String,
    pub rent: i64,
    pub layout: String,
    pub area: String,
    pub ward_or_city: String,
    pub nearest_station: String,
    pub walk_minutes: i64,
    #[serde(rename = "imageSystemName", default)]
    pub image_glyph: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Property {
    /// Both coordinates, when the listing carries a complete pair
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// `null` ids read the same as a missing key
fn nil_if_absent<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Uuid>::deserialize(deserializer)?.unwrap_or_else(Uuid::nil))
}
