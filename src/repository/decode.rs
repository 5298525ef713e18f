use crate::error::NetworkError;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Loosely-typed listing as the API sends it. Every field is optional and
/// several names are accepted for the same concept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub id: Option<Value>,
    pub title: Option<String>,

    pub rent: Option<i64>,
    pub price: Option<i64>,
    #[serde(alias = "monthly_rent")]
    pub monthly_rent: Option<i64>,
    #[serde(alias = "rent_yen")]
    pub rent_yen: Option<i64>,

    pub layout: Option<String>,
    pub area: Option<String>,
    #[serde(alias = "nearest_station")]
    pub nearest_station: Option<String>,

    #[serde(alias = "walk_minutes")]
    pub walk_minutes: Option<i64>,
    #[serde(alias = "walk_min")]
    pub walk_min: Option<i64>,

    #[serde(alias = "image_system_name")]
    pub image_system_name: Option<String>,
    #[serde(alias = "image_name")]
    pub image_name: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(alias = "ward_or_city")]
    pub ward_or_city: Option<String>,
    pub ward: Option<String>,
    pub city: Option<String>,
    pub municipality: Option<String>,
}

impl RawListing {
    /// Upstream identifier as text. Numbers are accepted; other JSON types are ignored.
    pub fn raw_id(&self) -> Option<String> {
        let text = match self.id.as_ref()? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Deserialize)]
struct DataEnvelope {
    data: Vec<RawListing>,
}

#[derive(Deserialize)]
struct PropertiesEnvelope {
    properties: Vec<RawListing>,
}

type ShapeAttempt = fn(&[u8]) -> serde_json::Result<Vec<RawListing>>;

fn bare_array(body: &[u8]) -> serde_json::Result<Vec<RawListing>> {
    serde_json::from_slice(body)
}

fn data_envelope(body: &[u8]) -> serde_json::Result<Vec<RawListing>> {
    serde_json::from_slice::<DataEnvelope>(body).map(|e| e.data)
}

fn properties_envelope(body: &[u8]) -> serde_json::Result<Vec<RawListing>> {
    serde_json::from_slice::<PropertiesEnvelope>(body).map(|e| e.properties)
}

/// Top-level layouts the API is known to use, tried in order
const SHAPES: [(&str, ShapeAttempt); 3] = [
    ("array", bare_array),
    ("data", data_envelope),
    ("properties", properties_envelope),
];

/// Decode a response body using the first top-level shape that parses
pub fn decode_listings(body: &[u8]) -> Result<Vec<RawListing>, NetworkError> {
    let mut failures = Vec::with_capacity(SHAPES.len());

    for (shape, attempt) in SHAPES {
        match attempt(body) {
            Ok(listings) => {
                debug!("Decoded {} raw listings as '{}' shape", listings.len(), shape);
                return Ok(listings);
            }
            Err(e) => failures.push(format!("{shape}: {e}")),
        }
    }

    Err(NetworkError::Decoding(format!(
        "body matched no known shape ({})",
        failures.join("; ")
    )))
}
