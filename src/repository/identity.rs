use uuid::Uuid;

/// Namespace for every identifier this crate derives
const LISTING_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_8b3d_4c5f_9e7a_1d2b_3c4d_5e6f);

/// Fields hashed when a listing arrives without any identifier
#[derive(Debug, Clone, Copy)]
pub struct ContentKey<'a> {
    pub title: &'a str,
    pub area: &'a str,
    pub nearest_station: &'a str,
    pub ward_or_city: &'a str,
    pub layout: &'a str,
    pub rent: i64,
}

/// Stable identifier for a listing.
///
/// A hyphenated UUID upstream id is used as is. Any other non-empty id is hashed
/// as `id:<raw>`. Without an id the listing's own content is hashed, so the
/// same listing maps to the same identifier on every fetch.
pub fn listing_id(raw_id: Option<&str>, content: &ContentKey<'_>) -> Uuid {
    match raw_id.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => hyphenated(raw).unwrap_or_else(|| hashed(&format!("id:{raw}"))),
        None => content_id(content),
    }
}

pub fn content_id(content: &ContentKey<'_>) -> Uuid {
    hashed(&format!(
        "title:{}|area:{}|station:{}|ward:{}|layout:{}|rent:{}",
        content.title,
        content.area,
        content.nearest_station,
        content.ward_or_city,
        content.layout,
        content.rent
    ))
}

/// Only the canonical 8-4-4-4-12 form counts as an upstream UUID
fn hyphenated(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

fn hashed(seed: &str) -> Uuid {
    Uuid::new_v5(&LISTING_NAMESPACE, seed.as_bytes())
}
