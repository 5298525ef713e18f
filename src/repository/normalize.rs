use crate::models::{Property, DEFAULT_IMAGE_GLYPH, PLACEHOLDER};
use crate::repository::decode::RawListing;
use crate::repository::identity::{listing_id, ContentKey};
use tracing::debug;

const DEFAULT_LAYOUT: &str = "1K";

/// Endings that mark an administrative subdivision inside an address
const ADMIN_SUFFIXES: [&str; 9] = ["区", "市", "町", "村", "-ku", "-shi", "-cho", "-machi", "-mura"];

/// Map one raw listing into the domain model. Returns `None` when the title
/// is missing or blank.
pub fn normalize(raw: &RawListing) -> Option<Property> {
    let title = raw.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;

    let rent = raw
        .rent
        .or(raw.price)
        .or(raw.monthly_rent)
        .or(raw.rent_yen)
        .unwrap_or(0)
        .max(0);
    let walk_minutes = raw.walk_minutes.or(raw.walk_min).unwrap_or(0).max(0);

    let image_glyph = raw
        .image_system_name
        .clone()
        .or_else(|| raw.image_name.clone())
        .unwrap_or_else(|| DEFAULT_IMAGE_GLYPH.to_string());

    let layout = non_empty(raw.layout.as_deref()).unwrap_or(DEFAULT_LAYOUT);
    let area = non_empty(raw.area.as_deref()).unwrap_or(PLACEHOLDER);
    let nearest_station = non_empty(raw.nearest_station.as_deref()).unwrap_or(PLACEHOLDER);

    let ward_or_city = [&raw.ward_or_city, &raw.ward, &raw.city, &raw.municipality]
        .into_iter()
        .find_map(|candidate| non_empty(candidate.as_deref()))
        .unwrap_or_else(|| ward_from_area(area));

    let id = listing_id(
        raw.raw_id().as_deref(),
        &ContentKey {
            title,
            area,
            nearest_station,
            ward_or_city,
            layout,
            rent,
        },
    );

    Some(Property {
        id,
        title: title.to_string(),
        rent,
        layout: layout.to_string(),
        area: area.to_string(),
        ward_or_city: ward_or_city.to_string(),
        nearest_station: nearest_station.to_string(),
        walk_minutes,
        image_glyph: Some(image_glyph),
        latitude: raw.latitude,
        longitude: raw.longitude,
    })
}

/// Normalize a batch, silently dropping listings without a usable title
pub fn normalize_all(raws: &[RawListing]) -> Vec<Property> {
    let properties: Vec<Property> = raws.iter().filter_map(normalize).collect();
    let dropped = raws.len() - properties.len();
    if dropped > 0 {
        debug!("Dropped {} listings without a title", dropped);
    }
    properties
}

/// First whitespace-separated token of `area` ending in an administrative
/// suffix, or the whole area when none does
pub fn ward_from_area(area: &str) -> &str {
    area.split_whitespace()
        .find(|token| ADMIN_SUFFIXES.iter().any(|suffix| token.ends_with(suffix)))
        .unwrap_or(area)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::decode::decode_listings;
    use crate::repository::identity::content_id;

    fn raw(json: &str) -> RawListing {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn applies_defaults_and_clamps() {
        let property = normalize(&raw(r#"{"title": "A", "rent": -500, "walkMin": 3}"#)).unwrap();
        assert_eq!(property.title, "A");
        assert_eq!(property.rent, 0);
        assert_eq!(property.walk_minutes, 3);
        assert_eq!(property.layout, "1K");
        assert_eq!(property.area, "—");
        assert_eq!(property.nearest_station, "—");
        assert_eq!(property.ward_or_city, "—");
        assert_eq!(property.image_glyph.as_deref(), Some("house.fill"));
    }

    #[test]
    fn drops_blank_titles() {
        let raws = decode_listings(br#"[{"title": "  "}, {"rent": 1000}, {"title": " B "}]"#).unwrap();
        let properties = normalize_all(&raws);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].title, "B");
    }

    #[test]
    fn rent_aliases_resolve_in_order() {
        let property = normalize(&raw(r#"{"title": "A", "price": 90000, "rentYen": 1}"#)).unwrap();
        assert_eq!(property.rent, 90000);
        let property = normalize(&raw(r#"{"title": "A", "monthlyRent": 70000, "rentYen": 1}"#)).unwrap();
        assert_eq!(property.rent, 70000);
        let property = normalize(&raw(r#"{"title": "A", "walkMinutes": -2, "walkMin": 9}"#)).unwrap();
        assert_eq!(property.walk_minutes, 0);
    }

    #[test]
    fn ward_prefers_explicit_fields() {
        let property = normalize(&raw(
            r#"{"title": "A", "ward": "", "city": "武蔵野市", "area": "東京都 渋谷区 恵比寿"}"#,
        ))
        .unwrap();
        assert_eq!(property.ward_or_city, "武蔵野市");
    }

    #[test]
    fn ward_derived_from_area_tokens() {
        assert_eq!(ward_from_area("東京都 渋谷区 恵比寿"), "渋谷区");
        assert_eq!(ward_from_area("東京都　世田谷区　三軒茶屋"), "世田谷区");
        assert_eq!(ward_from_area("Tokyo Meguro-ku Kamimeguro"), "Meguro-ku");
        assert_eq!(ward_from_area("東京都渋谷区代々木"), "東京都渋谷区代々木");
    }

    #[test]
    fn image_glyph_alias() {
        let property = normalize(&raw(r#"{"title": "A", "imageName": "building.2.fill"}"#)).unwrap();
        assert_eq!(property.image_glyph.as_deref(), Some("building.2.fill"));
    }

    #[test]
    fn identity_is_stable_without_id() {
        let json = r#"{"title": "A", "rent": 120000, "area": "東京都 目黒区", "layout": "1DK"}"#;
        let first = normalize(&raw(json)).unwrap();
        let second = normalize(&raw(json)).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            first.id,
            content_id(&ContentKey {
                title: "A",
                area: "東京都 目黒区",
                nearest_station: "—",
                ward_or_city: "目黒区",
                layout: "1DK",
                rent: 120000,
            })
        );
    }

    #[test]
    fn uuid_id_passes_through() {
        let property = normalize(&raw(
            r#"{"id": "3F2504E0-4F89-11D3-9A0C-0305E82C3301", "title": "A"}"#,
        ))
        .unwrap();
        assert_eq!(
            property.id.to_string(),
            "3f2504e0-4f89-11d3-9a0c-0305e82c3301"
        );
    }

    #[test]
    fn coordinates_pass_through() {
        let property =
            normalize(&raw(r#"{"title": "A", "latitude": 35.68, "longitude": 139.7}"#)).unwrap();
        assert_eq!(property.coordinate(), Some((35.68, 139.7)));
    }
}
