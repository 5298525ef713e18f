use crate::models::Property;
use serde::Serialize;
use uuid::Uuid;

const CSV_HEADER: &str =
    "id,title,rentJPY,layout,wardOrCity,area,nearestStation,walkMinutes,latitude,longitude";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRecord<'a> {
    id: Uuid,
    title: &'a str,
    #[serde(rename = "rentJPY")]
    rent_jpy: i64,
    layout: &'a str,
    ward_or_city: &'a str,
    area: &'a str,
    nearest_station: &'a str,
    walk_minutes: i64,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl<'a> From<&'a Property> for ExportRecord<'a> {
    fn from(p: &'a Property) -> Self {
        Self {
            id: p.id,
            title: &p.title,
            rent_jpy: p.rent,
            layout: &p.layout,
            ward_or_city: &p.ward_or_city,
            area: &p.area,
            nearest_station: &p.nearest_station,
            walk_minutes: p.walk_minutes,
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Listings as CSV, one row per listing after the header
pub fn to_csv(properties: &[Property]) -> String {
    let mut lines = Vec::with_capacity(properties.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for p in properties {
        let coordinate = |v: Option<f64>| quoted(&v.map(|x| x.to_string()).unwrap_or_default());
        lines.push(
            [
                quoted(&p.id.to_string()),
                quoted(&p.title),
                p.rent.to_string(),
                quoted(&p.layout),
                quoted(&p.ward_or_city),
                quoted(&p.area),
                quoted(&p.nearest_station),
                p.walk_minutes.to_string(),
                coordinate(p.latitude),
                coordinate(p.longitude),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Pretty-printed JSON array using the CSV column names, keys sorted
pub fn to_json(properties: &[Property]) -> serde_json::Result<String> {
    let records: Vec<ExportRecord<'_>> = properties.iter().map(ExportRecord::from).collect();
    // `Value` objects are BTreeMap-backed, which orders the keys
    let value = serde_json::to_value(&records)?;
    serde_json::to_string_pretty(&value)
}
