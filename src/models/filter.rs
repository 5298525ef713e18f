use crate::models::Property;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordering applied to filtered listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    RentAsc,
    RentDesc,
    WalkAsc,
    WalkDesc,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::RentAsc => "家賃 ↑",
            SortOrder::RentDesc => "家賃 ↓",
            SortOrder::WalkAsc => "徒歩 ↑",
            SortOrder::WalkDesc => "徒歩 ↓",
        }
    }
}

/// Search parameters applied to an already-loaded listing set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Free text matched against title, area and nearest station
    pub query: String,
    /// Maximum monthly rent (inclusive)
    pub max_rent: Option<i64>,
    /// Maximum walk from the station in minutes (inclusive)
    pub max_walk_minutes: Option<i64>,
    /// Accepted `ward_or_city` values; empty means no restriction
    pub selected_areas: BTreeSet<String>,
    pub sort: SortOrder,
}

impl PropertyFilter {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, property: &Property) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let haystack = format!(
                "{} {} {}",
                property.title, property.area, property.nearest_station
            )
            .to_lowercase();
            if !haystack.contains(&query) {
                return false;
            }
        }

        if self.max_rent.is_some_and(|max| property.rent > max) {
            return false;
        }
        if self
            .max_walk_minutes
            .is_some_and(|max| property.walk_minutes > max)
        {
            return false;
        }

        self.selected_areas.is_empty() || self.selected_areas.contains(&property.ward_or_city)
    }

    /// Filter and sort. Listings comparing equal keep their incoming order.
    pub fn apply(&self, properties: &[Property]) -> Vec<Property> {
        let mut result: Vec<Property> = properties
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::RentAsc => result.sort_by_key(|p| p.rent),
            SortOrder::RentDesc => result.sort_by(|a, b| b.rent.cmp(&a.rent)),
            SortOrder::WalkAsc => result.sort_by_key(|p| p.walk_minutes),
            SortOrder::WalkDesc => result.sort_by(|a, b| b.walk_minutes.cmp(&a.walk_minutes)),
        }

        result
    }
}

/// Distinct `ward_or_city` facets, sorted
pub fn available_areas(properties: &[Property]) -> Vec<String> {
    properties
        .iter()
        .map(|p| p.ward_or_city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
