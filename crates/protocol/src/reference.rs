//! Reference data for the layer-creation form pickers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One selectable city with its default search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: u32,
    /// Optional default category for the city.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Country name to selectable cities. BTreeMap keeps picker order stable.
pub type CountryCities = BTreeMap<String, Vec<CityInfo>>;

/// Category group name to place category strings.
pub type CategoryGroups = BTreeMap<String, Vec<String>>;

/// Find a city by country and name.
pub fn find_city<'a>(cities: &'a CountryCities, country: &str, city: &str) -> Option<&'a CityInfo> {
    cities.get(country)?.iter().find(|c| c.name == city)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CountryCities {
        let mut cities = CountryCities::new();
        cities.insert(
            "country1".to_string(),
            vec![CityInfo {
                name: "city1".to_string(),
                lat: 37.7937,
                lng: -122.3965,
                radius: 1000,
                category: None,
            }],
        );
        cities
    }

    #[test]
    fn city_decodes_without_category() {
        let json = r#"{"name":"city1","lat":37.7937,"lng":-122.3965,"radius":1000}"#;
        let city: CityInfo = serde_json::from_str(json).expect("decode");
        assert_eq!(city.category, None);
        assert_eq!(city.radius, 1000);
    }

    #[test]
    fn find_city_matches_by_name() {
        let cities = sample();
        assert_eq!(find_city(&cities, "country1", "city1").map(|c| c.radius), Some(1000));
        assert_eq!(find_city(&cities, "country1", "city9"), None);
        assert_eq!(find_city(&cities, "country9", "city1"), None);
    }
}
