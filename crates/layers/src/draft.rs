use std::fmt;

use protocol::{find_city, CountryCities, PlaceQuery};
use serde::{Deserialize, Serialize};

/// First-stage form data for a new layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDraft {
    pub country: String,
    pub city: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Required fields are empty; listed by name.
    MissingFields(Vec<&'static str>),
    /// The selected city is not in the reference data.
    UnknownCity { country: String, city: String },
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::MissingFields(fields) => {
                write!(f, "required fields missing: {}", fields.join(", "))
            }
            DraftError::UnknownCity { country, city } => {
                write!(f, "unknown city: {city} ({country})")
            }
        }
    }
}

impl std::error::Error for DraftError {}

impl LayerDraft {
    pub fn new(
        country: impl Into<String>,
        city: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
            category: category.into(),
        }
    }

    /// All three fields are required.
    pub fn validate(&self) -> Result<(), DraftError> {
        let mut missing = Vec::new();
        if self.country.trim().is_empty() {
            missing.push("country");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.category.trim().is_empty() {
            missing.push("category");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DraftError::MissingFields(missing))
        }
    }

    /// Resolve the draft against the reference data into a phase-one
    /// query. Validation failures never turn into network calls.
    pub fn to_query(&self, cities: &CountryCities) -> Result<PlaceQuery, DraftError> {
        self.validate()?;
        let city = find_city(cities, &self.country, &self.city).ok_or_else(|| {
            DraftError::UnknownCity {
                country: self.country.clone(),
                city: self.city.clone(),
            }
        })?;
        Ok(PlaceQuery {
            lat: city.lat,
            lng: city.lng,
            radius: city.radius,
            category: self.category.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use protocol::CityInfo;

    fn cities() -> CountryCities {
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
    fn each_missing_field_is_named() {
        let err = LayerDraft::default().validate().expect_err("empty draft");
        assert_eq!(
            err,
            DraftError::MissingFields(vec!["country", "city", "category"])
        );

        let err = LayerDraft::new("country1", "", "cafe")
            .validate()
            .expect_err("missing city");
        assert_eq!(err, DraftError::MissingFields(vec!["city"]));
    }

    #[test]
    fn valid_draft_resolves_city_coordinates() {
        let draft = LayerDraft::new("country1", "city1", "convenience_store");
        let query = draft.to_query(&cities()).expect("query");
        assert_eq!(query.lat, 37.7937);
        assert_eq!(query.lng, -122.3965);
        assert_eq!(query.radius, 1000);
        assert_eq!(query.category, "convenience_store");
    }

    #[test]
    fn unknown_city_is_rejected() {
        let draft = LayerDraft::new("country1", "atlantis", "cafe");
        assert_eq!(
            draft.to_query(&cities()),
            Err(DraftError::UnknownCity {
                country: "country1".to_string(),
                city: "atlantis".to_string(),
            })
        );
    }
}
