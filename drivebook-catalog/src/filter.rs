use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::product::Offering;

/// Optional (date, location, vehicle type) filter over the lesson catalog.
///
/// Each populated field must match exactly; empty fields match everything.
/// Blank strings (as sent by an unselected `<select>`) count as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub vehicle_type: Option<String>,
}

impl LessonFilter {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.location.is_none() && self.vehicle_type.is_none()
    }

    pub fn matches(&self, offering: &Offering) -> bool {
        let date_match = self.date.map_or(true, |d| offering.date == d);
        let location_match = self
            .location
            .as_deref()
            .map_or(true, |l| offering.location == l);
        let vehicle_match = self
            .vehicle_type
            .as_deref()
            .map_or(true, |v| offering.vehicle_type == v);

        date_match && location_match && vehicle_match
    }

    /// Matching offerings, preserving input order
    pub fn apply<'a>(&self, offerings: &'a [Offering]) -> Vec<&'a Offering> {
        offerings.iter().filter(|o| self.matches(o)).collect()
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::fixtures::catalog;
    use proptest::prelude::*;

    fn ids(results: &[&Offering]) -> Vec<u32> {
        results.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_no_filter_returns_full_catalog() {
        let catalog = catalog();
        let filter = LessonFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(catalog.offerings())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_fields_combine() {
        let catalog = catalog();
        let filter = LessonFilter {
            date: Some(NaiveDate::from_ymd_opt(2025, 5, 12).unwrap()),
            location: None,
            vehicle_type: Some("Car".to_string()),
        };
        assert_eq!(ids(&filter.apply(catalog.offerings())), vec![1, 2]);

        let filter = LessonFilter {
            location: Some("Sydney CBD".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(catalog.offerings())), vec![1, 4]);
    }

    #[test]
    fn test_exact_match_only() {
        let catalog = catalog();
        let filter = LessonFilter {
            location: Some("sydney".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(catalog.offerings()).is_empty());
    }

    #[test]
    fn test_empty_result_is_valid() {
        let catalog = catalog();
        let filter = LessonFilter {
            date: Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
            ..Default::default()
        };
        assert_eq!(filter.apply(catalog.offerings()).len(), 0);
    }

    #[test]
    fn test_blank_query_fields_deserialize_as_none() {
        let json = r#"{ "date": "", "location": "  ", "vehicle_type": "Motorcycle" }"#;
        let filter: LessonFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.date, None);
        assert_eq!(filter.location, None);
        assert_eq!(filter.vehicle_type.as_deref(), Some("Motorcycle"));

        let filter: LessonFilter = serde_json::from_str(r#"{ "date": "2025-05-13" }"#).unwrap();
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2025, 5, 13));

        assert!(serde_json::from_str::<LessonFilter>(r#"{ "date": "13/05/2025" }"#).is_err());
    }

    fn filter_strategy() -> impl Strategy<Value = LessonFilter> {
        let dates = prop::option::of(prop::sample::select(vec!["2025-05-12", "2025-05-13", "2025-05-14"]));
        let locations = prop::option::of(prop::sample::select(vec!["Sydney CBD", "Bondi", "Parramatta"]));
        let vehicles = prop::option::of(prop::sample::select(vec!["Car", "Motorcycle", "Light Truck"]));
        (dates, locations, vehicles).prop_map(|(d, l, v)| LessonFilter {
            date: d.map(|d| d.parse().unwrap()),
            location: l.map(str::to_string),
            vehicle_type: v.map(str::to_string),
        })
    }

    proptest! {
        #[test]
        fn prop_filter_is_sound_and_complete(filter in filter_strategy()) {
            let catalog = catalog();
            let results = filter.apply(catalog.offerings());

            for offering in &results {
                if let Some(d) = filter.date { prop_assert_eq!(offering.date, d); }
                if let Some(l) = &filter.location { prop_assert_eq!(&offering.location, l); }
                if let Some(v) = &filter.vehicle_type { prop_assert_eq!(&offering.vehicle_type, v); }
            }

            let expected: Vec<u32> = catalog
                .offerings()
                .iter()
                .filter(|o| filter.date.map_or(true, |d| o.date == d)
                    && filter.location.as_ref().map_or(true, |l| &o.location == l)
                    && filter.vehicle_type.as_ref().map_or(true, |v| &o.vehicle_type == v))
                .map(|o| o.id)
                .collect();
            prop_assert_eq!(ids(&results), expected);
        }
    }
}
