use chrono::NaiveDate;
use drivebook_shared::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::filter::LessonFilter;

pub type OfferingId = u32;
pub type AddOnId = u32;

/// One bookable lesson slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offering {
    pub id: OfferingId,
    pub date: NaiveDate,
    /// Display string, e.g. `9:00 AM - 10:00 AM`
    pub time: String,
    pub location: String,
    pub vehicle_type: String,
    pub instructor: String,
    pub price: Money,
}

/// Optional extra service bought alongside lessons
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: String,
    pub price: Money,
    pub description: String,
}

/// Read-only lesson and add-on catalog shared by every step of the flow
#[derive(Debug, Clone, Default, Serialize)]
pub struct LessonCatalog {
    offerings: Vec<Offering>,
    add_ons: Vec<AddOn>,
}

impl LessonCatalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(offerings: Vec<Offering>, add_ons: Vec<AddOn>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for offering in &offerings {
            if !seen.insert(offering.id) {
                return Err(CatalogError::DuplicateOffering(offering.id));
            }
        }

        let mut seen = HashSet::new();
        for add_on in &add_ons {
            if !seen.insert(add_on.id) {
                return Err(CatalogError::DuplicateAddOn(add_on.id));
            }
        }

        Ok(Self { offerings, add_ons })
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    pub fn offering(&self, id: OfferingId) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    pub fn add_on(&self, id: AddOnId) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }

    /// Offerings matching the filter, in catalog order
    pub fn search(&self, filter: &LessonFilter) -> Vec<&Offering> {
        let results = filter.apply(&self.offerings);
        tracing::debug!(
            matched = results.len(),
            total = self.offerings.len(),
            "Filtered lesson catalog"
        );
        results
    }

    /// Pick one offering out of the current filtered results.
    ///
    /// Ids that exist in the catalog but were filtered out are not selectable.
    pub fn select(&self, filter: &LessonFilter, id: OfferingId) -> Result<&Offering, CatalogError> {
        self.offerings
            .iter()
            .find(|o| o.id == id && filter.matches(o))
            .ok_or(CatalogError::OfferingNotFound(id))
    }

    /// Distinct locations in first-seen order
    pub fn locations(&self) -> Vec<&str> {
        distinct(self.offerings.iter().map(|o| o.location.as_str()))
    }

    /// Distinct vehicle types in first-seen order
    pub fn vehicle_types(&self) -> Vec<&str> {
        distinct(self.offerings.iter().map(|o| o.vehicle_type.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Lesson not found: {0}")]
    OfferingNotFound(OfferingId),

    #[error("Add-on not found: {0}")]
    AddOnNotFound(AddOnId),

    #[error("Duplicate lesson id in catalog: {0}")]
    DuplicateOffering(OfferingId),

    #[error("Duplicate add-on id in catalog: {0}")]
    DuplicateAddOn(AddOnId),
}
