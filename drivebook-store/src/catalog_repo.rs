use async_trait::async_trait;
use chrono::NaiveDate;
use drivebook_catalog::{AddOn, LessonCatalog, Offering};
use drivebook_shared::Money;

type SourceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Where lesson offerings and add-ons come from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn offerings(&self) -> SourceResult<Vec<Offering>>;

    async fn add_ons(&self) -> SourceResult<Vec<AddOn>>;

    /// Fetch both lists and index them
    async fn load(&self) -> SourceResult<LessonCatalog> {
        let offerings = self.offerings().await?;
        let add_ons = self.add_ons().await?;
        tracing::info!(
            offerings = offerings.len(),
            add_ons = add_ons.len(),
            "Loaded lesson catalog"
        );
        Ok(LessonCatalog::new(offerings, add_ons)?)
    }
}

/// The fixed lesson schedule served when no other source is configured
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }
}

fn lesson(
    id: u32,
    (year, month, day): (i32, u32, u32),
    time: &str,
    location: &str,
    vehicle_type: &str,
    instructor: &str,
    price: i64,
) -> SourceResult<Offering> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("invalid date for lesson {}", id))?;
    Ok(Offering {
        id,
        date,
        time: time.to_string(),
        location: location.to_string(),
        vehicle_type: vehicle_type.to_string(),
        instructor: instructor.to_string(),
        price: Money::from_whole(price),
    })
}

fn add_on(id: u32, name: &str, price: i64, description: &str) -> AddOn {
    AddOn {
        id,
        name: name.to_string(),
        price: Money::from_whole(price),
        description: description.to_string(),
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn offerings(&self) -> SourceResult<Vec<Offering>> {
        Ok(vec![
            lesson(1, (2025, 5, 12), "9:00 AM - 10:00 AM", "Sydney CBD", "Car", "John Smith", 60)?,
            lesson(2, (2025, 5, 12), "11:00 AM - 12:00 PM", "Bondi", "Car", "Sarah Johnson", 60)?,
            lesson(3, (2025, 5, 12), "2:00 PM - 3:00 PM", "Parramatta", "Motorcycle", "Michael Chen", 65)?,
            lesson(4, (2025, 5, 13), "10:00 AM - 11:00 AM", "Sydney CBD", "Light Truck", "Emma Wilson", 75)?,
            lesson(5, (2025, 5, 13), "3:00 PM - 4:00 PM", "Bondi", "Car", "David Brown", 60)?,
            lesson(6, (2025, 5, 14), "9:00 AM - 10:00 AM", "Parramatta", "Car", "John Smith", 60)?,
        ])
    }

    async fn add_ons(&self) -> SourceResult<Vec<AddOn>> {
        Ok(vec![
            add_on(1, "Test Preparation Session", 45, "Extra 1-hour session focused on test preparation"),
            add_on(2, "Highway Driving Practice", 35, "Specialized practice for highway driving"),
            add_on(3, "Parking Skills Training", 30, "Focus on parallel and reverse parking techniques"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivebook_catalog::LessonFilter;

    #[tokio::test]
    async fn test_static_catalog_loads() {
        let catalog = StaticCatalog::new().load().await.unwrap();
        assert_eq!(catalog.offerings().len(), 6);
        assert_eq!(catalog.add_ons().len(), 3);
        assert_eq!(catalog.locations(), vec!["Sydney CBD", "Bondi", "Parramatta"]);
        assert_eq!(catalog.vehicle_types(), vec!["Car", "Motorcycle", "Light Truck"]);
    }

    #[tokio::test]
    async fn test_static_catalog_filtering() {
        let catalog = StaticCatalog::new().load().await.unwrap();

        let filter = LessonFilter {
            date: NaiveDate::from_ymd_opt(2025, 5, 12),
            location: Some("Bondi".to_string()),
            vehicle_type: None,
        };
        let ids: Vec<_> = catalog.search(&filter).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2]);

        let trucks = LessonFilter {
            vehicle_type: Some("Light Truck".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.search(&trucks)[0].price, Money::from_whole(75));
    }

    struct DuplicateSource;

    #[async_trait]
    impl CatalogSource for DuplicateSource {
        async fn offerings(&self) -> SourceResult<Vec<Offering>> {
            let first = StaticCatalog.offerings().await?.remove(0);
            Ok(vec![first.clone(), first])
        }

        async fn add_ons(&self) -> SourceResult<Vec<AddOn>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail_to_load() {
        assert!(DuplicateSource.load().await.is_err());
    }
}
