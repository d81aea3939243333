pub mod product;
pub mod filter;
pub mod pricing;

pub use product::{AddOn, AddOnId, CatalogError, LessonCatalog, Offering, OfferingId};
pub use filter::LessonFilter;
pub use pricing::{PriceQuote, PricingConfig, PricingEngine};
