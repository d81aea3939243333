use drivebook_shared::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::AddOn;

/// Multi-lesson discount configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// Minimum lesson count (inclusive) that earns the discount
    pub discount_threshold: u32,

    /// Percentage taken off the combined subtotal
    pub discount_percent: u32,

    /// Symbol used when freezing display prices
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            discount_threshold: 5,
            discount_percent: 20,
            currency_symbol: "$".to_string(),
        }
    }
}

/// Fully derived price breakdown for one booking.
///
/// All amounts are unrounded; round only when rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
    pub unit_price: Money,
    pub quantity: u32,
    pub add_on_total: Money,
    pub subtotal: Money,
    pub discount_applied: bool,
    pub discount_amount: Money,
    pub total: Money,
}

/// Quantity, add-on and discount pricing
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn qualifies_for_discount(&self, quantity: u32) -> bool {
        quantity >= self.config.discount_threshold
    }

    /// Fraction of the subtotal that is charged once discounted (0.8 for 20%)
    pub fn discount_factor(&self) -> Decimal {
        let percent = self.config.discount_percent.min(100);
        Decimal::from(100 - percent) / Decimal::from(100)
    }

    /// Price `quantity` lessons at `unit_price` plus the given add-ons.
    ///
    /// The discount covers add-ons too: it is applied to
    /// `unit_price * quantity + add_on_total` as a single amount.
    pub fn quote<'a, I>(&self, unit_price: Money, quantity: u32, add_ons: I) -> PriceQuote
    where
        I: IntoIterator<Item = &'a AddOn>,
    {
        let add_on_total: Money = add_ons.into_iter().map(|a| a.price).sum();
        let subtotal = unit_price.times(quantity) + add_on_total;
        let discount_applied = self.qualifies_for_discount(quantity);

        let total = if discount_applied {
            subtotal.scale(self.discount_factor())
        } else {
            subtotal
        };

        PriceQuote {
            unit_price,
            quantity,
            add_on_total,
            subtotal,
            discount_applied,
            discount_amount: subtotal - total,
            total,
        }
    }

    /// Render an amount the way it is frozen into a finalized booking
    pub fn format(&self, amount: Money) -> String {
        amount.format_with(&self.config.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::fixtures::add_on;
    use proptest::prelude::*;

    fn engine() -> PricingEngine {
        PricingEngine::new(PricingConfig::default())
    }

    fn none() -> Vec<&'static AddOn> {
        Vec::new()
    }

    #[test]
    fn test_single_lesson_no_add_ons() {
        let quote = engine().quote(Money::from_whole(60), 1, none());
        assert_eq!(quote.subtotal, Money::from_whole(60));
        assert!(!quote.discount_applied);
        assert_eq!(quote.discount_amount, Money::ZERO);
        assert_eq!(quote.total, Money::from_whole(60));
    }

    #[test]
    fn test_discount_threshold_is_inclusive() {
        let quote = engine().quote(Money::from_whole(60), 5, none());
        assert_eq!(quote.subtotal, Money::from_whole(300));
        assert!(quote.discount_applied);
        assert_eq!(quote.total, Money::from_whole(240));

        let quote = engine().quote(Money::from_whole(60), 4, none());
        assert!(!quote.discount_applied);
        assert_eq!(quote.total, Money::from_whole(240));
    }

    #[test]
    fn test_discount_covers_add_ons() {
        let prep = add_on(1, "Test Preparation Session", 45);
        let quote = engine().quote(Money::from_whole(60), 5, [&prep]);

        assert_eq!(quote.add_on_total, Money::from_whole(45));
        assert_eq!(quote.subtotal, Money::from_whole(345));
        assert_eq!(quote.total, Money::from_whole(276));
        assert_eq!(quote.discount_amount, Money::from_whole(69));
    }

    #[test]
    fn test_ratio_across_threshold() {
        let engine = engine();
        let four = engine.quote(Money::from_whole(60), 4, none()).total.amount();
        let five = engine.quote(Money::from_whole(60), 5, none()).total.amount();
        let expected = Decimal::from(5) / Decimal::from(4) * Decimal::new(8, 1);
        assert_eq!(five / four, expected);
    }

    #[test]
    fn test_configured_discount() {
        let engine = PricingEngine::new(PricingConfig {
            discount_threshold: 3,
            discount_percent: 50,
            currency_symbol: "A$".to_string(),
        });
        let quote = engine.quote(Money::from_whole(65), 3, none());
        assert_eq!(quote.total, Money::new(Decimal::new(975, 1)));
        assert_eq!(engine.format(quote.total), "A$97.50");
    }

    #[test]
    fn test_total_is_unrounded() {
        let quote = engine().quote(Money::new(Decimal::new(3333, 2)), 5, none());
        // 33.33 * 5 * 0.8
        assert_eq!(quote.total.amount(), Decimal::new(13332, 2));
        let quote = engine().quote(Money::new(Decimal::new(1001, 3)), 5, none());
        assert_eq!(quote.total.amount(), Decimal::new(4004, 3));
        assert_eq!(quote.total.to_string(), "$4.00");
    }

    proptest! {
        #[test]
        fn prop_total_matches_formula(
            base in 1i64..500,
            quantity in 1u32..200,
            mask in 0u8..8,
        ) {
            let catalog_add_ons = [
                add_on(1, "Test Preparation Session", 45),
                add_on(2, "Highway Driving Practice", 35),
                add_on(3, "Parking Skills Training", 30),
            ];
            let selected: Vec<&AddOn> = catalog_add_ons
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, a)| a)
                .collect();

            let quote = engine().quote(Money::from_whole(base), quantity, selected.iter().copied());

            let add_on_sum: Decimal = selected.iter().map(|a| a.price.amount()).sum();
            let subtotal = Decimal::from(base) * Decimal::from(quantity) + add_on_sum;
            let factor = if quantity >= 5 { Decimal::new(8, 1) } else { Decimal::ONE };
            prop_assert_eq!(quote.total.amount(), subtotal * factor);
            prop_assert_eq!(quote.discount_applied, quantity >= 5);
        }

        #[test]
        fn prop_more_lessons_never_cheaper(base in 1i64..500, quantity in 1u32..1000) {
            let engine = engine();
            let current = engine.quote(Money::from_whole(base), quantity, none());
            let next = engine.quote(Money::from_whole(base), quantity + 1, none());
            prop_assert!(next.total >= current.total);
        }

        #[test]
        fn prop_add_ons_monotonic_away_from_threshold(base in 1i64..500, quantity in 1u32..1000) {
            prop_assume!(quantity + 1 != 5);
            let prep = add_on(1, "Test Preparation Session", 45);
            let engine = engine();
            let current = engine.quote(Money::from_whole(base), quantity, [&prep]);
            let next = engine.quote(Money::from_whole(base), quantity + 1, [&prep]);
            prop_assert!(next.total >= current.total);
        }
    }
}
