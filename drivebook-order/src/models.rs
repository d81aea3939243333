use chrono::{DateTime, Utc};
use drivebook_catalog::{AddOn, AddOnId, LessonCatalog, Offering, OfferingId, PriceQuote, PricingEngine};
use drivebook_core::payment::PaymentIntent;
use drivebook_shared::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Where a draft is in the checkout lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStage {
    /// Offering picked, nothing configured yet
    Selected,
    /// Quantity or add-ons changed at least once
    Priced,
}

/// The in-flight booking for one selected offering.
///
/// Only the lesson count and add-on selection are mutable. Every price is
/// derived on read through [`BookingDraft::quote`], so nothing can go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    offering: Offering,
    quantity: u32,
    selected_add_ons: BTreeMap<AddOnId, AddOn>,
    stage: DraftStage,
}

impl BookingDraft {
    pub fn new(offering: Offering) -> Self {
        Self {
            offering,
            quantity: 1,
            selected_add_ons: BTreeMap::new(),
            stage: DraftStage::Selected,
        }
    }

    pub fn offering(&self) -> &Offering {
        &self.offering
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn stage(&self) -> DraftStage {
        self.stage
    }

    pub fn is_selected(&self, id: AddOnId) -> bool {
        self.selected_add_ons.contains_key(&id)
    }

    /// Selected add-ons ordered by id
    pub fn add_ons(&self) -> impl Iterator<Item = &AddOn> {
        self.selected_add_ons.values()
    }

    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
        self.stage = DraftStage::Priced;
    }

    /// Never goes below one lesson
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
        self.stage = DraftStage::Priced;
    }

    /// Add the add-on if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle_add_on(&mut self, add_on: &AddOn) -> bool {
        self.stage = DraftStage::Priced;
        if self.selected_add_ons.remove(&add_on.id).is_some() {
            false
        } else {
            self.selected_add_ons.insert(add_on.id, add_on.clone());
            true
        }
    }

    pub fn quote(&self, engine: &PricingEngine) -> PriceQuote {
        engine.quote(self.offering.price, self.quantity, self.add_ons())
    }

    pub fn to_payload(&self) -> DraftPayload {
        DraftPayload {
            offering_id: self.offering.id,
            quantity: self.quantity,
            add_on_ids: self.selected_add_ons.keys().copied().collect(),
            stage: self.stage,
        }
    }

    /// Freeze the draft once its payment has been captured
    pub fn finalize(self, engine: &PricingEngine, payment: PaymentIntent) -> FinalizedBooking {
        let quote = self.quote(engine);

        FinalizedBooking {
            reference: payment.reference,
            original_price: engine.format(self.offering.price),
            total_price: engine.format(quote.total),
            offering: self.offering,
            quantity: self.quantity,
            add_ons: self.selected_add_ons.into_values().collect(),
            discount_applied: quote.discount_applied,
            subtotal: quote.subtotal,
            discount_amount: quote.discount_amount,
            total: quote.total,
            payment,
            finalized_at: Utc::now(),
        }
    }
}

/// Wire form of a draft, carried by the client between checkout requests.
///
/// Only ids travel; prices are always re-read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftPayload {
    pub offering_id: OfferingId,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub add_on_ids: Vec<AddOnId>,
    #[serde(default = "selected")]
    pub stage: DraftStage,
}

fn one() -> u32 {
    1
}

fn selected() -> DraftStage {
    DraftStage::Selected
}

impl DraftPayload {
    /// Rebuild the draft against the catalog.
    ///
    /// `None` means the payload is malformed: unknown offering or add-on,
    /// a zero quantity, or a repeated add-on id.
    pub fn resolve(&self, catalog: &LessonCatalog) -> Option<BookingDraft> {
        if self.quantity == 0 {
            return None;
        }

        let offering = catalog.offering(self.offering_id)?.clone();

        let mut selected_add_ons = BTreeMap::new();
        for id in &self.add_on_ids {
            let add_on = catalog.add_on(*id)?;
            if selected_add_ons.insert(*id, add_on.clone()).is_some() {
                return None;
            }
        }

        Some(BookingDraft {
            offering,
            quantity: self.quantity,
            selected_add_ons,
            stage: self.stage,
        })
    }
}

/// Frozen snapshot handed to the confirmation page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizedBooking {
    pub reference: Uuid,
    pub offering: Offering,
    pub quantity: u32,
    pub add_ons: Vec<AddOn>,
    pub discount_applied: bool,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
    /// Base price per lesson as displayed, e.g. `$60.00`
    pub original_price: String,
    /// Grand total as displayed, e.g. `$276.00`
    pub total_price: String,
    pub payment: PaymentIntent,
    pub finalized_at: DateTime<Utc>,
}
