use chrono::{Months, NaiveDate};
use drivebook_shared::Masked;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid digits pattern"));
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("valid expiry pattern"));

const MINIMUM_AGE_YEARS: u32 = 18;

/// Field-scoped validation messages. Submission is blocked while non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Validation failed for: {}", field_list(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record `message` against `field` when `ok` is false
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn field_list(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields.keys().cloned().collect::<Vec<_>>().join(", ")
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Account registration with the joining-fee card details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub full_name: String,
    /// `YYYY-MM-DD` as sent by a date input
    pub date_of_birth: String,
    pub email: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
    pub security_question: String,
    pub security_answer: Masked<String>,
    pub card_number: Masked<String>,
    pub card_expiry: String,
    pub card_cvv: Masked<String>,
    pub payment_consent: bool,
    #[serde(default)]
    pub marketing_opt_in: bool,
}

impl RegistrationForm {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(
            self.full_name.trim().chars().count() >= 2,
            "full_name",
            "Full name must be at least 2 characters",
        );

        let adult = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .ok()
            .zip(today.checked_sub_months(Months::new(MINIMUM_AGE_YEARS * 12)))
            .is_some_and(|(born, cutoff)| born <= cutoff);
        errors.check(adult, "date_of_birth", "You must be at least 18 years old");

        errors.check(is_email(&self.email), "email", "Please enter a valid email address");

        let password = self.password.expose();
        errors.check(
            password.chars().count() >= 8,
            "password",
            "Password must be at least 8 characters",
        );
        errors.check(
            password == self.confirm_password.expose(),
            "confirm_password",
            "Passwords do not match",
        );

        errors.check(
            !self.security_question.trim().is_empty(),
            "security_question",
            "Security question is required",
        );
        errors.check(
            !self.security_answer.expose().trim().is_empty(),
            "security_answer",
            "Security answer is required",
        );

        let card = self.card_number.expose();
        let card_len = card.chars().count();
        errors.check(card_len >= 16, "card_number", "Card number must be at least 16 digits");
        errors.check(card_len <= 19, "card_number", "Card number must not exceed 19 digits");
        errors.check(
            DIGITS.is_match(card),
            "card_number",
            "Card number must contain only digits",
        );

        errors.check(
            EXPIRY.is_match(&self.card_expiry),
            "card_expiry",
            "Expiry date must be in MM/YY format",
        );

        let cvv = self.card_cvv.expose();
        errors.check(cvv.chars().count() == 3, "card_cvv", "CVV must be 3 digits");
        errors.check(DIGITS.is_match(cvv), "card_cvv", "CVV must contain only digits");

        errors.check(
            self.payment_consent,
            "payment_consent",
            "You must consent to the joining fee payment",
        );

        errors.into_result()
    }
}

/// Returning-user login. Any well-formed attempt is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: Masked<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(!self.email.trim().is_empty(), "email", "Email is required");
        errors.check(
            !self.password.expose().is_empty(),
            "password",
            "Password is required",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(!self.name.trim().is_empty(), "name", "Name is required");
        errors.check(is_email(&self.email), "email", "Please enter a valid email address");
        errors.check(!self.subject.trim().is_empty(), "subject", "Subject is required");
        errors.check(!self.message.trim().is_empty(), "message", "Message is required");
        errors.into_result()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            full_name: "Jane Learner".to_string(),
            date_of_birth: "1990-04-02".to_string(),
            email: "jane@example.com".to_string(),
            password: Masked::from("hunter2hunter2"),
            confirm_password: Masked::from("hunter2hunter2"),
            security_question: "pet".to_string(),
            security_answer: Masked::from("Rex"),
            card_number: Masked::from("4111111111111111"),
            card_expiry: "09/28".to_string(),
            card_cvv: Masked::from("123"),
            payment_consent: true,
            marketing_opt_in: false,
        }
    }
}
