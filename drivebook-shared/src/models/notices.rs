use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What triggered a user-visible notice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeKind {
    LoggedOut,
    LogoutFailed,
    LessonSelected,
    LoginRequired,
    LoginSucceeded,
    RegistrationSucceeded,
    BookingProcessing,
    ContactReceived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Transient, non-blocking acknowledgment shown to the user.
///
/// Notices are advisory only. Nothing in the booking flow reads them back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub severity: Severity,
    pub title: String,
    pub description: Option<String>,
    pub timestamp: i64,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        let (severity, title, description) = match kind {
            NoticeKind::LoggedOut => (Severity::Success, "Successfully logged out", None),
            NoticeKind::LogoutFailed => (Severity::Error, "Failed to logout. Please try again.", None),
            NoticeKind::LessonSelected => (
                Severity::Info,
                "Lesson selected",
                Some("Proceed to checkout to complete your booking"),
            ),
            NoticeKind::LoginRequired => (Severity::Error, "Please log in to access this page", None),
            NoticeKind::LoginSucceeded => (Severity::Success, "Login Successful", Some("Welcome back!")),
            NoticeKind::RegistrationSucceeded => (
                Severity::Success,
                "Registration Successful",
                Some("Welcome aboard! Your joining fee has been processed."),
            ),
            NoticeKind::BookingProcessing => (
                Severity::Info,
                "Processing your booking",
                Some("Please wait while we confirm your booking details."),
            ),
            NoticeKind::ContactReceived => (
                Severity::Success,
                "Message Sent Successfully",
                Some("Thank you for contacting us. We will get back to you shortly."),
            ),
        };

        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            title: title.to_string(),
            description: description.map(str::to_string),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Replace the canned description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
