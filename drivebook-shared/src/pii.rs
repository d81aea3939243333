use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const MASK: &str = "********";

/// Sensitive form input (passwords, card numbers, CVVs).
///
/// Debug, Display and Serialize all print a mask, so the value cannot leak
/// through `tracing::info!("{:?}", form)` or an echoed response body.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the real value. Call sites are the only places secrets are read.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(MASK)
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_never_prints_value() {
        let card = Masked::from("4111111111111111");
        assert_eq!(format!("{:?}", card), MASK);
        assert_eq!(card.to_string(), MASK);
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"********\"");
        assert_eq!(card.expose(), "4111111111111111");
    }

    #[test]
    fn test_masked_deserializes_transparently() {
        let cvv: Masked<String> = serde_json::from_str("\"123\"").unwrap();
        assert_eq!(cvv.into_inner(), "123");
    }
}
