//! Contractor payment milestone models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four milestones of a monthly contractor-payment cycle.
///
/// Serialized in kebab-case (`"prefunding-sent"`).
///
/// # Example
///
/// ```
/// use payroll_engine::models::PaymentEventType;
///
/// assert_eq!(PaymentEventType::PrefundingDue.as_str(), "prefunding-due");
/// assert_eq!(PaymentEventType::all().len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentEventType {
    /// Contractors' invoices are due.
    Invoice,
    /// The client sends the pre-funding transfer.
    PrefundingSent,
    /// Pre-funding must have arrived.
    PrefundingDue,
    /// Contractors are paid.
    Payment,
}

impl PaymentEventType {
    /// All milestone types in the order the schedule generator emits them.
    pub fn all() -> [PaymentEventType; 4] {
        [
            PaymentEventType::Invoice,
            PaymentEventType::PrefundingSent,
            PaymentEventType::PrefundingDue,
            PaymentEventType::Payment,
        ]
    }

    /// Returns the wire value of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentEventType::Invoice => "invoice",
            PaymentEventType::PrefundingSent => "prefunding-sent",
            PaymentEventType::PrefundingDue => "prefunding-due",
            PaymentEventType::Payment => "payment",
        }
    }
}

impl std::fmt::Display for PaymentEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generated milestone date.
///
/// Events are regenerated for every `(year, month)` query and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// Which milestone this is.
    #[serde(rename = "type")]
    pub event_type: PaymentEventType,
    /// The day the milestone falls on.
    pub date: NaiveDate,
    /// Short display label.
    pub label: String,
    /// One-sentence explanation for the calendar view.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serialization_is_kebab_case() {
        let json = serde_json::to_string(&PaymentEventType::PrefundingSent).unwrap();
        assert_eq!(json, "\"prefunding-sent\"");

        let deserialized: PaymentEventType = serde_json::from_str("\"prefunding-due\"").unwrap();
        assert_eq!(deserialized, PaymentEventType::PrefundingDue);
    }

    #[test]
    fn test_as_str_matches_serde_name() {
        for event_type in PaymentEventType::all() {
            let json = serde_json::to_string(&event_type).unwrap();
            assert_eq!(json, format!("\"{}\"", event_type.as_str()));
            assert_eq!(event_type.to_string(), event_type.as_str());
        }
    }

    #[test]
    fn test_payment_event_serializes_type_field() {
        let event = PaymentEvent {
            event_type: PaymentEventType::Invoice,
            date: NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
            label: "Invoice due".to_string(),
            description: "Contractor invoices are due.".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"invoice\""));
        assert!(json.contains("\"date\":\"2025-02-20\""));

        let deserialized: PaymentEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }
}
