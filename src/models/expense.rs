use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback merchant name when the record carries none
const UNKNOWN_MERCHANT: &str = "Unknown";

/// Default currency for records that omit one
const DEFAULT_CURRENCY: &str = "INR";

/// An expense record as returned by the list endpoint.
///
/// The service is loose about types here: `amount` arrives as either a JSON
/// number or a numeric string, and `merchant`/`currency` may be missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "amount_from_number_or_string")]
    pub amount: f64,
    #[serde(default = "unknown_merchant")]
    pub merchant: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Expense {
    /// Creation date formatted for display, or "-" when absent/unparseable
    pub fn formatted_date(&self) -> String {
        match &self.created_at {
            Some(date) => {
                if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
                    dt.format("%b %d, %Y").to_string()
                } else {
                    date.chars().take(10).collect()
                }
            }
            None => "-".to_string(),
        }
    }
}

/// A new expense as sent to the create endpoint. The amount travels as a
/// string on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: String,
    pub merchant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

fn unknown_merchant() -> String {
    UNKNOWN_MERCHANT.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn amount_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        // Unparseable strings degrade to zero rather than failing the list
        Amount::Text(s) => Ok(s.trim().parse().unwrap_or(0.0)),
    }
}
