//! Final bill shown when the show is finished

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{Money, SessionStats};

/// The comedy club bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Invoice number (8 uppercase alphanumerics)
    pub transaction_id: String,
    /// When the bill was issued
    pub issued_at: DateTime<Utc>,
    /// Laugh events billed
    pub laugh_count: u64,
    /// Unit price
    pub price_per_laugh: Money,
    /// Session cap
    pub max_charge: Money,
    /// "Membership cap" line: uncapped amount exceeded the cap
    pub cap_applied: bool,
    /// Total due
    pub total_due: Money,
}

impl Receipt {
    pub fn new(transaction_id: String, issued_at: DateTime<Utc>, stats: &SessionStats) -> Self {
        Self {
            transaction_id,
            issued_at,
            laugh_count: stats.laugh_count,
            price_per_laugh: stats.price_per_laugh,
            max_charge: stats.max_charge,
            cap_applied: stats.cap_applied(),
            total_due: stats.amount_due,
        }
    }

    /// Issue date as printed on the bill, e.g. "16 October 2026, 21:04"
    pub fn issued_display(&self) -> String {
        self.issued_at.format("%-d %B %Y, %H:%M").to_string()
    }
}

/// Outcome of "Settle Account". Payment is never actually processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Settlement {
    /// Demo only: would redirect to a payment provider
    DemoRedirect { provider: String, message: String },
    /// Nothing owed
    NothingDue,
}
