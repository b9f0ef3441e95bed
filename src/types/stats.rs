//! Per-session billing totals

use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Running totals of one show.
///
/// `amount_due == min(laugh_count * price_per_laugh, max_charge)` always holds;
/// only the ledger produces new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Laughs billed so far
    pub laugh_count: u64,
    /// Amount owed, capped at `max_charge`
    pub amount_due: Money,
    /// Price of one laugh
    pub price_per_laugh: Money,
    /// Session cap
    pub max_charge: Money,
}

impl SessionStats {
    /// Zero totals for the given pricing
    pub fn zero(price_per_laugh: Money, max_charge: Money) -> Self {
        Self {
            laugh_count: 0,
            amount_due: Money::ZERO,
            price_per_laugh,
            max_charge,
        }
    }

    /// Amount that would be owed without the cap
    pub fn uncapped_amount(&self) -> Money {
        self.price_per_laugh.times(self.laugh_count)
    }

    /// True once the cap discount kicks in (uncapped amount strictly above cap)
    pub fn cap_applied(&self) -> bool {
        self.uncapped_amount() > self.max_charge
    }
}
