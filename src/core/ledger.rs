//! Session ledger: pure billing transitions

use crate::types::{Money, SessionStats};

/// Bills laughs at a fixed price up to a cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    price_per_laugh: Money,
    max_charge: Money,
}

impl Ledger {
    pub fn new(price_per_laugh: Money, max_charge: Money) -> Self {
        Self {
            price_per_laugh,
            max_charge,
        }
    }

    /// Count one more laugh. Pure: returns the next totals.
    pub fn apply_laugh_event(&self, stats: SessionStats) -> SessionStats {
        let laugh_count = stats.laugh_count.saturating_add(1);
        SessionStats {
            laugh_count,
            amount_due: stats.price_per_laugh.times(laugh_count).min(stats.max_charge),
            ..stats
        }
    }

    /// Zero totals with this ledger's pricing
    pub fn reset(&self) -> SessionStats {
        SessionStats::zero(self.price_per_laugh, self.max_charge)
    }

    /// Further laughs add nothing
    pub fn is_capped(&self, stats: &SessionStats) -> bool {
        stats.amount_due >= stats.max_charge
    }

    pub fn price_per_laugh(&self) -> Money {
        self.price_per_laugh
    }

    pub fn max_charge(&self) -> Money {
        self.max_charge
    }
}
