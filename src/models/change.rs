//! Classification of an incoming offer against its stored state.

use std::fmt;

use super::Offer;

/// Outcome of diffing an incoming offer against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    New,
    PriceRise,
    PriceDrop,
    Unchanged,
}

impl Change {
    /// Classify `incoming` against the previously stored observation.
    ///
    /// Prices are compared by the sum of both bounds.
    pub fn between(stored: Option<&Offer>, incoming: &Offer) -> Self {
        let Some(stored) = stored else {
            return Change::New;
        };

        match incoming.price_sum().cmp(&stored.price_sum()) {
            std::cmp::Ordering::Greater => Change::PriceRise,
            std::cmp::Ordering::Less => Change::PriceDrop,
            std::cmp::Ordering::Equal => Change::Unchanged,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Change::New => "new",
            Change::PriceRise => "price_rise",
            Change::PriceDrop => "price_drop",
            Change::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
