/// One market as read from the contract. Assembled fresh on every read
/// cycle; nothing here is persisted or locally derived beyond the id,
/// which is the read index (the contract stores markets in a flat array).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRecord {
    /// Sequential index, assigned by read order.
    pub id: u64,
    /// Question text, verbatim from the contract.
    pub question: String,
    /// End of the betting window, seconds since epoch.
    pub end_time: u64,
    /// Whether the market has been resolved.
    pub resolved: bool,
    /// Outstanding YES shares.
    pub yes_shares: u64,
    /// Outstanding NO shares.
    pub no_shares: u64,
}

impl MarketRecord {
    /// Share count for one outcome.
    pub fn shares(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes_shares,
            Outcome::No => self.no_shares,
        }
    }

    /// Seconds until the market ends. Zero once past the end time.
    pub fn time_remaining_secs(&self, now_secs: u64) -> u64 {
        self.end_time.saturating_sub(now_secs)
    }
}

/// The two outcomes a market can settle to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Yes => "Yes",
            Outcome::No => "No",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MarketRecord {
        MarketRecord {
            id: 0,
            question: "Will it rain?".to_string(),
            end_time: 1_700_000_000,
            resolved: false,
            yes_shares: 40,
            no_shares: 60,
        }
    }

    #[test]
    fn shares_by_outcome() {
        let m = sample();
        assert_eq!(m.shares(Outcome::Yes), 40);
        assert_eq!(m.shares(Outcome::No), 60);
    }

    #[test]
    fn time_remaining_clamps_at_zero() {
        let m = sample();
        assert_eq!(m.time_remaining_secs(1_699_999_990), 10);
        assert_eq!(m.time_remaining_secs(1_700_000_001), 0);
    }
}
