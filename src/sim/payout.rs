//! Payout multiplier lookup

/// Multiplier reached after surviving 1, 2, ... rounds
pub const MULTIPLIERS: [f64; 18] = [
    1.06, 1.18, 1.33, 1.50, 1.71, 1.95, 2.28, 2.66, 3.19, 3.83, 4.79, 5.99, 7.99, 10.6, 15.9,
    23.9, 47.9, 95.9,
];

/// Fixed table from rounds survived to payout multiplier
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayoutTable;

impl PayoutTable {
    pub const fn new() -> Self {
        Self
    }

    /// Multiplier for the given number of survived rounds.
    ///
    /// Zero or negative rounds pay 1.0; anything past the end of the table
    /// pays the last entry.
    pub fn multiplier(&self, rounds: i64) -> f64 {
        if rounds <= 0 {
            return 1.0;
        }
        let last = MULTIPLIERS.len() - 1;
        let index = usize::try_from(rounds - 1).map_or(last, |i| i.min(last));
        MULTIPLIERS[index]
    }

    pub fn len(&self) -> usize {
        MULTIPLIERS.len()
    }

    pub fn is_empty(&self) -> bool {
        MULTIPLIERS.is_empty()
    }

    /// Highest multiplier the table can pay
    pub fn max_multiplier(&self) -> f64 {
        MULTIPLIERS[MULTIPLIERS.len() - 1]
    }
}
