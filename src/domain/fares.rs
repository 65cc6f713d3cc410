use serde::{Deserialize, Serialize};

use super::{Pence, Zone};

/// The pricing constants a card is constructed with.
///
/// These are plain values bound at construction rather than process-wide
/// globals, so a caller (or a test) can price journeys however it likes.
/// The defaults mirror the classic card: £90.00 balance cap, £1.00 minimum
/// fare, £6.00 penalty, £1.00 per zone of distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareSchedule {
    /// Hard ceiling on the card balance; top-ups past it are rejected.
    pub maximum_balance: Pence,
    /// Base fare for any completed journey, and the balance required to
    /// touch in.
    pub minimum_fare: Pence,
    /// Flat charge for a journey with a missing touch-in or touch-out.
    pub penalty_fare: Pence,
    /// Added to the minimum fare per zone of distance between entry and
    /// exit.
    pub zone_increment: Pence,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            maximum_balance: 9_000,
            minimum_fare: 100,
            penalty_fare: 600,
            zone_increment: 100,
        }
    }
}

impl FareSchedule {
    pub fn with_maximum_balance(mut self, maximum_balance: Pence) -> Self {
        self.maximum_balance = maximum_balance;
        self
    }

    pub fn with_minimum_fare(mut self, minimum_fare: Pence) -> Self {
        self.minimum_fare = minimum_fare;
        self
    }

    pub fn with_penalty_fare(mut self, penalty_fare: Pence) -> Self {
        self.penalty_fare = penalty_fare;
        self
    }

    pub fn with_zone_increment(mut self, zone_increment: Pence) -> Self {
        self.zone_increment = zone_increment;
        self
    }

    /// Price a completed journey between two zones.
    ///
    /// Linear in the zone distance: a same-zone trip costs exactly the
    /// minimum fare, and each zone of difference adds one increment.
    pub fn fare_between(&self, entry: Zone, exit: Zone) -> Pence {
        self.minimum_fare + Pence::from(entry.abs_diff(exit)) * self.zone_increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let fares = FareSchedule::default();
        assert_eq!(fares.maximum_balance, 9_000);
        assert_eq!(fares.minimum_fare, 100);
        assert_eq!(fares.penalty_fare, 600);
        assert_eq!(fares.zone_increment, 100);
    }

    #[test]
    fn test_same_zone_costs_minimum_fare() {
        let fares = FareSchedule::default();
        assert_eq!(fares.fare_between(1, 1), fares.minimum_fare);
        assert_eq!(fares.fare_between(4, 4), fares.minimum_fare);
    }

    #[test]
    fn test_fare_is_linear_in_zone_distance() {
        let fares = FareSchedule::default();
        assert_eq!(fares.fare_between(1, 2), 200);
        assert_eq!(fares.fare_between(1, 3), 300);
        assert_eq!(fares.fare_between(3, 1), 300);
        assert_eq!(fares.fare_between(2, 6), 500);
    }

    #[test]
    fn test_custom_increment() {
        let fares = FareSchedule::default()
            .with_minimum_fare(150)
            .with_zone_increment(80);
        assert_eq!(fares.fare_between(1, 1), 150);
        assert_eq!(fares.fare_between(1, 3), 150 + 2 * 80);
    }
}
