// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use farecard::application::CardService;
use farecard::domain::{FareSchedule, Pence};

/// Default schedule values, spelled out so test arithmetic reads plainly.
pub const MAXIMUM_BALANCE: Pence = 9_000;
pub const MINIMUM_FARE: Pence = 100;
pub const PENALTY_FARE: Pence = 600;
pub const ZONE_INCREMENT: Pence = 100;

/// A service around a fresh card with the default fare schedule.
pub fn test_service() -> CardService {
    CardService::new(FareSchedule::default())
}

/// A service whose card already holds `amount`.
pub fn funded_service(amount: Pence) -> CardService {
    let mut service = test_service();
    service.top_up(amount).unwrap();
    service
}
