use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FareSchedule, Pence, Station, Zone};

/// An open trip: a touch-in that has not yet been matched by a touch-out.
///
/// A `Journey` only exists once an entry station is known, so there is no
/// half-empty record to clear in place. Touching out consumes the journey
/// and produces an immutable [`CompletedJourney`] snapshot; a journey that
/// is abandoned (a second touch-in arrives first) is simply dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    entry_station: Station,
    entry_time: DateTime<Utc>,
}

impl Journey {
    pub fn start(entry_station: Station, entry_time: DateTime<Utc>) -> Self {
        Self {
            entry_station,
            entry_time,
        }
    }

    pub fn entry_station(&self) -> &Station {
        &self.entry_station
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    /// Close the journey at `exit_station`, pricing it against `fares`.
    pub fn complete(
        self,
        exit_station: Station,
        exit_time: DateTime<Utc>,
        fares: &FareSchedule,
    ) -> CompletedJourney {
        let fare = fares.fare_between(self.entry_station.zone(), exit_station.zone());
        CompletedJourney {
            entry_station: self.entry_station,
            entry_time: self.entry_time,
            exit_station,
            exit_time,
            fare,
        }
    }
}

/// A finished trip as recorded in the journey history.
///
/// Both stations are always present: malformed trips are charged a penalty
/// and never recorded, so history entries need no optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedJourney {
    pub entry_station: Station,
    pub entry_time: DateTime<Utc>,
    pub exit_station: Station,
    pub exit_time: DateTime<Utc>,
    /// The fare that was deducted when this journey closed.
    pub fare: Pence,
}

impl CompletedJourney {
    /// Number of zone boundaries between entry and exit.
    pub fn zone_distance(&self) -> Zone {
        self.entry_station.zone().abs_diff(self.exit_station.zone())
    }
}
