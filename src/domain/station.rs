use serde::{Deserialize, Serialize};

/// A fare zone number. Zone 1 is the innermost zone; the distance between
/// the entry and exit zones drives the fare beyond the minimum.
pub type Zone = u32;

/// A station on the network: a name plus the fare zone it sits in.
///
/// Stations are immutable value objects supplied by the caller; the station
/// directory itself lives outside this crate. Two stations with the same
/// name and zone are the same station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Station {
    name: String,
    zone: Zone,
}

impl Station {
    pub fn new(name: impl Into<String>, zone: Zone) -> Self {
        Self {
            name: name.into(),
            zone,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (zone {})", self.name, self.zone)
    }
}
