use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::CardService;
use crate::domain::{CompletedJourney, FareSchedule, Pence};

/// Full card state for JSON export: the schedule it was priced with, the
/// final balance and every recorded journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub fares: FareSchedule,
    pub balance: Pence,
    pub history: Vec<CompletedJourney>,
}

/// Exporter for converting card data to output formats.
pub struct Exporter<'a> {
    service: &'a CardService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a CardService) -> Self {
        Self { service }
    }

    /// Export the journey history to CSV format
    pub fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "entry_station",
            "entry_zone",
            "entry_time",
            "exit_station",
            "exit_zone",
            "exit_time",
            "zone_distance",
            "fare",
        ])?;

        let mut count = 0;
        for journey in self.service.history() {
            csv_writer.write_record([
                journey.entry_station.name().to_string(),
                journey.entry_station.zone().to_string(),
                journey.entry_time.to_rfc3339(),
                journey.exit_station.name().to_string(),
                journey.exit_station.zone().to_string(),
                journey.exit_time.to_rfc3339(),
                journey.zone_distance().to_string(),
                journey.fare.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full card state as a JSON snapshot
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<CardSnapshot> {
        let snapshot = CardSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            fares: self.service.fares().clone(),
            balance: self.service.balance(),
            history: self.service.history().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CardService;
    use crate::domain::FareSchedule;

    fn travelled_service() -> CardService {
        let mut service = CardService::new(FareSchedule::default());
        service.top_up(1_000).unwrap();
        service.touch_in("Aldgate", 1, None).unwrap();
        service.touch_out("Moorgate", 3, None).unwrap();
        service.touch_in("Moorgate", 3, None).unwrap();
        service.touch_out("Euston", 2, None).unwrap();
        service
    }

    #[test]
    fn test_history_csv_has_one_row_per_journey() {
        let service = travelled_service();
        let mut out = Vec::new();

        let count = Exporter::new(&service).export_history_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(count, 2);
        assert_eq!(lines.len(), 3); // header + 2 journeys
        assert!(lines[0].starts_with("entry_station,entry_zone"));
        assert!(lines[1].starts_with("Aldgate,1,"));
        assert!(lines[1].ends_with(",2,300"));
    }

    #[test]
    fn test_snapshot_json_round_trips() {
        let service = travelled_service();
        let mut out = Vec::new();

        let snapshot = Exporter::new(&service)
            .export_snapshot_json(&mut out)
            .unwrap();
        let parsed: CardSnapshot = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed.balance, snapshot.balance);
        assert_eq!(parsed.balance, 1_000 - 300 - 200);
        assert_eq!(parsed.history.len(), 2);
        assert_eq!(parsed.fares, FareSchedule::default());
    }
}
