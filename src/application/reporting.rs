use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CompletedJourney, Pence, Zone};

/// Summary of one card's activity, built by `CardService::report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardReport {
    pub generated_at: DateTime<Utc>,
    pub balance: Pence,
    pub journeys: usize,
    pub total_fares: Pence,
    pub penalties: usize,
    pub penalty_total: Pence,
    pub by_distance: Vec<DistanceSummary>,
}

/// Journey totals grouped by zone distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceSummary {
    pub zone_distance: Zone,
    pub journeys: usize,
    pub total_fares: Pence,
    pub average_fare: Pence,
}

/// Aggregate a journey history into a report. Penalties never appear in
/// the history, so their count and total arrive separately.
pub fn build_card_report(
    balance: Pence,
    history: &[CompletedJourney],
    penalties: usize,
    penalty_total: Pence,
) -> CardReport {
    let mut groups: BTreeMap<Zone, (usize, Pence)> = BTreeMap::new();
    for journey in history {
        let entry = groups.entry(journey.zone_distance()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += journey.fare;
    }

    let by_distance = groups
        .into_iter()
        .map(|(zone_distance, (journeys, total_fares))| DistanceSummary {
            zone_distance,
            journeys,
            total_fares,
            average_fare: total_fares / journeys as Pence,
        })
        .collect();

    CardReport {
        generated_at: Utc::now(),
        balance,
        journeys: history.len(),
        total_fares: history.iter().map(|j| j.fare).sum(),
        penalties,
        penalty_total,
        by_distance,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{FareSchedule, Journey, Station};

    fn trip(entry_zone: Zone, exit_zone: Zone) -> CompletedJourney {
        Journey::start(Station::new("in", entry_zone), Utc::now()).complete(
            Station::new("out", exit_zone),
            Utc::now(),
            &FareSchedule::default(),
        )
    }

    #[test]
    fn test_empty_history_report() {
        let report = build_card_report(0, &[], 0, 0);
        assert_eq!(report.journeys, 0);
        assert_eq!(report.total_fares, 0);
        assert!(report.by_distance.is_empty());
    }

    #[test]
    fn test_totals_and_distance_groups() {
        let history = vec![trip(1, 1), trip(1, 3), trip(2, 4), trip(1, 2)];
        let report = build_card_report(1_000, &history, 1, 600);

        assert_eq!(report.journeys, 4);
        assert_eq!(report.total_fares, 100 + 300 + 300 + 200);
        assert_eq!(report.penalties, 1);
        assert_eq!(report.penalty_total, 600);

        // Groups come out ordered by zone distance
        let distances: Vec<Zone> = report.by_distance.iter().map(|d| d.zone_distance).collect();
        assert_eq!(distances, vec![0, 1, 2]);

        let two_zones = &report.by_distance[2];
        assert_eq!(two_zones.journeys, 2);
        assert_eq!(two_zones.total_fares, 600);
        assert_eq!(two_zones.average_fare, 300);
    }
}
