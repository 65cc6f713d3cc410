use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Card, CompletedJourney, FareSchedule, Journey, Pence, Station, TouchIn, TouchOut, Zone,
    format_pence,
};

use super::{AppError, CardReport, build_card_report};

/// Application service wrapping a single card. This is the primary
/// interface for any client (CLI, test harness, embedding application).
///
/// The service is deliberately single-threaded: a caller exposing one card
/// to concurrent clients must serialize access with its own lock.
pub struct CardService {
    card: Card,
    penalties: usize,
    penalty_total: Pence,
}

/// Result of a top-up.
#[derive(Debug, Clone)]
pub struct TopUpResult {
    pub amount: Pence,
    pub balance: Pence,
}

/// Result of a touch-in.
#[derive(Debug, Clone)]
pub struct TouchInResult {
    pub station: Station,
    /// Set when an abandoned journey was penalty-charged by this touch-in.
    pub penalty: Option<Pence>,
    pub balance: Pence,
}

/// Result of a touch-out.
#[derive(Debug, Clone)]
pub struct TouchOutResult {
    pub station: Station,
    /// The recorded journey, absent when the touch-out was a penalty.
    pub journey: Option<CompletedJourney>,
    /// What was deducted: the journey fare or the penalty fare.
    pub charged: Pence,
    pub balance: Pence,
}

/// A single entry in a replayable touch sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TouchEvent {
    TopUp {
        amount: Pence,
    },
    TouchIn {
        station: String,
        zone: Zone,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },
    TouchOut {
        station: String,
        zone: Zone,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },
}

/// What a successfully applied event did.
#[derive(Debug, Clone)]
pub enum AppliedEvent {
    ToppedUp(TopUpResult),
    TouchedIn(TouchInResult),
    TouchedOut(TouchOutResult),
}

/// Result of replaying an event sequence. Rejected events are collected
/// per-index; the replay continues past them, the way a gate line keeps
/// moving after one card is refused.
#[derive(Debug)]
pub struct ReplaySummary {
    pub applied: usize,
    pub outcomes: Vec<AppliedEvent>,
    pub rejected: Vec<RejectedEvent>,
}

/// An event the card refused, with the position it held in the sequence.
#[derive(Debug, Clone)]
pub struct RejectedEvent {
    pub index: usize,
    pub error: String,
}

impl CardService {
    /// Create a service around a fresh card priced by `fares`.
    pub fn new(fares: FareSchedule) -> Self {
        Self {
            card: Card::new(fares),
            penalties: 0,
            penalty_total: 0,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn balance(&self) -> Pence {
        self.card.balance()
    }

    pub fn fares(&self) -> &FareSchedule {
        self.card.fares()
    }

    pub fn current_journey(&self) -> Option<&Journey> {
        self.card.journey_log().journey()
    }

    pub fn history(&self) -> &[CompletedJourney] {
        self.card.journey_log().journey_history()
    }

    /// Add credit to the card.
    ///
    /// The domain leaves non-positive amounts to the caller's contract;
    /// this boundary enforces it.
    pub fn top_up(&mut self, amount: Pence) -> Result<TopUpResult, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "top-up must be positive, got {}",
                format_pence(amount)
            )));
        }
        let balance = self.card.top_up(amount)?;
        Ok(TopUpResult { amount, balance })
    }

    /// Touch in at a station supplied as name + zone. `at` defaults to now.
    pub fn touch_in(
        &mut self,
        name: &str,
        zone: Zone,
        at: Option<DateTime<Utc>>,
    ) -> Result<TouchInResult, AppError> {
        let station = self.station(name, zone)?;
        let outcome = self
            .card
            .touch_in(station.clone(), at.unwrap_or_else(Utc::now))?;

        let penalty = match outcome {
            TouchIn::Started => None,
            TouchIn::PenaltyStarted { penalty } => {
                self.note_penalty(penalty);
                Some(penalty)
            }
        };

        Ok(TouchInResult {
            station,
            penalty,
            balance: self.card.balance(),
        })
    }

    /// Touch out at a station supplied as name + zone. `at` defaults to now.
    pub fn touch_out(
        &mut self,
        name: &str,
        zone: Zone,
        at: Option<DateTime<Utc>>,
    ) -> Result<TouchOutResult, AppError> {
        let station = self.station(name, zone)?;
        let outcome = self
            .card
            .touch_out(station.clone(), at.unwrap_or_else(Utc::now));

        let (journey, charged) = match outcome {
            TouchOut::Completed(journey) => {
                let fare = journey.fare;
                (Some(journey), fare)
            }
            TouchOut::Penalty { penalty } => {
                self.note_penalty(penalty);
                (None, penalty)
            }
        };

        Ok(TouchOutResult {
            station,
            journey,
            charged,
            balance: self.card.balance(),
        })
    }

    /// Apply one touch event.
    pub fn apply(&mut self, event: &TouchEvent) -> Result<AppliedEvent, AppError> {
        match event {
            TouchEvent::TopUp { amount } => Ok(AppliedEvent::ToppedUp(self.top_up(*amount)?)),
            TouchEvent::TouchIn { station, zone, at } => {
                Ok(AppliedEvent::TouchedIn(self.touch_in(station, *zone, *at)?))
            }
            TouchEvent::TouchOut { station, zone, at } => Ok(AppliedEvent::TouchedOut(
                self.touch_out(station, *zone, *at)?,
            )),
        }
    }

    /// Apply a whole event sequence in order, collecting rejections
    /// instead of aborting on the first one.
    pub fn replay(&mut self, events: &[TouchEvent]) -> ReplaySummary {
        let mut outcomes = Vec::new();
        let mut rejected = Vec::new();

        for (index, event) in events.iter().enumerate() {
            match self.apply(event) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => rejected.push(RejectedEvent {
                    index,
                    error: e.to_string(),
                }),
            }
        }

        ReplaySummary {
            applied: outcomes.len(),
            outcomes,
            rejected,
        }
    }

    /// Summarize the card's activity so far.
    pub fn report(&self) -> CardReport {
        build_card_report(
            self.card.balance(),
            self.history(),
            self.penalties,
            self.penalty_total,
        )
    }

    fn station(&self, name: &str, zone: Zone) -> Result<Station, AppError> {
        if zone == 0 {
            return Err(AppError::InvalidZone(zone));
        }
        Ok(Station::new(name, zone))
    }

    fn note_penalty(&mut self, penalty: Pence) {
        self.penalties += 1;
        self.penalty_total += penalty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CardService {
        CardService::new(FareSchedule::default())
    }

    #[test]
    fn test_top_up_rejects_non_positive_amounts() {
        let mut service = service();
        assert!(matches!(
            service.top_up(0),
            Err(AppError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.top_up(-100),
            Err(AppError::InvalidAmount(_))
        ));
        assert_eq!(service.balance(), 0);
    }

    #[test]
    fn test_zone_zero_is_rejected() {
        let mut service = service();
        service.top_up(100).unwrap();
        assert!(matches!(
            service.touch_in("Nowhere", 0, None),
            Err(AppError::InvalidZone(0))
        ));
        assert!(service.current_journey().is_none());
    }

    #[test]
    fn test_touch_out_result_carries_the_journey() {
        let mut service = service();
        service.top_up(100).unwrap();
        service.touch_in("Aldgate", 1, None).unwrap();
        let result = service.touch_out("Moorgate", 1, None).unwrap();

        assert_eq!(result.charged, 100);
        assert_eq!(result.balance, 0);
        let journey = result.journey.expect("journey should be recorded");
        assert_eq!(journey.entry_station.name(), "Aldgate");
        assert_eq!(journey.exit_station.name(), "Moorgate");
    }

    #[test]
    fn test_penalty_touch_out_reports_penalty_charge() {
        let mut service = service();
        service.top_up(100).unwrap();
        let result = service.touch_out("Moorgate", 1, None).unwrap();

        assert!(result.journey.is_none());
        assert_eq!(result.charged, 600);
        assert_eq!(result.balance, -500);
    }

    #[test]
    fn test_replay_continues_past_rejections() {
        let mut service = service();
        let events = vec![
            // Rejected: nothing on the card yet
            TouchEvent::TouchIn {
                station: "Aldgate".into(),
                zone: 1,
                at: None,
            },
            TouchEvent::TopUp { amount: 500 },
            TouchEvent::TouchIn {
                station: "Aldgate".into(),
                zone: 1,
                at: None,
            },
            TouchEvent::TouchOut {
                station: "Moorgate".into(),
                zone: 2,
                at: None,
            },
        ];

        let summary = service.replay(&events);

        assert_eq!(summary.applied, 3);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].index, 0);
        assert_eq!(service.balance(), 500 - 200);
        assert_eq!(service.history().len(), 1);
    }

    #[test]
    fn test_report_counts_penalties() {
        let mut service = service();
        service.top_up(2_000).unwrap();
        service.touch_in("Aldgate", 1, None).unwrap();
        service.touch_in("Euston", 2, None).unwrap(); // penalty
        service.touch_out("Moorgate", 2, None).unwrap();
        service.touch_out("Moorgate", 2, None).unwrap(); // penalty

        let report = service.report();
        assert_eq!(report.journeys, 1);
        assert_eq!(report.total_fares, 100);
        assert_eq!(report.penalties, 2);
        assert_eq!(report.penalty_total, 1_200);
        assert_eq!(report.balance, 2_000 - 600 - 100 - 600);
    }
}
