use chrono::{DateTime, Utc};

use super::{
    CompletedJourney, FareSchedule, Journey, JourneyLog, Pence, Station, format_pence,
};

/// Whether the card is currently inside the gates.
///
/// The state is held explicitly and drives every transition; it is never
/// inferred from whether some optional field happens to be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    NotInJourney,
    InJourney,
}

/// Outcome of a successful touch-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchIn {
    /// A journey opened normally.
    Started,
    /// The previous touch-in was never matched by a touch-out: the stale
    /// journey was discarded unrecorded, a penalty charged, and a new
    /// journey opened.
    PenaltyStarted { penalty: Pence },
}

/// Outcome of a touch-out. Touch-out cannot fail; a touch-out with no
/// matching touch-in is a penalty, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchOut {
    /// The open journey closed normally and was recorded.
    Completed(CompletedJourney),
    /// No touch-in was outstanding; a penalty was charged and nothing
    /// recorded.
    Penalty { penalty: Pence },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// A top-up would push the balance past the schedule's maximum. The
    /// balance is unchanged.
    BalanceLimitExceeded {
        maximum: Pence,
        balance: Pence,
        requested: Pence,
    },
    /// A touch-in was attempted with less than the minimum fare on the
    /// card. Nothing changes.
    InsufficientFunds { balance: Pence, minimum_fare: Pence },
}

impl std::fmt::Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::BalanceLimitExceeded {
                maximum,
                balance,
                requested,
            } => {
                write!(
                    f,
                    "maximum balance of {} exceeded: balance {}, top-up {}",
                    format_pence(*maximum),
                    format_pence(*balance),
                    format_pence(*requested)
                )
            }
            CardError::InsufficientFunds {
                balance,
                minimum_fare,
            } => {
                write!(
                    f,
                    "insufficient funds: balance {} is below the minimum fare {}",
                    format_pence(*balance),
                    format_pence(*minimum_fare)
                )
            }
        }
    }
}

impl std::error::Error for CardError {}

/// A prepaid contactless transit card.
///
/// The card is a two-state machine over its balance and journey log. Every
/// operation is a synchronous, atomic transition: it either completes in
/// full or rejects with the balance and log untouched. Top-ups are capped
/// by the fare schedule's maximum balance; deductions have no floor, so a
/// penalty can leave the balance negative.
#[derive(Debug, Clone)]
pub struct Card {
    balance: Pence,
    state: CardState,
    journey_log: JourneyLog,
    fares: FareSchedule,
}

impl Card {
    /// A new card starts empty, outside the gates, with no travel history.
    pub fn new(fares: FareSchedule) -> Self {
        Self {
            balance: 0,
            state: CardState::NotInJourney,
            journey_log: JourneyLog::new(),
            fares,
        }
    }

    pub fn balance(&self) -> Pence {
        self.balance
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn is_in_journey(&self) -> bool {
        self.state == CardState::InJourney
    }

    pub fn fares(&self) -> &FareSchedule {
        &self.fares
    }

    pub fn journey_log(&self) -> &JourneyLog {
        &self.journey_log
    }

    /// Add credit to the card, returning the new balance.
    ///
    /// Rejects the whole top-up when it would push the balance past the
    /// schedule's maximum; the balance is left as it was.
    pub fn top_up(&mut self, amount: Pence) -> Result<Pence, CardError> {
        let new_balance = self.balance + amount;
        if new_balance > self.fares.maximum_balance {
            return Err(CardError::BalanceLimitExceeded {
                maximum: self.fares.maximum_balance,
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance = new_balance;
        Ok(self.balance)
    }

    /// Present the card at an entry gate.
    ///
    /// Requires at least the minimum fare on the card. A touch-in while a
    /// journey is already open charges the penalty fare for the abandoned
    /// trip, discards it unrecorded, and opens a fresh journey at
    /// `station`.
    pub fn touch_in(
        &mut self,
        station: Station,
        at: DateTime<Utc>,
    ) -> Result<TouchIn, CardError> {
        if self.balance < self.fares.minimum_fare {
            return Err(CardError::InsufficientFunds {
                balance: self.balance,
                minimum_fare: self.fares.minimum_fare,
            });
        }

        let outcome = match self.state {
            CardState::InJourney => {
                self.balance -= self.fares.penalty_fare;
                self.journey_log.take_current();
                TouchIn::PenaltyStarted {
                    penalty: self.fares.penalty_fare,
                }
            }
            CardState::NotInJourney => TouchIn::Started,
        };

        self.journey_log.begin(Journey::start(station, at));
        self.state = CardState::InJourney;
        Ok(outcome)
    }

    /// Present the card at an exit gate.
    ///
    /// Closes the open journey, deducts its fare and records it. A
    /// touch-out with no open journey charges the penalty fare and records
    /// nothing. Either deduction may leave the balance negative.
    pub fn touch_out(&mut self, station: Station, at: DateTime<Utc>) -> TouchOut {
        match self.state {
            CardState::NotInJourney => {
                self.balance -= self.fares.penalty_fare;
                TouchOut::Penalty {
                    penalty: self.fares.penalty_fare,
                }
            }
            CardState::InJourney => {
                let journey = self
                    .journey_log
                    .take_current()
                    .expect("a card in journey always holds an open journey");
                let completed = journey.complete(station, at, &self.fares);

                self.balance -= completed.fare;
                self.journey_log.record(completed.clone());
                self.state = CardState::NotInJourney;
                TouchOut::Completed(completed)
            }
        }
    }
}
