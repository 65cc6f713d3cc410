use super::{CompletedJourney, Journey};

/// The card's record of travel: at most one open journey plus the ordered
/// history of completed trips, oldest first. History is append-only.
#[derive(Debug, Clone, Default)]
pub struct JourneyLog {
    current: Option<Journey>,
    history: Vec<CompletedJourney>,
}

impl JourneyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The in-progress journey, if a touch-in is outstanding.
    pub fn journey(&self) -> Option<&Journey> {
        self.current.as_ref()
    }

    /// Completed journeys, oldest first.
    pub fn journey_history(&self) -> &[CompletedJourney] {
        &self.history
    }

    /// Open a new journey, returning any journey it displaced. The caller
    /// decides how to charge a displaced journey; it is never recorded.
    pub(crate) fn begin(&mut self, journey: Journey) -> Option<Journey> {
        self.current.replace(journey)
    }

    /// Take the open journey out of the log, if any.
    pub(crate) fn take_current(&mut self) -> Option<Journey> {
        self.current.take()
    }

    /// Append a completed journey snapshot.
    pub(crate) fn record(&mut self, journey: CompletedJourney) {
        self.history.push(journey);
    }
}
