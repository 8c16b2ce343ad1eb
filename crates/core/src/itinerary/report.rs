use flightmap_common::Destination;

/// What happened at one stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The node answered with this info line
    Visited(String),
    /// The registry had no mapping, or never answered
    Unresolved,
    /// Resolved, but the visit itself failed
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub destination: Destination,
    pub outcome: SlotOutcome,
}

/// Per-stop results of one trip, in itinerary order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightReport {
    slots: Vec<Slot>,
}

impl FlightReport {
    pub(crate) fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Info lines of the stops that were visited, in order
    pub fn output_lines(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter_map(|slot| match &slot.outcome {
                SlotOutcome::Visited(info) => Some(info.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Overall verdict
    ///
    /// Unresolved names are reported ahead of failed visits, matching the
    /// order the trip runs in.
    pub fn status(&self) -> Result<(), ItineraryError> {
        let unresolved = self.collect(|outcome| matches!(outcome, SlotOutcome::Unresolved));
        if !unresolved.is_empty() {
            return Err(ItineraryError::Unresolved(unresolved));
        }

        let unreachable = self.collect(|outcome| matches!(outcome, SlotOutcome::Unreachable(_)));
        if !unreachable.is_empty() {
            return Err(ItineraryError::VisitFailed(unreachable));
        }

        Ok(())
    }

    fn collect(&self, pick: impl Fn(&SlotOutcome) -> bool) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| pick(&slot.outcome))
            .map(|slot| slot.destination.to_string())
            .collect()
    }
}

/// Itinerary failures
///
/// `RegistryRequired` and `RegistryUnreachable` stop the trip before any
/// visit; the other two are verdicts on a completed trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    #[error("A registry is required to resolve destination names")]
    RegistryRequired,

    #[error("Failed to connect to registry: {0}")]
    RegistryUnreachable(String),

    #[error("No registry entry for: {}", .0.join(", "))]
    Unresolved(Vec<String>),

    #[error("Failed to visit: {}", .0.join(", "))]
    VisitFailed(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(raw: &str, outcome: SlotOutcome) -> Slot {
        Slot {
            destination: Destination::parse(raw),
            outcome,
        }
    }

    #[test]
    fn test_output_skips_failed_slots() {
        let report = FlightReport::new(vec![
            slot("4000", SlotOutcome::Visited("Brisbane".to_string())),
            slot("4001", SlotOutcome::Unreachable("refused".to_string())),
            slot("MEL", SlotOutcome::Unresolved),
            slot("4002", SlotOutcome::Visited("Sydney".to_string())),
        ]);

        assert_eq!(report.output_lines(), ["Brisbane", "Sydney"]);
    }

    #[test]
    fn test_status_prefers_unresolved() {
        let report = FlightReport::new(vec![
            slot("4001", SlotOutcome::Unreachable("refused".to_string())),
            slot("MEL", SlotOutcome::Unresolved),
        ]);

        assert_eq!(
            report.status(),
            Err(ItineraryError::Unresolved(vec!["MEL".to_string()]))
        );
    }

    #[test]
    fn test_status_visit_failed() {
        let report = FlightReport::new(vec![
            slot("4000", SlotOutcome::Visited("Brisbane".to_string())),
            slot("4001", SlotOutcome::Unreachable("refused".to_string())),
        ]);

        assert_eq!(
            report.status(),
            Err(ItineraryError::VisitFailed(vec!["4001".to_string()]))
        );
    }

    #[test]
    fn test_empty_trip_succeeds() {
        assert_eq!(FlightReport::default().status(), Ok(()));
    }
}
