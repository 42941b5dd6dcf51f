use super::types::SimTime;

/// What an event does when dispatched.
///
/// The stop signal is the only kind the kernel handles itself; every other
/// kind is a domain event `E` routed to the run's [`EventHandler`](super::event_processor::EventHandler).
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind<E> {
    /// Halts the run loop once dispatched
    SimulationStopped,
    Domain(E),
}

/// Immutable record of a scheduled action
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    execution_time: SimTime,
    kind: EventKind<E>,
}

impl<E> Event<E> {
    /// Create a domain event firing at `execution_time`
    pub fn new(execution_time: SimTime, payload: E) -> Self {
        Self::with_kind(execution_time, EventKind::Domain(payload))
    }

    /// Create the privileged stop event
    pub fn simulation_stopped(execution_time: SimTime) -> Self {
        Self::with_kind(execution_time, EventKind::SimulationStopped)
    }

    pub fn with_kind(execution_time: SimTime, kind: EventKind<E>) -> Self {
        debug_assert!(
            execution_time >= 0.0,
            "event execution time must be non-negative, got {}",
            execution_time
        );
        Self {
            execution_time,
            kind,
        }
    }

    pub fn execution_time(&self) -> SimTime {
        self.execution_time
    }

    pub fn kind(&self) -> &EventKind<E> {
        &self.kind
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.kind, EventKind::SimulationStopped)
    }

    /// Consume the event, yielding its kind for dispatch
    pub fn into_kind(self) -> EventKind<E> {
        self.kind
    }
}
