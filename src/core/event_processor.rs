use super::errors::{SimResult, SimulationError};
use super::event::{Event, EventKind};
use super::event_queue::EventQueue;
use super::execution::config::SimulationConfig;
use super::types::SimTime;
use log::{debug, info, warn};

/// Domain logic invoked for every non-stop event.
///
/// Handlers may mutate their own machines and products, enqueue further
/// events through [`EventProcessor::add_event`] and request a stop with
/// [`EventProcessor::stop`]. An error aborts the run and is returned from
/// [`EventProcessor::start`].
pub trait EventHandler<E> {
    fn handle(&mut self, processor: &mut EventProcessor<E>, payload: E) -> SimResult<()>;
}

impl<E, F> EventHandler<E> for F
where
    F: FnMut(&mut EventProcessor<E>, E) -> SimResult<()>,
{
    fn handle(&mut self, processor: &mut EventProcessor<E>, payload: E) -> SimResult<()> {
        self(processor, payload)
    }
}

/// Observer trait for simulation progress
pub trait SimulationObserver {
    /// Called when the simulation clock advances
    fn on_clock_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called once when the run loop exits
    fn on_stop(&mut self, current_time: SimTime, remaining_events: usize);
}

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
}

/// The kernel: owns the event queue and the simulation clock for one run
pub struct EventProcessor<E> {
    events: EventQueue<E>,
    current_time: SimTime,
    stop_flag: bool,
    state: RunState,
    events_dispatched: u64,
    config: SimulationConfig,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl<E> EventProcessor<E> {
    /// Create a processor for one run; the configuration is validated up front
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            events: EventQueue::new(),
            current_time: 0.0,
            stop_flag: false,
            state: RunState::Idle,
            events_dispatched: 0,
            config,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    fn notify_clock_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_clock_advance(old_time, new_time);
        }
    }

    fn notify_stop(&mut self) {
        let remaining = self.events.count();
        for observer in &mut self.observers {
            observer.on_stop(self.current_time, remaining);
        }
    }

    /// Enqueue an event without ordering it; order is restored on the next removal
    pub fn add_event(&mut self, event: Event<E>) {
        self.events.add_unsorted(event);
    }

    /// Enqueue an event keeping the queue ordered immediately
    pub fn add_event_sorted(&mut self, event: Event<E>) {
        self.events.add_sorted(event);
    }

    /// Schedule a domain event `delay` after the current time
    pub fn schedule_in(&mut self, delay: SimTime, payload: E) {
        let at = self.current_time + delay.max(0.0);
        self.add_event(Event::new(at, payload));
    }

    /// Request the run loop to halt after the event currently being dispatched
    pub fn stop(&mut self) {
        self.stop_flag = true;
    }

    /// Run until the queue empties, a stop is requested or the max-runtime
    /// stop event fires.
    ///
    /// Precondition violations raised by the handler end the run immediately
    /// and are returned unchanged.
    pub fn start<H>(&mut self, handler: &mut H) -> SimResult<()>
    where
        H: EventHandler<E> + ?Sized,
    {
        if self.state == RunState::Running {
            return Err(SimulationError::AlreadyRunning);
        }
        self.state = RunState::Running;
        self.stop_flag = false;
        // A run halted by stop() leaves its stop event queued
        self.events.retain(|event| !event.is_stop());
        self.events
            .add_sorted(Event::simulation_stopped(self.config.max_runtime));

        info!(
            "Starting simulation with {} event(s) queued, max runtime {}",
            self.events.count(),
            self.config.max_runtime
        );

        let result = self.run_loop(handler);
        self.state = RunState::Stopped;
        self.notify_stop();

        info!(
            "Simulation stopped at t={} after {} dispatched event(s)",
            self.current_time, self.events_dispatched
        );
        if let Some(report) = self.remaining_events_report() {
            info!("{}", report);
        }
        result
    }

    /// Diagnostic line about unconsumed events; only produced in debug mode
    /// and only when events are left over
    pub fn remaining_events_report(&self) -> Option<String> {
        if self.config.debug && !self.events.is_empty() {
            Some(format!(
                "Stopped simulation with {} event(s) remaining.",
                self.events.count()
            ))
        } else {
            None
        }
    }

    fn run_loop<H>(&mut self, handler: &mut H) -> SimResult<()>
    where
        H: EventHandler<E> + ?Sized,
    {
        while !self.events.is_empty() && !self.stop_flag {
            let Some(event) = self.events.remove_first() else {
                break;
            };

            let old_time = self.current_time;
            let execution_time = event.execution_time();
            if execution_time < old_time {
                warn!(
                    "Event scheduled at {} dispatched after clock reached {}; clock held",
                    execution_time, old_time
                );
            } else {
                self.current_time = execution_time;
            }
            if old_time != self.current_time {
                self.notify_clock_advance(old_time, self.current_time);
            }
            self.events_dispatched += 1;

            match event.into_kind() {
                EventKind::SimulationStopped => {
                    debug!("t={} simulation stop event", self.current_time);
                    self.stop();
                }
                EventKind::Domain(payload) => {
                    debug!("t={} dispatching domain event", self.current_time);
                    handler.handle(self, payload)?;
                }
            }
        }
        Ok(())
    }

    /// Clock value as of the last dispatched event; zero before the first
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag
    }

    /// Events still queued (meaningful after a run stops)
    pub fn remaining_events(&self) -> usize {
        self.events.count()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Total events removed and dispatched, stop events included
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Discard pending events and rewind the clock for a fresh run
    pub fn reset(&mut self) {
        self.events.clear();
        self.current_time = 0.0;
        self.stop_flag = false;
        self.state = RunState::Idle;
        self.events_dispatched = 0;
    }
}

impl<E> std::fmt::Debug for EventProcessor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventProcessor")
            .field("current_time", &self.current_time)
            .field("state", &self.state)
            .field("pending_events", &self.events.count())
            .field("events_dispatched", &self.events_dispatched)
            .field("config", &self.config)
            .finish()
    }
}
