pub mod core;

// Re-export commonly used types
pub use crate::core::errors::{SimResult, SimulationError};
pub use crate::core::event::{Event, EventKind};
pub use crate::core::event_processor::{EventHandler, EventProcessor, RunState, SimulationObserver};
pub use crate::core::event_queue::EventQueue;
pub use crate::core::execution::{run_replications, ConcurrencyMode, ReplicationConfig, SimulationConfig};
pub use crate::core::machine::{Admission, Machine};
pub use crate::core::product::{Product, Stamp};
pub use crate::core::service_time::{DurationSampler, FixedDuration, SampledDuration, ServiceTimes};
pub use crate::core::types::{MachineType, ProductId, ProductType, SimTime};
