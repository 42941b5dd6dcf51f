pub mod config;
pub mod replication;

// Re-export commonly used types
pub use config::{ConcurrencyMode, ReplicationConfig, SimulationConfig};
pub use replication::run_replications;
