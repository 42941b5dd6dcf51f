pub mod errors;
pub mod event;
pub mod event_processor;
pub mod event_queue;
pub mod execution;
pub mod machine;
pub mod product;
pub mod service_time;
pub mod types;
