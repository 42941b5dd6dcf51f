use super::types::ProductType;
use thiserror::Error;

/// Errors raised by the kernel and by entity state machines.
///
/// Every variant is a precondition violation: a bug in the calling domain
/// logic. Recoverable outcomes (empty queue, busy machine) are plain return
/// values and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A write-once field was assigned a second time
    #[error("{field} is already set and can only be assigned once")]
    FieldAlreadySet { field: &'static str },
    /// A write-once field was read before it was assigned
    #[error("{field} has not been initialized")]
    FieldNotInitialized { field: &'static str },
    /// Service-type lookup on a product no machine has serviced
    #[error("product has not been serviced by any machine")]
    NotServiced,
    /// No duration generator registered for the product's type
    #[error("no service time distribution registered for product type '{product_type}'")]
    NoServiceTime { product_type: ProductType },
    /// `start()` re-entered while a run is in progress
    #[error("simulation is already running")]
    AlreadyRunning,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let err = SimulationError::FieldAlreadySet { field: "queue time" };
        assert_eq!(err.to_string(), "queue time is already set and can only be assigned once");

        let err = SimulationError::FieldNotInitialized { field: "arrival time" };
        assert!(err.to_string().contains("arrival time"));
    }

    #[test]
    fn test_missing_service_time_names_product_type() {
        let err = SimulationError::NoServiceTime {
            product_type: ProductType::new("widget"),
        };
        assert!(err.to_string().contains("'widget'"));
    }
}
