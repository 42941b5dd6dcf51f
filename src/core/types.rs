use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulation clock value. Seconds by convention, never negative on the clock itself.
pub type SimTime = f64;

/// Category of a machine (e.g. which kind of work it can service)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MachineType(String);

impl MachineType {
    /// Create a machine type from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the raw name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MachineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a product; keys the service-time registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductType(String);

impl ProductType {
    /// Create a product type from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the raw name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identity of a product instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip_through_display() {
        let machine = MachineType::new("assembly");
        let product = ProductType::new("widget");
        assert_eq!(machine.name(), "assembly");
        assert_eq!(product.to_string(), "widget");
    }

    #[test]
    fn test_product_ids_are_unique() {
        assert_ne!(ProductId::new(), ProductId::new());
    }
}
