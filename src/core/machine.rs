use super::product::Product;
use super::types::MachineType;

/// Outcome of offering a product to a machine
#[derive(Debug)]
pub enum Admission {
    Accepted,
    /// The machine was busy or disabled; the product is handed back untouched
    Rejected(Product),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }

    /// The rejected product, if any
    pub fn into_rejected(self) -> Option<Product> {
        match self {
            Admission::Accepted => None,
            Admission::Rejected(product) => Some(product),
        }
    }
}

/// A station that processes one product at a time.
///
/// While busy the machine exclusively owns its current product; releasing
/// it with [`set_idle`](Self::set_idle) moves ownership back to the caller,
/// so a product can never be in progress on two machines at once.
#[derive(Debug)]
pub struct Machine {
    name: String,
    machine_type: MachineType,
    product: Option<Product>,
    idle: bool,
    operational: bool,
}

impl Machine {
    /// New machines start idle and operational
    pub fn new(name: impl Into<String>, machine_type: MachineType) -> Self {
        Self {
            name: name.into(),
            machine_type,
            product: None,
            idle: true,
            operational: true,
        }
    }

    /// Offer a product. Accepted only when idle and operational.
    pub fn give(&mut self, product: Product) -> Admission {
        if self.is_idle() && self.is_operational() {
            self.product = Some(product);
            self.set_busy();
            Admission::Accepted
        } else {
            Admission::Rejected(product)
        }
    }

    /// Release the current product (if any) and become idle
    pub fn set_idle(&mut self) -> Option<Product> {
        self.idle = true;
        self.product.take()
    }

    /// Mark busy without touching product ownership
    pub fn set_busy(&mut self) {
        self.idle = false;
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn is_busy(&self) -> bool {
        !self.idle
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn enable(&mut self) {
        self.operational = true;
    }

    /// Stop accepting new products. In-progress work stays on the machine
    /// and completes normally.
    pub fn disable(&mut self) {
        self.operational = false;
    }

    /// Stop accepting new products and abort in-progress work, handing the
    /// product back so domain logic can requeue or discard it.
    pub fn disable_and_evict(&mut self) -> Option<Product> {
        self.disable();
        self.set_idle()
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn product_mut(&mut self) -> Option<&mut Product> {
        self.product.as_mut()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn machine_type(&self) -> &MachineType {
        &self.machine_type
    }
}
