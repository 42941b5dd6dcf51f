use super::errors::{SimResult, SimulationError};
use super::service_time::ServiceTimes;
use super::types::{MachineType, ProductId, ProductType, SimTime};

/// One entry of a product's trace
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub time: SimTime,
    pub event: String,
    pub station: String,
}

/// A value that may be assigned exactly once
#[derive(Debug, Clone, PartialEq)]
struct WriteOnce<T> {
    field: &'static str,
    value: Option<T>,
}

impl<T> WriteOnce<T> {
    fn new(field: &'static str) -> Self {
        Self { field, value: None }
    }

    fn set(&mut self, value: T) -> SimResult<()> {
        if self.value.is_some() {
            return Err(SimulationError::FieldAlreadySet { field: self.field });
        }
        self.value = Some(value);
        Ok(())
    }

    fn get(&self) -> SimResult<&T> {
        self.value
            .as_ref()
            .ok_or(SimulationError::FieldNotInitialized { field: self.field })
    }

    fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// An item flowing through the system.
///
/// Derived metrics (serviced-by, production time, queue time, arrival time)
/// are write-once: a second assignment is reported as
/// [`SimulationError::FieldAlreadySet`]. Once a product reaches a sink it is
/// a read-only record for analysis.
#[derive(Debug)]
pub struct Product {
    id: ProductId,
    product_type: ProductType,
    serviced_by: WriteOnce<MachineType>,
    production_time: WriteOnce<SimTime>,
    queue_time: WriteOnce<SimTime>,
    additional_queue_time: SimTime,
    arrival_time: WriteOnce<SimTime>,
    trace: Vec<Stamp>,
}

impl Product {
    pub fn new(product_type: ProductType) -> Self {
        Self {
            id: ProductId::new(),
            product_type,
            serviced_by: WriteOnce::new("serviced by"),
            production_time: WriteOnce::new("production time"),
            queue_time: WriteOnce::new("queue time"),
            additional_queue_time: 0.0,
            arrival_time: WriteOnce::new("arrival time"),
            trace: Vec::new(),
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn product_type(&self) -> &ProductType {
        &self.product_type
    }

    pub fn set_serviced_by(&mut self, machine_type: MachineType) -> SimResult<()> {
        self.serviced_by.set(machine_type)
    }

    /// Machine type that serviced this product
    pub fn serviced_by(&self) -> SimResult<&MachineType> {
        self.serviced_by
            .get()
            .map_err(|_| SimulationError::NotServiced)
    }

    pub fn has_serviced_by(&self) -> bool {
        self.serviced_by.is_set()
    }

    pub fn set_production_time(&mut self, time: SimTime) -> SimResult<()> {
        self.production_time.set(time)
    }

    /// Production time, sampling and caching one on first read when it was never set
    pub fn time_in_production(&mut self, service_times: &mut ServiceTimes) -> SimResult<SimTime> {
        if let Some(time) = self.production_time.value {
            return Ok(time);
        }
        let sampled = service_times.sample(&self.product_type)?;
        self.production_time.set(sampled)?;
        Ok(sampled)
    }

    /// Raw production time without sampling
    pub fn production_time(&self) -> Option<SimTime> {
        self.production_time.value
    }

    pub fn has_production_time(&self) -> bool {
        self.production_time.is_set()
    }

    pub fn set_queue_time(&mut self, time: SimTime) -> SimResult<()> {
        self.queue_time.set(time)
    }

    /// Initial queue time plus any additional queue time accumulated since
    pub fn queue_time(&self) -> SimResult<SimTime> {
        Ok(*self.queue_time.get()? + self.additional_queue_time)
    }

    pub fn has_queue_time(&self) -> bool {
        self.queue_time.is_set()
    }

    /// Add extra waiting (e.g. re-queueing); returns the new accumulated total.
    /// Negative durations are ignored so the accumulator never decreases.
    pub fn add_additional_queue_time(&mut self, duration: SimTime) -> SimTime {
        self.additional_queue_time += duration.max(0.0);
        self.additional_queue_time
    }

    pub fn additional_queue_time(&self) -> SimTime {
        self.additional_queue_time
    }

    pub fn set_arrival_time(&mut self, time: SimTime) -> SimResult<()> {
        self.arrival_time.set(time)
    }

    pub fn arrival_time(&self) -> SimResult<SimTime> {
        self.arrival_time.get().copied()
    }

    pub fn has_arrival_time(&self) -> bool {
        self.arrival_time.is_set()
    }

    /// Append one trace entry. Chronological order is the caller's responsibility.
    pub fn stamp(&mut self, time: SimTime, event: impl Into<String>, station: impl Into<String>) {
        self.trace.push(Stamp {
            time,
            event: event.into(),
            station: station.into(),
        });
    }

    pub fn trace(&self) -> &[Stamp] {
        &self.trace
    }

    pub fn times(&self) -> Vec<SimTime> {
        self.trace.iter().map(|s| s.time).collect()
    }

    pub fn events(&self) -> Vec<&str> {
        self.trace.iter().map(|s| s.event.as_str()).collect()
    }

    pub fn stations(&self) -> Vec<&str> {
        self.trace.iter().map(|s| s.station.as_str()).collect()
    }

    /// Wrap a negative time forward by whole runtime periods until it is
    /// non-negative. Times that belong to "yesterday" in a cyclic day-based
    /// run land on the same clock position today.
    pub fn back_track_time_for_analysis(time: SimTime, runtime: SimTime) -> SimTime {
        if !(runtime > 0.0) || !runtime.is_finite() || !time.is_finite() || time >= 0.0 {
            return time;
        }
        time.rem_euclid(runtime)
    }
}
