use prodsim::{
    run_replications, Admission, ConcurrencyMode, Event, EventHandler, EventProcessor, Machine, MachineType,
    Product, ProductType, ReplicationConfig, SampledDuration, ServiceTimes, SimResult, SimTime,
    SimulationConfig, SimulationError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Job {
    Arrive,
    Finish,
}

/// Minimal single-server station used across the tests below
struct Station {
    machine: Machine,
    waiting: Vec<Product>,
    done: Vec<Product>,
    service_times: ServiceTimes,
}

impl Station {
    fn new(service_times: ServiceTimes) -> Self {
        Self {
            machine: Machine::new("cell-1", MachineType::new("cell")),
            waiting: Vec::new(),
            done: Vec::new(),
            service_times,
        }
    }

    fn try_start(&mut self, processor: &mut EventProcessor<Job>) -> SimResult<()> {
        if self.waiting.is_empty() {
            return Ok(());
        }
        let product = self.waiting.remove(0);
        match self.machine.give(product) {
            Admission::Accepted => {
                let now = processor.current_time();
                if let Some(product) = self.machine.product_mut() {
                    product.set_queue_time(now - product.arrival_time()?)?;
                    let duration = product.time_in_production(&mut self.service_times)?;
                    processor.schedule_in(duration, Job::Finish);
                }
            }
            Admission::Rejected(product) => self.waiting.insert(0, product),
        }
        Ok(())
    }
}

impl EventHandler<Job> for Station {
    fn handle(&mut self, processor: &mut EventProcessor<Job>, job: Job) -> SimResult<()> {
        let now = processor.current_time();
        match job {
            Job::Arrive => {
                let mut product = Product::new(ProductType::new("order"));
                product.set_arrival_time(now)?;
                product.stamp(now, "arrival", "inbound");
                self.waiting.push(product);
            }
            Job::Finish => {
                if let Some(mut product) = self.machine.set_idle() {
                    product.stamp(now, "finished", "cell-1");
                    self.done.push(product);
                }
            }
        }
        self.try_start(processor)
    }
}

#[test]
fn test_mixed_seed_dispatch_order() {
    let mut processor = EventProcessor::new(SimulationConfig::new().with_max_runtime(100.0).with_debug(true)).unwrap();
    for (time, label) in [(5.0, "a"), (3.0, "b"), (3.0, "c"), (10.0, "d")] {
        processor.add_event(Event::new(time, label));
    }

    let mut order = Vec::new();
    processor
        .start(&mut |p: &mut EventProcessor<&'static str>, label: &'static str| -> SimResult<()> {
            order.push((p.current_time(), label));
            Ok(())
        })
        .unwrap();

    assert_eq!(order, vec![(3.0, "b"), (3.0, "c"), (5.0, "a"), (10.0, "d")]);
    assert_eq!(processor.current_time(), 100.0);
    assert_eq!(processor.remaining_events(), 0);
}

#[test]
fn test_machine_admission_scenario() {
    let mut machine = Machine::new("m", MachineType::new("generic"));
    let a = Product::new(ProductType::new("x"));
    let a_id = a.id();

    assert!(machine.give(a).is_accepted());
    assert!(!machine.is_idle());

    let b = Product::new(ProductType::new("x"));
    assert!(!machine.give(b).is_accepted());
    assert_eq!(machine.product().map(|p| p.id()), Some(a_id));

    machine.set_idle();
    assert!(machine.is_idle());
    assert!(machine.product().is_none());
}

#[test]
fn test_back_track_time_for_analysis_scenario() {
    let runtime = SimulationConfig::new().with_max_runtime(1000.0).max_runtime;
    assert_eq!(Product::back_track_time_for_analysis(-200.0, runtime), 800.0);
    assert_eq!(Product::back_track_time_for_analysis(-1200.0, runtime), 800.0);
}

#[test]
fn test_station_run_with_sampled_service_times() {
    let service_times = ServiceTimes::new().with(
        ProductType::new("order"),
        SampledDuration::exponential(8.0, 42).unwrap(),
    );
    let mut processor = EventProcessor::new(SimulationConfig::new().with_max_runtime(500.0)).unwrap();
    let mut t = 0.0;
    while t < 500.0 {
        processor.add_event(Event::new(t, Job::Arrive));
        t += 10.0;
    }
    let mut station = Station::new(service_times);

    processor.start(&mut station).unwrap();

    assert!(!station.done.is_empty());
    for product in &station.done {
        let times = product.times();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(product.queue_time().unwrap() >= 0.0);
        assert!(product.production_time().unwrap() >= 0.0);
    }
}

#[test]
fn test_write_once_violation_aborts_run() {
    let mut processor = EventProcessor::new(SimulationConfig::new().with_max_runtime(10.0)).unwrap();
    processor.add_event(Event::new(1.0, ()));
    processor.add_event(Event::new(2.0, ()));

    let mut product = Product::new(ProductType::new("x"));
    let result = processor.start(&mut |p: &mut EventProcessor<()>, _: ()| -> SimResult<()> {
        product.set_arrival_time(p.current_time())
    });

    assert_eq!(
        result,
        Err(SimulationError::FieldAlreadySet { field: "arrival time" })
    );
    assert_eq!(processor.current_time(), 2.0);
    assert_eq!(product.arrival_time().unwrap(), 1.0);
}

fn replicate(seed: u64) -> SimResult<Vec<SimTime>> {
    let service_times = ServiceTimes::new().with(
        ProductType::new("order"),
        SampledDuration::uniform(2.0, 12.0, seed)?,
    );
    let mut processor = EventProcessor::new(SimulationConfig::new().with_max_runtime(200.0))?;
    for i in 0..20 {
        processor.add_event(Event::new(i as SimTime * 9.0, Job::Arrive));
    }
    let mut station = Station::new(service_times);
    processor.start(&mut station)?;
    station.done.iter().map(|p| p.queue_time()).collect()
}

#[test]
fn test_parallel_replications_are_independent_and_reproducible() {
    let sequential = ReplicationConfig::new(6).with_base_seed(1234);
    let parallel = sequential
        .clone()
        .with_concurrency(ConcurrencyMode::Rayon)
        .with_thread_pool_size(3);

    let a = run_replications(&sequential, |_, seed| replicate(seed)).unwrap();
    let b = run_replications(&parallel, |_, seed| replicate(seed)).unwrap();

    assert_eq!(a.len(), 6);
    assert_eq!(a, b);
}
