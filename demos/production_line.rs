use log::{debug, info};
use prodsim::{
    run_replications, Admission, ConcurrencyMode, Event, EventHandler, EventProcessor, Machine, MachineType,
    Product, ProductType, ReplicationConfig, SampledDuration, ServiceTimes, SimResult, SimTime,
    SimulationConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use std::collections::VecDeque;

/// Configuration for the production line demo
#[derive(Debug, Clone)]
struct LineConfig {
    machines: usize,
    mean_interarrival: SimTime,
    mean_service_time: SimTime,
    /// Machine 0 is down during this window every run
    maintenance: Option<(SimTime, SimTime)>,
    /// Clock time at which the simulated day starts, for hour-of-day reporting
    shift_offset: SimTime,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            machines: 3,
            mean_interarrival: 60.0,
            mean_service_time: 160.0,
            maintenance: Some((4.0 * 3600.0, 5.0 * 3600.0)),
            shift_offset: 6.0 * 3600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineEvent {
    Arrival,
    Completed { machine: usize },
    Maintenance { machine: usize },
    BackOnline { machine: usize },
}

struct ProductionLine {
    machines: Vec<Machine>,
    queue: VecDeque<Product>,
    sink: Vec<Product>,
    service_times: ServiceTimes,
    product_type: ProductType,
}

impl ProductionLine {
    fn new(config: &LineConfig, seed: u64) -> SimResult<Self> {
        let product_type = ProductType::new("part");
        let machine_type = MachineType::new("press");
        Ok(Self {
            machines: (0..config.machines)
                .map(|i| Machine::new(format!("press-{}", i), machine_type.clone()))
                .collect(),
            queue: VecDeque::new(),
            sink: Vec::new(),
            service_times: ServiceTimes::new().with(
                product_type.clone(),
                SampledDuration::exponential(config.mean_service_time, seed ^ 0x5eed)?,
            ),
            product_type,
        })
    }

    /// Hand queued products to every machine that will take one
    fn dispatch_queue(&mut self, processor: &mut EventProcessor<LineEvent>) -> SimResult<()> {
        let now = processor.current_time();
        for index in 0..self.machines.len() {
            let Some(product) = self.queue.pop_front() else {
                break;
            };
            let machine = &mut self.machines[index];
            match machine.give(product) {
                Admission::Accepted => {
                    let machine_type = machine.machine_type().clone();
                    let station = machine.name().to_string();
                    if let Some(product) = machine.product_mut() {
                        product.set_queue_time(now - product.arrival_time()?)?;
                        product.set_serviced_by(machine_type)?;
                        product.stamp(now, "production started", station);
                        let duration = product.time_in_production(&mut self.service_times)?;
                        processor.schedule_in(duration, LineEvent::Completed { machine: index });
                    }
                }
                Admission::Rejected(product) => self.queue.push_front(product),
            }
        }
        Ok(())
    }
}

impl EventHandler<LineEvent> for ProductionLine {
    fn handle(&mut self, processor: &mut EventProcessor<LineEvent>, event: LineEvent) -> SimResult<()> {
        let now = processor.current_time();
        match event {
            LineEvent::Arrival => {
                let mut product = Product::new(self.product_type.clone());
                product.set_arrival_time(now)?;
                product.stamp(now, "arrival", "source");
                self.queue.push_back(product);
            }
            LineEvent::Completed { machine } => {
                let machine = &mut self.machines[machine];
                if let Some(mut product) = machine.set_idle() {
                    product.stamp(now, "production complete", machine.name());
                    self.sink.push(product);
                }
            }
            LineEvent::Maintenance { machine } => {
                debug!("t={:.0} {} down for maintenance", now, self.machines[machine].name());
                self.machines[machine].disable();
            }
            LineEvent::BackOnline { machine } => {
                debug!("t={:.0} {} back online", now, self.machines[machine].name());
                self.machines[machine].enable();
            }
        }
        self.dispatch_queue(processor)
    }
}

#[derive(Debug)]
struct RunReport {
    seed: u64,
    completed: usize,
    still_queued: usize,
    mean_queue_time: SimTime,
    busiest_hour: usize,
}

fn simulate(line_config: &LineConfig, sim_config: &SimulationConfig, seed: u64) -> SimResult<RunReport> {
    let mut processor = EventProcessor::new(sim_config.clone())?;

    // Pre-generate the whole day's arrivals; one resort at the first removal
    let mut rng = StdRng::seed_from_u64(seed);
    let interarrival = Exp::new(1.0 / line_config.mean_interarrival)
        .map_err(|e| prodsim::SimulationError::InvalidConfig(e.to_string()))?;
    let mut t = interarrival.sample(&mut rng);
    while t < sim_config.max_runtime {
        processor.add_event(Event::new(t, LineEvent::Arrival));
        t += interarrival.sample(&mut rng);
    }
    if let Some((down, up)) = line_config.maintenance {
        processor.add_event(Event::new(down, LineEvent::Maintenance { machine: 0 }));
        processor.add_event(Event::new(up, LineEvent::BackOnline { machine: 0 }));
    }

    let mut line = ProductionLine::new(line_config, seed)?;
    processor.start(&mut line)?;

    let queue_times = line
        .sink
        .iter()
        .map(|p| p.queue_time())
        .collect::<SimResult<Vec<_>>>()?;
    let mean_queue_time = if queue_times.is_empty() {
        0.0
    } else {
        queue_times.iter().sum::<SimTime>() / queue_times.len() as SimTime
    };

    let mut per_hour = [0usize; 24];
    for product in &line.sink {
        if let Some(done) = product.times().last() {
            let clock = Product::back_track_time_for_analysis(done - line_config.shift_offset, sim_config.max_runtime);
            per_hour[((clock / 3600.0) as usize).min(23)] += 1;
        }
    }
    let busiest_hour = per_hour
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count)
        .map(|(hour, _)| hour)
        .unwrap_or(0);

    Ok(RunReport {
        seed,
        completed: line.sink.len(),
        still_queued: line.queue.len(),
        mean_queue_time,
        busiest_hour,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let line_config = LineConfig::default();
    let sim_config = SimulationConfig::new().with_debug(true);
    let replications = ReplicationConfig::new(8)
        .with_base_seed(42)
        .with_concurrency(ConcurrencyMode::Rayon);

    info!("Line configuration: {:?}", line_config);
    info!("Simulation configuration: {:?}", sim_config);

    let reports = run_replications(&replications, |_, seed| simulate(&line_config, &sim_config, seed))?;

    println!("{:>6} {:>10} {:>8} {:>16} {:>13}", "seed", "completed", "queued", "mean queue [s]", "busiest hour");
    for report in &reports {
        println!(
            "{:>6} {:>10} {:>8} {:>16.1} {:>13}",
            report.seed, report.completed, report.still_queued, report.mean_queue_time, report.busiest_hour
        );
    }

    Ok(())
}
