//! Threaded simulation run loop: pacing, pause/terminate (spec §5).

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compute::SimulationState;
use crate::schema::SimulationConfig;

use super::messages::{SimulationCommand, SimulationResponse};

/// Minimum inter-step delay for real-time pacing: `max(16ms, 1000/speed)`
/// (spec §5).
fn step_interval(speed: u32) -> Duration {
    let ms = (1000 / speed.max(1)).max(16);
    Duration::from_millis(ms as u64)
}

/// Spawns one `std::thread` owning a `SimulationState`, communicating with
/// its collaborator only via the channels returned here (spec §5: no
/// shared mutable state crosses worker boundaries).
pub struct SimulationWorker {
    commands: Sender<SimulationCommand>,
    responses: Receiver<SimulationResponse>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationWorker {
    pub fn spawn() -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::spawn(move || worker_loop(command_rx, response_tx));

        Self {
            commands: command_tx,
            responses: response_rx,
            handle: Some(handle),
        }
    }

    pub fn send(&self, command: SimulationCommand) {
        let _ = self.commands.send(command);
    }

    pub fn recv(&self) -> Option<SimulationResponse> {
        self.responses.recv().ok()
    }

    pub fn try_recv(&self) -> Option<SimulationResponse> {
        self.responses.try_recv().ok()
    }
}

impl Drop for SimulationWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(SimulationCommand::Terminate);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(commands: Receiver<SimulationCommand>, responses: Sender<SimulationResponse>) {
    let mut state: Option<SimulationState> = None;

    while let Ok(command) = commands.recv() {
        match command {
            SimulationCommand::Init { config, seed } => {
                state = build_state(config, seed);
                info!("simulation worker initialized");
                let _ = responses.send(SimulationResponse::Ready);
            }
            SimulationCommand::Step => {
                if let Some(state) = state.as_mut() {
                    let frame = state.step();
                    debug!("step -> generation {}", frame.stats.generation);
                    let _ = responses.send(SimulationResponse::Frame(frame));
                }
            }
            SimulationCommand::Run { speed } => {
                if let Some(state) = state.as_mut() {
                    run_until_paused(state, speed, &commands, &responses);
                }
            }
            SimulationCommand::Pause => {
                // A bare pause outside a `Run` loop is a no-op; pausing
                // an active run is handled inside `run_until_paused`.
            }
            SimulationCommand::Randomize { density } => {
                if let Some(state) = state.as_mut() {
                    let mut rng = StdRng::from_entropy();
                    state.randomize(density, &mut rng);
                }
            }
            SimulationCommand::Load { cells } => {
                if let Some(state) = state.as_mut() {
                    state.apply_seed(&cells);
                }
            }
            SimulationCommand::Benchmark { duration_ms } => {
                if let Some(state) = state.as_mut() {
                    let rate = benchmark(state, duration_ms);
                    let _ = responses.send(SimulationResponse::Benchmark {
                        generations_per_second: rate,
                    });
                }
            }
            SimulationCommand::Terminate => {
                info!("simulation worker terminating");
                state = None;
                break;
            }
        }
    }
}

fn build_state(config: SimulationConfig, seed: Option<Vec<u8>>) -> Option<SimulationState> {
    match seed {
        Some(bytes) => {
            let mut bytes = bytes;
            let mut init = move |cells: &mut [u8]| {
                let n = bytes.len().min(cells.len());
                cells[..n].copy_from_slice(&bytes[..n]);
                bytes.clear();
            };
            SimulationState::new(config, Some(&mut init)).ok()
        }
        None => SimulationState::new(config, None).ok(),
    }
    .or_else(|| {
        warn!("rejected invalid simulation config at init");
        None
    })
}

fn run_until_paused(
    state: &mut SimulationState,
    speed: u32,
    commands: &Receiver<SimulationCommand>,
    responses: &Sender<SimulationResponse>,
) {
    let interval = step_interval(speed);
    loop {
        if state.terminated() {
            break;
        }
        let frame = state.step();
        if responses.send(SimulationResponse::Frame(frame)).is_err() {
            break;
        }

        let deadline = Instant::now() + interval;
        while Instant::now() < deadline {
            match commands.try_recv() {
                Ok(SimulationCommand::Pause) => return,
                Ok(SimulationCommand::Terminate) => {
                    // Re-queue isn't available on mpsc; treat as an
                    // immediate stop of the run loop only.
                    return;
                }
                _ => thread::sleep(Duration::from_millis(1)),
            }
        }
    }
}

fn benchmark(state: &mut SimulationState, duration_ms: u64) -> f64 {
    let budget = Duration::from_millis(duration_ms);
    let start = Instant::now();
    let mut steps = 0u64;
    while start.elapsed() < budget {
        if state.terminated() {
            break;
        }
        state.step();
        steps += 1;
    }
    let elapsed = start.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        steps as f64 / elapsed
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Lattice, Rule};

    fn config() -> SimulationConfig {
        SimulationConfig {
            lattice: Lattice::Square,
            width: 10,
            height: 10,
            rule: Rule::default_for(Lattice::Square),
            toroidal: true,
            max_period: 50,
        }
    }

    #[test]
    fn init_then_step_round_trips_through_channels() {
        let worker = SimulationWorker::spawn();
        worker.send(SimulationCommand::Init {
            config: config(),
            seed: None,
        });
        assert!(matches!(worker.recv(), Some(SimulationResponse::Ready)));

        worker.send(SimulationCommand::Step);
        match worker.recv() {
            Some(SimulationResponse::Frame(frame)) => assert_eq!(frame.stats.generation, 1),
            other => panic!("expected a frame, got {other:?}"),
        }
    }

    #[test]
    fn benchmark_reports_a_positive_rate() {
        let worker = SimulationWorker::spawn();
        worker.send(SimulationCommand::Init {
            config: config(),
            seed: None,
        });
        worker.recv();

        worker.send(SimulationCommand::Benchmark { duration_ms: 20 });
        match worker.recv() {
            Some(SimulationResponse::Benchmark {
                generations_per_second,
            }) => assert!(generations_per_second >= 0.0),
            other => panic!("expected a benchmark response, got {other:?}"),
        }
    }

    #[test]
    fn step_interval_respects_minimum() {
        assert_eq!(step_interval(1000), Duration::from_millis(16));
        assert_eq!(step_interval(1), Duration::from_millis(1000));
    }
}
