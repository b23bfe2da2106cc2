//! Threaded GA run loop with cancellation (spec §5).

use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::info;

use crate::compute::evolution::EvolutionEngine;

use super::messages::{EvolutionCommand, EvolutionResponse};

/// Spawns one `std::thread` per GA run, mirroring
/// [`super::simulation_worker::SimulationWorker`]'s channel-only boundary.
pub struct EvolutionWorker {
    commands: Sender<EvolutionCommand>,
    responses: Receiver<EvolutionResponse>,
    handle: Option<JoinHandle<()>>,
}

impl EvolutionWorker {
    pub fn spawn(run_seed: u64) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::spawn(move || worker_loop(command_rx, response_tx, run_seed));

        Self {
            commands: command_tx,
            responses: response_rx,
            handle: Some(handle),
        }
    }

    pub fn send(&self, command: EvolutionCommand) {
        let _ = self.commands.send(command);
    }

    pub fn recv(&self) -> Option<EvolutionResponse> {
        self.responses.recv().ok()
    }
}

impl Drop for EvolutionWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(EvolutionCommand::Cancel);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(commands: Receiver<EvolutionCommand>, responses: Sender<EvolutionResponse>, seed: u64) {
    while let Ok(command) = commands.recv() {
        match command {
            EvolutionCommand::Run { config, options } => {
                let mut engine = EvolutionEngine::new(config, options, seed);
                let cancel = engine.cancel_handle();

                // Drain any cancel requests that arrive while this run is
                // in progress without blocking the GA loop itself.
                let commands_during_run = &commands;
                let result = engine.run(|progress| {
                    let _ = responses.send(EvolutionResponse::Progress(progress.clone()));
                    if let Ok(EvolutionCommand::Cancel) = commands_during_run.try_recv() {
                        cancel.store(true, Ordering::Relaxed);
                    }
                });

                if let Some(result) = result {
                    info!("ga run complete: best_fitness={:.2}", result.best_fitness);
                    let _ = responses.send(EvolutionResponse::Result(result));
                } else {
                    info!("ga run cancelled, no result emitted");
                }
            }
            EvolutionCommand::Cancel => {
                // No run in progress; nothing to cancel.
            }
        }
    }
}
