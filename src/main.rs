//! CLI for running simulations and genetic searches for long-lived seeds.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use autoverse_ca::compute::evolution::EvolutionEngine;
use autoverse_ca::compute::SimulationState;
use autoverse_ca::schema::{GaConfig, GaOptions, SimulationConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "ga" => cmd_ga(&args[2..]),
        "info" => cmd_info(&args[2..]),
        "--example" => print_example_config(),
        "--help" | "-h" => print_usage(&args[0]),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Autoverse CA - Cellular Automaton Simulation and Methuselah Search");
    eprintln!();
    eprintln!("Usage: {program} <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <config.json> [steps] [seed.json]   Run a simulation");
    eprintln!("  ga <config.json> <options.json> [seed]  Run a genetic search");
    eprintln!("  info <config.json>                      Show configuration details");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --example                               Print example config/options");
    eprintln!("  --help, -h                               Show this help message");
}

fn cmd_run(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: autoverse-ca run <config.json> [steps] [seed.json]");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[0]);
    let steps: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
    let config: SimulationConfig = read_json(&config_path);
    let seed = args.get(2).map(|path| read_seed(&PathBuf::from(path)));

    println!("Autoverse CA Simulation");
    println!("=======================");
    print_config_info(&config);
    println!("Steps: {steps}");
    println!();

    let mut state = match seed {
        Some(bytes) => {
            let mut bytes = bytes;
            let mut init = move |cells: &mut [u8]| {
                let n = bytes.len().min(cells.len());
                cells[..n].copy_from_slice(&bytes[..n]);
                bytes.clear();
            };
            SimulationState::new(config, Some(&mut init))
        }
        None => SimulationState::new(config, None),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: invalid configuration: {e}");
        std::process::exit(1);
    });

    println!("Running simulation...");
    let start = Instant::now();
    let mut last_generation = 0;

    for i in 0..steps {
        if state.terminated() {
            break;
        }
        let frame = state.step();
        last_generation = frame.stats.generation;

        if (i + 1) % (steps / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Generation {}: population={}, {:.1} steps/s",
                frame.stats.generation, frame.stats.population, steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("Final generation: {last_generation}");
    if let Some(reason) = state.termination() {
        println!("Terminated: {reason:?}");
    } else {
        println!("Still running (reached step budget)");
    }
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        last_generation as f32 / elapsed.as_secs_f32()
    );
}

fn cmd_ga(args: &[String]) {
    if args.len() < 2 {
        eprintln!("Usage: autoverse-ca ga <config.json> <options.json> [seed]");
        std::process::exit(1);
    }

    let config: GaConfig = read_json(&PathBuf::from(&args[0]));
    let options: GaOptions = read_json(&PathBuf::from(&args[1]));
    let seed: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1337);

    config.validate().unwrap_or_else(|e| {
        eprintln!("Error: invalid GA config: {e}");
        std::process::exit(1);
    });
    options.validate(&config).unwrap_or_else(|e| {
        eprintln!("Error: invalid GA options: {e}");
        std::process::exit(1);
    });

    println!("Autoverse CA Genetic Search");
    println!("===========================");
    println!(
        "Grid: {}x{} ({:?})",
        config.grid_size, config.grid_size, config.lattice
    );
    println!("Population: {}", config.population_size);
    println!("Generations: {}", options.iterations);
    println!();

    let mut engine = EvolutionEngine::new(config, options, seed);
    let start = Instant::now();

    let result = engine.run(|progress| {
        println!(
            "  Generation {}: best_fitness={:.2}, population={}",
            progress.generation, progress.best_fitness, progress.population
        );
    });

    let elapsed = start.elapsed();
    println!();
    match result {
        Some(result) => {
            println!("Best genome: {} ({} live cells)", result.best_genome.id, result.best_genome.cells.len());
            println!("Best fitness: {:.2}", result.best_fitness);
        }
        None => println!("Run cancelled before completion"),
    }
    println!("Time: {:.2}s", elapsed.as_secs_f32());
}

fn cmd_info(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: autoverse-ca info <config.json>");
        std::process::exit(1);
    }

    let config: SimulationConfig = read_json(&PathBuf::from(&args[0]));
    print_config_info(&config);
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> T {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {e}", path.display());
        std::process::exit(1);
    })
}

fn read_seed(path: &PathBuf) -> Vec<u8> {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading seed {}: {e}", path.display());
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing seed {}: {e}", path.display());
        std::process::exit(1);
    })
}

fn print_config_info(config: &SimulationConfig) {
    println!(
        "Grid: {}x{} ({:?})",
        config.width, config.height, config.lattice
    );
    println!("Rule: {}", config.rule);
    println!("Toroidal: {}", config.toroidal);
    println!("Max period: {}", config.max_period);
}

fn print_example_config() {
    let config = SimulationConfig::default();
    let ga_config = GaConfig {
        population_size: 40,
        mutation_rate: 0.1,
        elite_count: 4,
        max_generations: 500,
        grid_size: 48,
        lattice: config.lattice,
        rule: config.rule,
        toroidal: false,
        border_penalty: 10.0,
    };
    let options = GaOptions {
        iterations: 100,
        seed_window: 8,
    };

    println!("Example simulation config (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example GA config (ga_config.json):");
    println!("{}", serde_json::to_string_pretty(&ga_config).unwrap());
    println!();
    println!("Example GA options (ga_options.json):");
    println!("{}", serde_json::to_string_pretty(&options).unwrap());
}
