//! Gate world runner
//!
//! This binary:
//! 1. Opens the gate registry (LMDB under `GATE_DATA_DIR`, or in memory)
//! 2. Loads the world, building a spawn gate if none exist
//! 3. Runs the tick loop, feeding entities in gate fields to the teleport
//!    handler, with console commands applied between ticks
//!
//! Type `help` at the prompt for commands.

mod commands;
mod config;
mod console;
mod world;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::terminal;
use gate_persist::GateDb;
use gate_registry::{GateStore, MemoryStore};
use tracing::info;

use crate::commands::Command;
use crate::config::RunnerConfig;
use crate::console::{clear_line, print_prompt, set_title};
use crate::world::GateWorld;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gate_runner=info".parse()?)
                .add_directive("gate_teleport=info".parse()?)
                .add_directive("gate_registry=info".parse()?),
        )
        .init();

    let config = RunnerConfig::from_env();
    info!("Starting gate runner at {} TPS", config.target_tps);

    match config.gate_db_path() {
        Some(path) => {
            info!("Gate database: {}", path.display());
            run(GateDb::open(&path)?, &config)
        }
        None => {
            info!("GATE_DATA_DIR not set, gates will not be saved");
            run(MemoryStore::new(), &config)
        }
    }
}

fn run<S: GateStore>(store: S, config: &RunnerConfig) -> eyre::Result<()> {
    let mut world = GateWorld::load(store, config)?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    thread::spawn(move || console::read_commands(cmd_tx));

    terminal::enable_raw_mode().ok();
    print_prompt();

    let target_delta = Duration::from_secs_f32(1.0 / config.target_tps);
    let mut running = true;

    while running {
        let start = Instant::now();

        while let Ok(cmd) = cmd_rx.try_recv() {
            clear_line();
            running &= world.execute(cmd);
            print_prompt();
        }

        let arrivals = world.tick();
        if arrivals > 0 {
            clear_line();
            info!("{arrivals} entity(s) went through a gate");
            print_prompt();
        }

        let tick = world.current_tick();
        if tick.is_multiple_of(20) {
            set_title(tick, world.registry().len());
        }

        let elapsed = start.elapsed();
        if elapsed < target_delta {
            thread::sleep(target_delta - elapsed);
        }
    }

    terminal::disable_raw_mode().ok();
    world.unload();

    Ok(())
}
