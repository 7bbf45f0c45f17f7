//! Headless симуляция HANGAR
//!
//! Прогоняет scripted scenario без рендера.
//!
//! Usage: `hangar_simulation [seed] [config.json]`

use hangar_simulation::scenario::{run_scenario, SCENARIO_FRAMES};
use hangar_simulation::{init_logger, log_error, log_info, SimulationConfig};

fn main() {
    init_logger();

    let mut args = std::env::args().skip(1);

    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(err) => {
                log_error(&format!("Invalid seed {raw:?}: {err}"));
                std::process::exit(2);
            }
        },
        None => 42,
    };

    let config = match args.next() {
        Some(path) => match SimulationConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("Config error: {err}"));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    log_info(&format!(
        "Starting HANGAR headless simulation (seed: {}, {} Hz)",
        seed, config.fixed_hz
    ));

    let report = run_scenario(seed, SCENARIO_FRAMES, config);

    for line in &report.log.lines {
        log_info(line);
    }

    log_info(&format!(
        "Simulation complete: {} frames, {} entered, {} exited, {} shots, {} destroyed, {} vehicle fire requests",
        report.frames,
        report.log.entered,
        report.log.exited,
        report.log.shots,
        report.log.destroyed,
        report.log.vehicle_fire_requests
    ));
}
