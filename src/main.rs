use std::{process::ExitCode, time::Instant};

use log::info;

use drone_tour_core::{Result, SolverInput, SolverOptions, logging, solve, write_report};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_help() => {
            print!("{err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    let mode = options.mode()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let solution = solve(input.sites(), mode)?;
    write_report(&solution, &options)?;

    info!(
        "output: mode={mode} cost={:.2} time={:.2}s",
        solution.cost(),
        now.elapsed().as_secs_f32()
    );
    Ok(())
}
