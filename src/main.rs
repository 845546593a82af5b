use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use rtos_simulator::io::{self, DEFAULT_WORKLOAD_PATH};
use rtos_simulator::kernel::Driver;
use rtos_simulator::{logger, SimError};

fn run() -> Result<(), SimError> {
    let path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKLOAD_PATH));

    let workload = io::load_workload(&path)?;
    let mut driver = Driver::new(&workload)?;
    driver.start()?;

    Ok(())
}

fn main() -> ExitCode {
    logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
