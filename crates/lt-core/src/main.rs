//! lt-core: print the diagnostic table and write the event-aligned figure.
//!
//! Configuration comes from `./loss_tracker.json`, the user config directory,
//! or the built-in defaults, in that order.

use lt_config::resolve_config;
use lt_core::logging::init_logging;
use lt_core::{pipeline, Error, ExitCode};
use tracing::{error, info};

fn run() -> Result<(), Error> {
    let (config, origin) = resolve_config(None)?;
    init_logging(&config.logging);
    info!(config = %origin, source = %config.source, period = %config.period, "starting");

    let output = pipeline::run(&config)?;
    println!("{}", output.report.render()?);
    output.figure.save_svg(&config.plot.output)?;
    Ok(())
}

fn main() {
    let code = match run() {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            error!(code = err.code(), "{err}");
            eprintln!("lt-core: {err}");
            ExitCode::from_error(&err)
        }
    };
    std::process::exit(code.as_i32());
}
