mod bootstrap;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use ftptop_core::settings::{Settings, VERSION};
use ftptop_runtime::cancel::CancellationToken;
use ftptop_ui::app::App;

fn main() -> ExitCode {
    let settings = match Settings::try_load() {
        Ok(settings) => settings,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    if settings.version {
        return match print_version(&mut io::stdout()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ftptop: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_version(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{VERSION}")
}

fn run(settings: &Settings) -> Result<()> {
    // Rejected before the scoreboard or terminal is touched.
    let config = settings.to_config()?;

    // Logging is best effort; it never stops the dashboard from starting.
    if let Err(e) = bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref()) {
        eprintln!("ftptop: logging disabled: {e:#}");
    }

    tracing::info!("ftptop v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        scoreboard = %config.scoreboard_path.display(),
        delay_secs = config.delay.as_secs(),
        filter = ?config.filter,
        "configuration loaded"
    );

    App::new(&config, CancellationToken::new()).run()?;

    tracing::info!("ftptop exiting");
    Ok(())
}
