use clap::Parser;
use speedctl_core::error::ControlError;

mod cli;
mod commands;
mod error_fmt;
mod hw;
mod logging;
mod script;

use cli::{Cli, Commands, JSON_MODE};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %e, "fatal");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&e));
        } else {
            eprintln!("error: {}", error_fmt::humanize(&e));
        }
        std::process::exit(error_fmt::exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = speedctl_config::load_file(&cli.config)
        .map_err(|e| eyre::Report::new(ControlError::Config(e.to_string())))?;
    logging::init(cli.json, &cli.log_level, &cfg.logging);
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match cli.cmd {
        Commands::Run { max_run_ms, screen } => {
            commands::run(&cfg, max_run_ms, screen.into(), cli.json)
        }
        Commands::Simulate {
            script,
            settle_ms,
            frames,
        } => commands::simulate(&cfg, &script, settle_ms, frames, cli.json),
        Commands::SelfCheck => commands::self_check(&cfg, cli.json),
    }
}
