//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "speedctl", version, about = "DC motor speed controller")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/speedctl.toml")]
    pub config: PathBuf,

    /// Log and report as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Which status screens to print.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ScreenArg {
    Operator,
    Debug,
    Both,
}

impl From<ScreenArg> for speedctl_ui::Screens {
    fn from(s: ScreenArg) -> Self {
        match s {
            ScreenArg::Operator => Self::Operator,
            ScreenArg::Debug => Self::Debug,
            ScreenArg::Both => Self::Both,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the motor from the panel until Ctrl-C
    Run {
        /// Stop after this many milliseconds
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
        /// Status screens written to stdout
        #[arg(long, value_enum, default_value = "both")]
        screen: ScreenArg,
    },
    /// Replay a timed input script on simulated hardware
    Simulate {
        /// Script file: `<t_ms> turn <+N|-N>`, `<t_ms> press|release <encoder|back|confirm>`
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        /// Keep ticking this long after the last scripted event
        #[arg(long, value_name = "MS", default_value_t = 1000)]
        settle_ms: u64,
        /// Print every status frame, not only the final state
        #[arg(long, action = ArgAction::SetTrue)]
        frames: bool,
    },
    /// Validate config and bring up hardware
    SelfCheck,
}
