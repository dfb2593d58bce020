pub mod clip;
pub mod error;
pub mod report;
pub mod settings;
pub mod split;
pub mod video_file;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::SplitResult;
use crate::report::WarcraftLogsClient;
use crate::settings::{CliArgs, SplitSettings};

const DEFAULT_LOG_FILTER: &str = "fightclip_lib=info";

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_with_args(args: CliArgs) -> SplitResult<()> {
    let settings = SplitSettings::try_from(args)?;
    let client = WarcraftLogsClient::new(settings.api_key.clone(), settings.request_timeout)?;
    split::split_recording(&settings, &client)
}

pub fn run() -> ExitCode {
    let args = CliArgs::parse();
    init_logging();

    match run_with_args(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
