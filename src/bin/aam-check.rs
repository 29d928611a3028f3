use std::process::ExitCode;

use aam_language_server::check::{run, CheckArgs};
use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let args = CheckArgs::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    if run(&args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
