use anyhow::Context;
use clap::Parser;
use oneway::config::Cli;
use oneway::Config;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("invalid configuration")?;

    let report = oneway::commands::sync::run(config)?;

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
