use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use catalog_cli::{
    actions,
    api::ApiClient,
    args::{Cli, Command},
    prompt::TerminalPrompter,
};
use catalog_kernel::settings::Settings;
use clap::Parser;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init_file(&settings.client.log_file)?;

    tracing::info!(
        "Welcome to books catalog. App requests to: {}",
        settings.client.api_url
    );

    let command = match cli.command() {
        Ok(command) => command,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let api = ApiClient::new(&settings.client.api_url)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Search { rating } => actions::search(&api, rating, &mut out)?,
        Command::Get { id } => actions::get(&api, &id, &mut out)?,
        Command::Update { id } => actions::update(&api, &mut TerminalPrompter, &id, &mut out)?,
        Command::Delete { id } => actions::delete(&api, &id, &mut out)?,
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
