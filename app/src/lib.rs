mod cli;
pub mod commands;
mod render;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use vault_core::VaultConfig;
use vault_core::log::{LogConfig, LogLevel};

use crate::cli::{Cli, Commands};
use crate::commands::AppState;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default();
    if cli.verbose || cfg!(debug_assertions) {
        log_config = log_config.with_console_level(LogLevel::DEBUG);
    }
    if let Err(err) = vault_core::log::init(log_config) {
        eprintln!("failed to initialise logging: {err:#}");
    }

    let mut config = VaultConfig::from_env().context("reading MANGA_VAULT_* configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    tracing::debug!(?config, "configuration resolved");

    let state = AppState::from_config(config)?;
    let json = cli.json;

    match cli.command {
        Commands::Series => {
            let entries = commands::list_series();
            emit(json, &entries, |entries| render::series(entries))
        }
        Commands::Show { series, filter, search } => {
            let page = commands::show_collection(&state, &series, filter, &search)
                .map_err(anyhow::Error::msg)?;
            emit(json, &page, render::collection)
        }
        Commands::Volume { series, number } => {
            let detail =
                commands::volume_detail(&state, &series, number).map_err(anyhow::Error::msg)?;
            emit(json, &detail, render::volume)
        }
        Commands::Toggle { series, numbers, passphrase } => {
            let passphrase = match passphrase {
                Some(value) => Some(value),
                None if state.gate().is_enabled() && !state.is_admin() => prompt_passphrase()?,
                None => None,
            };
            let report =
                commands::toggle_volumes(&state, &series, &numbers, passphrase.as_deref())
                    .map_err(anyhow::Error::msg)?;
            tracing::info!(
                target: "cli",
                series = %report.series,
                requested = report.results.len(),
                "toggle command finished"
            );
            emit(json, &report, render::toggles)
        }
    }
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, value).context("encoding output")?;
        writeln!(stdout)?;
    } else {
        stdout.write_all(text(value).as_bytes())?;
    }
    Ok(())
}

/// Ask for the admin passphrase on stdin. An empty line or EOF means cancel.
fn prompt_passphrase() -> anyhow::Result<Option<String>> {
    eprint!("Admin passphrase: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading passphrase")?;
    let entered = line.trim_end_matches(['\r', '\n']);
    Ok((!entered.is_empty()).then(|| entered.to_string()))
}
