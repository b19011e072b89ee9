use std::io;

mod admin;
mod cli;
use cli::{parse_cli_mode, run_agenda_mode, CliMode, USAGE};
mod tui;
use tui::run_tui;

use newsdesk::storage::config::{config_dir, APP_NAME};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    setup_logging();

    let cli_mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let result = match cli_mode {
        CliMode::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliMode::AgendaDate(date) => return run_agenda_mode(date).await,
        CliMode::Default { sample } => return run_tui(sample).await,
        CliMode::Login { email } => admin::run_login(&email).await,
        CliMode::Logout => admin::run_logout(),
        CliMode::Moderation(command) => admin::run_moderation(command).await,
        CliMode::Subscribers(command) => admin::run_subscribers(command).await,
        CliMode::Security(command) => admin::run_security(command).await,
        CliMode::Journal(command) => admin::run_journal(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn setup_logging() {
    let log_dir = config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, format!("{}.log", APP_NAME));
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("{} started", APP_NAME);
}
