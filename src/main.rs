// src/main.rs

use anyhow::Context;
use clap::Parser;
use tracing::info;

use taskmgr_lib::cli::{self, Cli};
use taskmgr_lib::config;
use taskmgr_lib::ui;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Cli::parse();

    let mut settings =
        config::load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(interval) = args.interval {
        settings.refresh_interval_ms = interval;
        settings.validate().context("invalid --interval")?;
    }

    match &args.command {
        Some(command) => cli::run_command(command, &settings),
        None => {
            info!(
                "starting dashboard, refresh every {} ms",
                settings.refresh_interval_ms
            );
            ui::run(settings).context("dashboard exited with an error")
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use std::io::IsTerminal;
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskmgr=info,taskmgr_lib=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
