// src/cli.rs

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nix::sys::signal::Signal;
use tracing::error;

use crate::config::Settings;
use crate::data_structures::ProcessInfo;
use crate::format;
use crate::process_handler::{parse_signal, ProcessHandler};
use crate::process_list::{self, SortField, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "taskmgr")]
#[command(
    about = "System monitor for CPU, GPU, memory, storage, processes and network",
    long_about = None
)]
pub struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Refresh interval in milliseconds, overriding the settings file
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List running processes
    List {
        /// Sort by field
        #[arg(short, long, value_enum, default_value = "cpu")]
        sort_by: SortField,

        /// Sort order
        #[arg(short, long, value_enum, default_value = "desc")]
        order: SortOrder,

        /// Filter by command name or PID
        #[arg(short, long)]
        filter: Option<String>,

        /// Maximum number of rows (defaults to the configured process limit)
        #[arg(short = 'n', long)]
        limit: Option<NonZeroUsize>,
    },

    /// Send a signal to a process
    Kill {
        /// PID of the process to signal
        #[arg(short, long)]
        pid: i32,

        /// Signal to send: SIGTERM, SIGKILL, SIGHUP or SIGINT
        #[arg(short, long, default_value = "SIGTERM", value_parser = signal_arg)]
        signal: Signal,
    },

    /// Print a full system snapshot as JSON
    Snapshot {
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn signal_arg(value: &str) -> Result<Signal, String> {
    parse_signal(value).map_err(|e| e.to_string())
}

/// Runs a CLI subcommand to completion.
pub fn run_command(command: &Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::List {
            sort_by,
            order,
            filter,
            limit,
        } => {
            let mut handler = ProcessHandler::with_history_len(settings.history_len);
            handler.settle();
            let processes = handler.processes();
            let rows = process_list::arrange(
                &processes,
                filter.as_deref().unwrap_or(""),
                *sort_by,
                *order,
                limit.map_or(settings.process_limit, NonZeroUsize::get),
                None,
            );
            print!("{}", render_table(&rows));
            Ok(())
        }

        Commands::Kill { pid, signal } => {
            match ProcessHandler::kill_process(*pid, *signal) {
                Ok(()) => {
                    println!("Successfully sent {} to PID {}", signal, pid);
                    Ok(())
                }
                Err(e) => {
                    error!("kill failed: {}", e);
                    Err(e).with_context(|| format!("failed to send {signal} to PID {pid}"))
                }
            }
        }

        Commands::Snapshot { pretty } => {
            let mut handler = ProcessHandler::with_history_len(settings.history_len);
            handler.settle();
            let snapshot = handler.snapshot();
            let json = if *pretty {
                serde_json::to_string_pretty(&snapshot)
            } else {
                serde_json::to_string(&snapshot)
            }
            .context("failed to serialize snapshot")?;
            println!("{json}");
            Ok(())
        }
    }
}

pub fn render_table(rows: &[ProcessInfo]) -> String {
    let mut out = format!(
        "{:<10} {:<15} {:<10} {:<12} {}\n",
        "PID", "User", "CPU%", "Memory", "Command"
    );
    for p in rows {
        out.push_str(&format!(
            "{:<10} {:<15} {:<10.2} {:<12} {}\n",
            p.pid,
            p.user,
            p.cpu_usage,
            format::mib(p.memory_usage),
            p.command
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_launches_gui() {
        let cli = Cli::try_parse_from(["taskmgr", "--interval", "1000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.interval, Some(1000));
    }

    #[test]
    fn list_defaults_to_cpu_descending() {
        let cli = Cli::try_parse_from(["taskmgr", "list", "-f", "fire"]).unwrap();
        match cli.command {
            Some(Commands::List {
                sort_by,
                order,
                filter,
                limit,
            }) => {
                assert_eq!(sort_by, SortField::Cpu);
                assert_eq!(order, SortOrder::Descending);
                assert_eq!(filter.as_deref(), Some("fire"));
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn invalid_values_are_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["taskmgr", "list", "-s", "disk"]).is_err());
        assert!(Cli::try_parse_from(["taskmgr", "list", "-o", "up"]).is_err());
        assert!(Cli::try_parse_from(["taskmgr", "kill", "-p", "1", "-s", "SIGSTOP"]).is_err());
    }

    #[test]
    fn list_limit_must_be_positive() {
        assert!(Cli::try_parse_from(["taskmgr", "list", "-n", "0"]).is_err());
        let cli = Cli::try_parse_from(["taskmgr", "list", "-n", "5"]).unwrap();
        match cli.command {
            Some(Commands::List { limit, .. }) => {
                assert_eq!(limit.map(NonZeroUsize::get), Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn kill_signal_parsing() {
        let cli = Cli::try_parse_from(["taskmgr", "kill", "-p", "42", "-s", "SIGKILL"]).unwrap();
        match cli.command {
            Some(Commands::Kill { pid, signal }) => {
                assert_eq!(pid, 42);
                assert_eq!(signal, Signal::SIGKILL);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn table_has_header_and_rows() {
        let rows = vec![ProcessInfo {
            pid: 7,
            user: "alice".into(),
            cpu_usage: 1.5,
            memory_usage: 2 * 1024 * 1024,
            command: "bash".into(),
        }];
        let table = render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("PID"));
        assert!(lines[1].contains("alice"));
        assert!(lines[1].contains("2.0 MB"));
        assert!(lines[1].ends_with("bash"));
    }
}
