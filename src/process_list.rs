// src/process_list.rs

use std::cmp::Ordering;

use clap::ValueEnum;

use crate::data_structures::ProcessInfo;

pub const DEFAULT_PROCESS_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    #[value(name = "asc")]
    Ascending,
    #[value(name = "desc")]
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Pid,
    User,
    Cpu,
    Memory,
    Command,
}

impl SortField {
    /// Usage columns read best with the heaviest consumers on top.
    pub fn default_order(self) -> SortOrder {
        match self {
            SortField::Cpu | SortField::Memory => SortOrder::Descending,
            SortField::Pid | SortField::User | SortField::Command => SortOrder::Ascending,
        }
    }
}

pub fn matches(process: &ProcessInfo, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    process.pid.to_string().contains(&query) || process.command.to_lowercase().contains(&query)
}

pub fn sort(processes: &mut [ProcessInfo], field: SortField, order: SortOrder) {
    processes.sort_by(|a, b| {
        let ordering = match field {
            SortField::Pid => a.pid.cmp(&b.pid),
            SortField::User => a.user.cmp(&b.user),
            SortField::Cpu => a.cpu_usage.total_cmp(&b.cpu_usage),
            SortField::Memory => a.memory_usage.cmp(&b.memory_usage),
            SortField::Command => a.command.cmp(&b.command),
        };
        let ordering = match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        };
        match ordering {
            Ordering::Equal => a.pid.cmp(&b.pid),
            other => other,
        }
    });
}

/// Builds the rows to display: filter, sort, cap at `limit`, then put the
/// pinned process first. The pinned process is kept even when the query
/// or the limit would drop it.
pub fn arrange(
    processes: &[ProcessInfo],
    query: &str,
    field: SortField,
    order: SortOrder,
    limit: usize,
    pinned: Option<i32>,
) -> Vec<ProcessInfo> {
    let mut rows: Vec<ProcessInfo> = processes
        .iter()
        .filter(|p| matches(p, query))
        .cloned()
        .collect();
    sort(&mut rows, field, order);
    rows.truncate(limit);

    if let Some(pid) = pinned {
        if let Some(index) = rows.iter().position(|p| p.pid == pid) {
            let row = rows.remove(index);
            rows.insert(0, row);
        } else if let Some(process) = processes.iter().find(|p| p.pid == pid) {
            rows.insert(0, process.clone());
            rows.truncate(limit.max(1));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: i32, command: &str, cpu: f32, mem: u64) -> ProcessInfo {
        ProcessInfo {
            pid,
            user: "root".into(),
            cpu_usage: cpu,
            memory_usage: mem,
            command: command.into(),
        }
    }

    fn sample() -> Vec<ProcessInfo> {
        vec![
            proc(1, "systemd", 0.1, 12_000),
            proc(420, "firefox", 35.0, 900_000),
            proc(77, "Xorg", 4.5, 150_000),
            proc(1337, "cargo", 35.0, 300_000),
        ]
    }

    fn pids(rows: &[ProcessInfo]) -> Vec<i32> {
        rows.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn query_matches_pid_or_command_case_insensitively() {
        let p = proc(420, "Firefox", 0.0, 0);
        assert!(matches(&p, "fire"));
        assert!(matches(&p, "FIREFOX"));
        assert!(matches(&p, "42"));
        assert!(matches(&p, "  "));
        assert!(!matches(&p, "chrome"));
    }

    #[test]
    fn cpu_descending_breaks_ties_by_pid() {
        let mut rows = sample();
        sort(&mut rows, SortField::Cpu, SortOrder::Descending);
        assert_eq!(pids(&rows), vec![420, 1337, 77, 1]);
    }

    #[test]
    fn command_sort_is_byte_order() {
        let mut rows = sample();
        sort(&mut rows, SortField::Command, SortOrder::Ascending);
        assert_eq!(pids(&rows), vec![77, 1337, 420, 1]);
        sort(&mut rows, SortField::Memory, SortOrder::Ascending);
        assert_eq!(pids(&rows), vec![1, 77, 1337, 420]);
    }

    #[test]
    fn arrange_limits_and_pins_first() {
        let rows = arrange(&sample(), "", SortField::Cpu, SortOrder::Descending, 2, Some(77));
        assert_eq!(pids(&rows), vec![77, 420]);

        let rows = arrange(&sample(), "", SortField::Cpu, SortOrder::Descending, 3, Some(1337));
        assert_eq!(pids(&rows), vec![1337, 420, 77]);
    }

    #[test]
    fn pinned_survives_filter_and_vanished_pin_is_ignored() {
        let rows = arrange(&sample(), "fire", SortField::Pid, SortOrder::Ascending, 10, Some(1));
        assert_eq!(pids(&rows), vec![1, 420]);

        let rows = arrange(&sample(), "", SortField::Pid, SortOrder::Ascending, 10, Some(9999));
        assert_eq!(pids(&rows), vec![1, 77, 420, 1337]);
    }

    #[test]
    fn default_orders() {
        assert_eq!(SortField::Cpu.default_order(), SortOrder::Descending);
        assert_eq!(SortField::Command.default_order(), SortOrder::Ascending);
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
    }
}
