// src/ui/state.rs

use tracing::info;

use crate::config::Settings;
use crate::data_structures::{ProcessInfo, SystemSnapshot};
use crate::process_list::{self, SortField, SortOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Cpu,
    Gpu,
    Memory,
    Storage,
    Processes,
    Network,
    Help,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Cpu,
        Tab::Gpu,
        Tab::Memory,
        Tab::Storage,
        Tab::Processes,
        Tab::Network,
        Tab::Help,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Cpu => "CPU",
            Tab::Gpu => "GPU",
            Tab::Memory => "Memory",
            Tab::Storage => "Storage",
            Tab::Processes => "Processes",
            Tab::Network => "Network",
            Tab::Help => "Help",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the dashboard shows, independent of how it is drawn.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub snapshot: SystemSnapshot,
    pub tab: Tab,
    pub search_query: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub pinned_pid: Option<i32>,
    pub confirm_kill: Option<i32>,
    pub notice: Option<Notice>,
    pub show_graphs: bool,
    pub refreshing: bool,
    pub process_limit: usize,
    visible: Vec<ProcessInfo>,
}

impl DashboardState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            snapshot: SystemSnapshot::default(),
            tab: Tab::Cpu,
            search_query: String::new(),
            sort_field: SortField::Cpu,
            sort_order: SortOrder::Descending,
            pinned_pid: None,
            confirm_kill: None,
            notice: None,
            show_graphs: settings.show_graphs,
            refreshing: false,
            process_limit: settings.process_limit,
            visible: Vec::new(),
        }
    }

    pub fn visible_processes(&self) -> &[ProcessInfo] {
        &self.visible
    }

    /// Returns false when a refresh is already in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        true
    }

    pub fn apply_snapshot(&mut self, snapshot: SystemSnapshot) {
        self.refreshing = false;
        self.snapshot = snapshot;

        if let Some(pid) = self.pinned_pid {
            if !self.snapshot.processes.iter().any(|p| p.pid == pid) {
                info!("pinned process {} exited, unpinning", pid);
                self.pinned_pid = None;
                if self.confirm_kill == Some(pid) {
                    self.confirm_kill = None;
                }
            }
        }
        self.rearrange();
    }

    pub fn refresh_failed(&mut self, error: String) {
        self.refreshing = false;
        self.notice = Some(Notice::error(format!("Monitoring error: {error}")));
    }

    pub fn set_query(&mut self, query: String) {
        self.search_query = query;
        self.rearrange();
    }

    /// The active column flips its order; a new column starts in its
    /// natural order.
    pub fn sort_by(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = field.default_order();
        }
        self.rearrange();
    }

    pub fn toggle_pin(&mut self, pid: i32) {
        self.pinned_pid = if self.pinned_pid == Some(pid) {
            None
        } else {
            Some(pid)
        };
        info!("pinned process: {:?}", self.pinned_pid);
        self.rearrange();
    }

    /// Ctrl+Z. Returns true when a confirmation prompt was opened.
    pub fn request_kill_pinned(&mut self) -> bool {
        match self.pinned_pid {
            Some(pid) => {
                self.confirm_kill = Some(pid);
                true
            }
            None => {
                self.notice = Some(Notice::warning("No pinned process selected"));
                false
            }
        }
    }

    /// Resolves the confirmation prompt, yielding the PID to terminate.
    pub fn resolve_confirmation(&mut self, accepted: bool) -> Option<i32> {
        let pid = self.confirm_kill.take()?;
        accepted.then_some(pid)
    }

    pub fn kill_finished(&mut self, pid: i32, result: Result<(), String>) {
        self.notice = Some(match result {
            Ok(()) => {
                if self.pinned_pid == Some(pid) {
                    self.pinned_pid = None;
                    self.rearrange();
                    Notice::info(format!("Pinned process {pid} terminated"))
                } else {
                    Notice::info(format!("Process {pid} terminated"))
                }
            }
            Err(e) => Notice::error(format!("Error: {e}")),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn rearrange(&mut self) {
        self.visible = process_list::arrange(
            &self.snapshot.processes,
            &self.search_query,
            self.sort_field,
            self.sort_order,
            self.process_limit,
            self.pinned_pid,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: i32, command: &str, cpu: f32) -> ProcessInfo {
        ProcessInfo {
            pid,
            user: "user".into(),
            cpu_usage: cpu,
            memory_usage: 1024,
            command: command.into(),
        }
    }

    fn snapshot(processes: Vec<ProcessInfo>) -> SystemSnapshot {
        SystemSnapshot {
            processes,
            ..SystemSnapshot::default()
        }
    }

    fn state() -> DashboardState {
        let mut state = DashboardState::new(&Settings::default());
        state.apply_snapshot(snapshot(vec![
            proc(10, "bash", 1.0),
            proc(20, "firefox", 40.0),
            proc(30, "code", 12.0),
        ]));
        state
    }

    fn visible_pids(state: &DashboardState) -> Vec<i32> {
        state.visible_processes().iter().map(|p| p.pid).collect()
    }

    #[test]
    fn default_view_is_cpu_descending() {
        assert_eq!(visible_pids(&state()), vec![20, 30, 10]);
    }

    #[test]
    fn sort_toggles_and_resets() {
        let mut state = state();
        state.sort_by(SortField::Cpu);
        assert_eq!(state.sort_order, SortOrder::Ascending);
        assert_eq!(visible_pids(&state), vec![10, 30, 20]);

        state.sort_by(SortField::Command);
        assert_eq!(state.sort_order, SortOrder::Ascending);
        assert_eq!(visible_pids(&state), vec![10, 30, 20]);
    }

    #[test]
    fn pinned_process_is_listed_first_until_it_exits() {
        let mut state = state();
        state.toggle_pin(10);
        assert_eq!(visible_pids(&state), vec![10, 20, 30]);

        state.apply_snapshot(snapshot(vec![proc(20, "firefox", 40.0)]));
        assert_eq!(state.pinned_pid, None);
        assert_eq!(visible_pids(&state), vec![20]);
    }

    #[test]
    fn toggling_same_pid_unpins() {
        let mut state = state();
        state.toggle_pin(30);
        state.toggle_pin(30);
        assert_eq!(state.pinned_pid, None);
    }

    #[test]
    fn kill_pinned_requires_a_pin_and_confirmation() {
        let mut state = state();
        assert!(!state.request_kill_pinned());
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));

        state.toggle_pin(20);
        assert!(state.request_kill_pinned());
        assert_eq!(state.resolve_confirmation(false), None);
        assert_eq!(state.confirm_kill, None);

        assert!(state.request_kill_pinned());
        assert_eq!(state.resolve_confirmation(true), Some(20));
    }

    #[test]
    fn successful_kill_unpins() {
        let mut state = state();
        state.toggle_pin(20);
        state.kill_finished(20, Ok(()));
        assert_eq!(state.pinned_pid, None);
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Info));

        state.kill_finished(30, Err("permission denied".into()));
        let notice = state.notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.contains("permission denied"));
        state.dismiss_notice();
        assert!(state.notice.is_none());
    }

    #[test]
    fn refreshes_do_not_overlap() {
        let mut state = state();
        assert!(state.begin_refresh());
        assert!(!state.begin_refresh());
        state.refresh_failed("boom".into());
        assert!(state.begin_refresh());
    }

    #[test]
    fn search_filters_rows() {
        let mut state = state();
        state.set_query("FIRE".into());
        assert_eq!(visible_pids(&state), vec![20]);
    }
}
