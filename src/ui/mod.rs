// src/ui/mod.rs

mod chart;
pub mod state;
mod tabs;

use std::sync::{Arc, Mutex, PoisonError};

use iced::{
    alignment::Alignment,
    event, executor, keyboard, subscription, theme,
    time::every,
    widget::{button::Button, Column, Container, Row, Text},
    window, Application, Color, Command, Element, Event, Length, Settings as IcedSettings,
    Subscription, Theme,
};
use nix::sys::signal::Signal;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::data_structures::SystemSnapshot;
use crate::error::MonitorError;
use crate::process_handler::ProcessHandler;
use crate::process_list::SortField;
use state::{DashboardState, NoticeLevel, Tab};

pub struct TaskManager {
    process_handler: Arc<Mutex<ProcessHandler>>,
    state: DashboardState,
    settings: Settings,
}

#[derive(Debug, Clone)]
pub enum Message {
    Refresh,
    RefreshComplete(Result<Box<SystemSnapshot>, String>),
    TabSelected(Tab),
    SearchChanged(String),
    SortBy(SortField),
    TogglePin(i32),
    KillProcess(i32),
    KillPinnedRequested,
    ConfirmKill(bool),
    KillComplete(i32, Result<(), String>),
    ToggleGraphs,
    DismissNotice,
}

/// Opens the dashboard window and blocks until it is closed.
pub fn run(settings: Settings) -> iced::Result {
    let window = window::Settings {
        size: (settings.window_width, settings.window_height),
        resizable: false,
        ..window::Settings::default()
    };
    TaskManager::run(IcedSettings {
        window,
        ..IcedSettings::with_flags(settings)
    })
}

impl Application for TaskManager {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Settings;

    fn new(settings: Settings) -> (Self, Command<Message>) {
        let handler = ProcessHandler::with_history_len(settings.history_len);
        let mut manager = TaskManager {
            process_handler: Arc::new(Mutex::new(handler)),
            state: DashboardState::new(&settings),
            settings,
        };
        let command = manager.start_refresh();
        (manager, command)
    }

    fn title(&self) -> String {
        String::from("System Monitor Pro")
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Refresh => self.start_refresh(),
            Message::RefreshComplete(Ok(snapshot)) => {
                self.state.apply_snapshot(*snapshot);
                Command::none()
            }
            Message::RefreshComplete(Err(e)) => {
                error!("Monitoring error: {}", e);
                self.state.refresh_failed(e);
                Command::none()
            }
            Message::TabSelected(tab) => {
                self.state.tab = tab;
                Command::none()
            }
            Message::SearchChanged(query) => {
                self.state.set_query(query);
                Command::none()
            }
            Message::SortBy(field) => {
                self.state.sort_by(field);
                Command::none()
            }
            Message::TogglePin(pid) => {
                self.state.toggle_pin(pid);
                Command::none()
            }
            Message::KillProcess(pid) => self.terminate(pid),
            Message::KillPinnedRequested => {
                if self.state.request_kill_pinned() {
                    self.state.tab = Tab::Processes;
                } else {
                    warn!("kill requested with no pinned process");
                }
                Command::none()
            }
            Message::ConfirmKill(accepted) => match self.state.resolve_confirmation(accepted) {
                Some(pid) => self.terminate(pid),
                None => Command::none(),
            },
            Message::KillComplete(pid, result) => {
                match &result {
                    Ok(()) => info!("process {} terminated", pid),
                    Err(e) => warn!("{}", e),
                }
                self.state.kill_finished(pid, result);
                self.start_refresh()
            }
            Message::ToggleGraphs => {
                self.state.show_graphs = !self.state.show_graphs;
                Command::none()
            }
            Message::DismissNotice => {
                self.state.dismiss_notice();
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let header = Row::new()
            .spacing(10)
            .align_items(Alignment::Center)
            .push(Container::new(tabs::tab_bar(self.state.tab)).width(Length::Fill))
            .push(
                Button::new(Text::new(if self.state.show_graphs {
                    "Hide Graphs"
                } else {
                    "Show Graphs"
                }))
                .on_press(Message::ToggleGraphs)
                .style(theme::Button::Secondary)
                .padding(8),
            );

        let mut content = Column::new().spacing(10).push(header);

        if let Some(pid) = self.state.confirm_kill {
            content = content.push(self.confirmation(pid));
        }

        content = content.push(
            Container::new(tabs::view(&self.state, self.settings.spike_threshold))
                .height(Length::Fill),
        );

        if let Some(bar) = self.status_bar() {
            content = content.push(bar);
        }

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch(vec![
            every(self.settings.refresh_interval()).map(|_| Message::Refresh),
            subscription::events_with(hotkey),
        ])
    }
}

impl TaskManager {
    fn start_refresh(&mut self) -> Command<Message> {
        if !self.state.begin_refresh() {
            return Command::none();
        }
        let handler = Arc::clone(&self.process_handler);
        Command::perform(
            async move {
                tokio::task::spawn_blocking(move || Box::new(sample_shared(&handler)))
                    .await
                    .map_err(|e| MonitorError::Worker(e.to_string()).to_string())
            },
            Message::RefreshComplete,
        )
    }

    /// Signalling needs no sampler state, so it never waits on a refresh.
    fn terminate(&self, pid: i32) -> Command<Message> {
        Command::perform(
            async move {
                ProcessHandler::kill_process(pid, Signal::SIGTERM).map_err(|e| e.to_string())
            },
            move |result| Message::KillComplete(pid, result),
        )
    }

    fn confirmation(&self, pid: i32) -> Element<Message> {
        let name = self
            .state
            .snapshot
            .processes
            .iter()
            .find(|p| p.pid == pid)
            .map(|p| format!(" ({})", p.command))
            .unwrap_or_default();

        Container::new(
            Row::new()
                .spacing(10)
                .align_items(Alignment::Center)
                .push(
                    Text::new(format!("Terminate process PID {pid}{name}?"))
                        .width(Length::Fill),
                )
                .push(
                    Button::new(Text::new("Yes"))
                        .on_press(Message::ConfirmKill(true))
                        .style(theme::Button::Destructive)
                        .padding(8),
                )
                .push(
                    Button::new(Text::new("No"))
                        .on_press(Message::ConfirmKill(false))
                        .style(theme::Button::Secondary)
                        .padding(8),
                ),
        )
        .style(theme::Container::Box)
        .padding(10)
        .width(Length::Fill)
        .into()
    }

    fn status_bar(&self) -> Option<Element<Message>> {
        let notice = self.state.notice.as_ref()?;
        let color = match notice.level {
            NoticeLevel::Info => Color::from_rgb(0.3, 0.7, 0.3),
            NoticeLevel::Warning => Color::from_rgb(0.9, 0.7, 0.2),
            NoticeLevel::Error => Color::from_rgb(0.9, 0.3, 0.3),
        };

        Some(
            Container::new(
                Row::new()
                    .spacing(10)
                    .align_items(Alignment::Center)
                    .push(Text::new(notice.text.as_str()).style(color).width(Length::Fill))
                    .push(
                        Button::new(Text::new("Dismiss"))
                            .on_press(Message::DismissNotice)
                            .style(theme::Button::Text)
                            .padding(4),
                    ),
            )
            .style(theme::Container::Box)
            .padding(6)
            .width(Length::Fill)
            .into(),
        )
    }
}

/// Takes one sample. A panic in an earlier sample leaves the handler
/// usable, so a poisoned lock is recovered rather than reported.
fn sample_shared(handler: &Mutex<ProcessHandler>) -> SystemSnapshot {
    let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
    handler.sample()
}

fn hotkey(event: Event, _status: event::Status) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key_code: keyboard::KeyCode::Z,
            modifiers,
        }) if modifiers.control() => Some(Message::KillPinnedRequested),
        _ => None,
    }
}
