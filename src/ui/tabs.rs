// src/ui/tabs.rs

use iced::{
    alignment::Alignment,
    theme,
    widget::{
        button::Button, canvas::Canvas, progress_bar::ProgressBar, scrollable::Scrollable,
        text_input::TextInput, Column, Container, Row, Text,
    },
    Element, Length,
};

use super::chart::UsageChart;
use super::state::{DashboardState, Tab};
use super::Message;
use crate::format;
use crate::process_list::{SortField, SortOrder};

const METER_HEIGHT: f32 = 30.0;
const CHART_HEIGHT: f32 = 180.0;

pub fn view<'a>(state: &'a DashboardState, spike_threshold: f32) -> Element<'a, Message> {
    match state.tab {
        Tab::Cpu => cpu(state, spike_threshold),
        Tab::Gpu => gpu(state),
        Tab::Memory => memory(state, spike_threshold),
        Tab::Storage => storage(state),
        Tab::Processes => processes(state),
        Tab::Network => network(state),
        Tab::Help => help(),
    }
}

pub fn tab_bar<'a>(active: Tab) -> Element<'a, Message> {
    Tab::ALL
        .iter()
        .fold(Row::new().spacing(5), |row, &tab| {
            let style = if tab == active {
                theme::Button::Primary
            } else {
                theme::Button::Secondary
            };
            row.push(
                Button::new(Text::new(tab.title()))
                    .on_press(Message::TabSelected(tab))
                    .style(style)
                    .padding([8, 15]),
            )
        })
        .into()
}

fn meter<'a>(label: &str, value: f32) -> Element<'a, Message> {
    Column::new()
        .spacing(4)
        .push(Text::new(format!("{label}: {:.0}%", value)))
        .push(
            ProgressBar::new(0.0..=100.0, value.clamp(0.0, 100.0))
                .height(Length::Fixed(METER_HEIGHT)),
        )
        .into()
}

/// Read-only table with equal-width columns.
fn table<'a>(headers: &[&str], rows: Vec<Vec<String>>) -> Element<'a, Message> {
    let header = headers.iter().fold(Row::new().spacing(10), |row, h| {
        row.push(Text::new(h.to_string()).width(Length::FillPortion(1)))
    });

    let body = rows.into_iter().fold(Column::new().spacing(6), |column, cells| {
        column.push(cells.into_iter().fold(Row::new().spacing(10), |row, cell| {
            row.push(Text::new(cell).width(Length::FillPortion(1)))
        }))
    });

    Column::new()
        .spacing(8)
        .push(Container::new(header).style(theme::Container::Box).padding(8))
        .push(Scrollable::new(Container::new(body).padding([0, 8])).height(Length::Fill))
        .into()
}

fn chart<'a>(chart: UsageChart) -> Element<'a, Message> {
    Canvas::new(chart)
        .width(Length::Fill)
        .height(Length::Fixed(CHART_HEIGHT))
        .into()
}

fn cpu<'a>(state: &'a DashboardState, spike_threshold: f32) -> Element<'a, Message> {
    let cpu = &state.snapshot.cpu;
    let mut content = Column::new().spacing(10).push(meter("CPU load", cpu.load));

    if state.show_graphs {
        content = content.push(chart(UsageChart::cpu(
            state.snapshot.cpu_history.clone(),
            spike_threshold,
        )));
    }

    content
        .push(table(
            &["Option", "Value"],
            vec![
                vec!["Model".into(), cpu.model.clone()],
                vec!["Cores/Threads".into(), format::cores(cpu.physical_cores, cpu.logical_cores)],
                vec!["Frequency".into(), format::ghz(cpu.frequency_mhz)],
                vec!["Temperature".into(), format::celsius(cpu.temperature_c)],
            ],
        ))
        .into()
}

fn gpu<'a>(state: &'a DashboardState) -> Element<'a, Message> {
    let gpus = &state.snapshot.gpus;
    let load = gpus.first().map(|g| g.load).unwrap_or(0.0);

    let rows = if gpus.is_empty() {
        vec![vec!["No GPU detected".into(), String::new(), String::new(), String::new()]]
    } else {
        gpus.iter()
            .map(|g| {
                vec![
                    g.name.clone(),
                    format!(
                        "{:.1}/{:.0} GB",
                        g.memory_used_mb / 1024.0,
                        g.memory_total_mb / 1024.0
                    ),
                    format!("{:.0}%", g.load),
                    format::celsius(g.temperature_c),
                ]
            })
            .collect()
    };

    Column::new()
        .spacing(10)
        .push(meter("GPU load", load))
        .push(table(&["Device", "Memory", "Load", "Temperature"], rows))
        .into()
}

fn memory<'a>(state: &'a DashboardState, spike_threshold: f32) -> Element<'a, Message> {
    let mem = &state.snapshot.memory;
    let mut content = Column::new()
        .spacing(10)
        .push(meter("Memory utilization", mem.percent()));

    if state.show_graphs {
        content = content.push(chart(UsageChart::memory(
            state.snapshot.memory_history.clone(),
            spike_threshold,
        )));
    }

    content
        .push(table(
            &["Total", "Used", "Available"],
            vec![vec![
                format::gib(mem.total),
                format::gib(mem.used),
                format::gib(mem.total.saturating_sub(mem.used)),
            ]],
        ))
        .into()
}

fn storage<'a>(state: &'a DashboardState) -> Element<'a, Message> {
    let rows = state
        .snapshot
        .disks
        .iter()
        .map(|d| {
            vec![
                d.device.clone(),
                d.mount_point.clone(),
                format::gib_short(d.total),
                format::gib_short(d.used),
                format::gib_short(d.free()),
                format::percent(d.percent()),
            ]
        })
        .collect();

    table(&["Device", "Mount point", "Total", "Used", "Free", "Usage"], rows)
}

fn network<'a>(state: &'a DashboardState) -> Element<'a, Message> {
    let rows = state
        .snapshot
        .network
        .iter()
        .map(|iface| {
            vec![
                iface.name.clone(),
                iface.addresses.join(", "),
                if iface.is_up { "Up" } else { "Down" }.to_string(),
                format::mib(iface.bytes_sent),
                format::mib(iface.bytes_received),
            ]
        })
        .collect();

    table(&["Interface", "IP Addresses", "Status", "Sent", "Received"], rows)
}

fn sort_header<'a>(label: &str, field: SortField, state: &DashboardState) -> Element<'a, Message> {
    let label = if state.sort_field == field {
        match state.sort_order {
            SortOrder::Ascending => format!("{label} ▲"),
            SortOrder::Descending => format!("{label} ▼"),
        }
    } else {
        label.to_string()
    };
    Button::new(Text::new(label))
        .on_press(Message::SortBy(field))
        .style(theme::Button::Text)
        .padding(5)
        .into()
}

fn column_header<'a>(
    label: &str,
    field: SortField,
    state: &DashboardState,
    width: Length,
) -> Element<'a, Message> {
    Container::new(sort_header(label, field, state))
        .width(width)
        .into()
}

fn processes<'a>(state: &'a DashboardState) -> Element<'a, Message> {
    let toolbar = Row::new()
        .spacing(10)
        .align_items(Alignment::Center)
        .push(
            TextInput::new("Search by PID or Command...", &state.search_query)
                .on_input(Message::SearchChanged)
                .padding(8)
                .width(Length::Fill),
        )
        .push(
            Button::new(Text::new("Terminate pinned"))
                .on_press(Message::KillPinnedRequested)
                .style(theme::Button::Destructive)
                .padding(8),
        );

    let header_row = Row::new()
        .spacing(10)
        .align_items(Alignment::Center)
        .push(column_header("PID", SortField::Pid, state, Length::Fixed(70.0)))
        .push(column_header("User", SortField::User, state, Length::Fixed(90.0)))
        .push(column_header("CPU %", SortField::Cpu, state, Length::Fixed(80.0)))
        .push(column_header("Memory", SortField::Memory, state, Length::Fixed(100.0)))
        .push(column_header("Name", SortField::Command, state, Length::Fill))
        .push(Text::new("").width(Length::Fixed(50.0)));

    let process_list = state.visible_processes().iter().fold(
        Column::new().spacing(4),
        |column, process| {
            let pinned = state.pinned_pid == Some(process.pid);
            let row = Row::new()
                .spacing(10)
                .align_items(Alignment::Center)
                .push(
                    Button::new(Text::new(process.pid.to_string()))
                        .on_press(Message::TogglePin(process.pid))
                        .style(theme::Button::Text)
                        .padding(2)
                        .width(Length::Fixed(70.0)),
                )
                .push(Text::new(process.user.as_str()).width(Length::Fixed(90.0)))
                .push(Text::new(format::percent(process.cpu_usage)).width(Length::Fixed(80.0)))
                .push(Text::new(format::mib(process.memory_usage)).width(Length::Fixed(100.0)))
                .push(Text::new(process.command.as_str()).width(Length::Fill))
                .push(
                    Button::new(Text::new("Kill"))
                        .on_press(Message::KillProcess(process.pid))
                        .style(theme::Button::Destructive)
                        .padding(4),
                );

            let container = Container::new(row).padding(4).width(Length::Fill);
            column.push(if pinned {
                container.style(theme::Container::Box)
            } else {
                container
            })
        },
    );

    Column::new()
        .spacing(8)
        .push(toolbar)
        .push(header_row)
        .push(Scrollable::new(process_list).height(Length::Fill))
        .into()
}

fn help<'a>() -> Element<'a, Message> {
    let section = |title: &str, items: &[&str]| {
        items.iter().fold(
            Column::new().spacing(4).push(Text::new(title.to_string()).size(18)),
            |column, item| column.push(Text::new(format!("  • {item}")).size(14)),
        )
    };

    Column::new()
        .spacing(20)
        .padding(20)
        .push(Text::new("System Monitor Pro").size(26))
        .push(section(
            "Core features:",
            &[
                "Real-time CPU monitoring",
                "GPU performance metrics",
                "Memory & disk utilization analysis",
                "Process management",
                "Network statistics",
            ],
        ))
        .push(section(
            "Hotkeys:",
            &[
                "Ctrl+Z: Terminate pinned process",
                "Click a PID to pin or unpin it",
            ],
        ))
        .into()
}
