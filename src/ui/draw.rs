//! Dashboard rendering

use crate::domain::types::{LogTone, Protocol, RequestKind};
use crate::ui::state::{DashboardState, FormField, Tab};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

const ACCENT: Color = Color::Magenta;
const LAVENDER: Color = Color::LightMagenta;

const GUIDE: &str = "\
Network Protocol Learning Guide

TCP (Transmission Control Protocol)
  - Connection-oriented, reliable, ordered delivery
  - Error checking, recovery and flow control
  - Used by: HTTP, HTTPS, FTP, SSH

UDP (User Datagram Protocol)
  - Connectionless: faster but no delivery guarantees
  - No error recovery, no ordering
  - Used by: DNS, VoIP, streaming, games

Safety Guidelines
  1. Only test on your own systems
  2. Never scan networks without permission
  3. Use for educational purposes only
  4. Understand local laws and regulations
  5. Respect others' privacy and security

This tool simulates (no packets ever leave this machine)
  - SYN packets (TCP connection initiation)
  - ACK packets (acknowledgement)
  - FIN packets (connection teardown)
  - Data transmission, broadcast and multicast

Learning Resources
  - Wireshark for packet analysis
  - RFC documents for protocol specs
  - Network programming tutorials and cybersecurity courses";

pub fn draw_ui(f: &mut Frame, state: &DashboardState, running: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_tabs(f, chunks[0], state);
    match state.tab {
        Tab::Simulation => draw_simulation_tab(f, chunks[1], state, running),
        Tab::History => draw_history_tab(f, chunks[1], state),
        Tab::Guide => draw_guide_tab(f, chunks[1]),
    }
    draw_status_bar(f, chunks[2], state, running);

    if let Some(warning) = &state.warning {
        draw_warning(f, warning);
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, state: &DashboardState) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("F{} {}", i + 1, t.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(
            Block::default()
                .title(" Network Protocol Learning Tool ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        )
        .highlight_style(Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn draw_simulation_tab(f: &mut Frame, area: Rect, state: &DashboardState, running: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Form
            Constraint::Length(3), // Controls
            Constraint::Min(0),    // Log
        ])
        .split(area);

    draw_form(f, chunks[0], state);
    draw_controls(f, chunks[1], running);
    draw_log(f, chunks[2], state);
}

fn draw_form(f: &mut Frame, area: Rect, state: &DashboardState) {
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = state.form.focus == *field;
            let marker = if focused { "> " } else { "  " };
            let value = match field {
                FormField::Protocol | FormField::Kind if focused => {
                    format!("< {} >", state.form.value(*field))
                }
                _ if focused => format!("{}_", state.form.value(*field)),
                _ => state.form.value(*field),
            };
            let value_style = if focused {
                Style::default().fg(Color::Black).bg(LAVENDER)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(LAVENDER)),
                Span::styled(
                    format!("{:<14}", field.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" Request Configuration ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(form, area);
}

fn control_span(key: &str, label: &str, enabled: bool, color: Color) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    vec![Span::styled(format!("[{}] {}", key, label), style), Span::raw("  ")]
}

fn draw_controls(f: &mut Frame, area: Rect, running: bool) {
    let mut spans = Vec::new();
    spans.extend(control_span("F5/Enter", "Start Simulation", !running, Color::Green));
    spans.extend(control_span("F6", "Stop Simulation", running, Color::Red));
    spans.extend(control_span("F7", "Clear Log", true, Color::Yellow));
    spans.extend(control_span("F8", "Clear History", true, Color::Yellow));
    spans.push(Span::styled("Tab: field  ←/→: select  Esc: quit", Style::default().fg(Color::DarkGray)));

    let controls = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(controls, area);
}

fn tone_style(tone: LogTone) -> (&'static str, Color) {
    match tone {
        LogTone::Info => ("·", Color::Gray),
        LogTone::Start => ("»", LAVENDER),
        LogTone::Success => ("✓", Color::Green),
        LogTone::Warning => ("!", Color::Yellow),
        LogTone::Error => ("✗", Color::Red),
        LogTone::Stopped => ("■", Color::Red),
        LogTone::Packet { protocol, kind } => match (protocol, kind) {
            (Protocol::Tcp, RequestKind::Syn) => ("●", Color::Yellow),
            (Protocol::Tcp, RequestKind::Ack) => ("●", Color::Green),
            (Protocol::Tcp, RequestKind::Fin) => ("●", Color::Blue),
            (Protocol::Tcp, _) => ("●", Color::Magenta),
            (Protocol::Udp, RequestKind::Broadcast) => ("◎", Color::Cyan),
            (Protocol::Udp, RequestKind::Multicast) => ("◇", Color::LightBlue),
            (Protocol::Udp, _) => ("◆", Color::Blue),
        },
    }
}

fn draw_log(f: &mut Frame, area: Rect, state: &DashboardState) {
    // Newest at the bottom; show only what fits
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.log().len().saturating_sub(visible);

    let items: Vec<ListItem> = state
        .log()
        .iter()
        .skip(skip)
        .map(|line| {
            let (icon, color) = tone_style(line.tone);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", line.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(icon, Style::default().fg(color)),
                Span::raw(" "),
                Span::raw(line.text.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Simulation Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(LAVENDER)),
    );
    f.render_widget(list, area);
}

fn draw_history_tab(f: &mut Frame, area: Rect, state: &DashboardState) {
    let visible = area.height.saturating_sub(3) as usize;
    let skip = state.history().len().saturating_sub(visible);

    let rows: Vec<Row> = state
        .history()
        .iter()
        .skip(skip)
        .map(|entry| {
            Row::new(vec![
                entry.time_label(),
                entry.protocol.to_string(),
                entry.address.clone(),
                entry.port.to_string(),
                entry.kind.to_string(),
                entry.packets.to_string(),
                entry.status.as_str().to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10), // Time
            Constraint::Length(9),  // Protocol
            Constraint::Length(16), // Target IP
            Constraint::Length(7),  // Port
            Constraint::Length(13), // Type
            Constraint::Length(8),  // Packets
            Constraint::Min(9),     // Status
        ],
    )
    .header(
        Row::new(vec!["Time", "Protocol", "Target IP", "Port", "Type", "Packets", "Status"])
            .style(Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title(format!(" Request History ({}) - F8 to clear ", state.history().len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );

    f.render_widget(table, area);
}

fn draw_guide_tab(f: &mut Frame, area: Rect) {
    let guide = Paragraph::new(GUIDE)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Protocol Guide ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        );
    f.render_widget(guide, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, state: &DashboardState, running: bool) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(23)])
        .split(area);

    let color = if running { Color::Green } else { Color::Cyan };
    let status = Paragraph::new(Span::styled(state.status_text(running), Style::default().fg(color)))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[0]);

    let clock = Paragraph::new(Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(clock, chunks[1]);
}

fn draw_warning(f: &mut Frame, warning: &str) {
    let area = centered(f.area(), 50, 5);
    let popup = Paragraph::new(vec![
        Line::from(Span::styled(warning.to_string(), Style::default().fg(Color::Yellow))),
        Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Warning ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
