//! Dashboard state owned by the UI context
//!
//! Only the UI loop mutates this. Worker output arrives as `SimEvent`s and is
//! applied here after being drained from the channel.

use crate::domain::message;
use crate::domain::request::RequestInput;
use crate::domain::types::{HistoryEntry, LogLine, LogTone};
use crate::infra::config::Config;
use crate::io::event_channel::SimEvent;
use std::collections::VecDeque;

const MAX_ADDRESS_LEN: usize = 15;
const MAX_PORT_LEN: usize = 5;
const MAX_PACKETS_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Simulation,
    History,
    Guide,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Simulation, Tab::History, Tab::Guide];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Simulation => "Network Simulation",
            Tab::History => "Request History",
            Tab::Guide => "Protocol Guide",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// Request form field with input focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Address,
    Port,
    Protocol,
    Kind,
    Packets,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Address,
        FormField::Port,
        FormField::Protocol,
        FormField::Kind,
        FormField::Packets,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Address => "Target IP",
            FormField::Port => "Port",
            FormField::Protocol => "Protocol",
            FormField::Kind => "Request Type",
            FormField::Packets => "Packets",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub input: RequestInput,
    pub focus: FormField,
}

impl FormState {
    pub fn new(input: RequestInput) -> Self {
        Self { input, focus: FormField::Address }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type a character into the focused text field
    ///
    /// Only characters that can appear in a valid value are accepted; range
    /// checks are left to validation on start.
    pub fn insert_char(&mut self, c: char) {
        let (field, max_len, allowed) = match self.focus {
            FormField::Address => (&mut self.input.address, MAX_ADDRESS_LEN, c.is_ascii_digit() || c == '.'),
            FormField::Port => (&mut self.input.port, MAX_PORT_LEN, c.is_ascii_digit()),
            FormField::Packets => (&mut self.input.packets, MAX_PACKETS_LEN, c.is_ascii_digit()),
            FormField::Protocol | FormField::Kind => return,
        };
        if allowed && field.len() < max_len {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Address => {
                self.input.address.pop();
            }
            FormField::Port => {
                self.input.port.pop();
            }
            FormField::Packets => {
                self.input.packets.pop();
            }
            FormField::Protocol | FormField::Kind => {}
        }
    }

    /// Cycle the focused selector (protocol or request kind)
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            FormField::Protocol => self.input.protocol = self.input.protocol.next(),
            FormField::Kind => {
                self.input.kind = if forward { self.input.kind.next() } else { self.input.kind.prev() };
            }
            _ => {}
        }
    }

    /// Current display value of a field
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Address => self.input.address.clone(),
            FormField::Port => self.input.port.clone(),
            FormField::Protocol => self.input.protocol.description().to_string(),
            FormField::Kind => self.input.kind.label().to_string(),
            FormField::Packets => self.input.packets.clone(),
        }
    }
}

/// Everything the dashboard renders
#[derive(Debug)]
pub struct DashboardState {
    log: VecDeque<LogLine>,
    max_log_lines: usize,
    history: Vec<HistoryEntry>,
    packets_sent: u64,
    pub form: FormState,
    pub tab: Tab,
    /// Validation warning shown until dismissed
    pub warning: Option<String>,
}

impl DashboardState {
    pub fn new(config: &Config) -> Self {
        let mut state = Self {
            log: VecDeque::new(),
            max_log_lines: config.max_log_lines(),
            history: Vec::new(),
            packets_sent: 0,
            form: FormState::new(config.initial_input()),
            tab: Tab::Simulation,
            warning: None,
        };
        state.push_log(LogLine::new(message::STARTUP_LINES[0], LogTone::Success));
        state.push_log(LogLine::info(message::STARTUP_LINES[1]));
        state.push_log(LogLine::new(message::STARTUP_LINES[2], LogTone::Warning));
        state
    }

    /// Apply one event drained from the worker channel
    pub fn apply(&mut self, event: SimEvent) {
        match event {
            SimEvent::Log(line) => self.push_log(line),
            SimEvent::Status { packets_sent } => self.packets_sent = packets_sent,
            SimEvent::History(entry) => self.history.push(entry),
        }
    }

    pub fn push_log(&mut self, line: LogLine) {
        self.log.push_back(line);
        if self.max_log_lines > 0 {
            while self.log.len() > self.max_log_lines {
                self.log.pop_front();
            }
        }
    }

    pub fn extend_log(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        for line in lines {
            self.push_log(line);
        }
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.push_log(LogLine::info(message::LOG_CLEARED));
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn log(&self) -> &VecDeque<LogLine> {
        &self.log
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    pub fn status_text(&self, running: bool) -> String {
        let state = if running { "Running" } else { "Ready" };
        format!("{} | Packets Sent: {}", state, self.packets_sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{HistoryStatus, Protocol, RequestKind};
    use chrono::Local;

    fn texts(state: &DashboardState) -> Vec<String> {
        state.log().iter().map(|l| l.text.clone()).collect()
    }

    fn entry() -> HistoryEntry {
        HistoryEntry {
            timestamp: Local::now(),
            protocol: Protocol::Tcp,
            address: "127.0.0.1".to_string(),
            port: 8080,
            kind: RequestKind::Syn,
            packets: 3,
            status: HistoryStatus::Simulated,
        }
    }

    #[test]
    fn test_startup_lines() {
        let state = DashboardState::new(&Config::default());
        assert_eq!(texts(&state), message::STARTUP_LINES.to_vec());
        assert_eq!(state.status_text(false), "Ready | Packets Sent: 0");
    }

    #[test]
    fn test_apply_events() {
        let mut state = DashboardState::new(&Config::default());
        state.apply(SimEvent::Log(LogLine::info("TCP SYN packet 1 simulated to 127.0.0.1:8080")));
        state.apply(SimEvent::Status { packets_sent: 1 });
        state.apply(SimEvent::History(entry()));

        assert_eq!(state.log().back().unwrap().text, "TCP SYN packet 1 simulated to 127.0.0.1:8080");
        assert_eq!(state.packets_sent(), 1);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.status_text(true), "Running | Packets Sent: 1");
    }

    #[test]
    fn test_clear_log_leaves_marker() {
        let mut state = DashboardState::new(&Config::default());
        state.clear_log();
        assert_eq!(texts(&state), vec![message::LOG_CLEARED]);
    }

    #[test]
    fn test_clear_history_keeps_counter() {
        let mut state = DashboardState::new(&Config::default());
        state.apply(SimEvent::History(entry()));
        state.apply(SimEvent::Status { packets_sent: 4 });
        state.clear_history();
        assert!(state.history().is_empty());
        assert_eq!(state.packets_sent(), 4);
    }

    #[test]
    fn test_log_is_bounded() {
        let config = Config::default().with_max_log_lines(5);
        let mut state = DashboardState::new(&config);
        for i in 0..10 {
            state.push_log(LogLine::info(format!("line {}", i)));
        }
        assert_eq!(state.log().len(), 5);
        assert_eq!(state.log().front().unwrap().text, "line 5");
        assert_eq!(state.log().back().unwrap().text, "line 9");
    }

    #[test]
    fn test_form_editing() {
        let mut form = FormState::new(Config::default().initial_input());
        assert_eq!(form.focus, FormField::Address);
        form.backspace();
        form.insert_char('2');
        form.insert_char('x');
        assert_eq!(form.input.address, "127.0.0.2");

        form.focus_next();
        assert_eq!(form.focus, FormField::Port);
        form.insert_char('.');
        assert_eq!(form.input.port, "8080");
        form.insert_char('1');
        form.insert_char('1');
        assert_eq!(form.input.port, "80801");

        form.focus_next();
        form.cycle(true);
        assert_eq!(form.input.protocol, Protocol::Udp);

        form.focus_next();
        form.cycle(false);
        assert_eq!(form.input.kind, RequestKind::Multicast);
        form.insert_char('1');
        assert_eq!(form.value(FormField::Kind), "Multicast");

        form.focus_prev();
        form.focus_prev();
        form.focus_prev();
        assert_eq!(form.focus, FormField::Address);
        form.focus_prev();
        assert_eq!(form.focus, FormField::Packets);
    }
}
