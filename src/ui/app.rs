//! Interactive dashboard loop
//!
//! The loop owns `DashboardState`. Each tick it drains the worker channel,
//! redraws, then waits up to one tick for a key press.

use crate::infra::config::Config;
use crate::infra::control::ControlState;
use crate::io::event_channel::{create_event_channel, SimEvent};
use crate::services::controller::{SimulationController, StartOutcome};
use crate::ui::draw::draw_ui;
use crate::ui::state::{DashboardState, Tab};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// What the loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    state: DashboardState,
    controller: SimulationController,
    events: mpsc::Receiver<SimEvent>,
}

impl App {
    pub fn new(config: &Config, controller: SimulationController, events: mpsc::Receiver<SimEvent>) -> Self {
        Self { state: DashboardState::new(config), controller, events }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Apply everything the worker has sent so far
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event);
        }
    }

    /// Start button
    pub fn start(&mut self) {
        self.drain_events();
        match self.controller.start(&self.state.form.input) {
            Ok(StartOutcome::Started { banner, .. }) => self.state.extend_log(banner),
            Ok(StartOutcome::AlreadyRunning) => {}
            Err(e) => self.state.warning = Some(e.to_string()),
        }
    }

    /// Stop button
    pub fn stop(&mut self) {
        // Worker output emitted before the stop belongs above the stop line
        self.drain_events();
        if let Some(line) = self.controller.stop() {
            self.state.push_log(line);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::Continue;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        // Any key dismisses the warning popup
        if self.state.warning.take().is_some() {
            return Action::Continue;
        }

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::F(1) => self.state.tab = Tab::Simulation,
            KeyCode::F(2) => self.state.tab = Tab::History,
            KeyCode::F(3) => self.state.tab = Tab::Guide,
            KeyCode::F(5) | KeyCode::Enter => self.start(),
            KeyCode::F(6) => self.stop(),
            KeyCode::F(7) => self.state.clear_log(),
            KeyCode::F(8) => self.state.clear_history(),
            _ if self.state.tab == Tab::Simulation => self.handle_form_key(key.code),
            _ => {}
        }
        Action::Continue
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let form = &mut self.state.form;
        match code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Right => form.cycle(true),
            KeyCode::Left => form.cycle(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.insert_char(c),
            _ => {}
        }
    }
}

/// Run the dashboard until the user quits
pub async fn run_dashboard(config: &Config) -> anyhow::Result<()> {
    let control = Arc::new(ControlState::new());
    let (sink, events) = create_event_channel(config.event_buffer());
    let controller = SimulationController::new(control, Arc::new(sink));
    let mut app = App::new(config, controller, events);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("dashboard_started");
    let result = run_ui(&mut terminal, &mut app, Duration::from_millis(config.tick_rate_ms()));

    // A run still in progress is abandoned with the process
    if app.is_running() {
        app.stop();
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "dashboard_error");
    }
    info!(packets_sent = %app.state().packets_sent(), "dashboard_stopped");
    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        app.drain_events();
        let running = app.is_running();
        terminal.draw(|f| draw_ui(f, app.state(), running))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key(key) == Action::Quit {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let config = Config::default();
        let control = Arc::new(ControlState::new());
        let (sink, events) = create_event_channel(config.event_buffer());
        let controller = SimulationController::new(control, Arc::new(sink));
        App::new(&config, controller, events)
    }

    #[tokio::test]
    async fn test_invalid_input_shows_warning_and_stays_idle() {
        let mut app = test_app();
        for _ in 0..9 {
            app.handle_key(press(KeyCode::Backspace));
        }
        app.handle_key(press(KeyCode::Enter));
        assert!(!app.is_running());
        assert_eq!(app.state().warning.as_deref(), Some("Please enter a valid IP address"));

        // First key only dismisses the popup
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Continue);
        assert!(app.state().warning.is_none());
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_then_stop_logs_banner_and_stop_line() {
        let mut app = test_app();
        app.handle_key(press(KeyCode::F(5)));
        assert!(app.is_running());
        let texts: Vec<String> = app.state().log().iter().map(|l| l.text.clone()).collect();
        assert!(texts.contains(&"Starting TCP simulation to 127.0.0.1:8080".to_string()));
        assert!(texts.contains(&"Packets to send: 5".to_string()));

        app.handle_key(press(KeyCode::F(6)));
        assert!(!app.is_running());
        assert_eq!(app.state().log().back().unwrap().text, "Simulation stopped by user");
    }

    #[tokio::test]
    async fn test_tabs_and_clear_keys() {
        let mut app = test_app();
        app.handle_key(press(KeyCode::F(3)));
        assert_eq!(app.state().tab, Tab::Guide);
        // Form keys are ignored off the simulation tab
        app.handle_key(press(KeyCode::Char('9')));
        assert_eq!(app.state().form.input.address, "127.0.0.1");

        app.handle_key(press(KeyCode::F(7)));
        assert_eq!(app.state().log().len(), 1);
        app.handle_key(press(KeyCode::F(1)));
        assert_eq!(app.state().tab, Tab::Simulation);
    }
}
