//! App main loop: input handling, refresh scheduling, task results, and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::actions::{spawn_action, Action, Control};
use crate::api::ApiClient;
use crate::events::{command_for_key, AppEvent, Command};
use crate::history::TimeRange;
use crate::state::{DashboardState, View};

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(5);

pub struct AppConfig {
    pub refresh_every: Duration,
    pub time_range: TimeRange,
    pub traffic: usize,
    pub view: View,
}

pub struct App {
    state: DashboardState,
    api: ApiClient,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    refresh_every: Duration,
    traffic: usize,
    last_refresh: Option<Instant>,
    should_quit: bool,
}

impl App {
    pub fn new(api: ApiClient, cfg: AppConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state: DashboardState::new(cfg.view, cfg.time_range),
            api,
            tx,
            rx,
            refresh_every: cfg.refresh_every,
            traffic: cfg.traffic,
            last_refresh: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Restore the terminal if anything panics on the way
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic);
        }));

        info!(base = %self.api.base(), "dashboard started");
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if let Some(cmd) = command_for_key(k) {
                        self.handle_command(cmd);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            // Results from spawned tasks
            while let Ok(ev) = self.rx.try_recv() {
                self.handle_event(ev);
            }

            // Periodic refresh
            let due = self
                .last_refresh
                .map_or(true, |t| t.elapsed() >= self.refresh_every);
            if due {
                self.spawn_refresh();
            }

            self.state.notifications.prune(Instant::now());

            // Draw
            terminal.draw(|f| crate::ui::draw(f, &self.state))?;

            // Tick rate
            sleep(Duration::from_millis(100)).await;
        }

        info!("dashboard stopped");
        Ok(())
    }

    pub fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::SetRange(r) => self.state.set_time_range(r),
            Command::DismissNotifications => self.state.notifications.dismiss_all(),
            Command::Trigger(c) => self.trigger(c),
        }
    }

    fn trigger(&mut self, control: Control) {
        match control {
            Control::Refresh => self.spawn_refresh(),
            Control::Clear => self.state.clear(),
            c => {
                let Some(action) = Action::for_control(c, self.traffic) else {
                    return;
                };
                if !self.state.begin_action(c) {
                    debug!(control = c.label(), "control busy, ignoring trigger");
                    return;
                }
                info!(control = c.label(), "starting action");
                spawn_action(c, action, self.api.clone(), self.tx.clone());
            }
        }
    }

    pub fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Snapshot { seq, result } => {
                self.state.apply_refresh(seq, result);
            }
            AppEvent::ActionDone { control, outcome } => {
                self.state.finish_action(control, outcome);
            }
            AppEvent::RefreshRequested => self.spawn_refresh(),
        }
    }

    /// Fetch a snapshot on a task; the result comes back as an `AppEvent::Snapshot`.
    fn spawn_refresh(&mut self) {
        self.last_refresh = Some(Instant::now());
        let seq = self.state.begin_refresh();
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_snapshot().await;
            let _ = tx.send(AppEvent::Snapshot { seq, result });
        });
    }

    /// Wait for the next task result and apply it. Used outside the terminal loop.
    pub async fn next_event(&mut self) -> bool {
        match self.rx.recv().await {
            Some(ev) => {
                self.handle_event(ev);
                true
            }
            None => false,
        }
    }
}
