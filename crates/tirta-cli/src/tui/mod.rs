//! Interactive terminal dashboard.
//!
//! The dashboard runs the poll loop on a background task and mirrors its
//! broadcast events into a view model. The render loop never touches the
//! network or the history file.

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio_util::sync::CancellationToken;

use tirta_core::{AlertEngine, ApiClient, EventDispatcher, HistoryStore, PollOptions, Poller};

use crate::config::Config;

pub mod app;
pub mod ui;

use app::{App, KeyAction};

/// Set up the terminal for TUI rendering
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api_url)?;
    let store = HistoryStore::open(config.history_options());
    let dispatcher = EventDispatcher::default();
    let mut rx = dispatcher.subscribe();

    let mut poller = Poller::new(client, store, dispatcher)
        .with_alert_engine(AlertEngine::new(config.alert_thresholds()))
        .with_options(PollOptions {
            latest_interval: Duration::from_secs(config.poll_interval_secs),
            history_interval: Duration::from_secs(config.history_interval_secs),
            ..PollOptions::default()
        });

    // Seed before the first frame so the chart is not empty on startup.
    poller.seed_history().await;
    while rx.try_recv().is_ok() {}

    let mut app = App::new(poller.store().items(), poller.store().options());
    let handle = poller.handle();

    let cancel = CancellationToken::new();
    let poll_task = tokio::spawn(poller.run(cancel.clone()));

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &mut app, &mut rx, &handle).await;
    restore_terminal()?;

    cancel.cancel();
    poll_task.await.ok();

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut tirta_core::EventReceiver,
    handle: &tirta_core::PollerHandle,
) -> Result<()> {
    loop {
        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a timeout
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.handle_key(key.code, key.modifiers) {
                KeyAction::Quit => return Ok(()),
                KeyAction::RefreshHistory => {
                    handle.refresh_history().await;
                }
                KeyAction::ClearHistory => {
                    handle.clear_history().await;
                }
                KeyAction::None => {}
            }
        }
    }
}
