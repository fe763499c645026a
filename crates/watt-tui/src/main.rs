//! watt-tui — Terminal chat with the energy assistant.
//! Uses Ratatui + Crossterm for rendering.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;

use watt_core::chat::{ChatCommand, ChatSession};
use watt_core::config::Config;

use app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_from_dir(&project_root)?;

    // Log to a file, not stdout, since we own the terminal
    let log_path = config.log_path();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(move || -> Box<dyn io::Write> {
            match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
            {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        })
        .try_init();

    let session = ChatSession::new();
    let mut app = App::new(&config, session.transcript(), session.command_sender());
    let mut event_rx = session.subscribe();
    let (_handle, session_task) = session.spawn();

    // Forward session events into an mpsc the draw loop can drain without blocking
    let (fwd_tx, mut fwd_rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    if fwd_tx.send(event).is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    });

    info!("Starting TUI");

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut fwd_rx).await;

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    // Stopping the session drops any reply still typing
    let _ = app.command_tx.send(ChatCommand::Stop).await;
    let _ = session_task.await;
    info!("TUI stopped");

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<watt_core::events::ChatEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle session events (non-blocking)
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match (key.code, key.modifiers) {
                    // Quit
                    (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    // Quick replies, Alt+1..4
                    (KeyCode::Char(c @ '1'..='4'), KeyModifiers::ALT) => {
                        let index = c as usize - '1' as usize;
                        app.choose_suggestion(index).await;
                    }
                    // Focus toggle
                    (KeyCode::Tab, _) => {
                        app.input_focused = !app.input_focused;
                    }
                    // Input handling
                    (KeyCode::Enter, _) if app.input_focused => {
                        app.send_message().await;
                    }
                    (KeyCode::Char(c), _) if app.input_focused => {
                        app.input.push(c);
                    }
                    (KeyCode::Backspace, _) if app.input_focused => {
                        app.input.pop();
                    }
                    // Scroll
                    (KeyCode::Up, _) if !app.input_focused => app.scroll_up(),
                    (KeyCode::Down, _) if !app.input_focused => app.scroll_down(),
                    (KeyCode::PageUp, _) => app.scroll_up(),
                    (KeyCode::PageDown, _) => app.scroll_down(),
                    _ => {}
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
