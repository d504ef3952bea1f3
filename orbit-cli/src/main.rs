mod app;
mod client;
mod ui;

use anyhow::Result;
use app::ChatState;
use client::{AgentClient, ClientError};
use orbit_shared::AgentRequest;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tokio::sync::mpsc;
use tracing::{debug, info};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file so the terminal UI is not corrupted
    let log_file = std::fs::File::create("orbit-cli.log").ok();
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .init();
    }
    dotenv::dotenv().ok();

    let server_url =
        std::env::var("ORBIT_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let client = AgentClient::new(&server_url);
    info!("Using agent endpoint {}", client.endpoint());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = ChatState::new();

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(event) = event::read() {
            if ui_tx.send(event).is_err() {
                break;
            }
        }
    });

    let res = run_app(&mut terminal, &mut state, client, &mut ui_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut ChatState,
    client: AgentClient,
    ui_rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Result<String, ClientError>>();

    loop {
        terminal.draw(|f| ui::render(f, state))?;

        match step(state, ui_rx, &mut reply_rx).await {
            Action::Quit => return Ok(()),
            Action::Submit(request) => {
                let client = client.clone();
                let reply_tx = reply_tx.clone();
                tokio::spawn(async move {
                    let result = client.send(&request).await;
                    if reply_tx.send(result).is_err() {
                        debug!("UI closed before the agent replied");
                    }
                });
            }
            Action::Continue => {}
        }
    }
}

/// What the loop should do after one event has been applied to the state.
#[derive(Debug)]
enum Action {
    Continue,
    Quit,
    Submit(AgentRequest),
}

/// Waits for the next terminal event or settled request and applies it.
async fn step(
    state: &mut ChatState,
    ui_rx: &mut mpsc::UnboundedReceiver<Event>,
    reply_rx: &mut mpsc::UnboundedReceiver<Result<String, ClientError>>,
) -> Action {
    tokio::select! {
        Some(event) = ui_rx.recv() => handle_event(state, event),
        Some(result) = reply_rx.recv() => {
            state.settle(result);
            Action::Continue
        }
        else => Action::Quit,
    }
}

fn handle_event(state: &mut ChatState, event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Char('c')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Action::Quit
            }
            KeyCode::Enter => match state.submit() {
                Some(request) => Action::Submit(request),
                None => Action::Continue,
            },
            code => {
                match code {
                    KeyCode::Char(c) => state.insert_char(c),
                    KeyCode::Backspace => state.delete_char(),
                    KeyCode::Left => state.move_cursor_left(),
                    KeyCode::Right => state.move_cursor_right(),
                    KeyCode::Home => state.move_cursor_home(),
                    KeyCode::End => state.move_cursor_end(),
                    KeyCode::Up => state.scroll_up(1),
                    KeyCode::Down => state.scroll_down(1),
                    KeyCode::PageUp => state.scroll_up(10),
                    KeyCode::PageDown => state.scroll_down(10),
                    _ => {}
                }
                Action::Continue
            }
        },
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => state.scroll_up(3),
                MouseEventKind::ScrollDown => state.scroll_down(3),
                _ => {}
            }
            Action::Continue
        }
        _ => Action::Continue,
    }
}
