//! Effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and
//! ratatui. A key-reader thread feeds one mpsc channel; scheduling
//! requests returned by `update` become sleep-then-send timer threads
//! on the same channel, so the loop body stays a single dispatch.

use std::io;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::probe;

use super::state::{App, EditOp, Msg, Schedule, Step, Timer};
use super::update::update;
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a key event to a wizard message, given the active step.
///
/// The confirmation screen consumes printable characters as text
/// edits, so mapping is step-aware. Ctrl+C quits from anywhere; `q`
/// quits only from the menu (elsewhere it is a letter or unbound).
/// Returns None for keys with no meaning on the current step.
pub fn map_key(step: Step, key: KeyEvent) -> Option<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Msg::Quit);
    }

    if step == Step::ConfirmUninstallText {
        return map_text_key(key);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Msg::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Msg::MoveDown),
        KeyCode::Char(' ') => Some(Msg::Toggle),
        KeyCode::Enter => Some(Msg::Confirm),
        KeyCode::Esc => Some(Msg::Back),
        KeyCode::Char('q') if step == Step::Menu => Some(Msg::Quit),
        _ => None,
    }
}

fn map_text_key(key: KeyEvent) -> Option<Msg> {
    let op = match key.code {
        KeyCode::Enter => return Some(Msg::Confirm),
        KeyCode::Esc => return Some(Msg::Back),
        KeyCode::Backspace => EditOp::Backspace,
        KeyCode::Delete => EditOp::Delete,
        KeyCode::Left => EditOp::Left,
        KeyCode::Right => EditOp::Right,
        KeyCode::Home => EditOp::Home,
        KeyCode::End => EditOp::End,
        KeyCode::Char(c) => EditOp::Insert(c),
        _ => return None,
    };
    Some(Msg::Edit(op))
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for full-screen mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing
/// the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// EVENT SOURCES
// ============================================================================

/// Everything the event loop can receive from its channel.
enum Feed {
    /// A terminal event from the crossterm reader thread.
    Input(Event),
    /// A scheduled timer elapsed.
    Timer(Timer),
}

/// Spawn a thread that forwards key and resize events to the channel.
fn spawn_key_reader(tx: mpsc::Sender<Feed>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev @ (Event::Key(_) | Event::Resize(_, _))) => {
                    if tx.send(Feed::Input(ev)).is_err() {
                        break; // receiver dropped, the wizard is shutting down
                    }
                }
                Ok(_) => {} // ignore mouse, focus, paste
                Err(_) => break,
            }
        }
    });
}

/// Honor one scheduling request: deliver its timer after the delay.
fn spawn_timer(tx: mpsc::Sender<Feed>, request: Schedule) {
    thread::spawn(move || {
        thread::sleep(request.after);
        // Stale ticks are filtered by the transition logic, so a send
        // landing after a step change is harmless.
        let _ = tx.send(Feed::Timer(request.timer));
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the wizard until the user exits.
///
/// Probes the system once for the System Info screen, then loops:
/// draw, block on the next event, map it, apply it, and spawn a timer
/// thread per scheduling request.
pub fn run() -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let mut app = App::new(probe::system_report());
    app.viewport = size().unwrap_or((80, 24));

    let (tx, rx) = mpsc::channel::<Feed>();
    spawn_key_reader(tx.clone());

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        if app.should_quit {
            break;
        }

        let Ok(feed) = rx.recv() else {
            break; // all senders dropped
        };

        let msg = match feed {
            Feed::Input(Event::Key(key)) => map_key(app.step, key),
            Feed::Input(Event::Resize(width, height)) => Some(Msg::Resize { width, height }),
            Feed::Input(_) => None,
            Feed::Timer(timer) => Some(Msg::Tick(timer)),
        };
        let Some(msg) = msg else {
            continue;
        };

        let before = app.step;
        let schedules = update(&mut app, msg);
        if app.step != before {
            debug!(from = ?before, to = ?app.step, "step transition");
        }
        for request in schedules {
            spawn_timer(tx.clone(), request);
        }
    }

    restore_terminal()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
