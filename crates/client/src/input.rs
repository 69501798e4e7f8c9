use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use netpong::InputEvent;

/// Reads key presses on a dedicated thread, since `event::read` blocks.
/// The thread ends when the receiver is dropped or the terminal fails.
pub fn spawn_reader() -> mpsc::UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = thread::Builder::new()
        .name("netpong-input".into())
        .spawn(move || {
            loop {
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("Keyboard input failed: {}", e);
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        log::error!("Could not start the input thread: {}", e);
    }

    rx
}

pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char('w') => Some(InputEvent::LEFT_UP),
        KeyCode::Char('s') => Some(InputEvent::LEFT_DOWN),
        KeyCode::Up => Some(InputEvent::RIGHT_UP),
        KeyCode::Down => Some(InputEvent::RIGHT_DOWN),
        _ => None,
    }
}
