mod screens;

use std::io;

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use netpong::{GameState, SessionStatus};

pub use screens::Footer;

/// Owns the terminal for the lifetime of the game. Raw mode and the
/// alternate screen are entered on construction and left on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn draw_game(&mut self, state: &GameState, footer: &Footer) -> io::Result<()> {
        self.terminal.draw(|frame| {
            screens::render_game(frame, state, footer);
        })?;
        Ok(())
    }

    pub fn draw_status(&mut self, status: &SessionStatus) -> io::Result<()> {
        self.terminal.draw(|frame| {
            screens::render_status(frame, status);
        })?;
        Ok(())
    }

    pub fn draw_failure(&mut self, error: &str) -> io::Result<()> {
        self.terminal.draw(|frame| {
            screens::render_failure(frame, error);
        })?;
        Ok(())
    }

    pub fn restore_terminal(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
