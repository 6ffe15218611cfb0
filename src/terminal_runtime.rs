use std::io;
use std::panic;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::warn;

use crate::game_loop::FrameScheduler;
use crate::input::{KeyAction, KeyboardRouter};

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode + alternate screen) for one game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = cleanup_terminal_best_effort();
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = cleanup_terminal_best_effort();
    }
}

fn cleanup_terminal_best_effort() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Restores the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort();
        default_hook(panic_info);
    }));
}

/// Frame source backed by the terminal event queue.
///
/// Each frame waits up to one frame interval for key events, routing turn
/// requests into player flags. Stops on a quit key or an event read error.
pub struct TerminalFrames {
    router: KeyboardRouter,
    frame_interval: Duration,
    started: Instant,
}

impl TerminalFrames {
    #[must_use]
    pub fn new(router: KeyboardRouter, frame_interval: Duration) -> Self {
        Self {
            router,
            frame_interval,
            started: Instant::now(),
        }
    }

    fn drain_events(&self) -> io::Result<bool> {
        let deadline = Instant::now() + self.frame_interval;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(true);
            }

            if let Event::Key(key) = event::read()? {
                if self.router.handle_key(key) == KeyAction::Quit {
                    return Ok(false);
                }
            }
        }
    }
}

impl FrameScheduler for TerminalFrames {
    fn next_frame(&mut self) -> Option<Duration> {
        match self.drain_events() {
            Ok(true) => Some(self.started.elapsed()),
            Ok(false) => None,
            Err(error) => {
                warn!(%error, "terminal event read failed, stopping");
                None
            }
        }
    }
}
