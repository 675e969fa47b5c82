use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type TriviaTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen for as long as the value lives.
pub struct TerminalSession {
    terminal: TriviaTerminal,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut TriviaTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        log::error!("panic: {}", panic_info);
        original_hook(panic_info);
    }));
}
