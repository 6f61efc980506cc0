use anyhow::{Context, Result};
use std::io::Write;

const CLEAR_AND_HOME: &str = "\x1b[3J\x1b[G";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const MOUSE_ON: &str = "\x1b[?1000h";
const MOUSE_OFF: &str = "\x1b[?1000l";

/// Fallback when the width cannot be queried (not a tty).
pub const DEFAULT_WIDTH: usize = 80;

/// Terminal width, read once. Resizes after startup are not picked up.
pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => DEFAULT_WIDTH,
    }
}

/// Clear the scroll buffer, return to column 1 and write the full line.
pub fn display<W: Write>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(CLEAR_AND_HOME.as_bytes())?;
    out.write_all(line.as_bytes())?;
    out.flush().context("Failed to flush bar output")
}

/// Hides the caret and, with `mouse`, enables raw mode and X10 mouse
/// reporting. Restores the terminal on drop.
pub struct TerminalGuard {
    mouse: bool,
}

impl TerminalGuard {
    pub fn enter(mouse: bool) -> Result<Self> {
        let mut out = std::io::stdout();
        out.write_all(HIDE_CURSOR.as_bytes())?;
        if mouse {
            crossterm::terminal::enable_raw_mode().context("Failed to enable raw mode")?;
            out.write_all(MOUSE_ON.as_bytes())?;
        }
        out.flush()?;
        Ok(Self { mouse })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = std::io::stdout();
        if self.mouse {
            let _ = out.write_all(MOUSE_OFF.as_bytes());
            let _ = crossterm::terminal::disable_raw_mode();
        }
        let _ = out.write_all(SHOW_CURSOR.as_bytes());
        let _ = out.flush();
    }
}
