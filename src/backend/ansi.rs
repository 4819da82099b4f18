//! Escape-sequence console backend.
//!
//! Drives any terminal in the VT100 family by writing control sequences
//! to an output stream. The stream is write-only with no read-back
//! channel, so query semantics (current colors, cursor position,
//! visibility) are reproduced from a shadow-state record that every
//! mutating operation updates under the same lock as the write itself.
//!
//! Shadow state is a write log with one slot per field, not a model of
//! terminal reality: if something outside this API moves the cursor or
//! changes colors, the record silently diverges. Accepted limitation.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::backend::Console;
use crate::color::{Attribute, Color};
use crate::error::Result;

// ── Escape sequences ─────────────────────────────────────────────────────

/// SGR foreground parameters indexed by palette index. 0-7 are the
/// standard-intensity codes (30-37), 8-15 the bright codes (90-97), in
/// the console palette's own order. Pure data: the encoding is not
/// arithmetic, so the values are spelled out rather than derived.
const SGR_FOREGROUND: [u8; 16] = [
    30, 34, 32, 36, 31, 35, 33, 37, // 0-7: dark colors
    90, 94, 92, 96, 91, 95, 93, 97, // 8-15: bright colors
];

/// SGR background parameters indexed by palette index.
const SGR_BACKGROUND: [u8; 16] = [
    40, 44, 42, 46, 41, 45, 43, 47, // 0-7: dark backgrounds
    100, 104, 102, 106, 101, 105, 103, 107, // 8-15: bright backgrounds
];

const SGR_RESET: &str = "\x1b[0m";
const CLEAR_SCREEN_HOME: &str = "\x1b[2J\x1b[H";
const CLEAR_TO_LINE_END: &str = "\x1b[K";
const CURSOR_SHOW: &str = "\x1b[?25h";
const CURSOR_HIDE: &str = "\x1b[?25l";

/// Fallback dimensions when neither the tty nor the environment can
/// report a size.
const DEFAULT_COLS: u16 = 80;
const DEFAULT_ROWS: u16 = 25;

// ── Shadow state ─────────────────────────────────────────────────────────

/// Last values passed to each "set" operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShadowState {
    foreground: Color,
    background: Color,
    cursor_visible: bool,
    cursor_x: u16,
    cursor_y: u16,
}

impl Default for ShadowState {
    fn default() -> Self {
        ShadowState {
            foreground: Color::Gray,
            background: Color::Black,
            cursor_visible: true,
            cursor_x: 0,
            cursor_y: 0,
        }
    }
}

/// Writer plus shadow state, guarded as a unit so a sequence and the
/// state update it implies are atomic with respect to other threads.
struct Inner<W> {
    writer: W,
    state: ShadowState,
}

/// Where `has_real_console` gets its answer from.
#[derive(Debug, Clone, Copy)]
enum Interactivity {
    /// Bound to process stdout; probe the real file descriptor.
    Stdout,
    /// Bound to an arbitrary writer; never a terminal.
    Never,
}

// ── Backend ──────────────────────────────────────────────────────────────

/// Console backend emitting ANSI/VT escape sequences to `W`.
///
/// Obtain the process-wide stdout-bound instance through
/// [`stdout`](AnsiConsole::stdout) (or [`crate::backend::stdout`]); build
/// isolated instances over in-memory writers with
/// [`with_writer`](AnsiConsole::with_writer) for tests.
pub struct AnsiConsole<W: Write> {
    inner: Mutex<Inner<W>>,
    interactivity: Interactivity,
}

static STDOUT_CONSOLE: OnceLock<AnsiConsole<io::Stdout>> = OnceLock::new();

impl AnsiConsole<io::Stdout> {
    /// The process-wide console over standard output.
    ///
    /// All callers share one shadow-state record, mirroring the one
    /// terminal session the process has. The instance lives for the
    /// process; it is created on first use.
    pub fn stdout() -> &'static Self {
        STDOUT_CONSOLE.get_or_init(|| {
            tracing::debug!("initializing escape-sequence console on stdout");
            AnsiConsole {
                inner: Mutex::new(Inner {
                    writer: io::stdout(),
                    state: ShadowState::default(),
                }),
                interactivity: Interactivity::Stdout,
            }
        })
    }
}

impl<W: Write> AnsiConsole<W> {
    /// A console over an arbitrary writer with fresh default state.
    ///
    /// Such a console never reports a real terminal.
    pub fn with_writer(writer: W) -> Self {
        AnsiConsole {
            inner: Mutex::new(Inner {
                writer,
                state: ShadowState::default(),
            }),
            interactivity: Interactivity::Never,
        }
    }

    /// Consumes the console and returns its writer, for inspecting what
    /// was emitted.
    pub fn into_writer(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }

    /// The last foreground color set through this console.
    pub fn foreground(&self) -> Color {
        self.lock().state.foreground
    }

    /// The last background color set through this console.
    pub fn background(&self) -> Color {
        self.lock().state.background
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        // Shadow state is plain values assigned only after a successful
        // write, so a panicking thread cannot leave it half-updated;
        // recover the lock instead of propagating poison.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes a sequence and flushes, the way the terminal expects
    /// control bytes to arrive: immediately, not on buffer pressure.
    fn emit(inner: &mut Inner<W>, sequence: &str) -> Result<()> {
        inner.writer.write_all(sequence.as_bytes())?;
        inner.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Console for AnsiConsole<W> {
    fn set_color(&self, attr: Attribute) -> Result<()> {
        let fg = attr.foreground();
        let bg = attr.background();
        let mut inner = self.lock();
        Self::emit(
            &mut inner,
            &format!(
                "\x1b[{};{}m",
                SGR_FOREGROUND[fg.index() as usize],
                SGR_BACKGROUND[bg.index() as usize]
            ),
        )?;
        inner.state.foreground = fg;
        inner.state.background = bg;
        Ok(())
    }

    fn set_foreground(&self, color: Color) -> Result<()> {
        let mut inner = self.lock();
        Self::emit(
            &mut inner,
            &format!("\x1b[{}m", SGR_FOREGROUND[color.index() as usize]),
        )?;
        inner.state.foreground = color;
        Ok(())
    }

    fn set_background(&self, color: Color) -> Result<()> {
        let mut inner = self.lock();
        Self::emit(
            &mut inner,
            &format!("\x1b[{}m", SGR_BACKGROUND[color.index() as usize]),
        )?;
        inner.state.background = color;
        Ok(())
    }

    fn reset_color(&self) -> Result<()> {
        let mut inner = self.lock();
        Self::emit(&mut inner, SGR_RESET)?;
        inner.state.foreground = Color::Gray;
        inner.state.background = Color::Black;
        Ok(())
    }

    fn set_cursor(&self, x: u16, y: u16) -> Result<()> {
        let mut inner = self.lock();
        // The wire protocol is one-based; the API is zero-based. The
        // off-by-one never escapes this function. Widened so u16::MAX
        // passes through instead of overflowing.
        Self::emit(
            &mut inner,
            &format!("\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1),
        )?;
        inner.state.cursor_x = x;
        inner.state.cursor_y = y;
        Ok(())
    }

    fn cursor_x(&self) -> Result<u16> {
        Ok(self.lock().state.cursor_x)
    }

    fn cursor_y(&self) -> Result<u16> {
        Ok(self.lock().state.cursor_y)
    }

    fn width(&self) -> u16 {
        terminal_cols()
    }

    fn height(&self) -> u16 {
        terminal_rows()
    }

    fn clear(&self) -> Result<()> {
        let mut inner = self.lock();
        Self::emit(&mut inner, CLEAR_SCREEN_HOME)?;
        inner.state.cursor_x = 0;
        inner.state.cursor_y = 0;
        Ok(())
    }

    fn clear_line(&self) -> Result<()> {
        let mut inner = self.lock();
        Self::emit(&mut inner, CLEAR_TO_LINE_END)
    }

    fn set_title(&self, title: &str) -> Result<()> {
        // OSC 0 with a BEL terminator. Emulators that do not support
        // titles drop this silently; there is no acknowledgment channel,
        // so no failure can be reported for that case.
        let mut inner = self.lock();
        Self::emit(&mut inner, &format!("\x1b]0;{title}\x07"))
    }

    fn show_cursor(&self, visible: bool) -> Result<()> {
        let mut inner = self.lock();
        Self::emit(&mut inner, if visible { CURSOR_SHOW } else { CURSOR_HIDE })?;
        inner.state.cursor_visible = visible;
        Ok(())
    }

    fn is_cursor_visible(&self) -> bool {
        // No escape sequence queries visibility; the shadow record is
        // the only source of truth.
        self.lock().state.cursor_visible
    }

    fn has_real_console(&self) -> bool {
        match self.interactivity {
            Interactivity::Stdout => atty::is(atty::Stream::Stdout),
            Interactivity::Never => false,
        }
    }
}

// ── Terminal size ────────────────────────────────────────────────────────

/// Window size as the tty reports it, unfiltered. `None` when stdout is
/// not a tty or the platform has no window-size ioctl.
#[cfg(unix)]
fn ioctl_size() -> Option<(u16, u16)> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    if rc == 0 {
        Some((ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn ioctl_size() -> Option<(u16, u16)> {
    None
}

/// A positive dimension from an environment variable, or `None`.
fn env_dimension(var: &str) -> Option<u16> {
    std::env::var(var)
        .ok()
        .and_then(|value| parse_dimension(&value))
}

fn parse_dimension(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|&n| n > 0)
}

/// Width fallback chain: live ioctl, then `COLUMNS`, then 80.
///
/// A positive ioctl measurement always wins; the environment is only
/// consulted when the tty cannot report a usable value.
fn terminal_cols() -> u16 {
    if let Some(cols) = ioctl_size().map(|(cols, _)| cols).filter(|&c| c > 0) {
        return cols;
    }
    tracing::trace!("window-size ioctl unavailable, falling back to COLUMNS");
    env_dimension("COLUMNS").unwrap_or(DEFAULT_COLS)
}

/// Height fallback chain: live ioctl, then `LINES`, then 25.
fn terminal_rows() -> u16 {
    if let Some(rows) = ioctl_size().map(|(_, rows)| rows).filter(|&r| r > 0) {
        return rows;
    }
    tracing::trace!("window-size ioctl unavailable, falling back to LINES");
    env_dimension("LINES").unwrap_or(DEFAULT_ROWS)
}
