//! Console backends and the capability contract they implement.
//!
//! Two mutually exclusive backends satisfy the [`Console`] trait:
//!
//! - `win32::Win32Console` (Windows): drives the stateful Win32 console
//!   API, which can be queried for attributes, cursor position, and
//!   visibility at any time.
//! - [`ansi::AnsiConsole`] (everywhere else): emits ANSI/VT escape
//!   sequences to a write-only stream and keeps a shadow-state record so
//!   the query operations still have answers.
//!
//! Selection is a build-time platform choice, never a runtime decision;
//! only one backend is compiled in.

pub mod ansi;
#[cfg(windows)]
pub mod win32;

use crate::color::{Attribute, Color};
use crate::error::Result;

/// The platform-neutral console contract.
///
/// Both backends implement every operation with identical observable
/// semantics. All methods take `&self`: the escape backend synchronizes
/// its shadow state internally, and the native backend is stateless.
///
/// Callers that depend on positioning or color behavior should check
/// [`has_real_console`](Console::has_real_console) first; redirected
/// output swallows escape sequences as literal bytes and makes native
/// console calls no-ops.
pub trait Console {
    /// Sets foreground and background in one call from a packed attribute.
    fn set_color(&self, attr: Attribute) -> Result<()>;

    /// Sets the foreground color, leaving the background unchanged.
    fn set_foreground(&self, color: Color) -> Result<()>;

    /// Sets the background color, leaving the foreground unchanged.
    fn set_background(&self, color: Color) -> Result<()>;

    /// Restores the default colors: gray on black.
    fn reset_color(&self) -> Result<()>;

    /// Moves the cursor to zero-based column `x`, row `y`.
    ///
    /// No bounds checking is performed against the real terminal size;
    /// out-of-range positions are passed through and the terminal or OS
    /// decides what happens.
    fn set_cursor(&self, x: u16, y: u16) -> Result<()>;

    /// The last-known cursor column. The native backend queries the OS
    /// live; the escape backend reads its shadow state and cannot fail.
    fn cursor_x(&self) -> Result<u16>;

    /// The last-known cursor row.
    fn cursor_y(&self) -> Result<u16>;

    /// Current terminal width in character cells.
    fn width(&self) -> u16;

    /// Current terminal height in character cells.
    fn height(&self) -> u16;

    /// Erases the visible screen and homes the cursor to (0,0).
    fn clear(&self) -> Result<()>;

    /// Erases from the cursor to the end of the current line without
    /// moving the cursor.
    fn clear_line(&self) -> Result<()>;

    /// Sets the terminal/window title. Best-effort: many emulators ignore
    /// the title sequence silently and no error can be detected for that.
    fn set_title(&self, title: &str) -> Result<()>;

    /// Shows or hides the cursor. Idempotent.
    fn show_cursor(&self, visible: bool) -> Result<()>;

    /// Whether the cursor is currently visible, as last set through this
    /// API (escape backend) or as the OS reports it (native backend).
    fn is_cursor_visible(&self) -> bool;

    /// Whether standard output is an interactive terminal rather than a
    /// redirected file or pipe.
    fn has_real_console(&self) -> bool;
}

/// The backend compiled in for this platform.
#[cfg(windows)]
pub type StdConsole = win32::Win32Console;

/// The backend compiled in for this platform.
#[cfg(not(windows))]
pub type StdConsole = ansi::AnsiConsole<std::io::Stdout>;

/// The process-wide console bound to standard output.
///
/// There is one terminal session per process, so there is one console:
/// repeated calls return the same instance, and on the escape backend all
/// callers share a single shadow-state record for its lifetime (the whole
/// process). Tests wanting isolation construct
/// [`ansi::AnsiConsole::with_writer`] instead.
pub fn stdout() -> &'static StdConsole {
    #[cfg(windows)]
    {
        win32::Win32Console::stdout()
    }
    #[cfg(not(windows))]
    {
        ansi::AnsiConsole::stdout()
    }
}
