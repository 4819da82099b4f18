//! Platform-neutral console control.
//!
//! One small API for text-mode display manipulation - 16-color output,
//! cursor position and visibility, screen and line clearing, window
//! title, and terminal dimensions - so callers never branch on operating
//! system themselves. Two backends implement the same [`Console`]
//! contract and the platform picks one at build time:
//!
//! - On Windows, `backend::win32::Win32Console` calls the stateful
//!   Win32 console API directly.
//! - Everywhere else, [`backend::ansi::AnsiConsole`] writes ANSI/VT
//!   escape sequences and keeps shadow state so queries still work
//!   against the write-only stream.
//!
//! ```no_run
//! use simple_console::{stdout, Color, Console};
//!
//! # fn main() -> simple_console::Result<()> {
//! let console = stdout();
//! if console.has_real_console() {
//!     console.clear()?;
//!     console.set_foreground(Color::Green)?;
//!     console.set_cursor(4, 2)?;
//!     print!("ready ({}x{})", console.width(), console.height());
//!     console.reset_color()?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Output only: no input handling, no resize events (re-query
//! [`Console::width`]/[`Console::height`] on demand), no 256-color or
//! truecolor palettes.

pub mod backend;
pub mod color;
pub mod error;

pub use backend::{stdout, Console, StdConsole};
pub use color::{Attribute, Color};
pub use error::{ConsoleError, Result};
