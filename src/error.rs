//! Error types for console operations.
//!
//! Every operation is a single best-effort attempt: a failure is a local,
//! recoverable signal, never a panic or process abort. Callers check the
//! returned `Result` and decide whether to proceed.

use thiserror::Error;

/// Errors returned by console operations.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A color index outside the 16-color palette was supplied.
    #[error("color index {0} is outside the 16-color palette (0-15)")]
    InvalidColor(u8),

    /// The underlying write or OS console call failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ConsoleError>;
