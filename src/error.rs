//! Error types

use crate::parser::TerminalCommand;

/// Failure to produce an escape sequence
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("No command to encode")]
    UnknownCommand,

    #[error("No key to encode")]
    UnknownKey,

    #[error("{command} needs exactly one designator byte")]
    MissingDesignator { command: TerminalCommand },

    #[error("Sequence needs {needed} bytes but only {available} are available")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Result type for encoding operations
pub type EncodeResult<T> = Result<T, EncodeError>;
