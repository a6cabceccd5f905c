//! Terminal output sequence codec
//!
//! Decodes the byte stream a program writes to the terminal into commands,
//! one byte at a time, and encodes commands back into escape sequences.
//! Recognition is driven by the static [`COMMAND_TABLE`]; see
//! <https://vt100.net/docs/vt220-rm/> for the sequences themselves.

mod encode;
mod matcher;
mod normalize;
mod state;
mod table;

use serde::{Deserialize, Serialize};

pub use encode::{create_output_sequence, output_sequence};
pub use matcher::{match_command, match_sequence, Match};
pub use normalize::normalize_parameters;
pub use state::{process_output, CommandData, CommandFlags};
pub use table::{lookup_command, DecodeEntry, ParseNameError, TerminalCommand, COMMAND_TABLE};

/// Escape byte that starts every sequence
pub const ESCAPE: u8 = 0x1b;

/// Control Sequence Introducer byte following ESC
pub const INTRODUCER: u8 = b'[';

/// Separator between numeric parameters
pub const PARAMETER_SEPARATOR: u8 = b';';

/// Maximum number of numeric parameters in one command
pub const MAX_PARAMETERS: usize = 8;

/// Capacity of each of the pre- and post-parameter buffers
pub const MAX_COMMAND_CHARACTERS: usize = 4;

/// Classification of one byte fed to a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseResult {
    /// The byte is not part of any sequence
    NormalCharacter,
    /// The byte was consumed by a sequence that is not finished yet
    PartialCommand,
    /// The byte finished a sequence; the decoded result is in the state
    CompleteCommand,
}

impl ParseResult {
    /// Check if the byte should be displayed or forwarded as-is
    pub fn is_normal(self) -> bool {
        self == ParseResult::NormalCharacter
    }

    /// Check if a command or key is ready
    pub fn is_complete(self) -> bool {
        self == ParseResult::CompleteCommand
    }
}
