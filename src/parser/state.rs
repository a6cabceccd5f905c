//! Output decode state
//!
//! Incremental decoder for the terminal output stream. The caller owns one
//! [`CommandData`] per stream and feeds it every byte; the return value says
//! whether the byte is ordinary text, part of an unfinished sequence, or the
//! end of a command.
//!
//! Sequence shape:
//!
//! ```text
//! ESC <pre-parameter bytes> [<number> ; <number> ...] <post-parameter bytes>
//! ```
//!
//! Digits count as parameters only once the introducer (`[`) has been seen.
//! Elsewhere they are ordinary command bytes, so `ESC 7` and `ESC # 3` still
//! decode.

use bitflags::bitflags;

use super::matcher::{match_command, Match};
use super::table::{DecodeEntry, TerminalCommand, COMMAND_TABLE};
use super::{
    normalize, ParseResult, ESCAPE, INTRODUCER, MAX_COMMAND_CHARACTERS, MAX_PARAMETERS,
    PARAMETER_SEPARATOR,
};

bitflags! {
    /// Progress flags of an output sequence
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct CommandFlags: u8 {
        /// An escape byte started the current sequence
        const SEEN_ESCAPE = 1 << 0;
        /// At least one parameter digit was collected
        const SEEN_PARAMETER = 1 << 1;
    }
}

/// Decode state for one terminal output stream
///
/// After [`ParseResult::CompleteCommand`], [`CommandData::command`] and
/// [`CommandData::parameters`] describe the command until the next escape
/// byte starts another one. The same structure describes a command to
/// encode; see [`CommandData::with_command`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandData {
    pub(crate) flags: CommandFlags,
    pub(crate) pre_parameter: [u8; MAX_COMMAND_CHARACTERS],
    pub(crate) pre_parameter_size: usize,
    pub(crate) post_parameter: [u8; MAX_COMMAND_CHARACTERS],
    pub(crate) post_parameter_size: usize,
    pub(crate) parameters: [u32; MAX_PARAMETERS],
    pub(crate) parameter_count: usize,
    pub(crate) parameter_index: usize,
    pub(crate) command: Option<TerminalCommand>,
}

impl CommandData {
    /// Create an idle decode state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a command description for encoding
    pub fn with_command(command: TerminalCommand) -> Self {
        Self {
            command: Some(command),
            ..Self::default()
        }
    }

    /// Set the numeric parameters, keeping at most [`MAX_PARAMETERS`]
    #[must_use]
    pub fn parameters_from(mut self, parameters: &[u32]) -> Self {
        let count = parameters.len().min(MAX_PARAMETERS);
        self.parameters[..count].copy_from_slice(&parameters[..count]);
        self.parameter_count = count;
        self
    }

    /// Set the single trailing byte of a character set designation
    #[must_use]
    pub fn post_parameter_byte(mut self, byte: u8) -> Self {
        self.post_parameter[0] = byte;
        self.post_parameter_size = 1;
        self
    }

    /// Feed one output byte
    pub fn process(&mut self, byte: u8) -> ParseResult {
        process_output(self, byte)
    }

    /// Apply the default and minimum parameter values of the command
    pub fn normalize(&mut self) {
        normalize::normalize_parameters(self);
    }

    /// Discard any sequence in progress
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The decoded command, once complete
    pub fn command(&self) -> Option<TerminalCommand> {
        self.command
    }

    /// The numeric parameters collected for the command
    pub fn parameters(&self) -> &[u32] {
        &self.parameters[..self.parameter_count]
    }

    /// Bytes collected before the parameters
    pub fn pre_parameter(&self) -> &[u8] {
        &self.pre_parameter[..self.pre_parameter_size]
    }

    /// Bytes collected after the parameters
    ///
    /// For a completed character set designation this holds the designator.
    pub fn post_parameter(&self) -> &[u8] {
        &self.post_parameter[..self.post_parameter_size]
    }

    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    /// Check if no sequence is in progress
    pub fn is_idle(&self) -> bool {
        !self.flags.contains(CommandFlags::SEEN_ESCAPE)
    }

    /// Start a new sequence after an escape byte
    fn begin(&mut self) {
        *self = Self {
            flags: CommandFlags::SEEN_ESCAPE,
            ..Self::default()
        };
    }

    /// Drop the sequence in progress; the next escape re-synchronizes
    fn abort(&mut self) {
        self.flags = CommandFlags::empty();
    }

    fn push_command_byte(&mut self, byte: u8) -> bool {
        let (buffer, size) = if self.flags.contains(CommandFlags::SEEN_PARAMETER) {
            (&mut self.post_parameter, &mut self.post_parameter_size)
        } else {
            (&mut self.pre_parameter, &mut self.pre_parameter_size)
        };

        match buffer.get_mut(*size) {
            Some(slot) => {
                *slot = byte;
                *size += 1;
                true
            }
            None => false,
        }
    }

    fn push_digit(&mut self, digit: u8) -> bool {
        self.flags.insert(CommandFlags::SEEN_PARAMETER);
        let index = self.parameter_index;

        // The first digit of a slot opens it.
        if index >= self.parameter_count {
            if index >= MAX_PARAMETERS {
                return false;
            }

            self.parameter_count = index + 1;
            self.parameters[index] = 0;
        }

        let slot = &mut self.parameters[index];
        *slot = slot.saturating_mul(10).saturating_add(u32::from(digit - b'0'));
        true
    }

    fn next_parameter(&mut self) {
        self.parameter_index = self.parameter_index.saturating_add(1);
        if let Some(slot) = self.parameters.get_mut(self.parameter_index) {
            *slot = 0;
        }
    }

    fn complete(&mut self, entry: &DecodeEntry) {
        // The designator of `ESC ( B` was collected as a pre-parameter byte.
        // Keep it where the encoder expects it.
        if entry.post_parameter.is_empty() && self.pre_parameter_size > entry.pre_parameter.len()
        {
            self.pre_parameter_size -= 1;
            self.post_parameter[0] = self.pre_parameter[self.pre_parameter_size];
            self.post_parameter_size = 1;
        }

        self.command = Some(entry.command);
        self.flags = CommandFlags::empty();
    }
}

/// Result of scanning the command table
enum TableScan {
    Complete(&'static DecodeEntry),
    Partial,
    NoMatch,
}

fn scan_table(pre: &[u8], post: &[u8]) -> TableScan {
    let mut partial = false;
    for entry in COMMAND_TABLE.iter() {
        match match_command(pre, post, entry) {
            Match::Full => return TableScan::Complete(entry),
            Match::Partial => partial = true,
            Match::None => {}
        }

        // Bare commands like `ESC 7` have no pre-parameter string, so try
        // the collected bytes as the post-parameter run instead.
        if entry.pre_parameter.is_empty() && post.is_empty() {
            match match_command(&[], pre, entry) {
                Match::Full => return TableScan::Complete(entry),
                Match::Partial => partial = true,
                Match::None => {}
            }
        }
    }

    if partial {
        TableScan::Partial
    } else {
        TableScan::NoMatch
    }
}

/// Check for bytes that end a sequence without being part of it
fn is_control(byte: u8) -> bool {
    byte < b' ' || byte > b'~'
}

/// Process one byte of terminal output
///
/// A control byte in the middle of a sequence is reported as a normal
/// character and leaves the sequence state untouched, so the following bytes
/// continue it. Unrecognized sequences and buffer overflows drop the
/// sequence and report the offending byte as a normal character.
pub fn process_output(data: &mut CommandData, byte: u8) -> ParseResult {
    if byte == ESCAPE {
        data.begin();
        return ParseResult::PartialCommand;
    }

    if data.is_idle() || is_control(byte) {
        return ParseResult::NormalCharacter;
    }

    if byte.is_ascii_digit() {
        if data.pre_parameter().first() == Some(&INTRODUCER) {
            if !data.push_digit(byte) {
                tracing::debug!(
                    limit = MAX_PARAMETERS,
                    "too many parameters, dropping sequence"
                );
                data.abort();
                return ParseResult::NormalCharacter;
            }

            return ParseResult::PartialCommand;
        }
    } else if byte == PARAMETER_SEPARATOR {
        data.next_parameter();
        return ParseResult::PartialCommand;
    }

    if !data.push_command_byte(byte) {
        tracing::debug!(
            limit = MAX_COMMAND_CHARACTERS,
            "command too long, dropping sequence"
        );
        data.abort();
        return ParseResult::NormalCharacter;
    }

    if byte == INTRODUCER {
        return ParseResult::PartialCommand;
    }

    match scan_table(data.pre_parameter(), data.post_parameter()) {
        TableScan::Complete(entry) => {
            data.complete(entry);
            ParseResult::CompleteCommand
        }
        TableScan::Partial => ParseResult::PartialCommand,
        TableScan::NoMatch => {
            tracing::trace!(
                pre = ?data.pre_parameter(),
                post = ?data.post_parameter(),
                "unrecognized sequence"
            );
            data.abort();
            ParseResult::NormalCharacter
        }
    }
}
