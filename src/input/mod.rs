//! Keyboard Input Codec
//!
//! Decodes the byte stream a terminal sends for key presses into keys, and
//! encodes keys back into those bytes.
//!
//! # Keys
//!
//! Special keys arrive as escape sequences (`ESC [ A` for Up, `ESC [ 3 ~`
//! for Delete). A key pressed with Alt held is sent with one extra leading
//! escape (`ESC ESC [ A`), so a doubled escape sets [`KeyFlags::ALT`] on the
//! key that follows.

mod encode;

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::parser::{match_sequence, Match, ParseNameError, ParseResult, ESCAPE};

pub use encode::{create_input_sequence, input_sequence};

/// Buffer capacity for one key sequence, including the leading escape
pub const MAX_KEY_CHARACTERS: usize = 5;

/// Special keys that produce escape sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalKey {
    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
}

impl TerminalKey {
    /// Every key, in declaration order
    pub const ALL: [TerminalKey; 10] = [
        TerminalKey::Up,
        TerminalKey::Down,
        TerminalKey::Left,
        TerminalKey::Right,
        TerminalKey::Home,
        TerminalKey::End,
        TerminalKey::PageUp,
        TerminalKey::PageDown,
        TerminalKey::Insert,
        TerminalKey::Delete,
    ];

    /// Stable name used in logs and on the command line
    pub fn name(self) -> &'static str {
        match self {
            TerminalKey::Up => "up",
            TerminalKey::Down => "down",
            TerminalKey::Left => "left",
            TerminalKey::Right => "right",
            TerminalKey::Home => "home",
            TerminalKey::End => "end",
            TerminalKey::PageUp => "page-up",
            TerminalKey::PageDown => "page-down",
            TerminalKey::Insert => "insert",
            TerminalKey::Delete => "delete",
        }
    }
}

impl fmt::Display for TerminalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerminalKey {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerminalKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ParseNameError {
                kind: "key",
                name: s.to_string(),
            })
    }
}

bitflags! {
    /// Modifiers carried by a decoded key
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyFlags: u8 {
        /// The key was preceded by an extra escape
        const ALT = 1 << 0;
    }
}

/// A single row of the key table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    /// Bytes after the leading escape
    pub sequence: &'static [u8],
    /// Whether the sequence belongs to application keypad mode. The decoder
    /// and encoder only use normal-mode rows.
    pub application_mode: bool,
    pub key: TerminalKey,
}

const fn key(sequence: &'static [u8], key: TerminalKey) -> KeyEntry {
    KeyEntry {
        sequence,
        application_mode: false,
        key,
    }
}

/// Key sequences in normal (non-application) mode
pub static KEY_TABLE: [KeyEntry; 10] = [
    key(b"[A", TerminalKey::Up),
    key(b"[B", TerminalKey::Down),
    key(b"[C", TerminalKey::Right),
    key(b"[D", TerminalKey::Left),
    key(b"[2~", TerminalKey::Insert),
    key(b"[3~", TerminalKey::Delete),
    key(b"[1~", TerminalKey::Home),
    key(b"[4~", TerminalKey::End),
    key(b"[5~", TerminalKey::PageUp),
    key(b"[6~", TerminalKey::PageDown),
];

/// Rows of the key table that apply in normal keypad mode
fn normal_mode_keys() -> impl Iterator<Item = &'static KeyEntry> {
    KEY_TABLE.iter().filter(|entry| !entry.application_mode)
}

/// Find the normal-mode table entry for a key
pub fn lookup_key(key: TerminalKey) -> Option<&'static KeyEntry> {
    normal_mode_keys().find(|entry| entry.key == key)
}

/// Decode state for one terminal input stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyData {
    buffer: [u8; MAX_KEY_CHARACTERS],
    buffer_size: usize,
    flags: KeyFlags,
    key: Option<TerminalKey>,
}

impl KeyData {
    /// Create an idle decode state
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe a key press for encoding
    pub fn with_key(key: TerminalKey, flags: KeyFlags) -> Self {
        Self {
            key: Some(key),
            flags,
            ..Self::default()
        }
    }

    /// Feed one input byte
    pub fn process(&mut self, byte: u8) -> ParseResult {
        process_input(self, byte)
    }

    /// Discard any sequence in progress
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The decoded key, once complete
    pub fn key(&self) -> Option<TerminalKey> {
        self.key
    }

    pub fn flags(&self) -> KeyFlags {
        self.flags
    }

    /// Bytes of the sequence in progress, starting with the escape
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[..self.buffer_size]
    }

    /// Check if no sequence is in progress
    pub fn is_idle(&self) -> bool {
        self.buffer_size == 0
    }
}

/// Process one byte of terminal input
///
/// A second escape directly after the first marks the coming key as pressed
/// with Alt. Bytes that cannot continue any key sequence end it and are
/// reported as normal characters.
pub fn process_input(data: &mut KeyData, byte: u8) -> ParseResult {
    if byte == ESCAPE {
        if data.buffer_size == 1 && data.buffer[0] == ESCAPE {
            data.flags.insert(KeyFlags::ALT);
            return ParseResult::PartialCommand;
        }

        data.buffer[0] = ESCAPE;
        data.buffer_size = 1;
        data.flags = KeyFlags::empty();
        data.key = None;
        return ParseResult::PartialCommand;
    }

    if data.is_idle() {
        return ParseResult::NormalCharacter;
    }

    // No table entry is this long, so a full buffer means the scan below
    // failed to end the sequence.
    if data.buffer_size == MAX_KEY_CHARACTERS {
        tracing::warn!(
            buffered = ?data.buffered(),
            "key sequence overflow, dropping sequence"
        );
        data.buffer_size = 0;
        return ParseResult::NormalCharacter;
    }

    data.buffer[data.buffer_size] = byte;
    data.buffer_size += 1;

    let sequence = &data.buffer[1..data.buffer_size];
    let mut partial = false;
    for entry in normal_mode_keys() {
        match match_sequence(sequence, entry.sequence) {
            Match::Full => {
                data.key = Some(entry.key);
                data.buffer_size = 0;
                return ParseResult::CompleteCommand;
            }
            Match::Partial => partial = true,
            Match::None => {}
        }
    }

    if partial {
        return ParseResult::PartialCommand;
    }

    tracing::trace!(buffered = ?data.buffered(), "unrecognized key sequence");
    data.buffer_size = 0;
    ParseResult::NormalCharacter
}
