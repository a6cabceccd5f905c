//! Command table
//!
//! Static decode table shared by the output decoder and encoder. Each entry
//! holds the literal bytes that appear before and after the numeric parameter
//! list of a sequence (the leading ESC is implied).
//!
//! Entries are scanned in order and the first full match wins, so the order
//! of this table is significant. An entry with an empty pre-parameter string
//! has its final byte directly after the escape (`ESC 7`). An entry with an
//! empty post-parameter string accepts any single trailing byte (`ESC ( B`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Commands recognized in terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalCommand {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    CursorMove,
    SetCursorRowAbsolute,
    SetCursorColumnAbsolute,
    NextLine,
    ReverseLineFeed,
    SaveCursorAndAttributes,
    RestoreCursorAndAttributes,
    SetHorizontalTab,
    ClearHorizontalTab,
    SetTopAndBottomMargin,
    EraseInDisplay,
    EraseInDisplaySelective,
    EraseInLine,
    EraseInLineSelective,
    InsertLines,
    DeleteLines,
    InsertCharacters,
    DeleteCharacters,
    EraseCharacters,
    KeypadNumeric,
    KeypadApplication,
    SetMode,
    ClearMode,
    SetPrivateMode,
    ClearPrivateMode,
    SelectG0CharacterSet,
    SelectG1CharacterSet,
    SelectG2CharacterSet,
    SelectG3CharacterSet,
    SelectGraphicRendition,
    Reset,
    SoftReset,
    DeviceAttributesPrimary,
    DeviceAttributesSecondary,
    ScrollUp,
    ScrollDown,
    DoubleLineHeightTopHalf,
    DoubleLineHeightBottomHalf,
    SingleWidthLine,
    DoubleWidthLine,
}

impl TerminalCommand {
    /// Every command, in declaration order
    pub const ALL: [TerminalCommand; 44] = [
        TerminalCommand::CursorUp,
        TerminalCommand::CursorDown,
        TerminalCommand::CursorLeft,
        TerminalCommand::CursorRight,
        TerminalCommand::CursorMove,
        TerminalCommand::SetCursorRowAbsolute,
        TerminalCommand::SetCursorColumnAbsolute,
        TerminalCommand::NextLine,
        TerminalCommand::ReverseLineFeed,
        TerminalCommand::SaveCursorAndAttributes,
        TerminalCommand::RestoreCursorAndAttributes,
        TerminalCommand::SetHorizontalTab,
        TerminalCommand::ClearHorizontalTab,
        TerminalCommand::SetTopAndBottomMargin,
        TerminalCommand::EraseInDisplay,
        TerminalCommand::EraseInDisplaySelective,
        TerminalCommand::EraseInLine,
        TerminalCommand::EraseInLineSelective,
        TerminalCommand::InsertLines,
        TerminalCommand::DeleteLines,
        TerminalCommand::InsertCharacters,
        TerminalCommand::DeleteCharacters,
        TerminalCommand::EraseCharacters,
        TerminalCommand::KeypadNumeric,
        TerminalCommand::KeypadApplication,
        TerminalCommand::SetMode,
        TerminalCommand::ClearMode,
        TerminalCommand::SetPrivateMode,
        TerminalCommand::ClearPrivateMode,
        TerminalCommand::SelectG0CharacterSet,
        TerminalCommand::SelectG1CharacterSet,
        TerminalCommand::SelectG2CharacterSet,
        TerminalCommand::SelectG3CharacterSet,
        TerminalCommand::SelectGraphicRendition,
        TerminalCommand::Reset,
        TerminalCommand::SoftReset,
        TerminalCommand::DeviceAttributesPrimary,
        TerminalCommand::DeviceAttributesSecondary,
        TerminalCommand::ScrollUp,
        TerminalCommand::ScrollDown,
        TerminalCommand::DoubleLineHeightTopHalf,
        TerminalCommand::DoubleLineHeightBottomHalf,
        TerminalCommand::SingleWidthLine,
        TerminalCommand::DoubleWidthLine,
    ];

    /// Stable name used in logs and on the command line
    pub fn name(self) -> &'static str {
        match self {
            TerminalCommand::CursorUp => "cursor-up",
            TerminalCommand::CursorDown => "cursor-down",
            TerminalCommand::CursorLeft => "cursor-left",
            TerminalCommand::CursorRight => "cursor-right",
            TerminalCommand::CursorMove => "cursor-move",
            TerminalCommand::SetCursorRowAbsolute => "set-cursor-row-absolute",
            TerminalCommand::SetCursorColumnAbsolute => "set-cursor-column-absolute",
            TerminalCommand::NextLine => "next-line",
            TerminalCommand::ReverseLineFeed => "reverse-line-feed",
            TerminalCommand::SaveCursorAndAttributes => "save-cursor",
            TerminalCommand::RestoreCursorAndAttributes => "restore-cursor",
            TerminalCommand::SetHorizontalTab => "set-horizontal-tab",
            TerminalCommand::ClearHorizontalTab => "clear-horizontal-tab",
            TerminalCommand::SetTopAndBottomMargin => "set-margins",
            TerminalCommand::EraseInDisplay => "erase-in-display",
            TerminalCommand::EraseInDisplaySelective => "erase-in-display-selective",
            TerminalCommand::EraseInLine => "erase-in-line",
            TerminalCommand::EraseInLineSelective => "erase-in-line-selective",
            TerminalCommand::InsertLines => "insert-lines",
            TerminalCommand::DeleteLines => "delete-lines",
            TerminalCommand::InsertCharacters => "insert-characters",
            TerminalCommand::DeleteCharacters => "delete-characters",
            TerminalCommand::EraseCharacters => "erase-characters",
            TerminalCommand::KeypadNumeric => "keypad-numeric",
            TerminalCommand::KeypadApplication => "keypad-application",
            TerminalCommand::SetMode => "set-mode",
            TerminalCommand::ClearMode => "clear-mode",
            TerminalCommand::SetPrivateMode => "set-private-mode",
            TerminalCommand::ClearPrivateMode => "clear-private-mode",
            TerminalCommand::SelectG0CharacterSet => "select-g0",
            TerminalCommand::SelectG1CharacterSet => "select-g1",
            TerminalCommand::SelectG2CharacterSet => "select-g2",
            TerminalCommand::SelectG3CharacterSet => "select-g3",
            TerminalCommand::SelectGraphicRendition => "sgr",
            TerminalCommand::Reset => "reset",
            TerminalCommand::SoftReset => "soft-reset",
            TerminalCommand::DeviceAttributesPrimary => "device-attributes-primary",
            TerminalCommand::DeviceAttributesSecondary => "device-attributes-secondary",
            TerminalCommand::ScrollUp => "scroll-up",
            TerminalCommand::ScrollDown => "scroll-down",
            TerminalCommand::DoubleLineHeightTopHalf => "double-height-top",
            TerminalCommand::DoubleLineHeightBottomHalf => "double-height-bottom",
            TerminalCommand::SingleWidthLine => "single-width-line",
            TerminalCommand::DoubleWidthLine => "double-width-line",
        }
    }

    /// Check if this command designates a character set
    pub fn is_character_set_select(self) -> bool {
        matches!(
            self,
            TerminalCommand::SelectG0CharacterSet
                | TerminalCommand::SelectG1CharacterSet
                | TerminalCommand::SelectG2CharacterSet
                | TerminalCommand::SelectG3CharacterSet
        )
    }
}

impl fmt::Display for TerminalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a command or key name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} name: {name}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub name: String,
}

impl FromStr for TerminalCommand {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerminalCommand::ALL
            .iter()
            .copied()
            .find(|command| command.name() == s)
            .ok_or_else(|| ParseNameError {
                kind: "command",
                name: s.to_string(),
            })
    }
}

/// A single row of the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeEntry {
    /// Bytes between ESC and the parameters
    pub pre_parameter: &'static [u8],
    /// Bytes after the parameters
    pub post_parameter: &'static [u8],
    pub command: TerminalCommand,
}

const fn entry(
    pre_parameter: &'static [u8],
    post_parameter: &'static [u8],
    command: TerminalCommand,
) -> DecodeEntry {
    DecodeEntry {
        pre_parameter,
        post_parameter,
        command,
    }
}

/// The VT220/xterm command subset understood by the codec
pub static COMMAND_TABLE: [DecodeEntry; 48] = [
    entry(b"[", b"A", TerminalCommand::CursorUp),
    entry(b"[", b"B", TerminalCommand::CursorDown),
    entry(b"[", b"C", TerminalCommand::CursorRight),
    entry(b"[", b"D", TerminalCommand::CursorLeft),
    entry(b"[", b"f", TerminalCommand::CursorMove),
    entry(b"[", b"H", TerminalCommand::CursorMove),
    entry(b"[", b"d", TerminalCommand::SetCursorRowAbsolute),
    entry(b"[", b"e", TerminalCommand::CursorDown),
    entry(b"[", b"G", TerminalCommand::SetCursorColumnAbsolute),
    entry(b"", b"c", TerminalCommand::Reset),
    entry(b"", b"D", TerminalCommand::CursorDown),
    entry(b"", b"E", TerminalCommand::NextLine),
    entry(b"", b"M", TerminalCommand::ReverseLineFeed),
    entry(b"", b"7", TerminalCommand::SaveCursorAndAttributes),
    entry(b"", b"8", TerminalCommand::RestoreCursorAndAttributes),
    entry(b"", b"H", TerminalCommand::SetHorizontalTab),
    entry(b"[", b"g", TerminalCommand::ClearHorizontalTab),
    entry(b"[", b"r", TerminalCommand::SetTopAndBottomMargin),
    entry(b"[", b"J", TerminalCommand::EraseInDisplay),
    entry(b"[?", b"J", TerminalCommand::EraseInDisplaySelective),
    entry(b"[", b"K", TerminalCommand::EraseInLine),
    entry(b"[?", b"K", TerminalCommand::EraseInLineSelective),
    entry(b"[", b"L", TerminalCommand::InsertLines),
    entry(b"[", b"M", TerminalCommand::DeleteLines),
    entry(b"[", b"@", TerminalCommand::InsertCharacters),
    entry(b"[", b"P", TerminalCommand::DeleteCharacters),
    entry(b"[", b"X", TerminalCommand::EraseCharacters),
    entry(b"", b">", TerminalCommand::KeypadNumeric),
    entry(b"", b"=", TerminalCommand::KeypadApplication),
    entry(b"[", b"l", TerminalCommand::ClearMode),
    entry(b"[", b"h", TerminalCommand::SetMode),
    entry(b"[?", b"l", TerminalCommand::ClearPrivateMode),
    entry(b"[?", b"h", TerminalCommand::SetPrivateMode),
    entry(b"(", b"", TerminalCommand::SelectG0CharacterSet),
    entry(b")", b"", TerminalCommand::SelectG1CharacterSet),
    entry(b"*", b"", TerminalCommand::SelectG2CharacterSet),
    entry(b"+", b"", TerminalCommand::SelectG3CharacterSet),
    entry(b"[", b"m", TerminalCommand::SelectGraphicRendition),
    entry(b"", b"c", TerminalCommand::Reset),
    entry(b"[", b"!p", TerminalCommand::SoftReset),
    entry(b"[", b"c", TerminalCommand::DeviceAttributesPrimary),
    entry(b"[", b">c", TerminalCommand::DeviceAttributesSecondary),
    entry(b"[", b"S", TerminalCommand::ScrollUp),
    entry(b"[", b"T", TerminalCommand::ScrollDown),
    entry(b"#", b"3", TerminalCommand::DoubleLineHeightTopHalf),
    entry(b"#", b"4", TerminalCommand::DoubleLineHeightBottomHalf),
    entry(b"#", b"5", TerminalCommand::SingleWidthLine),
    entry(b"#", b"6", TerminalCommand::DoubleWidthLine),
];

/// Find the first table entry that encodes the given command
pub fn lookup_command(command: TerminalCommand) -> Option<&'static DecodeEntry> {
    COMMAND_TABLE.iter().find(|entry| entry.command == command)
}
