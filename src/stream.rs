//! Batch decoding of byte streams
//!
//! [`OutputStream`] and [`InputStream`] wrap the per-byte decoders and turn a
//! chunk of bytes into a list of events. Bytes that are still part of an
//! unfinished sequence produce no event; they are held in the decoder state
//! until a later chunk finishes the sequence.

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::input::{KeyData, KeyFlags, TerminalKey};
use crate::parser::{CommandData, ParseResult, TerminalCommand};

/// A command decoded from terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCommand {
    pub command: TerminalCommand,
    pub parameters: Vec<u32>,
    /// Character set designator (`B` in `ESC ( B`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designator: Option<u8>,
}

impl DecodedCommand {
    fn from_state(data: &CommandData) -> Option<Self> {
        let command = data.command()?;
        let designator = if command.is_character_set_select() {
            data.post_parameter().first().copied()
        } else {
            None
        };

        Some(Self {
            command,
            parameters: data.parameters().to_vec(),
            designator,
        })
    }
}

/// Event produced while decoding terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputEvent {
    /// A byte to display as-is
    Text(u8),
    Command(DecodedCommand),
}

/// Event produced while decoding terminal input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A byte to forward as-is
    Text(u8),
    Key { key: TerminalKey, alt: bool },
}

/// Decoder for a terminal output stream
#[derive(Debug, Clone, Default)]
pub struct OutputStream {
    state: CommandData,
    config: CodecConfig,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            state: CommandData::new(),
            config,
        }
    }

    /// Decode a chunk of bytes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<OutputEvent> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// Decode a single byte
    pub fn push(&mut self, byte: u8) -> Option<OutputEvent> {
        let in_sequence = !self.state.is_idle();

        match self.state.process(byte) {
            ParseResult::NormalCharacter => {
                if in_sequence && self.config.reset_on_control && !self.state.is_idle() {
                    tracing::debug!(byte, "control byte interrupted sequence");
                    self.state.reset();
                }

                Some(OutputEvent::Text(byte))
            }
            ParseResult::PartialCommand => None,
            ParseResult::CompleteCommand => {
                if self.config.normalize {
                    self.state.normalize();
                }

                let decoded = DecodedCommand::from_state(&self.state)?;
                if self.config.log_sequences {
                    tracing::trace!(
                        command = %decoded.command,
                        parameters = ?decoded.parameters,
                        "decoded command"
                    );
                }

                Some(OutputEvent::Command(decoded))
            }
        }
    }

    /// The underlying decode state
    pub fn state(&self) -> &CommandData {
        &self.state
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Discard any sequence in progress
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

/// Decoder for a terminal input stream
#[derive(Debug, Clone, Default)]
pub struct InputStream {
    state: KeyData,
    config: CodecConfig,
}

impl InputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            state: KeyData::new(),
            config,
        }
    }

    /// Decode a chunk of bytes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// Decode a single byte
    pub fn push(&mut self, byte: u8) -> Option<InputEvent> {
        match self.state.process(byte) {
            ParseResult::NormalCharacter => Some(InputEvent::Text(byte)),
            ParseResult::PartialCommand => None,
            ParseResult::CompleteCommand => {
                let key = self.state.key()?;
                let alt = self.state.flags().contains(KeyFlags::ALT);
                if self.config.log_sequences {
                    tracing::trace!(%key, alt, "decoded key");
                }

                Some(InputEvent::Key { key, alt })
            }
        }
    }

    /// The underlying decode state
    pub fn state(&self) -> &KeyData {
        &self.state
    }

    /// Discard any sequence in progress
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(command: TerminalCommand, parameters: &[u32]) -> OutputEvent {
        OutputEvent::Command(DecodedCommand {
            command,
            parameters: parameters.to_vec(),
            designator: None,
        })
    }

    #[test]
    fn test_output_stream_mixed() {
        let mut stream = OutputStream::new();
        let events = stream.feed(b"a\x1b[31mb\x1b[H");
        assert_eq!(
            events,
            vec![
                OutputEvent::Text(b'a'),
                command(TerminalCommand::SelectGraphicRendition, &[31]),
                OutputEvent::Text(b'b'),
                command(TerminalCommand::CursorMove, &[1, 1]),
            ]
        );
    }

    #[test]
    fn test_output_stream_without_normalize() {
        let config = CodecConfig {
            normalize: false,
            ..CodecConfig::default()
        };
        let mut stream = OutputStream::with_config(config);
        assert_eq!(
            stream.feed(b"\x1b[A"),
            vec![command(TerminalCommand::CursorUp, &[])]
        );
    }

    #[test]
    fn test_output_stream_split_chunks() {
        let mut stream = OutputStream::new();
        assert!(stream.feed(b"\x1b[1").is_empty());
        assert!(stream.feed(b"0;").is_empty());
        assert_eq!(
            stream.feed(b"4H"),
            vec![command(TerminalCommand::CursorMove, &[10, 4])]
        );
    }

    #[test]
    fn test_output_stream_designator() {
        let mut stream = OutputStream::new();
        assert_eq!(
            stream.feed(b"\x1b(0"),
            vec![OutputEvent::Command(DecodedCommand {
                command: TerminalCommand::SelectG0CharacterSet,
                parameters: Vec::new(),
                designator: Some(b'0'),
            })]
        );
    }

    #[test]
    fn test_output_stream_control_keeps_sequence() {
        let mut stream = OutputStream::new();
        assert_eq!(
            stream.feed(b"\x1b[2\rJ"),
            vec![
                OutputEvent::Text(b'\r'),
                command(TerminalCommand::EraseInDisplay, &[2]),
            ]
        );
    }

    #[test]
    fn test_output_stream_reset_on_control() {
        let config = CodecConfig {
            reset_on_control: true,
            ..CodecConfig::default()
        };
        let mut stream = OutputStream::with_config(config);
        assert_eq!(
            stream.feed(b"\x1b[2\rJ"),
            vec![OutputEvent::Text(b'\r'), OutputEvent::Text(b'J')]
        );
        assert!(stream.state().is_idle());
    }

    #[test]
    fn test_output_stream_reset() {
        let mut stream = OutputStream::new();
        stream.feed(b"\x1b[5");
        stream.reset();
        assert!(stream.state().is_idle());
        assert_eq!(stream.feed(b"A"), vec![OutputEvent::Text(b'A')]);
    }

    #[test]
    fn test_input_stream() {
        let mut stream = InputStream::new();
        assert_eq!(
            stream.feed(b"q\x1b[A\x1b\x1b[3~"),
            vec![
                InputEvent::Text(b'q'),
                InputEvent::Key {
                    key: TerminalKey::Up,
                    alt: false
                },
                InputEvent::Key {
                    key: TerminalKey::Delete,
                    alt: true
                },
            ]
        );
    }

    #[test]
    fn test_input_stream_unknown_sequence() {
        let mut stream = InputStream::new();
        assert_eq!(stream.feed(b"\x1b[Z"), vec![InputEvent::Text(b'Z')]);
        assert!(stream.state().is_idle());
    }

    #[test]
    fn test_events_serialize() {
        let event = command(TerminalCommand::CursorUp, &[3]);
        let json = serde_json::to_string(&event).unwrap();
        let restored: OutputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}
