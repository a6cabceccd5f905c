//! End-to-end tests for the escape sequence codec
//!
//! These tests drive the public API the way a terminal would: decoding whole
//! sequences one byte at a time and encoding commands and keys back into
//! bytes.

use mochi_codec::input::{
    create_input_sequence, input_sequence, process_input, KeyData, KeyFlags, TerminalKey,
};
use mochi_codec::parser::{
    create_output_sequence, lookup_command, output_sequence, process_output, CommandData,
    ParseResult, TerminalCommand, COMMAND_TABLE, ESCAPE, INTRODUCER, MAX_COMMAND_CHARACTERS,
    MAX_PARAMETERS,
};
use mochi_codec::{EncodeError, OutputEvent, OutputStream};
use proptest::prelude::*;

/// Decode a sequence that must complete on exactly its last byte
fn decode_output(bytes: &[u8]) -> CommandData {
    let mut data = CommandData::new();
    for (index, &byte) in bytes.iter().enumerate() {
        let expected = if index + 1 == bytes.len() {
            ParseResult::CompleteCommand
        } else {
            ParseResult::PartialCommand
        };
        assert_eq!(process_output(&mut data, byte), expected, "{bytes:?} at {index}");
    }
    data
}

fn decode_input(bytes: &[u8]) -> KeyData {
    let mut data = KeyData::new();
    for (index, &byte) in bytes.iter().enumerate() {
        let expected = if index + 1 == bytes.len() {
            ParseResult::CompleteCommand
        } else {
            ParseResult::PartialCommand
        };
        assert_eq!(process_input(&mut data, byte), expected, "{bytes:?} at {index}");
    }
    data
}

/// Parameters to encode with a command, if its sequence can carry any
fn sample_parameters(command: TerminalCommand) -> &'static [u32] {
    match lookup_command(command) {
        Some(entry) if entry.pre_parameter.first() == Some(&INTRODUCER) => &[3, 14],
        _ => &[],
    }
}

fn encode_request(command: TerminalCommand) -> CommandData {
    let data = CommandData::with_command(command).parameters_from(sample_parameters(command));
    if command.is_character_set_select() {
        data.post_parameter_byte(b'B')
    } else {
        data
    }
}

#[test]
fn test_cursor_move_parameters() {
    let data = decode_output(b"\x1b[1;2H");
    assert_eq!(data.command(), Some(TerminalCommand::CursorMove));
    assert_eq!(data.parameters(), &[1, 2]);
}

#[test]
fn test_every_command_round_trips() {
    for command in TerminalCommand::ALL {
        let request = encode_request(command);
        let bytes = output_sequence(&request).unwrap();
        let decoded = decode_output(&bytes);

        assert_eq!(decoded.command(), Some(command), "{bytes:?}");
        assert_eq!(decoded.parameters(), request.parameters(), "{command}");
        if command.is_character_set_select() {
            assert_eq!(decoded.post_parameter(), b"B");
        }
    }
}

#[test]
fn test_bare_sequences_decode_and_reencode() {
    let rows = COMMAND_TABLE
        .iter()
        .filter(|entry| entry.pre_parameter.is_empty() || entry.pre_parameter == b"#");

    for entry in rows {
        let mut bytes = vec![ESCAPE];
        bytes.extend_from_slice(entry.pre_parameter);
        bytes.extend_from_slice(entry.post_parameter);

        let decoded = decode_output(&bytes);
        let encoded = output_sequence(&decoded).unwrap();

        // `ESC D` shares its tag with `ESC [ B`, which comes first in the table.
        if bytes == b"\x1bD" {
            assert_eq!(decoded.command(), Some(TerminalCommand::CursorDown));
            assert_eq!(encoded, b"\x1b[B");
        } else {
            assert_eq!(decoded.command(), Some(entry.command), "{bytes:?}");
            assert_eq!(encoded, bytes, "{}", entry.command);
        }
    }
}

#[test]
fn test_every_key_round_trips() {
    for key in TerminalKey::ALL {
        for flags in [KeyFlags::empty(), KeyFlags::ALT] {
            let bytes = input_sequence(&KeyData::with_key(key, flags)).unwrap();
            let decoded = decode_input(&bytes);
            assert_eq!(decoded.key(), Some(key));
            assert_eq!(decoded.flags(), flags);
        }
    }
}

#[test]
fn test_delete_and_alt_up() {
    assert_eq!(decode_input(b"\x1b[3~").key(), Some(TerminalKey::Delete));

    let data = decode_input(b"\x1b\x1b[A");
    assert_eq!(data.key(), Some(TerminalKey::Up));
    assert!(data.flags().contains(KeyFlags::ALT));
}

#[test]
fn test_motion_defaults_after_normalize() {
    for command in [
        TerminalCommand::CursorUp,
        TerminalCommand::CursorDown,
        TerminalCommand::CursorLeft,
        TerminalCommand::CursorRight,
    ] {
        let bytes = output_sequence(&CommandData::with_command(command)).unwrap();
        let mut data = decode_output(&bytes);
        data.normalize();
        assert_eq!(data.parameters(), &[1], "{command}");
    }
}

#[test]
fn test_parameter_overflow_aborts() {
    let mut data = CommandData::new();
    let results: Vec<_> = b"\x1b[1;2;3;4;5;6;7;8;9m"
        .iter()
        .map(|&b| process_output(&mut data, b))
        .collect();

    // The ninth parameter digit aborts the sequence.
    let abort = results.iter().position(|r| r.is_normal()).unwrap();
    assert_eq!(abort, 18);
    assert!(results[..abort].iter().all(|&r| r == ParseResult::PartialCommand));
    assert!(results[abort..].iter().all(|r| r.is_normal()));
    assert_eq!(data.command(), None);
}

#[test]
fn test_encode_failures_leave_buffer_untouched() {
    let mut buffer = [0x55u8; 32];

    assert_eq!(
        create_output_sequence(&CommandData::new(), &mut buffer),
        Err(EncodeError::UnknownCommand)
    );
    assert_eq!(
        create_input_sequence(&KeyData::new(), &mut buffer),
        Err(EncodeError::UnknownKey)
    );

    let request = CommandData::with_command(TerminalCommand::SelectGraphicRendition)
        .parameters_from(&[38, 2, 255, 128, 0]);
    let mut small = [0x55u8; 4];
    assert!(matches!(
        create_output_sequence(&request, &mut small),
        Err(EncodeError::BufferTooSmall { available: 4, .. })
    ));
    assert_eq!(small, [0x55; 4]);
    assert_eq!(buffer, [0x55; 32]);
}

#[test]
fn test_stream_decodes_typical_output() {
    let mut stream = OutputStream::new();
    let events = stream.feed(b"\x1b[2J\x1b[H$ \x1b[1;32mok\x1b[0m\r\n");

    let commands: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            OutputEvent::Command(decoded) => Some(decoded.command),
            OutputEvent::Text(_) => None,
        })
        .collect();
    assert_eq!(
        commands,
        vec![
            TerminalCommand::EraseInDisplay,
            TerminalCommand::CursorMove,
            TerminalCommand::SelectGraphicRendition,
            TerminalCommand::SelectGraphicRendition,
        ]
    );

    let text: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            OutputEvent::Text(byte) => Some(*byte),
            OutputEvent::Command(_) => None,
        })
        .collect();
    assert_eq!(text, b"$ ok\r\n");
}

proptest! {
    #[test]
    fn prop_arbitrary_output_stays_in_bounds(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut data = CommandData::new();
        for byte in bytes {
            process_output(&mut data, byte);
            prop_assert!(data.parameters().len() <= MAX_PARAMETERS);
            prop_assert!(data.pre_parameter().len() <= MAX_COMMAND_CHARACTERS);
            prop_assert!(data.post_parameter().len() <= MAX_COMMAND_CHARACTERS);
        }
    }

    #[test]
    fn prop_arbitrary_input_stays_in_bounds(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut data = KeyData::new();
        for byte in bytes {
            process_input(&mut data, byte);
            prop_assert!(data.buffered().len() <= mochi_codec::input::MAX_KEY_CHARACTERS);
        }
    }

    #[test]
    fn prop_sgr_parameters_round_trip(parameters in proptest::collection::vec(any::<u32>(), 0..=MAX_PARAMETERS)) {
        let request = CommandData::with_command(TerminalCommand::SelectGraphicRendition)
            .parameters_from(&parameters);
        let bytes = output_sequence(&request).unwrap();

        let mut data = CommandData::new();
        let last = bytes.iter().map(|&b| process_output(&mut data, b)).last();
        prop_assert_eq!(last, Some(ParseResult::CompleteCommand));
        prop_assert_eq!(data.parameters(), &parameters[..]);
    }
}
