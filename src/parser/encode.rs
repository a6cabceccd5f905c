//! Output sequence encoding
//!
//! Serializes a command back into the bytes a terminal expects:
//!
//! ```text
//! ESC <pre-parameter> <n>;<n>;...<n> <post-parameter>
//! ESC <pre-parameter> <designator>        (character set selection)
//! ```

use std::io::Write;

use super::state::CommandData;
use super::table::lookup_command;
use super::{ESCAPE, MAX_COMMAND_CHARACTERS, MAX_PARAMETERS, PARAMETER_SEPARATOR};
use crate::error::{EncodeError, EncodeResult};

/// Longest sequence the encoder can produce: ESC, both literal strings, and
/// every parameter at full `u32` width with its separator.
const MAX_SEQUENCE_LENGTH: usize = 1 + 2 * MAX_COMMAND_CHARACTERS + MAX_PARAMETERS * 11;

/// Render the sequence into `out`, returning the number of bytes written
fn render(data: &CommandData, out: &mut [u8]) -> EncodeResult<usize> {
    let command = data.command().ok_or(EncodeError::UnknownCommand)?;
    let entry = lookup_command(command).ok_or(EncodeError::UnknownCommand)?;

    let available = out.len();
    let mut cursor: &mut [u8] = out;
    // `needed` is only a lower bound here; the callers render into scratch
    // space that always fits.
    let overflow = |_| EncodeError::BufferTooSmall {
        needed: available + 1,
        available,
    };

    cursor.write_all(&[ESCAPE]).map_err(overflow)?;
    cursor.write_all(entry.pre_parameter).map_err(overflow)?;

    if entry.post_parameter.is_empty() {
        let &[designator] = data.post_parameter() else {
            return Err(EncodeError::MissingDesignator { command });
        };

        cursor.write_all(&[designator]).map_err(overflow)?;
    } else {
        for (index, parameter) in data.parameters().iter().enumerate() {
            if index > 0 {
                cursor.write_all(&[PARAMETER_SEPARATOR]).map_err(overflow)?;
            }

            write!(cursor, "{parameter}").map_err(overflow)?;
        }

        cursor.write_all(entry.post_parameter).map_err(overflow)?;
    }

    Ok(available - cursor.len())
}

/// Create the escape sequence for a command in a caller-supplied buffer
///
/// Returns the number of bytes written. On failure the buffer is left as it
/// was, so nothing partial can be mistaken for a valid sequence.
pub fn create_output_sequence(data: &CommandData, buffer: &mut [u8]) -> EncodeResult<usize> {
    let mut scratch = [0u8; MAX_SEQUENCE_LENGTH];
    let length = render(data, &mut scratch)?;
    let available = buffer.len();
    let destination = buffer
        .get_mut(..length)
        .ok_or(EncodeError::BufferTooSmall {
            needed: length,
            available,
        })?;

    destination.copy_from_slice(&scratch[..length]);
    Ok(length)
}

/// Create the escape sequence for a command
pub fn output_sequence(data: &CommandData) -> EncodeResult<Vec<u8>> {
    let mut scratch = [0u8; MAX_SEQUENCE_LENGTH];
    let length = render(data, &mut scratch)?;
    Ok(scratch[..length].to_vec())
}
