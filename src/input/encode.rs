//! Key sequence encoding

use super::{lookup_key, KeyData, KeyFlags};
use crate::error::{EncodeError, EncodeResult};
use crate::parser::ESCAPE;

/// Create the escape sequence for a key press in a caller-supplied buffer
///
/// Alt is sent as an extra leading escape. Returns the number of bytes
/// written; on failure the buffer is left as it was.
pub fn create_input_sequence(data: &KeyData, buffer: &mut [u8]) -> EncodeResult<usize> {
    let key = data.key().ok_or(EncodeError::UnknownKey)?;
    let entry = lookup_key(key).ok_or(EncodeError::UnknownKey)?;

    let alt = data.flags().contains(KeyFlags::ALT);
    let prefix = if alt { 2 } else { 1 };
    let length = prefix + entry.sequence.len();
    let available = buffer.len();
    let destination = buffer
        .get_mut(..length)
        .ok_or(EncodeError::BufferTooSmall {
            needed: length,
            available,
        })?;

    let (escapes, sequence) = destination.split_at_mut(prefix);
    escapes.fill(ESCAPE);
    sequence.copy_from_slice(entry.sequence);
    Ok(length)
}

/// Create the escape sequence for a key press
pub fn input_sequence(data: &KeyData) -> EncodeResult<Vec<u8>> {
    let mut buffer = [0u8; super::MAX_KEY_CHARACTERS + 1];
    let length = create_input_sequence(data, &mut buffer)?;
    Ok(buffer[..length].to_vec())
}
