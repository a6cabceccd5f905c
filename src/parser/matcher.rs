//! Prefix matching against table entries
//!
//! Both decoders accumulate bytes and test them against static tables after
//! every byte. The functions here are pure: they only compare what has been
//! collected so far against one entry and report whether the entry is
//! complete, could still complete, or can be ruled out.

use super::table::DecodeEntry;

/// Result of testing collected bytes against one table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// The collected bytes are exactly this entry
    Full,
    /// The collected bytes are a prefix of this entry
    Partial,
    /// The entry cannot match
    None,
}

/// Length of the run of bytes shared by `input` and `literal`
fn common_prefix(input: &[u8], literal: &[u8]) -> usize {
    input
        .iter()
        .zip(literal)
        .take_while(|(seen, expected)| seen == expected)
        .count()
}

/// Match collected bytes against a literal sequence
///
/// Used by the key decoder, where table entries have no parameters.
pub fn match_sequence(input: &[u8], literal: &[u8]) -> Match {
    let matched = common_prefix(input, literal);
    if matched != input.len() {
        Match::None
    } else if matched < literal.len() {
        Match::Partial
    } else {
        Match::Full
    }
}

/// Match the pre- and post-parameter runs of a command against an entry
///
/// When no parameters were seen, the final byte of a sequence lands in the
/// pre-parameter run (`ESC [ J` collects `[J`). Once the entry's
/// pre-parameter string is used up, the rest of the run is therefore tried
/// against the post-parameter string. An entry with an empty post-parameter
/// string accepts any trailing byte there, which is how the character set
/// designators (`ESC ( B`) are recognized.
pub fn match_command(pre: &[u8], post: &[u8], entry: &DecodeEntry) -> Match {
    let matched = common_prefix(pre, entry.pre_parameter);

    if matched != pre.len() {
        if matched != entry.pre_parameter.len() || !post.is_empty() {
            return Match::None;
        }

        if entry.post_parameter.is_empty() {
            return Match::Full;
        }

        // A tail that stops short of the post-parameter string is still
        // open: `ESC [ !` must wait for the `p` of `!p`.
        return match_sequence(&pre[matched..], entry.post_parameter);
    }

    if matched < entry.pre_parameter.len() {
        return Match::Partial;
    }

    // The next byte completes the entry through the wildcard path above.
    if entry.post_parameter.is_empty() {
        return Match::Partial;
    }

    match_sequence(post, entry.post_parameter)
}
