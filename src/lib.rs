//! Mochi Escape Sequence Codec
//!
//! Byte-at-a-time decoding and encoding of the escape sequences a VT100-style
//! terminal exchanges with the programs running in it:
//!
//! - `parser`: commands in program output (cursor motion, erase, modes, ...)
//! - `input`: special keys in keyboard input, including the Alt prefix
//! - `stream`: batch decoding of byte slices into events
//! - `config`: decoder options loaded from JSON

pub mod config;
pub mod error;
pub mod input;
pub mod parser;
pub mod stream;

pub use config::{CodecConfig, ConfigError};
pub use error::{EncodeError, EncodeResult};
pub use input::{
    create_input_sequence, input_sequence, process_input, KeyData, KeyFlags, TerminalKey,
};
pub use parser::{
    create_output_sequence, normalize_parameters, output_sequence, process_output, CommandData,
    ParseResult, TerminalCommand,
};
pub use stream::{DecodedCommand, InputEvent, InputStream, OutputEvent, OutputStream};
