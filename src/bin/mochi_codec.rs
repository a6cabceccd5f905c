//! Mochi Codec Tool
//!
//! Decodes captured terminal output or keyboard input into commands and keys,
//! and prints the escape sequence for a command or key.

use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use mochi_codec::input::{input_sequence, KeyData, KeyFlags, TerminalKey};
use mochi_codec::parser::{output_sequence, CommandData, TerminalCommand, ESCAPE};
use mochi_codec::stream::{InputEvent, InputStream, OutputEvent, OutputStream};
use mochi_codec::CodecConfig;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let Options {
        mode,
        output_format,
        config_file,
        raw,
        alt,
        operands,
        show_help,
    } = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'mochi-codec --help' for usage.");
            return ExitCode::FAILURE;
        },
    };

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let decode_input = matches!(mode, Mode::DecodeInput);
    let result = match mode {
        Mode::EncodeCommand(name) => encode_command(&name, &operands),
        Mode::EncodeKey(name) => encode_key(&name, alt),
        Mode::DecodeOutput | Mode::DecodeInput => {
            let mut config = match &config_file {
                Some(path) => match CodecConfig::load(path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Error loading config '{}': {}", path.display(), e);
                        return ExitCode::FAILURE;
                    },
                },
                None => CodecConfig::load_or_default(),
            };
            if raw {
                config.normalize = false;
            }

            let data = match read_input(operands.first().map(String::as_str)) {
                Ok(data) => data,
                Err(message) => {
                    eprintln!("{}", message);
                    return ExitCode::FAILURE;
                },
            };

            if decode_input {
                let events = InputStream::with_config(config).feed(&data);
                print_input_events(&events, output_format)
            } else {
                let events = OutputStream::with_config(config).feed(&data);
                print_output_events(&events, output_format)
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        },
    }
}

struct Options {
    mode: Mode,
    output_format: OutputFormat,
    config_file: Option<PathBuf>,
    raw: bool,
    alt: bool,
    operands: Vec<String>,
    show_help: bool,
}

/// Parse command line arguments (the first is the program name)
fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        mode: Mode::DecodeOutput,
        output_format: OutputFormat::Text,
        config_file: None,
        raw: false,
        alt: false,
        operands: Vec::new(),
        show_help: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-i" | "--input" => {
                options.mode = Mode::DecodeInput;
            },
            "-e" | "--encode" => {
                i += 1;
                options.mode = Mode::EncodeCommand(flag_value(args, i, flag)?);
            },
            "-k" | "--encode-key" => {
                i += 1;
                options.mode = Mode::EncodeKey(flag_value(args, i, flag)?);
            },
            "-a" | "--alt" => {
                options.alt = true;
            },
            "-c" | "--config" => {
                i += 1;
                options.config_file = Some(PathBuf::from(flag_value(args, i, flag)?));
            },
            "-r" | "--raw" => {
                options.raw = true;
            },
            "-j" | "--json" => {
                options.output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                options.output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                options.show_help = true;
            },
            arg => {
                // Positional: command parameters when encoding, otherwise the input file
                options.operands.push(arg.to_string());
            },
        }
        i += 1;
    }

    Ok(options)
}

/// The value following a flag that requires one
fn flag_value(args: &[String], index: usize, flag: &str) -> Result<String, String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", flag))
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    DecodeOutput,
    DecodeInput,
    EncodeCommand(String),
    EncodeKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>, String> {
    match path {
        Some(path) => {
            std::fs::read(path).map_err(|e| format!("Error reading file '{}': {}", path, e))
        },
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map_err(|e| format!("Error reading stdin: {}", e))?;
            Ok(data)
        },
    }
}

fn encode_command(name: &str, operands: &[String]) -> Result<(), String> {
    let command: TerminalCommand = name.parse().map_err(|e| format!("{}", e))?;

    let mut data = CommandData::with_command(command);
    if command.is_character_set_select() {
        let designator = match operands {
            [designator] if designator.len() == 1 => designator.as_bytes()[0],
            _ => return Err(format!("{} takes one designator character", command)),
        };
        data = data.post_parameter_byte(designator);
    } else {
        let parameters = operands
            .iter()
            .map(|operand| {
                operand
                    .parse::<u32>()
                    .map_err(|e| format!("Invalid parameter '{}': {}", operand, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        data = data.parameters_from(&parameters);
    }

    let sequence = output_sequence(&data).map_err(|e| {
        tracing::warn!(%command, error = %e, "encode failed");
        format!("Error encoding {}: {}", command, e)
    })?;
    println!("{}", escape_bytes(&sequence));
    Ok(())
}

fn encode_key(name: &str, alt: bool) -> Result<(), String> {
    let key: TerminalKey = name.parse().map_err(|e| format!("{}", e))?;
    let flags = if alt { KeyFlags::ALT } else { KeyFlags::empty() };

    let sequence = input_sequence(&KeyData::with_key(key, flags)).map_err(|e| {
        tracing::warn!(%key, error = %e, "encode failed");
        format!("Error encoding {}: {}", key, e)
    })?;
    println!("{}", escape_bytes(&sequence));
    Ok(())
}

fn print_output_events(events: &[OutputEvent], format: OutputFormat) -> Result<(), String> {
    if let OutputFormat::Json = format {
        return print_json(events);
    }

    let mut text = Vec::new();
    for event in events {
        match event {
            OutputEvent::Text(byte) => text.push(*byte),
            OutputEvent::Command(decoded) => {
                flush_text(&mut text);
                let parameters: Vec<String> =
                    decoded.parameters.iter().map(|p| p.to_string()).collect();
                let mut line = decoded.command.to_string();
                if !parameters.is_empty() {
                    let _ = write!(line, " {}", parameters.join(";"));
                }
                if let Some(designator) = decoded.designator {
                    let _ = write!(line, " {}", escape_bytes(&[designator]));
                }
                println!("{}", line);
            },
        }
    }
    flush_text(&mut text);
    Ok(())
}

fn print_input_events(events: &[InputEvent], format: OutputFormat) -> Result<(), String> {
    if let OutputFormat::Json = format {
        return print_json(events);
    }

    let mut text = Vec::new();
    for event in events {
        match *event {
            InputEvent::Text(byte) => text.push(byte),
            InputEvent::Key { key, alt } => {
                flush_text(&mut text);
                if alt {
                    println!("alt+{}", key);
                } else {
                    println!("{}", key);
                }
            },
        }
    }
    flush_text(&mut text);
    Ok(())
}

fn print_json<T: serde::Serialize>(events: &[T]) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(events).map_err(|e| format!("Error serializing events: {}", e))?;
    println!("{}", json);
    Ok(())
}

/// Print a run of plain bytes as one line
fn flush_text(text: &mut Vec<u8>) {
    if !text.is_empty() {
        println!("text \"{}\"", escape_bytes(text));
        text.clear();
    }
}

/// Render bytes for the terminal, with ESC shown as `\e`
fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            ESCAPE => out.push_str("\\e"),
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", byte);
            },
        }
    }
    out
}

fn print_help() {
    println!("Mochi Codec Tool");
    println!();
    println!("Usage: mochi-codec [OPTIONS] [INPUT_FILE]");
    println!("       mochi-codec --encode <COMMAND> [PARAMS...]");
    println!("       mochi-codec --encode-key <KEY> [--alt]");
    println!();
    println!("Options:");
    println!("  -i, --input              Decode keyboard input instead of terminal output");
    println!("  -r, --raw                Keep parameters as sent (no defaults applied)");
    println!("  -c, --config <PATH>      Load decoder options from a JSON file");
    println!("  -j, --json               Output events as JSON");
    println!("  -t, --text               Output events as text (default)");
    println!("  -e, --encode <COMMAND>   Print the sequence for a command");
    println!("  -k, --encode-key <KEY>   Print the sequence for a key");
    println!("  -a, --alt                Encode the key with Alt held");
    println!("  -h, --help               Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  printf 'Hello\\033[31mWorld\\033[0m' | mochi-codec");
    println!("  mochi-codec --input --json keys.bin");
    println!("  mochi-codec --encode cursor-move 10 20");
    println!("  mochi-codec --encode select-g0 0");
    println!("  mochi-codec --encode-key page-up --alt");
}
