//! Line-based parser for `fixture.toml`
//!
//! Handles only the TOML subset the fixture file uses:
//! - `key = value` pairs (decimal or `0x` hex integers, booleans)
//! - `[section]` headers
//! - comments (`# ...`), full-line or trailing
//!
//! Works without an allocator so it can run at boot. The firmware's build
//! script checks the same file with a full TOML parser on the host.
//!
//! ```toml
//! debug = false
//!
//! [dmx]
//! start_address = 1
//! timeout_ms = 1250
//!
//! [verification]
//! channel = 100
//! sentinel = 0x55
//!
//! [speedo]
//! start_address = 34
//! address = 0x70
//!
//! [display]
//! destination = 0x71
//! present = 0x72
//! departed = 0x74
//! mode_24h = false
//! night_mode_off = false
//! reverse_ampm = false
//! ```

use super::types::{ConfigError, FixtureConfig, SpeedoConfig, VerificationConfig};
use crate::traits::DisplayRole;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Line is not `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range for its field
    InvalidValue,
    /// `[verification]` without both `channel` and `sentinel`
    MissingKey,
    /// Parsed, but the resulting configuration is inconsistent
    Config(ConfigError),
}

/// Parse error with the 1-based line it occurred on
///
/// `line` is 0 for errors found after the whole file was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn at(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Dmx,
    Verification,
    Speedo,
    Display,
}

/// Parse and validate a fixture configuration
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<FixtureConfig, ParseError> {
    let mut config = FixtureConfig::default();
    let mut section = Section::Root;

    let mut verify_channel: Option<u16> = None;
    let mut verify_sentinel: Option<u8> = None;
    let mut verify_line = 0;
    let mut speedo: Option<SpeedoConfig> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::at(line_no, ParseErrorKind::InvalidSection))?;
            match section {
                Section::Verification => verify_line = line_no,
                Section::Speedo => speedo = Some(SpeedoConfig::default()),
                _ => {}
            }
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::at(line_no, ParseErrorKind::InvalidLine))?;
        let err = |kind| ParseError::at(line_no, kind);
        let invalid = |_| err(ParseErrorKind::InvalidValue);

        match (section, key) {
            (Section::Root, "debug") => config.debug = parse_bool(value).map_err(invalid)?,

            (Section::Dmx, "start_address") => {
                config.start_address = parse_int(value).map_err(invalid)?
            }
            (Section::Dmx, "timeout_ms") => config.timeout_ms = parse_int(value).map_err(invalid)?,

            (Section::Verification, "channel") => {
                verify_channel = Some(parse_int(value).map_err(invalid)?)
            }
            (Section::Verification, "sentinel") => {
                verify_sentinel = Some(parse_int(value).map_err(invalid)?)
            }

            (Section::Speedo, "enabled") => {
                // a disabled unit ignores the rest of its section
                if !parse_bool(value).map_err(invalid)? {
                    speedo = None;
                }
            }
            (Section::Speedo, "start_address") => {
                if let Some(s) = speedo.as_mut() {
                    s.start_address = parse_int(value).map_err(invalid)?;
                }
            }
            (Section::Speedo, "address") => {
                if let Some(s) = speedo.as_mut() {
                    s.address = parse_int(value).map_err(invalid)?;
                }
            }

            (Section::Display, "destination") => {
                config.addresses[DisplayRole::Destination.index()] =
                    parse_int(value).map_err(invalid)?
            }
            (Section::Display, "present") => {
                config.addresses[DisplayRole::Present.index()] = parse_int(value).map_err(invalid)?
            }
            (Section::Display, "departed") => {
                config.addresses[DisplayRole::Departed.index()] =
                    parse_int(value).map_err(invalid)?
            }
            (Section::Display, "mode_24h") => config.mode_24h = parse_bool(value).map_err(invalid)?,
            (Section::Display, "night_mode_off") => {
                config.night_mode_off = parse_bool(value).map_err(invalid)?
            }
            (Section::Display, "reverse_ampm") => {
                config.reverse_ampm = parse_bool(value).map_err(invalid)?
            }

            _ => return Err(err(ParseErrorKind::UnknownKey)),
        }
    }

    config.verification = match (verify_line, verify_channel, verify_sentinel) {
        (0, None, None) => None,
        (_, Some(channel), Some(sentinel)) => Some(VerificationConfig { channel, sentinel }),
        (line, _, _) => return Err(ParseError::at(line, ParseErrorKind::MissingKey)),
    };
    config.speedo = speedo;

    config
        .validate()
        .map_err(|e| ParseError::at(0, ParseErrorKind::Config(e)))?;

    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "dmx" => Some(Section::Dmx),
        "verification" => Some(Section::Verification),
        "speedo" => Some(Section::Speedo),
        "display" => Some(Section::Display),
        _ => None,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Decimal or `0x`-prefixed hex, with optional `_` separators
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ()> {
    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    let mut acc: u32 = 0;
    let mut any = false;
    for c in digits.chars().filter(|&c| c != '_') {
        let d = c.to_digit(radix).ok_or(())?;
        acc = acc.checked_mul(radix).and_then(|a| a.checked_add(d)).ok_or(())?;
        any = true;
    }
    if !any {
        return Err(());
    }

    T::try_from(acc).map_err(|_| ())
}

fn parse_bool(value: &str) -> Result<bool, ()> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(()),
    }
}
