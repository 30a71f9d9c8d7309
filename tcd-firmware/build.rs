//! Build script for tcd-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates fixture.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Slots used by one clock unit
const CLOCK_WINDOW_LEN: i64 = 11;
/// Slots used by the speedometer
const AUX_WINDOW_LEN: i64 = 2;
const CLOCK_UNITS: i64 = 3;
const MAX_CHANNEL: i64 = 512;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate fixture.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=fixture.toml");

    let config_path = Path::new("fixture.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: fixture.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds fixture.toml as its configuration.          ║\n\
            ║  Please create one in the tcd-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read fixture.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in fixture.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    validate_sections(&config, &mut errors);
    let clock_span = validate_dmx(&config, &mut errors);
    validate_verification(&config, clock_span, &mut errors);
    let speedo_address = validate_speedo(&config, clock_span, &mut errors);
    validate_display(&config, speedo_address, &mut errors);

    report("Invalid fixture configuration", &errors);

    println!("cargo:warning=fixture.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with every collected error, if any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Only keys the firmware's own parser understands are allowed
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let root = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    for (key, value) in root {
        let allowed: &[&str] = match key.as_str() {
            "debug" => {
                if !value.is_bool() {
                    errors.push("'debug' must be true or false".to_string());
                }
                continue;
            }
            "dmx" => &["start_address", "timeout_ms"],
            "verification" => &["channel", "sentinel"],
            "speedo" => &["enabled", "start_address", "address"],
            "display" => &[
                "destination",
                "present",
                "departed",
                "mode_24h",
                "night_mode_off",
                "reverse_ampm",
            ],
            other => {
                errors.push(format!("unknown section or key '{}'", other));
                continue;
            }
        };

        let table = match value.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", key));
                continue;
            }
        };

        for name in table.keys() {
            if !allowed.contains(&name.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", key, name));
            }
        }
    }
}

fn int(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => None,
    }
}

fn flag(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<bool> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Boolean(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            None
        }
        None => None,
    }
}

/// Returns the slot range covered by the clock units
fn validate_dmx(config: &toml::Value, errors: &mut Vec<String>) -> (i64, i64) {
    let start = int(config, "dmx", "start_address", errors).unwrap_or(1);
    let last = start + CLOCK_UNITS * CLOCK_WINDOW_LEN - 1;

    if !(1..=MAX_CHANNEL).contains(&start) {
        errors.push(format!("[dmx] start_address must be 1-{}", MAX_CHANNEL));
    } else if last > MAX_CHANNEL {
        errors.push(format!(
            "[dmx] start_address {} leaves no room for 3 clock units",
            start
        ));
    }

    if let Some(timeout) = int(config, "dmx", "timeout_ms", errors) {
        if timeout <= 0 || timeout > u32::MAX as i64 {
            errors.push("[dmx] timeout_ms must be positive".to_string());
        }
    }

    (start, last)
}

fn validate_verification(config: &toml::Value, clock: (i64, i64), errors: &mut Vec<String>) {
    if config.get("verification").is_none() {
        return;
    }

    let channel = int(config, "verification", "channel", errors);
    let sentinel = int(config, "verification", "sentinel", errors);

    match channel {
        Some(ch) if !(1..=MAX_CHANNEL).contains(&ch) => {
            errors.push(format!("[verification] channel must be 1-{}", MAX_CHANNEL));
        }
        Some(ch) if (clock.0..=clock.1).contains(&ch) => {
            errors.push(format!(
                "[verification] channel {} overlaps the clock slots {}-{}",
                ch, clock.0, clock.1
            ));
        }
        Some(_) => {}
        None => errors.push("[verification] missing 'channel'".to_string()),
    }

    match sentinel {
        Some(s) if !(0..=255).contains(&s) => {
            errors.push("[verification] sentinel must be 0-255".to_string());
        }
        Some(_) => {}
        None => errors.push("[verification] missing 'sentinel'".to_string()),
    }
}

/// Returns the speedometer bus address when the unit is enabled
fn validate_speedo(
    config: &toml::Value,
    clock: (i64, i64),
    errors: &mut Vec<String>,
) -> Option<i64> {
    config.get("speedo")?;

    if flag(config, "speedo", "enabled", errors) == Some(false) {
        return None;
    }

    let start = int(config, "speedo", "start_address", errors).unwrap_or(34);
    let last = start + AUX_WINDOW_LEN - 1;
    if start < 1 || last > MAX_CHANNEL {
        errors.push(format!("[speedo] start_address must be 1-{}", MAX_CHANNEL - 1));
    } else if start <= clock.1 && last >= clock.0 {
        errors.push(format!(
            "[speedo] slots {}-{} overlap the clock slots {}-{}",
            start, last, clock.0, clock.1
        ));
    }

    if let Some(ch) = int(config, "verification", "channel", errors) {
        if (start..=last).contains(&ch) {
            errors.push("[speedo] slots overlap the verification channel".to_string());
        }
    }

    let address = int(config, "speedo", "address", errors).unwrap_or(0x70);
    check_address("speedo", "address", address, errors);
    Some(address)
}

fn validate_display(config: &toml::Value, speedo: Option<i64>, errors: &mut Vec<String>) {
    let defaults = [("destination", 0x71), ("present", 0x72), ("departed", 0x74)];
    let mut seen: Vec<i64> = speedo.into_iter().collect();

    for (role, default) in defaults {
        let address = int(config, "display", role, errors).unwrap_or(default);
        check_address("display", role, address, errors);
        if seen.contains(&address) {
            errors.push(format!("[display] {} address 0x{:02x} already used", role, address));
        }
        seen.push(address);
    }

    for key in ["mode_24h", "night_mode_off", "reverse_ampm"] {
        flag(config, "display", key, errors);
    }
}

fn check_address(section: &str, key: &str, address: i64, errors: &mut Vec<String>) {
    if !(0x70..=0x77).contains(&address) {
        errors.push(format!("[{}] {} must be 0x70-0x77", section, key));
    }
}
