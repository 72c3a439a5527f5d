//! Build script for tacho-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates motor.toml at compile time
//! - Generates the `ControllerConfig` constant from it

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tacho_core::config::{Field, Parameters};

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values read from motor.toml, already range-checked
struct MotorConfig {
    defaults: Parameters,
    adc_resolution: u64,
    overcurrent_threshold: f64,
    overspeed_factor: f64,
    alarm_clear_ms: u64,
    buzzer_frequency_hz: u64,
    buzzer_toggle_ms: u64,
    setpoint_step: f64,
    timing: Vec<(&'static str, u64)>,
}

/// Timing keys in `[timing]`, named as the `Timing` fields they fill
const TIMING_KEYS: [&str; 9] = [
    "sense_interval_ms",
    "pid_interval_ms",
    "input_poll_ms",
    "debounce_ms",
    "display_interval_ms",
    "autosave_interval_ms",
    "menu_timeout_ms",
    "message_ms",
    "splash_ms",
];

/// Read, parse and validate motor.toml
fn load_config() -> MotorConfig {
    println!("cargo:rerun-if-changed=motor.toml");

    let config_path = Path::new("motor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: motor.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a motor.toml configuration file.          ║\n\
            ║  Please create one in the tacho-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read motor.toml", &[e.to_string()]),
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in motor.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut reader = Reader {
        root: &value,
        errors: Vec::new(),
    };

    let defaults = Parameters {
        current_full_scale: reader.float("defaults", "current_full_scale") as f32,
        speed_full_scale: reader.integer("defaults", "speed_full_scale") as i32,
        kp: reader.float("defaults", "kp") as f32,
        ki: reader.float("defaults", "ki") as f32,
        kd: reader.float("defaults", "kd") as f32,
    };
    for field in Field::ALL {
        if !defaults.field_valid(field) {
            let (min, max) = field.limits();
            reader.errors.push(format!(
                "[defaults] {} must be {}-{}",
                field.label(),
                min,
                max
            ));
        }
    }

    let adc_resolution = reader.integer("sensing", "adc_resolution");
    if !(2..=u16::MAX as i64).contains(&adc_resolution) {
        reader
            .errors
            .push("[sensing] adc_resolution must be 2-65535".to_string());
    }

    let overcurrent_threshold = reader.float("alarm", "overcurrent_threshold");
    if !(overcurrent_threshold > 0.0 && overcurrent_threshold <= 1.0) {
        reader
            .errors
            .push("[alarm] overcurrent_threshold must be in (0, 1]".to_string());
    }

    let overspeed_factor = reader.float("alarm", "overspeed_factor");
    if overspeed_factor < 1.0 {
        reader
            .errors
            .push("[alarm] overspeed_factor must be at least 1.0".to_string());
    }

    let alarm_clear_ms = reader.duration("alarm", "clear_ms");
    let buzzer_toggle_ms = reader.duration("alarm", "buzzer_toggle_ms");
    let buzzer_frequency_hz = reader.integer("alarm", "buzzer_frequency_hz");
    if !(20..=20_000).contains(&buzzer_frequency_hz) {
        reader
            .errors
            .push("[alarm] buzzer_frequency_hz must be 20-20000".to_string());
    }

    let setpoint_step = reader.float("ui", "setpoint_step");
    if !(setpoint_step > 0.0) {
        reader
            .errors
            .push("[ui] setpoint_step must be positive".to_string());
    }

    let timing: Vec<_> = TIMING_KEYS
        .iter()
        .map(|key| (*key, reader.duration("timing", key)))
        .collect();

    if !reader.errors.is_empty() {
        fail("Invalid configuration in motor.toml", &reader.errors);
    }

    println!("cargo:warning=motor.toml validated successfully");

    MotorConfig {
        defaults,
        adc_resolution: adc_resolution as u64,
        overcurrent_threshold,
        overspeed_factor,
        alarm_clear_ms,
        buzzer_frequency_hz: buzzer_frequency_hz as u64,
        buzzer_toggle_ms,
        setpoint_step,
        timing,
    }
}

/// Collects every problem in one pass so the build reports them together
struct Reader<'a> {
    root: &'a toml::Value,
    errors: Vec<String>,
}

impl Reader<'_> {
    fn get(&mut self, section: &str, key: &str) -> Option<&toml::Value> {
        let value = self.root.get(section).and_then(|s| s.get(key));
        if value.is_none() {
            self.errors.push(format!("[{}] missing '{}'", section, key));
        }
        value
    }

    fn float(&mut self, section: &str, key: &str) -> f64 {
        match self.get(section, key) {
            Some(toml::Value::Float(v)) => *v,
            Some(toml::Value::Integer(v)) => *v as f64,
            Some(_) => {
                self.errors
                    .push(format!("[{}] '{}' must be a number", section, key));
                0.0
            }
            None => 0.0,
        }
    }

    fn integer(&mut self, section: &str, key: &str) -> i64 {
        match self.get(section, key) {
            Some(toml::Value::Integer(v)) => *v,
            Some(_) => {
                self.errors
                    .push(format!("[{}] '{}' must be an integer", section, key));
                0
            }
            None => 0,
        }
    }

    /// A strictly positive millisecond count
    fn duration(&mut self, section: &str, key: &str) -> u64 {
        let value = self.integer(section, key);
        if value <= 0 {
            self.errors
                .push(format!("[{}] '{}' must be a positive duration", section, key));
            return 1;
        }
        value as u64
    }
}

/// Abort the build with a boxed list of problems
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `motor_config.rs` into OUT_DIR for `src/config.rs` to include
fn generate_config(config: &MotorConfig) {
    let mut code = String::new();
    code.push_str("// Generated by build.rs from motor.toml. Do not edit.\n\n");
    code.push_str("pub const CONTROLLER_CONFIG: ControllerConfig = ControllerConfig {\n");
    code.push_str("    timing: Timing {\n");
    for (key, value) in &config.timing {
        writeln!(code, "        {}: {},", key, value).unwrap();
    }
    writeln!(code, "        alarm_clear_ms: {},", config.alarm_clear_ms).unwrap();
    writeln!(code, "        buzzer_toggle_ms: {},", config.buzzer_toggle_ms).unwrap();
    code.push_str("    },\n");

    let d = &config.defaults;
    code.push_str("    defaults: Parameters {\n");
    writeln!(code, "        current_full_scale: {:?}_f32,", d.current_full_scale).unwrap();
    writeln!(code, "        speed_full_scale: {},", d.speed_full_scale).unwrap();
    writeln!(code, "        kp: {:?}_f32,", d.kp).unwrap();
    writeln!(code, "        ki: {:?}_f32,", d.ki).unwrap();
    writeln!(code, "        kd: {:?}_f32,", d.kd).unwrap();
    code.push_str("    },\n");

    writeln!(code, "    adc_resolution: {},", config.adc_resolution).unwrap();
    writeln!(
        code,
        "    overcurrent_threshold: {:?}_f32,",
        config.overcurrent_threshold as f32
    )
    .unwrap();
    writeln!(
        code,
        "    overspeed_factor: {:?}_f32,",
        config.overspeed_factor as f32
    )
    .unwrap();
    writeln!(code, "    setpoint_step: {:?}_f32,", config.setpoint_step as f32).unwrap();
    writeln!(code, "    buzzer_frequency_hz: {},", config.buzzer_frequency_hz).unwrap();
    code.push_str("};\n");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("motor_config.rs"), code).unwrap();
}
