//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lamplighter.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.
//!
//! The file is deserialized as plain strings and numbers; [`Config::controller`]
//! and [`Config::daylight`] turn it into validated domain values.

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;

use lamplighter_adapter_virtual::{Daylight, VirtualError};
use lamplighter_domain::config::ControllerConfig;
use lamplighter_domain::daytime::Thresholds;
use lamplighter_domain::error::ValidationError;
use lamplighter_domain::plan::MaxDelays;
use lamplighter_domain::schedule::Schedule;

const CONFIG_FILE: &str = "lamplighter.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ON/OFF times and transition windows.
    pub schedule: ScheduleConfig,
    /// Light sensor calibration.
    pub sensor: SensorConfig,
    /// Relay protection.
    pub lamp: LampConfig,
    /// Loop cadence and jitter source.
    pub control: ControlConfig,
    /// Virtual hardware settings.
    pub simulation: SimulationConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA timezone name (e.g. `Europe/Moscow`).
    pub timezone: String,
    /// Local time the lamp should come on, `HH:MM` or `HH:MM:SS`.
    pub on_time: String,
    /// Local time the lamp should go off, `HH:MM` or `HH:MM:SS`.
    pub off_time: String,
    pub on_max_delay_secs: u64,
    pub off_max_delay_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Full-scale ADC reading.
    pub max_raw: u8,
    pub night_threshold: u8,
    pub evening_threshold: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LampConfig {
    /// Minimum time between two physical relay switches.
    pub min_switch_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub tick_secs: u64,
    /// Seed for reproducible transition jitter. Entropy is used when unset.
    pub random_seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub sunrise: String,
    pub sunset: String,
    /// Maximum deviation added to each virtual sensor reading.
    pub noise: u8,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `lamplighter.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if an
    /// override cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LAMPLIGHTER_TIMEZONE") {
            self.schedule.timezone = val;
        }
        if let Some(val) = lookup("LAMPLIGHTER_ON_TIME") {
            self.schedule.on_time = val;
        }
        if let Some(val) = lookup("LAMPLIGHTER_OFF_TIME") {
            self.schedule.off_time = val;
        }
        if let Some(val) = lookup("LAMPLIGHTER_TICK_SECS") {
            self.control.tick_secs = parse_override("LAMPLIGHTER_TICK_SECS", &val)?;
        }
        if let Some(val) = lookup("LAMPLIGHTER_SEED") {
            self.control.random_seed = Some(parse_override("LAMPLIGHTER_SEED", &val)?);
        }
        if let Some(val) = lookup("LAMPLIGHTER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    /// Build the validated controller configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimezone`], [`ConfigError::InvalidTime`]
    /// or [`ConfigError::OutOfRange`] for values that cannot be parsed, and
    /// [`ConfigError::Validation`] for values that break a domain rule.
    pub fn controller(&self) -> Result<ControllerConfig, ConfigError> {
        let timezone: Tz = self
            .schedule
            .timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.schedule.timezone.clone()))?;

        let thresholds = Thresholds::new(
            self.sensor.max_raw,
            self.sensor.night_threshold,
            self.sensor.evening_threshold,
        )?;
        let schedule = Schedule::new(
            parse_time("schedule.on_time", &self.schedule.on_time)?,
            parse_time("schedule.off_time", &self.schedule.off_time)?,
        )?;
        let max_delays = MaxDelays::new(
            seconds("schedule.on_max_delay_secs", self.schedule.on_max_delay_secs)?,
            seconds("schedule.off_max_delay_secs", self.schedule.off_max_delay_secs)?,
        )?;
        let min_switch_interval = seconds(
            "lamp.min_switch_interval_secs",
            self.lamp.min_switch_interval_secs,
        )?;

        Ok(ControllerConfig::new(
            timezone,
            thresholds,
            schedule,
            max_delays,
            min_switch_interval,
            std::time::Duration::from_secs(self.control.tick_secs),
        )?)
    }

    /// Build the simulated day for the virtual sensor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTime`] for unparsable times and
    /// [`ConfigError::Simulation`] if sunrise is not before sunset.
    pub fn daylight(&self) -> Result<Daylight, ConfigError> {
        Ok(Daylight::new(
            parse_time("simulation.sunrise", &self.simulation.sunrise)?,
            parse_time("simulation.sunset", &self.simulation.sunset)?,
        )?)
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ConfigError::InvalidTime {
            field,
            value: value.to_string(),
        })
}

fn seconds(field: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(ConfigError::OutOfRange { field, value: secs })
}

fn parse_override<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidOverride {
        var,
        value: value.to_string(),
    })
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Moscow".to_string(),
            on_time: "19:00".to_string(),
            off_time: "00:00".to_string(),
            on_max_delay_secs: 60,
            off_max_delay_secs: 60,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            max_raw: 255,
            night_threshold: 25,
            evening_threshold: 50,
        }
    }
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            min_switch_interval_secs: 10,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_secs: 60,
            random_seed: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sunrise: "06:30".to_string(),
            sunset: "18:30".to_string(),
            noise: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lamplighterd=info,lamplighter=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A value breaks a controller rule.
    #[error("invalid configuration")]
    Validation(#[from] ValidationError),
    /// The simulated day is inconsistent.
    #[error("invalid simulation settings")]
    Simulation(#[from] VirtualError),
    #[error("{field}: '{value}' is not a valid HH:MM time")]
    InvalidTime { field: &'static str, value: String },
    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),
    #[error("{field}: {value} seconds is out of range")]
    OutOfRange { field: &'static str, value: u64 },
    #[error("{var}: cannot parse '{value}'")]
    InvalidOverride { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ── Parsing ────────────────────────────────────────────────────

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.schedule.timezone, "Europe/Moscow");
        assert_eq!(config.schedule.on_time, "19:00");
        assert_eq!(config.schedule.off_time, "00:00");
        assert_eq!(config.sensor.night_threshold, 25);
        assert_eq!(config.sensor.evening_threshold, 50);
        assert_eq!(config.lamp.min_switch_interval_secs, 10);
        assert_eq!(config.control.tick_secs, 60);
        assert_eq!(config.control.random_seed, None);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.control.tick_secs, 60);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [schedule]
            timezone = 'Europe/Berlin'
            on_time = '18:15'
            off_time = '23:45:30'
            on_max_delay_secs = 120
            off_max_delay_secs = 300

            [sensor]
            max_raw = 200
            night_threshold = 10
            evening_threshold = 40

            [lamp]
            min_switch_interval_secs = 30

            [control]
            tick_secs = 15
            random_seed = 42

            [simulation]
            sunrise = '07:00'
            sunset = '17:00'
            noise = 4

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.schedule.timezone, "Europe/Berlin");
        assert_eq!(config.schedule.off_time, "23:45:30");
        assert_eq!(config.schedule.off_max_delay_secs, 300);
        assert_eq!(config.sensor.max_raw, 200);
        assert_eq!(config.lamp.min_switch_interval_secs, 30);
        assert_eq!(config.control.random_seed, Some(42));
        assert_eq!(config.simulation.noise, 4);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [schedule]
            on_time = '20:00'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.schedule.on_time, "20:00");
        assert_eq!(config.schedule.off_time, "00:00");
        assert_eq!(config.sensor.evening_threshold, 50);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.control.tick_secs, 60);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    // ── Overrides ──────────────────────────────────────────────────

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(overrides(&[
                ("LAMPLIGHTER_TIMEZONE", "Asia/Tokyo"),
                ("LAMPLIGHTER_ON_TIME", "18:00"),
                ("LAMPLIGHTER_OFF_TIME", "01:00"),
                ("LAMPLIGHTER_TICK_SECS", "5"),
                ("LAMPLIGHTER_SEED", "7"),
                ("LAMPLIGHTER_LOG", "trace"),
            ]))
            .unwrap();
        assert_eq!(config.schedule.timezone, "Asia/Tokyo");
        assert_eq!(config.schedule.on_time, "18:00");
        assert_eq!(config.schedule.off_time, "01:00");
        assert_eq!(config.control.tick_secs, 5);
        assert_eq!(config.control.random_seed, Some(7));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_prefer_rust_log_over_lamplighter_log() {
        let mut config = Config::default();
        config
            .apply_overrides(overrides(&[
                ("LAMPLIGHTER_LOG", "trace"),
                ("RUST_LOG", "warn"),
            ]))
            .unwrap();
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_reject_unparsable_tick_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(overrides(&[("LAMPLIGHTER_TICK_SECS", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride {
                var: "LAMPLIGHTER_TICK_SECS",
                ..
            })
        ));
    }

    // ── Validation ─────────────────────────────────────────────────

    #[test]
    fn should_build_default_controller_config() {
        let controller = Config::default().controller().unwrap();
        assert_eq!(controller, ControllerConfig::default());
    }

    #[test]
    fn should_accept_times_with_seconds() {
        let mut config = Config::default();
        config.schedule.off_time = "23:59:30".to_string();
        let controller = config.controller().unwrap();
        assert_eq!(
            controller.schedule.off_time(),
            NaiveTime::from_hms_opt(23, 59, 30).unwrap()
        );
    }

    #[test]
    fn should_reject_unknown_timezone() {
        let mut config = Config::default();
        config.schedule.timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            config.controller(),
            Err(ConfigError::InvalidTimezone(tz)) if tz == "Mars/Olympus"
        ));
    }

    #[test]
    fn should_reject_malformed_time() {
        let mut config = Config::default();
        config.schedule.on_time = "7pm".to_string();
        assert!(matches!(
            config.controller(),
            Err(ConfigError::InvalidTime {
                field: "schedule.on_time",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_equal_on_and_off_times() {
        let mut config = Config::default();
        config.schedule.off_time = "19:00".to_string();
        assert!(matches!(
            config.controller(),
            Err(ConfigError::Validation(ValidationError::SameOnOffTime))
        ));
    }

    #[test]
    fn should_reject_inverted_thresholds() {
        let mut config = Config::default();
        config.sensor.night_threshold = 60;
        assert!(matches!(
            config.controller(),
            Err(ConfigError::Validation(ValidationError::ThresholdOrder { .. }))
        ));
    }

    #[test]
    fn should_reject_zero_max_delay() {
        let mut config = Config::default();
        config.schedule.on_max_delay_secs = 0;
        assert!(matches!(
            config.controller(),
            Err(ConfigError::Validation(ValidationError::NonPositiveDuration(_)))
        ));
    }

    #[test]
    fn should_reject_zero_tick() {
        let mut config = Config::default();
        config.control.tick_secs = 0;
        assert!(matches!(
            config.controller(),
            Err(ConfigError::Validation(ValidationError::NonPositiveDuration(_)))
        ));
    }

    #[test]
    fn should_reject_absurd_interval() {
        let mut config = Config::default();
        config.lamp.min_switch_interval_secs = u64::MAX;
        assert!(matches!(
            config.controller(),
            Err(ConfigError::OutOfRange {
                field: "lamp.min_switch_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn should_build_default_daylight() {
        let daylight = Config::default().daylight().unwrap();
        assert_eq!(daylight.sunrise(), NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(daylight.sunset(), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn should_reject_sunset_before_sunrise() {
        let mut config = Config::default();
        config.simulation.sunset = "05:00".to_string();
        assert!(matches!(
            config.daylight(),
            Err(ConfigError::Simulation(VirtualError::DaylightOrder { .. }))
        ));
    }
}
