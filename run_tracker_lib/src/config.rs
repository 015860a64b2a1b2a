use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Options passed to the location capability for a request or a watch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached position the platform may hand back. `None` leaves it to the platform.
    pub maximum_age: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub watch_options: PositionOptions,
    pub locate_options: PositionOptions,
    pub initial_options: PositionOptions,
    pub jitter_threshold_m: f64,
    pub tick_period: Duration,
    pub tile_url: String,
    pub default_zoom: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            watch_options: PositionOptions {
                high_accuracy: true,
                timeout: Duration::from_secs(10),
                maximum_age: Some(Duration::ZERO),
            },
            locate_options: PositionOptions {
                high_accuracy: true,
                timeout: Duration::from_secs(5),
                maximum_age: None,
            },
            initial_options: PositionOptions {
                high_accuracy: false,
                timeout: Duration::from_secs(3),
                maximum_age: None,
            },
            jitter_threshold_m: 0.5,
            tick_period: Duration::from_secs(1),
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            default_zoom: 16.,
        }
    }
}

impl TrackerConfig {
    /// Reads `key = value` lines on top of the defaults. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::MalformedLine { line: line_no });
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "jitter_threshold_m" => config.jitter_threshold_m = parse_value(line_no, key, value)?,
                "tick_period_ms" => config.tick_period = parse_millis(line_no, key, value)?,
                "watch_timeout_ms" => config.watch_options.timeout = parse_millis(line_no, key, value)?,
                "watch_maximum_age_ms" => {
                    config.watch_options.maximum_age = Some(parse_millis(line_no, key, value)?)
                }
                "locate_timeout_ms" => config.locate_options.timeout = parse_millis(line_no, key, value)?,
                "initial_timeout_ms" => config.initial_options.timeout = parse_millis(line_no, key, value)?,
                "high_accuracy" => {
                    let high_accuracy = parse_value(line_no, key, value)?;
                    config.watch_options.high_accuracy = high_accuracy;
                    config.locate_options.high_accuracy = high_accuracy;
                }
                "tile_url" => config.tile_url = value.to_owned(),
                "default_zoom" => config.default_zoom = parse_value(line_no, key, value)?,
                _ => warn!("Unknown config key: {}", key),
            }
        }

        if !(config.jitter_threshold_m >= 0.) {
            return Err(ConfigError::OutOfRange("jitter_threshold_m"));
        }
        if config.tick_period.is_zero() {
            return Err(ConfigError::OutOfRange("tick_period_ms"));
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        line,
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

fn parse_millis(line: usize, key: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_value(line, key, value).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_settings() {
        let config = TrackerConfig::default();
        assert!(config.watch_options.high_accuracy);
        assert_eq!(config.watch_options.timeout, Duration::from_secs(10));
        assert_eq!(config.watch_options.maximum_age, Some(Duration::ZERO));
        assert_eq!(config.locate_options.timeout, Duration::from_secs(5));
        assert_eq!(config.initial_options.timeout, Duration::from_secs(3));
        assert_eq!(config.jitter_threshold_m, 0.5);
        assert_eq!(config.tick_period, Duration::from_secs(1));
    }

    #[test]
    fn parses_overrides() {
        let config = TrackerConfig::parse(
            "# run tracker\n\
             jitter_threshold_m = 1.5\n\
             \n\
             watch_timeout_ms=20000\n\
             high_accuracy = false\n\
             tile_url = https://tiles.example.org/{z}/{x}/{y}.png?key=a=b\n\
             something_else = 3\n",
        )
        .unwrap();

        assert_eq!(config.jitter_threshold_m, 1.5);
        assert_eq!(config.watch_options.timeout, Duration::from_secs(20));
        assert!(!config.watch_options.high_accuracy);
        assert!(!config.locate_options.high_accuracy);
        assert_eq!(config.tile_url, "https://tiles.example.org/{z}/{x}/{y}.png?key=a=b");
        assert_eq!(config.tick_period, Duration::from_secs(1));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(
            TrackerConfig::parse("jitter_threshold_m\n"),
            Err(ConfigError::MalformedLine { line: 1 })
        );
        assert!(matches!(
            TrackerConfig::parse("\ntick_period_ms = soon"),
            Err(ConfigError::InvalidValue { line: 2, .. })
        ));
        assert_eq!(
            TrackerConfig::parse("tick_period_ms = 0"),
            Err(ConfigError::OutOfRange("tick_period_ms"))
        );
        assert_eq!(
            TrackerConfig::parse("jitter_threshold_m = -1"),
            Err(ConfigError::OutOfRange("jitter_threshold_m"))
        );
    }
}
