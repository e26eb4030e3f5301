use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::registry;
use crate::domain::connectivity::ConnectivityTimings;
use crate::error::AppError;

/// Runtime knobs for the session engine, read from `SEQUENCE_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How often the per-session scheduler ticks.
    pub tick_interval: Duration,
    pub timings: ConnectivityTimings,
    /// A bot waits at least this long into a turn before moving.
    pub bot_min_delay: Duration,
    /// Bots stop acting on a turn older than this.
    pub bot_max_turn: Duration,
    /// Compare-and-swap attempts per mutation.
    pub max_write_retries: u32,
    /// Registry key of the AI that drives bot seats.
    pub bot_ai: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            timings: ConnectivityTimings::default(),
            bot_min_delay: Duration::from_millis(2000),
            bot_max_turn: Duration::from_secs(60),
            max_write_retries: 5,
            bot_ai: "heuristic".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            tick_interval: Duration::from_millis(parse_or(
                &lookup,
                "SEQUENCE_TICK_INTERVAL_MS",
                1000u64,
            )?),
            timings: ConnectivityTimings {
                heartbeat_stale: secs(&lookup, "SEQUENCE_HEARTBEAT_STALE_SECS", 15)?,
                bot_takeover: secs(&lookup, "SEQUENCE_BOT_TAKEOVER_SECS", 30)?,
                afk_turn: secs(&lookup, "SEQUENCE_AFK_TURN_SECS", 45)?,
                remove_after: secs(&lookup, "SEQUENCE_REMOVE_AFTER_SECS", 60)?,
            },
            bot_min_delay: Duration::from_millis(parse_or(
                &lookup,
                "SEQUENCE_BOT_MIN_DELAY_MS",
                2000u64,
            )?),
            bot_max_turn: secs(&lookup, "SEQUENCE_BOT_MAX_TURN_SECS", 60)?,
            max_write_retries: parse_or(&lookup, "SEQUENCE_MAX_WRITE_RETRIES", 5u32)?,
            bot_ai: lookup("SEQUENCE_BOT_AI").unwrap_or(defaults.bot_ai),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.tick_interval.is_zero() {
            return Err(AppError::config("SEQUENCE_TICK_INTERVAL_MS must be positive"));
        }
        if self.max_write_retries == 0 {
            return Err(AppError::config("SEQUENCE_MAX_WRITE_RETRIES must be positive"));
        }
        let t = &self.timings;
        if !(t.heartbeat_stale < t.bot_takeover && t.bot_takeover < t.remove_after) {
            return Err(AppError::config(format!(
                "connectivity timings must satisfy stale < takeover < remove, got {}s/{}s/{}s",
                t.heartbeat_stale.as_secs(),
                t.bot_takeover.as_secs(),
                t.remove_after.as_secs()
            )));
        }
        if self.bot_min_delay >= self.bot_max_turn {
            return Err(AppError::config(
                "SEQUENCE_BOT_MIN_DELAY_MS must be below SEQUENCE_BOT_MAX_TURN_SECS",
            ));
        }
        if registry::by_key(&self.bot_ai).is_none() {
            return Err(AppError::config(format!(
                "SEQUENCE_BOT_AI '{}' is not a registered AI",
                self.bot_ai
            )));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has invalid value '{raw}'"))
        }),
    }
}

fn secs(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<Duration, AppError> {
    parse_or(lookup, name, default).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;

    use serial_test::serial;

    use super::*;
    use crate::errors::ErrorCode;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.timings.bot_takeover, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SEQUENCE_TICK_INTERVAL_MS", "250"),
            ("SEQUENCE_AFK_TURN_SECS", "20"),
            ("SEQUENCE_BOT_AI", "random"),
        ]))
        .unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.timings.afk_turn, Duration::from_secs(20));
        assert_eq!(config.bot_ai, "random");
    }

    #[test]
    fn garbage_is_a_config_error() {
        let err = EngineConfig::from_lookup(lookup_from(&[("SEQUENCE_MAX_WRITE_RETRIES", "lots")]))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
        assert!(err.to_string().contains("SEQUENCE_MAX_WRITE_RETRIES"));
    }

    #[test]
    fn misordered_timings_rejected() {
        let err = EngineConfig::from_lookup(lookup_from(&[("SEQUENCE_BOT_TAKEOVER_SECS", "90")]))
            .unwrap_err();
        assert!(err.to_string().contains("stale < takeover < remove"));
    }

    #[test]
    fn unknown_ai_rejected() {
        let err =
            EngineConfig::from_lookup(lookup_from(&[("SEQUENCE_BOT_AI", "oracle")])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    #[serial]
    fn reads_process_environment() {
        env::set_var("SEQUENCE_REMOVE_AFTER_SECS", "120");
        let config = EngineConfig::from_env();
        env::remove_var("SEQUENCE_REMOVE_AFTER_SECS");
        assert_eq!(
            config.unwrap().timings.remove_after,
            Duration::from_secs(120)
        );
    }
}
