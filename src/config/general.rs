//! The general configuration settings for sgt.
//!
//! [General] is deserialized from the `[general]` table of sgt.toml. [InternalGeneral] is
//! the validated form used at runtime, with durations converted and sizes clamped.

use crate::core::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::core::history::DEFAULT_HISTORY_SIZE;

use serde::Deserialize;
use std::time::Duration;

/// The smallest stat cache capacity accepted from the config.
pub const MIN_CACHE_CAPACITY: usize = 16;
/// The largest stat cache capacity accepted from the config.
pub const MAX_CACHE_CAPACITY: usize = 1_000_000;
/// The largest history size accepted from the config.
pub const MAX_HISTORY_SIZE: usize = 1000;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    show_ownership: bool,
    restore_session: bool,
    cache_ttl_ms: u64,
    cache_capacity: usize,
    history_size: usize,
}

impl Default for General {
    fn default() -> Self {
        General {
            show_ownership: false,
            restore_session: false,
            cache_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            cache_capacity: DEFAULT_CAPACITY,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InternalGeneral {
    show_ownership: bool,
    restore_session: bool,
    cache_ttl: Duration,
    cache_capacity: usize,
    history_size: usize,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            show_ownership: g.show_ownership,
            restore_session: g.restore_session,
            cache_ttl: Duration::from_millis(g.cache_ttl_ms),
            cache_capacity: clamp_setting(
                "cache_capacity",
                g.cache_capacity,
                MIN_CACHE_CAPACITY,
                MAX_CACHE_CAPACITY,
            ),
            history_size: clamp_setting("history_size", g.history_size, 1, MAX_HISTORY_SIZE),
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn show_ownership(&self) -> bool {
        self.show_ownership
    }

    #[inline]
    pub fn restore_session(&self) -> bool {
        self.restore_session
    }

    #[inline]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    #[inline]
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    #[inline]
    pub fn history_size(&self) -> usize {
        self.history_size
    }
}

/// Clamps a numeric setting into range, logging when the configured value was changed.
fn clamp_setting(name: &str, value: usize, min: usize, max: usize) -> usize {
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(
            setting = name,
            value,
            min,
            max,
            clamped,
            "config value out of range"
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let general = InternalGeneral::from(General::default());
        assert!(!general.show_ownership());
        assert!(!general.restore_session());
        assert_eq!(general.cache_ttl(), DEFAULT_TTL);
        assert_eq!(general.cache_capacity(), DEFAULT_CAPACITY);
        assert_eq!(general.history_size(), DEFAULT_HISTORY_SIZE);
    }

    #[test]
    fn out_of_range_values_are_clamped() -> Result<(), Box<dyn std::error::Error>> {
        let raw: General =
            toml::from_str("cache_capacity = 1\nhistory_size = 0\ncache_ttl_ms = 250")?;
        let general = InternalGeneral::from(raw);
        assert_eq!(general.cache_capacity(), MIN_CACHE_CAPACITY);
        assert_eq!(general.history_size(), 1);
        assert_eq!(general.cache_ttl(), Duration::from_millis(250));

        let raw: General = toml::from_str("cache_capacity = 99999999\nhistory_size = 5000")?;
        let general = InternalGeneral::from(raw);
        assert_eq!(general.cache_capacity(), MAX_CACHE_CAPACITY);
        assert_eq!(general.history_size(), MAX_HISTORY_SIZE);
        Ok(())
    }
}
