//! Reader configuration.

use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::engine::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_PUSHBACK_CAPACITY};
use crate::error::{Error, Result};
use crate::types::OffsetTime;

/// Zone assumed for TIME/TIMESTAMP values that carry no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZonePolicy {
    /// Treat zoneless values as UTC.
    #[default]
    Utc,
    /// Treat zoneless values as being in a fixed offset.
    Fixed(FixedOffset),
}

impl ZonePolicy {
    pub fn offset(&self) -> FixedOffset {
        match self {
            ZonePolicy::Utc => Utc.fix(),
            ZonePolicy::Fixed(offset) => *offset,
        }
    }

    /// Attach the policy offset to a zoneless timestamp.
    pub fn attach(&self, ts: NaiveDateTime) -> Result<chrono::DateTime<FixedOffset>> {
        self.offset()
            .from_local_datetime(&ts)
            .single()
            .ok_or_else(|| Error::overflow(format!("timestamp {} not representable in zone", ts)))
    }

    /// Attach the policy offset to a zoneless time of day.
    pub fn attach_time(&self, time: NaiveTime) -> OffsetTime {
        OffsetTime::new(time, self.offset())
    }
}

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Zone for zoneless temporal values read through offset-aware accessors.
    pub zone_policy: ZonePolicy,
    /// Size of pooled transfer buffers.
    pub buffer_size: usize,
    /// Pushback capacity of character readers (at least 1).
    pub pushback_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderConfig {
    /// Create a configuration with defaults (UTC, 8 KiB buffers, pushback 1).
    pub fn new() -> Self {
        Self {
            zone_policy: ZonePolicy::Utc,
            buffer_size: DEFAULT_BUFFER_SIZE,
            pushback_capacity: DEFAULT_PUSHBACK_CAPACITY,
        }
    }

    /// Set the zone policy.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::FixedOffset;
    /// use sql_bridge::{ReaderConfig, ZonePolicy};
    ///
    /// let config = ReaderConfig::new()
    ///     .with_zone_policy(ZonePolicy::Fixed(FixedOffset::east_opt(3600).unwrap()));
    /// ```
    pub fn with_zone_policy(mut self, policy: ZonePolicy) -> Self {
        self.zone_policy = policy;
        self
    }

    /// Set the pooled buffer size. Zero is rejected.
    pub fn with_buffer_size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_argument("buffer_size must be positive"));
        }
        self.buffer_size = size;
        Ok(self)
    }

    /// Set the pushback capacity. Peeking needs at least one unit.
    pub fn with_pushback_capacity(mut self, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument(
                "pushback_capacity must be at least 1",
            ));
        }
        self.pushback_capacity = capacity;
        Ok(self)
    }

    /// Parse a `key=value;key=value` string.
    ///
    /// Keys: `zone` (`UTC` or `+HH:MM` / `-HH:MM`), `buffer_size`,
    /// `pushback`. Keys are case-insensitive; unknown keys are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let mut config = Self::new();
        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::invalid_argument(format!("expected key=value, got {:?}", pair))
            })?;
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "zone" => config = config.with_zone_policy(parse_zone(value)?),
                "buffer_size" => config = config.with_buffer_size(parse_usize(key, value)?)?,
                "pushback" => config = config.with_pushback_capacity(parse_usize(key, value)?)?,
                other => {
                    return Err(Error::invalid_argument(format!(
                        "unknown configuration key: {}",
                        other
                    )))
                }
            }
        }
        Ok(config)
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| Error::invalid_argument(format!("invalid {}: {}", key.trim(), value)))
}

fn parse_zone(value: &str) -> Result<ZonePolicy> {
    if value.eq_ignore_ascii_case("utc") || value == "Z" {
        return Ok(ZonePolicy::Utc);
    }
    let invalid = || Error::invalid_argument(format!("invalid zone offset: {}", value));

    let (sign, rest) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(ZonePolicy::Fixed)
        .ok_or_else(invalid)
}
