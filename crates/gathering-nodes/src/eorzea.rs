//! Conversion from real time to the in-game Eorzea clock.
//!
//! One Eorzea hour lasts 175 real seconds, so an Eorzea day passes in
//! 70 real minutes. Uptime masks are expressed in Eorzea hours.

use chrono::{DateTime, Utc};

/// Real seconds per Eorzea hour.
pub const REAL_SECONDS_PER_EORZEA_HOUR: u64 = 175;

/// A time of day on the Eorzea clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EorzeaTime {
    /// Hour, `0..24`.
    hour: u8,
    /// Minute, `0..60`.
    minute: u8,
}

impl EorzeaTime {
    /// Build from an hour and minute, wrapping out-of-range values.
    pub const fn from_hour_minute(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }

    /// Convert a real Unix timestamp in milliseconds.
    ///
    /// Timestamps before the epoch clamp to the epoch.
    pub fn from_unix_millis(millis: i64) -> Self {
        let real_ms = u64::try_from(millis).unwrap_or(0);
        // eorzea_ms = real_ms * 3600 / 175, reduced to whole Eorzea seconds.
        let eorzea_seconds = real_ms.saturating_mul(18) / 875;
        let hour = u8::try_from((eorzea_seconds / 3600) % 24).unwrap_or(0);
        let minute = u8::try_from((eorzea_seconds / 60) % 60).unwrap_or(0);
        Self { hour, minute }
    }

    /// Convert a real UTC instant.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self::from_unix_millis(instant.timestamp_millis())
    }

    /// The current Eorzea time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Return the hour, `0..24`.
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Return the minute, `0..60`.
    pub const fn minute(self) -> u8 {
        self.minute
    }
}

impl core::fmt::Display for EorzeaTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02} ET", self.hour, self.minute)
    }
}
