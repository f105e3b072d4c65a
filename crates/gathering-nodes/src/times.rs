//! Hourly uptime of a node as a 24-bit mask.
//!
//! Bit *i* of the mask is set when the node is up during Eorzea hour *i*.
//! Source tables encode clock times as `HHMM`-like integers (`1430` is
//! 14:30); only the hour part matters for the mask.
//!
//! Conversion rules:
//! - `start == end`, or either value above `2400`: always up.
//! - Otherwise both values are divided by 100. If the end hour is not after
//!   the start hour, the window wraps past midnight and 24 is added to the
//!   end. Every hour in `[start, end)` is marked, modulo 24.
//! - Rare pop tables union one such window per non-empty entry.

use gathering_types::RarePopTimeTable;

use crate::eorzea::EorzeaTime;

/// Number of hours in an Eorzea day.
pub const HOURS_PER_DAY: u8 = 24;

/// Mask with all 24 hour bits set.
const ALL_HOURS: u32 = 0x00FF_FFFF;

/// Largest valid encoded clock time.
const MAX_ENCODED_TIME: u16 = 2400;

/// Rare pop tables store exact two-hour spawns with this duration value.
const TWO_HOUR_DURATION_CODE: u16 = 160;

/// Encoded duration substituted for [`TWO_HOUR_DURATION_CODE`].
const TWO_HOUR_DURATION: u16 = 200;

/// The set of Eorzea hours during which a node is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindowSet {
    /// Bitfield, one bit per hour 0-23.
    hours: u32,
}

impl Default for TimeWindowSet {
    fn default() -> Self {
        Self::always_up()
    }
}

impl TimeWindowSet {
    /// A set that is up at every hour.
    pub const fn always_up() -> Self {
        Self { hours: ALL_HOURS }
    }

    /// Build from a single encoded `(start, end)` window.
    pub fn from_ephemeral(start: u16, end: u16) -> Self {
        Self {
            hours: window_mask(start, end),
        }
    }

    /// Build from a rare pop time table by unioning every entry's window.
    ///
    /// Entries with a zero duration are skipped; a table without usable
    /// entries yields a set that is never up.
    pub fn from_rare_pop_table(table: &RarePopTimeTable) -> Self {
        let hours = table
            .slots
            .iter()
            .filter(|slot| slot.duration != 0)
            .fold(0, |mask, slot| {
                let duration = if slot.duration == TWO_HOUR_DURATION_CODE {
                    TWO_HOUR_DURATION
                } else {
                    slot.duration
                };
                let end = (u32::from(slot.start_time).saturating_add(u32::from(duration))) % 2400;
                let end = u16::try_from(end).unwrap_or(MAX_ENCODED_TIME);
                mask | window_mask(slot.start_time, end)
            });
        Self { hours }
    }

    /// Return the raw 24-bit mask.
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    /// Whether the node is up at every hour.
    pub const fn is_always_up(&self) -> bool {
        self.hours == ALL_HOURS
    }

    /// Whether the node is up during the given hour.
    ///
    /// Hours outside `0..24` are never up.
    pub fn is_up(&self, hour: u8) -> bool {
        hour < HOURS_PER_DAY
            && self
                .hours
                .checked_shr(u32::from(hour))
                .is_some_and(|bits| bits & 1 == 1)
    }

    /// Whether the node is up at the given Eorzea time.
    pub fn is_up_at(&self, time: EorzeaTime) -> bool {
        self.is_up(time.hour())
    }

    /// Number of hours from `from_hour` until the node is next up.
    ///
    /// Returns `Some(0)` if it is up right now and `None` if it is never up.
    pub fn hours_until_up(&self, from_hour: u8) -> Option<u8> {
        (0..HOURS_PER_DAY).find(|offset| {
            let hour = (u32::from(from_hour).saturating_add(u32::from(*offset))) % 24;
            u8::try_from(hour).is_ok_and(|h| self.is_up(h))
        })
    }

    /// Render 24 characters of `0`/`1`, hour 0 first.
    pub fn uptime_table(&self) -> String {
        (0..HOURS_PER_DAY)
            .map(|hour| if self.is_up(hour) { '1' } else { '0' })
            .collect()
    }

    /// Contiguous up-ranges as half-open `(start, end)` hour pairs.
    ///
    /// Ranges never merge across midnight, so `end` may be 24. An
    /// always-up set has no ranges.
    pub fn up_ranges(&self) -> Vec<(u8, u8)> {
        if self.is_always_up() {
            return Vec::new();
        }
        let mut ranges = Vec::new();
        let mut open: Option<u8> = None;
        for hour in 0..=HOURS_PER_DAY {
            match (self.is_up(hour), open) {
                (true, None) => open = Some(hour),
                (false, Some(first)) => {
                    ranges.push((first, hour));
                    open = None;
                }
                _ => {}
            }
        }
        ranges
    }

    /// Render the up-ranges as `HH:00 - HH:00 ET`, joined with `, ` and a
    /// final ` and `.
    ///
    /// An always-up set renders as the empty string; check
    /// [`is_always_up`](Self::is_always_up) instead.
    pub fn render_human(&self) -> String {
        let ranges: Vec<String> = self
            .up_ranges()
            .into_iter()
            .map(|(start, end)| format!("{start:02}:00 - {end:02}:00 ET"))
            .collect();
        match ranges.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
        }
    }
}

/// Convert one encoded `(start, end)` window into an hour mask.
fn window_mask(start: u16, end: u16) -> u32 {
    if start == end || start > MAX_ENCODED_TIME || end > MAX_ENCODED_TIME {
        return ALL_HOURS;
    }

    let start_hour = u32::from(start / 100);
    let mut end_hour = u32::from(end / 100);
    if end_hour <= start_hour {
        end_hour = end_hour.saturating_add(24);
    }

    (start_hour..end_hour).fold(0, |mask, hour| mask | 1_u32.wrapping_shl(hour % 24))
}
