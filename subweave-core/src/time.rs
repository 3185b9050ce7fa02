//! SRT timestamp codec.
//!
//! Timestamps are whole milliseconds. The canonical text form is `HH:MM:SS,mmm`
//! where hours have no fixed width or upper bound.

use crate::error::TimeError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+):([0-9]{2}):([0-9]{2}),([0-9]{3})$").expect("timestamp regex is valid")
});

/// Point in time in milliseconds, relative to the start of a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create a timestamp from a signed millisecond count.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Invalid`] if `ms` is negative.
    pub fn try_from_millis(ms: i64) -> Result<Self, TimeError> {
        u64::try_from(ms)
            .map(Self)
            .map_err(|_| TimeError::Invalid { ms: ms.into() })
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Add a signed offset, failing if the result leaves the valid range.
    pub fn offset_by(self, offset_ms: i64) -> Result<Self, TimeError> {
        let shifted = i128::from(self.0) + i128::from(offset_ms);
        u64::try_from(shifted)
            .map(Self)
            .map_err(|_| TimeError::Invalid { ms: shifted })
    }

    /// Multiply by `numerator / denominator`, rounding to the nearest millisecond.
    ///
    /// `denominator` must be non-zero.
    pub(crate) fn scale(self, numerator: u64, denominator: u64) -> Self {
        let n = u128::from(self.0) * u128::from(numerator);
        let d = u128::from(denominator);
        let scaled = (n + d / 2) / d;
        Self(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0;
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            ms / MS_PER_HOUR,
            ms % MS_PER_HOUR / MS_PER_MINUTE,
            ms % MS_PER_MINUTE / MS_PER_SECOND,
            ms % MS_PER_SECOND,
        )
    }
}

impl FromStr for Timestamp {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeError::Malformed {
            text: s.to_string(),
        };

        let caps = TIMESTAMP_REGEX.captures(s).ok_or_else(malformed)?;

        // all groups are ASCII digits, so parsing only fails on overflow
        let field = |i: usize| caps[i].parse::<u64>().map_err(|_| malformed());
        let (hours, minutes, seconds, millis) = (field(1)?, field(2)?, field(3)?, field(4)?);

        if minutes >= 60 || seconds >= 60 {
            return Err(malformed());
        }

        hours
            .checked_mul(MS_PER_HOUR)
            .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
            .map(Self)
            .ok_or_else(malformed)
    }
}

/// Parse an `HH:MM:SS,mmm` timestamp.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimeError> {
    s.parse()
}

/// Format a millisecond count as `HH:MM:SS,mmm`.
pub fn format_timestamp(ms: i64) -> Result<String, TimeError> {
    Timestamp::try_from_millis(ms).map(|t| t.to_string())
}
