use miette::Diagnostic;
use std::{
    fmt,
    str::FromStr,
    time::{Duration, SystemTime, SystemTimeError},
};
use thiserror::Error;

/// Timestamp literal wasn't a decimal integer
#[derive(Debug, Diagnostic, Error, PartialEq, Eq)]
#[error("Invalid UNIX timestamp literal")]
pub struct InvalidTimestamp;

/// Seconds since the UNIX epoch (UTC)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Wrap a raw number of seconds
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Convert a point in time into a timestamp, flooring any sub-second part
    pub fn from_system_time(time: SystemTime) -> Result<Self, SystemTimeError> {
        time.duration_since(SystemTime::UNIX_EPOCH)
            .map(|duration| Self(duration.as_secs()))
    }

    /// Number of seconds since the epoch
    #[must_use]
    pub const fn to_number(self) -> u64 {
        self.0
    }

    /// Point in time this timestamp refers to
    ///
    /// `None` if the platform's `SystemTime` can't represent it
    #[must_use]
    pub fn to_system_time(self) -> Option<SystemTime> {
        SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(self.0))
    }
}

impl From<u64> for UnixTimestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<UnixTimestamp> for u64 {
    fn from(value: UnixTimestamp) -> Self {
        value.0
    }
}

impl TryFrom<SystemTime> for UnixTimestamp {
    type Error = SystemTimeError;

    fn try_from(value: SystemTime) -> Result<Self, Self::Error> {
        Self::from_system_time(value)
    }
}

impl FromStr for UnixTimestamp {
    type Err = InvalidTimestamp;

    /// Only plain ASCII digits are accepted. Signs, whitespace and fractions are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidTimestamp);
        }

        s.parse().map(Self).map_err(|_| InvalidTimestamp)
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
