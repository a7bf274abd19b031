//! Request timeouts
//!
//! A timeout bounds two phases of a request separately: establishing the
//! connection, and each wait for data from the server once connected.
//! A scalar timeout applies the same bound to both phases.

use std::time::Duration;

use crate::error::{HttpError, Result};

/// Default timeout in seconds applied when a client is built without one.
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// Connect/read timeout pair. Both durations are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeout {
    connect: Duration,
    read: Duration,
}

impl Timeout {
    /// Same bound for the connect and read phases.
    pub fn secs(secs: f64) -> Result<Self> {
        let d = positive_duration("timeout", secs)?;
        Ok(Self { connect: d, read: d })
    }

    /// Separate connect and read bounds.
    pub fn split(connect_secs: f64, read_secs: f64) -> Result<Self> {
        Ok(Self {
            connect: positive_duration("connect timeout", connect_secs)?,
            read: positive_duration("read timeout", read_secs)?,
        })
    }

    /// Build from durations.
    pub fn from_durations(connect: Duration, read: Duration) -> Result<Self> {
        if connect.is_zero() || read.is_zero() {
            return Err(HttpError::InvalidTimeout(format!(
                "timeouts must be positive, got connect={:?} read={:?}",
                connect, read
            )));
        }
        Ok(Self { connect, read })
    }

    pub fn connect(&self) -> Duration {
        self.connect
    }

    pub fn read(&self) -> Duration {
        self.read
    }
}

impl Default for Timeout {
    fn default() -> Self {
        let d = Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS);
        Self { connect: d, read: d }
    }
}

fn positive_duration(what: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(HttpError::InvalidTimeout(format!(
            "{} must be a positive number of seconds, got {}",
            what, secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| HttpError::InvalidTimeout(format!("{}: {}", what, e)))
}
