//! Error types shared by the bus, the delay strategies and the pin adapters.

use core::fmt;

/// Failure of a single `write`/`read` transaction.
///
/// Pin-layer and timing failures are passed through untouched so the caller can see which
/// collaborator gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<PinErr, TimingErr> {
    /// The pin capability rejected a direction, level or read request.
    Pin(PinErr),
    /// The delay engine could not pace the bus.
    Timing(TimingErr),
}

impl<PinErr, TimingErr> Error<PinErr, TimingErr> {
    pub(crate) fn pin(err: PinErr) -> Self {
        Error::Pin(err)
    }

    pub(crate) fn timing(err: TimingErr) -> Self {
        Error::Timing(err)
    }
}

impl<PinErr: fmt::Debug, TimingErr: fmt::Debug> fmt::Display for Error<PinErr, TimingErr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin(e) => write!(f, "pin error: {:?}", e),
            Error::Timing(e) => write!(f, "timing error: {:?}", e),
        }
    }
}

/// Failure reported by the hosted kernel sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// The sleep was interrupted by a signal (`EINTR`).
    Interrupted,
    /// The kernel refused the requested duration (`EINVAL`).
    InvalidDuration,
    /// The kernel could not copy the time value from user space (`EFAULT`).
    CopyFault,
    /// Any other errno.
    Os(i32),
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingError::Interrupted => f.write_str("sleep interrupted by a signal"),
            TimingError::InvalidDuration => f.write_str("invalid sleep duration"),
            TimingError::CopyFault => f.write_str("fault copying the sleep duration"),
            TimingError::Os(code) => write!(f, "sleep failed with errno {}", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimingError {}

/// Rejected bus configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The target clock frequency must be at least 1 Hz.
    ZeroFrequency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroFrequency => f.write_str("clock frequency must be greater than zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
