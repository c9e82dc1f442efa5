//! Pacing through the kernel timer on boards running a hosted OS
//!
//! Pin toggling there goes through the board library while delays are handed to the kernel
//! with `nanosleep`. Failures of the sleep are reported, never retried.

use crate::delay::DelayEngine;
use crate::error::TimingError;

/// Largest nanosecond count passed to the kernel without carrying into seconds.
pub const MAX_NANO_TIME: u64 = 999_999_999;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Longest single `usleep` request, in milliseconds. POSIX allows less than one second.
const MAX_USLEEP_MS: u32 = 999;

/// Seconds/nanoseconds pair handed to the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timespec {
    pub seconds: u64,
    pub nanoseconds: u32,
}

impl Timespec {
    /// Split `ns` into whole seconds and the nanosecond remainder.
    pub fn from_nanos(ns: u64) -> Timespec {
        if ns > MAX_NANO_TIME {
            Timespec {
                seconds: ns / NANOS_PER_SECOND,
                nanoseconds: (ns % NANOS_PER_SECOND) as u32,
            }
        } else {
            Timespec {
                seconds: 0,
                nanoseconds: ns as u32,
            }
        }
    }

    pub fn as_nanos(&self) -> u64 {
        self.seconds
            .saturating_mul(NANOS_PER_SECOND)
            .saturating_add(u64::from(self.nanoseconds))
    }
}

/// The kernel sleep primitives consumed by [`HostedDelay`].
pub trait KernelSleep {
    /// Suspend the calling thread for `duration`.
    fn nanosleep(&mut self, duration: &Timespec) -> Result<(), TimingError>;

    /// Suspend the calling thread for `us` microseconds, `us` below one second.
    fn usleep(&mut self, us: u32) -> Result<(), TimingError>;
}

impl<T: KernelSleep + ?Sized> KernelSleep for &mut T {
    fn nanosleep(&mut self, duration: &Timespec) -> Result<(), TimingError> {
        (**self).nanosleep(duration)
    }

    fn usleep(&mut self, us: u32) -> Result<(), TimingError> {
        (**self).usleep(us)
    }
}

/// [`DelayEngine`] backed by the kernel timer.
#[derive(Debug, Clone, Default)]
pub struct HostedDelay<S> {
    sleep: S,
}

impl<S: KernelSleep> HostedDelay<S> {
    pub fn new(sleep: S) -> Self {
        HostedDelay { sleep }
    }

    pub fn free(self) -> S {
        self.sleep
    }
}

impl<S: KernelSleep> DelayEngine for HostedDelay<S> {
    type Error = TimingError;

    fn wait_ns(&mut self, ns: u64) -> Result<(), TimingError> {
        let duration = Timespec::from_nanos(ns);
        self.sleep.nanosleep(&duration).map_err(|e| {
            warn!("nanosleep of {} ns failed", ns);
            e
        })
    }

    fn wait_ms(&mut self, ms: u32) -> Result<(), TimingError> {
        let mut remaining = ms;
        while remaining > 0 {
            let chunk = remaining.min(MAX_USLEEP_MS);
            self.sleep.usleep(chunk * 1_000).map_err(|e| {
                warn!("usleep of {} ms failed", chunk);
                e
            })?;
            remaining -= chunk;
        }
        Ok(())
    }
}

#[cfg(all(feature = "hosted", unix))]
pub use self::libc_sleep::LibcSleep;

#[cfg(all(feature = "hosted", unix))]
mod libc_sleep {
    use core::convert::TryFrom;

    use super::{KernelSleep, Timespec};
    use crate::error::TimingError;

    /// `nanosleep(2)` and `usleep(3)` from the C library.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LibcSleep;

    fn last_error() -> TimingError {
        match std::io::Error::last_os_error().raw_os_error() {
            Some(libc::EINTR) => TimingError::Interrupted,
            Some(libc::EINVAL) => TimingError::InvalidDuration,
            Some(libc::EFAULT) => TimingError::CopyFault,
            Some(code) => TimingError::Os(code),
            None => TimingError::Os(0),
        }
    }

    impl KernelSleep for LibcSleep {
        fn nanosleep(&mut self, duration: &Timespec) -> Result<(), TimingError> {
            let seconds = libc::time_t::try_from(duration.seconds)
                .map_err(|_| TimingError::InvalidDuration)?;
            let request = libc::timespec {
                tv_sec: seconds,
                tv_nsec: duration.nanoseconds as libc::c_long,
            };
            let mut remaining = libc::timespec {
                tv_sec: 0,
                tv_nsec: 0,
            };
            // SAFETY: both pointers refer to live, properly aligned stack values.
            let rc = unsafe { libc::nanosleep(&request, &mut remaining) };
            if rc == 0 {
                Ok(())
            } else {
                Err(last_error())
            }
        }

        fn usleep(&mut self, us: u32) -> Result<(), TimingError> {
            // SAFETY: usleep has no memory safety preconditions.
            let rc = unsafe { libc::usleep(us as libc::useconds_t) };
            if rc == 0 {
                Ok(())
            } else {
                Err(last_error())
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_libc_sleep_short() {
            let mut sleep = LibcSleep;
            assert_eq!(sleep.nanosleep(&Timespec::from_nanos(1_000)), Ok(()));
            assert_eq!(sleep.usleep(1), Ok(()));
        }

        #[test]
        fn test_libc_sleep_rejects_invalid_nanoseconds() {
            let mut sleep = LibcSleep;
            let invalid = Timespec {
                seconds: 0,
                nanoseconds: 1_000_000_000,
            };
            assert_eq!(sleep.nanosleep(&invalid), Err(TimingError::InvalidDuration));
        }

        #[test]
        fn test_libc_sleep_rejects_unrepresentable_seconds() {
            let mut sleep = LibcSleep;
            let too_long = Timespec {
                seconds: u64::MAX,
                nanoseconds: 0,
            };
            assert_eq!(sleep.nanosleep(&too_long), Err(TimingError::InvalidDuration));
        }
    }
}
