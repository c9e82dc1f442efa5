//! Pacing of the bus
//!
//! The transaction engine waits through a [`DelayEngine`] between every pin change. Use
//! [`CycleDelay`] on bare metal when the core clock is known, [`HalDelay`] to reuse a delay
//! provider from the board's HAL, [`NoDelay`] for slow boards that do not need any pacing,
//! and [`crate::hosted::HostedDelay`] on boards running an operating system.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayUs;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Best effort pause of at least approximately the requested duration.
pub trait DelayEngine {
    /// Error raised when the pause could not be performed.
    type Error;

    /// Wait for `ns` nanoseconds.
    fn wait_ns(&mut self, ns: u64) -> Result<(), Self::Error>;

    /// Wait for `ms` milliseconds.
    fn wait_ms(&mut self, ms: u32) -> Result<(), Self::Error> {
        for _ in 0..ms {
            self.wait_ns(NANOS_PER_MILLI)?;
        }
        Ok(())
    }
}

impl<T: DelayEngine + ?Sized> DelayEngine for &mut T {
    type Error = T::Error;

    #[inline]
    fn wait_ns(&mut self, ns: u64) -> Result<(), Self::Error> {
        (**self).wait_ns(ns)
    }

    #[inline]
    fn wait_ms(&mut self, ms: u32) -> Result<(), Self::Error> {
        (**self).wait_ms(ms)
    }
}

/// Calibrated busy-spin for bare-metal targets.
///
/// Each iteration is assumed to take one instruction cycle, so the real delay is a multiple
/// of one cycle and usually somewhat longer than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    /// `cycles_per_us` is the core clock in MHz, e.g. 16 for a 16 MHz AVR.
    pub const fn new(cycles_per_us: u32) -> Self {
        CycleDelay { cycles_per_us }
    }

    pub fn cycles_per_us(&self) -> u32 {
        self.cycles_per_us
    }

    /// Number of spin iterations used for a wait of `ns` nanoseconds.
    ///
    /// Always at least one, never decreasing in `ns`.
    pub fn iterations(&self, ns: u64) -> u64 {
        ns.saturating_mul(u64::from(self.cycles_per_us)) / 1_000 + 1
    }
}

impl DelayEngine for CycleDelay {
    type Error = Infallible;

    #[inline]
    fn wait_ns(&mut self, ns: u64) -> Result<(), Infallible> {
        // black_box keeps the loop on targets where spin_loop emits nothing
        for i in 0..self.iterations(ns) {
            core::hint::black_box(i);
            core::hint::spin_loop();
        }
        Ok(())
    }
}

/// Used to run without delay on a slow enough clock speed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayEngine for NoDelay {
    type Error = Infallible;

    #[inline]
    fn wait_ns(&mut self, _ns: u64) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Wraps a microsecond delay provider from a board HAL.
///
/// Requests are rounded up to the next whole microsecond.
///
/// ```rust,ignore
/// let cp = cortex_m::peripheral::Peripherals::take().unwrap();
/// let delay = cortex_m::delay::Delay::new(cp.SYST, clocks.sysclk().0);
///
/// let spi = SoftSpi::new(pins, HalDelay::new(delay), config)?;
/// ```
#[derive(Debug, Clone)]
pub struct HalDelay<D> {
    delay: D,
}

impl<D: DelayUs<u32>> HalDelay<D> {
    pub fn new(delay: D) -> Self {
        HalDelay { delay }
    }

    pub fn free(self) -> D {
        self.delay
    }
}

impl<D: DelayUs<u32>> DelayEngine for HalDelay<D> {
    type Error = Infallible;

    fn wait_ns(&mut self, ns: u64) -> Result<(), Infallible> {
        let mut us = ns / 1_000 + u64::from(ns % 1_000 != 0);
        while us > 0 {
            let chunk = us.min(u64::from(u32::MAX));
            self.delay.delay_us(chunk as u32);
            us -= chunk;
        }
        Ok(())
    }

    fn wait_ms(&mut self, ms: u32) -> Result<(), Infallible> {
        for _ in 0..ms {
            self.delay.delay_us(1_000);
        }
        Ok(())
    }
}
