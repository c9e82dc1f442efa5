//! Description of one bus endpoint

use core::num::NonZeroU32;

use embedded_hal::spi::{Phase, Polarity};

use crate::error::ConfigError;
use crate::mode::{BitOrder, ClockTiming, Mode};

/// Clock frequency used when none is given: 1 MHz
pub const DEFAULT_FREQUENCY_HZ: u32 = 1_000_000;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Pins, clock mode, bit order and target frequency of one logical bus endpoint.
///
/// This is a plain value. Nothing mutates it after construction; the `with_*` methods return
/// modified copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig<P> {
    pub(crate) mosi: P,
    pub(crate) miso: P,
    pub(crate) clk: P,
    pub(crate) cs: P,
    pub(crate) mode: Mode,
    pub(crate) bit_order: BitOrder,
    pub(crate) frequency: NonZeroU32,
}

impl<P: Copy> BusConfig<P> {
    /// MSB first at [`DEFAULT_FREQUENCY_HZ`].
    pub fn new(mosi: P, miso: P, clk: P, cs: P, mode: Mode) -> Self {
        BusConfig {
            mosi,
            miso,
            clk,
            cs,
            mode,
            bit_order: BitOrder::MsbFirst,
            frequency: NonZeroU32::new(DEFAULT_FREQUENCY_HZ).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Target clock frequency in Hz, must not be zero.
    pub fn with_frequency(mut self, hz: u32) -> Result<Self, ConfigError> {
        self.frequency = NonZeroU32::new(hz).ok_or(ConfigError::ZeroFrequency)?;
        Ok(self)
    }

    /// Same bus, different chip-select line.
    pub fn with_chip_select(mut self, cs: P) -> Self {
        self.cs = cs;
        self
    }

    pub fn mosi(&self) -> P {
        self.mosi
    }

    pub fn miso(&self) -> P {
        self.miso
    }

    pub fn clk(&self) -> P {
        self.clk
    }

    pub fn cs(&self) -> P {
        self.cs
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn polarity(&self) -> Polarity {
        self.mode.polarity()
    }

    pub fn phase(&self) -> Phase {
        self.mode.phase()
    }

    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    pub fn frequency(&self) -> u32 {
        self.frequency.get()
    }

    pub fn timing(&self) -> ClockTiming {
        self.mode.timing()
    }

    /// A quarter of one bit period in nanoseconds, rounded down.
    ///
    /// Frequencies above 250 MHz round down to zero; the bus then runs as fast as the pins
    /// and the delay engine allow.
    pub fn quarter_cycle_ns(&self) -> u64 {
        NANOS_PER_SECOND / (u64::from(self.frequency.get()) * 4)
    }
}
