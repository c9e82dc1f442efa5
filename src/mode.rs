//! Clock mode decoding
//!
//! Maps a mode selector to the clock idle level and to the points where data is driven and
//! sampled relative to the clock edges. Everything in here is pure.

use embedded_hal::spi::{self, Phase, Polarity};

use crate::pins::Level;

/// Selector value of [`Mode::Mode1`] (CPOL = 0, CPHA = 0)
pub const SPI_MODE1: u8 = 0x00;
/// Selector value of [`Mode::Mode2`] (CPOL = 0, CPHA = 1)
pub const SPI_MODE2: u8 = 0x01;
/// Selector value of [`Mode::Mode3`] (CPOL = 1, CPHA = 0)
pub const SPI_MODE3: u8 = 0x02;
/// Selector value of [`Mode::Mode4`] (CPOL = 1, CPHA = 1)
pub const SPI_MODE4: u8 = 0x03;

/// SPI clock mode.
///
/// Note the numbering starts at one: `Mode1` is what most datasheets call "mode 0",
/// `Mode4` is "mode 3".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// CPOL = 0, CPHA = 0
    Mode1,
    /// CPOL = 0, CPHA = 1
    Mode2,
    /// CPOL = 1, CPHA = 0
    Mode3,
    /// CPOL = 1, CPHA = 1
    Mode4,
}

impl Mode {
    /// Decode a selector: bit 1 is CPOL, bit 0 is CPHA. Higher bits are ignored.
    pub fn from_selector(selector: u8) -> Mode {
        match selector & 0b11 {
            SPI_MODE1 => Mode::Mode1,
            SPI_MODE2 => Mode::Mode2,
            SPI_MODE3 => Mode::Mode3,
            _ => Mode::Mode4,
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            Mode::Mode1 => SPI_MODE1,
            Mode::Mode2 => SPI_MODE2,
            Mode::Mode3 => SPI_MODE3,
            Mode::Mode4 => SPI_MODE4,
        }
    }

    pub fn polarity(self) -> Polarity {
        if self.selector() & 0b10 == 0 {
            Polarity::IdleLow
        } else {
            Polarity::IdleHigh
        }
    }

    pub fn phase(self) -> Phase {
        if self.selector() & 0b01 == 0 {
            Phase::CaptureOnFirstTransition
        } else {
            Phase::CaptureOnSecondTransition
        }
    }

    pub fn from_parts(polarity: Polarity, phase: Phase) -> Mode {
        match (polarity, phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => Mode::Mode1,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => Mode::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => Mode::Mode3,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => Mode::Mode4,
        }
    }

    pub fn timing(self) -> ClockTiming {
        ClockTiming::from_parts(self.polarity(), self.phase())
    }
}

impl From<Mode> for spi::Mode {
    fn from(mode: Mode) -> Self {
        spi::Mode {
            polarity: mode.polarity(),
            phase: mode.phase(),
        }
    }
}

impl From<spi::Mode> for Mode {
    fn from(mode: spi::Mode) -> Self {
        Mode::from_parts(mode.polarity, mode.phase)
    }
}

/// Clock transition within one bit period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Idle to active
    Leading,
    /// Active back to idle
    Trailing,
}

/// Quarter of the bit period in which the master puts the next bit on MOSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveSlot {
    /// Setup quarter, before the leading edge (CPHA = 0)
    BeforeLeading,
    /// After the leading edge, before the trailing edge (CPHA = 1)
    BetweenEdges,
}

/// Edge rules of one clock mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTiming {
    /// Clock level between transfers
    pub idle: Level,
    /// When MOSI changes
    pub drive: DriveSlot,
    /// Edge on which the receiving side samples
    pub sample: Edge,
}

impl ClockTiming {
    pub fn from_parts(polarity: Polarity, phase: Phase) -> ClockTiming {
        let idle = match polarity {
            Polarity::IdleLow => Level::Low,
            Polarity::IdleHigh => Level::High,
        };
        let (drive, sample) = match phase {
            Phase::CaptureOnFirstTransition => (DriveSlot::BeforeLeading, Edge::Leading),
            Phase::CaptureOnSecondTransition => (DriveSlot::BetweenEdges, Edge::Trailing),
        };
        ClockTiming {
            idle,
            drive,
            sample,
        }
    }

    /// Clock level while a pulse is in progress.
    #[inline]
    pub fn active(&self) -> Level {
        self.idle.inverted()
    }
}

/// Order in which the bits of a byte travel over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

impl Default for BitOrder {
    fn default() -> Self {
        BitOrder::MsbFirst
    }
}

impl BitOrder {
    /// Bit number transferred at position `j` (0..8) of a byte.
    #[inline]
    pub fn bit_index(self, j: u8) -> u8 {
        match self {
            BitOrder::MsbFirst => 7 - j,
            BitOrder::LsbFirst => j,
        }
    }
}
