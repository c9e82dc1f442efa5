//! Pin capability consumed by the transaction engine.
//!
//! The engine never touches hardware directly. Everything it does to the wires goes through a
//! [`PinCapability`], which owns the physical pins and addresses them by an opaque id. Boards
//! provide one implementation (see [`crate::hal_pins`]), tests substitute a recording one.

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level of bit `index` of `byte`.
    #[inline]
    pub fn of_bit(byte: u8, index: u8) -> Level {
        Level::from((byte >> index) & 0x01 == 0x01)
    }

    /// The opposite level.
    #[inline]
    pub fn inverted(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    #[inline]
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

/// Direction of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// Digital I/O as seen by the bus.
///
/// Implementations own the pins they address. Errors are returned to the caller of
/// `write`/`read` unchanged, inside [`crate::Error::Pin`].
pub trait PinCapability {
    /// Identifier of one physical pin.
    type Pin: Copy;
    /// Error raised by the underlying driver.
    type Error;

    /// Configure `pin` as input or output.
    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<(), Self::Error>;

    /// Drive an output `pin` to `level`.
    fn set_level(&mut self, pin: Self::Pin, level: Level) -> Result<(), Self::Error>;

    /// Sample the current level of an input `pin`.
    fn read_level(&mut self, pin: Self::Pin) -> Result<Level, Self::Error>;

    /// Configure `pin` as output and drive it to `level`.
    fn init_output(&mut self, pin: Self::Pin, level: Level) -> Result<(), Self::Error> {
        self.set_direction(pin, Direction::Output)?;
        self.set_level(pin, level)
    }
}

impl<T: PinCapability + ?Sized> PinCapability for &mut T {
    type Pin = T::Pin;
    type Error = T::Error;

    #[inline]
    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<(), Self::Error> {
        (**self).set_direction(pin, direction)
    }

    #[inline]
    fn set_level(&mut self, pin: Self::Pin, level: Level) -> Result<(), Self::Error> {
        (**self).set_level(pin, level)
    }

    #[inline]
    fn read_level(&mut self, pin: Self::Pin) -> Result<Level, Self::Error> {
        (**self).read_level(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_of_bit() {
        assert_eq!(Level::of_bit(0x55, 0), Level::High);
        assert_eq!(Level::of_bit(0x55, 1), Level::Low);
        assert_eq!(Level::of_bit(0x80, 7), Level::High);
        assert_eq!(Level::of_bit(0x7F, 7), Level::Low);
    }

    #[test]
    fn test_level_bool_conversion() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(bool::from(Level::High));
        assert_eq!(Level::High.inverted(), Level::Low);
        assert_eq!(Level::Low.inverted(), Level::High);
    }
}
