//! Microcontroller backend over embedded-hal digital pins
//!
//! HAL pins carry their direction in their type, so [`HalPins`] only checks that a direction
//! request matches what the pin already is.

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::pins::{Direction, Level, PinCapability};

/// Pin ids understood by [`HalPins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    Mosi,
    Miso,
    Clk,
    /// Index into the chip-select array
    ChipSelect(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalPinError<E> {
    /// Error of the underlying HAL pin
    Pin(E),
    /// The line cannot be used in the requested direction
    WrongDirection(Line),
    /// No such chip-select
    UnknownLine(Line),
}

/// Clock, data and `N` chip-select pins of one board.
pub struct HalPins<MOSI, MISO, CLK, CS, const N: usize> {
    mosi: MOSI,
    miso: MISO,
    clk: CLK,
    cs: [CS; N],
}

impl<MOSI, MISO, CLK, CS, ERR, const N: usize> HalPins<MOSI, MISO, CLK, CS, N>
where
    MOSI: OutputPin<Error = ERR>,
    MISO: InputPin<Error = ERR>,
    CLK: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
{
    pub fn new(mosi: MOSI, miso: MISO, clk: CLK, cs: [CS; N]) -> Self {
        HalPins {
            mosi,
            miso,
            clk,
            cs,
        }
    }

    pub fn free(self) -> (MOSI, MISO, CLK, [CS; N]) {
        (self.mosi, self.miso, self.clk, self.cs)
    }

    fn output(&mut self, line: Line) -> Result<&mut dyn OutputPin<Error = ERR>, HalPinError<ERR>> {
        match line {
            Line::Mosi => Ok(&mut self.mosi),
            Line::Clk => Ok(&mut self.clk),
            Line::ChipSelect(index) => match self.cs.get_mut(index) {
                Some(cs) => Ok(cs),
                None => Err(HalPinError::UnknownLine(line)),
            },
            Line::Miso => Err(HalPinError::WrongDirection(line)),
        }
    }
}

impl<MOSI, MISO, CLK, CS, ERR, const N: usize> PinCapability for HalPins<MOSI, MISO, CLK, CS, N>
where
    MOSI: OutputPin<Error = ERR>,
    MISO: InputPin<Error = ERR>,
    CLK: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
{
    type Pin = Line;
    type Error = HalPinError<ERR>;

    fn set_direction(&mut self, pin: Line, direction: Direction) -> Result<(), Self::Error> {
        match (pin, direction) {
            (Line::Miso, Direction::Input) => Ok(()),
            (Line::Miso, Direction::Output) | (_, Direction::Input) => {
                Err(HalPinError::WrongDirection(pin))
            }
            (_, Direction::Output) => self.output(pin).map(|_| ()),
        }
    }

    fn set_level(&mut self, pin: Line, level: Level) -> Result<(), Self::Error> {
        let out = self.output(pin)?;
        let result = match level {
            Level::High => out.set_high(),
            Level::Low => out.set_low(),
        };
        result.map_err(HalPinError::Pin)
    }

    fn read_level(&mut self, pin: Line) -> Result<Level, Self::Error> {
        match pin {
            Line::Miso => self
                .miso
                .is_high()
                .map(Level::from)
                .map_err(HalPinError::Pin),
            _ => Err(HalPinError::WrongDirection(pin)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;

    struct Out<'a>(&'a Cell<bool>);

    impl OutputPin for Out<'_> {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(true);
            Ok(())
        }
    }

    struct In<'a>(&'a Cell<bool>);

    impl InputPin for In<'_> {
        type Error = Infallible;
        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }
        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    #[test]
    fn test_levels_reach_hal_pins() {
        let (mosi, miso, clk) = (Cell::new(false), Cell::new(true), Cell::new(false));
        let (cs0, cs1) = (Cell::new(false), Cell::new(false));
        let mut pins = HalPins::new(Out(&mosi), In(&miso), Out(&clk), [Out(&cs0), Out(&cs1)]);

        pins.set_level(Line::Mosi, Level::High).unwrap();
        pins.set_level(Line::Clk, Level::High).unwrap();
        pins.set_level(Line::ChipSelect(1), Level::High).unwrap();
        assert!(mosi.get());
        assert!(clk.get());
        assert!(!cs0.get());
        assert!(cs1.get());
        assert_eq!(pins.read_level(Line::Miso), Ok(Level::High));
    }

    #[test]
    fn test_direction_checks() {
        let (mosi, miso, clk, cs) = (Cell::new(false), Cell::new(false), Cell::new(false), Cell::new(false));
        let mut pins = HalPins::new(Out(&mosi), In(&miso), Out(&clk), [Out(&cs)]);

        assert_eq!(pins.set_direction(Line::Miso, Direction::Input), Ok(()));
        assert_eq!(pins.set_direction(Line::Clk, Direction::Output), Ok(()));
        assert_eq!(
            pins.set_direction(Line::Miso, Direction::Output),
            Err(HalPinError::WrongDirection(Line::Miso))
        );
        assert_eq!(
            pins.set_direction(Line::Mosi, Direction::Input),
            Err(HalPinError::WrongDirection(Line::Mosi))
        );
        assert_eq!(
            pins.set_level(Line::Miso, Level::High),
            Err(HalPinError::WrongDirection(Line::Miso))
        );
        assert_eq!(
            pins.read_level(Line::Clk),
            Err(HalPinError::WrongDirection(Line::Clk))
        );
        assert_eq!(
            pins.set_direction(Line::ChipSelect(1), Direction::Output),
            Err(HalPinError::UnknownLine(Line::ChipSelect(1)))
        );
    }
}
