//! # Small module to provide "fake" pins
//!
//! This is used when a bus is needed but no device is attached, for example to exercise
//! the framing on a board that has nothing wired up yet, or for write-only devices whose
//! MISO is left floating.
//!
//! Every operation succeeds and does nothing. Reads always return [`Level::Low`].

use core::convert::Infallible;

use crate::pins::{Direction, Level, PinCapability};

/// Provides a dummy pin capability addressing pins by board pin number.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyPins;

impl PinCapability for DummyPins {
    type Pin = u8;
    type Error = Infallible;

    fn set_direction(&mut self, _pin: u8, _direction: Direction) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_level(&mut self, _pin: u8, _level: Level) -> Result<(), Infallible> {
        Ok(())
    }

    fn read_level(&mut self, _pin: u8) -> Result<Level, Infallible> {
        Ok(Level::Low)
    }
}
