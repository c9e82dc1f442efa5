//! Sharing one pin capability between several buses

use core::cell::RefCell;

use crate::pins::{Direction, Level, PinCapability};

/// Handle to a [`PinCapability`] living in a `RefCell`.
///
/// Every call borrows the cell for the duration of a single pin operation, so any number of
/// handles can coexist. Create one bus from a handle and derive the others from that bus:
///
/// ```rust,ignore
/// let board = RefCell::new(board_pins);
/// let mut flash = SoftSpi::new(SharedPins::new(&board), delay, config)?;
/// let mut adc = flash.derive_with_new_chip_select(ADC_CS)?;
/// ```
///
/// `RefCell` is not `Sync`, which keeps the buses on one thread; interleaving their
/// transactions is still up to the caller.
pub struct SharedPins<'a, C> {
    cell: &'a RefCell<C>,
}

impl<'a, C> SharedPins<'a, C> {
    pub fn new(cell: &'a RefCell<C>) -> Self {
        SharedPins { cell }
    }
}

impl<'a, C> Clone for SharedPins<'a, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, C> Copy for SharedPins<'a, C> {}

impl<'a, C: PinCapability> PinCapability for SharedPins<'a, C> {
    type Pin = C::Pin;
    type Error = C::Error;

    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<(), Self::Error> {
        self.cell.borrow_mut().set_direction(pin, direction)
    }

    fn set_level(&mut self, pin: Self::Pin, level: Level) -> Result<(), Self::Error> {
        self.cell.borrow_mut().set_level(pin, level)
    }

    fn read_level(&mut self, pin: Self::Pin) -> Result<Level, Self::Error> {
        self.cell.borrow_mut().read_level(pin)
    }
}
