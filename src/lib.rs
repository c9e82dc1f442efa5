//! # Bit-banged SPI master
//!
//! Drives an SPI bus from ordinary GPIO pins. Clock and data lines are toggled with calibrated
//! delays to reproduce the four CPOL/CPHA combinations, either bit order and an approximate
//! target clock frequency.
//!
//! The crate is split along the collaborators a transaction needs:
//!
//!  - [`PinCapability`] is the GPIO layer. Implement it for your board, or use [`HalPins`]
//!    to wrap embedded-hal pins.
//!  - [`DelayEngine`] paces the bus. [`CycleDelay`] spins on bare metal,
//!    [`hosted::HostedDelay`] sleeps through the kernel timer.
//!  - [`BusConfig`] names the pins, the [`Mode`], the [`BitOrder`] and the frequency.
//!  - [`SoftSpi`] ties them together and runs `write`/`read` transactions.
//!
//! ```rust,ignore
//! let config = BusConfig::new(11, 12, 13, 10, Mode::Mode1);
//! let mut spi = SoftSpi::new(board, CycleDelay::new(16), config)?;
//! spi.write(&[0x55])?;
//!
//! let mut other = spi.derive_with_new_chip_select(9)?;
//! let mut reply = [0u8; 2];
//! other.read(&mut reply)?;
//! ```
//!
//! A transaction runs to completion before `write`/`read` return. There is no full-duplex
//! transfer: every call either writes or reads.
//!
//! ## Features
//!
//!  - `hosted`: [`hosted::LibcSleep`], kernel sleep through libc (unix only). Implies `std`.
//!  - `std`: `std::error::Error` for the error types.
//!  - `log` / `defmt`: emit diagnostics through the respective logging framework.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;
#[cfg(all(feature = "std", not(test)))]
extern crate std;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod bus;
pub mod config;
pub mod delay;
pub mod dummypins;
pub mod engine;
pub mod error;
pub mod hal_pins;
pub mod hosted;
pub mod mode;
pub mod pins;
pub mod shared;

pub use bus::SoftSpi;
pub use config::{BusConfig, DEFAULT_FREQUENCY_HZ};
pub use delay::{CycleDelay, DelayEngine, HalDelay, NoDelay};
pub use error::{ConfigError, Error, TimingError};
pub use hal_pins::{HalPinError, HalPins, Line};
pub use mode::{BitOrder, ClockTiming, DriveSlot, Edge, Mode};
pub use pins::{Direction, Level, PinCapability};
pub use shared::SharedPins;
