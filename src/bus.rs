//! "Bit bang" SPI bus
//!
//! Use [`SoftSpi::new`] to take over four pins of a [`PinCapability`] and
//! [`SoftSpi::derive_with_new_chip_select`] to address further devices on the same clock and
//! data wires.

use embedded_hal::blocking::spi::Write as SpiWrite;

use crate::config::BusConfig;
use crate::delay::DelayEngine;
use crate::engine::TransactionEngine;
use crate::error::Error;
use crate::pins::{Direction, Level, PinCapability};

/// "Bit bang" SPI master.
///
/// Use when you don't want to sacrifice an SPI peripheral, when the pins you need don't line
/// up with one, or when the peripheral cannot produce the mode a device needs.
///
/// ```rust,ignore
/// let config = BusConfig::new(11, 12, 13, 10, Mode::Mode1).with_frequency(500_000)?;
/// let mut spi = SoftSpi::new(board_pins, CycleDelay::new(16), config)?;
/// spi.write(&[0x55])?;
/// ```
pub struct SoftSpi<P, D>
where
    P: PinCapability,
{
    pins: P,
    delay: D,
    config: BusConfig<P::Pin>,
}

impl<P, D> SoftSpi<P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    /// Constructs the bus and puts its pins into their idle state: MOSI and CS driven high,
    /// MISO as input, the clock at the idle level of the configured mode.
    pub fn new(mut pins: P, delay: D, config: BusConfig<P::Pin>) -> Result<Self, P::Error> {
        pins.init_output(config.mosi, Level::High)?;
        pins.set_direction(config.miso, Direction::Input)?;
        pins.init_output(config.cs, Level::High)?;
        pins.init_output(config.clk, config.timing().idle)?;
        debug!(
            "soft spi mode {} at {} Hz",
            config.mode().selector(),
            config.frequency()
        );
        Ok(SoftSpi {
            pins,
            delay,
            config,
        })
    }

    /// Send every byte of `data`, framed by one chip-select pulse.
    pub fn write(&mut self, data: &[u8]) -> Result<(), Error<P::Error, D::Error>> {
        TransactionEngine::new(&mut self.pins, &mut self.delay, &self.config).write(data)
    }

    /// Fill `buffer` from MISO, framed by one chip-select pulse.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<(), Error<P::Error, D::Error>> {
        TransactionEngine::new(&mut self.pins, &mut self.delay, &self.config).read(buffer)
    }

    /// The delay engine, e.g. for coarse pacing between transactions.
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }
}

impl<P, D> SoftSpi<P, D>
where
    P: PinCapability + Clone,
    D: DelayEngine + Clone,
{
    /// A second bus on the same MOSI, MISO and clock wires with its own chip-select.
    ///
    /// Only `cs` is touched: it becomes an output driven high. `self` is left as it is.
    /// Both buses share wires, so transactions on them must not overlap.
    pub fn derive_with_new_chip_select(&self, cs: P::Pin) -> Result<Self, P::Error> {
        let mut pins = self.pins.clone();
        pins.init_output(cs, Level::High)?;
        debug!("derived soft spi bus with new chip select");
        Ok(SoftSpi {
            pins,
            delay: self.delay.clone(),
            config: self.config.with_chip_select(cs),
        })
    }
}

impl<P, D> SoftSpi<P, D>
where
    P: PinCapability,
{
    pub fn config(&self) -> &BusConfig<P::Pin> {
        &self.config
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Releases the pin capability and the delay engine.
    pub fn free(self) -> (P, D) {
        (self.pins, self.delay)
    }
}

impl<P, D> SpiWrite<u8> for SoftSpi<P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    type Error = Error<P::Error, D::Error>;

    #[inline]
    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        SoftSpi::write(self, words)
    }
}
