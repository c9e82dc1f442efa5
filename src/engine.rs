//! Chip-select framing and the per-bit write/read loops
//!
//! Every bit period is split into four quarter-cycles of `ct` nanoseconds:
//!
//! ```text
//!            setup     leading     mid      trailing
//!          |--- ct ---|--- ct ---|--- ct ---|--- ct ---|
//! CPHA = 0   drive MOSI  CLK active            CLK idle
//! CPHA = 1               CLK active  drive MOSI  CLK idle
//! ```
//!
//! Reads use the same grid and sample MISO one quarter after the edge the mode samples on.
//!
//! A transaction first forces MOSI low and the clock to its idle level, waits one quarter,
//! then asserts chip-select (active low). After the last bit it waits one quarter, releases
//! chip-select and keeps the bus idle for one full bit period before returning.

use crate::config::BusConfig;
use crate::delay::DelayEngine;
use crate::error::Error;
use crate::mode::{DriveSlot, Edge};
use crate::pins::{Level, PinCapability};

type Result<T, P, D> =
    core::result::Result<T, Error<<P as PinCapability>::Error, <D as DelayEngine>::Error>>;

/// Runs transactions over borrowed pins and delay for one [`BusConfig`].
pub struct TransactionEngine<'a, P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    pins: &'a mut P,
    delay: &'a mut D,
    config: &'a BusConfig<P::Pin>,
    ct: u64,
}

impl<'a, P, D> TransactionEngine<'a, P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    pub fn new(pins: &'a mut P, delay: &'a mut D, config: &'a BusConfig<P::Pin>) -> Self {
        let ct = config.quarter_cycle_ns();
        TransactionEngine {
            pins,
            delay,
            config,
            ct,
        }
    }

    /// Clock out every byte of `data`.
    ///
    /// An empty slice still produces a complete chip-select pulse.
    pub fn write(&mut self, data: &[u8]) -> Result<(), P, D> {
        trace!("write {} bytes, quarter cycle {} ns", data.len(), self.ct);
        let mut frame = self.begin()?;
        for &byte in data {
            frame.shift_out(byte)?;
        }
        frame.finish()
    }

    /// Clock in `buffer.len()` bytes. MOSI is held low for the whole transaction.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<(), P, D> {
        trace!("read {} bytes, quarter cycle {} ns", buffer.len(), self.ct);
        let mut frame = self.begin()?;
        for byte in buffer.iter_mut() {
            *byte = frame.shift_in()?;
        }
        frame.finish()
    }

    /// Settle the lines and assert chip-select.
    fn begin(&mut self) -> Result<Frame<'_, 'a, P, D>, P, D> {
        let idle = self.config.timing().idle;
        self.set(self.config.mosi, Level::Low)?;
        self.set(self.config.clk, idle)?;
        self.wait(self.ct)?;
        self.set(self.config.cs, Level::Low)?;
        Ok(Frame {
            engine: self,
            selected: true,
        })
    }

    #[inline]
    fn set(&mut self, pin: P::Pin, level: Level) -> Result<(), P, D> {
        self.pins.set_level(pin, level).map_err(Error::pin)
    }

    #[inline]
    fn sample(&mut self, pin: P::Pin) -> Result<Level, P, D> {
        self.pins.read_level(pin).map_err(Error::pin)
    }

    #[inline]
    fn wait(&mut self, ns: u64) -> Result<(), P, D> {
        self.delay.wait_ns(ns).map_err(Error::timing)
    }
}

/// Chip-select held low for the lifetime of this value.
///
/// Dropping a frame without [`Frame::finish`] (an error bailed out mid-byte) releases
/// chip-select immediately; a failure to do so can only be ignored at that point.
struct Frame<'e, 'a, P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    engine: &'e mut TransactionEngine<'a, P, D>,
    selected: bool,
}

impl<'e, 'a, P, D> Frame<'e, 'a, P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    fn shift_out(&mut self, byte: u8) -> Result<(), P, D> {
        let e = &mut *self.engine;
        let timing = e.config.timing();
        let (mosi, clk) = (e.config.mosi, e.config.clk);
        for j in 0..8 {
            let bit = Level::of_bit(byte, e.config.bit_order.bit_index(j));

            e.wait(e.ct)?;
            if timing.drive == DriveSlot::BeforeLeading {
                e.set(mosi, bit)?;
            }

            e.wait(e.ct)?;
            e.set(clk, timing.active())?;

            e.wait(e.ct)?;
            if timing.drive == DriveSlot::BetweenEdges {
                e.set(mosi, bit)?;
            }

            e.wait(e.ct)?;
            e.set(clk, timing.idle)?;
        }
        Ok(())
    }

    fn shift_in(&mut self) -> Result<u8, P, D> {
        let e = &mut *self.engine;
        let timing = e.config.timing();
        let (miso, clk) = (e.config.miso, e.config.clk);
        let mut byte = 0u8;
        for j in 0..8 {
            let shift = e.config.bit_order.bit_index(j);

            e.wait(e.ct)?;
            e.set(clk, timing.active())?;

            e.wait(e.ct)?;
            if timing.sample == Edge::Leading && e.sample(miso)?.is_high() {
                byte |= 1 << shift;
            }

            e.wait(e.ct)?;
            e.set(clk, timing.idle)?;

            e.wait(e.ct)?;
            if timing.sample == Edge::Trailing && e.sample(miso)?.is_high() {
                byte |= 1 << shift;
            }
        }
        Ok(byte)
    }

    /// Release chip-select and hold the bus idle for the guard time.
    fn finish(mut self) -> Result<(), P, D> {
        self.selected = false;
        let e = &mut *self.engine;
        let settled = e.wait(e.ct);
        let released = e.set(e.config.cs, Level::High);
        settled?;
        released?;
        e.wait(e.ct * 4)
    }
}

impl<'e, 'a, P, D> Drop for Frame<'e, 'a, P, D>
where
    P: PinCapability,
    D: DelayEngine,
{
    fn drop(&mut self) {
        if self.selected {
            let cs = self.engine.config.cs;
            let _ = self.engine.pins.set_level(cs, Level::High);
        }
    }
}
