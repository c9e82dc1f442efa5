//! Recording board used by the integration tests.
//!
//! `SimBoard` and `SimDelay` share one event log so a test can see pin changes and waits in
//! the order they happened. An optional echo slave captures MOSI on the sample edge of its
//! mode during write frames and plays the captured bits back on MISO.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use softspi::{
    BusConfig, ClockTiming, DelayEngine, Direction, Edge, Level, Mode, PinCapability, SoftSpi,
    TimingError,
};

pub const MOSI: u8 = 11;
pub const MISO: u8 = 12;
pub const CLK: u8 = 13;
pub const CS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Direction(u8, Direction),
    Level(u8, Level),
    Read(u8, Level),
    Wait(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault(pub u8);

struct EchoSlave {
    mosi: u8,
    miso: u8,
    clk: u8,
    cs: u8,
    timing: ClockTiming,
    selected: bool,
    read_in_frame: bool,
    frame: Vec<Level>,
    replay: VecDeque<Level>,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    levels: HashMap<u8, Level>,
    slave: Option<EchoSlave>,
    failing_pin: Option<u8>,
    failing_while_selected: Option<u8>,
    fail_on_wait: Option<usize>,
    waits: usize,
}

impl State {
    fn set_level(&mut self, pin: u8, level: Level) {
        let previous = self.levels.insert(pin, level);
        self.events.push(Event::Level(pin, level));
        if let Some(slave) = self.slave.as_mut() {
            if pin == slave.cs {
                match level {
                    Level::Low => {
                        slave.selected = true;
                        slave.read_in_frame = false;
                        slave.frame.clear();
                    }
                    Level::High => {
                        if slave.selected && !slave.read_in_frame {
                            slave.replay.extend(slave.frame.drain(..));
                        }
                        slave.selected = false;
                    }
                }
            } else if pin == slave.clk && slave.selected && previous != Some(level) {
                let edge = if level == slave.timing.active() {
                    Edge::Leading
                } else {
                    Edge::Trailing
                };
                if edge == slave.timing.sample {
                    let bit = *self.levels.get(&slave.mosi).unwrap_or(&Level::Low);
                    slave.frame.push(bit);
                }
            }
        }
    }

    fn read_level(&mut self, pin: u8) -> Level {
        let level = match self.slave.as_mut() {
            Some(slave) if pin == slave.miso => {
                slave.read_in_frame = true;
                slave.replay.pop_front().unwrap_or(Level::Low)
            }
            _ => *self.levels.get(&pin).unwrap_or(&Level::Low),
        };
        self.events.push(Event::Read(pin, level));
        level
    }
}

#[derive(Clone, Default)]
pub struct SimBoard {
    state: Rc<RefCell<State>>,
}

#[derive(Clone)]
pub struct SimDelay {
    state: Rc<RefCell<State>>,
}

impl SimBoard {
    pub fn new() -> Self {
        SimBoard::default()
    }

    /// Board with an echo slave on the default pins, speaking `mode`.
    pub fn with_echo(mode: Mode) -> Self {
        let board = SimBoard::new();
        board.state.borrow_mut().slave = Some(EchoSlave {
            mosi: MOSI,
            miso: MISO,
            clk: CLK,
            cs: CS,
            timing: mode.timing(),
            selected: false,
            read_in_frame: false,
            frame: Vec::new(),
            replay: VecDeque::new(),
        });
        board
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            state: self.state.clone(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn level(&self, pin: u8) -> Option<Level> {
        self.state.borrow().levels.get(&pin).copied()
    }

    /// Every further `set_level` on `pin` fails.
    pub fn fail_level_on(&self, pin: u8) {
        self.state.borrow_mut().failing_pin = Some(pin);
    }

    /// Every further `set_level` on `pin` fails while chip-select is low.
    pub fn fail_level_while_selected(&self, pin: u8) {
        self.state.borrow_mut().failing_while_selected = Some(pin);
    }

    /// The `n`th wait from now (0-based) reports an interrupted sleep.
    pub fn fail_wait(&self, n: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_on_wait = Some(state.waits + n);
    }
}

impl PinCapability for SimBoard {
    type Pin = u8;
    type Error = PinFault;

    fn set_direction(&mut self, pin: u8, direction: Direction) -> Result<(), PinFault> {
        self.state
            .borrow_mut()
            .events
            .push(Event::Direction(pin, direction));
        Ok(())
    }

    fn set_level(&mut self, pin: u8, level: Level) -> Result<(), PinFault> {
        let mut state = self.state.borrow_mut();
        if state.failing_pin == Some(pin) {
            return Err(PinFault(pin));
        }
        if state.failing_while_selected == Some(pin) && state.levels.get(&CS) == Some(&Level::Low) {
            return Err(PinFault(pin));
        }
        state.set_level(pin, level);
        Ok(())
    }

    fn read_level(&mut self, pin: u8) -> Result<Level, PinFault> {
        Ok(self.state.borrow_mut().read_level(pin))
    }
}

impl DelayEngine for SimDelay {
    type Error = TimingError;

    fn wait_ns(&mut self, ns: u64) -> Result<(), TimingError> {
        let mut state = self.state.borrow_mut();
        let index = state.waits;
        state.waits += 1;
        if state.fail_on_wait == Some(index) {
            return Err(TimingError::Interrupted);
        }
        state.events.push(Event::Wait(ns));
        Ok(())
    }
}

pub fn config(mode: Mode) -> BusConfig<u8> {
    BusConfig::new(MOSI, MISO, CLK, CS, mode)
}

pub fn bus(board: &SimBoard, config: BusConfig<u8>) -> SoftSpi<SimBoard, SimDelay> {
    match SoftSpi::new(board.clone(), board.delay(), config) {
        Ok(spi) => spi,
        Err(fault) => panic!("construction failed: {:?}", fault),
    }
}

pub fn all_modes() -> [Mode; 4] {
    [Mode::Mode1, Mode::Mode2, Mode::Mode3, Mode::Mode4]
}

/// Level of `data` at every clock edge of the given kind, in order.
pub fn data_at_edges(events: &[Event], data: u8, clk: u8, timing: ClockTiming, edge: Edge) -> Vec<Level> {
    let mut clk_level = timing.idle;
    let mut data_level = Level::Low;
    let mut samples = Vec::new();
    for event in events {
        match *event {
            Event::Level(pin, level) if pin == data => data_level = level,
            Event::Level(pin, level) if pin == clk && level != clk_level => {
                clk_level = level;
                let this_edge = if level == timing.active() {
                    Edge::Leading
                } else {
                    Edge::Trailing
                };
                if this_edge == edge {
                    samples.push(data_level);
                }
            }
            _ => {}
        }
    }
    samples
}

pub fn bits_of(byte: u8) -> Vec<Level> {
    (0..8).rev().map(|i| Level::of_bit(byte, i)).collect()
}
