// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host test doubles.

use crate::{
    display::{CharLcd, COLS, Display, Line, ROWS},
    settings::{Nvm, NvmStore, Settings, SettingsStore as _},
    shared::SharedState,
    system::{Outputs, SPLASH_HOLD_MS, System},
    tick::{TickInputs, TickService},
};

pub struct RamNvm {
    pub mem: [u8; 64],
    pub writes: u32,
    /// Writes to this offset store garbage.
    pub fail_at: Option<u16>,
    /// Only the first write to `fail_at` fails.
    pub fail_once: bool,
}

impl RamNvm {
    pub fn erased() -> Self {
        Self {
            mem: [0xFF; 64],
            writes: 0,
            fail_at: None,
            fail_once: false,
        }
    }
}

impl Nvm for RamNvm {
    fn read_byte(&mut self, offset: u16) -> u8 {
        self.mem[offset as usize]
    }

    fn write_byte(&mut self, offset: u16, value: u8) {
        self.writes += 1;
        self.mem[offset as usize] = if self.fail_at == Some(offset) {
            if self.fail_once {
                self.fail_at = None;
            }
            !value
        } else {
            value
        };
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutEvent {
    Guard(bool),
    Triac(bool),
    Buzzer(bool),
}

#[derive(Default)]
pub struct RecordingOutputs {
    pub events: heapless::Vec<OutEvent, 128>,
    /// Timestamp of each event. Milliseconds.
    pub times: heapless::Vec<u32, 128>,
    pub now: u32,
}

impl RecordingOutputs {
    fn push(&mut self, ev: OutEvent) {
        self.events.push(ev).unwrap();
        self.times.push(self.now).unwrap();
    }

    fn last(&self, f: impl Fn(&OutEvent) -> Option<bool>) -> bool {
        self.events.iter().rev().find_map(f).unwrap_or(false)
    }

    pub fn triac(&self) -> bool {
        self.last(|ev| match ev {
            OutEvent::Triac(on) => Some(*on),
            _ => None,
        })
    }

    pub fn guard(&self) -> bool {
        self.last(|ev| match ev {
            OutEvent::Guard(on) => Some(*on),
            _ => None,
        })
    }

    pub fn triac_on_count(&self) -> usize {
        self.events
            .iter()
            .filter(|ev| **ev == OutEvent::Triac(true))
            .count()
    }
}

impl Outputs for RecordingOutputs {
    fn set_sense_guard(&mut self, asserted: bool) {
        self.push(OutEvent::Guard(asserted));
    }

    fn set_triac(&mut self, on: bool) {
        // The triac must never fire into a guarded sense input.
        assert!(!on || !self.guard());
        self.push(OutEvent::Triac(on));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.push(OutEvent::Buzzer(on));
    }
}

pub struct RecordingDisplay {
    pub lines: [Line; ROWS],
    pub renders: u32,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            lines: [[b' '; COLS]; ROWS],
            renders: 0,
        }
    }

    pub fn text(&self, row: usize) -> &str {
        core::str::from_utf8(&self.lines[row]).unwrap()
    }
}

impl Display for RecordingDisplay {
    fn render(&mut self, line0: &Line, line1: &Line) {
        self.lines = [*line0, *line1];
        self.renders += 1;
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LcdOp {
    Cursor(u8, u8),
    Write(heapless::Vec<u8, COLS>),
}

impl LcdOp {
    pub fn write(text: &[u8]) -> Self {
        LcdOp::Write(heapless::Vec::from_slice(text).unwrap())
    }
}

pub struct RecordingLcd {
    pub ops: heapless::Vec<LcdOp, 32>,
    pub screen: [Line; ROWS],
    row: usize,
    col: usize,
}

impl RecordingLcd {
    pub fn new() -> Self {
        Self {
            ops: heapless::Vec::new(),
            screen: [[0; COLS]; ROWS],
            row: 0,
            col: 0,
        }
    }
}

impl CharLcd for RecordingLcd {
    fn set_cursor(&mut self, row: u8, col: u8) {
        self.row = row.into();
        self.col = col.into();
        self.ops.push(LcdOp::Cursor(row, col)).unwrap();
    }

    fn write(&mut self, text: &[u8]) {
        for &c in text {
            self.screen[self.row][self.col] = c;
            self.col += 1;
        }
        self.ops.push(LcdOp::write(text)).unwrap();
    }
}

/// The complete kernel driven with a simulated 1 ms tick and 50 Hz mains.
pub struct Bench {
    pub shared: SharedState,
    pub tick: TickService,
    pub sys: System<NvmStore<RamNvm>>,
    pub out: RecordingOutputs,
    pub display: RecordingDisplay,
    pub inputs: TickInputs,
    /// Mains present. A crossing every 10 ms.
    pub ac: bool,
    pub sense: Option<fn(u32) -> u8>,
    pub ms: u32,
}

impl Bench {
    /// Power on with `settings` in the NVM.
    pub fn new(settings: Settings) -> Self {
        let mut store = NvmStore::new(RamNvm::erased());
        store.save(&settings).unwrap();
        let shared = SharedState::new();
        let sys = System::new(store, &shared);
        let mut b = Self {
            shared,
            tick: TickService::new(),
            sys,
            out: RecordingOutputs::default(),
            display: RecordingDisplay::new(),
            inputs: TickInputs::default(),
            ac: true,
            sense: None,
            ms: 0,
        };
        b.sys.init(&mut b.out);
        b.step();
        b
    }

    /// Power on and wait for the splash screen to go away.
    pub fn idle(settings: Settings) -> Self {
        let mut b = Self::new(settings);
        b.run_ms(u32::from(SPLASH_HOLD_MS) + 10);
        b
    }

    /// One tick followed by one main loop pass.
    pub fn step(&mut self) {
        self.ms += 1;
        if self.ac && self.ms % 10 == 0 {
            self.shared.on_zero_crossing();
        }
        self.tick.run(&self.shared, self.inputs);
        self.out.now = self.ms;
        let sense = self.sense.map(|f| f(self.ms));
        self.sys
            .run(&self.shared, &mut self.out, &mut self.display, sense);
    }

    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step();
        }
    }

    fn press(&mut self, set: fn(&mut TickInputs, bool)) {
        set(&mut self.inputs, true);
        self.run_ms(120);
        set(&mut self.inputs, false);
        self.run_ms(5);
    }

    pub fn menu(&mut self) {
        self.press(|i, v| i.menu_button = v);
    }

    pub fn trigger(&mut self) {
        self.press(|i, v| i.trigger_button = v);
    }

    /// One encoder detent.
    pub fn rotate(&mut self, dir: i8) {
        if dir > 0 {
            self.inputs.enc_a = true;
        } else {
            self.inputs.enc_b = true;
        }
        self.run_ms(2);
        self.inputs.enc_a = false;
        self.inputs.enc_b = false;
        self.run_ms(2);
    }
}

// vim: ts=4 sw=4 expandtab
