// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State shared between the interrupt handlers and the main loop.
//!
//! The timers are 16 bit wide. The AVR can't access them atomically.
//! Therefore, every access from the main loop goes through a critical section.
//! The interrupt side is only reachable via [crate::tick::TickService]
//! and [SharedState::on_zero_crossing].

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Timer {
    /// Weld pulse length. Milliseconds.
    /// Doubles as the zero crossing absence watchdog while waiting for a crossing.
    Pulse,
    /// Rest between two pulses. Milliseconds.
    /// Doubles as the splash screen hold time.
    Rest,
    /// Menu inactivity timeout. Seconds.
    Inactivity,
    /// Buzzer on-time. Milliseconds.
    Buzzer,
}

/// Events latched by the interrupt handlers since the previous drain.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Events {
    pub zero_crossing: bool,
    pub encoder_delta: i8,
    pub menu_pressed: bool,
    pub trigger_pressed: bool,
}

impl Events {
    /// Any operator input.
    pub fn any_input(&self) -> bool {
        self.encoder_delta != 0 || self.menu_pressed || self.trigger_pressed
    }
}

/// Timer values at the time of the drain. Zero means elapsed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Timers {
    pub pulse: u16,
    pub rest: u16,
    pub inactivity: u16,
    pub buzzer: u16,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Snapshot {
    pub events: Events,
    pub timers: Timers,
}

pub struct SharedState {
    pulse_timer: Mutex<Cell<u16>>,
    rest_timer: Mutex<Cell<u16>>,
    inactivity_timer: Mutex<Cell<u16>>,
    buzzer_timer: Mutex<Cell<u16>>,
    zero_crossing: Mutex<Cell<bool>>,
    encoder_delta: Mutex<Cell<i8>>,
    menu_pressed: Mutex<Cell<bool>>,
    trigger_pressed: Mutex<Cell<bool>>,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            pulse_timer: Mutex::new(Cell::new(0)),
            rest_timer: Mutex::new(Cell::new(0)),
            inactivity_timer: Mutex::new(Cell::new(0)),
            buzzer_timer: Mutex::new(Cell::new(0)),
            zero_crossing: Mutex::new(Cell::new(false)),
            encoder_delta: Mutex::new(Cell::new(0)),
            menu_pressed: Mutex::new(Cell::new(false)),
            trigger_pressed: Mutex::new(Cell::new(false)),
        }
    }

    fn timer<'cs>(&'cs self, cs: CriticalSection<'cs>, timer: Timer) -> &'cs Cell<u16> {
        match timer {
            Timer::Pulse => self.pulse_timer.borrow(cs),
            Timer::Rest => self.rest_timer.borrow(cs),
            Timer::Inactivity => self.inactivity_timer.borrow(cs),
            Timer::Buzzer => self.buzzer_timer.borrow(cs),
        }
    }

    /// Zero crossing interrupt entry point.
    ///
    /// Crossings are not counted. A crossing that is not consumed
    /// before the next one arrives is merged into it.
    pub fn on_zero_crossing(&self) {
        critical_section::with(|cs| self.zero_crossing.borrow(cs).set(true));
    }

    /// Advance the timers by one tick.
    /// The inactivity timer only advances, if a full second has elapsed.
    pub(crate) fn tick_timers(&self, cs: CriticalSection<'_>, second_elapsed: bool) {
        for timer in [Timer::Pulse, Timer::Rest, Timer::Buzzer] {
            let t = self.timer(cs, timer);
            t.set(t.get().saturating_sub(1));
        }
        if second_elapsed {
            let t = self.inactivity_timer.borrow(cs);
            t.set(t.get().saturating_sub(1));
        }
    }

    pub(crate) fn add_encoder_delta(&self, cs: CriticalSection<'_>, step: i8) {
        let delta = self.encoder_delta.borrow(cs);
        delta.set(delta.get().saturating_add(step));
    }

    pub(crate) fn latch_menu_pressed(&self, cs: CriticalSection<'_>) {
        self.menu_pressed.borrow(cs).set(true);
    }

    pub(crate) fn latch_trigger_pressed(&self, cs: CriticalSection<'_>) {
        self.trigger_pressed.borrow(cs).set(true);
    }

    /// Read and clear all events and read all timers in one critical section.
    pub fn drain(&self) -> Snapshot {
        critical_section::with(|cs| Snapshot {
            events: Events {
                zero_crossing: self.zero_crossing.borrow(cs).replace(false),
                encoder_delta: self.encoder_delta.borrow(cs).replace(0),
                menu_pressed: self.menu_pressed.borrow(cs).replace(false),
                trigger_pressed: self.trigger_pressed.borrow(cs).replace(false),
            },
            timers: Timers {
                pulse: self.pulse_timer.borrow(cs).get(),
                rest: self.rest_timer.borrow(cs).get(),
                inactivity: self.inactivity_timer.borrow(cs).get(),
                buzzer: self.buzzer_timer.borrow(cs).get(),
            },
        })
    }

    /// (Re)load a timer.
    pub fn arm(&self, timer: Timer, value: u16) {
        critical_section::with(|cs| self.timer(cs, timer).set(value));
    }

    /// Drop a crossing that has been latched while the main loop was busy.
    pub fn discard_zero_crossing(&self) {
        critical_section::with(|cs| self.zero_crossing.borrow(cs).set(false));
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}


// vim: ts=4 sw=4 expandtab
