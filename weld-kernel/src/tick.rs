// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The periodic 1 ms tick.

use crate::{debounce::Debounce, shared::SharedState};
use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

/// Tick period.
pub const TICK_MS: u16 = 1;
/// Ticks per inactivity timer step.
pub const TICKS_PER_SECOND: u16 = 1000 / TICK_MS;
/// A switch must be held this many ticks to count as pressed.
pub const DEBOUNCE_TICKS: u8 = (100 / TICK_MS) as u8;

const QUAD_A: u8 = 1 << 0;
const QUAD_B: u8 = 1 << 1;
const QUAD_REST: u8 = 0;

/// Line levels sampled by the tick interrupt.
/// The switch levels are already converted to "pressed" logic.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickInputs {
    pub enc_a: bool,
    pub enc_b: bool,
    pub menu_button: bool,
    pub trigger_button: bool,
}

/// Rotary encoder decoder.
///
/// One step is counted when the lines fall back into the rest code.
/// Coming from A-only is one clockwise step, coming from B-only is one
/// counter clockwise step. Every other transition is contact noise.
pub struct Quadrature {
    prev: Mutex<Cell<u8>>,
}

impl Quadrature {
    pub const fn new() -> Self {
        Self {
            prev: Mutex::new(Cell::new(QUAD_REST)),
        }
    }

    pub fn step(&self, cs: CriticalSection<'_>, a: bool, b: bool) -> i8 {
        let code = if a { QUAD_A } else { 0 } | if b { QUAD_B } else { 0 };
        let prev = self.prev.borrow(cs).replace(code);
        if code == prev || code != QUAD_REST {
            return 0;
        }
        match prev {
            QUAD_A => 1,
            QUAD_B => -1,
            _ => 0,
        }
    }
}

impl Default for Quadrature {
    fn default() -> Self {
        Self::new()
    }
}

/// State private to the tick interrupt.
pub struct TickService {
    prescaler: Mutex<Cell<u16>>,
    quadrature: Quadrature,
    menu_button: Debounce<DEBOUNCE_TICKS>,
    trigger_button: Debounce<DEBOUNCE_TICKS>,
}

impl TickService {
    pub const fn new() -> Self {
        Self {
            prescaler: Mutex::new(Cell::new(0)),
            quadrature: Quadrature::new(),
            menu_button: Debounce::new(),
            trigger_button: Debounce::new(),
        }
    }

    /// Tick interrupt body.
    ///
    /// Must not block. Touches nothing but the shared timers and events.
    pub fn run(&self, shared: &SharedState, inputs: TickInputs) {
        critical_section::with(|cs| {
            let prescaler = self.prescaler.borrow(cs);
            let ticks = prescaler.get() + 1;
            let second_elapsed = ticks >= TICKS_PER_SECOND;
            prescaler.set(if second_elapsed { 0 } else { ticks });

            shared.tick_timers(cs, second_elapsed);

            let step = self.quadrature.step(cs, inputs.enc_a, inputs.enc_b);
            if step != 0 {
                shared.add_encoder_delta(cs, step);
            }

            if self.menu_button.sample(cs, inputs.menu_button) {
                shared.latch_menu_pressed(cs);
            }
            if self.trigger_button.sample(cs, inputs.trigger_button) {
                shared.latch_trigger_pressed(cs);
            }
        });
    }
}

impl Default for TickService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Timer;

    fn quad(q: &Quadrature, seq: &[(bool, bool)]) -> i32 {
        critical_section::with(|cs| seq.iter().map(|&(a, b)| q.step(cs, a, b) as i32).sum())
    }

    #[test]
    fn test_quadrature_directions() {
        let q = Quadrature::new();
        assert_eq!(quad(&q, &[(true, false), (false, false)]), 1);
        assert_eq!(quad(&q, &[(false, true), (false, false)]), -1);
        assert_eq!(
            quad(
                &q,
                &[
                    (true, false),
                    (false, false),
                    (true, false),
                    (false, false),
                    (true, false),
                    (false, false),
                ]
            ),
            3
        );
    }

    #[test]
    fn test_quadrature_noise() {
        let q = Quadrature::new();
        // Repeated samples of the same code.
        assert_eq!(quad(&q, &[(false, false), (false, false)]), 0);
        // Both lines flipping at once.
        assert_eq!(quad(&q, &[(true, true), (false, false)]), 0);
        // Bouncing between A-only and both.
        assert_eq!(quad(&q, &[(true, false), (true, true), (true, false), (true, true)]), 0);
        // Leaving the rest code is never a step.
        assert_eq!(quad(&q, &[(false, false), (true, false)]), 0);
    }

    #[test]
    fn test_tick_encoder_and_buttons() {
        let shared = SharedState::new();
        let tick = TickService::new();

        tick.run(&shared, TickInputs { enc_a: true, ..Default::default() });
        tick.run(&shared, TickInputs::default());
        tick.run(&shared, TickInputs { enc_b: true, ..Default::default() });
        tick.run(&shared, TickInputs::default());
        tick.run(&shared, TickInputs { enc_b: true, ..Default::default() });
        tick.run(&shared, TickInputs::default());
        let ev = shared.drain().events;
        assert_eq!(ev.encoder_delta, -1);
        assert!(!ev.menu_pressed);

        let held = TickInputs { trigger_button: true, ..Default::default() };
        for _ in 0..DEBOUNCE_TICKS - 1 {
            tick.run(&shared, held);
        }
        assert!(!shared.drain().events.trigger_pressed);
        tick.run(&shared, held);
        let ev = shared.drain().events;
        assert!(ev.trigger_pressed);
        assert!(!ev.menu_pressed);
        for _ in 0..500 {
            tick.run(&shared, held);
        }
        assert!(!shared.drain().events.trigger_pressed);
    }

    #[test]
    fn test_tick_timers() {
        let shared = SharedState::new();
        let tick = TickService::new();
        shared.arm(Timer::Pulse, 50);
        shared.arm(Timer::Rest, 10);
        shared.arm(Timer::Inactivity, 3);
        for _ in 0..10 {
            tick.run(&shared, TickInputs::default());
        }
        let t = shared.drain().timers;
        assert_eq!(t.pulse, 40);
        assert_eq!(t.rest, 0);
        assert_eq!(t.inactivity, 3);

        for _ in 0..(TICKS_PER_SECOND - 10) {
            tick.run(&shared, TickInputs::default());
        }
        assert_eq!(shared.drain().timers.inactivity, 2);
        for _ in 0..(2 * TICKS_PER_SECOND) {
            tick.run(&shared, TickInputs::default());
        }
        assert_eq!(shared.drain().timers.inactivity, 0);
        for _ in 0..TICKS_PER_SECOND {
            tick.run(&shared, TickInputs::default());
        }
        assert_eq!(shared.drain().timers, Default::default());
    }
}

// vim: ts=4 sw=4 expandtab
