// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Automatic weld trigger from the analog sense channel.
//!
//! The sense amplitude drops, when the electrodes close on the work piece.
//! The open-circuit amplitude is learnt from the first window after power-on.

/// Number of samples per evaluation window.
///
/// One conversion takes 104 us, so a window spans at least 104 ms.
/// The peak-to-peak span is only phase independent over whole mains periods.
pub const WINDOW: u16 = 1000;
/// Learnt threshold is the open-circuit span plus this margin.
pub const MARGIN: u16 = 30;
/// Spans up to this are noise with no AC on the sense input.
pub const MIN_SPAN: u16 = 2;
/// Number of consecutive qualifying windows before triggering.
pub const CONFIRM: u8 = 2;

pub struct AutoTrigger {
    count: u16,
    min: u8,
    max: u8,
    last_span: u16,
    threshold: u16,
    confirmed: u8,
    locked: bool,
}

impl AutoTrigger {
    pub const fn new() -> Self {
        Self {
            count: 0,
            min: u8::MAX,
            max: 0,
            last_span: 0,
            threshold: 0,
            confirmed: 0,
            locked: false,
        }
    }

    /// Drop the partially collected window.
    /// The lock survives, so an electrode pair that is still closed
    /// after a weld does not trigger again.
    pub fn restart_window(&mut self) {
        self.count = 0;
        self.min = u8::MAX;
        self.max = 0;
        self.confirmed = 0;
    }

    /// Feed one sample. Returns true, if a weld shall be triggered.
    pub fn feed(&mut self, sample: u8) -> bool {
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
        self.count += 1;
        if self.count < WINDOW {
            return false;
        }
        let span = u16::from(self.max - self.min);
        self.count = 0;
        self.min = u8::MAX;
        self.max = 0;
        self.last_span = span;
        self.evaluate(span)
    }

    fn evaluate(&mut self, span: u16) -> bool {
        if self.threshold == 0 {
            if span > 0 {
                self.threshold = span + MARGIN;
            }
            return false;
        }
        if span <= MIN_SPAN || span >= self.threshold {
            self.confirmed = 0;
            self.locked = false;
            return false;
        }
        if self.locked {
            return false;
        }
        self.confirmed += 1;
        if self.confirmed >= CONFIRM {
            self.confirmed = 0;
            self.locked = true;
            return true;
        }
        false
    }

    pub fn last_span(&self) -> u16 {
        self.last_span
    }

    /// Zero while not learnt yet.
    pub fn threshold(&self) -> u16 {
        self.threshold
    }
}

impl Default for AutoTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed one window of a triangle with the given span.
    fn window(trig: &mut AutoTrigger, span: u8) -> bool {
        let mut fired = false;
        for i in 0..WINDOW {
            let sample = if i % 2 == 0 { 100 } else { 100 + span };
            fired |= trig.feed(sample);
        }
        fired
    }

    /// Sample a 50 Hz sine at 9.6 kHz.
    fn sine(n: u32, amplitude: f32, phase: f32) -> u8 {
        let t = n as f32 / 9600.0;
        let angle = 2.0 * core::f32::consts::PI * 50.0 * t + phase;
        (128.0 + amplitude * angle.sin()).round() as u8
    }

    #[test]
    fn test_open_electrodes_sine() {
        for phase in [0.0, 0.4, 1.0, 1.6, 2.5, 3.1, 4.7] {
            let mut trig = AutoTrigger::new();
            // 10 seconds.
            for n in 0..96_000 {
                assert!(!trig.feed(sine(n, 40.0, phase)));
            }
            assert!((79..=81).contains(&trig.last_span()));
            assert_eq!(trig.threshold(), trig.last_span() + MARGIN);
        }
    }

    #[test]
    fn test_closed_electrodes_sine() {
        let mut trig = AutoTrigger::new();
        let mut n = 0;
        for _ in 0..WINDOW {
            trig.feed(sine(n, 40.0, 0.7));
            n += 1;
        }
        assert!(trig.threshold() >= 100);
        let mut fired = 0;
        for _ in 0..(WINDOW * 2) {
            if trig.feed(sine(n, 5.0, 0.7)) {
                fired += 1;
            }
            n += 1;
        }
        assert_eq!(fired, 1);
        assert_eq!(trig.last_span(), 10);
    }

    #[test]
    fn test_learn() {
        let mut trig = AutoTrigger::new();
        assert!(!window(&mut trig, 0));
        assert_eq!(trig.threshold(), 0);
        assert!(!window(&mut trig, 40));
        assert_eq!(trig.threshold(), 70);
        assert_eq!(trig.last_span(), 40);
        for _ in 0..10 {
            assert!(!window(&mut trig, 40));
        }
    }

    #[test]
    fn test_trigger_and_lock() {
        let mut trig = AutoTrigger::new();
        window(&mut trig, 40);
        assert!(!window(&mut trig, 10));
        assert!(window(&mut trig, 10));
        for _ in 0..10 {
            assert!(!window(&mut trig, 10));
        }
        // Electrodes opened.
        assert!(!window(&mut trig, 40));
        assert!(!window(&mut trig, 10));
        assert!(window(&mut trig, 10));
    }

    #[test]
    fn test_noise_floor() {
        let mut trig = AutoTrigger::new();
        window(&mut trig, 40);
        for _ in 0..10 {
            assert!(!window(&mut trig, MIN_SPAN as u8));
        }
    }

    #[test]
    fn test_restart_window() {
        let mut trig = AutoTrigger::new();
        window(&mut trig, 40);
        assert!(!window(&mut trig, 10));
        trig.restart_window();
        assert!(!window(&mut trig, 10));
        assert!(window(&mut trig, 10));
        trig.restart_window();
        assert!(!window(&mut trig, 10));
        assert!(!window(&mut trig, 10));
    }
}

// vim: ts=4 sw=4 expandtab
