// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

/// Momentary switch debouncer.
///
/// Counts the ticks the switch is held. The press is reported once, when the
/// count reaches `THRESHOLD`. Releasing the switch restarts the count.
/// `THRESHOLD` must be bigger than zero.
pub struct Debounce<const THRESHOLD: u8> {
    held: Mutex<Cell<u8>>,
}

impl<const THRESHOLD: u8> Debounce<THRESHOLD> {
    pub const fn new() -> Self {
        Self {
            held: Mutex::new(Cell::new(0)),
        }
    }

    /// Feed one sample. Returns true, if this sample completes a press.
    pub fn sample(&self, cs: CriticalSection<'_>, pressed: bool) -> bool {
        let held = self.held.borrow(cs);
        if !pressed {
            held.set(0);
            return false;
        }
        let count = held.get();
        if count >= THRESHOLD {
            return false;
        }
        let count = count + 1;
        held.set(count);
        count == THRESHOLD
    }

    pub fn count(&self, cs: CriticalSection<'_>) -> u8 {
        self.held.borrow(cs).get()
    }
}

impl<const THRESHOLD: u8> Default for Debounce<THRESHOLD> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<const T: u8>(deb: &Debounce<T>, pattern: &[(bool, u16)]) -> u16 {
        let mut latched = 0;
        critical_section::with(|cs| {
            for &(level, ticks) in pattern {
                for _ in 0..ticks {
                    if deb.sample(cs, level) {
                        latched += 1;
                    }
                }
            }
        });
        latched
    }

    #[test]
    fn test_short_presses_never_latch() {
        let deb = Debounce::<100>::new();
        for len in 1..100 {
            let latched = feed(&deb, &[(true, len), (false, 1), (true, 99 - len), (false, 3)]);
            assert_eq!(latched, 0, "press of {len} ticks latched");
        }
        // Contact bounce: many short closures summing up to more than the threshold.
        let bounce = [(true, 30), (false, 1)];
        let mut latched = 0;
        for _ in 0..20 {
            latched += feed(&deb, &bounce);
        }
        assert_eq!(latched, 0);
    }

    #[test]
    fn test_one_latch_per_press() {
        let deb = Debounce::<100>::new();
        assert_eq!(feed(&deb, &[(true, 100)]), 1);
        assert_eq!(feed(&deb, &[(true, 5000)]), 0);
        assert_eq!(feed(&deb, &[(false, 1), (true, 250), (false, 10)]), 1);
        critical_section::with(|cs| assert_eq!(deb.count(cs), 0));
    }

    #[test]
    fn test_latch_at_threshold() {
        let deb = Debounce::<3>::new();
        critical_section::with(|cs| {
            assert!(!deb.sample(cs, true));
            assert!(!deb.sample(cs, true));
            assert!(deb.sample(cs, true));
            assert_eq!(deb.count(cs), 3);
            assert!(!deb.sample(cs, true));
        });
    }
}

// vim: ts=4 sw=4 expandtab
