// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weld pulse sequencer.

use crate::{
    settings::SettingsStore,
    shared::{Events, SharedState, Timer, Timers},
    state::State,
    system::{AC_MISSING_MS, Outputs, System},
};

impl<S: SettingsStore> System<S> {
    pub(crate) fn run_sequencer(
        &mut self,
        shared: &SharedState,
        out: &mut impl Outputs,
        events: &Events,
        timers: &Timers,
    ) {
        match self.state {
            State::WeldStart => {
                self.ac_missing = false;
                if self.settings.pulse_count > 0 {
                    self.ctx.pulses_remaining = self.settings.pulse_count;
                    self.wait_zero_cross(shared);
                } else {
                    self.transition(State::Idle);
                }
            }
            State::WeldWaitZeroCross => {
                if events.zero_crossing {
                    self.ac_missing = false;
                    // The guard must be released before the triac fires.
                    out.set_sense_guard(false);
                    out.set_triac(true);
                    shared.arm(Timer::Pulse, self.settings.pulse_duration);
                    self.transition(State::WeldPulseActive);
                } else if timers.pulse == 0 && !self.ac_missing {
                    // Keep waiting. Firing without a crossing is never done.
                    self.ac_missing = true;
                    self.ctx.display_dirty = true;
                }
            }
            State::WeldPulseActive => {
                if timers.pulse == 0 {
                    out.set_triac(false);
                    out.set_sense_guard(true);
                    self.ctx.pulses_remaining = self.ctx.pulses_remaining.saturating_sub(1);
                    if self.ctx.pulses_remaining > 0 {
                        shared.arm(Timer::Rest, self.settings.rest_duration);
                        self.transition(State::WeldRest);
                    } else {
                        self.transition(State::Idle);
                    }
                }
            }
            State::WeldRest => {
                if timers.rest == 0 {
                    self.wait_zero_cross(shared);
                }
            }
            _ => (),
        }
    }

    fn wait_zero_cross(&mut self, shared: &SharedState) {
        // Only a crossing after this point counts.
        shared.discard_zero_crossing();
        shared.arm(Timer::Pulse, AC_MISSING_MS);
        self.transition(State::WeldWaitZeroCross);
    }
}


// vim: ts=4 sw=4 expandtab
