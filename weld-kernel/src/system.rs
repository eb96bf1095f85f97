// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The main loop step.

use crate::{
    autotrig::AutoTrigger,
    display::{Display, Line},
    screen::{self, Notice},
    settings::{FIELD_COUNT, Settings, SettingsStore},
    shared::{Events, SharedState, Snapshot, Timer},
    state::{RuntimeContext, State},
};

/// Menu inactivity timeout. Seconds.
pub const INACTIVITY_TIMEOUT_S: u16 = 30;
/// How long the splash screen is shown. Milliseconds.
pub const SPLASH_HOLD_MS: u16 = 2000;
/// Time without zero crossing before "NO AC" is shown. Milliseconds.
pub const AC_MISSING_MS: u16 = 100;
pub const BEEP_SHORT_MS: u16 = 50;
pub const BEEP_LONG_MS: u16 = 500;

/// Output lines.
pub trait Outputs {
    /// Protect the sense input from the weld current.
    fn set_sense_guard(&mut self, asserted: bool);
    fn set_triac(&mut self, on: bool);
    fn set_buzzer(&mut self, on: bool);
}

pub struct System<S> {
    pub(crate) state: State,
    pub(crate) settings: Settings,
    pub(crate) ctx: RuntimeContext,
    pub(crate) store: S,
    auto: AutoTrigger,
    pub(crate) notice: Option<Notice>,
    pub(crate) ac_missing: bool,
    buzzer_on: bool,
    pub(crate) store_errors: u16,
}

impl<S: SettingsStore> System<S> {
    pub fn new(mut store: S, shared: &SharedState) -> Self {
        let settings = store.load();
        shared.arm(Timer::Rest, SPLASH_HOLD_MS);
        Self {
            state: State::Splash,
            settings,
            ctx: RuntimeContext::default(),
            store,
            auto: AutoTrigger::new(),
            notice: None,
            ac_missing: false,
            buzzer_on: false,
            store_errors: 0,
        }
    }

    /// Put the outputs into the safe state.
    pub fn init(&mut self, out: &mut impl Outputs) {
        out.set_triac(false);
        out.set_sense_guard(true);
        out.set_buzzer(false);
    }

    /// One main loop pass.
    ///
    /// `sense` is a new sample of the analog sense channel, if one is available.
    pub fn run(
        &mut self,
        shared: &SharedState,
        out: &mut impl Outputs,
        display: &mut impl Display,
        sense: Option<u8>,
    ) {
        let Snapshot { events, timers } = shared.drain();

        if self.buzzer_on && timers.buzzer == 0 {
            out.set_buzzer(false);
            self.buzzer_on = false;
        }

        let auto_fire = if self.state == State::Idle && self.settings.auto_mode {
            sense.is_some_and(|sample| self.auto.feed(sample))
        } else {
            self.auto.restart_window();
            false
        };

        if self.state.is_menu() {
            if events.any_input() {
                shared.arm(Timer::Inactivity, INACTIVITY_TIMEOUT_S);
            } else if timers.inactivity == 0 {
                // Timeout. The draft is dropped.
                self.transition(State::Idle);
            }
        }

        match self.state {
            State::Splash => {
                if timers.rest == 0 {
                    self.transition(State::Idle);
                }
            }
            State::Idle => self.run_idle(shared, out, &events, auto_fire),
            State::WeldStart
            | State::WeldWaitZeroCross
            | State::WeldPulseActive
            | State::WeldRest => self.run_sequencer(shared, out, &events, &timers),
            State::MenuEnter | State::MenuEditField(_) => self.run_menu(shared, out, &events),
        }

        if self.ctx.display_dirty && !self.render_deferred() {
            self.ctx.display_dirty = false;
            let (line0, line1) = self.screen();
            display.render(&line0, &line1);
            if self.state == State::WeldWaitZeroCross {
                // Rendering is slow. Wait for a fresh crossing.
                shared.discard_zero_crossing();
            }
        }
    }

    fn run_idle(
        &mut self,
        shared: &SharedState,
        out: &mut impl Outputs,
        events: &Events,
        auto_fire: bool,
    ) {
        if events.any_input() && self.notice.take().is_some() {
            self.ctx.display_dirty = true;
        }

        if events.menu_pressed {
            self.ctx.menu_selection = 0;
            self.enter_menu(shared);
        } else if events.trigger_pressed || auto_fire {
            self.beep(shared, out, BEEP_SHORT_MS);
            self.transition(State::WeldStart);
        } else if events.encoder_delta != 0 {
            let step = if events.encoder_delta > 0 {
                1
            } else {
                FIELD_COUNT as u8 - 1
            };
            self.ctx.menu_selection = (self.ctx.menu_selection + step) % FIELD_COUNT as u8;
            self.enter_menu(shared);
        }
    }

    fn enter_menu(&mut self, shared: &SharedState) {
        shared.arm(Timer::Inactivity, INACTIVITY_TIMEOUT_S);
        self.transition(State::MenuEnter);
    }

    pub(crate) fn transition(&mut self, state: State) {
        self.state = state;
        self.ctx.display_dirty = true;
    }

    pub(crate) fn beep(&mut self, shared: &SharedState, out: &mut impl Outputs, ms: u16) {
        out.set_buzzer(true);
        shared.arm(Timer::Buzzer, ms);
        self.buzzer_on = true;
    }

    /// The display bus is too slow for the pulse timing.
    fn render_deferred(&self) -> bool {
        match self.state {
            State::WeldPulseActive | State::WeldRest => true,
            State::WeldWaitZeroCross => !self.ac_missing,
            _ => false,
        }
    }

    fn screen(&self) -> (Line, Line) {
        match self.state {
            State::Splash => screen::splash(),
            State::MenuEditField(id) => screen::edit(id.desc(), self.ctx.menu_draft_value),
            _ => screen::status(&self.settings, self.state, self.ac_missing, self.notice),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ctx(&self) -> &RuntimeContext {
        &self.ctx
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn ac_missing(&self) -> bool {
        self.ac_missing
    }

    pub fn auto_trigger(&self) -> &AutoTrigger {
        &self.auto
    }

    /// Number of failed settings saves since power-on.
    pub fn store_errors(&self) -> u16 {
        self.store_errors
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}


// vim: ts=4 sw=4 expandtab
