// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settings menu.
//!
//! All fields share the same edit state. The field behavior comes from
//! the descriptor table in [crate::settings::FIELDS].

use crate::{
    screen::Notice,
    settings::{FieldId, SettingsStore},
    shared::{Events, SharedState, Timer},
    state::State,
    system::{BEEP_LONG_MS, BEEP_SHORT_MS, INACTIVITY_TIMEOUT_S, Outputs, System},
};

impl<S: SettingsStore> System<S> {
    pub(crate) fn run_menu(&mut self, shared: &SharedState, out: &mut impl Outputs, events: &Events) {
        match self.state {
            State::MenuEnter => {
                let id = FieldId::from_index(self.ctx.menu_selection);
                self.ctx.menu_draft_value = self.settings.get(id);
                shared.arm(Timer::Inactivity, INACTIVITY_TIMEOUT_S);
                self.transition(State::MenuEditField(id));
            }
            State::MenuEditField(id) => {
                if events.encoder_delta != 0 {
                    let draft = id.desc().adjust(self.ctx.menu_draft_value, events.encoder_delta);
                    if draft != self.ctx.menu_draft_value {
                        self.ctx.menu_draft_value = draft;
                        self.ctx.display_dirty = true;
                    }
                }
                if events.menu_pressed {
                    self.commit(shared, out, id);
                } else if events.trigger_pressed {
                    // Cancel.
                    self.transition(State::Idle);
                }
            }
            _ => (),
        }
    }

    fn commit(&mut self, shared: &SharedState, out: &mut impl Outputs, id: FieldId) {
        let settings = self.settings.with(id, self.ctx.menu_draft_value);
        match self.store.save(&settings) {
            Ok(()) => {
                self.settings = settings;
                self.beep(shared, out, BEEP_SHORT_MS);
            }
            Err(_) => {
                self.store_errors = self.store_errors.saturating_add(1);
                self.notice = Some(Notice::SaveFailed);
                self.beep(shared, out, BEEP_LONG_MS);
                // Try to put back what is in RAM. Load repairs anything this can't fix.
                if self.store.save(&self.settings).is_err() {
                    self.store_errors = self.store_errors.saturating_add(1);
                }
            }
        }
        self.transition(State::Idle);
    }
}


// vim: ts=4 sw=4 expandtab
