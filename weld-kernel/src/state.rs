// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::settings::{FIELD_COUNT, FieldId};

/// The controller state. Exactly one is active.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum State {
    Splash,
    Idle,
    WeldStart,
    WeldWaitZeroCross,
    WeldPulseActive,
    WeldRest,
    MenuEnter,
    MenuEditField(FieldId),
}

impl State {
    pub fn is_weld(self) -> bool {
        matches!(
            self,
            State::WeldStart | State::WeldWaitZeroCross | State::WeldPulseActive | State::WeldRest
        )
    }

    pub fn is_menu(self) -> bool {
        matches!(self, State::MenuEnter | State::MenuEditField(_))
    }

    /// Numeric code for the debug channel.
    pub fn code(self) -> u8 {
        match self {
            State::Splash => 0,
            State::Idle => 1,
            State::WeldStart => 2,
            State::WeldWaitZeroCross => 3,
            State::WeldPulseActive => 4,
            State::WeldRest => 5,
            State::MenuEnter => 6,
            State::MenuEditField(id) => 7 + id.index(),
        }
    }
}

/// Transient main loop context.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RuntimeContext {
    /// Only valid in the weld states.
    pub pulses_remaining: u8,
    /// Menu cursor. Index into [FieldId::ALL].
    pub menu_selection: u8,
    /// Working copy of the edited field.
    pub menu_draft_value: u16,
    pub display_dirty: bool,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self {
            pulses_remaining: 0,
            menu_selection: FIELD_COUNT as u8 - 1,
            menu_draft_value: 0,
            display_dirty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_classes() {
        assert!(State::WeldRest.is_weld());
        assert!(!State::WeldRest.is_menu());
        assert!(State::MenuEditField(FieldId::AutoMode).is_menu());
        assert!(!State::Idle.is_menu());
        assert!(!State::Idle.is_weld());
        assert!(!State::Splash.is_weld());
        assert_eq!(State::MenuEditField(FieldId::AutoMode).code(), 10);
    }
}

// vim: ts=4 sw=4 expandtab
