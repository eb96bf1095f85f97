// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ports::{PC_BUZZER, PC_SENSE_GUARD, PC_TRIAC, PORTC};
use avr_context::InitCtx;
use weld_kernel::system::Outputs;

/// Triac gate, sense guard and buzzer on port C.
///
/// Port C outputs are only written from the main loop.
pub struct PowerOutputs(());

impl PowerOutputs {
    pub fn new(_: &InitCtx) -> Self {
        Self(())
    }
}

impl Outputs for PowerOutputs {
    fn set_sense_guard(&mut self, asserted: bool) {
        PORTC.set(PC_SENSE_GUARD, asserted);
    }

    fn set_triac(&mut self, on: bool) {
        PORTC.set(PC_TRIAC, on);
    }

    fn set_buzzer(&mut self, on: bool) {
        PORTC.set(PC_BUZZER, on);
    }
}

// vim: ts=4 sw=4 expandtab
