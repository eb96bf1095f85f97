// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! INT0: Mains zero crossing detector.

use crate::{
    hw::mcu,
    SHARED,
};
use avr_context::{InitCtx, InitCtxCell, IrqCtx};

/// Rising edge on INT0.
const MCUCR_ISC0_RISING: u8 = 0x3;
const MCUCR_ISC0_MASK: u8 = 0x3;
const GICR_INT0: u8 = 1 << 6;
const GIFR_INTF0: u8 = 1 << 6;

#[allow(non_snake_case)]
pub struct ExInt {
    pub EXINT: mcu::EXINT,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static EXINT: InitCtxCell<ExInt> = unsafe { InitCtxCell::uninit() };

impl ExInt {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.EXINT
                .mcucr()
                .modify(|r, w| w.bits((r.bits() & !MCUCR_ISC0_MASK) | MCUCR_ISC0_RISING));
            self.EXINT.gifr().write(|w| w.bits(GIFR_INTF0));
            self.EXINT.gicr().modify(|r, w| w.bits(r.bits() | GICR_INT0));
        }
    }
}

pub fn irq_handler_int0(_c: &IrqCtx) {
    SHARED.on_zero_crossing();
}

// vim: ts=4 sw=4 expandtab
