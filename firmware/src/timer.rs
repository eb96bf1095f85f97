// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer 1: The 1 ms system tick.

use crate::{
    hw::mcu,
    ports::{PB_ENC_A, PB_ENC_B, PB_ENC_SW, PB_MAN_SW, PORTB},
    SHARED, TICK,
};
use avr_context::{InitCtx, InitCtxCell, IrqCtx};
use weld_kernel::TickInputs;

/// 16 MHz / 64 / (249 + 1) = 1 kHz
const TC1_OCR: u16 = 249;

const TCCR1B_WGM12: u8 = 1 << 3;
const TCCR1B_CS_64: u8 = 0x3;
const TIMSK_OCIE1A: u8 = 1 << 4;

#[allow(non_snake_case)]
pub struct Dp {
    pub TC1: mcu::TC1,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

impl Dp {
    #[rustfmt::skip]
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        //         All values are valid register settings.
        unsafe {
            // CTC mode, TOP = OCR1A.
            self.TC1.tccr1a().write(|w| w.bits(0));
            self.TC1.tcnt1().write(|w| w.bits(0));
            self.TC1.ocr1a().write(|w| w.bits(TC1_OCR));
            self.TC1.timsk().modify(|r, w| w.bits(r.bits() | TIMSK_OCIE1A));
            self.TC1.tccr1b().write(|w| w.bits(TCCR1B_WGM12 | TCCR1B_CS_64));
        }
    }
}

fn sample_inputs() -> TickInputs {
    // All switches pull to ground.
    let pins = !PORTB.read();
    TickInputs {
        enc_a: pins & (1 << PB_ENC_A) != 0,
        enc_b: pins & (1 << PB_ENC_B) != 0,
        menu_button: pins & (1 << PB_ENC_SW) != 0,
        trigger_button: pins & (1 << PB_MAN_SW) != 0,
    }
}

pub fn irq_handler_timer1_compa(_c: &IrqCtx) {
    TICK.run(&SHARED, sample_inputs());
}

// vim: ts=4 sw=4 expandtab
