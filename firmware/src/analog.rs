// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weld current sense on ADC0.
//!
//! One conversion is running at a time. Taking a result starts the next one.

use crate::{
    hw::mcu,
};
use avr_context::{InitCtx, InitCtxCell, IrqCtx, MainCtx};
use avr_atomic::AvrAtomic;

/// AVCC reference, left adjusted result, channel 0.
const ADMUX_SENSE: u8 = (1 << 6) | (1 << 5);
const ADCSRA_ADEN: u8 = 1 << 7;
const ADCSRA_ADSC: u8 = 1 << 6;
const ADCSRA_ADIF: u8 = 1 << 4;
const ADCSRA_ADIE: u8 = 1 << 3;
/// 16 MHz / 128 = 125 kHz ADC clock.
const ADCSRA_PS_128: u8 = 0x7;

static SAMPLE: AvrAtomic<u8> = AvrAtomic::new();
static SAMPLE_NEW: AvrAtomic<bool> = AvrAtomic::new();

#[allow(non_snake_case)]
pub struct Adc {
    pub ADC: mcu::ADC,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static ADC: InitCtxCell<Adc> = unsafe { InitCtxCell::uninit() };

impl Adc {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.ADC.admux().write(|w| w.bits(ADMUX_SENSE));
            self.ADC.adcsra().write(|w| {
                w.bits(ADCSRA_ADEN | ADCSRA_ADSC | ADCSRA_ADIF | ADCSRA_ADIE | ADCSRA_PS_128)
            });
        }
    }

    /// Get a new sense sample, if one has been converted since the last call.
    pub fn take(&self, _m: &MainCtx<'_>) -> Option<u8> {
        if !SAMPLE_NEW.load() {
            return None;
        }
        let sample = SAMPLE.load();
        SAMPLE_NEW.store(false);
        // SAFETY: Starting a conversion is a valid register setting.
        //         ADIF is not touched by the modify, so no pending interrupt is lost.
        unsafe {
            self.ADC
                .adcsra()
                .modify(|r, w| w.bits((r.bits() & !ADCSRA_ADIF) | ADCSRA_ADSC));
        }
        Some(sample)
    }
}

pub fn irq_handler_adc(_c: &IrqCtx) {
    // Left adjusted. The upper 8 bits are enough.
    SAMPLE.store(ADC.ADC.adch().read().bits());
    SAMPLE_NEW.store(true);
}

// vim: ts=4 sw=4 expandtab
