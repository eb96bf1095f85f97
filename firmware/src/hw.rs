// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use atmega::{self as mcu, Peripherals};
pub use avr_device::atmega16 as atmega;
pub use avr_device::interrupt;

use avr_context::IrqCtx;

pub const F_CPU: u32 = 16_000_000;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(atmega16)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let c = unsafe { IrqCtx::new() };
            $handler(&c);
        }
    };
}

define_isr!(INT0, crate::exint::irq_handler_int0);
define_isr!(TIMER1_COMPA, crate::timer::irq_handler_timer1_compa);
define_isr!(ADC, crate::analog::irq_handler_adc);
#[cfg(feature = "debug")]
define_isr!(USART_TXC, crate::usart::irq_handler_usart_txc);

/// Busy wait.
#[inline(always)]
pub fn delay_us(us: u32) {
    avr_device::asm::delay_cycles(us * (F_CPU / 1_000_000));
}

// vim: ts=4 sw=4 expandtab
