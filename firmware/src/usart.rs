// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    debug,
    hw::{mcu, F_CPU},
};
use avr_context::{InitCtx, InitCtxCell, IrqCtx};
use avr_device::interrupt::CriticalSection;

const BAUD: u32 = 19_200;
const UBRR: u16 = (F_CPU / (16 * BAUD) - 1) as u16;

const UCSRA_UDRE: u8 = 1 << 5;
const UCSRB_TXCIE: u8 = 1 << 6;
const UCSRB_TXEN: u8 = 1 << 3;
/// URSEL, 8 data bits, 1 stop bit, no parity.
const UCSRC_8N1: u8 = (1 << 7) | (1 << 2) | (1 << 1);

#[allow(non_snake_case)]
pub struct Dp {
    pub USART: mcu::USART,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

impl Dp {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.USART.ubrrh().write(|w| w.bits((UBRR >> 8) as u8));
            self.USART.ubrrl().write(|w| w.bits(UBRR as u8));
            self.USART.ucsrc().write(|w| w.bits(UCSRC_8N1));
            self.USART.ucsrb().write(|w| w.bits(UCSRB_TXEN | UCSRB_TXCIE));
        }
    }
}

pub fn irq_handler_usart_txc(c: &IrqCtx) {
    debug::tx_complete_callback(c);
}

/// Start transmission of one byte.
/// Returns false, if the transmitter is busy.
pub fn uart_tx_cs(_cs: CriticalSection<'_>, data: u8) -> bool {
    if DP.USART.ucsra().read().bits() & UCSRA_UDRE == 0 {
        return false; // busy
    }
    // SAFETY: All data values are valid.
    unsafe { DP.USART.udr().write(|w| w.bits(data)) };
    true
}

// vim: ts=4 sw=4 expandtab
