// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::mcu,
};
use avr_context::{InitCtx, InitCtxCell};

/// Encoder phase A, active low.
pub const PB_ENC_A: usize = 4;
/// Encoder phase B, active low.
pub const PB_ENC_B: usize = 5;
/// Encoder push switch (menu/confirm), active low.
pub const PB_ENC_SW: usize = 6;
/// Manual weld switch, active low.
pub const PB_MAN_SW: usize = 7;

// PC2..PC5 are the JTAG pins TCK, TMS, TDO and TDI.
// The buzzer on PC2 and the triac gate on PC5 only work with the JTAGEN fuse cleared.
// With JTAGEN programmed the JTAG interface takes over all four pins.

pub const PC_BUZZER: usize = 2;
pub const PC_TRIAC: usize = 5;
/// Sense input protection, high = protected.
pub const PC_SENSE_GUARD: usize = 6;

#[rustfmt::skip]
macro_rules! impl_port {
    (
        $struct:ident,
        $name:ident,
        $port:ident,
        $pin:ident
    ) => {
        #[allow(non_snake_case)]
        pub struct $struct {
            pub $name: mcu::$name,
        }

        // SAFETY: Is initialized when constructing the MainCtx.
        pub static $name: InitCtxCell<$struct> = unsafe { InitCtxCell::uninit() };

        impl $struct {
            /// Read all input levels.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn read(&self) -> u8 {
                self.$name.$pin().read().bits()
            }

            #[inline(always)]
            #[allow(dead_code)]
            pub fn get(&self, bit: usize) -> bool {
                self.read() & (1 << bit) != 0
            }

            /// Read-modify-write of the output register.
            /// Must only be used from one context per port.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn set(&self, bit: usize, value: bool) {
                // SAFETY: All bit patterns are valid for the port register.
                self.$name.$port().modify(|r, w| unsafe {
                    if value {
                        w.bits(r.bits() | (1 << bit))
                    } else {
                        w.bits(r.bits() & !(1 << bit))
                    }
                });
            }
        }
    };
}

impl_port!(PortA, PORTA, porta, pina);
impl_port!(PortB, PORTB, portb, pinb);
impl_port!(PortC, PORTC, portc, pinc);
impl_port!(PortD, PORTD, portd, pind);

fn pin_input(_bit: usize) -> u8 {
    0
}
fn pin_output(bit: usize) -> u8 {
    1 << bit
}
fn pin_low(_bit: usize) -> u8 {
    0
}
fn pin_high(bit: usize) -> u8 {
    1 << bit
}
fn pin_floating(_bit: usize) -> u8 {
    0
}
fn pin_pullup(bit: usize) -> u8 {
    1 << bit
}

impl PortA {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.PORTA.porta().write(|w| {
                w.bits(
                    pin_floating(0) | // sense, single ended ADC
                    pin_pullup(1) | // NC
                    pin_pullup(2) | // NC
                    pin_pullup(3) | // NC
                    pin_pullup(4) | // NC
                    pin_pullup(5) | // NC
                    pin_pullup(6) | // NC
                    pin_pullup(7), // NC
                )
            });
            self.PORTA.ddra().write(|w| {
                w.bits(
                    pin_input(0) | // sense, single ended ADC
                    pin_input(1) | // NC
                    pin_input(2) | // NC
                    pin_input(3) | // NC
                    pin_input(4) | // NC
                    pin_input(5) | // NC
                    pin_input(6) | // NC
                    pin_input(7), // NC
                )
            });
        }
    }
}

impl PortB {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.PORTB.portb().write(|w| {
                w.bits(
                    pin_pullup(0) | // NC
                    pin_pullup(1) | // NC
                    pin_pullup(2) | // NC
                    pin_pullup(3) | // NC
                    pin_pullup(PB_ENC_A) | // encoder A
                    pin_pullup(PB_ENC_B) | // encoder B + ISP MOSI
                    pin_pullup(PB_ENC_SW) | // encoder switch + ISP MISO
                    pin_pullup(PB_MAN_SW), // manual switch + ISP SCK
                )
            });
            self.PORTB.ddrb().write(|w| {
                w.bits(
                    pin_input(0) | // NC
                    pin_input(1) | // NC
                    pin_input(2) | // NC
                    pin_input(3) | // NC
                    pin_input(PB_ENC_A) | // encoder A
                    pin_input(PB_ENC_B) | // encoder B + ISP MOSI
                    pin_input(PB_ENC_SW) | // encoder switch + ISP MISO
                    pin_input(PB_MAN_SW), // manual switch + ISP SCK
                )
            });
        }
    }
}

impl PortC {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.PORTC.portc().write(|w| {
                w.bits(
                    pin_floating(0) | // TWI SCL, external pull-up
                    pin_floating(1) | // TWI SDA, external pull-up
                    pin_low(PC_BUZZER) | // buzzer + JTAG TCK
                    pin_pullup(3) | // JTAG TMS, NC
                    pin_pullup(4) | // JTAG TDO, NC
                    pin_low(PC_TRIAC) | // triac gate driver + JTAG TDI
                    pin_high(PC_SENSE_GUARD) | // sense guard, protected
                    pin_pullup(7), // NC
                )
            });
            self.PORTC.ddrc().write(|w| {
                w.bits(
                    pin_input(0) | // TWI SCL, external pull-up
                    pin_input(1) | // TWI SDA, external pull-up
                    pin_output(PC_BUZZER) | // buzzer + JTAG TCK
                    pin_input(3) | // JTAG TMS, NC
                    pin_input(4) | // JTAG TDO, NC
                    pin_output(PC_TRIAC) | // triac gate driver + JTAG TDI
                    pin_output(PC_SENSE_GUARD) | // sense guard
                    pin_input(7), // NC
                )
            });
        }
    }
}

impl PortD {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.PORTD.portd().write(|w| {
                w.bits(
                    pin_pullup(0) | // UART RxD
                    pin_high(1) | // UART TxD
                    pin_floating(2) | // INT0: zero crossing detector
                    pin_pullup(3) | // NC
                    pin_pullup(4) | // NC
                    pin_pullup(5) | // NC
                    pin_pullup(6) | // NC
                    pin_pullup(7), // NC
                )
            });
            self.PORTD.ddrd().write(|w| {
                w.bits(
                    pin_input(0) | // UART RxD
                    pin_output(1) | // UART TxD
                    pin_input(2) | // INT0: zero crossing detector
                    pin_input(3) | // NC
                    pin_input(4) | // NC
                    pin_input(5) | // NC
                    pin_input(6) | // NC
                    pin_input(7), // NC
                )
            });
        }
    }
}

// vim: ts=4 sw=4 expandtab
