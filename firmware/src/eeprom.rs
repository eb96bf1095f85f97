// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Internal EEPROM as settings storage.

use crate::{
    hw::{interrupt, mcu},
};
use avr_context::{InitCtx, InitCtxCell};
use weld_kernel::settings::Nvm;

/// I/O address of EECR.
const EECR_IO: u8 = 0x1C;
const EECR_EEWE: u8 = 1 << 1;

#[allow(non_snake_case)]
pub struct Dp {
    pub EEPROM: mcu::EEPROM,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

impl Dp {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        //         EEPROM ready interrupt disabled, no strobes.
        unsafe { self.EEPROM.eecr().write(|w| w.bits(0)) };
    }

    fn wait_ready(&self) {
        while self.EEPROM.eecr().read().bits() & EECR_EEWE != 0 {}
    }

    fn set_address(&self, offset: u16) {
        // SAFETY: Every address within the EEPROM size is valid.
        //         The store layout stays far below that.
        unsafe { self.EEPROM.eear().write(|w| w.bits(offset)) };
    }
}

/// Main loop handle of the EEPROM.
pub struct Eeprom(());

impl Eeprom {
    pub fn new(_: &InitCtx) -> Self {
        Self(())
    }
}

impl Nvm for Eeprom {
    fn read_byte(&mut self, offset: u16) -> u8 {
        DP.wait_ready();
        DP.set_address(offset);
        // SAFETY: The asm only sets EERE in EECR.
        unsafe {
            core::arch::asm!(
                "sbi {EECR}, 0", // EERE
                EECR = const EECR_IO,
                options(nostack, preserves_flags)
            );
        }
        DP.EEPROM.eedr().read().bits()
    }

    fn write_byte(&mut self, offset: u16, value: u8) {
        DP.wait_ready();
        DP.set_address(offset);
        // SAFETY: All data values are valid.
        unsafe { DP.EEPROM.eedr().write(|w| w.bits(value)) };
        interrupt::free(|_cs| {
            // SAFETY: EEWE must be set within four cycles after EEMWE.
            //         Interrupts are disabled and the two sbi are back to back.
            unsafe {
                core::arch::asm!(
                    "sbi {EECR}, 2", // EEMWE
                    "sbi {EECR}, 1", // EEWE
                    EECR = const EECR_IO,
                    options(nostack, preserves_flags)
                );
            }
        });
        // The write takes about 8.5 ms. The read-back in the store waits for it.
    }
}

// vim: ts=4 sw=4 expandtab
