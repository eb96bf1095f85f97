// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HD44780 16x2 character LCD behind a PCF8574 I2C port expander.

use crate::{
    hw::{delay_us, mcu, F_CPU},
};
use avr_context::{InitCtx, InitCtxCell};
use weld_kernel::display::CharLcd;

const PCF8574_ADDR: u8 = 0x27;
const SCL_HZ: u32 = 100_000;
const TWBR_VAL: u8 = ((F_CPU / SCL_HZ - 16) / 2) as u8;

const TWCR_TWINT: u8 = 1 << 7;
const TWCR_TWSTA: u8 = 1 << 5;
const TWCR_TWSTO: u8 = 1 << 4;
const TWCR_TWEN: u8 = 1 << 2;

const TWSR_STATUS_MASK: u8 = 0xF8;
const TW_START: u8 = 0x08;
const TW_MT_SLA_ACK: u8 = 0x18;
const TW_MT_DATA_ACK: u8 = 0x28;

/// Give up on a bus transaction after this many polls.
const TWI_POLL_LIMIT: u16 = 2000;

// PCF8574 to HD44780 wiring.
const LCD_RS: u8 = 1 << 0;
const LCD_E: u8 = 1 << 2;
const LCD_BACKLIGHT: u8 = 1 << 3;

const LCD_CMD_CLEAR: u8 = 0x01;
const LCD_CMD_ENTRY_INC: u8 = 0x06;
const LCD_CMD_DISPLAY_ON: u8 = 0x0C;
const LCD_CMD_DISPLAY_OFF: u8 = 0x08;
const LCD_CMD_4BIT_2LINE: u8 = 0x28;
const LCD_CMD_DDRAM: u8 = 0x80;
const LCD_ROW_OFFSET: u8 = 0x40;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TwiError {
    Timeout,
    Status(u8),
}

#[allow(non_snake_case)]
pub struct Dp {
    pub TWI: mcu::TWI,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

impl Dp {
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.TWI.twsr().write(|w| w.bits(0)); // prescaler 1
            self.TWI.twbr().write(|w| w.bits(TWBR_VAL));
            self.TWI.twcr().write(|w| w.bits(TWCR_TWEN));
        }
    }

    fn command(&self, twcr: u8) {
        // SAFETY: All used control bit combinations are valid.
        unsafe { self.TWI.twcr().write(|w| w.bits(twcr | TWCR_TWINT | TWCR_TWEN)) };
    }

    fn wait(&self, expected: u8) -> Result<(), TwiError> {
        let mut polls = 0;
        while self.TWI.twcr().read().bits() & TWCR_TWINT == 0 {
            polls += 1;
            if polls >= TWI_POLL_LIMIT {
                return Err(TwiError::Timeout);
            }
        }
        let status = self.TWI.twsr().read().bits() & TWSR_STATUS_MASK;
        if status == expected {
            Ok(())
        } else {
            Err(TwiError::Status(status))
        }
    }

    fn transmit(&self, addr: u8, data: &[u8]) -> Result<(), TwiError> {
        self.command(TWCR_TWSTA);
        self.wait(TW_START)?;
        // SAFETY: All data values are valid.
        unsafe { self.TWI.twdr().write(|w| w.bits(addr << 1)) };
        self.command(0);
        self.wait(TW_MT_SLA_ACK)?;
        for &byte in data {
            // SAFETY: All data values are valid.
            unsafe { self.TWI.twdr().write(|w| w.bits(byte)) };
            self.command(0);
            self.wait(TW_MT_DATA_ACK)?;
        }
        Ok(())
    }

    /// Write a block to a slave. The bus is always released afterwards.
    pub fn write(&self, addr: u8, data: &[u8]) -> Result<(), TwiError> {
        let res = self.transmit(addr, data);
        self.command(TWCR_TWSTO);
        res
    }
}

pub struct Lcd {
    failed: bool,
}

impl Lcd {
    /// Run the HD44780 4-bit initialization sequence.
    pub fn new(_: &InitCtx) -> Self {
        let mut lcd = Self { failed: false };
        delay_us(50_000);
        lcd.nibble(0x30, false);
        delay_us(4_500);
        lcd.nibble(0x30, false);
        delay_us(150);
        lcd.nibble(0x30, false);
        delay_us(150);
        lcd.nibble(0x20, false);
        for cmd in [
            LCD_CMD_4BIT_2LINE,
            LCD_CMD_DISPLAY_OFF,
            LCD_CMD_CLEAR,
            LCD_CMD_ENTRY_INC,
            LCD_CMD_DISPLAY_ON,
        ] {
            lcd.byte(cmd, false);
        }
        lcd
    }

    /// Returns true, if a bus transfer failed since the previous call.
    pub fn take_failed(&mut self) -> bool {
        core::mem::replace(&mut self.failed, false)
    }

    fn nibble(&mut self, value: u8, rs: bool) {
        let bits = (value & 0xF0) | LCD_BACKLIGHT | if rs { LCD_RS } else { 0 };
        if DP.write(PCF8574_ADDR, &[bits | LCD_E, bits]).is_err() {
            self.failed = true;
        }
    }

    fn byte(&mut self, value: u8, rs: bool) {
        self.nibble(value, rs);
        self.nibble(value << 4, rs);
        if !rs && value <= LCD_CMD_CLEAR {
            delay_us(2_000);
        } else {
            delay_us(40);
        }
    }
}

impl CharLcd for Lcd {
    fn set_cursor(&mut self, row: u8, col: u8) {
        self.byte(LCD_CMD_DDRAM | (row * LCD_ROW_OFFSET + col), false);
    }

    fn write(&mut self, text: &[u8]) {
        for &c in text {
            self.byte(c, true);
        }
    }
}

// vim: ts=4 sw=4 expandtab
