// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug value stream.
//!
//! The values are sent round robin as frames of `[id, lo, hi]`.
//! Every round ends with the sync frame `[0xFF, 0xFF, 0xFF]`.

use crate::{
    hw::interrupt,
    usart::uart_tx_cs,
};
use avr_context::{InitCtx, IrqCtx};
use avr_device::interrupt::Mutex;
use core::cell::Cell;

#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Debug {
    State,
    PulsesRemaining,
    SenseSpan,
    AutoThreshold,
    StoreErrors,
}
const NRVALUES: usize = 5;

const SYNC_ID: u8 = 0xFF;

const INDEXSHIFT: usize = 2;
const INDEXMASK: u8 = (1 << INDEXSHIFT) - 1;

static VALUES: Mutex<[Cell<u16>; NRVALUES]> = Mutex::new([
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
]);
static INDEX: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));

pub fn tx_complete_callback(_c: &IrqCtx) {
    interrupt::free(|cs| {
        let index = INDEX.borrow(cs).get();
        let id = index >> INDEXSHIFT;
        let txindex = index & INDEXMASK;

        let value = if id < NRVALUES as u8 {
            VALUES.borrow(cs)[id as usize].get()
        } else {
            0xFFFF
        };

        let data = match txindex {
            0 if id < NRVALUES as u8 => id,
            0 => SYNC_ID,
            1 => value as u8,
            _ => (value >> 8) as u8,
        };
        if uart_tx_cs(cs, data) {
            let next = if txindex < 2 {
                index + 1
            } else if id >= NRVALUES as u8 {
                0
            } else {
                (id + 1) << INDEXSHIFT
            };
            INDEX.borrow(cs).set(next);
        }
    });
}

impl Debug {
    pub fn log_u16(&self, value: u16) {
        interrupt::free(|cs| {
            let id = *self as usize;
            let values = VALUES.borrow(cs);
            if id < values.len() {
                values[id].set(value);
            }
        });
    }

    pub fn log_u8(&self, value: u8) {
        self.log_u16(value.into())
    }
}

/// Kick off the stream. The TX complete interrupt keeps it going.
pub fn debug_init(_: &InitCtx) {
    interrupt::free(|cs| {
        if uart_tx_cs(cs, SYNC_ID) {
            INDEX.borrow(cs).set(((NRVALUES as u8) << INDEXSHIFT) | 1);
        }
    });
}

// vim: ts=4 sw=4 expandtab
