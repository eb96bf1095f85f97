// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware independent control kernel of the AC spot welder.
//!
//! Everything in here runs on the host as well as on the AVR target.
//! The firmware crate provides the interrupt handlers, the port accesses
//! and the [display::CharLcd], [settings::Nvm] and [system::Outputs]
//! implementations.

#![cfg_attr(not(test), no_std)]

pub mod autotrig;
pub mod debounce;
pub mod display;
pub mod screen;
pub mod settings;
pub mod shared;
pub mod state;
pub mod system;
pub mod tick;

mod menu;
mod sequencer;

#[cfg(test)]
mod testutil;

pub use crate::{
    settings::{FieldId, Settings},
    shared::SharedState,
    state::State,
    system::System,
    tick::{TickInputs, TickService},
};

// vim: ts=4 sw=4 expandtab
