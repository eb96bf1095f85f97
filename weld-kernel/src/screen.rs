// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen contents.

use crate::{
    display::{COLS, Line},
    settings::{FieldDesc, FieldKind, Settings},
    state::State,
};
use core::fmt::{self, Write as _};

/// A message that replaces the status line until the next operator input.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Notice {
    SaveFailed,
}

fn line(args: fmt::Arguments<'_>) -> Line {
    let mut text = heapless::String::<32>::new();
    // Overlong text is cut off at the display width anyway.
    let _ = text.write_fmt(args);
    let mut l = [b' '; COLS];
    let len = text.len().min(COLS);
    l[..len].copy_from_slice(&text.as_bytes()[..len]);
    l
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

pub fn splash() -> (Line, Line) {
    (
        line(format_args!("AC SPOT WELDER")),
        line(format_args!("FW v{}", env!("CARGO_PKG_VERSION"))),
    )
}

fn status_word(state: State, ac_missing: bool) -> &'static str {
    match state {
        State::WeldStart | State::WeldWaitZeroCross if ac_missing => "NO AC",
        State::WeldStart | State::WeldWaitZeroCross => "WAIT",
        State::WeldPulseActive => "FIRE",
        State::WeldRest => "REST",
        _ => "READY",
    }
}

/// Idle and weld screen.
pub fn status(
    settings: &Settings,
    state: State,
    ac_missing: bool,
    notice: Option<Notice>,
) -> (Line, Line) {
    let line0 = line(format_args!(
        "T:{:<3}M:{:<2} R:{}",
        settings.pulse_duration, settings.pulse_count, settings.rest_duration
    ));
    let line1 = match notice {
        Some(Notice::SaveFailed) => line(format_args!("SAVE FAILED")),
        None => line(format_args!(
            "AUTO:{:<3}{:>8}",
            on_off(settings.auto_mode),
            status_word(state, ac_missing)
        )),
    };
    (line0, line1)
}

/// Field edit screen.
pub fn edit(desc: &FieldDesc, draft: u16) -> (Line, Line) {
    let line0 = if desc.unit.is_empty() {
        line(format_args!("{}", desc.title))
    } else {
        line(format_args!("{} [{}]", desc.title, desc.unit))
    };
    let line1 = match desc.kind {
        FieldKind::Number => line(format_args!("< {draft} >")),
        FieldKind::OnOff => line(format_args!("< {} >", on_off(draft != 0))),
    };
    (line0, line1)
}


// vim: ts=4 sw=4 expandtab
