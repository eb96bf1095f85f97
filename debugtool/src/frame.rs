// -*- coding: utf-8 -*-

use std::fmt;

/// Debug value ids as sent by the firmware.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DebugId {
    State,
    PulsesRemaining,
    SenseSpan,
    AutoThreshold,
    StoreErrors,
    Sync,
}

impl DebugId {
    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::State),
            1 => Some(Self::PulsesRemaining),
            2 => Some(Self::SenseSpan),
            3 => Some(Self::AutoThreshold),
            4 => Some(Self::StoreErrors),
            0xFF => Some(Self::Sync),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::PulsesRemaining => "pulses_remaining",
            Self::SenseSpan => "sense_span",
            Self::AutoThreshold => "auto_threshold",
            Self::StoreErrors => "store_errors",
            Self::Sync => "sync",
        }
    }
}

fn state_name(code: u16) -> &'static str {
    match code {
        0 => "Splash",
        1 => "Idle",
        2 => "WeldStart",
        3 => "WeldWaitZeroCross",
        4 => "WeldPulseActive",
        5 => "WeldRest",
        6 => "MenuEnter",
        7 => "MenuEditField(PulseDuration)",
        8 => "MenuEditField(PulseCount)",
        9 => "MenuEditField(RestDuration)",
        10 => "MenuEditField(AutoMode)",
        _ => "?",
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    pub id: DebugId,
    pub value: u16,
}

impl Frame {
    pub fn parse(buf: &[u8; 3]) -> Option<Self> {
        let id = DebugId::from_u8(buf[0])?;
        let value = u16::from_le_bytes([buf[1], buf[2]]);
        if id == DebugId::Sync && value != 0xFFFF {
            return None;
        }
        Some(Self { id, value })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            DebugId::State => write!(f, "{} = {} ({})", self.id.name(), self.value, state_name(self.value)),
            _ => write!(f, "{} = {}", self.id.name(), self.value),
        }
    }
}

/// Splits the byte stream into frames.
///
/// Bytes that can't start a frame are dropped until the stream is aligned again.
#[derive(Default)]
pub struct Decoder {
    buf: [u8; 3],
    len: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if self.len == 0 && DebugId::from_u8(byte).is_none() {
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < self.buf.len() {
            return None;
        }
        if let Some(frame) = Frame::parse(&self.buf) {
            self.len = 0;
            return Some(frame);
        }
        // Misaligned. Retry starting at the next byte.
        let buf = self.buf;
        self.len = 0;
        let mut frame = None;
        for &b in &buf[1..] {
            frame = self.push(b);
        }
        frame
    }
}


// vim: ts=4 sw=4 expandtab
