// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent operator settings.

/// Identity of one editable settings field.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FieldId {
    PulseDuration,
    PulseCount,
    RestDuration,
    AutoMode,
}

pub const FIELD_COUNT: usize = 4;

impl FieldId {
    pub const ALL: [FieldId; FIELD_COUNT] = [
        FieldId::PulseDuration,
        FieldId::PulseCount,
        FieldId::RestDuration,
        FieldId::AutoMode,
    ];

    pub fn from_index(index: u8) -> FieldId {
        Self::ALL[index as usize % FIELD_COUNT]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn desc(self) -> &'static FieldDesc {
        &FIELDS[self as usize]
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FieldKind {
    Number,
    OnOff,
}

/// Encoder step function of a field.
///
/// Below the knee the fine step is used, above it the coarse step.
/// Exactly at the knee, stepping up is coarse and stepping down is fine.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Step {
    pub fine: u16,
    pub coarse: u16,
    pub knee: u16,
}

impl Step {
    const fn linear(step: u16) -> Self {
        Self {
            fine: step,
            coarse: step,
            knee: 0,
        }
    }

    fn up(&self, value: u16) -> u16 {
        let step = if value < self.knee {
            self.fine
        } else {
            self.coarse
        };
        value.saturating_add(step)
    }

    fn down(&self, value: u16) -> u16 {
        let step = if value > self.knee {
            self.coarse
        } else {
            self.fine
        };
        value.saturating_sub(step)
    }
}

/// Static description of one settings field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldDesc {
    pub id: FieldId,
    pub title: &'static str,
    pub unit: &'static str,
    pub kind: FieldKind,
    pub min: u16,
    pub max: u16,
    pub default: u16,
    pub step: Step,
    /// Byte offset in non-volatile memory.
    pub offset: u16,
    /// Number of bytes in non-volatile memory. Little endian.
    pub width: u8,
}

impl FieldDesc {
    pub fn clamp(&self, value: u16) -> u16 {
        value.clamp(self.min, self.max)
    }

    /// Replace an out-of-bounds value by the default.
    pub fn repair(&self, value: u16) -> u16 {
        if (self.min..=self.max).contains(&value) {
            value
        } else {
            self.default
        }
    }

    /// Apply a number of encoder steps. Never wraps.
    pub fn adjust(&self, value: u16, delta: i8) -> u16 {
        let mut value = self.clamp(value);
        for _ in 0..delta.unsigned_abs() {
            value = if delta > 0 {
                self.step.up(value)
            } else {
                self.step.down(value)
            };
            value = self.clamp(value);
        }
        value
    }
}

pub static FIELDS: [FieldDesc; FIELD_COUNT] = [
    FieldDesc {
        id: FieldId::PulseDuration,
        title: "PULSE TIME",
        unit: "ms",
        kind: FieldKind::Number,
        min: 1,
        max: 200,
        default: 50,
        step: Step {
            fine: 1,
            coarse: 5,
            knee: 20,
        },
        offset: 0,
        width: 2,
    },
    FieldDesc {
        id: FieldId::PulseCount,
        title: "PULSE COUNT",
        unit: "x",
        kind: FieldKind::Number,
        min: 1,
        max: 20,
        default: 1,
        step: Step::linear(1),
        offset: 2,
        width: 1,
    },
    FieldDesc {
        id: FieldId::RestDuration,
        title: "REST TIME",
        unit: "ms",
        kind: FieldKind::Number,
        min: 0,
        max: 1000,
        default: 200,
        step: Step {
            fine: 10,
            coarse: 50,
            knee: 100,
        },
        offset: 3,
        width: 2,
    },
    FieldDesc {
        id: FieldId::AutoMode,
        title: "AUTO MODE",
        unit: "",
        kind: FieldKind::OnOff,
        min: 0,
        max: 1,
        default: 0,
        step: Step::linear(1),
        offset: 5,
        width: 1,
    },
];

/// The operator settings. Every field is always within its bounds.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Settings {
    /// Milliseconds.
    pub pulse_duration: u16,
    pub pulse_count: u8,
    /// Milliseconds.
    pub rest_duration: u16,
    pub auto_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(FIELDS.each_ref().map(|d| d.default))
    }
}

impl Settings {
    /// Build settings from raw values in [FieldId::ALL] order.
    /// Out-of-bounds values are repaired.
    pub fn from_raw(raw: [u16; FIELD_COUNT]) -> Self {
        let mut settings = Self {
            pulse_duration: 0,
            pulse_count: 0,
            rest_duration: 0,
            auto_mode: false,
        };
        for (desc, value) in FIELDS.iter().zip(raw) {
            settings = settings.with(desc.id, desc.repair(value));
        }
        settings
    }

    pub fn get(&self, id: FieldId) -> u16 {
        match id {
            FieldId::PulseDuration => self.pulse_duration,
            FieldId::PulseCount => self.pulse_count.into(),
            FieldId::RestDuration => self.rest_duration,
            FieldId::AutoMode => self.auto_mode.into(),
        }
    }

    /// Copy with one field replaced. The value is clamped to the field's bounds.
    #[must_use]
    pub fn with(mut self, id: FieldId, value: u16) -> Self {
        let value = id.desc().clamp(value);
        match id {
            FieldId::PulseDuration => self.pulse_duration = value,
            FieldId::PulseCount => self.pulse_count = value as u8,
            FieldId::RestDuration => self.rest_duration = value,
            FieldId::AutoMode => self.auto_mode = value != 0,
        }
        self
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StoreError {
    /// Read-back of a written byte did not match.
    VerifyFailed { offset: u16 },
}

pub trait SettingsStore {
    /// Load and repair the settings. Never fails.
    fn load(&mut self) -> Settings;
    /// Write-through save.
    fn save(&mut self, settings: &Settings) -> Result<(), StoreError>;
}

/// Raw non-volatile byte memory.
pub trait Nvm {
    fn read_byte(&mut self, offset: u16) -> u8;
    fn write_byte(&mut self, offset: u16, value: u8);
}

/// [SettingsStore] on top of a raw byte memory, laid out as described by [FIELDS].
pub struct NvmStore<N> {
    nvm: N,
}

impl<N: Nvm> NvmStore<N> {
    pub fn new(nvm: N) -> Self {
        Self { nvm }
    }

    pub fn nvm(&self) -> &N {
        &self.nvm
    }

    pub fn nvm_mut(&mut self) -> &mut N {
        &mut self.nvm
    }

    fn read_field(&mut self, desc: &FieldDesc) -> u16 {
        let mut value = 0;
        for i in (0..desc.width).rev() {
            value = (value << 8) | u16::from(self.nvm.read_byte(desc.offset + u16::from(i)));
        }
        value
    }

    fn write_field(&mut self, desc: &FieldDesc, value: u16) -> Result<(), StoreError> {
        for i in 0..desc.width {
            let offset = desc.offset + u16::from(i);
            let byte = (value >> (8 * i)) as u8;
            if self.nvm.read_byte(offset) == byte {
                continue;
            }
            self.nvm.write_byte(offset, byte);
            if self.nvm.read_byte(offset) != byte {
                return Err(StoreError::VerifyFailed { offset });
            }
        }
        Ok(())
    }
}

impl<N: Nvm> SettingsStore for NvmStore<N> {
    fn load(&mut self) -> Settings {
        let mut raw = [0; FIELD_COUNT];
        for (value, desc) in raw.iter_mut().zip(FIELDS.iter()) {
            *value = self.read_field(desc);
        }
        Settings::from_raw(raw)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        for desc in &FIELDS {
            self.write_field(desc, settings.get(desc.id))?;
        }
        Ok(())
    }
}


// vim: ts=4 sw=4 expandtab
