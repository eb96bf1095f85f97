// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display adapter.

pub const COLS: usize = 16;
pub const ROWS: usize = 2;

pub type Line = [u8; COLS];

/// Two-line text display consumed by the main loop.
pub trait Display {
    fn render(&mut self, line0: &Line, line1: &Line);
}

/// Raw character LCD bus.
pub trait CharLcd {
    fn set_cursor(&mut self, row: u8, col: u8);
    fn write(&mut self, text: &[u8]);
}

/// Keeps a copy of the LCD contents and only transmits changed characters.
pub struct Shadow<L> {
    lcd: L,
    rows: [Line; ROWS],
    valid: bool,
}

impl<L: CharLcd> Shadow<L> {
    pub fn new(lcd: L) -> Self {
        Self {
            lcd,
            rows: [[b' '; COLS]; ROWS],
            valid: false,
        }
    }

    pub fn lcd(&self) -> &L {
        &self.lcd
    }

    pub fn lcd_mut(&mut self) -> &mut L {
        &mut self.lcd
    }

    /// Forget the shadow. The next render rewrites everything.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    fn update_row(&mut self, row: usize, line: &Line) {
        let old = &self.rows[row];
        let span = if self.valid {
            let Some(first) = (0..COLS).find(|&i| old[i] != line[i]) else {
                return;
            };
            let last = (first..COLS).rfind(|&i| old[i] != line[i]).unwrap_or(first);
            first..last + 1
        } else {
            0..COLS
        };
        self.lcd.set_cursor(row as u8, span.start as u8);
        self.lcd.write(&line[span]);
        self.rows[row] = *line;
    }
}

impl<L: CharLcd> Display for Shadow<L> {
    fn render(&mut self, line0: &Line, line1: &Line) {
        self.update_row(0, line0);
        self.update_row(1, line1);
        self.valid = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{LcdOp, RecordingLcd};

    fn line(text: &str) -> Line {
        let mut l = [b' '; COLS];
        l[..text.len()].copy_from_slice(text.as_bytes());
        l
    }

    #[test]
    fn test_first_render_writes_all() {
        let mut d = Shadow::new(RecordingLcd::new());
        d.render(&line("HELLO"), &line(""));
        let ops = &d.lcd().ops;
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], LcdOp::Cursor(0, 0));
        assert_eq!(ops[1], LcdOp::write(&line("HELLO")));
        assert_eq!(ops[2], LcdOp::Cursor(1, 0));
        assert_eq!(ops[3], LcdOp::write(&line("")));
    }

    #[test]
    fn test_diff() {
        let mut d = Shadow::new(RecordingLcd::new());
        d.render(&line("T:50 M:1"), &line("AUTO:OFF   READY"));
        d.lcd_mut().ops.clear();

        d.render(&line("T:50 M:1"), &line("AUTO:OFF   READY"));
        assert!(d.lcd().ops.is_empty());

        d.render(&line("T:55 M:1"), &line("AUTO:OFF    FIRE"));
        let ops = &d.lcd().ops;
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], LcdOp::Cursor(0, 3));
        assert_eq!(ops[1], LcdOp::write(b"5"));
        assert_eq!(ops[2], LcdOp::Cursor(1, 11));
        assert_eq!(ops[3], LcdOp::write(b" FIRE"));
        assert_eq!(d.lcd().screen[1], line("AUTO:OFF    FIRE"));
    }

    #[test]
    fn test_invalidate() {
        let mut d = Shadow::new(RecordingLcd::new());
        d.render(&line("A"), &line("B"));
        d.invalidate();
        d.lcd_mut().ops.clear();
        d.render(&line("A"), &line("B"));
        assert_eq!(d.lcd().ops.len(), 4);
    }
}

// vim: ts=4 sw=4 expandtab
