// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Character display sink.
//!
//! The display itself (e.g. an HD44780 1602 module) is driven elsewhere; the control loop only
//! needs to put formatted text at a row/column.

use core::fmt;

pub trait TextDisplay {
    /// Write formatted text starting at `row`, `col` (both zero-based).
    fn write_at(&mut self, row: u8, col: u8, text: fmt::Arguments<'_>);
}

/// No display fitted: text is discarded.
impl TextDisplay for () {
    fn write_at(&mut self, _row: u8, _col: u8, _text: fmt::Arguments<'_>) {}
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn write_at(&mut self, row: u8, col: u8, text: fmt::Arguments<'_>) {
        (**self).write_at(row, col, text)
    }
}
