// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Transmit-only serial port carrying the speed dial's status block and start-up errors.
//!
//! Lines end in CRLF: [`Usart::send_line`] appends it, and `writeln!` callers put a `\r` before
//! the newline themselves. Transmission blocks per byte; there is no buffering.

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

/// Transmit half of a serial port. The receive half is dropped; nothing is read back.
pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write a status line followed by CRLF.
    #[inline]
    pub fn send_line(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the last byte has left the shift register.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}
