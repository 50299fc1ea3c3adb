// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Busy-wait policy for hardware status flags.
//!
//! The converter's calibration and end-of-conversion flags are polled in a tight loop. By default
//! the loop never gives up, like a bare `while` on the status register. A bounded policy turns a
//! stalled peripheral into a [`Flag`] timeout instead.

use crate::error::{Error, Flag, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollPolicy {
    /// Spin until the flag changes, however long that takes.
    Forever,
    /// Give up after this many polls.
    Bounded(u32),
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::Forever
    }
}

impl PollPolicy {
    /// Spin while `busy()` returns true.
    pub fn wait_while(self, flag: Flag, mut busy: impl FnMut() -> bool) -> Result<()> {
        match self {
            PollPolicy::Forever => {
                while busy() {
                    core::hint::spin_loop();
                }
                Ok(())
            }
            PollPolicy::Bounded(budget) => {
                for _ in 0..budget {
                    if !busy() {
                        return Ok(());
                    }
                    core::hint::spin_loop();
                }
                if busy() {
                    Err(Error::HardwareTimeout(flag))
                } else {
                    Ok(())
                }
            }
        }
    }
}
