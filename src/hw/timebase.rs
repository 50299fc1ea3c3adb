// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking delays on the SysTick counter.
//!
//! Wraps `cortex_m::delay::Delay` behind `embedded_hal::delay::DelayNs`, which is what the ADC
//! sampler and the control loop take.

use cortex_m::delay::Delay;
use embedded_hal::delay::DelayNs;

pub struct Timebase {
    delay: Delay,
}

impl Timebase {
    /// `ahb_hz` is the core clock SysTick counts at.
    pub fn new(syst: cortex_m::peripheral::SYST, ahb_hz: u32) -> Self {
        Self {
            delay: Delay::new(syst, ahb_hz),
        }
    }
}

impl DelayNs for Timebase {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
