// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board and peripheral configuration.
//!
//! Clock rates, the ADC reference and the pin maps are plain values handed to the drivers at
//! construction, so host tests can substitute their own numbers.

use crate::hw::pins::{Pin, Port};
use crate::hw::poll::PollPolicy;

/// System clock the board runs at.
pub const SYSCLK_HZ: u32 = 72_000_000;

/// Motor carrier frequency.
pub const MOTOR_PWM_HZ: u32 = 1_000;

/// Standard hobby servo frame rate (20 ms period).
pub const SERVO_PWM_HZ: u32 = 50;

/// Main loop pass period.
pub const LOOP_PERIOD_MS: u32 = 100;

/// Angle both servos are parked at after initialization.
pub const SERVO_DEFAULT_ANGLE: u16 = 90;

/// Alternate function number routing TIM3/TIM4 to their pins.
pub const TIM3_4_AF: u8 = 2;

/// Timer output pins together with the alternate function that routes them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PwmPins<const N: usize> {
    pub pins: [Pin; N],
    pub af: u8,
}

/// Motor H-bridge inputs, TIM4 CH1..CH4: M1 forward/reverse, M2 forward/reverse.
pub const MOTOR_PINS: PwmPins<4> = PwmPins {
    pins: [
        Pin::new(Port::D, 12),
        Pin::new(Port::D, 13),
        Pin::new(Port::D, 14),
        Pin::new(Port::D, 15),
    ],
    af: TIM3_4_AF,
};

/// Servo signal lines, TIM3 CH1 and CH2.
pub const SERVO_PINS: PwmPins<2> = PwmPins {
    pins: [Pin::new(Port::C, 6), Pin::new(Port::C, 7)],
    af: TIM3_4_AF,
};

/// ADC1_IN0..IN3.
pub const ANALOG_PINS: [Pin; 4] = [
    Pin::new(Port::A, 0),
    Pin::new(Port::A, 1),
    Pin::new(Port::A, 2),
    Pin::new(Port::A, 3),
];

/// Class of timer, which decides which bus clock feeds it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerClass {
    /// TIM2..TIM5, clocked at half the system clock.
    GeneralPurpose,
    /// TIM1/TIM8, clocked at the full system clock.
    Advanced,
}

/// Clock tree values the drivers derive their dividers from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockConfig {
    /// Core clock (Hz).
    pub sys_clk_hz: u32,
    /// APB2 peripheral clock feeding the ADC (Hz).
    pub apb2_hz: u32,
}

impl ClockConfig {
    /// Clock tree with APB2 running at the core clock.
    pub const fn new(sys_clk_hz: u32) -> Self {
        Self {
            sys_clk_hz,
            apb2_hz: sys_clk_hz,
        }
    }

    /// Override the APB2 clock.
    pub const fn with_apb2(mut self, apb2_hz: u32) -> Self {
        self.apb2_hz = apb2_hz;
        self
    }

    /// Input clock of a timer of the given class.
    pub const fn timer_clock_hz(&self, class: TimerClass) -> u32 {
        match class {
            TimerClass::GeneralPurpose => self.sys_clk_hz / 2,
            TimerClass::Advanced => self.sys_clk_hz,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new(SYSCLK_HZ)
    }
}

/// ADC conversion parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AdcConfig {
    /// Reference voltage corresponding to `full_scale`.
    pub vref_volts: f32,
    /// Highest raw reading (12-bit: 4095).
    pub full_scale: u16,
    /// Rated maximum ADC clock (Hz).
    pub max_clock_hz: u32,
    /// Wait after powering the converter on, before calibration (µs).
    pub settle_us: u32,
    /// How long to wait on calibration and conversion flags.
    pub poll: PollPolicy,
}

impl AdcConfig {
    pub fn new() -> Self {
        Self {
            vref_volts: 3.3,
            full_scale: 4095,
            max_clock_hz: 14_000_000,
            settle_us: 1_000,
            poll: PollPolicy::Forever,
        }
    }

    pub fn with_reference(mut self, vref_volts: f32, full_scale: u16) -> Self {
        self.vref_volts = vref_volts;
        self.full_scale = full_scale;
        self
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_settle_us(mut self, settle_us: u32) -> Self {
        self.settle_us = settle_us;
        self
    }

    /// Convert a raw reading to volts: `reading / full_scale * vref`.
    #[inline]
    pub fn to_voltage(&self, reading: u16) -> f32 {
        (reading as f32 / self.full_scale as f32) * self.vref_volts
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self::new()
    }
}
