// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Potentiometer-controlled motor speed.
//!
//! One [`SpeedDial::step`] is one pass of the main loop: sample the knob, map it to a speed,
//! drive the motor, refresh the display, and every few passes write a status block to the
//! telemetry port.
//!
//! Display layout (16x2):
//!
//! ```text
//! Speed:  -42%
//! ADC: 1234  V:0.99
//! ```
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut dial = SpeedDial::new(0, 1)?;
//!
//! loop {
//!     dial.step(&mut adc, &mut motors, &mut lcd, &mut usart)?;
//!     delay.delay_ms(100);
//! }
//! ```

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;

use crate::control::mapping::{speed_from_reading, DeadBand, Direction};
use crate::display::TextDisplay;
use crate::drivers::motor::{DualMotor, MotorId};
use crate::error::Result;
use crate::hw::adc::{AdcChannel, AdcPeripheral, AdcSampler};
use crate::hw::pwm::PwmTimer;

/// Conversions averaged per pass.
pub const DEFAULT_SAMPLES: u8 = 5;

/// Passes between telemetry reports (100 ms loop → once a second).
pub const DEFAULT_REPORT_EVERY: u32 = 10;

/// What one pass measured and commanded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DialReading {
    /// Averaged raw reading.
    pub raw: u16,
    /// `raw` in volts.
    pub volts: f32,
    /// Commanded speed after the dead-band.
    pub speed: i16,
}

impl DialReading {
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_speed(self.speed)
    }
}

/// Knob-to-motor control loop state.
pub struct SpeedDial {
    channel: AdcChannel,
    motor: MotorId,
    samples: u8,
    dead_band: DeadBand,
    report_every: u32,
    passes: u32,
}

impl SpeedDial {
    /// Read ADC `channel`, drive motor `motor` (1 or 2).
    pub fn new(channel: u8, motor: u8) -> Result<Self> {
        Ok(Self {
            channel: AdcChannel::try_from(channel)?,
            motor: MotorId::try_from(motor)?,
            samples: DEFAULT_SAMPLES,
            dead_band: DeadBand::default(),
            report_every: DEFAULT_REPORT_EVERY,
            passes: 0,
        })
    }

    /// Conversions averaged per pass. Zero is rejected by the sampler on the next `step`.
    pub fn with_samples(mut self, samples: u8) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_dead_band(mut self, dead_band: DeadBand) -> Self {
        self.dead_band = dead_band;
        self
    }

    /// Report every `passes` passes; 0 disables telemetry.
    pub fn with_report_every(mut self, passes: u32) -> Self {
        self.report_every = passes;
        self
    }

    /// Run one pass of the loop.
    ///
    /// Telemetry write failures are ignored; they never stop the motor update.
    pub fn step<ADC, D, TIM, S, W>(
        &mut self,
        adc: &mut AdcSampler<ADC, D>,
        motors: &mut DualMotor<TIM>,
        display: &mut S,
        telemetry: &mut W,
    ) -> Result<DialReading>
    where
        ADC: AdcPeripheral,
        D: DelayNs,
        TIM: PwmTimer,
        S: TextDisplay,
        W: Write,
    {
        let raw = adc.sample_averaged(self.channel.index(), self.samples)?;
        let volts = adc.to_voltage(raw);
        let speed = self
            .dead_band
            .apply(speed_from_reading(raw, adc.config().full_scale));

        motors.set_speed(self.motor_number(), speed)?;

        let reading = DialReading { raw, volts, speed };
        Self::show(display, &reading);

        if self.report_every != 0 {
            self.passes += 1;
            if self.passes >= self.report_every {
                self.passes = 0;
                let _ = self.report(telemetry, &reading);
            }
        }

        Ok(reading)
    }

    fn motor_number(&self) -> u8 {
        match self.motor {
            MotorId::M1 => 1,
            MotorId::M2 => 2,
        }
    }

    fn show<S: TextDisplay>(display: &mut S, r: &DialReading) {
        display.write_at(0, 7, format_args!("{:4}%", r.speed));
        display.write_at(1, 4, format_args!("{:4}", r.raw));
        display.write_at(1, 11, format_args!("{:.2}", r.volts));
    }

    fn report<W: Write>(&self, out: &mut W, r: &DialReading) -> fmt::Result {
        writeln!(out, "ADC: {:<4}  V: {:.2}\r", r.raw, r.volts)?;
        writeln!(out, "M{} speed: {:+}%\r", self.motor_number(), r.speed)?;
        writeln!(out, "state: {}\r", r.direction())
    }
}
