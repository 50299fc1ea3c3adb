// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two hobby servos on CH1/CH2 of a 50 Hz PWM timer.
//!
//! Pulse width maps linearly from 0.5 ms at 0° to 2.5 ms at 180° within the 20 ms frame, i.e.
//! 2.5 % to 12.5 % duty.

use crate::config::{ClockConfig, PwmPins, TimerClass, SERVO_DEFAULT_ANGLE, SERVO_PWM_HZ};
use crate::error::{InvalidArgument, Result};
use crate::hw::pins::{PinConfigurator, PinMode};
use crate::hw::pwm::{Channel, PwmGenerator, PwmTimer};

/// Largest commandable angle.
pub const MAX_ANGLE: u16 = 180;

/// Duty at 0° (0.5 ms of 20 ms).
pub const MIN_DUTY: f32 = 2.5;

/// Duty span from 0° to 180° (2 ms of 20 ms).
pub const DUTY_SPAN: f32 = 10.0;

/// Which of the two servos.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoId {
    S1,
    S2,
}

impl ServoId {
    #[inline]
    pub const fn channel(self) -> Channel {
        match self {
            ServoId::S1 => Channel::C1,
            ServoId::S2 => Channel::C2,
        }
    }
}

impl TryFrom<u8> for ServoId {
    type Error = InvalidArgument;

    fn try_from(id: u8) -> core::result::Result<Self, Self::Error> {
        match id {
            1 => Ok(ServoId::S1),
            2 => Ok(ServoId::S2),
            _ => Err(InvalidArgument::Servo(id)),
        }
    }
}

/// Duty cycle (percent) for `angle` degrees, clamped to 0..=180.
#[inline]
pub fn duty_for_angle(angle: u16) -> f32 {
    let angle = angle.min(MAX_ANGLE);
    MIN_DUTY + (angle as f32 / MAX_ANGLE as f32) * DUTY_SPAN
}

/// Driver for both servos sharing one timer.
pub struct DualServo<TIM> {
    pwm: PwmGenerator<TIM>,
}

impl<TIM: PwmTimer> DualServo<TIM> {
    /// Route the servo pins, start a 50 Hz carrier and centre both servos.
    pub fn init<P: PinConfigurator>(
        tim: TIM,
        class: TimerClass,
        clocks: ClockConfig,
        pins: &mut P,
        outputs: &PwmPins<2>,
    ) -> Result<Self> {
        for &pin in &outputs.pins {
            pins.configure(pin, PinMode::Alternate(outputs.af));
        }

        let mut pwm = PwmGenerator::init(tim, class, clocks, SERVO_PWM_HZ)?;
        pwm.start(ServoId::S1.channel());
        pwm.start(ServoId::S2.channel());

        let mut servos = Self { pwm };
        servos.set_angle(1, SERVO_DEFAULT_ANGLE)?;
        servos.set_angle(2, SERVO_DEFAULT_ANGLE)?;
        Ok(servos)
    }

    /// Move servo `id` (1 or 2) to `angle` degrees. Angles past 180 are clamped.
    pub fn set_angle(&mut self, id: u8, angle: u16) -> Result<()> {
        let servo = ServoId::try_from(id)?;
        self.pwm.set_duty_cycle(servo.channel(), duty_for_angle(angle));
        Ok(())
    }

    /// Current duty of servo `id`, in percent.
    pub fn duty(&self, id: u8) -> Result<f32> {
        let servo = ServoId::try_from(id)?;
        Ok(self.pwm.duty_cycle(servo.channel()))
    }

    #[inline]
    pub fn pwm(&self) -> &PwmGenerator<TIM> {
        &self.pwm
    }

    pub fn free(self) -> TIM {
        self.pwm.free()
    }
}
