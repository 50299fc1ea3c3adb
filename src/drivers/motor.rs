// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two brushed DC motors driven through H-bridge inputs on one PWM timer.
//!
//! Each motor uses a pair of channels: forward (IN1) and reverse (IN2). Motor 1 is on CH1/CH2,
//! motor 2 on CH3/CH4. Only one input of a pair ever carries a nonzero duty; zero speed leaves
//! both inputs low, so the motor coasts.
//!
//! Wiring:
//! - CH1 → M1 IN1 (forward), CH2 → M1 IN2 (reverse)
//! - CH3 → M2 IN1 (forward), CH4 → M2 IN2 (reverse)

use crate::config::{ClockConfig, PwmPins, TimerClass, MOTOR_PWM_HZ};
use crate::error::{InvalidArgument, Result};
use crate::hw::pins::{PinConfigurator, PinMode};
use crate::hw::pwm::{Channel, PwmGenerator, PwmTimer};

/// Speed command limit, in percent of full duty.
pub const MAX_SPEED: i16 = 100;

/// Which of the two motors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorId {
    M1,
    M2,
}

impl MotorId {
    /// (forward, reverse) channel pair.
    #[inline]
    pub const fn channels(self) -> (Channel, Channel) {
        match self {
            MotorId::M1 => (Channel::C1, Channel::C2),
            MotorId::M2 => (Channel::C3, Channel::C4),
        }
    }
}

impl TryFrom<u8> for MotorId {
    type Error = InvalidArgument;

    fn try_from(id: u8) -> core::result::Result<Self, Self::Error> {
        match id {
            1 => Ok(MotorId::M1),
            2 => Ok(MotorId::M2),
            _ => Err(InvalidArgument::Motor(id)),
        }
    }
}

/// Per-channel duty of one motor, in percent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotorDuty {
    pub forward: f32,
    pub reverse: f32,
}

/// Driver for both motors sharing one timer.
pub struct DualMotor<TIM> {
    pwm: PwmGenerator<TIM>,
}

impl<TIM: PwmTimer> DualMotor<TIM> {
    /// Route the four H-bridge inputs to the timer, start a 1 kHz carrier on all channels and
    /// leave both motors stopped.
    pub fn init<P: PinConfigurator>(
        tim: TIM,
        class: TimerClass,
        clocks: ClockConfig,
        pins: &mut P,
        outputs: &PwmPins<4>,
    ) -> Result<Self> {
        for &pin in &outputs.pins {
            pins.configure(pin, PinMode::Alternate(outputs.af));
        }

        let mut pwm = PwmGenerator::init(tim, class, clocks, MOTOR_PWM_HZ)?;
        for ch in Channel::ALL {
            pwm.start(ch);
        }

        let mut motors = Self { pwm };
        motors.stop_motor(MotorId::M1);
        motors.stop_motor(MotorId::M2);
        Ok(motors)
    }

    /// Drive motor `id` (1 or 2) at `speed` percent; positive is forward, negative reverse.
    ///
    /// `speed` is clamped to ±100.
    pub fn set_speed(&mut self, id: u8, speed: i16) -> Result<()> {
        let motor = MotorId::try_from(id)?;
        self.drive(motor, speed);
        Ok(())
    }

    /// Let motor `id` coast (both inputs at 0 % duty).
    pub fn stop(&mut self, id: u8) -> Result<()> {
        self.set_speed(id, 0)
    }

    /// Current duty on the forward and reverse inputs of motor `id`.
    pub fn duty(&self, id: u8) -> Result<MotorDuty> {
        let (fwd, rev) = MotorId::try_from(id)?.channels();
        Ok(MotorDuty {
            forward: self.pwm.duty_cycle(fwd),
            reverse: self.pwm.duty_cycle(rev),
        })
    }

    /// The shared PWM timer.
    #[inline]
    pub fn pwm(&self) -> &PwmGenerator<TIM> {
        &self.pwm
    }

    pub fn free(self) -> TIM {
        self.pwm.free()
    }

    fn drive(&mut self, motor: MotorId, speed: i16) {
        let speed = speed.clamp(-MAX_SPEED, MAX_SPEED);
        let magnitude = speed.unsigned_abs() as f32;
        let (fwd, rev) = motor.channels();

        // Release the idle input before driving the other one.
        if speed >= 0 {
            self.pwm.set_duty_cycle(rev, 0.0);
            self.pwm.set_duty_cycle(fwd, magnitude);
        } else {
            self.pwm.set_duty_cycle(fwd, 0.0);
            self.pwm.set_duty_cycle(rev, magnitude);
        }
    }

    #[inline]
    fn stop_motor(&mut self, motor: MotorId) {
        self.drive(motor, 0);
    }
}
