// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Drivers
//!
//! This module contains actuator drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`motor`] – Two brushed DC motors on H-bridge inputs, one PWM timer
//! - [`servo`] – Two 50 Hz hobby servos, one PWM timer

pub mod motor;
pub mod servo;

pub use motor::{DualMotor, MotorId};
pub use servo::{DualServo, ServoId};
