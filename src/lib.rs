// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Analog Drive Firmware
//!
//! Firmware components for a small motion board: a potentiometer read through the ADC sets the
//! speed of a brushed DC motor, and hobby servos follow a second analog input. Written in Rust,
//! targeting an STM32F767 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | ADC sampling, PWM timers, pin muxing, USART and delays |
//! | [`drivers`] | Dual DC motor and dual servo drivers on top of PWM |
//! | [`control`] | Reading-to-command mapping and the speed dial loop |
//! | [`config`] | Clock rates, ADC reference and pin maps |
//! | [`display`] | Character display sink used by the control loop |
//! | [`error`] | Crate-wide error type |
//!
//! Everything outside the register backends is generic over small capability traits
//! ([`hw::AdcPeripheral`], [`hw::PwmTimer`], [`hw::PinConfigurator`]), so the logic builds and
//! tests on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod display;
pub mod drivers;
pub mod error;
pub mod hw;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
