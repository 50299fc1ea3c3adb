// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU-Level Peripherals
//!
//! Capability traits for the ADC, PWM timers and pin muxing, the drivers built directly on them,
//! and the STM32F7 register backends (target builds only).

pub mod adc;
pub mod pins;
pub mod poll;
pub mod pwm;

#[cfg(target_os = "none")]
pub mod timebase;
#[cfg(target_os = "none")]
pub mod usart;

pub use adc::{AdcChannel, AdcPeripheral, AdcPrescaler, AdcSampler};
pub use pins::{Pin, PinConfigurator, PinMode, Port};
pub use poll::PollPolicy;
pub use pwm::{Channel, PwmGenerator, PwmTimer};

#[cfg(target_os = "none")]
pub use pins::GpioConfigurator;
#[cfg(target_os = "none")]
pub use timebase::Timebase;
#[cfg(target_os = "none")]
pub use usart::Usart;
