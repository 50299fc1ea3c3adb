// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types shared by the ADC, PWM and actuator layers.
//!
//! Every failure is reported synchronously by the call that would otherwise misbehave. Nothing is
//! retried.

use core::fmt;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error for all peripheral and driver operations.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A caller-supplied identifier or count is outside the supported set.
    InvalidArgument(InvalidArgument),
    /// The clock tree cannot produce the requested configuration.
    Configuration(ConfigurationError),
    /// A hardware status flag did not reach its expected state within the poll budget.
    HardwareTimeout(Flag),
}

/// Rejected caller input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidArgument {
    /// ADC channel outside 0..=9.
    AdcChannel(u8),
    /// PWM channel outside 1..=4.
    PwmChannel(u8),
    /// Motor id outside {1, 2}.
    Motor(u8),
    /// Servo id outside {1, 2}.
    Servo(u8),
    /// Averaging over zero samples.
    ZeroSampleCount,
    /// PWM carrier of 0 Hz.
    ZeroFrequency,
}

/// Configurations the hardware cannot realize.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// Period would underflow: the carrier is faster than the intermediate tick.
    FrequencyTooHigh { requested: u32, max: u32 },
    /// Period would not fit the 16-bit auto-reload register.
    FrequencyTooLow { requested: u32, min: u32 },
    /// Timer input clock is not a whole number of MHz, or too slow/fast for the prescaler.
    TimerClock { hz: u32 },
    /// No ADC prescaler brings the source clock under the rated maximum.
    AdcClock { source_hz: u32, max_hz: u32 },
}

/// Hardware status flags the drivers wait on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    ResetCalibration,
    Calibration,
    EndOfConversion,
}

impl From<InvalidArgument> for Error {
    fn from(e: InvalidArgument) -> Self {
        Error::InvalidArgument(e)
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Configuration(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            Error::Configuration(e) => write!(f, "configuration error: {}", e),
            Error::HardwareTimeout(flag) => write!(f, "hardware timeout waiting for {}", flag),
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::AdcChannel(ch) => write!(f, "ADC channel {} (expected 0-9)", ch),
            InvalidArgument::PwmChannel(ch) => write!(f, "PWM channel {} (expected 1-4)", ch),
            InvalidArgument::Motor(id) => write!(f, "motor {} (expected 1 or 2)", id),
            InvalidArgument::Servo(id) => write!(f, "servo {} (expected 1 or 2)", id),
            InvalidArgument::ZeroSampleCount => f.write_str("sample count of 0"),
            InvalidArgument::ZeroFrequency => f.write_str("frequency of 0 Hz"),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigurationError::FrequencyTooHigh { requested, max } => {
                write!(f, "{} Hz exceeds maximum of {} Hz", requested, max)
            }
            ConfigurationError::FrequencyTooLow { requested, min } => {
                write!(f, "{} Hz is below minimum of {} Hz", requested, min)
            }
            ConfigurationError::TimerClock { hz } => {
                write!(f, "timer clock of {} Hz cannot produce a 1 MHz tick", hz)
            }
            ConfigurationError::AdcClock { source_hz, max_hz } => write!(
                f,
                "no ADC prescaler brings {} Hz under {} Hz",
                source_hz, max_hz
            ),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flag::ResetCalibration => "ADC reset-calibration",
            Flag::Calibration => "ADC calibration",
            Flag::EndOfConversion => "ADC end-of-conversion",
        })
    }
}
