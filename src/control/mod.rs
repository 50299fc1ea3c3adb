// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Logic
//!
//! Application-level mapping from sensor readings to actuator commands.
//!
//! ## Modules
//!
//! - [`mapping`] - Reading-to-speed/angle maps and the centre dead-band.
//! - [`speed_dial`] - One pass of the potentiometer-to-motor main loop.

pub mod mapping;
pub mod speed_dial;

pub use mapping::{angle_from_reading, percent_of_full_scale, speed_from_reading, DeadBand, Direction};
pub use speed_dial::{DialReading, SpeedDial};
