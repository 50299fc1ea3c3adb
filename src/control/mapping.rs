// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mapping raw potentiometer readings onto actuator commands.
//!
//! The potentiometer's travel is split at its midpoint: the lower half commands reverse, the
//! upper half forward. A [`DeadBand`] around zero keeps the motor still when the knob rests near
//! centre and the reading jitters.

use core::fmt;

use crate::drivers::motor::MAX_SPEED;
use crate::drivers::servo::MAX_ANGLE;

/// Signed speed (−100..=100) for a reading in 0..=`full_scale`.
///
/// The midpoint `(full_scale + 1) / 2` maps to 0, 0 to −100 and `full_scale` to +100. Integer
/// division truncates toward zero on both sides.
pub fn speed_from_reading(reading: u16, full_scale: u16) -> i16 {
    let reading = reading.min(full_scale) as i32;
    let mid = (full_scale as i32 + 1) / 2;
    let max = MAX_SPEED as i32;

    let speed = if reading < mid {
        -((mid - reading) * max / mid)
    } else {
        let span = (full_scale as i32 - mid).max(1);
        (reading - mid) * max / span
    };
    speed as i16
}

/// Angle (0..=180°) for a reading in 0..=`full_scale`.
pub fn angle_from_reading(reading: u16, full_scale: u16) -> u16 {
    let reading = reading.min(full_scale) as u32;
    (reading * MAX_ANGLE as u32 / full_scale.max(1) as u32) as u16
}

/// Reading as a whole percentage of full scale.
pub fn percent_of_full_scale(reading: u16, full_scale: u16) -> u8 {
    let reading = reading.min(full_scale) as u32;
    (reading * 100 / full_scale.max(1) as u32) as u8
}

/// Zeroes commands whose magnitude is strictly below a threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeadBand {
    threshold: u16,
}

impl DeadBand {
    /// `threshold` is a magnitude in speed percent.
    pub const fn new(threshold: u16) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    #[inline]
    pub fn apply(&self, value: i16) -> i16 {
        if value.unsigned_abs() < self.threshold {
            0
        } else {
            value
        }
    }
}

impl Default for DeadBand {
    /// ±5 % around centre.
    fn default() -> Self {
        Self::new(5)
    }
}

/// Direction a signed speed command turns the motor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
    Stopped,
}

impl Direction {
    pub fn from_speed(speed: i16) -> Self {
        match speed {
            s if s > 0 => Direction::Forward,
            s if s < 0 => Direction::Reverse,
            _ => Direction::Stopped,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
            Direction::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: u16 = 4095;

    #[test]
    fn speed_end_points_and_centre() {
        assert_eq!(speed_from_reading(0, FS), -100);
        assert_eq!(speed_from_reading(2048, FS), 0);
        assert_eq!(speed_from_reading(4095, FS), 100);
    }

    #[test]
    fn speed_halves() {
        // (2048 - 1024) * 100 / 2048 = 50
        assert_eq!(speed_from_reading(1024, FS), -50);
        // (3071 - 2048) * 100 / 2047 = 49.97 -> 49
        assert_eq!(speed_from_reading(3071, FS), 49);
        // Just below centre truncates toward zero.
        assert_eq!(speed_from_reading(2047, FS), 0);
    }

    #[test]
    fn speed_is_monotonic_and_bounded() {
        let mut prev = speed_from_reading(0, FS);
        for r in 1..=FS {
            let s = speed_from_reading(r, FS);
            assert!(s >= prev, "reading {}", r);
            assert!((-100..=100).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn out_of_range_reading_saturates() {
        assert_eq!(speed_from_reading(u16::MAX, FS), 100);
        assert_eq!(angle_from_reading(u16::MAX, FS), 180);
        assert_eq!(percent_of_full_scale(u16::MAX, FS), 100);
    }

    #[test]
    fn angle_and_percent() {
        assert_eq!(angle_from_reading(0, FS), 0);
        assert_eq!(angle_from_reading(2048, FS), 90);
        assert_eq!(angle_from_reading(4095, FS), 180);

        assert_eq!(percent_of_full_scale(0, FS), 0);
        assert_eq!(percent_of_full_scale(2048, FS), 50);
        assert_eq!(percent_of_full_scale(4095, FS), 100);
    }

    #[test]
    fn dead_band_is_exclusive() {
        let db = DeadBand::default();
        assert_eq!(db.threshold(), 5);
        assert_eq!(db.apply(0), 0);
        assert_eq!(db.apply(4), 0);
        assert_eq!(db.apply(-4), 0);
        assert_eq!(db.apply(5), 5);
        assert_eq!(db.apply(-5), -5);
        assert_eq!(db.apply(100), 100);
    }

    #[test]
    fn wide_threshold_holds_every_speed() {
        let db = DeadBand::new(u16::MAX);
        assert_eq!(db.threshold(), u16::MAX);
        assert_eq!(db.apply(i16::MIN), 0);
        assert_eq!(db.apply(i16::MAX), 0);
        assert_eq!(db.apply(0), 0);
    }

    #[test]
    fn zero_threshold_passes_everything() {
        let db = DeadBand::new(0);
        assert_eq!(db.apply(1), 1);
        assert_eq!(db.apply(-1), -1);
    }

    #[test]
    fn direction_classification() {
        assert_eq!(Direction::from_speed(12), Direction::Forward);
        assert_eq!(Direction::from_speed(-1), Direction::Reverse);
        assert_eq!(Direction::from_speed(0), Direction::Stopped);
        assert_eq!(format!("{}", Direction::Reverse), "reverse");
    }
}
