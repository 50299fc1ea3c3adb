// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timer-based PWM generation.
//!
//! [`PwmGenerator`] derives the prescaler and auto-reload values from a target carrier frequency,
//! puts all four channels into PWM mode 1 and maps duty-cycle percentages onto compare values.
//!
//! The prescaler always divides the timer clock down to a 1 MHz tick, so the period register is
//! simply `1_000_000 / frequency - 1` and one count is one microsecond.
//!
//! Compare and auto-reload registers are preloaded: a new duty cycle or period takes effect at the
//! next counter overflow, never in the middle of a pulse.

use micromath::F32Ext;

use crate::config::{ClockConfig, TimerClass};
use crate::error::{ConfigurationError, InvalidArgument, Result};

/// Intermediate counter tick after the prescaler.
pub const TICK_HZ: u32 = 1_000_000;

/// Largest period that still leaves room for a 100 % compare value (`period + 1`) in 16 bits.
pub const MAX_PERIOD: u16 = 0xFFFE;

/// Slowest carrier that fits [`MAX_PERIOD`].
pub const MIN_FREQUENCY_HZ: u32 = (TICK_HZ + MAX_PERIOD as u32) / (MAX_PERIOD as u32 + 1);

/// Capture/compare channel of a timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    C1,
    C2,
    C3,
    C4,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::C1, Channel::C2, Channel::C3, Channel::C4];

    /// Zero-based index (CH1 = 0).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Channel {
    type Error = InvalidArgument;

    fn try_from(n: u8) -> core::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Channel::C1),
            2 => Ok(Channel::C2),
            3 => Ok(Channel::C3),
            4 => Ok(Channel::C4),
            _ => Err(InvalidArgument::PwmChannel(n)),
        }
    }
}

/// Semantic register operations on a PWM-capable timer.
pub trait PwmTimer {
    /// Enable the timer's bus clock.
    fn power_on(&mut self);

    fn set_prescaler(&mut self, prescaler: u16);

    /// Write the auto-reload register.
    fn set_period(&mut self, period: u16);

    /// PWM mode 1 (output active while counter < compare) with compare preload.
    fn configure_pwm_mode1(&mut self, channel: Channel);

    fn enable_auto_reload_preload(&mut self);

    /// Force an update event so preloaded prescaler/period values are latched.
    fn generate_update(&mut self);

    /// Start counting (and, on advanced timers, enable the main output).
    fn enable_counter(&mut self);

    fn set_compare(&mut self, channel: Channel, value: u16);

    fn compare(&self, channel: Channel) -> u16;

    fn set_output_enabled(&mut self, channel: Channel, enabled: bool);

    fn output_enabled(&self, channel: Channel) -> bool;
}

/// Prescaler/period pair derived from a carrier frequency.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerSettings {
    pub prescaler: u16,
    pub period: u16,
}

impl TimerSettings {
    /// Derive register values for `frequency_hz` from a timer input clock.
    ///
    /// Rejects carriers faster than the 1 MHz tick (the period would underflow) and carriers
    /// slower than [`MIN_FREQUENCY_HZ`] (the period would not fit 16 bits).
    pub fn derive(timer_clock_hz: u32, frequency_hz: u32) -> Result<Self> {
        if frequency_hz == 0 {
            return Err(InvalidArgument::ZeroFrequency.into());
        }

        let ticks_per_tick = timer_clock_hz / TICK_HZ;
        if timer_clock_hz % TICK_HZ != 0 || ticks_per_tick == 0 || ticks_per_tick > 0x1_0000 {
            return Err(ConfigurationError::TimerClock { hz: timer_clock_hz }.into());
        }

        if frequency_hz > TICK_HZ {
            return Err(ConfigurationError::FrequencyTooHigh {
                requested: frequency_hz,
                max: TICK_HZ,
            }
            .into());
        }

        let period = TICK_HZ / frequency_hz - 1;
        if period > MAX_PERIOD as u32 {
            return Err(ConfigurationError::FrequencyTooLow {
                requested: frequency_hz,
                min: MIN_FREQUENCY_HZ,
            }
            .into());
        }

        Ok(Self {
            prescaler: (ticks_per_tick - 1) as u16,
            period: period as u16,
        })
    }
}

/// Compare value for `duty_percent` of a `period`.
///
/// The percentage is clamped to [0, 100] (NaN counts as 0) and rounded to the nearest count, so
/// 100 % yields `period + 1`, which keeps the output high for the whole cycle.
pub fn pulse_for_duty(duty_percent: f32, period: u16) -> u16 {
    let duty = if duty_percent.is_nan() {
        0.0
    } else {
        duty_percent.clamp(0.0, 100.0)
    };
    let counts = (period as u32 + 1) as f32;
    (duty / 100.0 * counts).round() as u16
}

/// A timer running as a four-channel PWM generator.
pub struct PwmGenerator<TIM> {
    tim: TIM,
    class: TimerClass,
    clocks: ClockConfig,
    frequency_hz: u32,
    settings: TimerSettings,
}

impl<TIM: PwmTimer> PwmGenerator<TIM> {
    /// Configure `tim` for a `frequency_hz` carrier and start it.
    ///
    /// All four channels end up in PWM mode 1 with their outputs disabled and compare values
    /// untouched; use [`start`](Self::start) to enable individual outputs.
    pub fn init(
        mut tim: TIM,
        class: TimerClass,
        clocks: ClockConfig,
        frequency_hz: u32,
    ) -> Result<Self> {
        let settings = TimerSettings::derive(clocks.timer_clock_hz(class), frequency_hz)?;

        tim.power_on();
        tim.set_prescaler(settings.prescaler);
        tim.set_period(settings.period);
        for ch in Channel::ALL {
            tim.configure_pwm_mode1(ch);
        }
        tim.enable_auto_reload_preload();
        tim.generate_update();
        tim.enable_counter();

        Ok(Self {
            tim,
            class,
            clocks,
            frequency_hz,
            settings,
        })
    }

    /// Re-derive prescaler and period for a new carrier.
    ///
    /// Compare values are not rescaled; callers re-apply duty cycles if they need the same
    /// percentage at the new period. On error the running configuration is left unchanged.
    pub fn set_frequency(&mut self, frequency_hz: u32) -> Result<()> {
        let settings =
            TimerSettings::derive(self.clocks.timer_clock_hz(self.class), frequency_hz)?;

        self.tim.set_prescaler(settings.prescaler);
        self.tim.set_period(settings.period);

        self.settings = settings;
        self.frequency_hz = frequency_hz;
        Ok(())
    }

    /// Set the duty cycle of `channel` as a percentage of the current period.
    pub fn set_duty_cycle(&mut self, channel: Channel, duty_percent: f32) {
        let pulse = pulse_for_duty(duty_percent, self.settings.period);
        self.tim.set_compare(channel, pulse);
    }

    /// Enable the channel's output. The compare value is left as it was.
    #[inline]
    pub fn start(&mut self, channel: Channel) {
        self.tim.set_output_enabled(channel, true);
    }

    /// Disable the channel's output. The compare value is kept for the next `start`.
    #[inline]
    pub fn stop(&mut self, channel: Channel) {
        self.tim.set_output_enabled(channel, false);
    }

    #[inline]
    pub fn is_enabled(&self, channel: Channel) -> bool {
        self.tim.output_enabled(channel)
    }

    #[inline]
    pub fn prescaler(&self) -> u16 {
        self.settings.prescaler
    }

    #[inline]
    pub fn period(&self) -> u16 {
        self.settings.period
    }

    /// Requested carrier frequency.
    #[inline]
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Raw compare value of `channel`.
    #[inline]
    pub fn pulse(&self, channel: Channel) -> u16 {
        self.tim.compare(channel)
    }

    /// Current duty of `channel` as a percentage of the current period.
    pub fn duty_cycle(&self, channel: Channel) -> f32 {
        self.pulse(channel) as f32 * 100.0 / (self.settings.period as u32 + 1) as f32
    }

    /// Release the timer.
    pub fn free(self) -> TIM {
        self.tim
    }
}

#[cfg(target_os = "none")]
mod stm32 {
    use super::{Channel, PwmTimer};
    use stm32f7xx_hal::pac;

    // OCxM = 110 (PWM mode 1), OCxPE = 1, CCxS = 00 (output)
    const OC_PWM1_PRELOAD: u32 = (0b110 << 4) | (1 << 3);

    macro_rules! pwm_timer {
        ($TIM:ty, $enr:ident, $en:ident, advanced: $advanced:expr) => {
            impl PwmTimer for $TIM {
                fn power_on(&mut self) {
                    let rcc = unsafe { &*pac::RCC::ptr() };
                    rcc.$enr.modify(|_, w| w.$en().set_bit());
                }

                fn set_prescaler(&mut self, prescaler: u16) {
                    self.psc.write(|w| unsafe { w.bits(prescaler as u32) });
                }

                fn set_period(&mut self, period: u16) {
                    self.arr.write(|w| unsafe { w.bits(period as u32) });
                }

                fn configure_pwm_mode1(&mut self, channel: Channel) {
                    let shift = 8 * (channel.index() as u32 % 2);
                    let mask = 0xFF << shift;
                    let bits = OC_PWM1_PRELOAD << shift;
                    match channel {
                        Channel::C1 | Channel::C2 => self.ccmr1_output().modify(|r, w| unsafe {
                            w.bits((r.bits() & !mask) | bits)
                        }),
                        Channel::C3 | Channel::C4 => self.ccmr2_output().modify(|r, w| unsafe {
                            w.bits((r.bits() & !mask) | bits)
                        }),
                    }
                }

                fn enable_auto_reload_preload(&mut self) {
                    self.cr1.modify(|_, w| w.arpe().set_bit());
                }

                fn generate_update(&mut self) {
                    self.egr.write(|w| w.ug().set_bit());
                }

                fn enable_counter(&mut self) {
                    if $advanced {
                        self.bdtr
                            .modify(|r, w| unsafe { w.bits(r.bits() | (1 << 15)) });
                    }
                    self.cr1.modify(|_, w| w.cen().set_bit());
                }

                fn set_compare(&mut self, channel: Channel, value: u16) {
                    let value = value as u32;
                    match channel {
                        Channel::C1 => self.ccr1.write(|w| unsafe { w.bits(value) }),
                        Channel::C2 => self.ccr2.write(|w| unsafe { w.bits(value) }),
                        Channel::C3 => self.ccr3.write(|w| unsafe { w.bits(value) }),
                        Channel::C4 => self.ccr4.write(|w| unsafe { w.bits(value) }),
                    }
                }

                fn compare(&self, channel: Channel) -> u16 {
                    let bits = match channel {
                        Channel::C1 => self.ccr1.read().bits(),
                        Channel::C2 => self.ccr2.read().bits(),
                        Channel::C3 => self.ccr3.read().bits(),
                        Channel::C4 => self.ccr4.read().bits(),
                    };
                    bits as u16
                }

                fn set_output_enabled(&mut self, channel: Channel, enabled: bool) {
                    // CCxE sits at bit 4 * (x - 1)
                    let bit = 1 << (4 * channel.index() as u32);
                    self.ccer.modify(|r, w| unsafe {
                        if enabled {
                            w.bits(r.bits() | bit)
                        } else {
                            w.bits(r.bits() & !bit)
                        }
                    });
                }

                fn output_enabled(&self, channel: Channel) -> bool {
                    self.ccer.read().bits() & (1 << (4 * channel.index() as u32)) != 0
                }
            }
        };
    }

    pwm_timer!(pac::TIM1, apb2enr, tim1en, advanced: true);
    pwm_timer!(pac::TIM3, apb1enr, tim3en, advanced: false);
    pwm_timer!(pac::TIM4, apb1enr, tim4en, advanced: false);
}
