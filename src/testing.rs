// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory stand-ins for the hardware capability traits, for host tests.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::display::TextDisplay;
use crate::hw::adc::{AdcPeripheral, AdcPrescaler};
use crate::hw::pins::{Pin, PinConfigurator, PinMode};
use crate::hw::pwm::{Channel, PwmTimer};

/// Bring-up calls seen by [`FakeAdc`], and by any [`FakePins`] or [`FakeDelay`] sharing its
/// log, in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdcEvent {
    Prescaler(AdcPrescaler),
    Pin(Pin, PinMode),
    Delay { ns: u32 },
    SingleConversion,
    MaxSampleTime,
    Enable,
    StartResetCalibration,
    StartCalibration,
}

/// Event log shared between fakes so their relative order can be checked.
pub type EventLog = Rc<RefCell<Vec<AdcEvent>>>;

/// ADC that returns a fixed sample sequence, cycling when exhausted.
pub struct FakeAdc {
    log: EventLog,
    pub selected: Option<u8>,
    pub conversions: u32,
    pub calibration_stuck: bool,
    pub conversion_stuck: bool,
    samples: Vec<u16>,
    next: usize,
    calibrating: bool,
}

impl FakeAdc {
    pub fn new(samples: &[u16]) -> Self {
        Self {
            log: EventLog::default(),
            selected: None,
            conversions: 0,
            calibration_stuck: false,
            conversion_stuck: false,
            samples: samples.to_vec(),
            next: 0,
            calibrating: false,
        }
    }

    /// Handle to this ADC's event log, for other fakes to append to.
    pub fn log(&self) -> EventLog {
        Rc::clone(&self.log)
    }

    pub fn events(&self) -> Vec<AdcEvent> {
        self.log.borrow().clone()
    }

    fn record(&self, event: AdcEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl AdcPeripheral for FakeAdc {
    fn set_prescaler(&mut self, prescaler: AdcPrescaler) {
        self.record(AdcEvent::Prescaler(prescaler));
    }

    fn configure_single_conversion(&mut self) {
        self.record(AdcEvent::SingleConversion);
    }

    fn set_max_sample_time(&mut self) {
        self.record(AdcEvent::MaxSampleTime);
    }

    fn enable(&mut self) {
        self.record(AdcEvent::Enable);
    }

    fn start_reset_calibration(&mut self) {
        self.record(AdcEvent::StartResetCalibration);
    }

    fn reset_calibration_pending(&self) -> bool {
        false
    }

    fn start_calibration(&mut self) {
        self.record(AdcEvent::StartCalibration);
        self.calibrating = true;
    }

    fn calibration_pending(&self) -> bool {
        self.calibrating && self.calibration_stuck
    }

    fn select_channel(&mut self, channel: u8) {
        self.selected = Some(channel);
    }

    fn start_conversion(&mut self) {}

    fn conversion_complete(&self) -> bool {
        !self.conversion_stuck
    }

    fn read_data(&mut self) -> u16 {
        let value = self.samples[self.next % self.samples.len()];
        self.next += 1;
        self.conversions += 1;
        value
    }
}

/// Timer that just stores what was written.
#[derive(Default)]
pub struct FakeTimer {
    pub powered: bool,
    pub prescaler: u16,
    pub period: u16,
    pub pwm_mode1: [bool; 4],
    pub auto_reload_preload: bool,
    pub updated: bool,
    pub running: bool,
    pub compare: [u16; 4],
    pub enabled: [bool; 4],
}

impl PwmTimer for FakeTimer {
    fn power_on(&mut self) {
        self.powered = true;
    }

    fn set_prescaler(&mut self, prescaler: u16) {
        self.prescaler = prescaler;
    }

    fn set_period(&mut self, period: u16) {
        self.period = period;
    }

    fn configure_pwm_mode1(&mut self, channel: Channel) {
        self.pwm_mode1[channel.index()] = true;
    }

    fn enable_auto_reload_preload(&mut self) {
        self.auto_reload_preload = true;
    }

    fn generate_update(&mut self) {
        self.updated = true;
    }

    fn enable_counter(&mut self) {
        self.running = true;
    }

    fn set_compare(&mut self, channel: Channel, value: u16) {
        self.compare[channel.index()] = value;
    }

    fn compare(&self, channel: Channel) -> u16 {
        self.compare[channel.index()]
    }

    fn set_output_enabled(&mut self, channel: Channel, enabled: bool) {
        self.enabled[channel.index()] = enabled;
    }

    fn output_enabled(&self, channel: Channel) -> bool {
        self.enabled[channel.index()]
    }
}

/// Delay that only adds up how long it was asked to wait.
#[derive(Default)]
pub struct FakeDelay {
    pub total_ns: u64,
    log: Option<EventLog>,
}

impl FakeDelay {
    pub fn logging_to(log: EventLog) -> Self {
        Self {
            total_ns: 0,
            log: Some(log),
        }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        if let Some(log) = &self.log {
            log.borrow_mut().push(AdcEvent::Delay { ns });
        }
    }
}

#[derive(Default)]
pub struct FakePins {
    pub configured: Vec<(Pin, PinMode)>,
    log: Option<EventLog>,
}

impl FakePins {
    pub fn logging_to(log: EventLog) -> Self {
        Self {
            configured: Vec::new(),
            log: Some(log),
        }
    }
}

impl PinConfigurator for FakePins {
    fn configure(&mut self, pin: Pin, mode: PinMode) {
        self.configured.push((pin, mode));
        if let Some(log) = &self.log {
            log.borrow_mut().push(AdcEvent::Pin(pin, mode));
        }
    }
}

#[derive(Default)]
pub struct FakeDisplay {
    pub writes: Vec<(u8, u8, String)>,
}

impl TextDisplay for FakeDisplay {
    fn write_at(&mut self, row: u8, col: u8, text: fmt::Arguments<'_>) {
        self.writes.push((row, col, text.to_string()));
    }
}
