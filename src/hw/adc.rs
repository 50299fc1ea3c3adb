// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking single-channel ADC sampling with one-shot calibration.
//!
//! [`AdcSampler`] owns an [`AdcPeripheral`] and a delay source. It is initialized once, after
//! which every conversion is a software-triggered single conversion on one channel.
//!
//! ```ignore
//! let mut adc = AdcSampler::new(dp.ADC1, delay, ClockConfig::default(), AdcConfig::default());
//! adc.init(&mut pins, &ANALOG_PINS)?;
//! let raw = adc.sample_averaged(0, 10)?;
//! let volts = adc.to_voltage(raw);
//! ```

use embedded_hal::delay::DelayNs;

use crate::config::{AdcConfig, ClockConfig};
use crate::error::{ConfigurationError, Flag, InvalidArgument, Result};
use crate::hw::pins::{Pin, PinConfigurator, PinMode};

/// Number of external analog inputs.
pub const CHANNEL_COUNT: u8 = 10;

/// A validated ADC input channel, 0..=9.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcChannel(u8);

impl AdcChannel {
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AdcChannel {
    type Error = InvalidArgument;

    fn try_from(ch: u8) -> core::result::Result<Self, Self::Error> {
        if ch < CHANNEL_COUNT {
            Ok(AdcChannel(ch))
        } else {
            Err(InvalidArgument::AdcChannel(ch))
        }
    }
}

/// ADC clock divider applied to the APB2 clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcPrescaler {
    Div2,
    Div4,
    Div6,
    Div8,
}

impl AdcPrescaler {
    #[inline]
    pub const fn divisor(self) -> u32 {
        match self {
            AdcPrescaler::Div2 => 2,
            AdcPrescaler::Div4 => 4,
            AdcPrescaler::Div6 => 6,
            AdcPrescaler::Div8 => 8,
        }
    }

    /// Smallest divider that keeps `source_hz / divisor <= max_hz`.
    pub fn for_clock(source_hz: u32, max_hz: u32) -> core::result::Result<Self, ConfigurationError> {
        [
            AdcPrescaler::Div2,
            AdcPrescaler::Div4,
            AdcPrescaler::Div6,
            AdcPrescaler::Div8,
        ]
        .into_iter()
        .find(|p| source_hz / p.divisor() <= max_hz)
        .ok_or(ConfigurationError::AdcClock { source_hz, max_hz })
    }
}

/// Register-level operations the sampler needs from an ADC.
///
/// Implementations hide the bit encoding; the sampler only sequences these calls.
pub trait AdcPeripheral {
    /// Set the ADC clock divider.
    fn set_prescaler(&mut self, prescaler: AdcPrescaler);

    /// Single conversion, software trigger, right-aligned data, sequence length 1.
    fn configure_single_conversion(&mut self);

    /// Longest sample time on every channel.
    fn set_max_sample_time(&mut self);

    /// Power the converter on.
    fn enable(&mut self);

    fn start_reset_calibration(&mut self);
    fn reset_calibration_pending(&self) -> bool;

    fn start_calibration(&mut self);
    fn calibration_pending(&self) -> bool;

    /// Put `channel` first (and only) in the regular sequence.
    fn select_channel(&mut self, channel: u8);

    /// Software start of a regular conversion.
    fn start_conversion(&mut self);

    /// End-of-conversion flag.
    fn conversion_complete(&self) -> bool;

    /// Read the data register. Reading clears end-of-conversion.
    fn read_data(&mut self) -> u16;
}

/// Calibrated single-channel sampler.
pub struct AdcSampler<ADC, D> {
    adc: ADC,
    delay: D,
    clocks: ClockConfig,
    config: AdcConfig,
}

impl<ADC, D> AdcSampler<ADC, D>
where
    ADC: AdcPeripheral,
    D: DelayNs,
{
    /// Wrap an ADC. Nothing is written until [`init`](Self::init).
    pub fn new(adc: ADC, delay: D, clocks: ClockConfig, config: AdcConfig) -> Self {
        Self {
            adc,
            delay,
            clocks,
            config,
        }
    }

    /// Release the peripheral and delay source.
    pub fn free(self) -> (ADC, D) {
        (self.adc, self.delay)
    }

    #[inline]
    pub fn config(&self) -> &AdcConfig {
        &self.config
    }

    /// Configure and calibrate the converter.
    ///
    /// The order matters: calibration has to run on an enabled, settled converter before the
    /// first conversion.
    pub fn init<P: PinConfigurator>(&mut self, pins: &mut P, analog_pins: &[Pin]) -> Result<()> {
        let prescaler = AdcPrescaler::for_clock(self.clocks.apb2_hz, self.config.max_clock_hz)?;
        self.adc.set_prescaler(prescaler);

        for &pin in analog_pins {
            pins.configure(pin, PinMode::Analog);
        }

        self.adc.configure_single_conversion();
        self.adc.set_max_sample_time();
        self.adc.enable();
        self.delay.delay_us(self.config.settle_us);

        let poll = self.config.poll;

        self.adc.start_reset_calibration();
        let adc = &self.adc;
        poll.wait_while(Flag::ResetCalibration, || adc.reset_calibration_pending())?;

        self.adc.start_calibration();
        let adc = &self.adc;
        poll.wait_while(Flag::Calibration, || adc.calibration_pending())?;

        Ok(())
    }

    /// Run one conversion on `channel` and return the raw reading.
    ///
    /// Under [`PollPolicy::Forever`](crate::hw::PollPolicy::Forever) this blocks until the
    /// hardware reports completion, which may be never if the ADC clock is stalled.
    pub fn sample(&mut self, channel: u8) -> Result<u16> {
        let channel = AdcChannel::try_from(channel)?;
        self.convert(channel)
    }

    /// Average `times` back-to-back conversions, truncating.
    pub fn sample_averaged(&mut self, channel: u8, times: u8) -> Result<u16> {
        let channel = AdcChannel::try_from(channel)?;
        if times == 0 {
            return Err(InvalidArgument::ZeroSampleCount.into());
        }

        let mut sum: u32 = 0;
        for _ in 0..times {
            sum += self.convert(channel)? as u32;
        }

        Ok((sum / times as u32) as u16)
    }

    /// Sample once and convert to volts.
    pub fn read_voltage(&mut self, channel: u8) -> Result<f32> {
        let raw = self.sample(channel)?;
        Ok(self.to_voltage(raw))
    }

    /// Convert a raw reading to volts using this sampler's reference.
    #[inline]
    pub fn to_voltage(&self, reading: u16) -> f32 {
        self.config.to_voltage(reading)
    }

    fn convert(&mut self, channel: AdcChannel) -> Result<u16> {
        self.adc.select_channel(channel.index());
        self.adc.start_conversion();

        let adc = &self.adc;
        self.config
            .poll
            .wait_while(Flag::EndOfConversion, || !adc.conversion_complete())?;

        Ok(self.adc.read_data().min(self.config.full_scale))
    }
}

#[cfg(target_os = "none")]
mod stm32 {
    use super::{AdcPeripheral, AdcPrescaler};
    use stm32f7xx_hal::pac;

    impl AdcPeripheral for pac::ADC1 {
        fn set_prescaler(&mut self, prescaler: AdcPrescaler) {
            let rcc = unsafe { &*pac::RCC::ptr() };
            rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

            let common = unsafe { &*pac::ADC_COMMON::ptr() };
            common.ccr.modify(|_, w| match prescaler {
                AdcPrescaler::Div2 => w.adcpre().div2(),
                AdcPrescaler::Div4 => w.adcpre().div4(),
                AdcPrescaler::Div6 => w.adcpre().div6(),
                AdcPrescaler::Div8 => w.adcpre().div8(),
            });
        }

        fn configure_single_conversion(&mut self) {
            // Power off to configure
            self.cr2.modify(|_, w| w.adon().clear_bit());

            // 12-bit, right-aligned, software trigger
            self.cr1.modify(|_, w| w.res().bits(0b00));
            self.cr2.modify(|_, w| {
                w.cont().clear_bit();
                w.align().right();
                w.exten().disabled();
                w
            });

            // Sequence length = 1 conversion
            self.sqr1.modify(|_, w| w.l().bits(0));
        }

        fn set_max_sample_time(&mut self) {
            // 480 cycles on every channel
            self.smpr1.write(|w| unsafe { w.bits(0x07FF_FFFF) });
            self.smpr2.write(|w| unsafe { w.bits(0x3FFF_FFFF) });
        }

        fn enable(&mut self) {
            self.cr2.modify(|_, w| w.adon().set_bit());
        }

        // The F7 converter is trimmed at the factory and has no self-calibration sequence, so
        // both calibration steps complete immediately.
        fn start_reset_calibration(&mut self) {}

        fn reset_calibration_pending(&self) -> bool {
            false
        }

        fn start_calibration(&mut self) {}

        fn calibration_pending(&self) -> bool {
            false
        }

        fn select_channel(&mut self, channel: u8) {
            self.sqr3
                .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
        }

        fn start_conversion(&mut self) {
            self.cr2.modify(|_, w| w.swstart().set_bit());
        }

        fn conversion_complete(&self) -> bool {
            self.sr.read().eoc().bit_is_set()
        }

        fn read_data(&mut self) -> u16 {
            self.dr.read().data().bits() as u16
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::hw::poll::PollPolicy;
    use crate::testing::{AdcEvent, FakeAdc, FakeDelay, FakePins};

    fn sampler(adc: FakeAdc) -> AdcSampler<FakeAdc, FakeDelay> {
        AdcSampler::new(
            adc,
            FakeDelay::default(),
            ClockConfig::default(),
            AdcConfig::default().with_poll(PollPolicy::Bounded(100)),
        )
    }

    #[test]
    fn prescaler_keeps_adc_clock_under_rating() {
        assert_eq!(
            AdcPrescaler::for_clock(72_000_000, 14_000_000),
            Ok(AdcPrescaler::Div6)
        );
        assert_eq!(
            AdcPrescaler::for_clock(24_000_000, 14_000_000),
            Ok(AdcPrescaler::Div2)
        );
        assert!(AdcPrescaler::for_clock(216_000_000, 14_000_000).is_err());
    }

    #[test]
    fn init_runs_calibration_after_enable_and_settle() {
        let mut adc = sampler(FakeAdc::new(&[0]));
        let mut pins = FakePins::default();
        let analog = crate::config::ANALOG_PINS;

        adc.init(&mut pins, &analog).unwrap();

        assert_eq!(pins.configured.len(), analog.len());
        assert!(pins.configured.iter().all(|(_, m)| *m == PinMode::Analog));

        let (_, delay) = adc.free();
        assert_eq!(delay.total_ns, 1_000_000);
    }

    #[test]
    fn init_sequence_order() {
        let fake = FakeAdc::new(&[0]);
        let log = fake.log();
        let mut adc = AdcSampler::new(
            fake,
            FakeDelay::logging_to(log.clone()),
            ClockConfig::default(),
            AdcConfig::default()
                .with_poll(PollPolicy::Bounded(100))
                .with_settle_us(250),
        );
        let mut pins = FakePins::logging_to(log);
        let [pa0, pa1, ..] = crate::config::ANALOG_PINS;

        adc.init(&mut pins, &[pa0, pa1]).unwrap();

        let (fake, _) = adc.free();
        assert_eq!(
            fake.events(),
            vec![
                AdcEvent::Prescaler(AdcPrescaler::Div6),
                AdcEvent::Pin(pa0, PinMode::Analog),
                AdcEvent::Pin(pa1, PinMode::Analog),
                AdcEvent::SingleConversion,
                AdcEvent::MaxSampleTime,
                AdcEvent::Enable,
                AdcEvent::Delay { ns: 250_000 },
                AdcEvent::StartResetCalibration,
                AdcEvent::StartCalibration,
            ]
        );
    }

    #[test]
    fn slower_apb2_picks_smaller_divider() {
        let fake = FakeAdc::new(&[0]);
        let mut adc = AdcSampler::new(
            fake,
            FakeDelay::default(),
            ClockConfig::default().with_apb2(36_000_000),
            AdcConfig::default(),
        );
        adc.init(&mut FakePins::default(), &[]).unwrap();

        // 36 MHz / 2 = 18 MHz is over the rating, / 4 = 9 MHz is not.
        let (fake, _) = adc.free();
        assert_eq!(fake.events()[0], AdcEvent::Prescaler(AdcPrescaler::Div4));
    }

    #[test]
    fn stuck_calibration_times_out() {
        let mut fake = FakeAdc::new(&[0]);
        fake.calibration_stuck = true;
        let mut adc = sampler(fake);

        let res = adc.init(&mut FakePins::default(), &[]);
        assert_eq!(res, Err(Error::HardwareTimeout(Flag::Calibration)));
    }

    #[test]
    fn sample_selects_channel_and_returns_data() {
        let mut adc = sampler(FakeAdc::new(&[1234]));
        assert_eq!(adc.sample(7), Ok(1234));

        let (fake, _) = adc.free();
        assert_eq!(fake.selected, Some(7));
    }

    #[test]
    fn sample_rejects_out_of_range_channel() {
        let mut adc = sampler(FakeAdc::new(&[0]));
        assert_eq!(
            adc.sample(10),
            Err(Error::InvalidArgument(InvalidArgument::AdcChannel(10)))
        );
    }

    #[test]
    fn sample_saturates_to_full_scale() {
        let mut adc = sampler(FakeAdc::new(&[0xFFFF]));
        assert_eq!(adc.sample(0), Ok(4095));
    }

    #[test]
    fn conversion_that_never_completes_times_out() {
        let mut fake = FakeAdc::new(&[100]);
        fake.conversion_stuck = true;
        let mut adc = sampler(fake);

        assert_eq!(
            adc.sample(0),
            Err(Error::HardwareTimeout(Flag::EndOfConversion))
        );
    }

    #[test]
    fn averaged_reading_truncates_mean() {
        let mut adc = sampler(FakeAdc::new(&[10, 11, 11]));
        // (10 + 11 + 11) / 3 = 10.67 -> 10
        assert_eq!(adc.sample_averaged(0, 3), Ok(10));

        let (fake, _) = adc.free();
        assert_eq!(fake.conversions, 3);
    }

    #[test]
    fn averaged_reading_lies_between_min_and_max_sample() {
        let samples: [u16; 7] = [4095, 0, 2048, 17, 3999, 1, 4000];
        for times in 1..=255u8 {
            let mut adc = sampler(FakeAdc::new(&samples));
            let avg = adc.sample_averaged(2, times).unwrap();

            let taken = samples.iter().cycle().take(times as usize);
            let min = *taken.clone().min().unwrap();
            let max = *taken.max().unwrap();
            assert!(avg >= min && avg <= max, "times={} avg={}", times, avg);
        }
    }

    #[test]
    fn averaged_full_scale_does_not_overflow() {
        let mut adc = sampler(FakeAdc::new(&[4095]));
        assert_eq!(adc.sample_averaged(9, 255), Ok(4095));
    }

    #[test]
    fn averaging_zero_samples_is_rejected() {
        let mut adc = sampler(FakeAdc::new(&[1]));
        assert_eq!(
            adc.sample_averaged(0, 0),
            Err(Error::InvalidArgument(InvalidArgument::ZeroSampleCount))
        );

        let (fake, _) = adc.free();
        assert_eq!(fake.conversions, 0);
    }

    #[test]
    fn read_voltage_converts_sample() {
        let mut adc = sampler(FakeAdc::new(&[4095]));
        let v = adc.read_voltage(1).unwrap();
        assert!((v - 3.3).abs() < 1e-5);
    }
}
