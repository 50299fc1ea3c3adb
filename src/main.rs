// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Potentiometer-driven motor and servo demo.
//!
//! ADC channel 0 sets the speed and direction of motor 1; servo 1 follows ADC channel 1. Status
//! goes out on USART1 at 115200 baud.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::fmt::Write;

    use cortex_m_rt::entry;
    use panic_halt as _;

    use hal::{
        pac,
        prelude::*,
        serial::{Config, Serial},
    };
    use stm32f7xx_hal as hal;

    use analog_drive::{
        config::{
            AdcConfig, ClockConfig, TimerClass, ANALOG_PINS, LOOP_PERIOD_MS, MOTOR_PINS,
            SERVO_PINS, SYSCLK_HZ,
        },
        control::{angle_from_reading, SpeedDial},
        drivers::{DualMotor, DualServo},
        hw::{AdcSampler, GpioConfigurator, Timebase, Usart},
        Error,
    };

    /// ADC input wired to the speed potentiometer.
    const SPEED_KNOB: u8 = 0;
    /// ADC input wired to the servo potentiometer.
    const SERVO_KNOB: u8 = 1;

    fn halt(usart: &mut Usart<pac::USART1>, err: Error) -> ! {
        let _ = writeln!(usart, "init failed: {}\r", err);
        usart.flush();
        loop {
            cortex_m::asm::nop();
        }
    }

    #[entry]
    fn main() -> ! {
        // Peripherals
        let dp = pac::Peripherals::take().unwrap();
        let cp = cortex_m::Peripherals::take().unwrap();

        // Clocks: APB1 timers run at 2 x 18 MHz = SYSCLK / 2
        let rcc = dp.RCC.constrain();
        let clocks = rcc
            .cfgr
            .sysclk(SYSCLK_HZ.Hz())
            .pclk1(18.MHz())
            .pclk2(72.MHz())
            .freeze();
        let board_clocks = ClockConfig::new(SYSCLK_HZ);

        // USART1 (DBG)
        let gpioa = dp.GPIOA.split();
        let tx = gpioa.pa9.into_alternate::<7>();
        let rx = gpioa.pa10.into_alternate::<7>();
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(dp.USART1, (tx, rx), &clocks, usart_cfg);
        let mut usart = Usart::new(serial);

        let delay = Timebase::new(cp.SYST, SYSCLK_HZ);
        // Only the analog and timer pins go through here; nothing else touches them.
        let mut pins = unsafe { GpioConfigurator::new() };

        // ADC1
        let mut adc = AdcSampler::new(dp.ADC1, delay, board_clocks, AdcConfig::default());
        if let Err(e) = adc.init(&mut pins, &ANALOG_PINS) {
            halt(&mut usart, e);
        }

        // TIM4: motors, TIM3: servos
        let mut motors = match DualMotor::init(
            dp.TIM4,
            TimerClass::GeneralPurpose,
            board_clocks,
            &mut pins,
            &MOTOR_PINS,
        ) {
            Ok(m) => m,
            Err(e) => halt(&mut usart, e),
        };
        let mut servos = match DualServo::init(
            dp.TIM3,
            TimerClass::GeneralPurpose,
            board_clocks,
            &mut pins,
            &SERVO_PINS,
        ) {
            Ok(s) => s,
            Err(e) => halt(&mut usart, e),
        };

        let mut dial = match SpeedDial::new(SPEED_KNOB, 1) {
            Ok(d) => d,
            Err(e) => halt(&mut usart, e),
        };

        usart.send_line("analog-drive up");
        let _ = writeln!(
            usart,
            "motor PWM: {} Hz, period {}\r",
            motors.pwm().frequency_hz(),
            motors.pwm().period()
        );

        loop {
            if let Err(e) = dial.step(&mut adc, &mut motors, &mut (), &mut usart) {
                let _ = writeln!(usart, "speed dial: {}\r", e);
            }

            let follow = adc.sample(SERVO_KNOB).and_then(|raw| {
                let angle = angle_from_reading(raw, adc.config().full_scale);
                servos.set_angle(1, angle)
            });
            if let Err(e) = follow {
                let _ = writeln!(usart, "servo: {}\r", e);
            }

            cortex_m::asm::delay(LOOP_PERIOD_MS * (SYSCLK_HZ / 1_000));
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
