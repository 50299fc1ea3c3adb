// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin identifiers and the pin configuration capability.
//!
//! Drivers only ever ask for a pin to be switched into analog or alternate-function mode while
//! they initialize, so that request is modelled as a small trait instead of typestate pins.

/// GPIO port letter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    /// Zero-based port index (A = 0), matching the RCC enable bit order.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// A single pin, e.g. `PD12`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    pub port: Port,
    pub number: u8,
}

impl Pin {
    pub const fn new(port: Port, number: u8) -> Self {
        Self { port, number }
    }
}

/// Electrical mode to put a pin into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Analog input, digital path disconnected.
    Analog,
    /// Push-pull output routed to a peripheral via the given alternate function.
    Alternate(u8),
}

/// Capability to change a pin's electrical mode.
pub trait PinConfigurator {
    fn configure(&mut self, pin: Pin, mode: PinMode);
}

impl<P: PinConfigurator + ?Sized> PinConfigurator for &mut P {
    fn configure(&mut self, pin: Pin, mode: PinMode) {
        (**self).configure(pin, mode)
    }
}

#[cfg(target_os = "none")]
pub use self::stm32::GpioConfigurator;

#[cfg(target_os = "none")]
mod stm32 {
    use super::{Pin, PinConfigurator, PinMode, Port};
    use stm32f7xx_hal::pac;

    /// Raw GPIO register access for run-time pin configuration.
    ///
    /// Every port shares the GPIOB register layout, so all ports are addressed through it.
    pub struct GpioConfigurator {
        _private: (),
    }

    impl GpioConfigurator {
        /// # Safety
        ///
        /// The caller must not concurrently reconfigure the same pins through HAL typestate
        /// handles.
        pub unsafe fn new() -> Self {
            Self { _private: () }
        }

        fn block(port: Port) -> &'static pac::gpiob::RegisterBlock {
            let ptr = match port {
                Port::A => pac::GPIOA::ptr() as *const pac::gpiob::RegisterBlock,
                Port::B => pac::GPIOB::ptr(),
                Port::C => pac::GPIOC::ptr() as *const pac::gpiob::RegisterBlock,
                Port::D => pac::GPIOD::ptr() as *const pac::gpiob::RegisterBlock,
                Port::E => pac::GPIOE::ptr() as *const pac::gpiob::RegisterBlock,
            };
            unsafe { &*ptr }
        }
    }

    impl PinConfigurator for GpioConfigurator {
        fn configure(&mut self, pin: Pin, mode: PinMode) {
            let rcc = unsafe { &*pac::RCC::ptr() };
            rcc.ahb1enr
                .modify(|r, w| unsafe { w.bits(r.bits() | (1 << pin.port.index())) });

            let gpio = Self::block(pin.port);
            let n = pin.number as u32;

            // MODER: 10 alternate, 11 analog
            let moder = match mode {
                PinMode::Analog => 0b11,
                PinMode::Alternate(_) => 0b10,
            };
            gpio.moder.modify(|r, w| unsafe {
                w.bits((r.bits() & !(0b11 << (2 * n))) | (moder << (2 * n)))
            });

            // Push-pull driver
            gpio.otyper
                .modify(|r, w| unsafe { w.bits(r.bits() & !(1 << n)) });

            if let PinMode::Alternate(af) = mode {
                let af = (af & 0xF) as u32;
                if n < 8 {
                    let shift = 4 * n;
                    gpio.afrl.modify(|r, w| unsafe {
                        w.bits((r.bits() & !(0xF << shift)) | (af << shift))
                    });
                } else {
                    let shift = 4 * (n - 8);
                    gpio.afrh.modify(|r, w| unsafe {
                        w.bits((r.bits() & !(0xF << shift)) | (af << shift))
                    });
                }
            }
        }
    }
}
