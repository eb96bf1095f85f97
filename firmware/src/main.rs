// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod analog;
#[cfg(feature = "debug")]
mod debug;
mod eeprom;
mod exint;
mod hw;
mod lcd;
mod ports;
mod reset;
mod timer;
mod triac;
#[cfg(feature = "debug")]
mod usart;

use crate::{
    analog::ADC,
    eeprom::Eeprom,
    exint::EXINT,
    hw::{Peripherals, interrupt, mcu},
    lcd::Lcd,
    ports::{PORTA, PORTB, PORTC, PORTD, PortA, PortB, PortC, PortD},
    reset::unwrap_option,
    triac::PowerOutputs,
};
use avr_context::{InitCtx, MainCtx};
use weld_kernel::{
    SharedState, System, TickService,
    display::Shadow,
    settings::NvmStore,
};

pub static SHARED: SharedState = SharedState::new();
pub static TICK: TickService = TickService::new();

fn wdt_init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        // Enable WDT with timeout 0.26 s
        core::arch::asm!(
            "ldi {tmp}, 0x18", // WDTOE=1, WDE=1
            "out {WDTCR}, {tmp}",
            "ldi {tmp}, 0x0C", // WDE=1, WDP2=1, WDP1=0, WDP0=0
            "out {WDTCR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCR = const 0x21,
            options(nostack, preserves_flags)
        );
    }
}

fn wdt_poke(_wp: &mcu::WDT) {
    avr_device::asm::wdr();
}

#[cfg(feature = "debug")]
fn log_debug<S: weld_kernel::settings::SettingsStore>(sys: &System<S>) {
    use crate::debug::Debug;

    Debug::State.log_u8(sys.state().code());
    Debug::PulsesRemaining.log_u8(sys.ctx().pulses_remaining);
    Debug::SenseSpan.log_u16(sys.auto_trigger().last_span());
    Debug::AutoThreshold.log_u16(sys.auto_trigger().threshold());
    Debug::StoreErrors.log_u16(sys.store_errors());
}

#[avr_device::entry]
fn main() -> ! {
    wdt_init();

    let dp = unwrap_option(Peripherals::take());
    let wdt = dp.WDT;

    let mut drivers = None;
    let init_static_vars = |c: &InitCtx| {
        PORTA.init(c, PortA { PORTA: dp.PORTA });
        PORTB.init(c, PortB { PORTB: dp.PORTB });
        PORTC.init(c, PortC { PORTC: dp.PORTC });
        PORTD.init(c, PortD { PORTD: dp.PORTD });
        PORTA.setup(c);
        PORTB.setup(c);
        PORTC.setup(c);
        PORTD.setup(c);

        timer::DP.init(c, timer::Dp { TC1: dp.TC1 });
        EXINT.init(c, exint::ExInt { EXINT: dp.EXINT });
        ADC.init(c, analog::Adc { ADC: dp.ADC });
        eeprom::DP.init(c, eeprom::Dp { EEPROM: dp.EEPROM });
        lcd::DP.init(c, lcd::Dp { TWI: dp.TWI });
        #[cfg(feature = "debug")]
        usart::DP.init(c, usart::Dp { USART: dp.USART });

        timer::DP.setup(c);
        EXINT.setup(c);
        ADC.setup(c);
        eeprom::DP.setup(c);
        lcd::DP.setup(c);
        #[cfg(feature = "debug")]
        {
            usart::DP.setup(c);
            debug::debug_init(c);
        }

        drivers = Some((Lcd::new(c), Eeprom::new(c), PowerOutputs::new(c)));
    };

    // SAFETY:
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    // Interrupts are still disabled while the statics are initialized.
    let m = unsafe { MainCtx::new_with_init(init_static_vars) };
    let (lcd, eeprom, mut outputs) = unwrap_option(drivers);

    let mut display = Shadow::new(lcd);
    let mut sys = System::new(NvmStore::new(eeprom), &SHARED);
    sys.init(&mut outputs);

    // SAFETY: This must be after construction of MainCtx
    //         and after initialization of the static InitCtxCell variables.
    unsafe { interrupt::enable() };

    loop {
        let sense = ADC.take(&m);
        sys.run(&SHARED, &mut outputs, &mut display, sense);
        if display.lcd_mut().take_failed() {
            // Rewrite the whole screen on the next render.
            display.invalidate();
        }
        #[cfg(feature = "debug")]
        log_debug(&sys);
        wdt_poke(&wdt);
    }
}

// vim: ts=4 sw=4 expandtab
