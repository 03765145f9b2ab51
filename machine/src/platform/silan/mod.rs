/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Silan SC8925 platform support.

pub mod device_driver;

/// Board memory map.
pub mod memory {
    /// Physical addresses of MMIO blocks. The kernel runs them identity mapped in kseg1.
    pub mod map {
        /// System control registers: clock enables, clock selects, PLL configuration.
        pub const CR_BASE: usize = 0xbfba_9000;
        /// Low speed peripheral misc control: watchdog and timer clock enables.
        pub const LSP_CTRL_BASE: usize = 0xbfbd_7000;
    }
}

/// Frequency of the external crystal oscillator, in Hz.
pub const EXTERNAL_OSC_FREQ: u64 = 27_000_000;
