/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Clock tree driver for the Silan SC8925 SoC.
//!
//! The driver maps clock gate bits, PLL configuration registers and bus divider selects of the
//! SC8925 system control block to a named set of device clocks, and registers those with a
//! host clock framework through [`platform::silan::device_driver::clk::provider`].

#![cfg_attr(not(test), no_std)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::nonstandard_macro_braces)] // https://github.com/shepmaster/snafu/issues/296
#![allow(missing_docs)] // Temp: switch to deny

pub mod mmio;
pub mod platform;
pub mod sync;

pub use platform::silan::device_driver::clk;
