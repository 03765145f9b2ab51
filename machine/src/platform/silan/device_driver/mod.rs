/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! SC8925 device drivers.

pub mod clk;

pub use clk::ClockController;
