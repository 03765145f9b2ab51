/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

use snafu::Snafu;

/// Clock subsystem errors.
///
/// None of these are transient. A query that fails stays failed until the hardware
/// description or the register contents change, so nothing here is ever retried.
#[derive(Debug, Snafu, Copy, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum ClkError {
    /// A select field holds a code the hardware documentation does not define.
    #[snafu(display("Invalid reg value of fs ({}) in {}", code, what))]
    InvalidSelect { what: &'static str, code: u32 },

    /// The PLL has no documented frequency table to resolve its select code against.
    #[snafu(display("No documented frequency table for {}", pll))]
    NoFrequencyTable { pll: &'static str },

    /// A gate operation was asked of a node that has no gate bits.
    #[snafu(display("Device {} has no valid clock id", device))]
    NoClockId { device: &'static str },

    /// The node does not implement the requested operation.
    #[snafu(display("Operation not supported by {}", device))]
    Unsupported { device: &'static str },

    /// No clock is registered for the device index.
    #[snafu(display("No clock registered at index {}", index))]
    UnknownDevice { index: usize },
}

pub type Result<T> = ::core::result::Result<T, ClkError>;
