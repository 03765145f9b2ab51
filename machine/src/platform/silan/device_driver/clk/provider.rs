/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Glue between the clock controller and a host clock framework.
//!
//! The framework sees every populated descriptor as one clock with a shared set of
//! [`ClkOps`]. Operations a clock does not have are silent no-ops at this boundary.

use {
    super::{
        error::{ClkError, Result, UnknownDeviceSnafu},
        ids::{DeviceId, DEVICE_COUNT},
        tree, ClockController, Hertz,
    },
    bitflags::bitflags,
};

/// Maximum number of cells in a clock specifier.
pub const MAX_PHANDLE_ARGS: usize = 16;

bitflags! {
    /// Registration flags understood by the host framework.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ClkFlags: u32 {
        const SET_RATE_GATE = 1 << 0;
        const SET_PARENT_GATE = 1 << 1;
        const SET_RATE_PARENT = 1 << 2;
        const IGNORE_UNUSED = 1 << 3;
        /// Basic clock without framework-side rate propagation.
        const IS_BASIC = 1 << 5;
    }
}

/// Handle the framework uses to address one registered clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClkHw {
    device: DeviceId,
}

impl ClkHw {
    pub const fn device(&self) -> DeviceId {
        self.device
    }
}

/// Registration record of one clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClkInitData {
    pub name: &'static str,
    pub flags: ClkFlags,
    pub parent: Option<&'static str>,
}

/// Device-tree clock specifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PhandleArgs {
    pub args_count: usize,
    pub args: [u32; MAX_PHANDLE_ARGS],
}

impl PhandleArgs {
    /// Specifier with a single cell, the usual `#clock-cells = <1>` form.
    pub const fn single(cell: u32) -> Self {
        let mut args = [0; MAX_PHANDLE_ARGS];
        args[0] = cell;
        Self {
            args_count: 1,
            args,
        }
    }
}

/// Operations the framework calls on a registered clock.
pub trait ClkOps {
    fn enable(&self, hw: &ClkHw) -> Result<()>;
    fn disable(&self, hw: &ClkHw);
    /// The framework's idea of the parent rate is not used, rates come from the hardware.
    fn recalc_rate(&self, hw: &ClkHw, parent_rate: Hertz) -> Hertz;
}

/// Host clock framework registration interface.
pub trait ClockFramework<'ops> {
    type Error;

    fn register(
        &mut self,
        hw: ClkHw,
        init: &ClkInitData,
        ops: &'ops dyn ClkOps,
    ) -> core::result::Result<(), Self::Error>;
}

/// Registers the descriptor table with a framework and resolves clock specifiers.
pub struct ClockProvider<'ops> {
    controller: &'ops ClockController,
    registered: [Option<ClkHw>; DEVICE_COUNT],
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<'ops> ClockProvider<'ops> {
    pub const fn new(controller: &'ops ClockController) -> Self {
        Self {
            controller,
            registered: [None; DEVICE_COUNT],
        }
    }

    /// Register every populated descriptor, returns the number of clocks registered.
    pub fn register_all<F>(&mut self, framework: &mut F) -> core::result::Result<usize, F::Error>
    where
        F: ClockFramework<'ops>,
    {
        let mut count = 0;
        for (device, node) in tree::populated() {
            let hw = ClkHw { device };
            let init = ClkInitData {
                name: node.name,
                flags: ClkFlags::IS_BASIC,
                parent: node.parent.and_then(tree::node).map(|p| p.name),
            };
            log::debug!("registering clock {} parent {:?}", init.name, init.parent);
            framework.register(hw, &init, self.controller)?;
            self.registered[device.index()] = Some(hw);
            count += 1;
        }
        Ok(count)
    }

    /// Registered clock named by the first cell of a clock specifier.
    pub fn lookup(&self, spec: &PhandleArgs) -> Result<ClkHw> {
        let index = spec.args[0] as usize;
        log::debug!("lookup clock {}", index);
        self.registered
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| UnknownDeviceSnafu { index }.build())
    }
}

//--------------------------------------------------------------------------------------------------
// OS Interface Code
//--------------------------------------------------------------------------------------------------

impl ClkOps for ClockController {
    fn enable(&self, hw: &ClkHw) -> Result<()> {
        match ClockController::enable(self, hw.device) {
            Err(ClkError::Unsupported { .. }) => Ok(()),
            result => result,
        }
    }

    fn disable(&self, hw: &ClkHw) {
        // Nothing to report to the framework, failures are already logged.
        let _ = ClockController::disable(self, hw.device);
    }

    fn recalc_rate(&self, hw: &ClkHw, _parent_rate: Hertz) -> Hertz {
        let rate = self.rate(hw.device).unwrap_or(0);
        log::debug!("recalc_rate {:?}: {}", hw.device, rate);
        rate
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
