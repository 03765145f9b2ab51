/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! SC8925 clock controller.
//!
//! Owns the system control and LSP control register blocks behind a single lock. Every
//! register sequence, reads included, runs with the lock held, and public methods take it
//! exactly once.

use {
    self::{
        divider::Divider,
        error::{NoClockIdSnafu, Result, UnknownDeviceSnafu, UnsupportedSnafu},
        ids::{ClockId, DeviceId},
        pll::{Pll, PllConfig, PllControl},
        registers::{LspRegisterBlock, RegisterBlock, LSP_CTRL},
        tree::{Capabilities, ClockKind, ClockNode},
    },
    crate::{
        mmio::MMIODerefWrapper,
        sync::{interface::Mutex, SpinLock},
    },
    bit_field::BitField,
    tock_registers::interfaces::{ReadWriteable, Readable, Writeable},
};

pub mod divider;
pub mod error;
pub mod ids;
pub mod pll;
pub mod provider;
pub mod registers;
pub mod tree;

/// Frequency in Hz. 0 means "unknown".
pub type Hertz = u64;

type Registers = MMIODerefWrapper<RegisterBlock>;
type LspRegisters = MMIODerefWrapper<LspRegisterBlock>;

struct ClockControllerInner {
    registers: Registers,
    lsp: LspRegisters,
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Gate control and rate queries for the device clocks of the descriptor table.
pub struct ClockController {
    inner: SpinLock<ClockControllerInner>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl ClockController {
    pub const COMPATIBLE: &'static str = "silan,sc8925-clk";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide correct MMIO start addresses for the system control
    ///   block and the LSP misc control register, and that no other code writes the clock
    ///   fields of those blocks behind the controller's back.
    pub const unsafe fn new(cr_base: usize, lsp_base: usize) -> Self {
        Self {
            inner: SpinLock::new(ClockControllerInner::new(cr_base, lsp_base)),
        }
    }

    /// Ungate every clock of `device`.
    pub fn enable(&self, device: DeviceId) -> Result<()> {
        let node = Self::node(device)?;
        self.inner.lock(|inner| inner.enable(node))
    }

    /// Gate every clock of `device`.
    pub fn disable(&self, device: DeviceId) -> Result<()> {
        let node = Self::node(device)?;
        self.inner.lock(|inner| inner.disable(node))
    }

    /// Whether every gate bit of `device` is set.
    pub fn is_enabled(&self, device: DeviceId) -> Result<bool> {
        let node = Self::node(device)?;
        self.inner.lock(|inner| inner.is_enabled(node))
    }

    /// Current rate of `device`.
    pub fn rate(&self, device: DeviceId) -> Result<Hertz> {
        let node = Self::node(device)?;
        self.inner.lock(|inner| inner.rate(node))
    }

    /// Program the rate of a bus clock. The nearest achievable rate is chosen, read it back
    /// with [`Self::rate`].
    pub fn set_rate(&self, device: DeviceId, rate: Hertz) -> Result<()> {
        let node = Self::node(device)?;
        self.inner.lock(|inner| inner.set_rate(node, rate))
    }

    /// Rate of the bus a peripheral sits on.
    pub fn bus_rate(&self, device: DeviceId) -> Result<Hertz> {
        let node = Self::node(device)?;
        self.inner.lock(|inner| inner.bus_rate(node))
    }

    /// Program the rate of the bus a peripheral sits on.
    ///
    /// No populated node has a programmable bus of its own, peripherals change their bus
    /// through the bus node instead.
    pub fn set_bus_rate(&self, device: DeviceId, _rate: Hertz) -> Result<()> {
        let node = Self::node(device)?;
        UnsupportedSnafu { device: node.name }.fail()
    }

    /// Output frequency of a PLL.
    pub fn pll_rate(&self, pll: Pll) -> Hertz {
        self.inner.lock(|inner| pll.rate(&inner.registers))
    }

    /// Decoded configuration of a PLL.
    pub fn pll_config(&self, pll: Pll) -> (PllControl, PllConfig) {
        self.inner.lock(|inner| pll.config(&inner.registers))
    }

    /// Output frequency of a divider, including the PMU divider that has no node.
    pub fn divider_rate(&self, divider: Divider) -> Hertz {
        self.inner.lock(|inner| divider.rate(&inner.registers))
    }

    fn node(device: DeviceId) -> Result<&'static ClockNode> {
        tree::node(device).ok_or_else(|| {
            UnknownDeviceSnafu {
                index: device.index(),
            }
            .build()
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

fn require(node: &ClockNode, capability: Capabilities) -> Result<()> {
    if node.capabilities().contains(capability) {
        Ok(())
    } else {
        UnsupportedSnafu { device: node.name }.fail()
    }
}

impl ClockControllerInner {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide correct MMIO start addresses.
    const unsafe fn new(cr_base: usize, lsp_base: usize) -> Self {
        Self {
            registers: Registers::new(cr_base),
            lsp: LspRegisters::new(lsp_base),
        }
    }

    fn set_gate(&self, id: ClockId, on: bool) {
        match id {
            ClockId::Watchdog => self.lsp.CTRL.modify(if on {
                LSP_CTRL::WATCHDOG_ON::SET
            } else {
                LSP_CTRL::WATCHDOG_ON::CLEAR
            }),
            _ => {
                let reg = &self.registers.SYS_REG[id.bank()];
                let mut value = reg.get();
                value.set_bit(id.bit(), on);
                reg.set(value);
            }
        }
    }

    fn gate(&self, id: ClockId) -> bool {
        match id {
            ClockId::Watchdog => self.lsp.CTRL.is_set(LSP_CTRL::WATCHDOG_ON),
            _ => self.registers.SYS_REG[id.bank()].get().get_bit(id.bit()),
        }
    }

    /// Toggle the gates of `node`, returns false if it had none.
    fn switch(&self, node: &ClockNode, on: bool) -> bool {
        match node.gates[0] {
            // The timer enables in LSP misc control are broken in silicon, only the first
            // bank bit is used.
            Some(ClockId::Timer) => self.set_gate(ClockId::Timer, on),
            Some(_) => node.gate_ids().for_each(|id| self.set_gate(id, on)),
            None => return false,
        }
        true
    }

    fn enable(&self, node: &ClockNode) -> Result<()> {
        require(node, Capabilities::ENABLE)?;
        if !self.switch(node, true) {
            log::error!("{}: this device has no valid clock id", node.name);
            return NoClockIdSnafu { device: node.name }.fail();
        }
        Ok(())
    }

    fn disable(&self, node: &ClockNode) -> Result<()> {
        require(node, Capabilities::DISABLE)?;
        if !self.switch(node, false) {
            log::warn!("{}: this device has no valid clock id", node.name);
        }
        Ok(())
    }

    fn is_enabled(&self, node: &ClockNode) -> Result<bool> {
        require(node, Capabilities::ENABLE)?;
        match node.gates[0] {
            Some(ClockId::Timer) => Ok(self.gate(ClockId::Timer)),
            Some(_) => Ok(node.gate_ids().all(|id| self.gate(id))),
            None => NoClockIdSnafu { device: node.name }.fail(),
        }
    }

    fn rate(&self, node: &ClockNode) -> Result<Hertz> {
        require(node, Capabilities::GET_RATE)?;
        match node.kind {
            ClockKind::Bus(divider) => Ok(divider.rate(&self.registers)),
            ClockKind::Peripheral { bus } => self.rate(ClockController::node(bus)?),
            ClockKind::GateOnly | ClockKind::PassThrough => {
                UnsupportedSnafu { device: node.name }.fail()
            }
        }
    }

    fn set_rate(&self, node: &ClockNode, rate: Hertz) -> Result<()> {
        require(node, Capabilities::SET_RATE)?;
        match node.kind {
            ClockKind::Bus(divider) => {
                divider.set_rate(&self.registers, rate);
                Ok(())
            }
            _ => UnsupportedSnafu { device: node.name }.fail(),
        }
    }

    fn bus_rate(&self, node: &ClockNode) -> Result<Hertz> {
        require(node, Capabilities::GET_BUS_RATE)?;
        match node.kind {
            ClockKind::Peripheral { bus } => self.rate(ClockController::node(bus)?),
            _ => UnsupportedSnafu { device: node.name }.fail(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
