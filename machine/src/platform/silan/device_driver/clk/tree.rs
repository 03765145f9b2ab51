/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Clock descriptor table.
//!
//! One slot per [`DeviceId`]. Populated slots describe the gate bits, the parent bus and the
//! kind of a device clock; the parent links form a tree rooted at the PXB and LSP bus
//! dividers. Empty slots have no operations at all.

use {
    super::{
        divider::Divider,
        ids::{ClockId, DeviceId, DEVICE_COUNT},
    },
    bitflags::bitflags,
};

/// Gate bit slots per node.
pub const MAX_GATES: usize = 3;

bitflags! {
    /// Operations a node supports.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const ENABLE = 1 << 0;
        const DISABLE = 1 << 1;
        const GET_RATE = 1 << 2;
        const SET_RATE = 1 << 3;
        const GET_BUS_RATE = 1 << 4;
        const SET_BUS_RATE = 1 << 5;

        const GATE = Self::ENABLE.bits() | Self::DISABLE.bits();
    }
}

/// What a node can do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockKind {
    /// Root bus whose rate is a divider output.
    Bus(Divider),
    /// Leaf clocked by its parent bus.
    Peripheral { bus: DeviceId },
    /// Gate bits only, no rate information.
    GateOnly,
    /// Listed so device-tree bindings resolve, but nothing to control.
    PassThrough,
}

impl ClockKind {
    pub const fn capabilities(self) -> Capabilities {
        match self {
            ClockKind::Bus(_) => Capabilities::GATE
                .union(Capabilities::GET_RATE)
                .union(Capabilities::SET_RATE),
            ClockKind::Peripheral { .. } => Capabilities::GATE
                .union(Capabilities::GET_RATE)
                .union(Capabilities::GET_BUS_RATE),
            ClockKind::GateOnly => Capabilities::GATE,
            ClockKind::PassThrough => Capabilities::empty(),
        }
    }
}

/// A device clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockNode {
    pub name: &'static str,
    /// Gate bits, toggled in order. The first `None` ends the list.
    pub gates: [Option<ClockId>; MAX_GATES],
    pub parent: Option<DeviceId>,
    pub kind: ClockKind,
}

impl ClockNode {
    /// Gate ids up to the first empty slot.
    pub fn gate_ids(&self) -> impl Iterator<Item = ClockId> + '_ {
        self.gates.iter().map_while(|g| *g)
    }

    pub const fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }
}

const fn bus(name: &'static str, gate: ClockId, divider: Divider) -> Option<ClockNode> {
    Some(ClockNode {
        name,
        gates: [Some(gate), None, None],
        parent: None,
        kind: ClockKind::Bus(divider),
    })
}

const fn leaf(name: &'static str, gates: &[ClockId], bus: DeviceId) -> Option<ClockNode> {
    let mut slots = [None; MAX_GATES];
    let mut i = 0;
    while i < gates.len() {
        slots[i] = Some(gates[i]);
        i += 1;
    }
    Some(ClockNode {
        name,
        gates: slots,
        parent: Some(bus),
        kind: ClockKind::Peripheral { bus },
    })
}

const fn pxb_leaf(name: &'static str, gates: &[ClockId]) -> Option<ClockNode> {
    leaf(name, gates, DeviceId::Pxb)
}

const fn lsp_leaf(name: &'static str, gate: ClockId) -> Option<ClockNode> {
    leaf(name, &[gate], DeviceId::Lsp)
}

const fn descriptors() -> [Option<ClockNode>; DEVICE_COUNT] {
    use {ClockId as C, DeviceId as D};

    let mut table = [None; DEVICE_COUNT];

    // Peripheral bar
    table[D::UsbHost.index()] = pxb_leaf("usb-host", &[C::UsbHost, C::UsbPhy]);
    table[D::UsbOtg.index()] = pxb_leaf("usb-otg", &[C::UsbOtg, C::UsbPhy]);
    table[D::Gmac0.index()] = pxb_leaf("gmac0", &[C::Gmac0, C::GmacBus]);
    table[D::Gmac1.index()] = pxb_leaf("gmac1", &[C::Gmac1, C::GmacBus]);
    table[D::Dmac0.index()] = pxb_leaf("dmac0", &[C::Dmac0]);
    table[D::Dmac1.index()] = pxb_leaf("dmac1", &[C::Dmac1, C::Audio]);
    table[D::Uart2.index()] = pxb_leaf("uart2", &[C::Uart2, C::DmaBar]);
    table[D::Uart3.index()] = pxb_leaf("uart3", &[C::Uart3, C::DmaBar]);
    table[D::Uart4.index()] = pxb_leaf("uart4", &[C::Uart4, C::DmaBar]);
    table[D::Uart5.index()] = pxb_leaf("uart5", &[C::Uart5, C::DmaBar]);
    table[D::I2c3.index()] = pxb_leaf("i2c3", &[C::I2c3, C::DmaBar]);
    table[D::I2c4.index()] = pxb_leaf("i2c4", &[C::I2c4, C::DmaBar]);
    table[D::SpiNormal.index()] = pxb_leaf("spi-normal", &[C::SpiNormal]);
    table[D::Ssp.index()] = pxb_leaf("ssp", &[C::Ssp]);

    // Low speed peripherals
    table[D::Uart0.index()] = lsp_leaf("uart0", C::Uart0);
    table[D::Uart1.index()] = lsp_leaf("uart1", C::Uart1);
    table[D::Uart6.index()] = lsp_leaf("uart6", C::Uart6);
    table[D::I2c0.index()] = lsp_leaf("i2c0", C::I2c0);
    table[D::I2c1.index()] = lsp_leaf("i2c1", C::I2c1);
    table[D::I2c2.index()] = lsp_leaf("i2c2", C::I2c2);
    table[D::Spi.index()] = lsp_leaf("spi", C::Spi);
    table[D::Sci.index()] = lsp_leaf("sci", C::Sci);
    table[D::Pwm.index()] = lsp_leaf("pwm", C::Pwm);
    table[D::Timer.index()] = lsp_leaf("timer", C::Timer);
    table[D::Rtc.index()] = lsp_leaf("rtc", C::Rtc);
    table[D::Gpio1.index()] = lsp_leaf("gpio1", C::Gpio1);
    table[D::Gpio2.index()] = lsp_leaf("gpio2", C::Gpio2);
    table[D::Gpio3.index()] = lsp_leaf("gpio3", C::Gpio3);
    table[D::Gpio4.index()] = lsp_leaf("gpio4", C::Gpio4);
    table[D::Gpio5.index()] = lsp_leaf("gpio5", C::Gpio5);
    table[D::Gpio6.index()] = lsp_leaf("gpio6", C::Gpio6);
    table[D::Watchdog.index()] = lsp_leaf("watchdog", C::Watchdog);

    // Roots
    table[D::Pxb.index()] = bus("pxb", C::Pxb, Divider::Pxb);
    table[D::Lsp.index()] = bus("lsp", C::Lsp, Divider::Lsp);

    table[D::Jtag.index()] = Some(ClockNode {
        name: "jtag",
        gates: [None; MAX_GATES],
        parent: None,
        kind: ClockKind::PassThrough,
    });

    table
}

/// The descriptor table, indexed by [`DeviceId::index`].
pub static DESCRIPTORS: [Option<ClockNode>; DEVICE_COUNT] = descriptors();

/// Descriptor of `device`, `None` for an empty slot.
pub fn node(device: DeviceId) -> Option<&'static ClockNode> {
    DESCRIPTORS[device.index()].as_ref()
}

/// Populated slots in index order.
pub fn populated() -> impl Iterator<Item = (DeviceId, &'static ClockNode)> {
    enum_iterator::all::<DeviceId>().filter_map(|d| node(d).map(|n| (d, n)))
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_every_enabled_device() {
        assert_eq!(populated().count(), 35);
        assert!(node(DeviceId::Gpu).is_none());
        assert!(node(DeviceId::Dummy).is_none());
        assert_eq!(node(DeviceId::Uart0).map(|n| n.name), Some("uart0"));
        assert_eq!(node(DeviceId::SpiNormal).map(|n| n.name), Some("spi-normal"));
    }

    #[test]
    fn parents_are_populated_roots() {
        for (device, n) in populated() {
            match n.parent {
                Some(parent) => {
                    let p = node(parent).expect("parent slot must be populated");
                    assert!(p.parent.is_none(), "{:?} parent is not a root", device);
                    assert!(matches!(p.kind, ClockKind::Bus(_)));
                    assert_eq!(n.kind, ClockKind::Peripheral { bus: parent });
                }
                None => assert!(matches!(
                    n.kind,
                    ClockKind::Bus(_) | ClockKind::PassThrough
                )),
            }
        }
    }

    #[test]
    fn gate_lists_end_at_first_empty_slot() {
        let usb = node(DeviceId::UsbHost).unwrap();
        assert_eq!(
            usb.gate_ids().collect::<Vec<_>>(),
            [ClockId::UsbHost, ClockId::UsbPhy]
        );

        let odd = ClockNode {
            name: "odd",
            gates: [Some(ClockId::Px), None, Some(ClockId::Cxb)],
            parent: None,
            kind: ClockKind::GateOnly,
        };
        assert_eq!(odd.gate_ids().collect::<Vec<_>>(), [ClockId::Px]);

        let jtag = node(DeviceId::Jtag).unwrap();
        assert_eq!(jtag.gate_ids().count(), 0);
        assert!(jtag.capabilities().is_empty());
    }

    #[test]
    fn capabilities_follow_kind() {
        let pxb = node(DeviceId::Pxb).unwrap();
        assert!(pxb.capabilities().contains(Capabilities::SET_RATE));
        assert!(!pxb.capabilities().contains(Capabilities::GET_BUS_RATE));

        let uart = node(DeviceId::Uart0).unwrap();
        assert!(uart.capabilities().contains(Capabilities::GET_BUS_RATE));
        assert!(!uart.capabilities().contains(Capabilities::SET_RATE));
        assert!(!uart.capabilities().contains(Capabilities::SET_BUS_RATE));

        assert_eq!(ClockKind::GateOnly.capabilities(), Capabilities::GATE);
    }
}
