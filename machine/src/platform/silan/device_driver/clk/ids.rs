/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Clock gate and device identifier namespaces.

use enum_iterator::Sequence;

/// Hardware clock gate identifiers.
///
/// Each id is `bank * 32 + bit` and names one enable bit in the gate bank starting at
/// `SYS_REG0`. [`ClockId::Watchdog`] is the exception: it lives in the LSP misc control
/// register and its numeric value must never be used to address the bank.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u16)]
pub enum ClockId {
    // Module Clock Enable Register 0
    Px = 0,
    Cxb = 1,
    UsbOtg = 2,
    /// USB1
    UsbHost = 3,
    Gmac1 = 5,
    Lsp = 6,
    Gmac0 = 7,
    Dmac0 = 8,
    Dmac1 = 9,
    SpdifOut = 10,
    I2sT4 = 11,
    I2sMic = 12,
    I2sHdmi = 13,
    Sdram = 14,
    DmaBar = 15,
    Pxb = 16,
    Gpu = 17,
    Vpu0 = 18,
    Vpp = 19,
    Jpu = 20,
    Dsp0 = 21,
    Dsp1 = 22,
    SecDmx = 23,
    Timer = 24,
    Uart0 = 25,
    Spi = 26,
    Gpio1 = 27,
    Ssp = 28,
    GmacBus = 30,
    Dxb = 31,

    // Module Clock Enable Register 1
    Audio = 32,
    Hdmi = 32 + 1,
    Dve = 32 + 2,
    Tcon = 32 + 3,
    Bt656 = 32 + 4,
    HdDve = 32 + 5,
    Can = 32 + 8,
    Sd = 32 + 9,
    Emmc = 32 + 10,
    Sdio = 32 + 11,
    Sci = 32 + 12,
    Pwm = 32 + 13,
    Rtc = 32 + 14,
    Vpu1 = 32 + 16,
    /// Bus
    Vjb = 32 + 17,
    SpiNormal = 32 + 18,
    Hpb = 32 + 19,
    Viu = 32 + 21,
    Dit = 32 + 23,
    Uart6 = 32 + 24,
    Uart1 = 32 + 25,
    Uart2 = 32 + 26,
    Uart3 = 32 + 27,
    I2c0 = 32 + 28,
    I2c1 = 32 + 29,
    I2c2 = 32 + 30,
    Pmu = 32 + 31,

    // Module Clock Enable Register 19
    Ddr0Phy = 19 * 32 + 14,
    Ddr0Ctrl = 19 * 32 + 15,
    Ddr1Phy = 19 * 32 + 30,
    Ddr1Ctrl = 19 * 32 + 31,

    // Module Clock Enable Register 22
    UsbPhy = 22 * 32 + 8,

    // Module Clock Enable Register 30
    Adc = 30 * 32 + 8,
    AdcPclk = 30 * 32 + 9,
    Cm0Hclk = 30 * 32 + 10,
    Cm0Dclk = 30 * 32 + 11,
    Cm0Fclk = 30 * 32 + 12,
    Efuse = 30 * 32 + 13,
    Ccu = 30 * 32 + 14,
    Fdip = 30 * 32 + 15,
    Gpio2 = 30 * 32 + 16,
    Gpio3 = 30 * 32 + 17,
    Gpio4 = 30 * 32 + 18,
    Gpio5 = 30 * 32 + 19,
    Uart4 = 30 * 32 + 20,
    Uart5 = 30 * 32 + 21,
    I2c3 = 30 * 32 + 22,
    I2c4 = 30 * 32 + 23,
    IvsBus = 30 * 32 + 24,
    Isp = 30 * 32 + 25,
    Mpu = 30 * 32 + 26,
    Vip = 30 * 32 + 27,
    Vprep = 30 * 32 + 28,
    Venc = 30 * 32 + 29,
    Gpio6 = 30 * 32 + 30,
    SpdifIn = 30 * 32 + 31,

    /// Not part of the system control block, see [`ClockId`] docs.
    Watchdog = 30 * 32 + 32,
}

impl ClockId {
    /// Raw identifier value.
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Gate bank (word index from `SYS_REG0`) holding this clock's enable bit.
    pub const fn bank(self) -> usize {
        self.raw() as usize / 32
    }

    /// Bit position of the enable bit within its bank.
    pub const fn bit(self) -> usize {
        self.raw() as usize % 32
    }
}

/// Device identifiers, the index space of the clock descriptor table and of
/// device-tree clock specifiers.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Sequence)]
#[repr(usize)]
pub enum DeviceId {
    UsbHost,
    UsbOtg,
    Gmac0,
    Gmac1,
    Dmac0,
    Dmac1,
    I2sT4,
    I2sMic,
    I2sHdmi,
    Uart0,
    Uart1,
    Uart2,
    Uart3,
    Uart4,
    Uart5,
    Uart6,
    I2c0,
    I2c1,
    I2c2,
    I2c3,
    I2c4,
    Spi,
    SpiNormal,
    Ssp,
    SpdifIn,
    SpdifOut,
    Hdmi,
    Can,
    Sd,
    Emmc,
    Sdio,
    Sci,
    Pwm,
    Sdram,
    Timer,
    Otp,
    Rtc,
    Pmu,
    Dit,
    Gpu,
    GpuBus,
    Vpu0,
    Vpu1,
    Jpu,
    Vjb,
    Vpp,
    Dsp0,
    Dsp1,
    Viu,
    Vprep,
    Mpu,
    MpuBus,
    Venc,
    Fdip,
    SecDmx,
    Gpio1,
    Gpio2,
    Gpio3,
    Gpio4,
    Gpio5,
    Gpio6,
    Dxb,
    Pxb,
    Cxb,
    Lsp,
    Jtag,
    Watchdog,
    Isp,
    Ccu,
    Cm0,
    IvsAclk,
    Adc,
    Ddr0,
    Ddr1,
    /// Placeholder for users that are not a specific device.
    Dummy,
}

/// Number of slots in the descriptor table.
pub const DEVICE_COUNT: usize = DeviceId::Dummy as usize + 1;

impl DeviceId {
    /// Table index of this device.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Device with the given table index, if there is one.
    pub fn from_index(index: usize) -> Option<DeviceId> {
        enum_iterator::all::<DeviceId>().nth(index)
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
