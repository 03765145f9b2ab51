/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! SC8925 system control register map.
//!
//! The system control block is a flat array of 49 words `SYS_REG0..SYS_REG48`. Clock enable
//! bits are scattered across the low banks (see [`super::ids::ClockId`]), so the block is
//! modelled as an array and the words that carry bit-fields get a typed view through
//! `LocalRegisterCopy` with the layouts below.

use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

/// Number of words in the system control block.
pub const SYS_REG_COUNT: usize = 49;

/// Word indices into [`RegisterBlock::SYS_REG`].
pub mod sys_reg {
    /// Module clock enable register 0, first of the gate banks.
    pub const CLK_EN0: usize = 0;
    /// Module clock select register 0.
    pub const CLK_SEL0: usize = 2;
    /// Module clock select register 1.
    pub const CLK_SEL1: usize = 3;
    /// Module clock select register 2 (audio).
    pub const AUDIO_SEL: usize = 4;
    /// Audio PLL configuration.
    pub const APLL_CFG0: usize = 5;
    pub const APLL_CFG1: usize = 6;
    /// Video display PLL configuration.
    pub const VPLL_CFG0: usize = 7;
    pub const VPLL_CFG1: usize = 8;
    /// First DDR PLL configuration.
    pub const PPLL_CFG0: usize = 9;
    pub const PPLL_CFG1: usize = 10;
    /// Module clock select register 2.
    pub const CLK_SEL2: usize = 11;
    /// SDIO sample / SDRAM delay configuration.
    pub const SAMPLE_CFG: usize = 31;
    /// System PLL configuration.
    pub const SPLL_CFG0: usize = 32;
    pub const SPLL_CFG1: usize = 33;
    /// Module clock select register 3.
    pub const CLK_SEL3: usize = 42;
    /// Second DDR PLL configuration.
    pub const DPLL_CFG0: usize = 44;
    pub const DPLL_CFG1: usize = 45;
}

register_bitfields! {
    u32,

    /// Module Clock Select Register 0 (SYS_REG2)
    pub CLK_SEL0 [
        DXB OFFSET(0) NUMBITS(4) [],
        /// Peripheral bar divider select.
        PXB OFFSET(4) NUMBITS(4) [],
        VJB OFFSET(8) NUMBITS(4) [],
        /// Low speed peripheral bus divider select.
        LSP OFFSET(12) NUMBITS(4) [],
        VPU OFFSET(16) NUMBITS(4) [],
        GPU OFFSET(20) NUMBITS(4) [],
        JPU OFFSET(24) NUMBITS(4) [],
        VPP OFFSET(28) NUMBITS(4) []
    ],

    /// Module Clock Select Register 1 (SYS_REG3)
    pub CLK_SEL1 [
        DSP0 OFFSET(0) NUMBITS(4) [],
        DSP1 OFFSET(4) NUMBITS(4) [],
        SD OFFSET(8) NUMBITS(4) [],
        EMMC OFFSET(12) NUMBITS(4) [],
        SDIO OFFSET(16) NUMBITS(4) [],
        VIU OFFSET(20) NUMBITS(4) [],
        DIT OFFSET(24) NUMBITS(4) [],
        /// Power management unit clock, a power-of-eight division of the oscillator.
        PMU OFFSET(28) NUMBITS(2) [
            Osc = 0,
            OscDiv8 = 1,
            OscDiv64 = 2,
            OscDiv512 = 3
        ],
        SDRAM OFFSET(30) NUMBITS(2) []
    ],

    /// Module Clock Select Register 2, audio (SYS_REG4)
    pub AUDIO_SEL [
        AM OFFSET(0) NUMBITS(1) [],
        SPDIF OFFSET(2) NUMBITS(2) [],
        I2SHDMI OFFSET(4) NUMBITS(3) [],
        I2SMIC OFFSET(7) NUMBITS(3) [],
        I2ST4 OFFSET(12) NUMBITS(3) [],
        HS_SEL OFFSET(20) NUMBITS(1) [],
        HS_EN OFFSET(21) NUMBITS(1) [],
        SPDIF_EN OFFSET(22) NUMBITS(1) [],
        I2SHDMI_FS_EN OFFSET(23) NUMBITS(1) [],
        I2SHDMI_BIT_EN OFFSET(24) NUMBITS(1) [],
        I2SHDMI_M_EN OFFSET(25) NUMBITS(1) [],
        I2SMIC_M_EN OFFSET(26) NUMBITS(1) [],
        I2ST4_FS_EN OFFSET(29) NUMBITS(1) [],
        I2ST4_BIT_EN OFFSET(30) NUMBITS(1) [],
        I2ST4_M_EN OFFSET(31) NUMBITS(1) []
    ],

    /// PLL Configure Register 0, same layout for every PLL in the block
    pub PLL_CFG0 [
        /// Power down
        PD OFFSET(0) NUMBITS(1) [],
        /// Bypass, output follows the reference
        BP OFFSET(2) NUMBITS(1) [],
        FOUTPOSTDIVPD OFFSET(4) NUMBITS(1) [],
        FOUT4PHASEPD OFFSET(5) NUMBITS(1) [],
        FOUTVCOPD OFFSET(6) NUMBITS(1) [],
        TESTOUTEN OFFSET(7) NUMBITS(1) [],
        FRAC OFFSET(8) NUMBITS(24) []
    ],

    /// PLL Configure Register 1 of the system and DDR PLLs.
    /// Fosc = 27MHz, Fref = Fosc, Fout = Fref * NF / NR / OD
    pub PLL_CFG1 [
        CLKR OFFSET(0) NUMBITS(6) [],
        CLKF OFFSET(6) NUMBITS(12) [],
        CLKOD1 OFFSET(19) NUMBITS(3) [],
        CLKOD2 OFFSET(22) NUMBITS(3) [],
        DSMPD OFFSET(25) NUMBITS(1) [],
        /// Frequency select, indexes the documented frequency table
        CS OFFSET(28) NUMBITS(3) []
    ],

    /// PLL Configure Register 1 of the audio and video PLLs, with a narrower select field.
    pub AVPLL_CFG1 [
        CLKR OFFSET(0) NUMBITS(6) [],
        CLKF OFFSET(6) NUMBITS(12) [],
        CLKOD1 OFFSET(19) NUMBITS(3) [],
        CLKOD2 OFFSET(22) NUMBITS(3) [],
        DSMPD OFFSET(25) NUMBITS(1) [],
        CS OFFSET(28) NUMBITS(2) []
    ],

    /// Module Clock Select Register 2 (SYS_REG11)
    pub CLK_SEL2 [
        LCD OFFSET(0) NUMBITS(6) [],
        SECDMX OFFSET(8) NUMBITS(4) [],
        SPU OFFSET(20) NUMBITS(4) [],
        HPU_SPU_BUS OFFSET(24) NUMBITS(4) [],
        GPU_BUS OFFSET(28) NUMBITS(4) []
    ],

    /// SDIO sample and SDRAM delay configuration (SYS_REG31)
    pub SAMPLE_CFG [
        SDIO_SAMPLE_CFG OFFSET(0) NUMBITS(5) [],
        SDRAM_DEL_CFG OFFSET(16) NUMBITS(16) []
    ],

    /// Module Clock Select Register 3 (SYS_REG42)
    pub CLK_SEL3 [
        MPU OFFSET(8) NUMBITS(4) [],
        MPU_BUS OFFSET(12) NUMBITS(4) [],
        VIP_ACLK OFFSET(16) NUMBITS(4) [],
        VPREP OFFSET(20) NUMBITS(4) [],
        VENC OFFSET(24) NUMBITS(4) [],
        FDIP OFFSET(28) NUMBITS(4) []
    ],

    /// LSP misc control
    pub LSP_CTRL [
        WATCHDOG_ON OFFSET(0) NUMBITS(1) [],
        // Timer enables below are broken in silicon, the timer is gated through the
        // generic enable bank instead.
        TIMCLK_ON0 OFFSET(1) NUMBITS(1) [],
        TIMCLK_ON1 OFFSET(2) NUMBITS(1) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    pub RegisterBlock {
        (0x00 => pub SYS_REG: [ReadWrite<u32>; 49]),
        (0xc4 => @END),
    }
}

register_structs! {
    #[allow(non_snake_case)]
    pub LspRegisterBlock {
        (0x00 => pub CTRL: ReadWrite<u32, LSP_CTRL::Register>),
        (0x04 => @END),
    }
}

static_assertions::const_assert_eq!(SYS_REG_COUNT * 4, 0xc4);

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {super::*, tock_registers::LocalRegisterCopy};

    #[test]
    fn select_fields_decode_at_documented_offsets() {
        let sel = LocalRegisterCopy::<u32, CLK_SEL0::Register>::new(0x0000_3020);
        assert_eq!(sel.read(CLK_SEL0::PXB), 2);
        assert_eq!(sel.read(CLK_SEL0::LSP), 3);
        assert_eq!(sel.read(CLK_SEL0::DXB), 0);

        let sel = LocalRegisterCopy::<u32, CLK_SEL1::Register>::new(0xe000_0000);
        assert_eq!(sel.read(CLK_SEL1::PMU), 2);
        assert_eq!(sel.read(CLK_SEL1::SDRAM), 3);
    }

    #[test]
    fn pll_select_widths_differ_per_pll() {
        let word = 0x7000_0000;
        assert_eq!(
            LocalRegisterCopy::<u32, PLL_CFG1::Register>::new(word).read(PLL_CFG1::CS),
            7
        );
        assert_eq!(
            LocalRegisterCopy::<u32, AVPLL_CFG1::Register>::new(word).read(AVPLL_CFG1::CS),
            3
        );
    }
}
