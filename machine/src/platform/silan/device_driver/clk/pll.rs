/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! PLL frequency resolution.
//!
//! PLL output frequencies are not derived from the NF/NR/OD fields at runtime. Each PLL has a
//! short table of trimmed frequencies indexed by its `CS` select code, and that table is the
//! only source of truth. [`PllConfig`] decodes the rest of the configuration word for
//! diagnostics only.

use {
    super::{
        error::{NoFrequencyTableSnafu, Result},
        registers::{sys_reg, RegisterBlock, AVPLL_CFG1, PLL_CFG0, PLL_CFG1},
        Hertz,
    },
    enum_iterator::Sequence,
    tock_registers::{interfaces::Readable, LocalRegisterCopy},
};

#[cfg(not(feature = "fpga"))]
use super::error::InvalidSelectSnafu;

/// Video display PLL frequencies by select code.
const VIDEO_PLL_TABLE: [Hertz; 2] = [1_188_000_000, 1_186_816_000];

/// System PLL frequencies by select code.
const SYSTEM_PLL_TABLE: [Hertz; 7] = [
    1_000_000_000,
    1_200_000_000,
    800_000_000,
    900_000_000,
    720_000_000,
    600_000_000,
    400_000_000,
];

/// PLLs of the system control block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Sequence)]
pub enum Pll {
    /// Audio PLL.
    Audio,
    /// Video display PLL.
    Video,
    /// First DDR PLL.
    Ddr0,
    /// System PLL, feeds most bus dividers.
    System,
    /// Second DDR PLL.
    Ddr1,
}

/// Decoded second PLL configuration word.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PllConfig {
    /// Reference divider (NR).
    pub clkr: u32,
    /// Feedback divider (NF).
    pub clkf: u32,
    /// First output divider stage.
    pub clkod1: u32,
    /// Second output divider stage.
    pub clkod2: u32,
    /// Delta-sigma modulator power down.
    pub dsmpd: bool,
    /// Frequency select code.
    pub cs: u32,
}

/// Decoded power and bypass state from the first PLL configuration word.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PllControl {
    pub powered_down: bool,
    pub bypass: bool,
    pub frac: u32,
}

impl Pll {
    /// Name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Pll::Audio => "apll",
            Pll::Video => "vpll",
            Pll::Ddr0 => "ppll",
            Pll::System => "spll",
            Pll::Ddr1 => "dpll",
        }
    }

    /// Word index of the first (control) configuration register.
    pub const fn cfg0(self) -> usize {
        match self {
            Pll::Audio => sys_reg::APLL_CFG0,
            Pll::Video => sys_reg::VPLL_CFG0,
            Pll::Ddr0 => sys_reg::PPLL_CFG0,
            Pll::System => sys_reg::SPLL_CFG0,
            Pll::Ddr1 => sys_reg::DPLL_CFG0,
        }
    }

    /// Word index of the second (divider and select) configuration register.
    pub const fn cfg1(self) -> usize {
        match self {
            Pll::Audio => sys_reg::APLL_CFG1,
            Pll::Video => sys_reg::VPLL_CFG1,
            Pll::Ddr0 => sys_reg::PPLL_CFG1,
            Pll::System => sys_reg::SPLL_CFG1,
            Pll::Ddr1 => sys_reg::DPLL_CFG1,
        }
    }

    /// Documented frequency table, indexed by select code.
    pub const fn frequency_table(self) -> Option<&'static [Hertz]> {
        match self {
            Pll::Video => Some(&VIDEO_PLL_TABLE),
            Pll::System => Some(&SYSTEM_PLL_TABLE),
            Pll::Audio | Pll::Ddr0 | Pll::Ddr1 => None,
        }
    }

    /// Extract the select code from a second configuration word.
    /// Audio and video PLLs have a 2-bit select field, the rest 3 bits.
    pub fn select(self, cfg1: u32) -> u32 {
        match self {
            Pll::Audio | Pll::Video => {
                LocalRegisterCopy::<u32, AVPLL_CFG1::Register>::new(cfg1).read(AVPLL_CFG1::CS)
            }
            Pll::Ddr0 | Pll::System | Pll::Ddr1 => {
                LocalRegisterCopy::<u32, PLL_CFG1::Register>::new(cfg1).read(PLL_CFG1::CS)
            }
        }
    }

    /// Resolve the PLL output frequency from its table.
    pub fn try_rate(self, regs: &RegisterBlock) -> Result<Hertz> {
        resolve(self, regs)
    }

    /// Resolve the PLL output frequency, reporting failures as 0.
    ///
    /// 0 means "unknown". An undocumented select code is a hardware description bug, not
    /// something a caller can fix, so it is logged here and the sentinel returned.
    pub fn rate(self, regs: &RegisterBlock) -> Hertz {
        self.try_rate(regs).unwrap_or_else(|e| {
            log::error!("ERROR: {}: {}", self.name(), e);
            0
        })
    }

    /// Decode the current configuration words of this PLL.
    pub fn config(self, regs: &RegisterBlock) -> (PllControl, PllConfig) {
        let cfg1 = regs.SYS_REG[self.cfg1()].get();
        let config = PllConfig {
            cs: self.select(cfg1),
            ..PllConfig::decode(cfg1)
        };
        (
            PllControl::decode(regs.SYS_REG[self.cfg0()].get()),
            config,
        )
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "fpga")] {
        // The FPGA build has no PLLs behind the configuration registers.
        fn resolve(pll: Pll, _regs: &RegisterBlock) -> Result<Hertz> {
            match pll {
                Pll::Video => Ok(38_000_000),
                Pll::System => Ok(30_000_000),
                Pll::Audio | Pll::Ddr0 | Pll::Ddr1 => {
                    NoFrequencyTableSnafu { pll: pll.name() }.fail()
                }
            }
        }
    } else {
        fn resolve(pll: Pll, regs: &RegisterBlock) -> Result<Hertz> {
            let Some(table) = pll.frequency_table() else {
                return NoFrequencyTableSnafu { pll: pll.name() }.fail();
            };
            let code = pll.select(regs.SYS_REG[pll.cfg1()].get());
            match table.get(code as usize) {
                Some(&freq) => Ok(freq),
                None => InvalidSelectSnafu {
                    what: pll.name(),
                    code,
                }
                .fail(),
            }
        }
    }
}

impl PllConfig {
    /// Decode a second configuration word using the wide (3-bit) select layout.
    pub fn decode(word: u32) -> Self {
        let reg = LocalRegisterCopy::<u32, PLL_CFG1::Register>::new(word);
        Self {
            clkr: reg.read(PLL_CFG1::CLKR),
            clkf: reg.read(PLL_CFG1::CLKF),
            clkod1: reg.read(PLL_CFG1::CLKOD1),
            clkod2: reg.read(PLL_CFG1::CLKOD2),
            dsmpd: reg.is_set(PLL_CFG1::DSMPD),
            cs: reg.read(PLL_CFG1::CS),
        }
    }

    /// Encode into a second configuration word. Out of range values are truncated to
    /// their field width.
    pub fn encode(&self) -> u32 {
        let mut reg = LocalRegisterCopy::<u32, PLL_CFG1::Register>::new(0);
        reg.modify(
            PLL_CFG1::CLKR.val(self.clkr)
                + PLL_CFG1::CLKF.val(self.clkf)
                + PLL_CFG1::CLKOD1.val(self.clkod1)
                + PLL_CFG1::CLKOD2.val(self.clkod2)
                + PLL_CFG1::DSMPD.val(self.dsmpd as u32)
                + PLL_CFG1::CS.val(self.cs),
        );
        reg.get()
    }
}

impl PllControl {
    /// Decode a first configuration word.
    pub fn decode(word: u32) -> Self {
        let reg = LocalRegisterCopy::<u32, PLL_CFG0::Register>::new(word);
        Self {
            powered_down: reg.is_set(PLL_CFG0::PD),
            bypass: reg.is_set(PLL_CFG0::BP),
            frac: reg.read(PLL_CFG0::FRAC),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::platform::silan::device_driver::clk::{error::ClkError, fake::FakeRegisters},
    };

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn documented_codes_resolve_to_table_constants() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        let expect = [
            (Pll::Video, 0, 1_188_000_000),
            (Pll::Video, 1, 1_186_816_000),
            (Pll::System, 0, 1_000_000_000),
            (Pll::System, 1, 1_200_000_000),
            (Pll::System, 2, 800_000_000),
            (Pll::System, 3, 900_000_000),
            (Pll::System, 4, 720_000_000),
            (Pll::System, 5, 600_000_000),
            (Pll::System, 6, 400_000_000),
        ];
        for (pll, code, freq) in expect {
            regs.set_sys(pll.cfg1(), code << 28);
            assert_eq!(pll.try_rate(&block), Ok(freq));
            assert_eq!(pll.rate(&block), freq);
        }
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn undocumented_codes_resolve_to_zero_without_touching_registers() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        for (pll, code) in [(Pll::Video, 2), (Pll::Video, 3), (Pll::System, 7)] {
            let word = (code << 28) | 0x0012_3456;
            regs.set_sys(pll.cfg1(), word);
            assert_eq!(
                pll.try_rate(&block),
                Err(ClkError::InvalidSelect {
                    what: pll.name(),
                    code
                })
            );
            assert_eq!(pll.rate(&block), 0);
            assert_eq!(regs.sys(pll.cfg1()), word);
        }
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn select_ignores_neighbouring_config_fields() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        // CS=1 with every other field of the word saturated.
        regs.set_sys(Pll::System.cfg1(), 0x8fff_ffff | (1 << 28));
        assert_eq!(Pll::System.rate(&block), 1_200_000_000);

        // Bit 30 belongs to nothing on the video PLL; a 2-bit read must not see it.
        regs.set_sys(Pll::Video.cfg1(), (1 << 30) | (1 << 28));
        assert_eq!(Pll::Video.rate(&block), 1_186_816_000);
    }

    #[cfg(feature = "fpga")]
    #[test]
    fn fpga_build_reports_fixed_frequencies() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(Pll::System.cfg1(), 7 << 28);
        assert_eq!(Pll::Video.rate(&block), 38_000_000);
        assert_eq!(Pll::System.rate(&block), 30_000_000);
    }

    #[test]
    fn plls_without_table_report_unknown() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        for pll in [Pll::Audio, Pll::Ddr0, Pll::Ddr1] {
            assert_eq!(
                pll.try_rate(&block),
                Err(ClkError::NoFrequencyTable { pll: pll.name() })
            );
            assert_eq!(pll.rate(&block), 0);
        }
    }

    #[test]
    fn config_word_decodes_and_encodes() {
        // clkr=3, clkf=0x58, od1=2, od2=1, dsmpd=1, cs=4
        let word = 3 | (0x58 << 6) | (2 << 19) | (1 << 22) | (1 << 25) | (4 << 28);
        let config = PllConfig::decode(word);
        assert_eq!(
            config,
            PllConfig {
                clkr: 3,
                clkf: 0x58,
                clkod1: 2,
                clkod2: 1,
                dsmpd: true,
                cs: 4,
            }
        );
        assert_eq!(config.encode(), word);

        let wide = PllConfig {
            clkr: 0x7f,
            ..PllConfig::default()
        };
        assert_eq!(wide.encode(), 0x3f);
    }

    #[test]
    fn control_word_decodes_power_state() {
        let control = PllControl::decode(0x00ab_cd05);
        assert!(control.powered_down);
        assert!(control.bypass);
        assert_eq!(control.frac, 0xabcd);
    }

    #[test]
    fn config_reads_narrow_select_for_video_pll() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(Pll::Video.cfg1(), (1 << 30) | (1 << 28) | 5);
        let (_, config) = Pll::Video.config(&block);
        assert_eq!(config.cs, 1);
        assert_eq!(config.clkr, 5);
    }
}
