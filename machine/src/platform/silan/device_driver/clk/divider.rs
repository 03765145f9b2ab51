/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Bus divider resolution.
//!
//! A divider is a small select field choosing one of four candidate frequencies, each an
//! upstream rate divided by a fixed divisor. Reading the field resolves the rate; setting a
//! rate picks the candidate nearest to the request and writes its code.

use {
    super::{
        error::{InvalidSelectSnafu, Result},
        pll::Pll,
        registers::{sys_reg, RegisterBlock, CLK_SEL0, CLK_SEL1},
        Hertz,
    },
    crate::platform::silan::EXTERNAL_OSC_FREQ,
    tock_registers::{
        fields::Field,
        interfaces::{ReadWriteable, Readable},
    },
};

/// Candidates per divider select field.
pub const CANDIDATE_COUNT: usize = 4;

/// Bus dividers with a documented candidate table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Divider {
    /// Peripheral bar.
    Pxb,
    /// Low speed peripheral bus.
    Lsp,
    /// Power management unit clock, feeds the last LSP candidate.
    Pmu,
}

/// Where a candidate frequency comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Upstream {
    /// External crystal oscillator.
    Osc,
    Pll(Pll),
    Divider(Divider),
}

/// One entry of a divider's candidate table: `upstream / divisor`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub upstream: Upstream,
    pub divisor: Hertz,
}

const fn candidate(upstream: Upstream, divisor: Hertz) -> Candidate {
    Candidate { upstream, divisor }
}

const PXB_CANDIDATES: [Candidate; CANDIDATE_COUNT] = [
    candidate(Upstream::Pll(Pll::Video), 6),
    candidate(Upstream::Pll(Pll::System), 4),
    candidate(Upstream::Pll(Pll::System), 6),
    candidate(Upstream::Pll(Pll::System), 8),
];

const LSP_CANDIDATES: [Candidate; CANDIDATE_COUNT] = [
    candidate(Upstream::Pll(Pll::System), 10),
    candidate(Upstream::Pll(Pll::System), 8),
    candidate(Upstream::Pll(Pll::System), 16),
    candidate(Upstream::Divider(Divider::Pmu), 1),
];

const PMU_CANDIDATES: [Candidate; CANDIDATE_COUNT] = [
    candidate(Upstream::Osc, 1),
    candidate(Upstream::Osc, 8),
    candidate(Upstream::Osc, 64),
    candidate(Upstream::Osc, 512),
];

impl Upstream {
    fn rate(self, regs: &RegisterBlock) -> Hertz {
        match self {
            Upstream::Osc => EXTERNAL_OSC_FREQ,
            Upstream::Pll(pll) => pll.rate(regs),
            Upstream::Divider(divider) => divider.rate(regs),
        }
    }
}

impl Divider {
    /// Name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Divider::Pxb => "pxb",
            Divider::Lsp => "lsp",
            Divider::Pmu => "pmu",
        }
    }

    /// Word index of the select register.
    pub const fn register(self) -> usize {
        match self {
            Divider::Pxb | Divider::Lsp => sys_reg::CLK_SEL0,
            Divider::Pmu => sys_reg::CLK_SEL1,
        }
    }

    /// Select field within [`Self::register`].
    pub const fn field(self) -> Field<u32, ()> {
        match self {
            Divider::Pxb => Field::<u32, ()>::new(CLK_SEL0::PXB.mask, CLK_SEL0::PXB.shift),
            Divider::Lsp => Field::<u32, ()>::new(CLK_SEL0::LSP.mask, CLK_SEL0::LSP.shift),
            Divider::Pmu => Field::<u32, ()>::new(CLK_SEL1::PMU.mask, CLK_SEL1::PMU.shift),
        }
    }

    /// Candidate table indexed by select code.
    pub const fn candidates(self) -> &'static [Candidate; CANDIDATE_COUNT] {
        match self {
            Divider::Pxb => &PXB_CANDIDATES,
            Divider::Lsp => &LSP_CANDIDATES,
            Divider::Pmu => &PMU_CANDIDATES,
        }
    }

    /// Current select code.
    pub fn select(self, regs: &RegisterBlock) -> u32 {
        regs.SYS_REG[self.register()].read(self.field())
    }

    /// Candidate frequencies from the current PLL state.
    pub fn candidate_rates(self, regs: &RegisterBlock) -> [Hertz; CANDIDATE_COUNT] {
        let mut rates = [0; CANDIDATE_COUNT];
        for (rate, c) in rates.iter_mut().zip(self.candidates()) {
            *rate = c.upstream.rate(regs) / c.divisor;
        }
        rates
    }

    /// Resolve the divider output from its select code.
    pub fn try_rate(self, regs: &RegisterBlock) -> Result<Hertz> {
        #[cfg(feature = "fpga")]
        match self {
            Divider::Pxb => return Ok(Pll::System.rate(regs) * 3 / 2),
            Divider::Lsp => return Ok(Pll::System.rate(regs) * 3 / 4),
            Divider::Pmu => {}
        }

        let code = self.select(regs);
        match self.candidates().get(code as usize) {
            Some(c) => Ok(c.upstream.rate(regs) / c.divisor),
            None => InvalidSelectSnafu {
                what: self.name(),
                code,
            }
            .fail(),
        }
    }

    /// Resolve the divider output, reporting failures as 0.
    pub fn rate(self, regs: &RegisterBlock) -> Hertz {
        self.try_rate(regs).unwrap_or_else(|e| {
            log::error!("ERROR: {}: {}", self.name(), e);
            0
        })
    }

    /// Program the candidate nearest to `target` and return its select code.
    ///
    /// Always succeeds; there is no feasibility check, the caller reads the rate back to see
    /// what it got. Only the select field is written.
    pub fn set_rate(self, regs: &RegisterBlock, target: Hertz) -> u32 {
        #[cfg(feature = "fpga")]
        if matches!(self, Divider::Pxb | Divider::Lsp) {
            return self.select(regs);
        }

        let rates = self.candidate_rates(regs);
        let code = nearest(&rates, target) as u32;
        log::debug!(
            "{}: rate {} candidates {:?} fs {}",
            self.name(),
            target,
            rates,
            code
        );
        regs.SYS_REG[self.register()].modify(self.field().val(code));
        code
    }
}

/// Index of the candidate closest to `target`.
///
/// Ties go to the lowest index: the scan starts with index 0 as incumbent and only replaces
/// it on a strictly smaller distance. An empty slice yields 0.
pub fn nearest(candidates: &[Hertz], target: Hertz) -> usize {
    let mut best = 0;
    let mut best_dist = match candidates.first() {
        Some(&c) => c.abs_diff(target),
        None => return 0,
    };
    for (index, &c) in candidates.iter().enumerate().skip(1) {
        let dist = c.abs_diff(target);
        if dist < best_dist {
            best = index;
            best_dist = dist;
        }
    }
    best
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

    #[test]
    fn nearest_prefers_lowest_index_on_ties() {
        assert_eq!(nearest(&[10, 20, 30, 40], 15), 0);
        assert_eq!(nearest(&[10, 20, 30, 40], 16), 1);
        assert_eq!(nearest(&[40, 30, 20, 10], 25), 1);
        assert_eq!(nearest(&[7, 7, 7, 7], 1000), 0);
        assert_eq!(nearest(&[7], 0), 0);
        assert_eq!(nearest(&[], 5), 0);
    }

    #[test]
    fn nearest_matches_exhaustive_minimum() {
        let tables: [[Hertz; 4]; 3] = [
            [100_000_000, 150_000_000, 100_000_000, 75_000_000],
            [25_000_000, 30_000_000, 15_000_000, 27_000_000],
            [0, 0, 50, 50],
        ];
        for table in tables {
            for target in (0..200_000_000).step_by(1_234_567).chain([0, 50, 25]) {
                let chosen = nearest(&table, target);
                let best = table.iter().map(|c| c.abs_diff(target)).min().unwrap();
                assert_eq!(table[chosen].abs_diff(target), best);
                let first = table
                    .iter()
                    .position(|c| c.abs_diff(target) == best)
                    .unwrap();
                assert_eq!(chosen, first);
            }
        }
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn divider_rates_follow_select_codes() {
        let regs = FakeRegisters::new();
        let block = regs.block();
        // vpll 1188 MHz, spll 1000 MHz
        regs.set_sys(Pll::Video.cfg1(), 0);
        regs.set_sys(Pll::System.cfg1(), 0);

        let pxb = [198_000_000, 250_000_000, 166_666_666, 125_000_000];
        for (code, expect) in pxb.into_iter().enumerate() {
            regs.set_sys(sys_reg::CLK_SEL0, (code as u32) << 4);
            assert_eq!(Divider::Pxb.rate(&block), expect);
        }

        let lsp = [100_000_000, 125_000_000, 62_500_000, 27_000_000];
        for (code, expect) in lsp.into_iter().enumerate() {
            regs.set_sys(sys_reg::CLK_SEL0, (code as u32) << 12);
            assert_eq!(Divider::Lsp.rate(&block), expect);
        }

        let pmu = [27_000_000, 3_375_000, 421_875, 52_734];
        for (code, expect) in pmu.into_iter().enumerate() {
            regs.set_sys(sys_reg::CLK_SEL1, (code as u32) << 28);
            assert_eq!(Divider::Pmu.rate(&block), expect);
        }
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn lsp_follows_pmu_when_routed_to_it() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(sys_reg::CLK_SEL0, 3 << 12);
        regs.set_sys(sys_reg::CLK_SEL1, 1 << 28);
        assert_eq!(Divider::Lsp.rate(&block), 27_000_000 / 8);
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn undocumented_upstream_code_propagates_as_zero() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(Pll::System.cfg1(), 7 << 28);
        regs.set_sys(sys_reg::CLK_SEL0, 1 << 4);
        assert_eq!(Divider::Pxb.try_rate(&block), Ok(0));
        assert_eq!(Divider::Pxb.rate(&block), 0);
    }

    #[test]
    fn divider_select_fields_span_all_codes() {
        // 4-bit PXB/LSP fields can hold codes past the four-entry tables.
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(sys_reg::CLK_SEL0, 0x0000_9000);
        assert_eq!(Divider::Lsp.select(&block), 9);
        #[cfg(not(feature = "fpga"))]
        {
            assert_eq!(
                Divider::Lsp.try_rate(&block),
                Err(ClkError::InvalidSelect {
                    what: "lsp",
                    code: 9
                })
            );
            assert_eq!(Divider::Lsp.rate(&block), 0);
        }
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn set_rate_round_trips_through_get() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        for spll_code in 0..7 {
            regs.set_sys(Pll::System.cfg1(), spll_code << 28);
            for divider in [Divider::Pxb, Divider::Lsp, Divider::Pmu] {
                let rates = divider.candidate_rates(&block);
                for (index, &rate) in rates.iter().enumerate() {
                    let code = divider.set_rate(&block, rate);
                    // Equal candidates resolve to the first of them.
                    assert_eq!(code as usize, nearest(&rates, rate));
                    assert!(code as usize <= index);
                    assert_eq!(divider.rate(&block), rate);
                }
            }
        }
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn set_rate_writes_only_the_select_field() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(Pll::System.cfg1(), 0);
        regs.set_sys(sys_reg::CLK_SEL0, 0xffff_ffff);
        // spll/8 = 125 MHz is index 1 of LSP.
        assert_eq!(Divider::Lsp.set_rate(&block, 124_000_000), 1);
        assert_eq!(regs.sys(sys_reg::CLK_SEL0), 0xffff_1fff);

        regs.set_sys(sys_reg::CLK_SEL1, 0x0fff_ffff);
        assert_eq!(Divider::Pmu.set_rate(&block, 1), 3);
        assert_eq!(regs.sys(sys_reg::CLK_SEL1), 0x3fff_ffff);
    }

    #[cfg(not(feature = "fpga"))]
    #[test]
    fn set_rate_picks_nearest_pxb_candidate() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        // vpll/6 = 198 MHz, spll 1.2 GHz gives 300, 200, 150 MHz.
        regs.set_sys(Pll::System.cfg1(), 1 << 28);
        assert_eq!(Divider::Pxb.set_rate(&block, 199_500_000), 2);
        assert_eq!(Divider::Pxb.rate(&block), 200_000_000);
        assert_eq!(Divider::Pxb.set_rate(&block, 198_500_000), 0);
        assert_eq!(Divider::Pxb.rate(&block), 198_000_000);
        assert_eq!(Divider::Pxb.set_rate(&block, 0), 3);
        assert_eq!(Divider::Pxb.set_rate(&block, Hertz::MAX), 1);
    }

    #[cfg(feature = "fpga")]
    #[test]
    fn fpga_bus_dividers_scale_system_pll() {
        let regs = FakeRegisters::new();
        let block = regs.block();

        regs.set_sys(sys_reg::CLK_SEL0, 0x0000_f0f0);
        assert_eq!(Divider::Pxb.rate(&block), 45_000_000);
        assert_eq!(Divider::Lsp.rate(&block), 22_500_000);
        Divider::Pxb.set_rate(&block, 1);
        Divider::Lsp.set_rate(&block, 1);
        assert_eq!(regs.sys(sys_reg::CLK_SEL0), 0x0000_f0f0);
    }
}
