/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

use {
    anyhow::{anyhow, bail, Context, Result},
    clap::{Arg, ArgAction, Command},
    colored::*,
    prettytable::{row, Table},
    sc8925::{
        clk::{
            divider::Divider,
            ids::ClockId,
            pll::Pll,
            registers::SYS_REG_COUNT,
            tree::{self, ClockNode},
            ClockController, Hertz,
        },
        platform::silan::memory::map::{CR_BASE, LSP_CTRL_BASE},
    },
    std::{fs, path::Path},
};

// clksum /path/to/regs.dump
fn main() -> Result<()> {
    let matches = Command::new("clksum - SC8925 clock summary")
        .about("Print the clock tree state captured in a register dump")
        .disable_version_flag(true)
        .arg(
            Arg::new("dump")
                .help("Register dump, one `address value` pair per line")
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every register query")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
        .map_err(|e| anyhow!("{}", e))?;

    let dump_path = matches
        .get_one::<String>("dump")
        .ok_or_else(|| anyhow!("register dump must be specified"))?;

    let mut dump = RegisterDump::load(Path::new(dump_path))?;
    // SAFETY: the controller only lives for this scope, the dump outlives it.
    let clk = unsafe { dump.controller() };

    print_plls(&clk);
    print_dividers(&clk);
    print_clocks(&clk);

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Register dump
//--------------------------------------------------------------------------------------------------

/// System control words followed by the LSP control word.
struct RegisterDump {
    words: Vec<u32>,
}

impl RegisterDump {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read register dump {}", path.display()))?;
        Self::parse(&text)
    }

    /// Parse `address value` lines. Addresses are either absolute (system control or LSP
    /// control block) or offsets into the system control block. `#` starts a comment.
    fn parse(text: &str) -> Result<Self> {
        let mut words = vec![0; SYS_REG_COUNT + 1];
        for (number, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(address), Some(value), None) = (fields.next(), fields.next(), fields.next())
            else {
                bail!("line {}: expected `address value`", number + 1);
            };
            let address = parse_number(address).with_context(|| format!("line {}", number + 1))?;
            let value = parse_number(value).with_context(|| format!("line {}", number + 1))?;
            let index = word_index(address).ok_or_else(|| {
                anyhow!("line {}: {:#x} is not a clock register", number + 1, address)
            })?;
            words[index] = u32::try_from(value).with_context(|| {
                format!("line {}: value {:#x} is wider than 32 bits", number + 1, value)
            })?;
        }
        Ok(Self { words })
    }

    /// # Safety
    ///
    /// The controller must not outlive `self`.
    unsafe fn controller(&mut self) -> ClockController {
        let base = self.words.as_mut_ptr();
        ClockController::new(base as usize, base.add(SYS_REG_COUNT) as usize)
    }
}

fn parse_number(text: &str) -> Result<u64> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.with_context(|| format!("invalid number `{}`", text))
}

fn word_index(address: u64) -> Option<usize> {
    let sys_len = (SYS_REG_COUNT * 4) as u64;
    let cr_base = CR_BASE as u64;
    let word = |offset: u64| (offset % 4 == 0).then_some((offset / 4) as usize);
    match address {
        a if a == LSP_CTRL_BASE as u64 => Some(SYS_REG_COUNT),
        a if a < sys_len => word(a),
        a if (cr_base..cr_base + sys_len).contains(&a) => word(a - cr_base),
        _ => None,
    }
}

//--------------------------------------------------------------------------------------------------
// Output
//--------------------------------------------------------------------------------------------------

fn mhz(rate: Hertz) -> String {
    if rate == 0 {
        "unknown".yellow().to_string()
    } else {
        format!("{}.{:06} MHz", rate / 1_000_000, rate % 1_000_000)
    }
}

fn gate_names(node: &ClockNode) -> String {
    node.gate_ids()
        .map(|id| match id {
            ClockId::Watchdog => "lsp:0".to_string(),
            _ => format!("{}:{}", id.bank(), id.bit()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_plls(clk: &ClockController) {
    let mut table = Table::new();
    table.set_titles(row!["PLL", "CS", "NR", "NF", "OD1", "OD2", "PD", "BP", "Rate"]);
    for pll in enum_iterator::all::<Pll>() {
        let (control, config) = clk.pll_config(pll);
        table.add_row(row![
            pll.name(),
            config.cs,
            config.clkr,
            config.clkf,
            config.clkod1,
            config.clkod2,
            control.powered_down,
            control.bypass,
            mhz(clk.pll_rate(pll))
        ]);
    }
    table.printstd();
}

fn print_dividers(clk: &ClockController) {
    let mut table = Table::new();
    table.set_titles(row!["Divider", "Rate"]);
    for divider in [Divider::Pxb, Divider::Lsp, Divider::Pmu] {
        table.add_row(row![divider.name(), mhz(clk.divider_rate(divider))]);
    }
    table.printstd();
}

fn print_clocks(clk: &ClockController) {
    let mut table = Table::new();
    table.set_titles(row!["Id", "Device", "Parent", "Gates", "State", "Rate"]);
    for (device, node) in tree::populated() {
        let parent = node.parent.and_then(tree::node).map_or("-", |p| p.name);
        let state = match clk.is_enabled(device) {
            Ok(true) => "on".green(),
            Ok(false) => "off".red(),
            Err(_) => "-".normal(),
        };
        let rate = clk.rate(device).map_or_else(|_| "-".to_string(), mhz);
        table.add_row(row![
            device.index(),
            node.name,
            parent,
            gate_names(node),
            state,
            rate
        ]);
    }
    table.printstd();
}

//--------------------------------------------------------------------------------------------------
// Logging
//--------------------------------------------------------------------------------------------------

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            log::Level::Error => "error".red(),
            log::Level::Warn => "warn".yellow(),
            log::Level::Info => "info".green(),
            log::Level::Debug | log::Level::Trace => "debug".normal(),
        };
        eprintln!("[{}] {}", level, record.args());
    }

    fn flush(&self) {}
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
