// Licensed under the Apache-2.0 license

//! Verilog instantiation wrapper emitter.
//!
//! Emits the net declarations, the terminal-select write-enable gate, and
//! the module instantiation that wires a generated register module into the
//! surrounding fabric.

use crate::emit::write_file;
use anyhow::Result;
use regmap_model::{Mode, Terminal};
use std::io::Write;
use std::path::Path;

/// External signal bindings for an instantiation. Each signal is
/// independently nameable; the defaults match the device-interface fabric
/// conventions.
#[derive(Clone, Debug)]
pub struct InstanceSignals {
    /// Clock. Default `di_clk`.
    pub clk: String,
    /// Active-low reset. Default `resetb`.
    pub resetb: String,
    /// Write enable. Default `di_write`.
    pub we: String,
    /// Terminal-select address bus. Default `di_term_addr`.
    pub term_addr: String,
    /// Register address bus. Default `di_reg_addr`.
    pub reg_addr: String,
    /// Write data bus. Default `di_reg_datai`.
    pub datai: String,
    /// Shadow synchronization pulse. Default `shadow_sync`.
    pub shadow_sync: String,
}

impl Default for InstanceSignals {
    fn default() -> Self {
        Self {
            clk: "di_clk".to_string(),
            resetb: "resetb".to_string(),
            we: "di_write".to_string(),
            term_addr: "di_term_addr".to_string(),
            reg_addr: "di_reg_addr".to_string(),
            datai: "di_reg_datai".to_string(),
            shadow_sync: "shadow_sync".to_string(),
        }
    }
}

/// Emit the instantiation wrapper for `term`'s register module.
pub fn write_verilog_instance<W: Write + ?Sized>(
    term: &Terminal,
    module: &str,
    signals: &InstanceSignals,
    out: &mut W,
) -> Result<()> {
    term.validate()?;
    let shadowed = term.has_shadowed();

    // Nets for everything the module drives: subregister wires, register
    // wires, and per-element aliases for arrayed multi-bit registers.
    for reg in &term.registers {
        if reg.mode != Mode::Write {
            continue;
        }
        for sub in &reg.subregs {
            if sub.width > 1 {
                writeln!(out, "  wire [{}:0] {};", sub.width - 1, sub.vlog_name)?;
            } else {
                writeln!(out, "  wire {};", sub.vlog_name)?;
            }
        }
        write!(out, "  wire ")?;
        if reg.width > 1 || reg.array > 1 {
            write!(out, "[{}:0] ", reg.width * reg.array - 1)?;
        }
        writeln!(out, "{};", reg.name)?;
        if reg.array > 1 && reg.width > 1 {
            for index in 0..reg.array {
                writeln!(
                    out,
                    "  wire [{}:0] {}{} = {}[{}:{}];",
                    reg.width - 1,
                    reg.name,
                    index,
                    reg.name,
                    reg.width * (index + 1) - 1,
                    reg.width * index
                )?;
            }
        }
    }

    writeln!(
        out,
        "  wire [{}:0] {}_reg_datao;",
        term.reg_data_width - 1,
        module
    )?;
    writeln!(
        out,
        "  wire {}_{} = {} && ({} == {});",
        signals.we, module, signals.we, signals.term_addr, term.addr
    )?;

    writeln!(out, "  {module} {module}(")?;
    writeln!(out, "     .clk({}),", signals.clk)?;
    writeln!(out, "     .resetb({}),", signals.resetb)?;
    if shadowed {
        writeln!(out, "     .shadow_sync({}),", signals.shadow_sync)?;
    }
    writeln!(out, "     .we({}_{}),", signals.we, module)?;
    writeln!(
        out,
        "     .addr({}[{}:0]),",
        signals.reg_addr,
        term.reg_addr_width - 1
    )?;
    writeln!(out, "     .datai({}),", signals.datai)?;
    writeln!(out, "     .datao({}_reg_datao),", module)?;
    writeln!(out)?;

    // Register and subregister ports in declaration order. The final port
    // must not be followed by a comma.
    let nregs = term.registers.len();
    for (i, reg) in term.registers.iter().enumerate() {
        let last_reg = i + 1 == nregs;
        if reg.is_decomposed() {
            let nsubs = reg.subregs.len();
            for (j, sub) in reg.subregs.iter().enumerate() {
                write!(out, "     .{}({})", sub.vlog_name, sub.vlog_name)?;
                if j + 1 != nsubs || !last_reg || reg.mode == Mode::Write {
                    write!(out, ",")?;
                }
                writeln!(out)?;
            }
            if reg.mode == Mode::Write {
                write!(out, "     .{}({})", reg.name, reg.name)?;
                if !last_reg {
                    write!(out, ",")?;
                }
                writeln!(out)?;
            }
        } else {
            write!(out, "     .{}({})", reg.name, reg.name)?;
            if !last_reg {
                write!(out, ",")?;
            }
            writeln!(out)?;
        }
    }
    writeln!(out, "     );")?;
    writeln!(out)?;
    Ok(())
}

/// Emit the instantiation wrapper for `term` to a file at `path`.
pub fn generate_verilog_instance(
    term: &Terminal,
    module: &str,
    signals: &InstanceSignals,
    path: &Path,
) -> Result<()> {
    term.validate()?;
    write_file(path, |out| {
        write_verilog_instance(term, module, signals, out)
    })
}
