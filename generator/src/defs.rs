// Licensed under the Apache-2.0 license

//! Verilog `` `define `` constants header emitter.
//!
//! One block per terminal: the terminal-select address and address-bus
//! width, then per register one address constant per bus word per array
//! element, a width constant, an array-size constant for arrays, the value
//! map entries, and a `hi:lo` range constant per subregister.

use crate::addr::{extra_words, word_address};
use crate::emit::{guard_ident, write_file};
use anyhow::Result;
use regmap_model::DeviceInterface;
use std::io::Write;
use std::path::Path;

/// Emit the Verilog constants header for `di`.
pub fn write_verilog_defs<W: Write + ?Sized>(
    di: &DeviceInterface,
    module: &str,
    out: &mut W,
) -> Result<()> {
    di.validate()?;
    let guard = format!("_{}_DEFS_", guard_ident(module));
    writeln!(out, "// This file is auto-generated. Do not edit.")?;
    writeln!(out, "`ifndef {guard}")?;
    writeln!(out, "`define {guard}")?;
    writeln!(out)?;

    for term in &di.terminals {
        writeln!(out, "{}", "/".repeat(75))?;
        writeln!(out, "`define TERM_{} {}", term.name, term.addr)?;
        writeln!(
            out,
            "`define   TERM_{}_ADDR_WIDTH {}",
            term.name, term.reg_addr_width
        )?;
        for reg in &term.registers {
            let w = extra_words(reg.width, term.reg_data_width);
            for array_index in 0..reg.array {
                for i in (0..=w).rev() {
                    let value = word_address(term, reg, array_index, i);
                    if reg.array > 1 {
                        write!(out, "`define   {}_{}{}", term.name, reg.name, array_index)?;
                        if w > 0 {
                            write!(out, "_{i}")?;
                        }
                        writeln!(out, " {value}")?;
                    } else {
                        write!(out, "`define   {}_{}", term.name, reg.name)?;
                        if w > 0 {
                            write!(out, "_{i}")?;
                        }
                        writeln!(out, " {value}")?;
                        if w > 0 && i == 0 {
                            // Unsuffixed alias for the register's base address.
                            writeln!(out, "`define   {}_{} {}", term.name, reg.name, reg.addr)?;
                        }
                    }
                }
            }
            writeln!(
                out,
                "`define      WIDTH_{}_{} {}",
                term.name, reg.name, reg.width
            )?;
            if reg.array > 1 {
                writeln!(
                    out,
                    "`define      ARRAY_SIZE_{}_{} {}",
                    term.name, reg.name, reg.array
                )?;
            }
            if let Some(map) = &reg.valuemap {
                for (key, value) in map.iter() {
                    writeln!(out, "`define       {}_{}_{} {}", term.name, reg.name, key, value)?;
                }
            }
            for sub in &reg.subregs {
                writeln!(
                    out,
                    "`define     {}_{}_{} {}:{}",
                    term.name,
                    reg.name,
                    sub.name,
                    sub.msb(),
                    sub.addr
                )?;
            }
        }
        writeln!(out)?;
        writeln!(out)?;
    }
    writeln!(out, "`endif")?;
    Ok(())
}

/// Emit the Verilog constants header for `di` to a file at `path`.
pub fn generate_verilog_defs(di: &DeviceInterface, module: &str, path: &Path) -> Result<()> {
    di.validate()?;
    write_file(path, |out| write_verilog_defs(di, module, out))
}
