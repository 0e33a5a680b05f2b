// Licensed under the Apache-2.0 license

//! C `#define` constants header emitter.
//!
//! The software twin of [`crate::defs`]: the same terminal and register
//! address constants with upper-cased names, a width constant, an
//! array-size constant for arrays, and upper-cased value map entries.
//! Bit-range constants are an RTL concern and are not emitted here. The
//! registers-only mode suppresses the terminal-level constants for builds
//! that define terminal addressing elsewhere.

use crate::addr::{extra_words, word_address};
use crate::emit::{guard_ident, write_file};
use anyhow::{anyhow, Result};
use regmap_model::DeviceInterface;
use std::io::Write;
use std::path::Path;

/// Emit the C constants header for `di`. The include guard is derived from
/// `header_name`, normally the output file's name.
pub fn write_c_defs<W: Write + ?Sized>(
    di: &DeviceInterface,
    header_name: &str,
    registers_only: bool,
    out: &mut W,
) -> Result<()> {
    di.validate()?;
    let guard = format!("_{}_", guard_ident(header_name));
    writeln!(out, "// This file is auto-generated. Do not edit.")?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;

    for term in &di.terminals {
        let term_name = term.name.to_uppercase();
        writeln!(out, "{}", "/".repeat(75))?;
        if !registers_only {
            writeln!(out, "#define TERM_{} {}", term_name, term.addr)?;
            writeln!(
                out,
                "#define   TERM_{}_ADDR_WIDTH {}",
                term_name, term.reg_addr_width
            )?;
        }
        for reg in &term.registers {
            let reg_name = format!("{}_{}", term_name, reg.name.to_uppercase());
            let w = extra_words(reg.width, term.reg_data_width);
            for array_index in 0..reg.array {
                for i in (0..=w).rev() {
                    let value = word_address(term, reg, array_index, i);
                    if reg.array > 1 {
                        write!(out, "#define   {reg_name}{array_index}")?;
                        if w > 0 {
                            write!(out, "_{i}")?;
                        }
                        writeln!(out, " {value}")?;
                    } else {
                        write!(out, "#define   {reg_name}")?;
                        if w > 0 {
                            write!(out, "_{i}")?;
                        }
                        writeln!(out, " {value}")?;
                        if w > 0 && i == 0 {
                            // Unsuffixed alias for the register's base address.
                            writeln!(out, "#define   {reg_name} {}", reg.addr)?;
                        }
                    }
                }
            }
            writeln!(out, "#define      WIDTH_{reg_name} {}", reg.width)?;
            if reg.array > 1 {
                writeln!(out, "#define      ARRAY_SIZE_{reg_name} {}", reg.array)?;
            }
            if let Some(map) = &reg.valuemap {
                for (key, value) in map.iter() {
                    writeln!(
                        out,
                        "#define       {}_{} {}",
                        reg_name,
                        key.to_uppercase(),
                        value
                    )?;
                }
            }
        }
        writeln!(out)?;
        writeln!(out)?;
    }
    writeln!(out, "#endif")?;
    Ok(())
}

/// Emit the C constants header for `di` to a file at `path`. The include
/// guard is derived from the file's name.
pub fn generate_c_defs(di: &DeviceInterface, path: &Path, registers_only: bool) -> Result<()> {
    di.validate()?;
    let header_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("output path {} has no file name", path.display()))?
        .to_string();
    write_file(path, |out| {
        write_c_defs(di, &header_name, registers_only, out)
    })
}
