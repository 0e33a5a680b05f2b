// Licensed under the Apache-2.0 license

//! Verilog register-access module emitter.
//!
//! Emits one synthesizable module per terminal: a clocked write path with
//! per-word address decoding, self-clearing trigger registers, shadow
//! double-buffering, subregister slicing/concatenation, and a registered
//! read-back bus. Shadowed registers stage bus writes in an internal copy
//! named `<name>_internal_`; every section after the shadow block addresses
//! that copy, while the port and the shadow block keep the visible name.

use crate::addr::{extra_words, word_spans};
use crate::emit::{init_literal, write_file};
use anyhow::Result;
use regmap_model::{Init, Mode, Register, Terminal};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// The name write/trigger/read logic uses for a register: the staging copy
/// for shadowed registers, the register itself otherwise.
fn live_name(reg: &Register) -> Cow<'_, str> {
    if reg.shadowed {
        Cow::Owned(format!("{}_internal_", reg.name))
    } else {
        Cow::Borrowed(reg.name.as_str())
    }
}

/// Reset-path assignments for a register, element-wise when arrayed.
fn write_reset_values<W: Write + ?Sized>(
    out: &mut W,
    reg: &Register,
    name: &str,
    indent: &str,
) -> Result<()> {
    if reg.array > 1 || matches!(reg.init, Init::Sequence(_)) {
        for index in 0..reg.array {
            let value = reg.resolved_init(index as usize)?;
            writeln!(
                out,
                "{indent}{name}[{}:{}] <= {};",
                (index + 1) * reg.width - 1,
                index * reg.width,
                init_literal(reg.width, value)
            )?;
        }
    } else {
        writeln!(
            out,
            "{indent}{name} <= {};",
            init_literal(reg.width, reg.resolved_init(0)?)
        )?;
    }
    Ok(())
}

/// Emit the complete register module for `term` as Verilog source.
pub fn write_verilog_module<W: Write + ?Sized>(
    term: &Terminal,
    module: &str,
    out: &mut W,
) -> Result<()> {
    term.validate()?;

    let shadowed: Vec<&Register> = term.registers.iter().filter(|r| r.shadowed).collect();

    writeln!(out, "// This file is auto-generated. Do not edit.")?;
    writeln!(out, "module {module}(")?;
    writeln!(out, "  input clk,")?;
    writeln!(out, "  input resetb,")?;
    writeln!(out, "  input we,")?;
    writeln!(out, "  input [{}:0] addr,", term.reg_addr_width - 1)?;
    writeln!(out, "  input [{}:0] datai,", term.reg_data_width - 1)?;
    writeln!(out)?;
    if !shadowed.is_empty() {
        writeln!(
            out,
            "  input shadow_sync, // pulse high to transfer data to shadow register"
        )?;
    }

    for reg in &term.registers {
        if reg.is_decomposed() {
            for sub in &reg.subregs {
                write!(
                    out,
                    "{}",
                    if reg.mode == Mode::Read {
                        "  input      "
                    } else {
                        "  output     "
                    }
                )?;
                if sub.width > 1 {
                    write!(out, "[{}:0] ", sub.width - 1)?;
                }
                writeln!(out, "{},", sub.vlog_name)?;
            }
            if reg.mode != Mode::Read {
                write!(out, "  output reg ")?;
                if reg.width > 1 || reg.array > 1 {
                    write!(out, "[{}:0] ", reg.array * reg.width - 1)?;
                }
                writeln!(out, "{},", reg.name)?;
            }
        } else {
            write!(
                out,
                "{}",
                if reg.mode == Mode::Read {
                    "  input      "
                } else {
                    "  output reg "
                }
            )?;
            if reg.width > 1 || reg.array > 1 {
                write!(out, "[{}:0] ", reg.array * reg.width - 1)?;
            }
            writeln!(out, "{},", reg.name)?;
        }
    }

    writeln!(out, "\n  output reg[{}:0] datao", term.reg_data_width - 1)?;
    writeln!(out, ");")?;
    writeln!(out)?;

    // Subregister combinations: write-mode fields are slices of the parent,
    // read-mode parents are the concatenation of their fields, last declared
    // field most significant.
    for reg in &term.registers {
        if !reg.is_decomposed() {
            continue;
        }
        if reg.mode == Mode::Write {
            for sub in &reg.subregs {
                write!(out, "assign {} = {}", sub.vlog_name, reg.name)?;
                if reg.width > 1 {
                    write!(out, "[")?;
                    if sub.width > 1 {
                        write!(out, "{}:", sub.msb())?;
                    }
                    write!(out, "{}]", sub.addr)?;
                }
                writeln!(out, ";")?;
            }
        } else {
            let fields: Vec<&str> = reg
                .subregs
                .iter()
                .rev()
                .map(|s| s.vlog_name.as_str())
                .collect();
            writeln!(
                out,
                "wire [{}:0] {} = {{{}}};",
                reg.width - 1,
                reg.name,
                fields.join(", ")
            )?;
        }
    }

    if !shadowed.is_empty() {
        for reg in &shadowed {
            write!(out, "reg ")?;
            if reg.width > 1 || reg.array > 1 {
                write!(out, "[{}:0] ", reg.array * reg.width - 1)?;
            }
            writeln!(out, "{}_internal_;", reg.name)?;
        }
        writeln!(out, "//shadow registers")?;
        writeln!(out, "always @(posedge clk or negedge resetb) begin")?;
        writeln!(out, "  if(!resetb) begin")?;
        for reg in &shadowed {
            write_reset_values(out, reg, &reg.name, "    ")?;
        }
        writeln!(out, "  end else if(shadow_sync) begin")?;
        for reg in &shadowed {
            writeln!(out, "    {} <= {}_internal_;", reg.name, reg.name)?;
        }
        writeln!(out, "  end")?;
        writeln!(out, "end")?;
        writeln!(out)?;
    }

    // Trigger registers reflect only the current cycle's matching write.
    let triggers = term.registers_by(Some(&["trigger"]), Some(&[Mode::Write]));
    if !triggers.is_empty() {
        writeln!(out, "// Create triggers")?;
        writeln!(out, "always @(posedge clk or negedge resetb) begin")?;
        writeln!(out, "   if(!resetb) begin")?;
        for &reg in &triggers {
            writeln!(out, "      {} <= 0;", live_name(reg))?;
        }
        writeln!(out, "   end else begin")?;
        for &reg in &triggers {
            let name = live_name(reg);
            let split = extra_words(reg.width, term.reg_data_width) > 0 || reg.array > 1;
            for array_index in 0..reg.array {
                for span in word_spans(term, reg, array_index) {
                    write!(out, "      {name}")?;
                    if split {
                        write!(out, "[{}:{}]", span.hi, span.lo)?;
                    }
                    writeln!(
                        out,
                        " <= {{{}{{we & (addr == {}'d{})}}}} & datai[{}:0];",
                        span.datai_hi + 1,
                        term.reg_addr_width,
                        span.bus_addr,
                        span.datai_hi
                    )?;
                }
            }
        }
        writeln!(out, "   end")?;
        writeln!(out, "end")?;
        writeln!(out)?;
    }

    let writable = term.registers_by(Some(&["int"]), Some(&[Mode::Write]));
    if !writable.is_empty() {
        writeln!(out, "// Create writable static registers")?;
        writeln!(out, "always @(posedge clk or negedge resetb) begin")?;
        writeln!(out, "  if(!resetb) begin")?;
        for &reg in &writable {
            write_reset_values(out, reg, &live_name(reg), "     ")?;
        }
        writeln!(out, "  end else if(we) begin")?;
        writeln!(out, "    case(addr)")?;
        for &reg in &writable {
            let name = live_name(reg);
            let multi = reg.width > 1 || reg.array > 1;
            for array_index in 0..reg.array {
                for span in word_spans(term, reg, array_index) {
                    write!(out, "      {}: {name}", span.bus_addr)?;
                    if multi {
                        writeln!(
                            out,
                            "[{}:{}] <= datai[{}:0];",
                            span.hi, span.lo, span.datai_hi
                        )?;
                    } else {
                        writeln!(out, " <= datai[0];")?;
                    }
                }
            }
        }
        writeln!(out, "    endcase")?;
        writeln!(out, "  end")?;
        writeln!(out, "end")?;
        writeln!(out)?;
    }

    // Read-back path: a registered bus that defaults to zero on unmatched
    // addresses and zero-extends partial top words.
    let readable = term.registers_by(Some(&["int"]), None);
    writeln!(out, "// Create readable registers")?;
    writeln!(out, "always @(posedge clk or negedge resetb) begin")?;
    writeln!(out, " if (!resetb) begin")?;
    writeln!(out, "  datao <= 0;")?;
    writeln!(out, " end else begin")?;
    writeln!(out, "  case(addr)")?;
    for &reg in &readable {
        let name = live_name(reg);
        let multi = reg.width > 1 || reg.array > 1;
        for array_index in 0..reg.array {
            for span in word_spans(term, reg, array_index) {
                write!(out, "    {}: datao <= ", span.bus_addr)?;
                if multi {
                    if span.pad != 0 {
                        writeln!(
                            out,
                            "{{ {}'b0, {name}[{}:{}] }};",
                            span.pad, span.hi, span.lo
                        )?;
                    } else {
                        writeln!(out, "{name}[{}:{}];", span.hi, span.lo)?;
                    }
                } else if span.pad != 0 {
                    writeln!(out, "{{ {}'b0, {name} }};", span.pad)?;
                } else {
                    writeln!(out, "{name};")?;
                }
            }
        }
    }
    writeln!(out, "    default: datao <= 0;")?;
    writeln!(out, "  endcase")?;
    writeln!(out, " end")?;
    writeln!(out, "end")?;
    writeln!(out)?;
    writeln!(out, "endmodule")?;
    Ok(())
}

/// Emit the register module for `term` to a file at `path`.
pub fn generate_verilog_module(term: &Terminal, module: &str, path: &Path) -> Result<()> {
    term.validate()?;
    write_file(path, |out| write_verilog_module(term, module, out))
}
