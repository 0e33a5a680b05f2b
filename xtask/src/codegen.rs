// Licensed under the Apache-2.0 license

//! Sample register map and artifact regeneration.

use anyhow::Result;
use log::info;
use regmap_generator::{
    generate_c_defs, generate_verilog_defs, generate_verilog_instance, generate_verilog_module,
    InstanceSignals,
};
use regmap_model::builder::{RegisterBuilder, SubregisterBuilder, TerminalBuilder};
use regmap_model::{DeviceInterface, Endian, Mode, ValueMap};
use std::fs;
use std::path::Path;

/// A device interface exercising the whole generator surface: plain,
/// trigger, shadowed, arrayed, bus-splitting, and bit-field-decomposed
/// registers.
fn sample_interface() -> Result<DeviceInterface> {
    DeviceInterface::assemble(
        "sample",
        vec![TerminalBuilder::new("FX", 4, 8)
            .addr(3)
            .endian(Endian::Little)
            .registers(vec![
                RegisterBuilder::new("enable", "int", Mode::Write).width(1).init(1u64),
                RegisterBuilder::new("reset_cmd", "trigger", Mode::Write).width(4),
                RegisterBuilder::new("gain", "int", Mode::Write)
                    .width(8)
                    .init(5u64)
                    .shadowed(),
                RegisterBuilder::new("dac", "int", Mode::Write).width(16),
                RegisterBuilder::new("coeff", "int", Mode::Write).width(8).array(4),
                RegisterBuilder::new("ctrl", "int", Mode::Write).subregs(vec![
                    SubregisterBuilder::new("mode", 2)
                        .valuemap(ValueMap::new().with("OFF", 0).with("ON", 1))
                        .init("OFF"),
                    SubregisterBuilder::new("rate", 6),
                ]),
                RegisterBuilder::new("status", "int", Mode::Read).width(8),
            ])],
    )
}

/// Write all four artifacts for the sample interface into `out_dir`.
pub fn generate(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    let di = sample_interface()?;
    let term = &di.terminals[0];
    let module = "fx_regs";

    let module_path = out_dir.join("fx_regs.v");
    generate_verilog_module(term, module, &module_path)?;
    info!("wrote {}", module_path.display());

    let instance_path = out_dir.join("fx_regs_instance.v");
    generate_verilog_instance(term, module, &InstanceSignals::default(), &instance_path)?;
    info!("wrote {}", instance_path.display());

    let defs_path = out_dir.join("fx_regs_defs.v");
    generate_verilog_defs(&di, module, &defs_path)?;
    info!("wrote {}", defs_path.display());

    let cdefs_path = out_dir.join("fx_regs.h");
    generate_c_defs(&di, &cdefs_path, false)?;
    info!("wrote {}", cdefs_path.display());

    Ok(())
}
