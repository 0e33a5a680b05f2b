// Licensed under the Apache-2.0 license

//! Register-map code generators.
//!
//! Four independent passes over a [`regmap_model`] device interface, each
//! deriving one text artifact from the same model:
//!
//! - [`module`]: synthesizable Verilog register-access module for a terminal
//! - [`instance`]: Verilog instantiation wrapper for that module
//! - [`defs`]: Verilog `` `define `` constants header
//! - [`cdefs`]: C `#define` constants header
//!
//! Because every artifact is derived from the one model, the RTL and the
//! headers cannot drift apart. The passes share the word-splitting
//! addressing in [`addr`] and are otherwise independent of each other; none
//! of them mutates the model.
//!
//! Each pass comes in two flavors: a `write_*` function emitting to any
//! [`std::io::Write`] sink, and a `generate_*` wrapper that validates the
//! model, then creates and writes a file. Validation happens before the
//! file is created, so a model error never leaves an output file behind;
//! an I/O error mid-pass leaves a file whose contents must be treated as
//! discarded.
//!
//! ## Usage
//!
//! ```no_run
//! use regmap_model::{DeviceInterface, Mode};
//! use regmap_model::builder::{RegisterBuilder, TerminalBuilder};
//! use std::path::Path;
//!
//! let di = DeviceInterface::assemble(
//!     "dev",
//!     vec![TerminalBuilder::new("FX", 4, 8).registers(vec![
//!         RegisterBuilder::new("enable", "int", Mode::Write).width(1),
//!     ])],
//! )?;
//! regmap_generator::generate_verilog_module(&di.terminals[0], "fx", Path::new("fx.v"))?;
//! regmap_generator::generate_c_defs(&di, Path::new("fx_regs.h"), false)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod addr;
pub mod cdefs;
pub mod defs;
pub mod instance;
pub mod module;

mod emit;

pub use cdefs::{generate_c_defs, write_c_defs};
pub use defs::{generate_verilog_defs, write_verilog_defs};
pub use instance::{generate_verilog_instance, write_verilog_instance, InstanceSignals};
pub use module::{generate_verilog_module, write_verilog_module};
