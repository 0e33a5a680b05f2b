// Licensed under the Apache-2.0 license

//! Shared emission helpers.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sized Verilog hex literal, e.g. `16'h5`.
pub(crate) fn init_literal(width: u64, value: u64) -> String {
    format!("{width}'h{value:x}")
}

/// Upper-cased identifier for include guards; non-identifier characters
/// become underscores.
pub(crate) fn guard_ident(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Create `path` and run `emit` against a buffered writer. The sink is
/// released on every exit path; a partially written file after an error is
/// not valid output.
pub(crate) fn write_file(
    path: &Path,
    emit: impl FnOnce(&mut dyn Write) -> Result<()>,
) -> Result<()> {
    log::debug!("writing {}", path.display());
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    emit(&mut out)?;
    out.flush()
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
