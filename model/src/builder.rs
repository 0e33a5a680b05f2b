// Licensed under the Apache-2.0 license

//! Typed builders for assembling a device-interface model.
//!
//! Every entity is constructed from a fixed, typed field list plus an
//! explicit child list; defaults are filled in when a child is attached to
//! its parent:
//!
//! - a subregister's bit offset is the running sum of the widths declared
//!   before it, and its external signal name defaults to
//!   `<register>_<subregister>`;
//! - a register's width defaults to the terminal's data bus width, or to
//!   the sum of its subregister widths when it is decomposed;
//! - a register's address defaults to the next free address after the
//!   previous register (accounting for bus-word splitting and arrays);
//! - a decomposed register without an explicit init gets the composite of
//!   its subregisters' resolved inits;
//! - terminals without an explicit address are assigned the first free
//!   address starting at 0x200.
//!
//! Built entities are validated before they are returned, so a model that
//! comes out of a builder is ready for the generators.

use crate::types::{
    DeviceInterface, Endian, Init, InitValue, Mode, Register, Subregister, Terminal, ValueMap,
};
use anyhow::{bail, Result};

/// Builder for [`Subregister`]. The bit offset and the default external
/// signal name are assigned when the parent register is built.
#[derive(Clone, Debug)]
pub struct SubregisterBuilder {
    name: String,
    width: u64,
    init: InitValue,
    vlog_name: Option<String>,
    valuemap: Option<ValueMap>,
}

impl SubregisterBuilder {
    pub fn new(name: impl Into<String>, width: u64) -> Self {
        Self {
            name: name.into(),
            width,
            init: InitValue::default(),
            vlog_name: None,
            valuemap: None,
        }
    }

    pub fn init(mut self, init: impl Into<InitValue>) -> Self {
        self.init = init.into();
        self
    }

    pub fn vlog_name(mut self, name: impl Into<String>) -> Self {
        self.vlog_name = Some(name.into());
        self
    }

    pub fn valuemap(mut self, map: ValueMap) -> Self {
        self.valuemap = Some(map);
        self
    }
}

/// Builder for [`Register`].
#[derive(Clone, Debug)]
pub struct RegisterBuilder {
    name: String,
    kind: String,
    mode: Mode,
    addr: Option<u64>,
    width: Option<u64>,
    array: u64,
    init: Option<Init>,
    shadowed: bool,
    valuemap: Option<ValueMap>,
    subregs: Vec<SubregisterBuilder>,
}

impl RegisterBuilder {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, mode: Mode) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            mode,
            addr: None,
            width: None,
            array: 1,
            init: None,
            shadowed: false,
            valuemap: None,
            subregs: vec![],
        }
    }

    pub fn addr(mut self, addr: u64) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn width(mut self, width: u64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn array(mut self, array: u64) -> Self {
        self.array = array;
        self
    }

    pub fn init(mut self, init: impl Into<Init>) -> Self {
        self.init = Some(init.into());
        self
    }

    pub fn shadowed(mut self) -> Self {
        self.shadowed = true;
        self
    }

    pub fn valuemap(mut self, map: ValueMap) -> Self {
        self.valuemap = Some(map);
        self
    }

    pub fn subregs(mut self, subregs: Vec<SubregisterBuilder>) -> Self {
        self.subregs = subregs;
        self
    }

    fn build(self, default_addr: u64, data_width: u64) -> Result<Register> {
        // Attach subregisters: assign bit offsets and default signal names.
        let mut subs = Vec::with_capacity(self.subregs.len());
        let mut offset = 0u64;
        for sb in self.subregs {
            if sb.width == 0 {
                bail!(
                    "subregister {}.{}: width must be at least 1",
                    self.name,
                    sb.name
                );
            }
            let vlog_name = sb
                .vlog_name
                .unwrap_or_else(|| format!("{}_{}", self.name, sb.name));
            let width = sb.width;
            subs.push(Subregister {
                name: sb.name,
                addr: offset,
                width,
                vlog_name,
                init: sb.init,
                valuemap: sb.valuemap,
            });
            offset += width;
        }

        let width = if subs.is_empty() {
            self.width.unwrap_or(data_width)
        } else {
            match self.width {
                Some(w) if w != offset => bail!(
                    "register {}: declared width {} does not match subregister total {}",
                    self.name,
                    w,
                    offset
                ),
                _ => offset,
            }
        };

        let init = match (self.init, subs.is_empty()) {
            (Some(_), false) => bail!(
                "register {}: init may be set on the register or on its subregisters, not both",
                self.name
            ),
            (Some(init), true) => init,
            (None, false) => Init::Scalar(InitValue::Int(composite_init(&self.name, &subs)?)),
            (None, true) => Init::default(),
        };

        let reg = Register {
            name: self.name,
            addr: self.addr.unwrap_or(default_addr),
            mode: self.mode,
            kind: self.kind,
            width,
            array: self.array,
            init,
            shadowed: self.shadowed,
            subregs: subs,
            valuemap: self.valuemap,
        };
        reg.validate()?;
        Ok(reg)
    }
}

/// Fold subregister inits into a single register-wide value, resolving each
/// through its own value map. Bits above 63 are dropped; init values are
/// capped at 64 bits.
fn composite_init(reg_name: &str, subs: &[Subregister]) -> Result<u64> {
    let mut acc = 0u64;
    for sub in subs {
        let value = match sub.init.resolve(sub.valuemap.as_ref()) {
            InitValue::Int(value) => value,
            InitValue::Symbol(name) => bail!(
                "subregister {}.{}: init value '{}' is not in the value map",
                reg_name,
                sub.name,
                name
            ),
        };
        if sub.addr < 64 {
            acc |= value << sub.addr;
        }
    }
    Ok(acc)
}

/// Builder for [`Terminal`].
#[derive(Clone, Debug)]
pub struct TerminalBuilder {
    name: String,
    addr: Option<u64>,
    reg_addr_width: u64,
    reg_data_width: u64,
    endian: Endian,
    registers: Vec<RegisterBuilder>,
}

impl TerminalBuilder {
    pub fn new(name: impl Into<String>, reg_addr_width: u64, reg_data_width: u64) -> Self {
        Self {
            name: name.into(),
            addr: None,
            reg_addr_width,
            reg_data_width,
            endian: Endian::Little,
            registers: vec![],
        }
    }

    pub fn addr(mut self, addr: u64) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn registers(mut self, registers: Vec<RegisterBuilder>) -> Self {
        self.registers = registers;
        self
    }

    /// Build a standalone terminal. The terminal address defaults to 0;
    /// auto-assignment from 0x200 happens in
    /// [`DeviceInterface::assemble`], which knows the sibling addresses.
    pub fn build(self) -> Result<Terminal> {
        let addr = self.addr.unwrap_or(0);
        self.build_at(addr)
    }

    fn build_at(self, addr: u64) -> Result<Terminal> {
        if self.reg_data_width == 0 {
            bail!("terminal {}: reg_data_width must be at least 1", self.name);
        }
        let mut registers: Vec<Register> = Vec::with_capacity(self.registers.len());
        for rb in self.registers {
            let default_addr = registers
                .last()
                .map(|prev| {
                    let words = (prev.width + self.reg_data_width - 1) / self.reg_data_width;
                    prev.addr + words * prev.array
                })
                .unwrap_or(0);
            registers.push(rb.build(default_addr, self.reg_data_width)?);
        }
        Ok(Terminal {
            name: self.name,
            addr,
            reg_addr_width: self.reg_addr_width,
            reg_data_width: self.reg_data_width,
            endian: self.endian,
            registers,
        })
    }
}

impl DeviceInterface {
    /// Assemble a device interface from terminal builders. Explicit terminal
    /// addresses must be unique; terminals without one get the first free
    /// address starting at 0x200.
    pub fn assemble(
        name: impl Into<String>,
        terminals: Vec<TerminalBuilder>,
    ) -> Result<DeviceInterface> {
        let mut built: Vec<Terminal> = Vec::with_capacity(terminals.len());
        for tb in terminals {
            let addr = match tb.addr {
                Some(addr) => {
                    if built.iter().any(|t| t.addr == addr) {
                        bail!(
                            "terminal {}: address {:#x} already exists in device interface",
                            tb.name,
                            addr
                        );
                    }
                    addr
                }
                None => {
                    let mut next = 0x200;
                    while built.iter().any(|t| t.addr == next) {
                        next += 1;
                    }
                    next
                }
            };
            built.push(tb.build_at(addr)?);
        }
        Ok(DeviceInterface {
            name: name.into(),
            terminals: built,
        })
    }
}
