// Licensed under the Apache-2.0 license

//! Core data types for the register-map model.
//!
//! The tree is strictly owned top-down: a [`DeviceInterface`] owns its
//! [`Terminal`]s, a terminal owns its [`Register`]s, a register owns its
//! [`Subregister`]s, and a [`ValueMap`] belongs to exactly one register or
//! subregister. There are no back references and no cycles.

use anyhow::{bail, Result};

/// Read/write mode of a register, from the bus master's point of view.
///
/// Read registers are driven by external logic and sampled over the bus;
/// write registers are stored in the generated module and driven out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

/// Bus word order for registers wider than the data bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Ordered symbolic-name-to-integer constant table.
///
/// Entries keep first-insertion order; the constant emitters print them in
/// that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: Vec<(String, u64)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: u64) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert an entry, or update an existing one in place without
    /// disturbing its position.
    pub fn insert(&mut self, name: impl Into<String>, value: u64) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single initial value: a concrete integer, or a symbolic name to be
/// looked up in the owner's value map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitValue {
    Int(u64),
    Symbol(String),
}

impl InitValue {
    /// Resolve against a value map. Integers pass through unchanged, as do
    /// symbols when there is no map or the name is absent; a lookup miss is
    /// not an error.
    pub fn resolve(&self, map: Option<&ValueMap>) -> InitValue {
        match self {
            InitValue::Int(_) => self.clone(),
            InitValue::Symbol(name) => match map.and_then(|m| m.get(name)) {
                Some(value) => InitValue::Int(value),
                None => self.clone(),
            },
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            InitValue::Int(value) => Some(*value),
            InitValue::Symbol(_) => None,
        }
    }
}

impl Default for InitValue {
    fn default() -> Self {
        InitValue::Int(0)
    }
}

impl From<u64> for InitValue {
    fn from(value: u64) -> Self {
        InitValue::Int(value)
    }
}

impl From<&str> for InitValue {
    fn from(name: &str) -> Self {
        InitValue::Symbol(name.to_string())
    }
}

impl From<String> for InitValue {
    fn from(name: String) -> Self {
        InitValue::Symbol(name)
    }
}

/// Initial value(s) for a register: one value shared by every array element,
/// or exactly one value per element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Init {
    Scalar(InitValue),
    Sequence(Vec<InitValue>),
}

impl Init {
    /// The init value for array element `index`. A scalar init applies to
    /// every element. Sequence length is checked by
    /// [`Register::validate`] before the generators index into it.
    pub fn element(&self, index: usize) -> &InitValue {
        match self {
            Init::Scalar(value) => value,
            Init::Sequence(values) => &values[index],
        }
    }

    pub fn values(&self) -> &[InitValue] {
        match self {
            Init::Scalar(value) => std::slice::from_ref(value),
            Init::Sequence(values) => values,
        }
    }
}

impl Default for Init {
    fn default() -> Self {
        Init::Scalar(InitValue::default())
    }
}

impl From<u64> for Init {
    fn from(value: u64) -> Self {
        Init::Scalar(InitValue::Int(value))
    }
}

impl From<&str> for Init {
    fn from(name: &str) -> Self {
        Init::Scalar(InitValue::Symbol(name.to_string()))
    }
}

impl<T: Into<InitValue>> From<Vec<T>> for Init {
    fn from(values: Vec<T>) -> Self {
        Init::Sequence(values.into_iter().map(Into::into).collect())
    }
}

/// A named bit range within a register.
#[derive(Clone, Debug)]
pub struct Subregister {
    pub name: String,
    /// Bit offset within the parent register.
    pub addr: u64,
    /// Width in bits.
    pub width: u64,
    /// External signal name used by the RTL emitters.
    pub vlog_name: String,
    /// Initial value, folded into the parent's composite init when the
    /// parent does not carry its own.
    pub init: InitValue,
    pub valuemap: Option<ValueMap>,
}

impl Subregister {
    /// Most significant bit position within the parent register.
    pub fn msb(&self) -> u64 {
        self.addr + self.width - 1
    }
}

/// An addressable storage element within a terminal.
#[derive(Clone, Debug)]
pub struct Register {
    pub name: String,
    /// Base address within the terminal's register address space.
    pub addr: u64,
    pub mode: Mode,
    /// Free-form type tag. The generators recognize `"int"` (static
    /// storage) and `"trigger"` (self-clearing).
    pub kind: String,
    /// Width in bits; may exceed the terminal's data bus width, in which
    /// case the register occupies several consecutive bus addresses.
    pub width: u64,
    /// Replication count; 1 for non-arrayed registers.
    pub array: u64,
    pub init: Init,
    /// Double-buffered: writes land in a hidden staging copy made visible
    /// by the synchronization pulse.
    pub shadowed: bool,
    pub subregs: Vec<Subregister>,
    pub valuemap: Option<ValueMap>,
}

impl Register {
    pub fn is_decomposed(&self) -> bool {
        !self.subregs.is_empty()
    }

    /// Resolve `value` through this register's value map.
    pub fn resolve(&self, value: &InitValue) -> InitValue {
        value.resolve(self.valuemap.as_ref())
    }

    /// Resolved init for array element `index`, required to be concrete.
    /// The RTL emitters print this as a sized literal, so a symbol that
    /// misses the value map is an error here even though plain resolution
    /// is not.
    pub fn resolved_init(&self, index: usize) -> Result<u64> {
        match self.resolve(self.init.element(index)) {
            InitValue::Int(value) => Ok(value),
            InitValue::Symbol(name) => bail!(
                "register {}: init value '{}' is not in the value map",
                self.name,
                name
            ),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            bail!("register {}: width must be at least 1", self.name);
        }
        if self.array == 0 {
            bail!("register {}: array size must be at least 1", self.name);
        }
        if let Init::Sequence(values) = &self.init {
            if values.len() as u64 != self.array {
                bail!(
                    "register {}: init sequence length {} does not match array size {}",
                    self.name,
                    values.len(),
                    self.array
                );
            }
        }
        for sub in &self.subregs {
            if sub.width == 0 {
                bail!(
                    "subregister {}.{}: width must be at least 1",
                    self.name,
                    sub.name
                );
            }
            if sub.addr + sub.width > self.width {
                bail!(
                    "subregister {}.{}: bits {}:{} exceed register width {}",
                    self.name,
                    sub.name,
                    sub.msb(),
                    sub.addr,
                    self.width
                );
            }
        }
        for index in 0..self.init.values().len() {
            self.resolved_init(index)?;
        }
        Ok(())
    }
}

/// An addressable group of registers sharing one data bus.
#[derive(Clone, Debug)]
pub struct Terminal {
    pub name: String,
    /// Terminal-select address on the shared bus.
    pub addr: u64,
    /// Width in bits of the intra-terminal register address.
    pub reg_addr_width: u64,
    /// Data bus width in bits.
    pub reg_data_width: u64,
    pub endian: Endian,
    pub registers: Vec<Register>,
}

impl Terminal {
    /// Registers filtered by type tag and mode, in declaration order.
    /// `None` matches everything.
    pub fn registers_by(
        &self,
        kinds: Option<&[&str]>,
        modes: Option<&[Mode]>,
    ) -> Vec<&Register> {
        self.registers
            .iter()
            .filter(|reg| {
                kinds.map_or(true, |ks| ks.contains(&reg.kind.as_str()))
                    && modes.map_or(true, |ms| ms.contains(&reg.mode))
            })
            .collect()
    }

    pub fn has_shadowed(&self) -> bool {
        self.registers.iter().any(|reg| reg.shadowed)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reg_data_width == 0 {
            bail!("terminal {}: reg_data_width must be at least 1", self.name);
        }
        for reg in &self.registers {
            reg.validate()?;
        }
        Ok(())
    }
}

/// The root of the model: an ordered collection of terminals.
#[derive(Clone, Debug)]
pub struct DeviceInterface {
    pub name: String,
    pub terminals: Vec<Terminal>,
}

impl DeviceInterface {
    pub fn validate(&self) -> Result<()> {
        for term in &self.terminals {
            term.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_register(name: &str) -> Register {
        Register {
            name: name.to_string(),
            addr: 0,
            mode: Mode::Write,
            kind: "int".to_string(),
            width: 8,
            array: 1,
            init: Init::default(),
            shadowed: false,
            subregs: vec![],
            valuemap: None,
        }
    }

    #[test]
    fn test_value_resolution() {
        let map = ValueMap::new().with("ON", 1).with("OFF", 0);

        // Integers pass through untouched.
        assert_eq!(
            InitValue::Int(7).resolve(Some(&map)),
            InitValue::Int(7)
        );
        // Known symbols resolve.
        assert_eq!(
            InitValue::from("OFF").resolve(Some(&map)),
            InitValue::Int(0)
        );
        // Unknown symbols and missing maps fall through unchanged.
        assert_eq!(
            InitValue::from("BLINK").resolve(Some(&map)),
            InitValue::from("BLINK")
        );
        assert_eq!(InitValue::from("ON").resolve(None), InitValue::from("ON"));
    }

    #[test]
    fn test_value_map_order_and_update() {
        let mut map = ValueMap::new().with("B", 2).with("A", 1);
        map.insert("B", 3);
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("B", 3), ("A", 1)]);
    }

    #[test]
    fn test_resolved_init_requires_known_symbol() {
        let mut reg = plain_register("led");
        reg.valuemap = Some(ValueMap::new().with("ON", 1).with("OFF", 0));
        reg.init = Init::from("OFF");
        assert_eq!(reg.resolved_init(0).unwrap(), 0);

        reg.init = Init::from("BLINK");
        assert!(reg.resolved_init(0).is_err());
    }

    #[test]
    fn test_init_sequence_length_must_match_array() {
        let mut reg = plain_register("coeff");
        reg.array = 4;
        reg.init = Init::from(vec![1u64, 2, 3]);
        let err = reg.validate().unwrap_err();
        assert!(err.to_string().contains("init sequence length"), "{err}");

        reg.init = Init::from(vec![1u64, 2, 3, 4]);
        reg.validate().unwrap();
    }

    #[test]
    fn test_subregister_bounds() {
        let mut reg = plain_register("ctrl");
        reg.subregs.push(Subregister {
            name: "mode".to_string(),
            addr: 6,
            width: 3,
            vlog_name: "ctrl_mode".to_string(),
            init: InitValue::default(),
            valuemap: None,
        });
        let err = reg.validate().unwrap_err();
        assert!(err.to_string().contains("exceed register width"), "{err}");

        reg.subregs[0].addr = 5;
        reg.validate().unwrap();
    }

    #[test]
    fn test_registers_by_filters_kind_and_mode() {
        let mut trig = plain_register("go");
        trig.kind = "trigger".to_string();
        let mut status = plain_register("status");
        status.mode = Mode::Read;
        let term = Terminal {
            name: "T".to_string(),
            addr: 0,
            reg_addr_width: 4,
            reg_data_width: 8,
            endian: Endian::Little,
            registers: vec![plain_register("a"), trig, status],
        };

        let triggers = term.registers_by(Some(&["trigger"]), Some(&[Mode::Write]));
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].name, "go");

        let ints = term.registers_by(Some(&["int"]), None);
        assert_eq!(ints.len(), 2);

        let writes = term.registers_by(None, Some(&[Mode::Write]));
        assert_eq!(writes.len(), 2);
    }
}
