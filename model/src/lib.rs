// Licensed under the Apache-2.0 license

//! Register-map data model.
//!
//! This crate holds the in-memory description of a device's register
//! interface: an ordered tree of terminals, registers, subregisters
//! (bit fields), and value maps. The model is built once, either directly
//! (all fields are public) or through the typed builders in [`builder`],
//! and is then walked read-only by the code generators.
//!
//! Ordering is significant everywhere: child collections are plain vectors
//! in insertion order, which determines both the textual emission order of
//! the generated artifacts and the bit significance of subregister
//! concatenation.
//!
//! ## Module Organization
//!
//! - [`types`]: the model types and their validation
//! - [`builder`]: typed builders with the attachment-time defaulting rules
//!   (auto addressing, default widths, composite initial values)

pub mod builder;
pub mod types;

pub use types::{
    DeviceInterface, Endian, Init, InitValue, Mode, Register, Subregister, Terminal, ValueMap,
};
