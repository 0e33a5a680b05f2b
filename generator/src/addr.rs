// Licensed under the Apache-2.0 license

//! Word-splitting addressing shared by all generators.
//!
//! A register wider than the terminal's data bus occupies
//! `(width - 1) / reg_data_width + 1` consecutive bus addresses per array
//! element. The textual emission order is always highest word first; which
//! physical address a word lands on follows the terminal's endianness
//! (increasing addresses hold increasing word indices under little endian,
//! decreasing under big endian).

use regmap_model::{Endian, Register, Terminal};

/// Number of additional bus words beyond the first.
pub fn extra_words(width: u64, data_width: u64) -> u64 {
    (width - 1) / data_width
}

/// Bus address of word `word` of array element `array_index`.
pub fn word_address(term: &Terminal, reg: &Register, array_index: u64, word: u64) -> u64 {
    let w = extra_words(reg.width, term.reg_data_width);
    let offset = match term.endian {
        Endian::Little => word,
        Endian::Big => w - word,
    };
    reg.addr + array_index * (w + 1) + offset
}

/// One bus word of one array element of a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordSpan {
    /// Word index within the register, counting down from [`extra_words`].
    pub word: u64,
    /// Bus address of this word.
    pub bus_addr: u64,
    /// Most significant bit of this word in the register's logical vector.
    pub hi: u64,
    /// Least significant bit of this word in the register's logical vector.
    pub lo: u64,
    /// Most significant write-data bit consumed by this word.
    pub datai_hi: u64,
    /// Zero-extension bits needed when reading this word back.
    pub pad: u64,
}

/// Word spans for array element `array_index`, highest word first.
pub fn word_spans(term: &Terminal, reg: &Register, array_index: u64) -> Vec<WordSpan> {
    let d = term.reg_data_width;
    let w = extra_words(reg.width, d);
    let element_lo = array_index * reg.width;
    let mut spans = Vec::with_capacity(w as usize + 1);
    for i in (0..=w).rev() {
        let (hi, datai_hi) = if i == w {
            (element_lo + reg.width - 1, reg.width - d * i - 1)
        } else {
            (element_lo + d * (i + 1) - 1, d - 1)
        };
        spans.push(WordSpan {
            word: i,
            bus_addr: word_address(term, reg, array_index, i),
            hi,
            lo: element_lo + d * i,
            datai_hi,
            pad: d - 1 - datai_hi,
        });
    }
    spans
}
