//! HDU enumeration over a complete FITS byte stream.

use super::block::{padded_byte_len, BLOCK_SIZE};
use super::header::{header_byte_len, parse_header_blocks, validate_binary_table, validate_primary, Card};
use super::value::Value;
use crate::error::{Error, Result};

/// Describes the kind and shape of data in a single HDU.
#[derive(Debug, Clone, PartialEq)]
pub enum HduInfo {
    /// Primary HDU.
    Primary {
        /// BITPIX value (8, 16, 32, 64, -32, -64).
        bitpix: i64,
        /// Axis dimensions (NAXIS1, NAXIS2, ...).
        naxes: Vec<usize>,
    },
    /// Binary table extension (XTENSION = 'BINTABLE').
    BinaryTable {
        /// Row width in bytes.
        naxis1: usize,
        /// Number of rows.
        naxis2: usize,
        /// Size of the variable-length array heap in bytes.
        pcount: usize,
        /// Number of columns.
        tfields: usize,
    },
    /// Any other extension (IMAGE, TABLE, ...). Its data is skipped.
    Other {
        /// Trimmed XTENSION value.
        xtension: String,
    },
}

/// A single Header Data Unit parsed from a FITS byte stream.
#[derive(Debug, Clone)]
pub struct Hdu {
    /// Parsed metadata describing the HDU type and shape.
    pub info: HduInfo,
    /// Byte offset where the header begins in the FITS stream.
    pub header_start: usize,
    /// Byte offset where the data segment begins.
    pub data_start: usize,
    /// Length of the data segment in bytes (unpadded).
    pub data_len: usize,
    /// All header cards parsed from this HDU, END included.
    pub cards: Vec<Card>,
}

impl Hdu {
    /// Raw data segment of this HDU within `data`.
    pub fn data<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.data_start..self.data_start + self.data_len]
    }

    /// Trimmed EXTNAME, if any.
    pub fn extname(&self) -> Option<String> {
        card_string_value(&self.cards, "EXTNAME")
    }
}

/// A collection of HDUs parsed from a complete FITS file.
#[derive(Debug, Clone)]
pub struct FitsData {
    /// All HDUs in the file, with the primary HDU at index 0.
    pub hdus: Vec<Hdu>,
}

impl FitsData {
    /// Returns the number of HDUs.
    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    /// Returns `true` if the file contains no HDUs.
    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }

    /// Iterates over all HDUs in order.
    pub fn iter(&self) -> impl Iterator<Item = &Hdu> {
        self.hdus.iter()
    }
}

/// Integer value of the first card named `keyword`.
pub fn card_integer_value(cards: &[Card], keyword: &str) -> Option<i64> {
    cards.iter().find_map(|c| match &c.value {
        Some(Value::Integer(n)) if c.keyword_str() == keyword => Some(*n),
        _ => None,
    })
}

/// Trimmed string value of the first card named `keyword`.
pub fn card_string_value(cards: &[Card], keyword: &str) -> Option<String> {
    cards.iter().find_map(|c| match &c.value {
        Some(Value::String(s)) if c.keyword_str() == keyword => Some(s.trim().into()),
        _ => None,
    })
}

fn required_usize(cards: &[Card], keyword: &'static str) -> Result<usize> {
    let n = card_integer_value(cards, keyword).ok_or(Error::MissingKeyword(keyword))?;
    usize::try_from(n).map_err(|_| Error::InvalidValue(keyword))
}

fn axis_lengths(cards: &[Card]) -> Result<Vec<usize>> {
    let naxis = required_usize(cards, "NAXIS")?;
    (1..=naxis)
        .map(|i| {
            let n = card_integer_value(cards, &format!("NAXIS{i}"))
                .ok_or(Error::MissingKeyword("NAXISn"))?;
            usize::try_from(n).map_err(|_| Error::InvalidValue("NAXISn"))
        })
        .collect()
}

/// `|BITPIX|/8 * GCOUNT * (PCOUNT + NAXIS1 * ... * NAXISn)`.
fn compute_data_byte_len(cards: &[Card], is_primary: bool) -> Result<usize> {
    let bitpix = card_integer_value(cards, "BITPIX").ok_or(Error::MissingKeyword("BITPIX"))?;
    let dims = axis_lengths(cards)?;
    if dims.is_empty() {
        return Ok(0);
    }

    let bytes_per_value = (bitpix.unsigned_abs() as usize) / 8;
    let total: usize = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(Error::InvalidHeader("data size overflow"))?;

    let (pcount, gcount) = if is_primary {
        (0, 1)
    } else {
        let p = card_integer_value(cards, "PCOUNT").unwrap_or(0).max(0) as usize;
        let g = card_integer_value(cards, "GCOUNT").unwrap_or(1).max(1) as usize;
        (p, g)
    };

    total
        .checked_mul(bytes_per_value)
        .and_then(|n| n.checked_add(pcount))
        .and_then(|n| n.checked_mul(gcount))
        .ok_or(Error::InvalidHeader("data size overflow"))
}

fn parse_hdu_info(cards: &[Card], is_primary: bool) -> Result<HduInfo> {
    if is_primary {
        validate_primary(cards)?;
        let bitpix = card_integer_value(cards, "BITPIX").ok_or(Error::MissingKeyword("BITPIX"))?;
        return Ok(HduInfo::Primary {
            bitpix,
            naxes: axis_lengths(cards)?,
        });
    }

    let xtension = card_string_value(cards, "XTENSION").ok_or(Error::MissingKeyword("XTENSION"))?;
    if xtension != "BINTABLE" {
        return Ok(HduInfo::Other { xtension });
    }

    validate_binary_table(cards)?;
    Ok(HduInfo::BinaryTable {
        naxis1: required_usize(cards, "NAXIS1")?,
        naxis2: required_usize(cards, "NAXIS2")?,
        pcount: required_usize(cards, "PCOUNT")?,
        tfields: required_usize(cards, "TFIELDS")?,
    })
}

/// Parse a complete FITS byte stream into a [`FitsData`] containing all HDUs.
///
/// Garbage after the last complete HDU is ignored; a truncated data segment
/// is an error.
pub fn parse_fits(data: &[u8]) -> Result<FitsData> {
    if data.len() < BLOCK_SIZE {
        return Err(Error::UnexpectedEof);
    }

    let mut hdus: Vec<Hdu> = Vec::new();
    let mut offset: usize = 0;

    while data.len().saturating_sub(offset) >= BLOCK_SIZE {
        let remaining = &data[offset..];

        let header_len = match header_byte_len(remaining) {
            Ok(len) => len,
            Err(_) if !hdus.is_empty() => break,
            Err(e) => return Err(e),
        };
        let cards = parse_header_blocks(&remaining[..header_len])?;

        let is_primary = hdus.is_empty();
        if is_primary && cards.first().map(Card::keyword_str) != Some("SIMPLE") {
            return Err(Error::InvalidHeader("first HDU must be primary"));
        }

        let info = parse_hdu_info(&cards, is_primary)?;
        let data_len = compute_data_byte_len(&cards, is_primary)?;
        let data_start = offset + header_len;

        // trailing block padding may be missing, the data itself may not
        if data_start + data_len > data.len() {
            return Err(Error::UnexpectedEof);
        }

        hdus.push(Hdu {
            info,
            header_start: offset,
            data_start,
            data_len,
            cards,
        });

        offset = data_start + padded_byte_len(data_len);
    }

    Ok(FitsData { hdus })
}
