//! FITS header cards: parsing 80-byte records and writing them back.

use std::str;

use super::block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE, HEADER_PAD_BYTE};
use super::value::{format_value, parse_value, Value};
use crate::error::{Error, Result};

// ── Types ──

/// A parsed FITS header card (one 80-byte keyword record).
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// The 8-byte keyword name, ASCII, left-justified, space-padded.
    pub keyword: [u8; 8],
    /// The parsed value, if this card has a value indicator (`= ` in bytes 8..10).
    pub value: Option<Value>,
    /// An optional comment string.
    pub comment: Option<String>,
}

impl Card {
    /// Build a valued card. Names longer than 8 bytes are truncated.
    pub fn new(name: &str, value: Value) -> Self {
        Card {
            keyword: keyword_bytes(name),
            value: Some(value),
            comment: None,
        }
    }

    /// Attach a comment, dropping it when empty.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment).filter(|c| !c.is_empty()).map(String::from);
        self
    }

    /// Return the keyword as a trimmed UTF-8 string.
    pub fn keyword_str(&self) -> &str {
        let end = self
            .keyword
            .iter()
            .rposition(|&b| b != b' ')
            .map(|i| i + 1)
            .unwrap_or(0);
        str::from_utf8(&self.keyword[..end]).unwrap_or("")
    }

    /// Returns `true` if this card is the END keyword.
    pub fn is_end(&self) -> bool {
        &self.keyword == b"END     "
    }

    /// Returns `true` if this is a blank card (keyword is all spaces).
    pub fn is_blank(&self) -> bool {
        self.keyword.iter().all(|&b| b == b' ')
    }

    /// Returns `true` if this card carries a commentary keyword
    /// (COMMENT, HISTORY, or blank).
    pub fn is_commentary(&self) -> bool {
        let kw = self.keyword_str();
        kw == "COMMENT" || kw == "HISTORY" || self.is_blank()
    }

    /// Returns `true` if this card describes the HDU layout or its checksums.
    /// Such cards are derived from the data and rebuilt on every write.
    pub fn is_structural(&self) -> bool {
        let kw = self.keyword_str();
        STRUCTURAL_KEYWORDS.contains(&kw)
            || COLUMN_KEYWORD_PREFIXES.iter().any(|p| {
                kw.strip_prefix(p)
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
    }
}

const STRUCTURAL_KEYWORDS: &[&str] = &[
    "SIMPLE", "XTENSION", "BITPIX", "NAXIS", "NAXIS1", "NAXIS2", "PCOUNT", "GCOUNT", "TFIELDS",
    "THEAP", "EXTEND", "END", "CHECKSUM", "DATASUM",
];

/// Per-column keywords, followed by the column number.
const COLUMN_KEYWORD_PREFIXES: &[&str] = &[
    "TTYPE", "TFORM", "TUNIT", "TDIM", "TNULL", "TSCAL", "TZERO", "TDISP",
];

/// Pad a keyword name to 8 bytes with trailing ASCII spaces.
pub fn keyword_bytes(name: &str) -> [u8; 8] {
    let mut k = [b' '; 8];
    let bytes = name.as_bytes();
    let len = bytes.len().min(8);
    k[..len].copy_from_slice(&bytes[..len]);
    k
}

/// Find the first card whose trimmed keyword equals `name`.
pub fn find_card<'a>(cards: &'a [Card], name: &str) -> Option<&'a Card> {
    cards.iter().find(|c| c.keyword_str() == name)
}

// ── Parsing ──

/// Keywords that never carry a value indicator. Their bytes 8..80 are free-form text.
const COMMENTARY_KEYWORDS: [&[u8; 8]; 3] = [b"COMMENT ", b"HISTORY ", b"        "];

fn free_text(card_bytes: &[u8; CARD_SIZE]) -> Result<Option<String>> {
    let text = str::from_utf8(&card_bytes[8..CARD_SIZE])
        .map_err(|_| Error::InvalidHeader("non-ASCII header card"))?
        .trim_end();
    Ok(Some(text).filter(|t| !t.is_empty()).map(String::from))
}

/// Parse a single 80-byte FITS header card.
pub fn parse_card(card_bytes: &[u8; CARD_SIZE]) -> Result<Card> {
    let mut keyword = [b' '; 8];
    keyword.copy_from_slice(&card_bytes[..8]);

    for &b in &keyword {
        match b {
            b'A'..=b'Z' | b'0'..=b'9' | b' ' | b'-' | b'_' => {}
            _ => return Err(Error::InvalidKeyword),
        }
    }

    if &keyword == b"END     " {
        return Ok(Card {
            keyword,
            value: None,
            comment: None,
        });
    }

    if COMMENTARY_KEYWORDS.contains(&&keyword) || !(card_bytes[8] == b'=' && card_bytes[9] == b' ')
    {
        return Ok(Card {
            keyword,
            value: None,
            comment: free_text(card_bytes)?,
        });
    }

    let value_field = &card_bytes[10..CARD_SIZE];
    match parse_value(value_field) {
        Some((val, comment)) => Ok(Card {
            keyword,
            value: Some(val),
            comment: comment.map(String::from),
        }),
        None => {
            let field_str = str::from_utf8(value_field)
                .map_err(|_| Error::InvalidHeader("non-ASCII header card"))?;
            Ok(Card {
                keyword,
                value: None,
                comment: comment_of_empty_value(field_str),
            })
        }
    }
}

fn comment_of_empty_value(field: &str) -> Option<String> {
    let idx = field.find(" /")?;
    let rest = &field[idx + 2..];
    let comment = rest.strip_prefix(' ').unwrap_or(rest).trim_end();
    Some(comment).filter(|c| !c.is_empty()).map(String::from)
}

/// Parse consecutive 2880-byte header blocks until the END card is found.
///
/// Only complete blocks are scanned; a trailing partial block is ignored.
pub fn parse_header_blocks(data: &[u8]) -> Result<Vec<Card>> {
    if data.len() < BLOCK_SIZE {
        return Err(Error::UnexpectedEof);
    }

    let mut cards = Vec::new();
    for chunk in data.chunks_exact(CARD_SIZE).take(data.len() / BLOCK_SIZE * CARDS_PER_BLOCK) {
        let card_bytes: &[u8; CARD_SIZE] = chunk
            .try_into()
            .map_err(|_| Error::InvalidHeader("truncated card"))?;
        let card = parse_card(card_bytes)?;
        let is_end = card.is_end();
        cards.push(card);
        if is_end {
            return Ok(cards);
        }
    }

    Err(Error::UnexpectedEof)
}

/// Return the number of bytes consumed by the header (always a multiple of
/// [`BLOCK_SIZE`]).
pub fn header_byte_len(data: &[u8]) -> Result<usize> {
    let num_blocks = data.len() / BLOCK_SIZE;

    for block_idx in 0..num_blocks {
        let block_start = block_idx * BLOCK_SIZE;
        for card_idx in 0..CARDS_PER_BLOCK {
            let card_start = block_start + card_idx * CARD_SIZE;
            if &data[card_start..card_start + 8] == b"END     " {
                return Ok((block_idx + 1) * BLOCK_SIZE);
            }
        }
    }

    Err(Error::UnexpectedEof)
}

// ── Writing ──

/// Serialize a [`Card`] into an 80-byte FITS card image.
pub fn format_card(card: &Card) -> [u8; CARD_SIZE] {
    let mut buf = [b' '; CARD_SIZE];
    buf[..8].copy_from_slice(&card.keyword);

    if let Some(ref value) = card.value {
        buf[8] = b'=';
        buf[9] = b' ';

        let mut value_field = format_value(value);
        if let Some(ref comment) = card.comment {
            insert_comment(&mut value_field, comment);
        }
        buf[10..80].copy_from_slice(&value_field);
    } else if !card.is_blank() {
        if let Some(ref comment) = card.comment {
            let bytes = comment.as_bytes();
            let len = bytes.len().min(72);
            buf[8..8 + len].copy_from_slice(&bytes[..len]);
        }
    }

    buf
}

/// Insert a ` / comment` string into a 70-byte value field.
fn insert_comment(field: &mut [u8; 70], comment: &str) {
    let content_end = if field[0] == b'\'' {
        let mut i = 1;
        loop {
            if i >= 70 {
                break i;
            }
            if field[i] == b'\'' {
                if i + 1 < 70 && field[i + 1] == b'\'' {
                    i += 2;
                } else {
                    break i + 1;
                }
            } else {
                i += 1;
            }
        }
    } else {
        20
    };

    let sep_start = content_end + 1;
    if sep_start + 3 >= 70 {
        return;
    }

    field[sep_start] = b'/';
    field[sep_start + 1] = b' ';

    let comment_start = sep_start + 2;
    let comment_bytes = comment.as_bytes();
    let len = comment_bytes.len().min(70 - comment_start);
    field[comment_start..comment_start + len].copy_from_slice(&comment_bytes[..len]);
}

/// Create the standard FITS END card.
pub fn format_end_card() -> [u8; CARD_SIZE] {
    let mut buf = [b' '; CARD_SIZE];
    buf[..3].copy_from_slice(b"END");
    buf
}

/// Serialize a sequence of header cards into complete FITS header blocks.
///
/// Appends the END card and pads the final block with blanks.
pub fn serialize_header(cards: &[Card]) -> Vec<u8> {
    let total_blocks = (cards.len() + 1).div_ceil(CARDS_PER_BLOCK);
    let mut buf = vec![HEADER_PAD_BYTE; total_blocks * BLOCK_SIZE];

    for (i, card) in cards.iter().enumerate() {
        let offset = i * CARD_SIZE;
        buf[offset..offset + CARD_SIZE].copy_from_slice(&format_card(card));
    }

    let end_offset = cards.len() * CARD_SIZE;
    buf[end_offset..end_offset + CARD_SIZE].copy_from_slice(&format_end_card());

    buf
}

// ── Validation ──

fn require_keyword_at<'a>(cards: &'a [Card], index: usize, name: &'static str) -> Result<&'a Card> {
    match cards.get(index) {
        Some(card) if card.keyword_str() == name => Ok(card),
        _ => Err(Error::MissingKeyword(name)),
    }
}

fn require_integer(card: &Card, expected: i64, what: &'static str) -> Result<()> {
    match &card.value {
        Some(Value::Integer(n)) if *n == expected => Ok(()),
        _ => Err(Error::InvalidHeader(what)),
    }
}

/// Check the mandatory primary keywords (`SIMPLE = T`, `BITPIX`, `NAXIS`).
pub fn validate_primary(cards: &[Card]) -> Result<()> {
    let simple = require_keyword_at(cards, 0, "SIMPLE")?;
    if simple.value != Some(Value::Logical(true)) {
        return Err(Error::InvalidHeader("SIMPLE must be T"));
    }
    require_keyword_at(cards, 1, "BITPIX")?;
    require_keyword_at(cards, 2, "NAXIS")?;
    Ok(())
}

/// Check the mandatory keywords of a BINTABLE extension.
pub fn validate_binary_table(cards: &[Card]) -> Result<()> {
    require_keyword_at(cards, 0, "XTENSION")?;
    let bitpix = require_keyword_at(cards, 1, "BITPIX")?;
    require_integer(bitpix, 8, "BINTABLE requires BITPIX = 8")?;
    let naxis = require_keyword_at(cards, 2, "NAXIS")?;
    require_integer(naxis, 2, "BINTABLE requires NAXIS = 2")?;
    for name in ["NAXIS1", "NAXIS2", "PCOUNT", "GCOUNT", "TFIELDS"] {
        if find_card(cards, name).is_none() {
            return Err(Error::MissingKeyword(name));
        }
    }
    Ok(())
}

// ── Tests ──
