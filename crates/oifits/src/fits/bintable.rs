//! FITS binary table extension reading and writing.

use super::block::padded_byte_len;
use super::endian::{
    read_f32_be, read_f64_be, read_i16_be, read_i32_be, read_i64_be, write_f32_be, write_f64_be,
    write_i16_be,
};
use super::hdu::{card_string_value, Hdu, HduInfo};
use super::header::{find_card, Card};
use super::value::Value;
use crate::error::{Error, Result};

/// The data type of a column in a FITS binary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryColumnType {
    /// L -- logical, stored as a single byte (T/F/0).
    Logical,
    /// X -- bit array.
    Bit,
    /// B -- unsigned byte.
    Byte,
    /// I -- 16-bit signed integer.
    Short,
    /// J -- 32-bit signed integer.
    Int,
    /// K -- 64-bit signed integer.
    Long,
    /// E -- 32-bit IEEE float.
    Float,
    /// D -- 64-bit IEEE float.
    Double,
    /// C -- complex: pair of 32-bit IEEE floats.
    ComplexFloat,
    /// M -- complex: pair of 64-bit IEEE floats.
    ComplexDouble,
    /// A -- ASCII character.
    Ascii,
    /// P -- 32-bit variable-length array descriptor.
    VarArrayP,
    /// Q -- 64-bit variable-length array descriptor.
    VarArrayQ,
}

impl BinaryColumnType {
    /// The TFORM type letter.
    pub fn code(&self) -> char {
        match self {
            BinaryColumnType::Logical => 'L',
            BinaryColumnType::Bit => 'X',
            BinaryColumnType::Byte => 'B',
            BinaryColumnType::Short => 'I',
            BinaryColumnType::Int => 'J',
            BinaryColumnType::Long => 'K',
            BinaryColumnType::Float => 'E',
            BinaryColumnType::Double => 'D',
            BinaryColumnType::ComplexFloat => 'C',
            BinaryColumnType::ComplexDouble => 'M',
            BinaryColumnType::Ascii => 'A',
            BinaryColumnType::VarArrayP => 'P',
            BinaryColumnType::VarArrayQ => 'Q',
        }
    }

    /// Bytes per element. Bit columns return 0 (see [`compute_byte_width`]).
    pub fn byte_size(&self) -> usize {
        match self {
            BinaryColumnType::Bit => 0,
            BinaryColumnType::Logical | BinaryColumnType::Byte | BinaryColumnType::Ascii => 1,
            BinaryColumnType::Short => 2,
            BinaryColumnType::Int | BinaryColumnType::Float => 4,
            BinaryColumnType::Long
            | BinaryColumnType::Double
            | BinaryColumnType::ComplexFloat
            | BinaryColumnType::VarArrayP => 8,
            BinaryColumnType::ComplexDouble | BinaryColumnType::VarArrayQ => 16,
        }
    }
}

/// Describes one column in a binary table.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryColumnDescriptor {
    /// Column name (from TTYPEn), if present.
    pub name: Option<String>,
    /// Physical unit (from TUNITn), if present.
    pub unit: Option<String>,
    /// Comment attached to the TTYPEn card.
    pub comment: Option<String>,
    /// Repeat count from TFORMn.
    pub repeat: usize,
    /// The element data type.
    pub col_type: BinaryColumnType,
    /// Total bytes this column occupies per row.
    pub byte_width: usize,
}

impl BinaryColumnDescriptor {
    /// Fixed-width column descriptor without a unit or comment.
    pub fn new(name: &str, repeat: usize, col_type: BinaryColumnType) -> Self {
        BinaryColumnDescriptor {
            name: Some(String::from(name)),
            unit: None,
            comment: None,
            repeat,
            col_type,
            byte_width: compute_byte_width(repeat, &col_type),
        }
    }

    /// TFORM value for this column, e.g. `16A` or `2I`.
    pub fn tform(&self) -> String {
        format!("{}{}", self.repeat, self.col_type.code())
    }
}

/// Column data extracted from (or written to) a binary table. Values are
/// stored row-major, `repeat` values per row; ASCII columns hold one string
/// per row.
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryColumnData {
    Logical(Vec<bool>),
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    ComplexFloat(Vec<(f32, f32)>),
    ComplexDouble(Vec<(f64, f64)>),
    Ascii(Vec<String>),
}

/// Parse a TFORMn value like "1J", "10E", "16A", "1PB(200)".
///
/// Returns the repeat count and the column type.
pub fn parse_tform_binary(s: &str) -> Result<(usize, BinaryColumnType)> {
    let s = s.trim();
    // optional (maxlen) suffix of variable-length arrays
    let s = s.find('(').map_or(s, |paren| &s[..paren]);
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(Error::InvalidValue("empty TFORM"));
    }

    let (repeat_str, col_type) = if bytes.len() >= 2 && matches!(bytes[bytes.len() - 2], b'P' | b'Q')
    {
        let t = if bytes[bytes.len() - 2] == b'P' {
            BinaryColumnType::VarArrayP
        } else {
            BinaryColumnType::VarArrayQ
        };
        (&s[..s.len() - 2], t)
    } else {
        let t = match bytes[bytes.len() - 1] {
            b'L' => BinaryColumnType::Logical,
            b'X' => BinaryColumnType::Bit,
            b'B' => BinaryColumnType::Byte,
            b'I' => BinaryColumnType::Short,
            b'J' => BinaryColumnType::Int,
            b'K' => BinaryColumnType::Long,
            b'E' => BinaryColumnType::Float,
            b'D' => BinaryColumnType::Double,
            b'C' => BinaryColumnType::ComplexFloat,
            b'M' => BinaryColumnType::ComplexDouble,
            b'A' => BinaryColumnType::Ascii,
            _ => return Err(Error::InvalidValue("unknown TFORM type code")),
        };
        (&s[..s.len() - 1], t)
    };

    let repeat = if repeat_str.is_empty() {
        1
    } else {
        repeat_str
            .parse::<usize>()
            .map_err(|_| Error::InvalidValue("TFORM repeat count"))?
    };

    Ok((repeat, col_type))
}

/// Compute the byte width of a column given its repeat count and type.
pub fn compute_byte_width(repeat: usize, col_type: &BinaryColumnType) -> usize {
    match col_type {
        BinaryColumnType::Bit => repeat.div_ceil(8),
        _ => repeat * col_type.byte_size(),
    }
}

/// Extract binary table column descriptors from header cards.
pub fn parse_binary_table_columns(
    cards: &[Card],
    tfields: usize,
) -> Result<Vec<BinaryColumnDescriptor>> {
    let mut columns = Vec::with_capacity(tfields);

    for i in 1..=tfields {
        let tform_str =
            card_string_value(cards, &format!("TFORM{i}")).ok_or(Error::MissingKeyword("TFORMn"))?;
        let (repeat, col_type) = parse_tform_binary(&tform_str)?;

        let ttype = find_card(cards, &format!("TTYPE{i}"));
        let name = ttype.and_then(|c| match &c.value {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            _ => None,
        });
        let comment = ttype.and_then(|c| c.comment.clone());
        let unit = card_string_value(cards, &format!("TUNIT{i}"));

        columns.push(BinaryColumnDescriptor {
            name,
            unit,
            comment,
            repeat,
            col_type,
            byte_width: compute_byte_width(repeat, &col_type),
        });
    }

    Ok(columns)
}

/// Compute byte offsets for each column within a row.
fn column_offsets(columns: &[BinaryColumnDescriptor]) -> Vec<usize> {
    columns
        .iter()
        .scan(0usize, |offset, col| {
            let start = *offset;
            *offset += col.byte_width;
            Some(start)
        })
        .collect()
}

/// Parsed layout of a binary table HDU.
#[derive(Debug, Clone)]
pub struct BinaryTableLayout {
    pub naxis1: usize,
    pub naxis2: usize,
    pub columns: Vec<BinaryColumnDescriptor>,
    offsets: Vec<usize>,
}

impl BinaryTableLayout {
    /// Read the layout of a BINTABLE HDU.
    pub fn from_hdu(hdu: &Hdu) -> Result<Self> {
        let (naxis1, naxis2, tfields) = match &hdu.info {
            HduInfo::BinaryTable {
                naxis1,
                naxis2,
                tfields,
                ..
            } => (*naxis1, *naxis2, *tfields),
            _ => return Err(Error::InvalidHeader("not a binary table")),
        };
        let columns = parse_binary_table_columns(&hdu.cards, tfields)?;
        let offsets = column_offsets(&columns);
        let row_width = columns.iter().map(|c| c.byte_width).sum::<usize>();
        if row_width > naxis1 {
            return Err(Error::InvalidHeader("columns wider than NAXIS1"));
        }
        Ok(BinaryTableLayout {
            naxis1,
            naxis2,
            columns,
            offsets,
        })
    }

    /// Read one column of a table whose data segment is `table_data`.
    pub fn read_column(&self, table_data: &[u8], col_index: usize) -> Result<BinaryColumnData> {
        let col = self
            .columns
            .get(col_index)
            .ok_or(Error::InvalidValue("column index"))?;
        if table_data.len() < self.naxis1 * self.naxis2 {
            return Err(Error::UnexpectedEof);
        }
        read_column_cells(table_data, self.naxis1, self.naxis2, col, self.offsets[col_index])
    }
}

/// Collect `repeat` values per row, each decoded from `width` bytes.
fn collect_cells<T>(
    data: &[u8],
    naxis1: usize,
    naxis2: usize,
    col: &BinaryColumnDescriptor,
    col_offset: usize,
    width: usize,
    decode: impl Fn(&[u8]) -> T,
) -> Vec<T> {
    let mut values = Vec::with_capacity(naxis2 * col.repeat);
    for row in 0..naxis2 {
        let base = row * naxis1 + col_offset;
        for r in 0..col.repeat {
            values.push(decode(&data[base + r * width..]));
        }
    }
    values
}

fn read_column_cells(
    data: &[u8],
    naxis1: usize,
    naxis2: usize,
    col: &BinaryColumnDescriptor,
    col_offset: usize,
) -> Result<BinaryColumnData> {
    let width = col.col_type.byte_size();
    Ok(match col.col_type {
        BinaryColumnType::Bit | BinaryColumnType::VarArrayP | BinaryColumnType::VarArrayQ => {
            return Err(Error::InvalidValue("unsupported column type"))
        }
        BinaryColumnType::Logical => BinaryColumnData::Logical(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, |b| b[0] == b'T',
        )),
        BinaryColumnType::Byte => BinaryColumnData::Byte(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, |b| b[0],
        )),
        BinaryColumnType::Short => BinaryColumnData::Short(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, read_i16_be,
        )),
        BinaryColumnType::Int => BinaryColumnData::Int(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, read_i32_be,
        )),
        BinaryColumnType::Long => BinaryColumnData::Long(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, read_i64_be,
        )),
        BinaryColumnType::Float => BinaryColumnData::Float(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, read_f32_be,
        )),
        BinaryColumnType::Double => BinaryColumnData::Double(collect_cells(
            data, naxis1, naxis2, col, col_offset, width, read_f64_be,
        )),
        BinaryColumnType::ComplexFloat => BinaryColumnData::ComplexFloat(collect_cells(
            data,
            naxis1,
            naxis2,
            col,
            col_offset,
            width,
            |b| (read_f32_be(b), read_f32_be(&b[4..])),
        )),
        BinaryColumnType::ComplexDouble => BinaryColumnData::ComplexDouble(collect_cells(
            data,
            naxis1,
            naxis2,
            col,
            col_offset,
            width,
            |b| (read_f64_be(b), read_f64_be(&b[8..])),
        )),
        BinaryColumnType::Ascii => {
            let mut values = Vec::with_capacity(naxis2);
            for row in 0..naxis2 {
                let base = row * naxis1 + col_offset;
                let bytes = &data[base..base + col.repeat];
                // a NUL terminates the string early
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                values.push(String::from_utf8_lossy(&bytes[..end]).trim_end().to_string());
            }
            BinaryColumnData::Ascii(values)
        }
    })
}

/// Serialize a single cell (one column, one row) into `out`.
fn serialize_cell(
    col: &BinaryColumnDescriptor,
    data: &BinaryColumnData,
    row_index: usize,
    out: &mut [u8],
) -> Result<()> {
    let repeat = col.repeat;
    let start = row_index * repeat;
    match (col.col_type, data) {
        (BinaryColumnType::Logical, BinaryColumnData::Logical(vals)) => {
            for (dst, &v) in out.iter_mut().zip(&vals[start..start + repeat]) {
                *dst = if v { b'T' } else { b'F' };
            }
        }
        (BinaryColumnType::Short, BinaryColumnData::Short(vals)) => {
            for (i, &v) in vals[start..start + repeat].iter().enumerate() {
                write_i16_be(&mut out[i * 2..], v);
            }
        }
        (BinaryColumnType::Float, BinaryColumnData::Float(vals)) => {
            for (i, &v) in vals[start..start + repeat].iter().enumerate() {
                write_f32_be(&mut out[i * 4..], v);
            }
        }
        (BinaryColumnType::Double, BinaryColumnData::Double(vals)) => {
            for (i, &v) in vals[start..start + repeat].iter().enumerate() {
                write_f64_be(&mut out[i * 8..], v);
            }
        }
        (BinaryColumnType::ComplexFloat, BinaryColumnData::ComplexFloat(vals)) => {
            for (i, &(re, im)) in vals[start..start + repeat].iter().enumerate() {
                write_f32_be(&mut out[i * 8..], re);
                write_f32_be(&mut out[i * 8 + 4..], im);
            }
        }
        (BinaryColumnType::Ascii, BinaryColumnData::Ascii(vals)) => {
            out.fill(b' ');
            let s = vals[row_index].as_bytes();
            let len = s.len().min(repeat);
            out[..len].copy_from_slice(&s[..len]);
        }
        _ => return Err(Error::InvalidValue("column data does not match its type")),
    }
    Ok(())
}

/// Build the structural header cards of a binary table extension, followed
/// by TTYPEn / TFORMn / TUNITn for every column.
pub fn build_binary_table_cards(columns: &[BinaryColumnDescriptor], naxis2: usize) -> Vec<Card> {
    let naxis1: usize = columns.iter().map(|c| c.byte_width).sum();

    let mut cards = vec![
        Card::new("XTENSION", Value::String(String::from("BINTABLE")))
            .with_comment("binary table extension"),
        Card::new("BITPIX", Value::Integer(8)).with_comment("8-bit bytes"),
        Card::new("NAXIS", Value::Integer(2)).with_comment("2-dimensional binary table"),
        Card::new("NAXIS1", Value::Integer(naxis1 as i64)).with_comment("width of table in bytes"),
        Card::new("NAXIS2", Value::Integer(naxis2 as i64)).with_comment("number of rows in table"),
        Card::new("PCOUNT", Value::Integer(0)).with_comment("size of special data area"),
        Card::new("GCOUNT", Value::Integer(1)).with_comment("one data group"),
        Card::new("TFIELDS", Value::Integer(columns.len() as i64))
            .with_comment("number of fields in each row"),
    ];

    for (i, col) in columns.iter().enumerate() {
        let n = i + 1;
        if let Some(ref name) = col.name {
            let mut ttype = Card::new(&format!("TTYPE{n}"), Value::String(name.clone()));
            ttype.comment = col.comment.clone();
            cards.push(ttype);
        }
        cards.push(Card::new(&format!("TFORM{n}"), Value::String(col.tform())));
        if let Some(unit) = col.unit.as_deref().filter(|u| !u.is_empty()) {
            cards.push(Card::new(&format!("TUNIT{n}"), Value::String(String::from(unit))));
        }
    }

    cards
}

/// Serialize all rows of a binary table into padded FITS data bytes.
///
/// The returned buffer is padded to a multiple of 2880 bytes with zeros.
pub fn serialize_binary_table(
    columns: &[BinaryColumnDescriptor],
    col_data: &[BinaryColumnData],
    naxis2: usize,
) -> Result<Vec<u8>> {
    if columns.len() != col_data.len() {
        return Err(Error::InvalidValue("column count mismatch"));
    }

    let naxis1: usize = columns.iter().map(|c| c.byte_width).sum();
    let mut buf = vec![0u8; padded_byte_len(naxis1 * naxis2)];
    let offsets = column_offsets(columns);

    for row in 0..naxis2 {
        for ((col, data), &offset) in columns.iter().zip(col_data).zip(&offsets) {
            let dest_start = row * naxis1 + offset;
            serialize_cell(col, data, row, &mut buf[dest_start..dest_start + col.byte_width])?;
        }
    }

    Ok(buf)
}
