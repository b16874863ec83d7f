//! Serializing an [`OIFitsFile`] back to FITS.
//!
//! The writer trusts the model: it does not run any check, so an invalid
//! model produces an invalid file. Only shapes that cannot be laid out as a
//! binary table (columns of differing lengths) are refused.

use std::path::Path;

use log::{debug, trace};

use crate::cell::{ColumnValue, KeywordValue};
use crate::constants::KEYWORD_NAXIS2;
use crate::error::{Error, Result};
use crate::file::OIFitsFile;
use crate::fits::bintable::{
    build_binary_table_cards, serialize_binary_table, BinaryColumnData, BinaryColumnDescriptor,
    BinaryColumnType,
};
use crate::fits::header::{serialize_header, Card};
use crate::fits::primary::build_empty_primary_header;
use crate::fits::value::Value;
use crate::meta::{ColumnMeta, Repeat, Types};
use crate::table::OITable;

/// Writes OIFITS files.
pub struct OIFitsWriter;

impl OIFitsWriter {
    /// Write `file` to `path`, replacing any existing file.
    pub fn write(path: impl AsRef<Path>, file: &OIFitsFile) -> Result<()> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(file)?;
        debug!("writing {} bytes to {}", bytes.len(), path.display());
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize `file`: an empty primary HDU, then one binary table per
    /// registered table in registration order.
    pub fn to_bytes(file: &OIFitsFile) -> Result<Vec<u8>> {
        let mut out = serialize_header(&build_empty_primary_header());
        for table in file.tables() {
            out.extend(table_bytes(table)?);
        }
        Ok(out)
    }
}

fn table_bytes(table: &OITable) -> Result<Vec<u8>> {
    let kind = table.kind();

    let mut descriptors = Vec::new();
    let mut payload = Vec::new();
    for meta in kind.column_descriptors() {
        if let Some(value) = table.column(meta.name) {
            let (descriptor, data) = column_payload(meta, value);
            descriptors.push(descriptor);
            payload.push((value.nrows(), data));
        }
    }

    let nrows = payload
        .first()
        .map(|(n, _)| *n)
        .unwrap_or_else(|| table.nb_rows());
    if payload.iter().any(|(n, _)| *n != nrows) {
        return Err(Error::InvalidValue("columns of differing lengths"));
    }
    let payload: Vec<BinaryColumnData> = payload.into_iter().map(|(_, d)| d).collect();

    let mut cards = build_binary_table_cards(&descriptors, nrows);
    for meta in kind.keyword_descriptors() {
        if meta.name == KEYWORD_NAXIS2 {
            continue;
        }
        if let Some(value) = table.keyword(meta.name) {
            trace!("keyword {} = {value}", meta.name);
            let value = header_value(meta.data_type, value);
            cards.push(Card::new(meta.name, value).with_comment(meta.description));
        }
    }
    cards.extend(
        table
            .extra_cards()
            .iter()
            .filter(|c| !c.is_structural())
            .cloned(),
    );

    debug!("writing {table}: {nrows} rows, {} columns", descriptors.len());
    let mut out = serialize_header(&cards);
    out.extend(serialize_binary_table(&descriptors, &payload, nrows)?);
    Ok(out)
}

/// Binary table layout and data of one column. Strings are written at
/// least as wide as declared, and wider when a value needs it.
fn column_payload(
    meta: &ColumnMeta,
    value: &ColumnValue,
) -> (BinaryColumnDescriptor, BinaryColumnData) {
    let (repeat, col_type, data) = match value {
        ColumnValue::Char(strings) => {
            let declared = match meta.repeat {
                Repeat::Fixed(n) => n,
                Repeat::NWave => 0,
            };
            let width = strings.iter().map(String::len).fold(declared, usize::max);
            (width, BinaryColumnType::Ascii, BinaryColumnData::Ascii(strings.clone()))
        }
        ColumnValue::Short(cells) => (
            cells.repeat(),
            BinaryColumnType::Short,
            BinaryColumnData::Short(cells.values().to_vec()),
        ),
        ColumnValue::Real(cells) => (
            cells.repeat(),
            BinaryColumnType::Float,
            BinaryColumnData::Float(cells.values().to_vec()),
        ),
        ColumnValue::Double(cells) => (
            cells.repeat(),
            BinaryColumnType::Double,
            BinaryColumnData::Double(cells.values().to_vec()),
        ),
        ColumnValue::Logical(cells) => (
            cells.repeat(),
            BinaryColumnType::Logical,
            BinaryColumnData::Logical(cells.values().to_vec()),
        ),
        ColumnValue::Complex(cells) => (
            cells.repeat(),
            BinaryColumnType::ComplexFloat,
            BinaryColumnData::ComplexFloat(
                cells.values().iter().map(|&[re, im]| (re, im)).collect(),
            ),
        ),
    };

    let mut descriptor = BinaryColumnDescriptor::new(meta.name, repeat, col_type);
    descriptor.unit = Some(String::from(meta.unit.standard_representation()));
    descriptor.comment = Some(String::from(meta.description));
    (descriptor, data)
}

/// Header value of a keyword, converted to its declared type.
fn header_value(declared: Types, value: &KeywordValue) -> Value {
    match (declared, value) {
        (Types::Char, v) => Value::String(v.to_string()),
        (Types::Logical, KeywordValue::Logical(b)) => Value::Logical(*b),
        (Types::Int, KeywordValue::Int(n)) => Value::Integer(i64::from(*n)),
        (Types::Int, KeywordValue::Double(d)) => Value::Integer(*d as i64),
        (_, KeywordValue::Int(n)) => Value::Float(f64::from(*n)),
        (_, KeywordValue::Double(d)) => Value::Float(*d),
        (_, KeywordValue::Char(s)) => Value::String(s.clone()),
        (_, KeywordValue::Logical(b)) => Value::Logical(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cells;
    use crate::fits::bintable::BinaryTableLayout;
    use crate::fits::hdu::parse_fits;
    use crate::table::TableKind;

    fn array_table() -> OITable {
        let mut table = OITable::with_rows(TableKind::Array, 0, 2).unwrap();
        table.set_keyword("ARRNAME", "VLTI");
        table.set_keyword("FRAME", "GEOCENTRIC");
        table.set_keyword("ARRAYX", 1.0);
        table.set_keyword("ARRAYY", 2.0);
        table.set_keyword("ARRAYZ", 3.0);
        table.set_column(
            "STA_NAME",
            ColumnValue::Char(vec!["E1".into(), "G1".into()]),
        );
        table.set_column("STA_INDEX", ColumnValue::Short(Cells::scalars(vec![1, 2])));
        table
    }

    fn file_with(table: OITable) -> OIFitsFile {
        let mut file = OIFitsFile::new();
        file.register_oi_table(table);
        file
    }

    // --- layout ---

    #[test]
    fn char_columns_keep_declared_width() {
        let file = file_with(array_table());
        let bytes = OIFitsWriter::to_bytes(&file).unwrap();
        let fits = parse_fits(&bytes).unwrap();
        let layout = BinaryTableLayout::from_hdu(&fits.hdus[1]).unwrap();
        let sta_name = layout
            .columns
            .iter()
            .find(|c| c.name.as_deref() == Some("STA_NAME"))
            .unwrap();
        assert_eq!(sta_name.repeat, 16);
        assert_eq!(
            file.table(0).unwrap().column("STA_NAME").unwrap().as_chars().unwrap()[0],
            "E1"
        );
    }

    #[test]
    fn long_strings_widen_the_column() {
        let mut table = array_table();
        table.set_column(
            "TEL_NAME",
            ColumnValue::Char(vec!["A".repeat(20), "B".into()]),
        );
        let bytes = OIFitsWriter::to_bytes(&file_with(table)).unwrap();
        let fits = parse_fits(&bytes).unwrap();
        let layout = BinaryTableLayout::from_hdu(&fits.hdus[1]).unwrap();
        let tel = layout
            .columns
            .iter()
            .find(|c| c.name.as_deref() == Some("TEL_NAME"))
            .unwrap();
        assert_eq!(tel.repeat, 20);
    }

    #[test]
    fn columns_follow_descriptor_order() {
        let bytes = OIFitsWriter::to_bytes(&file_with(array_table())).unwrap();
        let fits = parse_fits(&bytes).unwrap();
        let layout = BinaryTableLayout::from_hdu(&fits.hdus[1]).unwrap();
        let names: Vec<&str> = layout.columns.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, ["TEL_NAME", "STA_NAME", "STA_INDEX", "DIAMETER", "STAXYZ"]);
        assert_eq!(layout.columns[3].unit.as_deref(), Some("m"));
    }

    // --- header ---

    #[test]
    fn keywords_carry_descriptions() {
        let bytes = OIFitsWriter::to_bytes(&file_with(array_table())).unwrap();
        let fits = parse_fits(&bytes).unwrap();
        let cards = &fits.hdus[1].cards;
        let arrname = cards.iter().find(|c| c.keyword_str() == "ARRNAME").unwrap();
        assert_eq!(arrname.value, Some(Value::String("VLTI".into())));
        assert!(arrname.comment.is_some());
        let naxis2: Vec<_> = cards.iter().filter(|c| c.keyword_str() == "NAXIS2").collect();
        assert_eq!(naxis2.len(), 1);
        assert_eq!(naxis2[0].value, Some(Value::Integer(2)));
    }

    #[test]
    fn checksum_cards_are_not_written_back() {
        let mut table = array_table();
        table.push_extra_card(Card::new("CHECKSUM", Value::String("9aBMAZ9K9aBKAZ9K".into())));
        table.push_extra_card(Card::new("DATASUM", Value::String("1234567".into())));
        table.push_extra_card(Card::new("TELESCOP", Value::String("VLTI".into())));
        let bytes = OIFitsWriter::to_bytes(&file_with(table)).unwrap();
        let fits = parse_fits(&bytes).unwrap();
        let keywords: Vec<&str> = fits.hdus[1].cards.iter().map(Card::keyword_str).collect();
        assert!(!keywords.contains(&"CHECKSUM"));
        assert!(!keywords.contains(&"DATASUM"));
        assert!(keywords.contains(&"TELESCOP"));
    }

    #[test]
    fn declared_type_wins_on_output() {
        assert_eq!(
            header_value(Types::Double, &KeywordValue::Int(3)),
            Value::Float(3.0)
        );
        assert_eq!(
            header_value(Types::Int, &KeywordValue::Double(1.0)),
            Value::Integer(1)
        );
        assert_eq!(
            header_value(Types::Char, &KeywordValue::Int(7)),
            Value::String("7".into())
        );
    }

    #[test]
    fn ragged_columns_are_refused() {
        let mut table = array_table();
        table.set_column("STA_INDEX", ColumnValue::Short(Cells::scalars(vec![1, 2, 3])));
        assert!(matches!(
            OIFitsWriter::to_bytes(&file_with(table)),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn empty_file_is_a_primary_hdu() {
        let bytes = OIFitsWriter::to_bytes(&OIFitsFile::new()).unwrap();
        assert_eq!(bytes.len(), 2880);
        assert_eq!(parse_fits(&bytes).unwrap().len(), 1);
    }
}
