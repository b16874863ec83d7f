//! Reading OIFITS files into an [`OIFitsFile`].
//!
//! Container problems (I/O, truncated blocks, malformed headers) are fatal
//! and surface as [`Error`](crate::Error). Everything the OIFITS standard
//! says about the content is checked instead, and reported through
//! [`OIFitsChecker`].

use log::{debug, trace};

use crate::cell::{Cells, ColumnValue, KeywordValue};
use crate::checker::OIFitsChecker;
use crate::error::Result;
use crate::file::OIFitsFile;
use crate::fits::bintable::{BinaryColumnData, BinaryColumnDescriptor, BinaryTableLayout};
use crate::fits::gzip::{gunzip, is_gzip};
use crate::fits::hdu::{parse_fits, Hdu, HduInfo};
use crate::fits::value::Value;
use crate::meta::{ColumnMeta, KeywordMeta, Types, Units};
use crate::staging;
use crate::table::{OITable, TableKind};

/// Number parsed from the text of a header value. Text containing a `.` is
/// never read as an integer.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sniffed {
    Int(i64),
    Double(f64),
}

fn sniff_number(text: &str) -> Option<Sniffed> {
    let text = text.trim();
    if !text.contains('.') {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Sniffed::Int(n));
        }
    }
    text.replace(['D', 'd'], "E")
        .parse::<f64>()
        .ok()
        .map(Sniffed::Double)
}

/// Loads OIFITS files and records every validation message on the way.
pub struct OIFitsLoader {
    file: OIFitsFile,
    checker: OIFitsChecker,
}

impl OIFitsLoader {
    /// Load a local path or a URL, gzipped or not, then check the result.
    pub fn load(location: &str) -> Result<(OIFitsFile, OIFitsChecker)> {
        let staged = staging::stage(location)?;
        let mut loader = Self::new();
        if let Some(path) = staged.path {
            loader.file.set_absolute_path(path);
        }
        debug!("loading {location}");
        loader.read(&staged.bytes)?;
        Ok(loader.finish())
    }

    /// Load an in-memory FITS (or gzipped FITS) buffer, then check it.
    pub fn from_bytes(bytes: &[u8]) -> Result<(OIFitsFile, OIFitsChecker)> {
        let mut loader = Self::new();
        if is_gzip(bytes) {
            loader.read(&gunzip(bytes)?)?;
        } else {
            loader.read(bytes)?;
        }
        Ok(loader.finish())
    }

    fn new() -> Self {
        OIFitsLoader {
            file: OIFitsFile::new(),
            checker: OIFitsChecker::new(),
        }
    }

    fn finish(self) -> (OIFitsFile, OIFitsChecker) {
        let OIFitsLoader { file, mut checker } = self;
        file.check(&mut checker);
        (file, checker)
    }

    /// Reference tables go first so that measurement tables can resolve
    /// their channel count while their columns are read.
    fn read(&mut self, buf: &[u8]) -> Result<()> {
        let fits = parse_fits(buf)?;

        let mut tables: Vec<(usize, &Hdu, TableKind)> = Vec::new();
        for (ext_nb, hdu) in fits.iter().enumerate().skip(1) {
            match &hdu.info {
                HduInfo::BinaryTable { .. } => {
                    let extname = hdu.extname().unwrap_or_default();
                    match TableKind::from_extname(&extname) {
                        Some(kind) => tables.push((ext_nb, hdu, kind)),
                        None => debug!("skipping binary table [{ext_nb}] '{extname}'"),
                    }
                }
                HduInfo::Other { xtension } => {
                    debug!("skipping {xtension} extension [{ext_nb}]");
                }
                HduInfo::Primary { .. } => {}
            }
        }

        for &(ext_nb, hdu, kind) in tables.iter().filter(|t| !t.2.is_data()) {
            self.read_table(buf, hdu, kind, ext_nb)?;
        }

        let mut has_data = false;
        for &(ext_nb, hdu, kind) in tables.iter().filter(|t| t.2.is_data()) {
            self.read_table(buf, hdu, kind, ext_nb)?;
            has_data = true;
        }
        if !has_data {
            self.checker.severe(
                "No OI_VIS, OI_VIS2, OI_T3 table found: one or more of them must be present",
            );
        }
        Ok(())
    }

    fn read_table(&mut self, buf: &[u8], hdu: &Hdu, kind: TableKind, ext_nb: usize) -> Result<()> {
        let mut table = OITable::bare(kind);
        table.set_ext_nb(ext_nb);

        self.read_keywords(hdu, &mut table);
        self.read_columns(buf, hdu, &mut table)?;

        debug!(
            "loaded {table}: {} rows, {} columns, {} extra cards",
            table.nb_rows(),
            table.columns().count(),
            table.extra_cards().len()
        );
        self.file.register_oi_table(table);
        Ok(())
    }

    // --- keywords ---

    fn read_keywords(&mut self, hdu: &Hdu, table: &mut OITable) {
        let kind = table.kind();

        for meta in kind.keyword_descriptors() {
            let value = hdu
                .cards
                .iter()
                .filter(|c| c.keyword_str() == meta.name)
                .find_map(|c| c.value.as_ref());
            if let Some(value) = value {
                trace!("keyword {} = '{}'", meta.name, value.raw_text());
                let parsed = self.parse_keyword(meta, value);
                table.set_keyword(meta.name, parsed);
            }
        }

        for card in &hdu.cards {
            let keyword = card.keyword_str();
            if card.is_structural() || kind.keyword_descriptor(keyword).is_some() {
                continue;
            }
            // empty COMMENT / HISTORY / blank cards carry nothing worth keeping
            if card.is_commentary() && card.comment.is_none() {
                continue;
            }
            table.push_extra_card(card.clone());
        }
    }

    fn parse_keyword(&mut self, meta: &KeywordMeta, value: &Value) -> KeywordValue {
        let raw = value.raw_text();
        match meta.data_type {
            Types::Char => KeywordValue::Char(raw.trim().to_string()),
            Types::Logical => match value {
                Value::Logical(b) => KeywordValue::Logical(*b),
                _ => {
                    self.keyword_format_error(meta, sniffed_type(sniff_number(&raw)));
                    KeywordValue::Logical(false)
                }
            },
            declared => {
                let sniffed = match value {
                    Value::Logical(_) => None,
                    _ => sniff_number(&raw),
                };
                let found = match value {
                    Value::Logical(_) => Types::Logical,
                    _ => sniffed_type(sniffed),
                };
                if found != declared {
                    self.keyword_format_error(meta, found);
                }
                match (declared, sniffed) {
                    (Types::Int, Some(Sniffed::Int(n))) => match i32::try_from(n) {
                        Ok(n) => KeywordValue::Int(n),
                        Err(_) => {
                            self.checker.severe(format!(
                                "Invalid format for keyword '{}', found '{}' out of range for '{}'",
                                meta.name, n, meta.data_type
                            ));
                            KeywordValue::Int(if n < 0 { i32::MIN } else { i32::MAX })
                        }
                    },
                    (Types::Int, Some(Sniffed::Double(d))) => KeywordValue::Int(d as i32),
                    (Types::Int, None) => KeywordValue::Int(0),
                    (_, Some(Sniffed::Int(n))) => KeywordValue::Double(n as f64),
                    (_, Some(Sniffed::Double(d))) => KeywordValue::Double(d),
                    (_, None) => KeywordValue::Double(0.0),
                }
            }
        }
    }

    fn keyword_format_error(&mut self, meta: &KeywordMeta, found: Types) {
        self.checker.severe(format!(
            "Invalid format for keyword '{}', found '{}' should be '{}'",
            meta.name, found, meta.data_type
        ));
    }

    // --- columns ---

    fn read_columns(&mut self, buf: &[u8], hdu: &Hdu, table: &mut OITable) -> Result<()> {
        let layout = BinaryTableLayout::from_hdu(hdu)?;
        let data = hdu.data(buf);
        let kind = table.kind();
        let nwave = table.nwave(&self.file);
        let nrows = layout.naxis2;

        for (idx, col) in layout.columns.iter().enumerate() {
            let name = col.name.as_deref().map(str::trim).unwrap_or("");
            let Some(meta) = kind.column_descriptor(name) else {
                self.checker.warning(format!(
                    "Skipping non-standard OIFITS column '{}.{}' [{} {}]",
                    table.ext_name(),
                    name,
                    col.repeat,
                    col.col_type.code()
                ));
                continue;
            };
            trace!("column [{name}] [{} {}]", col.repeat, col.col_type.code());

            let expected = meta.resolve_repeat(nwave);
            self.check_column_format(meta, col, expected);
            self.check_column_unit(meta, col);

            // values keep the repeat they were stored with; a column that
            // cannot be read or converted is left absent
            match layout.read_column(data, idx) {
                Ok(raw) => match convert_column(meta.data_type, nrows, col.repeat, raw) {
                    Some(value) => table.set_column(meta.name, value),
                    None => debug!("column {name} cannot be stored as {}", meta.data_type),
                },
                Err(e) => debug!("unreadable column {name}: {e}"),
            }
        }
        Ok(())
    }

    /// Compare the stored TFORM with the descriptor. A plain repeat mismatch
    /// of a non-char column is left to the check pass, which sees the same
    /// shape once the values are stored.
    fn check_column_format(
        &mut self,
        meta: &ColumnMeta,
        col: &BinaryColumnDescriptor,
        expected: usize,
    ) {
        let found_code = col.col_type.code();
        let declared_code = meta.data_type.representation();
        let type_matches = found_code == declared_code;

        if expected == 0 {
            self.checker
                .warning(format!("Can't check repeat for column '{}'", meta.name));
            if !type_matches {
                self.checker.severe(format!(
                    "Invalid format for column '{}', found '{}' should be '{}'",
                    meta.name, found_code, declared_code
                ));
            }
            return;
        }

        let message = format!(
            "Invalid format for column '{}', found '{}{}' should be '{}{}'",
            meta.name, col.repeat, found_code, expected, declared_code
        );
        if !type_matches {
            self.checker.severe(message);
        } else if meta.data_type == Types::Char {
            if col.repeat < expected {
                self.checker.severe(message);
            } else if col.repeat > expected {
                self.checker.warning(message);
            }
        }
    }

    fn check_column_unit(&mut self, meta: &ColumnMeta, col: &BinaryColumnDescriptor) {
        let found = col.unit.as_deref().map(str::trim).unwrap_or("");
        if Units::parse(found) == Some(meta.unit) {
            return;
        }
        if found.is_empty() {
            self.checker.warning(format!(
                "Missing unit for column '{}', should be '{}'",
                meta.name, meta.unit
            ));
        } else {
            self.checker.warning(format!(
                "Invalid unit for column '{}', found '{}' should be '{}'",
                meta.name, found, meta.unit
            ));
        }
    }
}

/// Load and check a location. Shorthand for [`OIFitsLoader::load`].
pub fn load_oifits(location: &str) -> Result<(OIFitsFile, OIFitsChecker)> {
    OIFitsLoader::load(location)
}

fn sniffed_type(sniffed: Option<Sniffed>) -> Types {
    match sniffed {
        Some(Sniffed::Int(_)) => Types::Int,
        Some(Sniffed::Double(_)) => Types::Double,
        None => Types::Char,
    }
}

fn numbers(raw: &BinaryColumnData) -> Option<Vec<f64>> {
    Some(match raw {
        BinaryColumnData::Byte(v) => v.iter().map(|&x| f64::from(x)).collect(),
        BinaryColumnData::Short(v) => v.iter().map(|&x| f64::from(x)).collect(),
        BinaryColumnData::Int(v) => v.iter().map(|&x| f64::from(x)).collect(),
        BinaryColumnData::Long(v) => v.iter().map(|&x| x as f64).collect(),
        BinaryColumnData::Float(v) => v.iter().map(|&x| f64::from(x)).collect(),
        BinaryColumnData::Double(v) => v.clone(),
        BinaryColumnData::Logical(v) => v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
        BinaryColumnData::ComplexFloat(_)
        | BinaryColumnData::ComplexDouble(_)
        | BinaryColumnData::Ascii(_) => return None,
    })
}

fn shaped<T>(nrows: usize, repeat: usize, values: Vec<T>) -> Option<Cells<T>> {
    Cells::from_vec(nrows, repeat, values).ok()
}

/// Map raw column data onto the declared storage kind, converting numeric
/// types when they differ. `None` when no conversion applies.
fn convert_column(
    declared: Types,
    nrows: usize,
    repeat: usize,
    raw: BinaryColumnData,
) -> Option<ColumnValue> {
    Some(match (declared, raw) {
        (Types::Char, BinaryColumnData::Ascii(v)) => ColumnValue::Char(v),
        (Types::Char, _) => return None,
        (Types::Int, BinaryColumnData::Short(v)) => ColumnValue::Short(shaped(nrows, repeat, v)?),
        (Types::Real, BinaryColumnData::Float(v)) => ColumnValue::Real(shaped(nrows, repeat, v)?),
        (Types::Double, BinaryColumnData::Double(v)) => {
            ColumnValue::Double(shaped(nrows, repeat, v)?)
        }
        (Types::Logical, BinaryColumnData::Logical(v)) => {
            ColumnValue::Logical(shaped(nrows, repeat, v)?)
        }
        (Types::Complex, BinaryColumnData::ComplexFloat(v)) => {
            let v = v.into_iter().map(|(re, im)| [re, im]).collect();
            ColumnValue::Complex(shaped(nrows, repeat, v)?)
        }
        (Types::Complex, BinaryColumnData::ComplexDouble(v)) => {
            let v = v.into_iter().map(|(re, im)| [re as f32, im as f32]).collect();
            ColumnValue::Complex(shaped(nrows, repeat, v)?)
        }
        (Types::Complex, _) => return None,
        (declared, raw) => {
            let values = numbers(&raw)?;
            match declared {
                Types::Int => {
                    let v = values.iter().map(|&x| x as i16).collect();
                    ColumnValue::Short(shaped(nrows, repeat, v)?)
                }
                Types::Real => {
                    let v = values.iter().map(|&x| x as f32).collect();
                    ColumnValue::Real(shaped(nrows, repeat, v)?)
                }
                Types::Double => ColumnValue::Double(shaped(nrows, repeat, values)?),
                Types::Logical => {
                    let v = values.iter().map(|&x| x != 0.0).collect();
                    ColumnValue::Logical(shaped(nrows, repeat, v)?)
                }
                Types::Char | Types::Complex => return None,
            }
        }
    })
}
