//! The OIFITS table model shared by every table kind, and its syntax check.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use crate::cell::{ColumnValue, KeywordValue};
use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::file::OIFitsFile;
use crate::fits::header::Card;
use crate::meta::{Accepted, AcceptedValues, ColumnMeta, KeywordMeta, Types};
use crate::{array, data, t3, target, vis, vis2, wavelength};

/// Keywords every OIFITS table declares.
pub(crate) static COMMON_KEYWORDS: [KeywordMeta; 4] = [
    KeywordMeta::new(KEYWORD_NAXIS2, "number of table rows", Types::Int),
    KeywordMeta::new(KEYWORD_EXTNAME, "extension name", Types::Char)
        .accepting(Accepted::Strings(TABLE_NAMES)),
    KeywordMeta::new(KEYWORD_EXTVER, "extension version", Types::Int).optional(),
    KeywordMeta::new(KEYWORD_OI_REVN, "revision number of the table definition", Types::Int)
        .accepting(Accepted::Ints(&[KEYWORD_OI_REVN_1])),
];

/// The six OIFITS table kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Target,
    Array,
    Wavelength,
    Vis,
    Vis2,
    T3,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Target,
        TableKind::Array,
        TableKind::Wavelength,
        TableKind::Vis,
        TableKind::Vis2,
        TableKind::T3,
    ];

    /// Kind named by an EXTNAME value.
    pub fn from_extname(name: &str) -> Option<TableKind> {
        let name = name.trim();
        Self::ALL.into_iter().find(|k| k.extname() == name)
    }

    pub const fn extname(self) -> &'static str {
        match self {
            TableKind::Target => TABLE_OI_TARGET,
            TableKind::Array => TABLE_OI_ARRAY,
            TableKind::Wavelength => TABLE_OI_WAVELENGTH,
            TableKind::Vis => TABLE_OI_VIS,
            TableKind::Vis2 => TABLE_OI_VIS2,
            TableKind::T3 => TABLE_OI_T3,
        }
    }

    /// `OI_VIS`, `OI_VIS2` and `OI_T3` hold measurements.
    pub const fn is_data(self) -> bool {
        matches!(self, TableKind::Vis | TableKind::Vis2 | TableKind::T3)
    }

    fn data_keywords(self) -> &'static [KeywordMeta] {
        if self.is_data() {
            &data::KEYWORDS
        } else {
            &[]
        }
    }

    fn own_keywords(self) -> &'static [KeywordMeta] {
        match self {
            TableKind::Array => &array::KEYWORDS,
            TableKind::Wavelength => &wavelength::KEYWORDS,
            TableKind::Target | TableKind::Vis | TableKind::Vis2 | TableKind::T3 => &[],
        }
    }

    fn data_columns(self) -> &'static [ColumnMeta] {
        if self.is_data() {
            &data::COLUMNS
        } else {
            &[]
        }
    }

    fn own_columns(self) -> &'static [ColumnMeta] {
        match self {
            TableKind::Target => &target::COLUMNS,
            TableKind::Array => &array::COLUMNS,
            TableKind::Wavelength => &wavelength::COLUMNS,
            TableKind::Vis => &vis::COLUMNS,
            TableKind::Vis2 => &vis2::COLUMNS,
            TableKind::T3 => &t3::COLUMNS,
        }
    }

    /// Keyword descriptors in declaration order.
    pub fn keyword_descriptors(self) -> impl Iterator<Item = &'static KeywordMeta> {
        COMMON_KEYWORDS
            .iter()
            .chain(self.data_keywords())
            .chain(self.own_keywords())
    }

    /// Column descriptors in declaration order.
    pub fn column_descriptors(self) -> impl Iterator<Item = &'static ColumnMeta> {
        self.data_columns().iter().chain(self.own_columns())
    }

    pub fn keyword_descriptor(self, name: &str) -> Option<&'static KeywordMeta> {
        self.keyword_descriptors().find(|m| m.name == name)
    }

    pub fn column_descriptor(self, name: &str) -> Option<&'static ColumnMeta> {
        self.column_descriptors().find(|m| m.name == name)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extname())
    }
}

/// One OIFITS binary table: typed keywords and columns keyed by name.
///
/// Cross references to the OI_ARRAY and OI_WAVELENGTH tables of the owning
/// [`OIFitsFile`] are resolved on first use and memoized; changing ARRNAME or
/// INSNAME through [`OITable::set_keyword`] drops the memo.
#[derive(Debug, Clone)]
pub struct OITable {
    kind: TableKind,
    ext_nb: usize,
    keywords: BTreeMap<String, KeywordValue>,
    columns: BTreeMap<String, ColumnValue>,
    extra_cards: Vec<Card>,
    pub(crate) array_ref: Cell<Option<usize>>,
    pub(crate) wavelength_ref: Cell<Option<usize>>,
}

impl OITable {
    /// Empty table with EXTNAME and OI_REVN set.
    pub fn new(kind: TableKind) -> Self {
        let mut table = Self::bare(kind);
        table.set_keyword(KEYWORD_EXTNAME, kind.extname());
        table.set_keyword(KEYWORD_OI_REVN, i32::from(KEYWORD_OI_REVN_1));
        table
    }

    /// No keywords at all; the loader fills in what the header holds.
    pub(crate) fn bare(kind: TableKind) -> Self {
        OITable {
            kind,
            ext_nb: 0,
            keywords: BTreeMap::new(),
            columns: BTreeMap::new(),
            extra_cards: Vec::new(),
            array_ref: Cell::new(None),
            wavelength_ref: Cell::new(None),
        }
    }

    /// Table whose mandatory columns are zero-filled for `rows` rows.
    /// Per-channel columns get `nwave` values per row.
    pub fn with_rows(kind: TableKind, nwave: usize, rows: usize) -> Result<Self> {
        if rows < 1 {
            return Err(Error::InvalidRowCount(rows));
        }
        let mut table = Self::new(kind);
        table.set_keyword(KEYWORD_NAXIS2, rows as i32);
        for meta in kind.column_descriptors().filter(|m| !m.optional) {
            let repeat = meta.resolve_repeat(nwave);
            table.set_column(meta.name, ColumnValue::zeros(meta.data_type, rows, repeat));
        }
        Ok(table)
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// 1-based position of the HDU among the extensions of the file.
    pub fn ext_nb(&self) -> usize {
        self.ext_nb
    }

    pub(crate) fn set_ext_nb(&mut self, ext_nb: usize) {
        self.ext_nb = ext_nb;
    }

    pub fn ext_name(&self) -> &str {
        self.keyword_str(KEYWORD_EXTNAME)
            .unwrap_or(self.kind.extname())
    }

    /// Row count declared by NAXIS2, 0 if absent.
    pub fn nb_rows(&self) -> usize {
        self.keyword_int(KEYWORD_NAXIS2)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    // ── keywords ──

    pub fn keyword(&self, name: &str) -> Option<&KeywordValue> {
        self.keywords.get(name)
    }

    pub fn keyword_str(&self, name: &str) -> Option<&str> {
        self.keyword(name).and_then(KeywordValue::as_str)
    }

    pub fn keyword_int(&self, name: &str) -> Option<i32> {
        self.keyword(name).and_then(KeywordValue::as_int)
    }

    pub fn keyword_double(&self, name: &str) -> Option<f64> {
        self.keyword(name).and_then(KeywordValue::as_double)
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &KeywordValue)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store a keyword value. Changing ARRNAME or INSNAME resets the matching
    /// cross reference.
    pub fn set_keyword(&mut self, name: &str, value: impl Into<KeywordValue>) {
        self.invalidate_ref(name);
        self.keywords.insert(String::from(name), value.into());
    }

    pub fn remove_keyword(&mut self, name: &str) -> Option<KeywordValue> {
        self.invalidate_ref(name);
        self.keywords.remove(name)
    }

    fn invalidate_ref(&self, name: &str) {
        match name {
            KEYWORD_ARRNAME => self.array_ref.set(None),
            KEYWORD_INSNAME => self.wavelength_ref.set(None),
            _ => {}
        }
    }

    // ── columns ──

    pub fn column(&self, name: &str) -> Option<&ColumnValue> {
        self.columns.get(name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnValue> {
        self.columns.get_mut(name)
    }

    pub fn set_column(&mut self, name: &str, value: ColumnValue) {
        self.columns.insert(String::from(name), value);
    }

    pub fn remove_column(&mut self, name: &str) -> Option<ColumnValue> {
        self.columns.remove(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Any numeric column as one `Vec<f64>` per row.
    pub fn column_doubles(&self, name: &str) -> Option<Vec<Vec<f64>>> {
        let cells = self.column(name)?.to_doubles()?;
        Some(cells.rows().map(<[f64]>::to_vec).collect())
    }

    /// A scalar numeric column as one value per row.
    pub fn column_double(&self, name: &str) -> Option<Vec<f64>> {
        let cells = self.column(name)?.to_doubles()?;
        if cells.repeat() != 1 {
            return None;
        }
        Some(cells.values().to_vec())
    }

    // ── extra header cards ──

    /// Header cards that are neither structural nor declared keywords.
    pub fn extra_cards(&self) -> &[Card] {
        &self.extra_cards
    }

    pub fn push_extra_card(&mut self, card: Card) {
        self.extra_cards.push(card);
    }

    // ── checks ──

    /// Accepted values of a descriptor, resolved against `file`.
    pub fn accepted_values(&self, accepted: Accepted, file: &OIFitsFile) -> AcceptedValues {
        match accepted {
            Accepted::None => AcceptedValues::Any,
            Accepted::Strings(values) => {
                AcceptedValues::Strings(values.iter().map(|s| String::from(*s)).collect())
            }
            Accepted::Ints(values) => AcceptedValues::Ints(values.to_vec()),
            Accepted::ArrNames => AcceptedValues::Strings(file.accepted_arr_names()),
            Accepted::InsNames => AcceptedValues::Strings(file.accepted_ins_names()),
            Accepted::TargetIds => AcceptedValues::Ints(file.accepted_target_ids()),
            Accepted::StaIndexes => self
                .oi_array(file)
                .map_or(AcceptedValues::Any, |a| {
                    AcceptedValues::Ints(file.accepted_sta_indexes(a))
                }),
        }
    }

    /// Check keywords, columns and kind-specific rules of this table.
    pub fn check_syntax(&self, file: &OIFitsFile, checker: &mut OIFitsChecker) {
        log::trace!("check_syntax: {self}");
        checker.info(format!(
            "Analysing table [{}]: {}",
            self.ext_nb,
            self.ext_name()
        ));

        self.check_keywords(file, checker);
        if self.kind.is_data() {
            data::check_data(self, file, checker);
        }
        self.check_columns(file, checker);

        match self.kind {
            TableKind::Array => array::check_array(self, file, checker),
            TableKind::Wavelength => wavelength::check_wavelength(self, file, checker),
            TableKind::Target => target::check_target(self, checker),
            TableKind::Vis => vis::check_vis(self, checker),
            TableKind::Vis2 => vis2::check_vis2(self, checker),
            TableKind::T3 => t3::check_t3(self, checker),
        }
    }

    fn check_keywords(&self, file: &OIFitsFile, checker: &mut OIFitsChecker) {
        for meta in self.kind.keyword_descriptors() {
            let Some(value) = self.keyword(meta.name) else {
                if !meta.optional {
                    checker.severe(format!("Missing keyword '{}'", meta.name));
                }
                continue;
            };

            if value.types() != meta.data_type {
                checker.severe(format!(
                    "Invalid format for keyword '{}', found '{}' should be '{}'",
                    meta.name,
                    value.types(),
                    meta.data_type
                ));
            }

            let accepted = self.accepted_values(meta.accepted, file);
            if !keyword_is_accepted(value, &accepted) {
                checker.severe(format!(
                    "Invalid value for keyword '{}', found '{}' should be '{}'",
                    meta.name, value, accepted
                ));
            }
        }
    }

    fn check_columns(&self, file: &OIFitsFile, checker: &mut OIFitsChecker) {
        let nb_rows = self.nb_rows();
        let nwave = self.nwave(file);

        for meta in self.kind.column_descriptors() {
            let Some(value) = self.column(meta.name) else {
                if !meta.optional {
                    checker.severe(format!("Missing column '{}'", meta.name));
                }
                continue;
            };

            if value.nrows() != nb_rows {
                checker.severe(format!(
                    "Invalid length for column '{}', found '{}' row(s) should be '{}'",
                    meta.name,
                    value.nrows(),
                    nb_rows
                ));
            }

            check_column_format(meta, value, nwave, checker);

            let accepted = self.accepted_values(meta.accepted, file);
            check_column_values(meta, value, &accepted, checker);
        }
    }
}

fn keyword_is_accepted(value: &KeywordValue, accepted: &AcceptedValues) -> bool {
    match accepted {
        AcceptedValues::Any => true,
        AcceptedValues::Ints(_) => match value {
            KeywordValue::Int(n) => accepted.accepts_int(i64::from(*n)),
            KeywordValue::Double(d) => accepted.accepts_int(*d as i64),
            _ => accepted.is_unrestricted(),
        },
        AcceptedValues::Strings(_) => accepted.accepts_str(&value.to_string()),
    }
}

/// Type and repeat of the stored cells against the descriptor. Character
/// columns are only checked for their type: the writer sizes them.
fn check_column_format(
    meta: &ColumnMeta,
    value: &ColumnValue,
    nwave: usize,
    checker: &mut OIFitsChecker,
) {
    let repeat = meta.resolve_repeat(nwave);
    let found_type = value.types();

    if repeat == 0 {
        checker.warning(format!("Can't check repeat for column '{}'", meta.name));
        if found_type != meta.data_type {
            checker.severe(format!(
                "Invalid format for column '{}', found '{}' should be '{}'",
                meta.name, found_type, meta.data_type
            ));
        }
        return;
    }

    let found_repeat = value.repeat();
    let bad_repeat = meta.data_type != Types::Char && found_repeat != repeat;
    if found_type != meta.data_type || bad_repeat {
        checker.severe(format!(
            "Invalid format for column '{}', found '{}{}' should be '{}{}'",
            meta.name, found_repeat, found_type, repeat, meta.data_type
        ));
    }
}

/// Row numbers in these messages are 0-based.
fn check_column_values(
    meta: &ColumnMeta,
    value: &ColumnValue,
    accepted: &AcceptedValues,
    checker: &mut OIFitsChecker,
) {
    if accepted.is_unrestricted() {
        return;
    }
    match (value, accepted) {
        (ColumnValue::Short(cells), AcceptedValues::Ints(_)) => {
            for (line, row) in cells.rows().enumerate() {
                for (index, &v) in row.iter().enumerate() {
                    if accepted.accepts_int(i64::from(v)) {
                        continue;
                    }
                    if row.len() > 1 {
                        checker.severe(format!(
                            "Invalid value at index {index} for column '{}' line {line}, found '{v}' should be '{accepted}'",
                            meta.name
                        ));
                    } else {
                        checker.severe(format!(
                            "Invalid value for column '{}' line {line}, found '{v}' should be '{accepted}'",
                            meta.name
                        ));
                    }
                }
            }
        }
        (ColumnValue::Char(values), AcceptedValues::Strings(_)) => {
            for (line, v) in values.iter().enumerate() {
                if !accepted.accepts_str(v) {
                    checker.severe(format!(
                        "Invalid value for column '{}' line {line}, found '{}' should be '{accepted}'",
                        meta.name,
                        v.trim()
                    ));
                }
            }
        }
        _ => {}
    }
}

impl fmt::Display for OITable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.ext_name(), self.ext_nb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cells;
    use crate::checker::Level;

    // --- descriptors ---

    #[test]
    fn kind_from_extname() {
        assert_eq!(TableKind::from_extname("OI_VIS2"), Some(TableKind::Vis2));
        assert_eq!(TableKind::from_extname(" OI_T3 "), Some(TableKind::T3));
        assert_eq!(TableKind::from_extname("OI_FLUX"), None);
        assert_eq!(TableKind::Target.to_string(), "OI_TARGET");
    }

    #[test]
    fn descriptor_order() {
        let keywords: Vec<&str> = TableKind::Vis2.keyword_descriptors().map(|m| m.name).collect();
        assert_eq!(
            keywords,
            ["NAXIS2", "EXTNAME", "EXTVER", "OI_REVN", "DATE-OBS", "ARRNAME", "INSNAME"]
        );
        let columns: Vec<&str> = TableKind::Vis2.column_descriptors().map(|m| m.name).collect();
        assert_eq!(&columns[..4], &["TARGET_ID", "TIME", "MJD", "INT_TIME"]);
        assert_eq!(columns.last(), Some(&"FLAG"));
        assert!(TableKind::Array.keyword_descriptor("ARRAYZ").is_some());
        assert!(TableKind::Target.column_descriptor("VIS2DATA").is_none());
    }

    // --- construction ---

    #[test]
    fn new_sets_identity_keywords() {
        let t = OITable::new(TableKind::Wavelength);
        assert_eq!(t.ext_name(), "OI_WAVELENGTH");
        assert_eq!(t.keyword_int(KEYWORD_OI_REVN), Some(1));
        assert_eq!(t.nb_rows(), 0);
    }

    #[test]
    fn with_rows_fills_mandatory_columns() {
        let t = OITable::with_rows(TableKind::Vis, 4, 3).unwrap();
        assert_eq!(t.nb_rows(), 3);
        let visamp = t.column(COLUMN_VISAMP).unwrap().as_doubles().unwrap();
        assert_eq!((visamp.nrows(), visamp.repeat()), (3, 4));
        assert_eq!(t.column(COLUMN_STA_INDEX).unwrap().repeat(), 2);
        assert!(t.column(COLUMN_VISDATA).is_none());
    }

    #[test]
    fn with_rows_rejects_empty_table() {
        assert!(matches!(
            OITable::with_rows(TableKind::Target, 0, 0),
            Err(Error::InvalidRowCount(0))
        ));
    }

    #[test]
    fn display_is_extname_and_position() {
        let mut t = OITable::new(TableKind::T3);
        t.set_ext_nb(5);
        assert_eq!(t.to_string(), "OI_T3#5");
    }

    // --- numeric extraction ---

    #[test]
    fn column_doubles_per_row() {
        let mut t = OITable::new(TableKind::Vis2);
        t.set_column(
            COLUMN_VIS2DATA,
            ColumnValue::Double(Cells::from_vec(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap()),
        );
        t.set_column(COLUMN_TARGET_ID, ColumnValue::Short(Cells::scalars(vec![1, 2])));
        assert_eq!(
            t.column_doubles(COLUMN_VIS2DATA).unwrap(),
            vec![vec![0.1, 0.2], vec![0.3, 0.4]]
        );
        assert_eq!(t.column_double(COLUMN_TARGET_ID).unwrap(), vec![1.0, 2.0]);
        assert!(t.column_double(COLUMN_VIS2DATA).is_none());
        assert!(t.column_doubles(COLUMN_FLAG).is_none());
    }

    // --- syntax check ---

    #[test]
    fn missing_keyword_and_column_are_severe() {
        let mut file = OIFitsFile::new();
        let mut t = OITable::new(TableKind::Wavelength);
        t.set_keyword(KEYWORD_NAXIS2, 1);
        file.register_oi_table(t);

        let mut checker = OIFitsChecker::new();
        file.tables()[0].check_syntax(&file, &mut checker);
        assert!(checker.contains(Level::Severe, "Missing keyword 'INSNAME'"));
        assert!(checker.contains(Level::Severe, "Missing column 'EFF_WAVE'"));
        assert!(checker.contains(Level::Severe, "Missing column 'EFF_BAND'"));
        assert!(!checker.contains(Level::Severe, "EXTVER"));
    }

    #[test]
    fn keyword_format_and_value() {
        let mut file = OIFitsFile::new();
        let mut t = OITable::with_rows(TableKind::Wavelength, 0, 1).unwrap();
        t.set_keyword(KEYWORD_INSNAME, "AMBER");
        t.set_keyword(KEYWORD_OI_REVN, 2);
        t.set_keyword(KEYWORD_EXTVER, "one");
        file.register_oi_table(t);

        let mut checker = OIFitsChecker::new();
        file.tables()[0].check_syntax(&file, &mut checker);
        assert!(checker.contains(
            Level::Severe,
            "Invalid value for keyword 'OI_REVN', found '2' should be '1'"
        ));
        assert!(checker.contains(
            Level::Severe,
            "Invalid format for keyword 'EXTVER', found 'A' should be 'I'"
        ));
    }

    #[test]
    fn column_length_and_format() {
        let mut file = OIFitsFile::new();
        let mut t = OITable::with_rows(TableKind::Wavelength, 0, 2).unwrap();
        t.set_keyword(KEYWORD_INSNAME, "AMBER");
        t.set_column(COLUMN_EFF_WAVE, ColumnValue::Real(Cells::scalars(vec![1e-6])));
        t.set_column(COLUMN_EFF_BAND, ColumnValue::Double(Cells::scalars(vec![1e-7, 1e-7])));
        file.register_oi_table(t);

        let mut checker = OIFitsChecker::new();
        file.tables()[0].check_syntax(&file, &mut checker);
        assert!(checker.contains(
            Level::Severe,
            "Invalid length for column 'EFF_WAVE', found '1' row(s) should be '2'"
        ));
        assert!(checker.contains(
            Level::Severe,
            "Invalid format for column 'EFF_BAND', found '1D' should be '1E'"
        ));
    }

    #[test]
    fn unresolved_channels_cannot_be_checked() {
        let mut file = OIFitsFile::new();
        let mut t = OITable::with_rows(TableKind::Vis2, 0, 1).unwrap();
        t.set_keyword(KEYWORD_INSNAME, "NOWHERE");
        file.register_oi_table(t);

        let mut checker = OIFitsChecker::new();
        file.tables()[0].check_syntax(&file, &mut checker);
        assert!(checker.contains(Level::Warning, "Can't check repeat for column 'VIS2DATA'"));
        assert!(checker.contains(Level::Warning, "Can't check repeat for column 'FLAG'"));
    }

    #[test]
    fn accepted_strings_in_columns() {
        let mut file = OIFitsFile::new();
        let mut t = OITable::with_rows(TableKind::Target, 0, 2).unwrap();
        t.set_column(COLUMN_TARGET_ID, ColumnValue::Short(Cells::scalars(vec![1, 2])));
        t.set_column(
            COLUMN_TARGET,
            ColumnValue::Char(vec![String::from("A"), String::from("B")]),
        );
        t.set_column(
            COLUMN_VELTYP,
            ColumnValue::Char(vec![String::from("LSR"), String::from("SIDEREAL")]),
        );
        t.set_column(
            COLUMN_VELDEF,
            ColumnValue::Char(vec![String::from("OPTICAL"), String::from("RADIO")]),
        );
        file.register_oi_table(t);

        let mut checker = OIFitsChecker::new();
        file.tables()[0].check_syntax(&file, &mut checker);
        assert!(checker.contains(
            Level::Severe,
            "Invalid value for column 'VELTYP' line 1, found 'SIDEREAL' should be 'LSR|HELIOCEN|BARYCENT|GEOCENTR|TOPOCENT|UNKNOWN'"
        ));
        assert!(!checker.contains(Level::Severe, "VELDEF"));
    }

    #[test]
    fn setting_arrname_drops_memo() {
        let mut t = OITable::new(TableKind::Vis);
        t.array_ref.set(Some(3));
        t.wavelength_ref.set(Some(4));
        t.set_keyword(KEYWORD_ARRNAME, "VLTI");
        assert_eq!(t.array_ref.get(), None);
        assert_eq!(t.wavelength_ref.get(), Some(4));
        t.remove_keyword(KEYWORD_INSNAME);
        assert_eq!(t.wavelength_ref.get(), None);
    }
}
