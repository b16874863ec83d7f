//! `OI_ARRAY`: telescope stations of an interferometer.

use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::file::OIFitsFile;
use crate::meta::{Accepted, ColumnMeta, KeywordMeta, Types, Units};
use crate::table::OITable;

pub(crate) static KEYWORDS: [KeywordMeta; 5] = [
    KeywordMeta::new(KEYWORD_ARRNAME, "array name for cross-referencing", Types::Char),
    KeywordMeta::new(KEYWORD_FRAME, "coordinate frame", Types::Char)
        .accepting(Accepted::Strings(&[KEYWORD_FRAME_GEOCENTRIC])),
    KeywordMeta::new(KEYWORD_ARRAY_X, "array center X-coordinate", Types::Double)
        .with_unit(Units::Meter),
    KeywordMeta::new(KEYWORD_ARRAY_Y, "array center Y-coordinate", Types::Double)
        .with_unit(Units::Meter),
    KeywordMeta::new(KEYWORD_ARRAY_Z, "array center Z-coordinate", Types::Double)
        .with_unit(Units::Meter),
];

pub(crate) static COLUMNS: [ColumnMeta; 5] = [
    ColumnMeta::new(COLUMN_TEL_NAME, "telescope name", Types::Char).with_repeat(16),
    ColumnMeta::new(COLUMN_STA_NAME, "station name", Types::Char).with_repeat(16),
    ColumnMeta::new(COLUMN_STA_INDEX, "station index", Types::Int),
    ColumnMeta::new(COLUMN_DIAMETER, "element diameter", Types::Real).with_unit(Units::Meter),
    ColumnMeta::new(
        COLUMN_STA_XYZ,
        "station coordinates relative to array center",
        Types::Double,
    )
    .with_repeat(3)
    .with_unit(Units::Meter),
];

pub(crate) fn check_array(table: &OITable, file: &OIFitsFile, checker: &mut OIFitsChecker) {
    if table.arr_name().is_some_and(str::is_empty) {
        checker.severe("ARRNAME identifier has blank value");
    }
    file.check_cross_reference(table, checker);
}

impl OITable {
    /// STA_INDEX values of an OI_ARRAY table (or of the first station of
    /// every row of a measurement table).
    pub fn station_indexes(&self) -> Vec<i16> {
        self.sta_indexes()
            .map(|c| c.rows().filter_map(|r| r.first().copied()).collect())
            .unwrap_or_default()
    }

    pub fn tel_names(&self) -> Option<&[String]> {
        self.column(COLUMN_TEL_NAME)?.as_chars()
    }

    pub fn sta_names_column(&self) -> Option<&[String]> {
        self.column(COLUMN_STA_NAME)?.as_chars()
    }

    /// STA_NAME of the row whose STA_INDEX is `index`.
    pub fn station_name(&self, index: i16) -> Option<&str> {
        let row = self.station_indexes().iter().position(|&i| i == index)?;
        self.sta_names_column()?.get(row).map(|s| s.trim())
    }
}
