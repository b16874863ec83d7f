//! `OI_VIS2`: squared visibilities.

use crate::cell::Cells;
use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::data::{self, sta_index, FLAG, UCOORD, VCOORD};
use crate::meta::{ColumnMeta, Types};
use crate::table::OITable;

pub(crate) static COLUMNS: [ColumnMeta; 6] = [
    ColumnMeta::new(COLUMN_VIS2DATA, "squared visibility", Types::Double).per_channel(),
    ColumnMeta::new(COLUMN_VIS2ERR, "error in squared visibility", Types::Double).per_channel(),
    UCOORD,
    VCOORD,
    sta_index(2),
    FLAG,
];

/// Errors of unflagged measurements must be usable.
pub(crate) fn check_vis2(table: &OITable, checker: &mut OIFitsChecker) {
    data::check_error_column(table, COLUMN_VIS2ERR, checker);
}

impl OITable {
    pub fn vis2_data(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_VIS2DATA)?.as_doubles()
    }

    pub fn vis2_err(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_VIS2ERR)?.as_doubles()
    }
}
