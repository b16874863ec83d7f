//! `OI_VIS`: complex visibilities per baseline and spectral channel.

use crate::cell::Cells;
use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::data::{self, sta_index, FLAG, UCOORD, VCOORD};
use crate::meta::{ColumnMeta, Types, Units};
use crate::table::OITable;

pub(crate) static COLUMNS: [ColumnMeta; 10] = [
    ColumnMeta::new(COLUMN_VISAMP, "visibility amplitude", Types::Double).per_channel(),
    ColumnMeta::new(COLUMN_VISAMPERR, "error in visibility amplitude", Types::Double).per_channel(),
    ColumnMeta::new(COLUMN_VISPHI, "visibility phase", Types::Double)
        .per_channel()
        .with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_VISPHIERR, "error in visibility phase", Types::Double)
        .per_channel()
        .with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_VISDATA, "complex coherent flux", Types::Complex)
        .per_channel()
        .optional(),
    ColumnMeta::new(COLUMN_VISERR, "error in complex coherent flux", Types::Complex)
        .per_channel()
        .optional(),
    UCOORD,
    VCOORD,
    sta_index(2),
    FLAG,
];

/// Errors of unflagged measurements must be usable.
pub(crate) fn check_vis(table: &OITable, checker: &mut OIFitsChecker) {
    data::check_error_column(table, COLUMN_VISAMPERR, checker);
    data::check_error_column(table, COLUMN_VISPHIERR, checker);
}

impl OITable {
    pub fn vis_amp(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_VISAMP)?.as_doubles()
    }

    pub fn vis_amp_err(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_VISAMPERR)?.as_doubles()
    }

    pub fn vis_phi(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_VISPHI)?.as_doubles()
    }

    pub fn vis_phi_err(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_VISPHIERR)?.as_doubles()
    }

    /// `[re, im]` pairs, when the table carries them.
    pub fn vis_data(&self) -> Option<&Cells<[f32; 2]>> {
        self.column(COLUMN_VISDATA)?.as_complexes()
    }

    pub fn vis_err(&self) -> Option<&Cells<[f32; 2]>> {
        self.column(COLUMN_VISERR)?.as_complexes()
    }

    /// UCOORD of every row, in meters.
    pub fn u_coord(&self) -> Option<Vec<f64>> {
        self.column_double(COLUMN_UCOORD)
    }

    /// VCOORD of every row, in meters.
    pub fn v_coord(&self) -> Option<Vec<f64>> {
        self.column_double(COLUMN_VCOORD)
    }
}
