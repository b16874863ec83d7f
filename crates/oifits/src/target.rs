//! `OI_TARGET`: the observed targets, referenced by TARGET_ID from every
//! measurement table.

use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::meta::{Accepted, ColumnMeta, Types, Units};
use crate::table::OITable;

const VELTYPS: &[&str] = &[
    COLUMN_VELTYP_LSR,
    COLUMN_VELTYP_HELIOCEN,
    COLUMN_VELTYP_BARYCENT,
    COLUMN_VELTYP_GEOCENTR,
    COLUMN_VELTYP_TOPOCENT,
    COLUMN_VELTYP_UNKNOWN,
];

const VELDEFS: &[&str] = &[COLUMN_VELDEF_RADIO, COLUMN_VELDEF_OPTICAL];

pub(crate) static COLUMNS: [ColumnMeta; 17] = [
    ColumnMeta::new(COLUMN_TARGET_ID, "index number", Types::Int),
    ColumnMeta::new(COLUMN_TARGET, "target name", Types::Char).with_repeat(16),
    ColumnMeta::new(COLUMN_RA_EP0, "RA at mean equinox", Types::Double).with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_DEC_EP0, "DEC at mean equinox", Types::Double).with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_EQUINOX, "equinox", Types::Real).with_unit(Units::Year),
    ColumnMeta::new(COLUMN_RA_ERR, "error in RA at mean equinox", Types::Double)
        .with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_DEC_ERR, "error in DEC at mean equinox", Types::Double)
        .with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_SYSVEL, "systemic radial velocity", Types::Double)
        .with_unit(Units::MeterPerSecond),
    ColumnMeta::new(COLUMN_VELTYP, "reference for radial velocity", Types::Char)
        .with_repeat(8)
        .accepting(Accepted::Strings(VELTYPS)),
    ColumnMeta::new(COLUMN_VELDEF, "definition of radial velocity", Types::Char)
        .with_repeat(8)
        .accepting(Accepted::Strings(VELDEFS)),
    ColumnMeta::new(COLUMN_PMRA, "proper motion in RA", Types::Double)
        .with_unit(Units::DegreePerYear),
    ColumnMeta::new(COLUMN_PMDEC, "proper motion in DEC", Types::Double)
        .with_unit(Units::DegreePerYear),
    ColumnMeta::new(COLUMN_PMRA_ERR, "error of proper motion in RA", Types::Double)
        .with_unit(Units::DegreePerYear),
    ColumnMeta::new(COLUMN_PMDEC_ERR, "error of proper motion in DEC", Types::Double)
        .with_unit(Units::DegreePerYear),
    ColumnMeta::new(COLUMN_PARALLAX, "parallax", Types::Real).with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_PARA_ERR, "error in parallax", Types::Real).with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_SPECTYP, "spectral type", Types::Char).with_repeat(16),
];

/// Pairwise uniqueness of TARGET_ID and TARGET, then at least one row.
pub(crate) fn check_target(table: &OITable, checker: &mut OIFitsChecker) {
    let ids = table.target_ids().unwrap_or(&[]);
    let names = table.target_names().unwrap_or(&[]);

    for i in 0..ids.len() {
        for j in i + 1..ids.len() {
            if ids[i] == ids[j] {
                checker.severe(format!("TARGET_ID duplicated on lines {i}|{j}"));
            }
        }
    }
    for i in 0..names.len() {
        for j in i + 1..names.len() {
            if names[i].trim() == names[j].trim() {
                checker.severe(format!("TARGET duplicated on lines {i}|{j}"));
            }
        }
    }

    if table.nb_targets() < 1 {
        checker.severe("No target defined");
    }
}

impl OITable {
    pub fn nb_targets(&self) -> usize {
        self.nb_rows()
    }

    /// TARGET column.
    pub fn target_names(&self) -> Option<&[String]> {
        self.column(COLUMN_TARGET)?.as_chars()
    }

    /// Row of the target whose TARGET_ID is `id`.
    pub fn target_row(&self, id: i16) -> Option<usize> {
        self.target_ids()?.iter().position(|&t| t == id)
    }

    fn target_double(&self, column: &str, id: i16) -> Option<f64> {
        let row = self.target_row(id)?;
        self.column_double(column)?.get(row).copied()
    }

    /// RAEP0 of target `id`, in degrees.
    pub fn ra_ep0(&self, id: i16) -> Option<f64> {
        self.target_double(COLUMN_RA_EP0, id)
    }

    /// DECEP0 of target `id`, in degrees.
    pub fn dec_ep0(&self, id: i16) -> Option<f64> {
        self.target_double(COLUMN_DEC_EP0, id)
    }

    pub fn equinox(&self, id: i16) -> Option<f64> {
        self.target_double(COLUMN_EQUINOX, id)
    }

    pub fn sys_vel(&self, id: i16) -> Option<f64> {
        self.target_double(COLUMN_SYSVEL, id)
    }

    pub fn parallax(&self, id: i16) -> Option<f64> {
        self.target_double(COLUMN_PARALLAX, id)
    }

    /// SPECTYP of target `id`, trimmed.
    pub fn spec_typ(&self, id: i16) -> Option<&str> {
        let row = self.target_row(id)?;
        let values = self.column(COLUMN_SPECTYP)?.as_chars()?;
        values.get(row).map(|s| s.trim())
    }
}
