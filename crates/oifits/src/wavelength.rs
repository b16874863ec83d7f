//! `OI_WAVELENGTH`: spectral channels of an instrument.

use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::file::OIFitsFile;
use crate::meta::{ColumnMeta, KeywordMeta, Types, Units};
use crate::table::OITable;

pub(crate) static KEYWORDS: [KeywordMeta; 1] = [KeywordMeta::new(
    KEYWORD_INSNAME,
    "name of detector for cross-referencing",
    Types::Char,
)];

pub(crate) static COLUMNS: [ColumnMeta; 2] = [
    ColumnMeta::new(COLUMN_EFF_WAVE, "effective wavelength of channel", Types::Real)
        .with_unit(Units::Meter),
    ColumnMeta::new(COLUMN_EFF_BAND, "effective bandpass of channel", Types::Real)
        .with_unit(Units::Meter),
];

pub(crate) fn check_wavelength(table: &OITable, file: &OIFitsFile, checker: &mut OIFitsChecker) {
    if table.ins_name().is_some_and(str::is_empty) {
        checker.severe("INSNAME identifier has blank value");
    }
    file.check_cross_reference(table, checker);
}

impl OITable {
    /// EFF_WAVE in meters.
    pub fn eff_wave(&self) -> Option<&[f32]> {
        Some(self.column(COLUMN_EFF_WAVE)?.as_reals()?.values())
    }

    /// EFF_BAND in meters.
    pub fn eff_band(&self) -> Option<&[f32]> {
        Some(self.column(COLUMN_EFF_BAND)?.as_reals()?.values())
    }

    /// Smallest and largest EFF_WAVE of this table.
    pub fn eff_wave_bounds(&self) -> Option<(f32, f32)> {
        let waves = self.eff_wave()?;
        let first = *waves.first()?;
        Some(
            waves
                .iter()
                .fold((first, first), |(lo, hi), &w| (lo.min(w), hi.max(w))),
        )
    }
}
