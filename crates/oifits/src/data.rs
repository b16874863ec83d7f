//! Everything shared by the measurement tables `OI_VIS`, `OI_VIS2` and
//! `OI_T3`: their common descriptors, the memoized cross references to
//! OI_ARRAY and OI_WAVELENGTH, and the per-row queries used by plotting
//! code.

use std::collections::BTreeSet;

use log::{trace, warn};

use crate::cell::Cells;
use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::file::OIFitsFile;
use crate::meta::{Accepted, ColumnMeta, KeywordMeta, Types, Units};
use crate::t3;
use crate::table::{OITable, TableKind};

pub(crate) static KEYWORDS: [KeywordMeta; 3] = [
    KeywordMeta::new(KEYWORD_DATE_OBS, "UTC start date of observations", Types::Char),
    KeywordMeta::new(KEYWORD_ARRNAME, "name of corresponding array", Types::Char)
        .optional()
        .accepting(Accepted::ArrNames),
    KeywordMeta::new(KEYWORD_INSNAME, "name of corresponding detector", Types::Char)
        .accepting(Accepted::InsNames),
];

pub(crate) static COLUMNS: [ColumnMeta; 4] = [
    ColumnMeta::new(
        COLUMN_TARGET_ID,
        "target number as index into OI_TARGET table",
        Types::Int,
    )
    .accepting(Accepted::TargetIds),
    ColumnMeta::new(COLUMN_TIME, "UTC time of observation", Types::Double).with_unit(Units::Second),
    ColumnMeta::new(COLUMN_MJD, "modified Julian Day", Types::Double).with_unit(Units::Mjd),
    ColumnMeta::new(COLUMN_INT_TIME, "integration time", Types::Double).with_unit(Units::Second),
];

// shared by the per-kind column lists
pub(crate) const UCOORD: ColumnMeta =
    ColumnMeta::new(COLUMN_UCOORD, "U coordinate of the data", Types::Double).with_unit(Units::Meter);
pub(crate) const VCOORD: ColumnMeta =
    ColumnMeta::new(COLUMN_VCOORD, "V coordinate of the data", Types::Double).with_unit(Units::Meter);
pub(crate) const FLAG: ColumnMeta =
    ColumnMeta::new(COLUMN_FLAG, "flag", Types::Logical).per_channel();

/// STA_INDEX of a data table, `stations` values per row.
pub(crate) const fn sta_index(stations: usize) -> ColumnMeta {
    ColumnMeta::new(
        COLUMN_STA_INDEX,
        "station numbers contributing to the data",
        Types::Int,
    )
    .with_repeat(stations)
    .accepting(Accepted::StaIndexes)
}

/// Inclusive range of physically meaningful values, used to scale plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    pub const fn new(min: f64, max: f64) -> Self {
        DataRange { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Visibilities and squared visibilities.
pub const RANGE_VIS: DataRange = DataRange::new(0.0, 1.0);
/// Phases, in degrees.
pub const RANGE_ANGLE: DataRange = DataRange::new(-180.0, 180.0);

/// An error is usable when it is NaN (unknown) or not negative.
pub fn is_error_valid(err: f64) -> bool {
    err.is_nan() || err >= 0.0
}

/// Every unflagged cell of the error column `name` must hold a valid error.
pub(crate) fn check_error_column(table: &OITable, name: &str, checker: &mut OIFitsChecker) {
    let Some(errors) = table.column(name).and_then(|c| c.as_doubles()) else {
        return;
    };
    let flags = table.flags();
    for (line, row) in errors.rows().enumerate() {
        for (index, &err) in row.iter().enumerate() {
            let flagged = flags
                .and_then(|f| f.get(line, index))
                .copied()
                .unwrap_or(false);
            if !flagged && !is_error_valid(err) {
                checker.severe(format!(
                    "Invalid value at index {index} for column '{name}' line {line}, \
                     found '{err}' should be >= 0 or NaN or flagged out"
                ));
            }
        }
    }
}

/// Checks only measurement tables need.
pub(crate) fn check_data(table: &OITable, file: &OIFitsFile, checker: &mut OIFitsChecker) {
    if let Some(arr_name) = table.arr_name() {
        if table.oi_array(file).is_none() {
            checker.severe(format!(
                "Missing OI_ARRAY table that describes the '{arr_name}' array"
            ));
        }
    }
}

impl OITable {
    pub fn arr_name(&self) -> Option<&str> {
        self.keyword_str(KEYWORD_ARRNAME)
    }

    pub fn ins_name(&self) -> Option<&str> {
        self.keyword_str(KEYWORD_INSNAME)
    }

    pub fn set_arr_name(&mut self, arr_name: &str) {
        self.set_keyword(KEYWORD_ARRNAME, arr_name);
    }

    pub fn set_ins_name(&mut self, ins_name: &str) {
        self.set_keyword(KEYWORD_INSNAME, ins_name);
    }

    pub fn date_obs(&self) -> Option<&str> {
        self.keyword_str(KEYWORD_DATE_OBS)
    }

    /// The OI_ARRAY table named by ARRNAME, resolved once and memoized. A
    /// memoized position that no longer names a matching table in `file` is
    /// resolved again.
    pub fn oi_array<'f>(&self, file: &'f OIFitsFile) -> Option<&'f OITable> {
        let arr_name = self.arr_name()?;
        if let Some(idx) = self.array_ref.get() {
            match file.table(idx) {
                Some(t) if t.kind() == TableKind::Array && t.arr_name() == Some(arr_name) => {
                    return Some(t)
                }
                _ => self.array_ref.set(None),
            }
        }
        let idx = file.arrays_named(arr_name).first().copied()?;
        trace!("resolved OI_ARRAY reference {arr_name} for {self}");
        self.array_ref.set(Some(idx));
        file.table(idx)
    }

    /// The OI_WAVELENGTH table named by INSNAME, resolved once and memoized.
    pub fn oi_wavelength<'f>(&self, file: &'f OIFitsFile) -> Option<&'f OITable> {
        let ins_name = self.ins_name()?;
        if let Some(idx) = self.wavelength_ref.get() {
            match file.table(idx) {
                Some(t) if t.kind() == TableKind::Wavelength && t.ins_name() == Some(ins_name) => {
                    return Some(t)
                }
                _ => self.wavelength_ref.set(None),
            }
        }
        let Some(idx) = file.wavelengths_named(ins_name).first().copied() else {
            warn!("Missing OI_WAVELENGTH identified by '{ins_name}'");
            return None;
        };
        trace!("resolved OI_WAVELENGTH reference {ins_name} for {self}");
        self.wavelength_ref.set(Some(idx));
        file.table(idx)
    }

    /// Number of spectral channels: the rows of an OI_WAVELENGTH table, or
    /// those of the table a measurement table refers to. 0 when unknown.
    pub fn nwave(&self, file: &OIFitsFile) -> usize {
        match self.kind() {
            TableKind::Wavelength => self.nb_rows(),
            kind if kind.is_data() => self.oi_wavelength(file).map_or(0, OITable::nb_rows),
            _ => 0,
        }
    }

    /// Measurements are table rows.
    pub fn nb_measurements(&self) -> usize {
        self.nb_rows()
    }

    pub fn target_ids(&self) -> Option<&[i16]> {
        self.column(COLUMN_TARGET_ID)?
            .as_shorts()
            .map(Cells::values)
    }

    pub fn sta_indexes(&self) -> Option<&Cells<i16>> {
        self.column(COLUMN_STA_INDEX)?.as_shorts()
    }

    pub fn flags(&self) -> Option<&Cells<bool>> {
        self.column(COLUMN_FLAG)?.as_logicals()
    }

    /// `true` when every row observes the same target.
    pub fn has_single_target(&self) -> bool {
        self.distinct_target_ids().len() == 1
    }

    /// Number of flagged cells.
    pub fn nb_flagged(&self) -> usize {
        self.flags()
            .map_or(0, |f| f.values().iter().filter(|&&b| b).count())
    }

    /// Name of the target observed on `row`.
    pub fn target_name<'f>(&self, file: &'f OIFitsFile, row: usize) -> Option<&'f str> {
        let id = *self.target_ids()?.get(row)?;
        file.target_name(id)
    }

    /// Smallest and largest EFF_WAVE of the referenced wavelength table.
    pub fn eff_wave_range(&self, file: &OIFitsFile) -> Option<(f32, f32)> {
        self.oi_wavelength(file)?.eff_wave_bounds()
    }

    /// Sorted distinct TARGET_ID values.
    pub fn distinct_target_ids(&self) -> Vec<i16> {
        let ids: BTreeSet<i16> = self.target_ids().unwrap_or(&[]).iter().copied().collect();
        ids.into_iter().collect()
    }

    /// Distinct STA_INDEX tuples in first-seen order.
    pub fn distinct_sta_indexes(&self) -> Vec<Vec<i16>> {
        let mut seen: Vec<Vec<i16>> = Vec::new();
        if let Some(cells) = self.sta_indexes() {
            for row in cells.rows() {
                if !seen.iter().any(|s| s.as_slice() == row) {
                    seen.push(row.to_vec());
                }
            }
        }
        seen
    }

    /// Distinct station configurations: STA_INDEX tuples with their order
    /// ignored, each sorted ascending.
    pub fn distinct_sta_confs(&self) -> Vec<Vec<i16>> {
        let confs: BTreeSet<Vec<i16>> = self
            .distinct_sta_indexes()
            .into_iter()
            .map(|mut s| {
                s.sort_unstable();
                s
            })
            .collect();
        confs.into_iter().collect()
    }

    /// Station names joined by `-`. Indexes unknown to the array appear as
    /// numbers; without a resolved array the numbers are joined by spaces.
    pub fn sta_names(&self, file: &OIFitsFile, indexes: &[i16]) -> String {
        let Some(array) = self.oi_array(file) else {
            let parts: Vec<String> = indexes.iter().map(i16::to_string).collect();
            return parts.join(" ");
        };
        let parts: Vec<String> = indexes
            .iter()
            .map(|&i| {
                array
                    .station_name(i)
                    .map_or_else(|| i.to_string(), String::from)
            })
            .collect();
        parts.join("-")
    }

    /// `coord / λ` for every row and channel of a scalar coordinate column.
    pub(crate) fn spatial_coord(&self, file: &OIFitsFile, column: &str) -> Option<Vec<Vec<f64>>> {
        let coords = self.column_double(column)?;
        let waves = self.oi_wavelength(file)?.eff_wave()?;
        Some(
            coords
                .iter()
                .map(|&c| waves.iter().map(|&w| c / f64::from(w)).collect())
                .collect(),
        )
    }

    /// Spatial frequency of every row and channel. Baselines use
    /// `|(u, v)| / λ`; closure triangles use their longest side.
    pub fn spatial_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        match self.kind() {
            TableKind::Vis | TableKind::Vis2 => {
                let u = self.column_double(COLUMN_UCOORD)?;
                let v = self.column_double(COLUMN_VCOORD)?;
                let waves = self.oi_wavelength(file)?.eff_wave()?;
                Some(
                    u.iter()
                        .zip(&v)
                        .map(|(&u, &v)| {
                            let dist = u.hypot(v);
                            waves.iter().map(|&w| dist / f64::from(w)).collect()
                        })
                        .collect(),
                )
            }
            TableKind::T3 => t3::triangle_spatial_freq(self, file),
            _ => None,
        }
    }

    /// UCOORD / λ.
    pub fn spatial_u_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        self.spatial_coord(file, COLUMN_UCOORD)
    }

    /// VCOORD / λ.
    pub fn spatial_v_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        self.spatial_coord(file, COLUMN_VCOORD)
    }
}
