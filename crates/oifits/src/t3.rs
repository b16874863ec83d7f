//! `OI_T3`: triple products (closure phases) over station triangles.

use crate::cell::Cells;
use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::data::{self, sta_index, FLAG};
use crate::file::OIFitsFile;
use crate::meta::{ColumnMeta, Types, Units};
use crate::table::OITable;

pub(crate) static COLUMNS: [ColumnMeta; 10] = [
    ColumnMeta::new(COLUMN_T3AMP, "triple product amplitude", Types::Double).per_channel(),
    ColumnMeta::new(COLUMN_T3AMPERR, "error in triple product amplitude", Types::Double)
        .per_channel(),
    ColumnMeta::new(COLUMN_T3PHI, "triple product phase", Types::Double)
        .per_channel()
        .with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_T3PHIERR, "error in triple product phase", Types::Double)
        .per_channel()
        .with_unit(Units::Degree),
    ColumnMeta::new(COLUMN_U1COORD, "U coordinate of baseline AB of the triangle", Types::Double)
        .with_unit(Units::Meter),
    ColumnMeta::new(COLUMN_V1COORD, "V coordinate of baseline AB of the triangle", Types::Double)
        .with_unit(Units::Meter),
    ColumnMeta::new(COLUMN_U2COORD, "U coordinate of baseline BC of the triangle", Types::Double)
        .with_unit(Units::Meter),
    ColumnMeta::new(COLUMN_V2COORD, "V coordinate of baseline BC of the triangle", Types::Double)
        .with_unit(Units::Meter),
    sta_index(3),
    FLAG,
];

/// Longest side of the (u1,v1), (u2,v2), (u3,v3) triangle over each
/// wavelength, where `(u3, v3) = -((u1, v1) + (u2, v2))`.
///
/// The second side is measured from (u1, v1) again, so (u2, v2) never wins
/// on its own. Plots produced from these files have always used this
/// definition.
pub(crate) fn triangle_spatial_freq(table: &OITable, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
    let u1 = table.column_double(COLUMN_U1COORD)?;
    let v1 = table.column_double(COLUMN_V1COORD)?;
    let u2 = table.column_double(COLUMN_U2COORD)?;
    let v2 = table.column_double(COLUMN_V2COORD)?;
    let waves = table.oi_wavelength(file)?.eff_wave()?;

    let rows = u1
        .iter()
        .zip(&v1)
        .zip(u2.iter().zip(&v2))
        .map(|((&u1, &v1), (&u2, &v2))| {
            let u3 = -(u1 + u2);
            let v3 = -(v1 + v2);
            let dist1 = u1.hypot(v1);
            let dist2 = u1.hypot(v1);
            let dist3 = u3.hypot(v3);
            let dist = dist1.max(dist2).max(dist3);
            waves.iter().map(|&w| dist / f64::from(w)).collect()
        })
        .collect();
    Some(rows)
}

/// Errors of unflagged measurements must be usable.
pub(crate) fn check_t3(table: &OITable, checker: &mut OIFitsChecker) {
    data::check_error_column(table, COLUMN_T3AMPERR, checker);
    data::check_error_column(table, COLUMN_T3PHIERR, checker);
}

impl OITable {
    pub fn t3_amp(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_T3AMP)?.as_doubles()
    }

    pub fn t3_amp_err(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_T3AMPERR)?.as_doubles()
    }

    pub fn t3_phi(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_T3PHI)?.as_doubles()
    }

    pub fn t3_phi_err(&self) -> Option<&Cells<f64>> {
        self.column(COLUMN_T3PHIERR)?.as_doubles()
    }

    /// U1COORD / λ.
    pub fn spatial_u1_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        self.spatial_coord(file, COLUMN_U1COORD)
    }

    /// V1COORD / λ.
    pub fn spatial_v1_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        self.spatial_coord(file, COLUMN_V1COORD)
    }

    /// U2COORD / λ.
    pub fn spatial_u2_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        self.spatial_coord(file, COLUMN_U2COORD)
    }

    /// V2COORD / λ.
    pub fn spatial_v2_freq(&self, file: &OIFitsFile) -> Option<Vec<Vec<f64>>> {
        self.spatial_coord(file, COLUMN_V2COORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ColumnValue;
    use crate::table::TableKind;

    fn scalar(v: f64) -> ColumnValue {
        ColumnValue::Double(Cells::scalars(vec![v]))
    }

    fn file_with_triangle(u1: f64, v1: f64, u2: f64, v2: f64) -> (OIFitsFile, usize) {
        let mut file = OIFitsFile::new();
        let mut w = OITable::with_rows(TableKind::Wavelength, 0, 1).unwrap();
        w.set_ins_name("PIONIER");
        w.set_column(COLUMN_EFF_WAVE, ColumnValue::Real(Cells::scalars(vec![2.0])));
        file.register_oi_table(w);

        let mut t = OITable::with_rows(TableKind::T3, 1, 1).unwrap();
        t.set_ins_name("PIONIER");
        t.set_column(COLUMN_U1COORD, scalar(u1));
        t.set_column(COLUMN_V1COORD, scalar(v1));
        t.set_column(COLUMN_U2COORD, scalar(u2));
        t.set_column(COLUMN_V2COORD, scalar(v2));
        let idx = file.register_oi_table(t);
        (file, idx)
    }

    #[test]
    fn longest_side_wins() {
        // |(u1,v1)| = 5, |(u3,v3)| = |(-6,-8)| = 10
        let (file, idx) = file_with_triangle(3.0, 4.0, 3.0, 4.0);
        let t = &file.tables()[idx];
        assert_eq!(t.spatial_freq(&file).unwrap(), vec![vec![5.0]]);
    }

    #[test]
    fn second_baseline_is_never_measured() {
        // |(u1,v1)| = 1, |(u2,v2)| ~ 20.02, |(u3,v3)| = |(0,-20)| = 20
        let (file, idx) = file_with_triangle(1.0, 0.0, -1.0, 20.0);
        let t = &file.tables()[idx];
        assert_eq!(t.spatial_freq(&file).unwrap(), vec![vec![10.0]]);
    }

    #[test]
    fn coordinate_frequencies() {
        let (file, idx) = file_with_triangle(3.0, 4.0, -6.0, 8.0);
        let t = &file.tables()[idx];
        assert_eq!(t.spatial_u1_freq(&file).unwrap(), vec![vec![1.5]]);
        assert_eq!(t.spatial_v1_freq(&file).unwrap(), vec![vec![2.0]]);
        assert_eq!(t.spatial_u2_freq(&file).unwrap(), vec![vec![-3.0]]);
        assert_eq!(t.spatial_v2_freq(&file).unwrap(), vec![vec![4.0]]);
        assert_eq!(t.t3_amp().unwrap().repeat(), 1);
    }
}
