//! Shared builders for the integration tests.

#![allow(dead_code)]

use oifits::{Cells, ColumnValue, OIFitsFile, OITable, TableKind};

pub const NWAVE: usize = 3;

fn chars(values: &[&str]) -> ColumnValue {
    ColumnValue::Char(values.iter().map(|s| String::from(*s)).collect())
}

fn shorts(values: Vec<i16>) -> ColumnValue {
    ColumnValue::Short(Cells::scalars(values))
}

fn doubles(values: Vec<f64>) -> ColumnValue {
    ColumnValue::Double(Cells::scalars(values))
}

pub fn target_table(ids: Vec<i16>, names: &[&str]) -> OITable {
    let rows = ids.len();
    let mut t = OITable::with_rows(TableKind::Target, 0, rows).unwrap();
    t.set_column("TARGET_ID", shorts(ids));
    t.set_column("TARGET", chars(names));
    t.set_column("RA_EP0", doubles(vec![279.23; rows]));
    t.set_column("DEC_EP0", doubles(vec![38.78; rows]));
    t.set_column(
        "EQUINOX",
        ColumnValue::Real(Cells::scalars(vec![2000.0; rows])),
    );
    t.set_column("VELTYP", chars(&vec!["UNKNOWN"; rows]));
    t.set_column("VELDEF", chars(&vec!["OPTICAL"; rows]));
    t.set_column("SPECTYP", chars(&vec!["A0V"; rows]));
    t
}

pub fn array_table(arrname: &str) -> OITable {
    let mut t = OITable::with_rows(TableKind::Array, 0, 3).unwrap();
    t.set_keyword("ARRNAME", arrname);
    t.set_keyword("FRAME", "GEOCENTRIC");
    t.set_keyword("ARRAYX", 1942014.1);
    t.set_keyword("ARRAYY", -5455311.8);
    t.set_keyword("ARRAYZ", -2654530.1);
    t.set_column("TEL_NAME", chars(&["UT1", "UT2", "UT3"]));
    t.set_column("STA_NAME", chars(&["U1", "U2", "U3"]));
    t.set_column("STA_INDEX", shorts(vec![1, 2, 3]));
    t.set_column(
        "DIAMETER",
        ColumnValue::Real(Cells::scalars(vec![8.2; 3])),
    );
    t
}

pub fn wavelength_table(insname: &str) -> OITable {
    let mut t = OITable::with_rows(TableKind::Wavelength, 0, NWAVE).unwrap();
    t.set_keyword("INSNAME", insname);
    t.set_column(
        "EFF_WAVE",
        ColumnValue::Real(Cells::scalars(vec![2.0e-6, 2.2e-6, 2.4e-6])),
    );
    t.set_column(
        "EFF_BAND",
        ColumnValue::Real(Cells::scalars(vec![1.0e-7; NWAVE])),
    );
    t
}

fn data_keywords(t: &mut OITable) {
    t.set_keyword("DATE-OBS", "2024-03-01");
    t.set_arr_name("VLTI");
    t.set_ins_name("AMBER");
}

pub fn vis2_table() -> OITable {
    let mut t = OITable::with_rows(TableKind::Vis2, NWAVE, 2).unwrap();
    data_keywords(&mut t);
    t.set_column("TARGET_ID", shorts(vec![1, 2]));
    t.set_column("MJD", doubles(vec![60370.1, 60370.2]));
    t.set_column("INT_TIME", doubles(vec![60.0, 60.0]));
    t.set_column(
        "VIS2DATA",
        ColumnValue::Double(
            Cells::from_rows(NWAVE, vec![vec![0.9, 0.8, 0.7], vec![0.5, 0.4, 0.3]]).unwrap(),
        ),
    );
    t.set_column(
        "VIS2ERR",
        ColumnValue::Double(Cells::from_vec(2, NWAVE, vec![0.01; 2 * NWAVE]).unwrap()),
    );
    t.set_column("UCOORD", doubles(vec![30.0, 0.0]));
    t.set_column("VCOORD", doubles(vec![40.0, 60.0]));
    t.set_column(
        "STA_INDEX",
        ColumnValue::Short(Cells::from_rows(2, vec![vec![1, 2], vec![2, 3]]).unwrap()),
    );
    t
}

pub fn t3_table() -> OITable {
    let mut t = OITable::with_rows(TableKind::T3, NWAVE, 1).unwrap();
    data_keywords(&mut t);
    t.set_column("TARGET_ID", shorts(vec![1]));
    t.set_column("U1COORD", doubles(vec![30.0]));
    t.set_column("V1COORD", doubles(vec![40.0]));
    t.set_column("U2COORD", doubles(vec![0.0]));
    t.set_column("V2COORD", doubles(vec![60.0]));
    t.set_column(
        "STA_INDEX",
        ColumnValue::Short(Cells::from_rows(3, vec![vec![1, 2, 3]]).unwrap()),
    );
    t
}

/// A file that passes every check: one target table, one array, one
/// instrument, and a VIS2 plus a T3 table referencing them.
pub fn valid_file() -> OIFitsFile {
    let mut file = OIFitsFile::new();
    file.register_oi_table(target_table(vec![1, 2], &["Vega", "Altair"]));
    file.register_oi_table(array_table("VLTI"));
    file.register_oi_table(wavelength_table("AMBER"));
    file.register_oi_table(vis2_table());
    file.register_oi_table(t3_table());
    file
}

/// Minimal gzip member around a deflate stream (CRC left at zero).
pub fn gzip(raw: &[u8]) -> Vec<u8> {
    let mut out = vec![0x1f, 0x8b, 0x08, 0, 0, 0, 0, 0, 0, 0xff];
    out.extend(miniz_oxide::deflate::compress_to_vec(raw, 6));
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(&(raw.len() as u32).to_le_bytes());
    out
}
