//! Write-then-load integration tests for OIFITS files.

mod common;

use common::{gzip, valid_file, NWAVE};
use oifits::{ColumnValue, Level, OIFitsChecker, OIFitsLoader, OIFitsWriter, TableKind};

fn reload(file: &oifits::OIFitsFile) -> (oifits::OIFitsFile, OIFitsChecker) {
    let bytes = OIFitsWriter::to_bytes(file).unwrap();
    OIFitsLoader::from_bytes(&bytes).unwrap()
}

// ===========================================================================
// A model built in memory checks clean, before and after a round trip
// ===========================================================================

#[test]
fn valid_model_has_no_severe_errors() {
    let file = valid_file();
    let mut checker = OIFitsChecker::new();
    file.check(&mut checker);
    assert_eq!(checker.nb_severes(), 0, "{}", checker.check_report());
}

#[test]
fn reloaded_file_has_no_severe_errors() {
    let (_, checker) = reload(&valid_file());
    assert_eq!(checker.nb_severes(), 0, "{}", checker.check_report());
    assert!(checker.contains(Level::Info, "Analysing table [1]: OI_TARGET"));
    assert!(checker.contains(Level::Info, "Analysing table [5]: OI_T3"));
}

#[test]
fn tables_keep_their_order_and_content() {
    let original = valid_file();
    let (loaded, _) = reload(&original);

    let kinds: Vec<TableKind> = loaded.tables().iter().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        [
            TableKind::Target,
            TableKind::Array,
            TableKind::Wavelength,
            TableKind::Vis2,
            TableKind::T3
        ]
    );
    let ext_nbs: Vec<usize> = loaded.tables().iter().map(|t| t.ext_nb()).collect();
    assert_eq!(ext_nbs, [1, 2, 3, 4, 5]);

    for (a, b) in original.tables().iter().zip(loaded.tables()) {
        for (name, value) in a.columns() {
            assert_eq!(b.column(name), Some(value), "{} column {name}", a.ext_name());
        }
        for (name, value) in a.keywords() {
            assert_eq!(b.keyword(name), Some(value), "{} keyword {name}", a.ext_name());
        }
    }

    let vis2 = loaded.oi_vis2().next().unwrap();
    assert_eq!(vis2.nwave(&loaded), NWAVE);
    assert_eq!(vis2.target_name(&loaded, 1), Some("Altair"));
    assert_eq!(vis2.sta_names(&loaded, &[1, 2]), "U1-U2");
}

#[test]
fn complex_visibilities_survive() {
    let mut file = valid_file();
    let mut vis = oifits::OITable::with_rows(TableKind::Vis, NWAVE, 1).unwrap();
    vis.set_keyword("DATE-OBS", "2024-03-01");
    vis.set_arr_name("VLTI");
    vis.set_ins_name("AMBER");
    vis.set_column("TARGET_ID", ColumnValue::Short(oifits::Cells::scalars(vec![1])));
    vis.set_column(
        "STA_INDEX",
        ColumnValue::Short(oifits::Cells::from_rows(2, vec![vec![1, 3]]).unwrap()),
    );
    vis.set_column(
        "VISDATA",
        ColumnValue::Complex(
            oifits::Cells::from_vec(1, NWAVE, vec![[0.5, -0.5], [0.25, 0.0], [0.0, 1.0]]).unwrap(),
        ),
    );
    file.register_oi_table(vis);

    let (loaded, checker) = reload(&file);
    assert_eq!(checker.nb_severes(), 0, "{}", checker.check_report());
    let vis = loaded.oi_vis().next().unwrap();
    assert_eq!(
        vis.vis_data().unwrap().row(0),
        &[[0.5, -0.5], [0.25, 0.0], [0.0, 1.0]]
    );
}

// ===========================================================================
// Char columns are padded to their declared width on output only
// ===========================================================================

#[test]
fn short_station_names_are_written_sixteen_wide() {
    let mut file = valid_file();
    file.update_table(1, |t| {
        t.set_column(
            "STA_NAME",
            ColumnValue::Char(vec!["E1".into(), "G1".into(), "K0".into()]),
        )
    });

    let bytes = OIFitsWriter::to_bytes(&file).unwrap();
    let fits = oifits::fits::hdu::parse_fits(&bytes).unwrap();
    let tform = fits.hdus[2]
        .cards
        .iter()
        .filter(|c| c.keyword_str().starts_with("TTYPE"))
        .position(|c| c.value == Some(oifits::fits::value::Value::String("STA_NAME".into())))
        .map(|i| format!("TFORM{}", i + 1))
        .unwrap();
    let tform = fits.hdus[2]
        .cards
        .iter()
        .find(|c| c.keyword_str() == tform)
        .and_then(|c| c.value.clone());
    assert_eq!(tform, Some(oifits::fits::value::Value::String("16A".into())));

    let names = file.table(1).unwrap().column("STA_NAME").unwrap();
    assert_eq!(names.as_chars().unwrap()[0], "E1");

    let (loaded, checker) = OIFitsLoader::from_bytes(&bytes).unwrap();
    assert_eq!(checker.nb_severes(), 0, "{}", checker.check_report());
    let array = loaded.oi_arrays().next().unwrap();
    assert_eq!(array.station_name(1), Some("E1"));
}

// ===========================================================================
// Files on disk, plain and gzipped
// ===========================================================================

#[test]
fn write_then_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("valid.fits");
    OIFitsWriter::write(&path, &valid_file()).unwrap();

    let (file, checker) = oifits::load_oifits(path.to_str().unwrap()).unwrap();
    assert_eq!(checker.nb_severes(), 0, "{}", checker.check_report());
    assert_eq!(file.nb_oi_tables(), 5);
    assert_eq!(
        file.absolute_path(),
        Some(std::fs::canonicalize(&path).unwrap().as_path())
    );
}

#[test]
fn gzipped_files_are_inflated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("valid.fits.gz");
    let bytes = OIFitsWriter::to_bytes(&valid_file()).unwrap();
    std::fs::write(&path, gzip(&bytes)).unwrap();

    let (file, checker) = OIFitsLoader::load(path.to_str().unwrap()).unwrap();
    assert_eq!(checker.nb_severes(), 0, "{}", checker.check_report());
    assert_eq!(file.oi_t3().count(), 1);

    let (from_memory, _) = OIFitsLoader::from_bytes(&gzip(&bytes)).unwrap();
    assert_eq!(from_memory.nb_oi_tables(), 5);
}

// ===========================================================================
// Derived data
// ===========================================================================

#[test]
fn t3_frequency_uses_the_first_baseline_twice() {
    let (file, _) = reload(&valid_file());
    let t3 = file.oi_t3().next().unwrap();
    let freq = t3.spatial_freq(&file).unwrap();

    // u1/v1 = 30/40 gives 50 m; u3/v3 = -(u1+u2)/-(v1+v2) = 30/100
    let dist3 = 30.0_f64.hypot(100.0);
    let wave = f64::from(2.0e-6_f32);
    assert!((freq[0][0] - dist3 / wave).abs() < 1e-3 * freq[0][0]);
}
