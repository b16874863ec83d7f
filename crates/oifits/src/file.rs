//! The aggregate root: every table of one OIFITS file plus the indexes that
//! resolve cross references between them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::checker::OIFitsChecker;
use crate::constants::*;
use crate::table::{OITable, TableKind};

/// An OIFITS file in memory.
///
/// Tables are owned in registration order and addressed by their position.
/// The per-kind lists and the ARRNAME / INSNAME / TARGET_ID maps are kept in
/// step with the tables by [`OIFitsFile::register_oi_table`] and
/// [`OIFitsFile::update_table`].
#[derive(Debug, Clone, Default)]
pub struct OIFitsFile {
    absolute_path: Option<PathBuf>,
    tables: Vec<OITable>,
    targets: Vec<usize>,
    arrays: Vec<usize>,
    wavelengths: Vec<usize>,
    vis: Vec<usize>,
    vis2: Vec<usize>,
    t3: Vec<usize>,
    data: Vec<usize>,
    arr_name_map: BTreeMap<String, Vec<usize>>,
    ins_name_map: BTreeMap<String, Vec<usize>>,
    target_names: BTreeMap<i16, String>,
}

impl OIFitsFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path the file was loaded from, if any.
    pub fn absolute_path(&self) -> Option<&Path> {
        self.absolute_path.as_deref()
    }

    pub fn set_absolute_path(&mut self, path: impl Into<PathBuf>) {
        self.absolute_path = Some(path.into());
    }

    /// Add a table and index it. Returns its position in [`Self::tables`].
    pub fn register_oi_table(&mut self, table: OITable) -> usize {
        debug!("registering {table}");
        // positions memoized against another file mean nothing here
        table.array_ref.set(None);
        table.wavelength_ref.set(None);
        let idx = self.tables.len();
        self.tables.push(table);
        self.index_table(idx);
        idx
    }

    /// Modify a registered table, then rebuild the indexes so renamed
    /// ARRNAME / INSNAME values and edited targets are picked up.
    pub fn update_table<R>(&mut self, idx: usize, f: impl FnOnce(&mut OITable) -> R) -> Option<R> {
        let table = self.tables.get_mut(idx)?;
        let out = f(table);
        self.reindex();
        Some(out)
    }

    fn reindex(&mut self) {
        for list in [
            &mut self.targets,
            &mut self.arrays,
            &mut self.wavelengths,
            &mut self.vis,
            &mut self.vis2,
            &mut self.t3,
            &mut self.data,
        ] {
            list.clear();
        }
        self.arr_name_map.clear();
        self.ins_name_map.clear();
        self.target_names.clear();
        for table in &self.tables {
            table.array_ref.set(None);
            table.wavelength_ref.set(None);
        }
        for idx in 0..self.tables.len() {
            self.index_table(idx);
        }
    }

    fn index_table(&mut self, idx: usize) {
        let table = &self.tables[idx];
        match table.kind() {
            TableKind::Target => {
                self.targets.push(idx);
                let ids = table.target_ids().unwrap_or(&[]);
                let names = table.target_names().unwrap_or(&[]);
                for (&id, name) in ids.iter().zip(names) {
                    self.target_names
                        .entry(id)
                        .or_insert_with(|| String::from(name.trim()));
                }
            }
            TableKind::Array => {
                self.arrays.push(idx);
                match table.arr_name() {
                    Some(name) => self
                        .arr_name_map
                        .entry(String::from(name))
                        .or_default()
                        .push(idx),
                    None => warn!("ARRNAME of OI_ARRAY table is null during building step"),
                }
            }
            TableKind::Wavelength => {
                self.wavelengths.push(idx);
                match table.ins_name() {
                    Some(name) => self
                        .ins_name_map
                        .entry(String::from(name))
                        .or_default()
                        .push(idx),
                    None => warn!("INSNAME of OI_WAVELENGTH table is null during building step"),
                }
            }
            TableKind::Vis => self.vis.push(idx),
            TableKind::Vis2 => self.vis2.push(idx),
            TableKind::T3 => self.t3.push(idx),
        }
        if table.kind().is_data() {
            self.data.push(idx);
        }
    }

    // ── tables ──

    /// All tables in registration order.
    pub fn tables(&self) -> &[OITable] {
        &self.tables
    }

    pub fn table(&self, idx: usize) -> Option<&OITable> {
        self.tables.get(idx)
    }

    pub fn nb_oi_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn pick<'a>(&'a self, indexes: &'a [usize]) -> impl Iterator<Item = &'a OITable> + 'a {
        indexes.iter().filter_map(move |&i| self.tables.get(i))
    }

    /// The OI_TARGET table. A valid file has exactly one.
    pub fn oi_target(&self) -> Option<&OITable> {
        self.pick(&self.targets).next()
    }

    pub fn oi_arrays(&self) -> impl Iterator<Item = &OITable> {
        self.pick(&self.arrays)
    }

    pub fn oi_wavelengths(&self) -> impl Iterator<Item = &OITable> {
        self.pick(&self.wavelengths)
    }

    pub fn oi_vis(&self) -> impl Iterator<Item = &OITable> {
        self.pick(&self.vis)
    }

    pub fn oi_vis2(&self) -> impl Iterator<Item = &OITable> {
        self.pick(&self.vis2)
    }

    pub fn oi_t3(&self) -> impl Iterator<Item = &OITable> {
        self.pick(&self.t3)
    }

    /// OI_VIS, OI_VIS2 and OI_T3 tables in registration order.
    pub fn oi_data(&self) -> impl Iterator<Item = &OITable> {
        self.pick(&self.data)
    }

    pub fn has_oi_target(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn has_oi_array(&self) -> bool {
        !self.arrays.is_empty()
    }

    pub fn has_oi_wavelength(&self) -> bool {
        !self.wavelengths.is_empty()
    }

    pub fn has_oi_vis(&self) -> bool {
        !self.vis.is_empty()
    }

    pub fn has_oi_vis2(&self) -> bool {
        !self.vis2.is_empty()
    }

    pub fn has_oi_t3(&self) -> bool {
        !self.t3.is_empty()
    }

    pub fn has_oi_data(&self) -> bool {
        !self.data.is_empty()
    }

    // ── cross references ──

    /// Positions of the OI_ARRAY tables carrying ARRNAME `name`.
    pub fn arrays_named(&self, name: &str) -> &[usize] {
        self.arr_name_map.get(name).map_or(&[], Vec::as_slice)
    }

    /// Positions of the OI_WAVELENGTH tables carrying INSNAME `name`.
    pub fn wavelengths_named(&self, name: &str) -> &[usize] {
        self.ins_name_map.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every ARRNAME, sorted.
    pub fn accepted_arr_names(&self) -> Vec<String> {
        self.arr_name_map.keys().cloned().collect()
    }

    /// Every INSNAME, sorted.
    pub fn accepted_ins_names(&self) -> Vec<String> {
        self.ins_name_map.keys().cloned().collect()
    }

    /// TARGET_ID values of the OI_TARGET table.
    pub fn accepted_target_ids(&self) -> Vec<i16> {
        self.oi_target()
            .and_then(OITable::target_ids)
            .map(<[i16]>::to_vec)
            .unwrap_or_default()
    }

    /// STA_INDEX values of an OI_ARRAY table.
    pub fn accepted_sta_indexes(&self, array: &OITable) -> Vec<i16> {
        array.station_indexes()
    }

    /// TARGET name of the target with TARGET_ID `id`.
    pub fn target_name(&self, id: i16) -> Option<&str> {
        self.target_names.get(&id).map(String::as_str)
    }

    /// TARGET_ID of the target called `name` (compared trimmed).
    pub fn target_id(&self, name: &str) -> Option<i16> {
        let name = name.trim();
        self.target_names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&id, _)| id)
    }

    /// Measurement tables grouped by the name of every target they observe.
    /// A table observing several targets appears under each of them.
    pub fn oi_data_per_target(&self) -> BTreeMap<&str, Vec<&OITable>> {
        let mut per_target: BTreeMap<&str, Vec<&OITable>> = BTreeMap::new();
        for table in self.oi_data() {
            let ids = table.distinct_target_ids();
            for (id, name) in &self.target_names {
                if !ids.contains(id) {
                    continue;
                }
                let tables = per_target.entry(name.as_str()).or_default();
                if !tables.last().is_some_and(|t| std::ptr::eq(*t, table)) {
                    tables.push(table);
                }
            }
        }
        per_target
    }

    /// Measurement tables with at least one row observing `name`.
    pub fn oi_data_for_target(&self, name: &str) -> Vec<&OITable> {
        self.oi_data_per_target()
            .remove(name.trim())
            .unwrap_or_default()
    }

    // ── checks ──

    /// Check table presence rules, then the syntax of every table.
    pub fn check(&self, checker: &mut OIFitsChecker) {
        match self.targets.len() {
            0 => checker.severe("No OI_TARGET table found: one and only one must be present"),
            1 => {}
            _ => checker.severe("Multiple OI_TARGET tables found: one and only one must be present"),
        }
        if self.ins_name_map.is_empty() {
            checker.severe("No OI_WAVELENGTH table found: one or more must be present");
        }
        for table in &self.tables {
            table.check_syntax(self, checker);
        }
    }

    /// Uniqueness of the identifier of an OI_ARRAY / OI_WAVELENGTH table.
    pub fn check_cross_reference(&self, table: &OITable, checker: &mut OIFitsChecker) {
        let (keyword, name, same_name) = match table.kind() {
            TableKind::Array => (
                KEYWORD_ARRNAME,
                table.arr_name(),
                table.arr_name().map(|n| self.arrays_named(n)),
            ),
            TableKind::Wavelength => (
                KEYWORD_INSNAME,
                table.ins_name(),
                table.ins_name().map(|n| self.wavelengths_named(n)),
            ),
            TableKind::Target | TableKind::Vis | TableKind::Vis2 | TableKind::T3 => return,
        };

        match (name, same_name) {
            (Some(name), Some(same)) if same.len() > 1 => {
                let ext_nbs: Vec<String> = self
                    .pick(same)
                    .map(|t| t.ext_nb().to_string())
                    .collect();
                checker.severe(format!(
                    "{} tables [{}] are identified by same {}='{}'",
                    table.kind(),
                    ext_nbs.join("|"),
                    keyword,
                    name
                ));
            }
            (None, _) => checker.severe(format!(
                "{keyword} identifier is missing during reference checking step"
            )),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cells, ColumnValue};
    use crate::checker::Level;

    fn target(ids: Vec<i16>, names: &[&str]) -> OITable {
        let mut t = OITable::with_rows(TableKind::Target, 0, ids.len()).unwrap();
        t.set_column(COLUMN_TARGET_ID, ColumnValue::Short(Cells::scalars(ids)));
        t.set_column(
            COLUMN_TARGET,
            ColumnValue::Char(names.iter().map(|s| String::from(*s)).collect()),
        );
        t
    }

    fn named(kind: TableKind, keyword: &str, name: &str) -> OITable {
        let mut t = OITable::new(kind);
        t.set_keyword(keyword, name);
        t
    }

    // --- registration ---

    #[test]
    fn tables_are_indexed_by_kind() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(target(vec![1], &["Vega"]));
        file.register_oi_table(named(TableKind::Array, KEYWORD_ARRNAME, "VLTI"));
        file.register_oi_table(named(TableKind::Wavelength, KEYWORD_INSNAME, "AMBER"));
        file.register_oi_table(OITable::new(TableKind::Vis2));
        file.register_oi_table(OITable::new(TableKind::T3));

        assert_eq!(file.nb_oi_tables(), 5);
        assert!(file.has_oi_target() && file.has_oi_array() && file.has_oi_wavelength());
        assert!(file.has_oi_vis2() && file.has_oi_t3() && !file.has_oi_vis());
        assert_eq!(file.oi_data().count(), 2);
        assert_eq!(file.oi_data().next().map(OITable::kind), Some(TableKind::Vis2));
        assert_eq!(file.arrays_named("VLTI"), &[1]);
        assert_eq!(file.wavelengths_named("AMBER"), &[2]);
        assert!(file.wavelengths_named("MIDI").is_empty());
        assert_eq!(file.target_name(1), Some("Vega"));
        assert_eq!(file.accepted_target_ids(), vec![1]);
    }

    #[test]
    fn unnamed_reference_tables_stay_out_of_maps() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(OITable::new(TableKind::Array));
        file.register_oi_table(OITable::new(TableKind::Wavelength));
        assert!(file.accepted_arr_names().is_empty());
        assert!(file.accepted_ins_names().is_empty());
        assert_eq!(file.oi_arrays().count(), 1);
    }

    #[test]
    fn update_table_reindexes_names() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(named(TableKind::Wavelength, KEYWORD_INSNAME, "AMBER"));
        let mut data = OITable::new(TableKind::Vis2);
        data.set_ins_name("AMBER");
        let d = file.register_oi_table(data);
        assert!(file.tables()[d].oi_wavelength(&file).is_some());

        file.update_table(0, |t| t.set_ins_name("GRAVITY"));
        assert_eq!(file.accepted_ins_names(), vec![String::from("GRAVITY")]);
        assert!(file.tables()[d].oi_wavelength(&file).is_none());
        assert!(file.update_table(9, |_| ()).is_none());
    }

    // --- targets ---

    fn data_for(kind: TableKind, ids: Vec<i16>) -> OITable {
        let mut t = OITable::with_rows(kind, 0, ids.len()).unwrap();
        t.set_column(COLUMN_TARGET_ID, ColumnValue::Short(Cells::scalars(ids)));
        t
    }

    #[test]
    fn target_ids_by_name() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(target(vec![3, 5], &["Vega  ", "Altair"]));
        assert_eq!(file.target_id("Vega"), Some(3));
        assert_eq!(file.target_id(" Altair "), Some(5));
        assert_eq!(file.target_id("Deneb"), None);
    }

    #[test]
    fn data_grouped_per_target() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(target(vec![1, 2, 3], &["Vega", "Altair", "Deneb"]));
        file.register_oi_table(data_for(TableKind::Vis2, vec![1, 1]));
        file.register_oi_table(data_for(TableKind::T3, vec![1, 2]));
        file.register_oi_table(data_for(TableKind::Vis, vec![9]));

        let per_target = file.oi_data_per_target();
        assert_eq!(per_target.keys().copied().collect::<Vec<_>>(), ["Altair", "Vega"]);
        let kinds = |tables: &[&OITable]| tables.iter().map(|t| t.kind()).collect::<Vec<_>>();
        assert_eq!(kinds(&per_target["Vega"]), [TableKind::Vis2, TableKind::T3]);
        assert_eq!(kinds(&per_target["Altair"]), [TableKind::T3]);

        assert_eq!(file.oi_data_for_target("Altair").len(), 1);
        assert!(file.oi_data_for_target("Deneb").is_empty());
        assert!(file.tables()[1].has_single_target());
        assert!(!file.tables()[2].has_single_target());
    }

    #[test]
    fn targets_sharing_a_name_list_a_table_once() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(target(vec![1, 2], &["Vega", "Vega"]));
        file.register_oi_table(data_for(TableKind::Vis2, vec![1, 2]));
        assert_eq!(file.oi_data_for_target("Vega").len(), 1);
    }

    // --- checks ---

    #[test]
    fn empty_target_table_is_reported_once() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(OITable::new(TableKind::Target));
        let mut checker = OIFitsChecker::new();
        file.check(&mut checker);
        let reported = checker
            .messages_at(Level::Severe)
            .filter(|m| *m == "No target defined")
            .count();
        assert_eq!(reported, 1);
    }

    #[test]
    fn empty_file_misses_mandatory_tables() {
        let mut checker = OIFitsChecker::new();
        OIFitsFile::new().check(&mut checker);
        assert!(checker.contains(
            Level::Severe,
            "No OI_TARGET table found: one and only one must be present"
        ));
        assert!(checker.contains(
            Level::Severe,
            "No OI_WAVELENGTH table found: one or more must be present"
        ));
    }

    #[test]
    fn two_targets_are_reported() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(target(vec![1], &["A"]));
        file.register_oi_table(target(vec![2], &["B"]));
        let mut checker = OIFitsChecker::new();
        file.check(&mut checker);
        assert!(checker.contains(
            Level::Severe,
            "Multiple OI_TARGET tables found: one and only one must be present"
        ));
        // the first OI_TARGET wins the name lookup
        assert_eq!(file.target_name(1), Some("A"));
    }

    #[test]
    fn check_analyses_every_table() {
        let mut file = OIFitsFile::new();
        file.register_oi_table(target(vec![1], &["A"]));
        file.register_oi_table(named(TableKind::Wavelength, KEYWORD_INSNAME, "AMBER"));
        let mut checker = OIFitsChecker::new();
        file.check(&mut checker);
        let analysed = checker
            .messages_at(Level::Info)
            .filter(|m| m.starts_with("Analysing table"))
            .count();
        assert_eq!(analysed, 2);
    }
}
