use ndarray::{Array, Array2};

use crate::cell::Cells;
use crate::error::{Error, Result};
use crate::table::OITable;

impl<T: Clone> Cells<T> {
    /// Copy the cells into a `[nrows, repeat]` array.
    pub fn to_array2(&self) -> Result<Array2<T>> {
        Array::from_shape_vec((self.nrows(), self.repeat()), self.values().to_vec())
            .map_err(|_| Error::InvalidValue("cell shape"))
    }
}

impl OITable {
    /// Numeric column as a `[rows, repeat]` array of doubles. Complex cells
    /// give their modulus; char and logical columns give `None`.
    pub fn column_array(&self, name: &str) -> Option<Array2<f64>> {
        self.column(name)?.to_doubles()?.to_array2().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ColumnValue;
    use crate::table::TableKind;

    #[test]
    fn cells_keep_row_major_layout() {
        let cells = Cells::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let arr = cells.to_array2().unwrap();
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr[[1, 0]], 4);
        assert_eq!(arr[[0, 2]], 3);
    }

    #[test]
    fn complex_column_gives_modulus() {
        let mut table = OITable::new(TableKind::Vis);
        table.set_column(
            "VISDATA",
            ColumnValue::Complex(Cells::from_vec(1, 1, vec![[3.0, 4.0]]).unwrap()),
        );
        let arr = table.column_array("VISDATA").unwrap();
        assert_eq!(arr[[0, 0]], 5.0);
    }

    #[test]
    fn char_columns_have_no_array() {
        let mut table = OITable::new(TableKind::Target);
        table.set_column("TARGET", ColumnValue::Char(vec!["HD 1".into()]));
        assert!(table.column_array("TARGET").is_none());
    }
}
