//! Typed storage for keyword values and column cells.

use std::fmt;

use crate::error::{Error, Result};
use crate::meta::Types;

/// Row-major `rows x repeat` matrix of column cells.
///
/// The row count is stored explicitly so that a column with a repeat of 0
/// (unresolved NWAVE) still knows how many rows it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Cells<T> {
    nrows: usize,
    repeat: usize,
    values: Vec<T>,
}

impl<T> Cells<T> {
    /// Wrap `values`, which must hold exactly `nrows * repeat` items.
    pub fn from_vec(nrows: usize, repeat: usize, values: Vec<T>) -> Result<Self> {
        if values.len() != nrows * repeat {
            return Err(Error::InvalidValue("cell count does not match rows x repeat"));
        }
        Ok(Cells {
            nrows,
            repeat,
            values,
        })
    }

    /// One value per row.
    pub fn scalars(values: Vec<T>) -> Self {
        Cells {
            nrows: values.len(),
            repeat: 1,
            values,
        }
    }

    /// Build from per-row vectors, which must all have `repeat` items.
    pub fn from_rows(repeat: usize, rows: Vec<Vec<T>>) -> Result<Self> {
        let nrows = rows.len();
        let values: Vec<T> = rows.into_iter().flatten().collect();
        Self::from_vec(nrows, repeat, values)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn repeat(&self) -> usize {
        self.repeat
    }

    /// All values, row-major.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Cells of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= nrows`.
    pub fn row(&self, row: usize) -> &[T] {
        &self.values[row * self.repeat..(row + 1) * self.repeat]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        &mut self.values[row * self.repeat..(row + 1) * self.repeat]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.nrows && col < self.repeat {
            self.values.get(row * self.repeat + col)
        } else {
            None
        }
    }

    /// Iterate over rows, yielding empty slices when repeat is 0.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.nrows).map(move |i| self.row(i))
    }

    /// Convert every value, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Cells<U> {
        Cells {
            nrows: self.nrows,
            repeat: self.repeat,
            values: self.values.iter().map(f).collect(),
        }
    }
}

impl<T: Clone + Default> Cells<T> {
    /// Default-filled matrix.
    pub fn zeros(nrows: usize, repeat: usize) -> Self {
        Cells {
            nrows,
            repeat,
            values: vec![T::default(); nrows * repeat],
        }
    }
}

/// Value of a header keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    Char(String),
    Int(i32),
    Double(f64),
    Logical(bool),
}

impl KeywordValue {
    /// OIFITS type of the stored value.
    pub fn types(&self) -> Types {
        match self {
            KeywordValue::Char(_) => Types::Char,
            KeywordValue::Int(_) => Types::Int,
            KeywordValue::Double(_) => Types::Double,
            KeywordValue::Logical(_) => Types::Logical,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            KeywordValue::Char(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            KeywordValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            KeywordValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_logical(&self) -> Option<bool> {
        match self {
            KeywordValue::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for KeywordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordValue::Char(s) => f.write_str(s),
            KeywordValue::Int(n) => write!(f, "{n}"),
            KeywordValue::Double(d) => write!(f, "{d}"),
            KeywordValue::Logical(b) => f.write_str(if *b { "T" } else { "F" }),
        }
    }
}

impl From<&str> for KeywordValue {
    fn from(s: &str) -> Self {
        KeywordValue::Char(String::from(s))
    }
}

impl From<String> for KeywordValue {
    fn from(s: String) -> Self {
        KeywordValue::Char(s)
    }
}

impl From<i32> for KeywordValue {
    fn from(n: i32) -> Self {
        KeywordValue::Int(n)
    }
}

impl From<f64> for KeywordValue {
    fn from(d: f64) -> Self {
        KeywordValue::Double(d)
    }
}

/// Values of one column for every row of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// One string per row.
    Char(Vec<String>),
    Short(Cells<i16>),
    Real(Cells<f32>),
    Double(Cells<f64>),
    Logical(Cells<bool>),
    /// `[re, im]` pairs.
    Complex(Cells<[f32; 2]>),
}

impl ColumnValue {
    /// Zero-filled (or empty-string) column of the given type and shape.
    pub fn zeros(data_type: Types, nrows: usize, repeat: usize) -> Self {
        match data_type {
            Types::Char => ColumnValue::Char(vec![String::new(); nrows]),
            Types::Int => ColumnValue::Short(Cells::zeros(nrows, repeat)),
            Types::Real => ColumnValue::Real(Cells::zeros(nrows, repeat)),
            Types::Double => ColumnValue::Double(Cells::zeros(nrows, repeat)),
            Types::Logical => ColumnValue::Logical(Cells::zeros(nrows, repeat)),
            Types::Complex => ColumnValue::Complex(Cells::zeros(nrows, repeat)),
        }
    }

    /// OIFITS type of the stored cells.
    pub fn types(&self) -> Types {
        match self {
            ColumnValue::Char(_) => Types::Char,
            ColumnValue::Short(_) => Types::Int,
            ColumnValue::Real(_) => Types::Real,
            ColumnValue::Double(_) => Types::Double,
            ColumnValue::Logical(_) => Types::Logical,
            ColumnValue::Complex(_) => Types::Complex,
        }
    }

    pub fn nrows(&self) -> usize {
        match self {
            ColumnValue::Char(v) => v.len(),
            ColumnValue::Short(c) => c.nrows(),
            ColumnValue::Real(c) => c.nrows(),
            ColumnValue::Double(c) => c.nrows(),
            ColumnValue::Logical(c) => c.nrows(),
            ColumnValue::Complex(c) => c.nrows(),
        }
    }

    /// Values per row; for character columns the longest string length.
    pub fn repeat(&self) -> usize {
        match self {
            ColumnValue::Char(v) => v.iter().map(String::len).max().unwrap_or(0),
            ColumnValue::Short(c) => c.repeat(),
            ColumnValue::Real(c) => c.repeat(),
            ColumnValue::Double(c) => c.repeat(),
            ColumnValue::Logical(c) => c.repeat(),
            ColumnValue::Complex(c) => c.repeat(),
        }
    }

    pub fn as_chars(&self) -> Option<&[String]> {
        match self {
            ColumnValue::Char(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_chars_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            ColumnValue::Char(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_shorts(&self) -> Option<&Cells<i16>> {
        match self {
            ColumnValue::Short(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_reals(&self) -> Option<&Cells<f32>> {
        match self {
            ColumnValue::Real(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&Cells<f64>> {
        match self {
            ColumnValue::Double(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_logicals(&self) -> Option<&Cells<bool>> {
        match self {
            ColumnValue::Logical(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_complexes(&self) -> Option<&Cells<[f32; 2]>> {
        match self {
            ColumnValue::Complex(c) => Some(c),
            _ => None,
        }
    }

    /// Numeric cells widened to `f64`. Complex cells yield their modulus;
    /// character and logical columns yield `None`.
    pub fn to_doubles(&self) -> Option<Cells<f64>> {
        match self {
            ColumnValue::Short(c) => Some(c.map(|&v| f64::from(v))),
            ColumnValue::Real(c) => Some(c.map(|&v| f64::from(v))),
            ColumnValue::Double(c) => Some(c.clone()),
            ColumnValue::Complex(c) => Some(c.map(|&[re, im]| f64::from(re).hypot(f64::from(im)))),
            ColumnValue::Char(_) | ColumnValue::Logical(_) => None,
        }
    }
}
