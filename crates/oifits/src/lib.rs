//! OIFITS (optical interferometry FITS) data model, loader, writer and
//! checker, on top of a small pure-Rust FITS binary table layer.

pub mod array;
pub mod cell;
pub mod checker;
pub mod constants;
pub mod data;
pub mod error;
pub mod file;
pub mod fits;
pub mod loader;
pub mod meta;
pub mod staging;
pub mod t3;
pub mod table;
pub mod target;
pub mod vis;
pub mod vis2;
pub mod wavelength;
pub mod writer;

#[cfg(feature = "array")]
mod ndarray_compat;

pub use cell::{Cells, ColumnValue, KeywordValue};
pub use checker::{Level, Message, OIFitsChecker};
pub use error::{Error, Result};
pub use file::OIFitsFile;
pub use loader::{load_oifits, OIFitsLoader};
pub use table::{OITable, TableKind};
pub use writer::OIFitsWriter;
