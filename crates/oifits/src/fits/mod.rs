//! FITS container layer: blocks, header cards, HDUs and binary tables.

pub mod bintable;
pub mod block;
pub mod endian;
pub mod gzip;
pub mod hdu;
pub mod header;
pub mod primary;
pub mod value;
