/// Fatal errors raised while reading, staging or writing an OIFITS container.
///
/// Validation problems are never reported through this type; they are
/// accumulated by [`crate::checker::OIFitsChecker`] instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed FITS header block.
    #[error("invalid FITS header: {0}")]
    InvalidHeader(&'static str),
    /// Premature end of data while reading.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Malformed keyword name in a header card.
    #[error("invalid keyword name")]
    InvalidKeyword,
    /// A header or table value could not be parsed correctly.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    /// A required structural keyword was not found in the header.
    #[error("missing required keyword: {0}")]
    MissingKeyword(&'static str),
    /// The location cannot be opened by this build (e.g. a URL without the
    /// `remote` feature).
    #[error("unsupported location: {0}")]
    UnsupportedLocation(String),
    /// Gzip payload could not be inflated.
    #[error("gzip decompression failed")]
    Decompression,
    /// Tables built from scratch need at least one row.
    #[error("invalid number of rows: {0} (the table must have at least 1 row)")]
    InvalidRowCount(usize),
    /// Remote download failure.
    #[cfg(feature = "remote")]
    #[error("unable to fetch remote file: {0}")]
    Remote(String),
    /// An I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
