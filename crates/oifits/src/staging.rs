//! Turning a location (local path or URL, optionally gzipped) into the raw
//! FITS bytes handed to the loader.

use std::path::PathBuf;

use log::trace;

use crate::error::{Error, Result};
use crate::fits::gzip::{gunzip, is_gzip};

/// FITS bytes of a location, ready to parse.
#[derive(Debug)]
pub struct Staged {
    pub bytes: Vec<u8>,
    /// Canonical path of a local file; `None` for remote locations.
    pub path: Option<PathBuf>,
}

/// Locations containing `://` are downloaded.
pub fn is_remote(location: &str) -> bool {
    location.contains("://")
}

/// Read (or download) `location` and inflate it when it is gzipped, either
/// by `.gz` suffix or by its magic bytes.
pub fn stage(location: &str) -> Result<Staged> {
    let (raw, path) = if is_remote(location) {
        (fetch_remote(location)?, None)
    } else {
        trace!("reading {location}");
        let raw = std::fs::read(location)?;
        (raw, std::fs::canonicalize(location).ok())
    };

    let bytes = if location.ends_with(".gz") || is_gzip(&raw) {
        trace!("inflating {location}");
        gunzip(&raw)?
    } else {
        raw
    };
    Ok(Staged { bytes, path })
}

/// Download into a temporary file that is removed once read back.
#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    use std::io::{Read, Seek, SeekFrom};

    log::warn!("downloading remote OIFITS file {url}");
    let response = ureq::get(url)
        .call()
        .map_err(|e| Error::Remote(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new()?;
    trace!("staging {url} into {}", tmp.path().display());
    std::io::copy(&mut response.into_reader(), tmp.as_file_mut())?;

    let file = tmp.as_file_mut();
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    Err(Error::UnsupportedLocation(String::from(url)))
}
