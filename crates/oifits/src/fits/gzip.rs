//! Gzip inflation for `.fits.gz` inputs.

use crate::error::{Error, Result};

/// Returns `true` when `data` starts with the gzip magic bytes `1f 8b`.
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Strip the gzip header and trailer, returning the raw deflate payload.
fn strip_gzip_header(data: &[u8]) -> Result<&[u8]> {
    if data.len() < 18 || !is_gzip(data) || data[2] != 0x08 {
        return Err(Error::Decompression);
    }
    let flg = data[3];
    let mut pos = 10usize;
    if flg & 0x04 != 0 {
        // FEXTRA
        if pos + 2 > data.len() {
            return Err(Error::Decompression);
        }
        let xlen = u16::from_le_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2 + xlen;
    }
    for mask in [0x08, 0x10] {
        // FNAME, FCOMMENT: null-terminated strings
        if flg & mask != 0 {
            while pos < data.len() && data[pos] != 0 {
                pos += 1;
            }
            pos += 1;
        }
    }
    if flg & 0x02 != 0 {
        // FHCRC
        pos += 2;
    }
    if data.len() < pos + 8 {
        return Err(Error::Decompression);
    }
    // CRC32 + ISIZE trailer
    Ok(&data[pos..data.len() - 8])
}

/// Inflate a single-member gzip stream.
pub fn gunzip(compressed: &[u8]) -> Result<Vec<u8>> {
    let payload = strip_gzip_header(compressed)?;
    miniz_oxide::inflate::decompress_to_vec(payload).map_err(|_| Error::Decompression)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal gzip member around a deflate stream (CRC left at zero).
    pub(crate) fn gzip_wrap(raw: &[u8]) -> Vec<u8> {
        let mut out = vec![0x1f, 0x8b, 0x08, 0x08, 0, 0, 0, 0, 0, 0xff];
        out.extend_from_slice(b"test.fits\0");
        out.extend(miniz_oxide::deflate::compress_to_vec(raw, 6));
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&(raw.len() as u32).to_le_bytes());
        out
    }

    #[test]
    fn inflate_with_file_name() {
        let raw = b"SIMPLE  =                    T".repeat(40);
        let gz = gzip_wrap(&raw);
        assert!(is_gzip(&gz));
        assert_eq!(gunzip(&gz).unwrap(), raw);
    }

    #[test]
    fn plain_data_is_not_gzip() {
        assert!(!is_gzip(b"SIMPLE"));
        assert!(matches!(gunzip(b"SIMPLE  = T  and more bytes"), Err(Error::Decompression)));
    }

    #[test]
    fn truncated_member() {
        assert!(gunzip(&[0x1f, 0x8b, 0x08, 0, 0, 0]).is_err());
    }
}
