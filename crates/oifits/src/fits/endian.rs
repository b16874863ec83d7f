//! Big-endian scalar conversion for binary table cells.
//!
//! FITS stores all binary data most-significant byte first. Callers pass
//! slices of at least the width of the type.

#[inline]
pub fn read_i16_be(buf: &[u8]) -> i16 {
    i16::from_be_bytes([buf[0], buf[1]])
}

#[inline]
pub fn read_i32_be(buf: &[u8]) -> i32 {
    i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

#[inline]
pub fn read_i64_be(buf: &[u8]) -> i64 {
    i64::from_be_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ])
}

#[inline]
pub fn read_f32_be(buf: &[u8]) -> f32 {
    f32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

#[inline]
pub fn read_f64_be(buf: &[u8]) -> f64 {
    f64::from_be_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ])
}

#[inline]
pub fn write_i16_be(buf: &mut [u8], val: i16) {
    buf[..2].copy_from_slice(&val.to_be_bytes());
}

#[inline]
pub fn write_f32_be(buf: &mut [u8], val: f32) {
    buf[..4].copy_from_slice(&val.to_be_bytes());
}

#[inline]
pub fn write_f64_be(buf: &mut [u8], val: f64) {
    buf[..8].copy_from_slice(&val.to_be_bytes());
}
