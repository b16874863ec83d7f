//! The data-less primary HDU that opens every OIFITS file.

use super::header::Card;
use super::value::Value;

/// Header cards of an empty primary HDU: `SIMPLE = T`, `BITPIX = 8`,
/// `NAXIS = 0`.
pub fn build_empty_primary_header() -> Vec<Card> {
    vec![
        Card::new("SIMPLE", Value::Logical(true)).with_comment("conforms to FITS standard"),
        Card::new("BITPIX", Value::Integer(8)).with_comment("bits per data value"),
        Card::new("NAXIS", Value::Integer(0)).with_comment("number of axes"),
        Card::new("EXTEND", Value::Logical(true)).with_comment("extensions may be present"),
    ]
}
