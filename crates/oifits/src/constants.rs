//! OIFITS (v1) table, keyword and column names.

// tables
pub const TABLE_OI_ARRAY: &str = "OI_ARRAY";
pub const TABLE_OI_TARGET: &str = "OI_TARGET";
pub const TABLE_OI_WAVELENGTH: &str = "OI_WAVELENGTH";
pub const TABLE_OI_VIS: &str = "OI_VIS";
pub const TABLE_OI_VIS2: &str = "OI_VIS2";
pub const TABLE_OI_T3: &str = "OI_T3";

/// Every extension name an OIFITS file may carry.
pub const TABLE_NAMES: &[&str] = &[
    TABLE_OI_ARRAY,
    TABLE_OI_TARGET,
    TABLE_OI_WAVELENGTH,
    TABLE_OI_VIS,
    TABLE_OI_VIS2,
    TABLE_OI_T3,
];

/// The only revision of the tables understood here.
pub const KEYWORD_OI_REVN_1: i16 = 1;

// common keywords
pub const KEYWORD_NAXIS2: &str = "NAXIS2";
pub const KEYWORD_EXTNAME: &str = "EXTNAME";
pub const KEYWORD_EXTVER: &str = "EXTVER";
pub const KEYWORD_OI_REVN: &str = "OI_REVN";

// OI_ARRAY
pub const KEYWORD_ARRNAME: &str = "ARRNAME";
pub const KEYWORD_FRAME: &str = "FRAME";
pub const KEYWORD_FRAME_GEOCENTRIC: &str = "GEOCENTRIC";
pub const KEYWORD_ARRAY_X: &str = "ARRAYX";
pub const KEYWORD_ARRAY_Y: &str = "ARRAYY";
pub const KEYWORD_ARRAY_Z: &str = "ARRAYZ";
pub const COLUMN_TEL_NAME: &str = "TEL_NAME";
pub const COLUMN_STA_NAME: &str = "STA_NAME";
pub const COLUMN_STA_INDEX: &str = "STA_INDEX";
pub const COLUMN_DIAMETER: &str = "DIAMETER";
pub const COLUMN_STA_XYZ: &str = "STAXYZ";

// OI_WAVELENGTH
pub const KEYWORD_INSNAME: &str = "INSNAME";
pub const COLUMN_EFF_WAVE: &str = "EFF_WAVE";
pub const COLUMN_EFF_BAND: &str = "EFF_BAND";

// OI_TARGET
pub const COLUMN_TARGET_ID: &str = "TARGET_ID";
pub const COLUMN_TARGET: &str = "TARGET";
pub const COLUMN_RA_EP0: &str = "RAEP0";
pub const COLUMN_DEC_EP0: &str = "DECEP0";
pub const COLUMN_EQUINOX: &str = "EQUINOX";
pub const COLUMN_RA_ERR: &str = "RA_ERR";
pub const COLUMN_DEC_ERR: &str = "DEC_ERR";
pub const COLUMN_SYSVEL: &str = "SYSVEL";
pub const COLUMN_VELTYP: &str = "VELTYP";
pub const COLUMN_VELDEF: &str = "VELDEF";
pub const COLUMN_PMRA: &str = "PMRA";
pub const COLUMN_PMDEC: &str = "PMDEC";
pub const COLUMN_PMRA_ERR: &str = "PMRA_ERR";
pub const COLUMN_PMDEC_ERR: &str = "PMDEC_ERR";
pub const COLUMN_PARALLAX: &str = "PARALLAX";
pub const COLUMN_PARA_ERR: &str = "PARA_ERR";
pub const COLUMN_SPECTYP: &str = "SPECTYP";

pub const COLUMN_VELTYP_LSR: &str = "LSR";
pub const COLUMN_VELTYP_HELIOCEN: &str = "HELIOCEN";
pub const COLUMN_VELTYP_BARYCENT: &str = "BARYCENT";
pub const COLUMN_VELTYP_GEOCENTR: &str = "GEOCENTR";
pub const COLUMN_VELTYP_TOPOCENT: &str = "TOPOCENT";
pub const COLUMN_VELTYP_UNKNOWN: &str = "UNKNOWN";
pub const COLUMN_VELDEF_RADIO: &str = "RADIO";
pub const COLUMN_VELDEF_OPTICAL: &str = "OPTICAL";

// OI_VIS, OI_VIS2, OI_T3
pub const KEYWORD_DATE_OBS: &str = "DATE-OBS";
pub const COLUMN_TIME: &str = "TIME";
pub const COLUMN_MJD: &str = "MJD";
pub const COLUMN_INT_TIME: &str = "INT_TIME";
pub const COLUMN_UCOORD: &str = "UCOORD";
pub const COLUMN_VCOORD: &str = "VCOORD";
pub const COLUMN_FLAG: &str = "FLAG";

pub const COLUMN_VISAMP: &str = "VISAMP";
pub const COLUMN_VISAMPERR: &str = "VISAMPERR";
pub const COLUMN_VISPHI: &str = "VISPHI";
pub const COLUMN_VISPHIERR: &str = "VISPHIERR";
pub const COLUMN_VISDATA: &str = "VISDATA";
pub const COLUMN_VISERR: &str = "VISERR";

pub const COLUMN_VIS2DATA: &str = "VIS2DATA";
pub const COLUMN_VIS2ERR: &str = "VIS2ERR";

pub const COLUMN_T3AMP: &str = "T3AMP";
pub const COLUMN_T3AMPERR: &str = "T3AMPERR";
pub const COLUMN_T3PHI: &str = "T3PHI";
pub const COLUMN_T3PHIERR: &str = "T3PHIERR";
pub const COLUMN_U1COORD: &str = "U1COORD";
pub const COLUMN_V1COORD: &str = "V1COORD";
pub const COLUMN_U2COORD: &str = "U2COORD";
pub const COLUMN_V2COORD: &str = "V2COORD";
