//! Self-describing schema of OIFITS tables: data types, units and the
//! keyword / column descriptors every table kind registers.

use std::fmt;

/// OIFITS data types, named after their FITS TFORM letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Types {
    /// `A`: character string.
    Char,
    /// `I`: 16-bit integer.
    Int,
    /// `E`: 32-bit float.
    Real,
    /// `D`: 64-bit float.
    Double,
    /// `L`: logical.
    Logical,
    /// `C`: complex made of two 32-bit floats.
    Complex,
}

impl Types {
    /// FITS type letter.
    pub const fn representation(self) -> char {
        match self {
            Types::Char => 'A',
            Types::Int => 'I',
            Types::Real => 'E',
            Types::Double => 'D',
            Types::Logical => 'L',
            Types::Complex => 'C',
        }
    }

    /// Inverse of [`Types::representation`]; other FITS letters have no
    /// OIFITS type.
    pub fn from_representation(code: char) -> Option<Types> {
        Some(match code {
            'A' => Types::Char,
            'I' => Types::Int,
            'E' => Types::Real,
            'D' => Types::Double,
            'L' => Types::Logical,
            'C' => Types::Complex,
            _ => return None,
        })
    }
}

impl fmt::Display for Types {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.representation())
    }
}

/// Physical units allowed in OIFITS, each with the spellings accepted on
/// input. The first spelling is the one written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    NoUnit,
    Meter,
    Degree,
    Second,
    Mjd,
    Year,
    MeterPerSecond,
    DegreePerYear,
    Hour,
}

impl Units {
    const ALL: [Units; 9] = [
        Units::NoUnit,
        Units::Meter,
        Units::Degree,
        Units::Second,
        Units::Mjd,
        Units::Year,
        Units::MeterPerSecond,
        Units::DegreePerYear,
        Units::Hour,
    ];

    /// All accepted spellings separated by `|`.
    pub const fn representation(self) -> &'static str {
        match self {
            Units::NoUnit => "",
            Units::Meter => "m|meter|meters",
            Units::Degree => "deg|degree|degrees",
            Units::Second => "s|sec|second|seconds",
            Units::Mjd => "day|days",
            Units::Year => "yr|year|years",
            Units::MeterPerSecond => "m/s|m / s|meter per second|meters per second|meter/second|meters/second|meter / second|meters / second",
            Units::DegreePerYear => "deg/yr|deg / yr|degree/yr|degree / yr|degrees/yr|degrees / yr|deg/year|deg / year|degree/year|degree / year|degrees/year|degrees / year",
            Units::Hour => "h|hour|hours",
        }
    }

    /// The spelling used when writing a TUNITn card.
    pub fn standard_representation(self) -> &'static str {
        self.tokens().next().unwrap_or("")
    }

    fn tokens(self) -> impl Iterator<Item = &'static str> {
        self.representation().split('|')
    }

    /// Case-insensitive lookup of a unit spelling. An empty (or blank) unit
    /// is [`Units::NoUnit`]; an unknown spelling is `None`.
    pub fn parse(unit: &str) -> Option<Units> {
        let unit = unit.trim();
        if unit.is_empty() {
            return Some(Units::NoUnit);
        }
        Self::ALL[1..]
            .iter()
            .copied()
            .find(|u| u.tokens().any(|t| t.eq_ignore_ascii_case(unit)))
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.representation())
    }
}

/// Cardinality of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Fixed number of values per row (characters for `A` columns).
    Fixed(usize),
    /// One value per spectral channel of the referenced OI_WAVELENGTH table.
    NWave,
}

/// Where the accepted values of a keyword or column come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// Any value.
    None,
    Strings(&'static [&'static str]),
    Ints(&'static [i16]),
    /// ARRNAME of every OI_ARRAY table in the file.
    ArrNames,
    /// INSNAME of every OI_WAVELENGTH table in the file.
    InsNames,
    /// TARGET_ID values of the OI_TARGET table.
    TargetIds,
    /// STA_INDEX values of the OI_ARRAY table referenced by the data table.
    StaIndexes,
}

/// Accepted values resolved against a file. Empty sets accept anything.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptedValues {
    Any,
    Strings(Vec<String>),
    Ints(Vec<i16>),
}

impl AcceptedValues {
    /// `true` when no restriction applies.
    pub fn is_unrestricted(&self) -> bool {
        match self {
            AcceptedValues::Any => true,
            AcceptedValues::Strings(v) => v.is_empty(),
            AcceptedValues::Ints(v) => v.is_empty(),
        }
    }

    pub fn accepts_str(&self, value: &str) -> bool {
        match self {
            AcceptedValues::Strings(v) if !v.is_empty() => {
                let value = value.trim();
                v.iter().any(|a| a.trim() == value)
            }
            _ => true,
        }
    }

    pub fn accepts_int(&self, value: i64) -> bool {
        match self {
            AcceptedValues::Ints(v) if !v.is_empty() => v.iter().any(|&a| i64::from(a) == value),
            _ => true,
        }
    }
}

impl fmt::Display for AcceptedValues {
    /// Values joined by `|`, as shown in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptedValues::Any => Ok(()),
            AcceptedValues::Strings(v) => f.write_str(&v.join("|")),
            AcceptedValues::Ints(v) => {
                let parts: Vec<String> = v.iter().map(i16::to_string).collect();
                f.write_str(&parts.join("|"))
            }
        }
    }
}

/// Descriptor of a header keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub data_type: Types,
    pub unit: Units,
    pub optional: bool,
    pub accepted: Accepted,
}

impl KeywordMeta {
    pub const fn new(name: &'static str, description: &'static str, data_type: Types) -> Self {
        KeywordMeta {
            name,
            description,
            data_type,
            unit: Units::NoUnit,
            optional: false,
            accepted: Accepted::None,
        }
    }

    pub const fn with_unit(mut self, unit: Units) -> Self {
        self.unit = unit;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn accepting(mut self, accepted: Accepted) -> Self {
        self.accepted = accepted;
        self
    }
}

/// Descriptor of a binary table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub data_type: Types,
    pub repeat: Repeat,
    pub unit: Units,
    pub optional: bool,
    pub accepted: Accepted,
}

impl ColumnMeta {
    /// Scalar column (repeat 1).
    pub const fn new(name: &'static str, description: &'static str, data_type: Types) -> Self {
        ColumnMeta {
            name,
            description,
            data_type,
            repeat: Repeat::Fixed(1),
            unit: Units::NoUnit,
            optional: false,
            accepted: Accepted::None,
        }
    }

    pub const fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = Repeat::Fixed(repeat);
        self
    }

    /// One value per spectral channel.
    pub const fn per_channel(mut self) -> Self {
        self.repeat = Repeat::NWave;
        self
    }

    pub const fn with_unit(mut self, unit: Units) -> Self {
        self.unit = unit;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn accepting(mut self, accepted: Accepted) -> Self {
        self.accepted = accepted;
        self
    }

    /// Repeat once NWAVE is known; 0 means it cannot be checked.
    pub fn resolve_repeat(&self, nwave: usize) -> usize {
        match self.repeat {
            Repeat::Fixed(n) => n,
            Repeat::NWave => nwave,
        }
    }

    /// Array columns hold several values per row; character columns never do.
    pub fn is_array(&self) -> bool {
        self.data_type != Types::Char
            && matches!(self.repeat, Repeat::NWave | Repeat::Fixed(2..))
    }
}
