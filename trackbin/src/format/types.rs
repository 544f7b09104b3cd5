//! Column and descriptor value types.

use std::fmt;
use std::str::FromStr;

/// On-disk encoding of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Signed 8-bit integer (`c`)
    I8,
    /// Unsigned 8-bit integer (`u`)
    U8,
    /// Signed 16-bit integer (`h`)
    I16,
    /// Signed 32-bit integer (`i`)
    I32,
    /// Signed 64-bit integer (`l`)
    I64,
    /// 32-bit float (`f`)
    F32,
    /// 64-bit float (`d`)
    F64,
    /// Whitespace-separated ASCII token (`a`)
    AsciiToken,
    /// Fixed-column ASCII field (`A:<start>:<width>`), 0-based start
    AsciiFixed { start: usize, width: usize },
}

impl Encoding {
    /// Size in bytes of a binary value; `None` for ASCII encodings.
    pub fn byte_width(&self) -> Option<usize> {
        match self {
            Encoding::I8 | Encoding::U8 => Some(1),
            Encoding::I16 => Some(2),
            Encoding::I32 | Encoding::F32 => Some(4),
            Encoding::I64 | Encoding::F64 => Some(8),
            Encoding::AsciiToken | Encoding::AsciiFixed { .. } => None,
        }
    }

    pub fn is_ascii(&self) -> bool {
        self.byte_width().is_none()
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "c" => Ok(Encoding::I8),
            "u" => Ok(Encoding::U8),
            "h" => Ok(Encoding::I16),
            "i" => Ok(Encoding::I32),
            "l" => Ok(Encoding::I64),
            "f" => Ok(Encoding::F32),
            "d" => Ok(Encoding::F64),
            "a" => Ok(Encoding::AsciiToken),
            _ if code.starts_with('A') => parse_fixed_column(code),
            _ => Err(format!("unknown encoding code '{}'", code)),
        }
    }
}

fn parse_fixed_column(code: &str) -> Result<Encoding, String> {
    let missing = || {
        format!(
            "ascii fixed-column encoding '{}' needs a start and width (A:<start>:<width>)",
            code
        )
    };
    let mut parts = code.split(':').skip(1);
    let start = parts.next().ok_or_else(missing)?;
    let width = parts.next().ok_or_else(missing)?;
    if parts.next().is_some() {
        return Err(missing());
    }
    let start: usize = start.parse().map_err(|_| missing())?;
    let width: usize = width.parse().map_err(|_| missing())?;
    if width == 0 {
        return Err(format!("ascii fixed-column encoding '{}' has zero width", code));
    }
    Ok(Encoding::AsciiFixed { start, width })
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::I8 => write!(f, "c"),
            Encoding::U8 => write!(f, "u"),
            Encoding::I16 => write!(f, "h"),
            Encoding::I32 => write!(f, "i"),
            Encoding::I64 => write!(f, "l"),
            Encoding::F32 => write!(f, "f"),
            Encoding::F64 => write!(f, "d"),
            Encoding::AsciiToken => write!(f, "a"),
            Encoding::AsciiFixed { start, width } => write!(f, "A:{}:{}", start, width),
        }
    }
}

/// One column of a data system.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Column name, unique within a descriptor
    pub name: String,
    pub encoding: Encoding,
    /// Raw value that stands for "no data"
    pub nan_proxy: Option<f64>,
    pub scale: f64,
    pub offset: f64,
}

impl FieldSpec {
    /// Create a column with unit scale, zero offset and no NaN proxy.
    pub fn new(name: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            name: name.into(),
            encoding,
            nan_proxy: None,
            scale: 1.0,
            offset: 0.0,
        }
    }

    pub fn with_scale(mut self, scale: f64, offset: f64) -> Self {
        self.scale = scale;
        self.offset = offset;
        self
    }

    pub fn with_nan_proxy(mut self, proxy: f64) -> Self {
        self.nan_proxy = Some(proxy);
        self
    }

    /// True if a raw (unscaled) value means "no data".
    #[inline]
    pub fn is_missing(&self, raw: f64) -> bool {
        raw.is_nan() || self.nan_proxy == Some(raw)
    }

    /// Convert a raw value to physical units.
    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }

    /// Reserved role implied by the column name, if any.
    pub fn role(&self) -> Option<ColumnRole> {
        ColumnRole::from_name(&self.name)
    }
}

/// Reserved column roles recognised by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// `lon` or `x`
    X,
    /// `lat` or `y`
    Y,
    /// `time` or `t`
    Time,
}

impl ColumnRole {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lon" | "x" => Some(ColumnRole::X),
            "lat" | "y" => Some(ColumnRole::Y),
            "time" | "t" => Some(ColumnRole::Time),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::X => write!(f, "x/lon"),
            ColumnRole::Y => write!(f, "y/lat"),
            ColumnRole::Time => write!(f, "time"),
        }
    }
}

/// Result of resolving a column name against a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Unrecognized,
    ColumnIndex(u8),
}

/// Longitude range the data system reports in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LonConvention {
    /// `[0, 360)`
    ZeroTo360,
    /// `(-360, 0]`
    Minus360To0,
    /// `[-180, 180)`
    #[default]
    Minus180To180,
}

impl LonConvention {
    /// Bring a longitude into this convention's range.
    pub fn normalize(&self, lon: f64) -> f64 {
        match self {
            LonConvention::ZeroTo360 => lon.rem_euclid(360.0),
            LonConvention::Minus360To0 => {
                let l = lon.rem_euclid(360.0);
                if l > 0.0 {
                    l - 360.0
                } else {
                    l
                }
            }
            LonConvention::Minus180To180 => (lon + 180.0).rem_euclid(360.0) - 180.0,
        }
    }
}

impl FromStr for LonConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-360" | "0/360" => Ok(LonConvention::ZeroTo360),
            "-360-0" | "-360/0" => Ok(LonConvention::Minus360To0),
            "-180-180" | "-180/180" => Ok(LonConvention::Minus180To180),
            other => Err(format!(
                "unknown longitude convention '{}' (expected 0-360, -360-0 or -180-180)",
                other
            )),
        }
    }
}

impl fmt::Display for LonConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LonConvention::ZeroTo360 => write!(f, "0-360"),
            LonConvention::Minus360To0 => write!(f, "-360-0"),
            LonConvention::Minus180To180 => write!(f, "-180-180"),
        }
    }
}

/// Container kind of the raw track files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKind {
    #[default]
    Ascii,
    Binary,
    NetCdf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_codes() {
        assert_eq!("c".parse::<Encoding>().unwrap(), Encoding::I8);
        assert_eq!("u".parse::<Encoding>().unwrap(), Encoding::U8);
        assert_eq!("h".parse::<Encoding>().unwrap(), Encoding::I16);
        assert_eq!("i".parse::<Encoding>().unwrap(), Encoding::I32);
        assert_eq!("l".parse::<Encoding>().unwrap(), Encoding::I64);
        assert_eq!("f".parse::<Encoding>().unwrap(), Encoding::F32);
        assert_eq!("d".parse::<Encoding>().unwrap(), Encoding::F64);
        assert_eq!("a".parse::<Encoding>().unwrap(), Encoding::AsciiToken);
    }

    #[test]
    fn test_encoding_fixed_column() {
        assert_eq!(
            "A:10:8".parse::<Encoding>().unwrap(),
            Encoding::AsciiFixed {
                start: 10,
                width: 8
            }
        );
        assert_eq!(
            Encoding::AsciiFixed { start: 3, width: 4 }.to_string(),
            "A:3:4"
        );
    }

    #[test]
    fn test_encoding_fixed_column_requires_start_and_width() {
        assert!("A".parse::<Encoding>().is_err());
        assert!("A:10".parse::<Encoding>().is_err());
        assert!("A:x:3".parse::<Encoding>().is_err());
        assert!("A:1:0".parse::<Encoding>().is_err());
        assert!("A:1:2:3".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_encoding_unknown_code() {
        let err = "q".parse::<Encoding>().unwrap_err();
        assert!(err.contains("unknown encoding code"));
    }

    #[test]
    fn test_byte_width() {
        assert_eq!(Encoding::U8.byte_width(), Some(1));
        assert_eq!(Encoding::I16.byte_width(), Some(2));
        assert_eq!(Encoding::F32.byte_width(), Some(4));
        assert_eq!(Encoding::F64.byte_width(), Some(8));
        assert_eq!(Encoding::AsciiToken.byte_width(), None);
        assert!(Encoding::AsciiFixed { start: 0, width: 1 }.is_ascii());
    }

    #[test]
    fn test_field_missing_and_apply() {
        let field = FieldSpec::new("depth", Encoding::I32)
            .with_scale(0.1, 5.0)
            .with_nan_proxy(-9999.0);
        assert!(field.is_missing(-9999.0));
        assert!(field.is_missing(f64::NAN));
        assert!(!field.is_missing(0.0));
        assert_eq!(field.apply(100.0), 15.0);
    }

    #[test]
    fn test_roles() {
        assert_eq!(ColumnRole::from_name("lon"), Some(ColumnRole::X));
        assert_eq!(ColumnRole::from_name("x"), Some(ColumnRole::X));
        assert_eq!(ColumnRole::from_name("lat"), Some(ColumnRole::Y));
        assert_eq!(ColumnRole::from_name("t"), Some(ColumnRole::Time));
        assert_eq!(ColumnRole::from_name("Lon"), None);
        assert_eq!(ColumnRole::from_name("depth"), None);
    }

    #[test]
    fn test_lon_normalize() {
        assert_eq!(LonConvention::ZeroTo360.normalize(-90.0), 270.0);
        assert_eq!(LonConvention::ZeroTo360.normalize(360.0), 0.0);
        assert_eq!(LonConvention::Minus180To180.normalize(270.0), -90.0);
        assert_eq!(LonConvention::Minus180To180.normalize(180.0), -180.0);
        assert_eq!(LonConvention::Minus180To180.normalize(-45.0), -45.0);
        assert_eq!(LonConvention::Minus360To0.normalize(90.0), -270.0);
        assert_eq!(LonConvention::Minus360To0.normalize(0.0), 0.0);
    }

    #[test]
    fn test_lon_convention_parse() {
        assert_eq!(
            "0-360".parse::<LonConvention>().unwrap(),
            LonConvention::ZeroTo360
        );
        assert_eq!(
            "-180/180".parse::<LonConvention>().unwrap(),
            LonConvention::Minus180To180
        );
        assert_eq!(
            "-360-0".parse::<LonConvention>().unwrap(),
            LonConvention::Minus360To0
        );
        assert!("1-2".parse::<LonConvention>().is_err());
    }
}
