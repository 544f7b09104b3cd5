//! Parser for format definition (`.def`) files.
//!
//! A definition is line based. Lines starting with `#` are either
//! directives (`#GEO`, `#LON`, `#SKIP`, `#ASCII`, `#BINARY`, `#NETCDF`,
//! `#MULTISEG`) or comments. Every other non-blank line declares a column:
//!
//! ```text
//! <name> <code> <nan-flag Y|N> <scale> <offset> <nan-proxy|-> [print-format]
//! ```
//!
//! Only `<name>` and `<code>` are required; the rest default to
//! `N 1 0 -`.

use super::descriptor::FormatDescriptor;
use super::error::FormatError;
use super::types::{Encoding, FieldSpec, FileKind, LonConvention};

/// Parse definition text into a descriptor.
pub fn parse_definition(text: &str) -> Result<FormatDescriptor, FormatError> {
    let mut descriptor = FormatDescriptor::empty();

    for (number, raw) in text.lines().enumerate() {
        let line_number = number + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let malformed = |reason: String| {
            FormatError::ConfigMalformed(format!("line {}: {}", line_number, reason))
        };

        if let Some(directive) = line.strip_prefix('#') {
            apply_directive(&mut descriptor, directive).map_err(malformed)?;
            continue;
        }

        let field = parse_field(line).map_err(malformed)?;
        descriptor.push(field).map_err(malformed)?;
    }

    if descriptor.is_empty() {
        return Err(FormatError::ConfigMalformed(
            "definition declares no columns".to_string(),
        ));
    }

    Ok(descriptor)
}

/// Apply a `#`-line. Unknown words are comments.
fn apply_directive(descriptor: &mut FormatDescriptor, directive: &str) -> Result<(), String> {
    let mut tokens = directive.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(());
    };

    match keyword {
        "GEO" => descriptor.set_geographic(true),
        "LON" => {
            let value = tokens
                .next()
                .ok_or_else(|| "#LON needs a convention".to_string())?;
            descriptor.set_lon_convention(value.parse::<LonConvention>()?);
        }
        "SKIP" => {
            let value = tokens
                .next()
                .ok_or_else(|| "#SKIP needs a line count".to_string())?;
            let lines = value
                .parse()
                .map_err(|_| format!("#SKIP count '{}' is not a number", value))?;
            descriptor.set_header_lines(lines);
        }
        "ASCII" => descriptor.set_file_kind(FileKind::Ascii),
        "BINARY" => descriptor.set_file_kind(FileKind::Binary),
        "NETCDF" => descriptor.set_file_kind(FileKind::NetCdf),
        "MULTISEG" => descriptor.set_multi_segment(true),
        _ => {}
    }
    Ok(())
}

fn parse_field(line: &str) -> Result<FieldSpec, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(format!("column '{}' has no encoding code", tokens[0]));
    }

    let name = tokens[0];
    let encoding: Encoding = tokens[1].parse()?;
    let mut field = FieldSpec::new(name, encoding);

    let has_proxy = match tokens.get(2).copied() {
        None | Some("N") | Some("n") => false,
        Some("Y") | Some("y") => true,
        Some(other) => return Err(format!("NaN flag '{}' must be Y or N", other)),
    };

    let number = |index: usize, what: &str, default: f64| -> Result<f64, String> {
        match tokens.get(index) {
            None => Ok(default),
            Some(token) => token
                .parse()
                .map_err(|_| format!("{} '{}' of column '{}' is not a number", what, token, name)),
        }
    };
    field.scale = number(3, "scale", 1.0)?;
    field.offset = number(4, "offset", 0.0)?;

    if has_proxy {
        match tokens.get(5) {
            Some(token) if *token != "-" => {
                field.nan_proxy = Some(number(5, "NaN proxy", f64::NAN)?);
            }
            _ => {
                return Err(format!(
                    "column '{}' sets the NaN flag but gives no proxy value",
                    name
                ))
            }
        }
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MGD77_LIKE: &str = "\
# Minimal marine geophysics layout
#GEO
#LON 0-360
#SKIP 1
#ASCII
lon   d N 1 0 -     %10.5f
lat   d N 1 0 -     %9.5f
time  d N 1 0 -     %.1f
depth f Y 1 0 -9999 %7.1f
mag   i Y 0.1 0 99999 %6.1f
";

    #[test]
    fn test_parse_full_definition() {
        let d = parse_definition(MGD77_LIKE).unwrap();
        assert_eq!(d.len(), 5);
        assert!(d.is_geographic());
        assert_eq!(d.longitude_convention(), LonConvention::ZeroTo360);
        assert_eq!(d.header_lines(), 1);
        assert_eq!(d.file_kind(), FileKind::Ascii);
        assert_eq!(d.x_column(), Some(0));
        assert_eq!(d.y_column(), Some(1));
        assert_eq!(d.t_column(), Some(2));

        let depth = d.field(3).unwrap();
        assert_eq!(depth.encoding, Encoding::F32);
        assert_eq!(depth.nan_proxy, Some(-9999.0));

        let mag = d.field(4).unwrap();
        assert_eq!(mag.scale, 0.1);
        assert_eq!(mag.nan_proxy, Some(99999.0));
    }

    #[test]
    fn test_minimal_columns_use_defaults() {
        let d = parse_definition("x d\ny d\nz f\n").unwrap();
        let z = d.field(2).unwrap();
        assert_eq!(z.scale, 1.0);
        assert_eq!(z.offset, 0.0);
        assert_eq!(z.nan_proxy, None);
        assert!(!d.is_geographic());
    }

    #[test]
    fn test_binary_directive() {
        let d = parse_definition("#BINARY\nlon d\nlat d\n").unwrap();
        assert_eq!(d.file_kind(), FileKind::Binary);
        assert_eq!(d.record_bytes(), Some(16));
    }

    #[test]
    fn test_fixed_column() {
        let d = parse_definition("lon A:0:10\nlat A:10:9\n").unwrap();
        assert_eq!(
            d.field(1).unwrap().encoding,
            Encoding::AsciiFixed {
                start: 10,
                width: 9
            }
        );
    }

    #[test]
    fn test_unknown_code_is_malformed() {
        let err = parse_definition("lon d\nlat z\n").unwrap_err();
        match err {
            FormatError::ConfigMalformed(msg) => {
                assert!(msg.contains("line 2"), "message was: {}", msg);
                assert!(msg.contains("unknown encoding code"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fixed_column_without_width_is_malformed() {
        assert!(matches!(
            parse_definition("lon A:3\n"),
            Err(FormatError::ConfigMalformed(_))
        ));
    }

    #[test]
    fn test_duplicate_role_is_malformed() {
        let err = parse_definition("lon d\nlat d\nx d\n").unwrap_err();
        match err {
            FormatError::ConfigMalformed(msg) => assert!(msg.contains("line 3")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_nan_flag_without_proxy_is_malformed() {
        assert!(parse_definition("depth f Y 1 0 -\n").is_err());
        assert!(parse_definition("depth f Y\n").is_err());
    }

    #[test]
    fn test_bad_numbers_are_malformed() {
        assert!(parse_definition("depth f N one 0 -\n").is_err());
        assert!(parse_definition("depth f Q 1 0 -\n").is_err());
        assert!(parse_definition("#SKIP many\nlon d\n").is_err());
        assert!(parse_definition("#LON east\nlon d\n").is_err());
    }

    #[test]
    fn test_comments_ignored() {
        let d = parse_definition("# a comment\n#\n#note free text\nlon d\n").unwrap();
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_empty_definition_is_malformed() {
        assert!(matches!(
            parse_definition("#GEO\n"),
            Err(FormatError::ConfigMalformed(_))
        ));
    }
}
