//! INI parsing logic for converting `Ini` → `TagConfig`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigError;
use super::settings::TagConfig;
use crate::database::Endianness;
use crate::grid::Region;

/// Parse an `Ini` object into a `TagConfig` for `tag`.
///
/// `[tag] format` is required; everything else overlays the defaults of
/// [`TagConfig::new`].
pub(super) fn parse_ini(tag: &str, ini: &Ini) -> Result<TagConfig, ConfigError> {
    let format = ini
        .section(Some("tag"))
        .and_then(|s| s.get("format"))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingValue {
            section: "tag".to_string(),
            key: "format".to_string(),
        })?;

    let mut config = TagConfig::new(tag, format);

    // [tag] section
    if let Some(section) = ini.section(Some("tag")) {
        if let Some(v) = section.get("suffix") {
            let v = v.trim().trim_start_matches('.');
            if !v.is_empty() {
                config.suffix = Some(v.to_string());
            }
        }
    }

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = section.get("region") {
            config.region = v.parse::<Region>().map_err(|e| ConfigError::InvalidValue {
                section: "grid".to_string(),
                key: "region".to_string(),
                value: v.to_string(),
                reason: e.to_string(),
            })?;
        }
        if let Some(v) = section.get("inc") {
            config.increment = parse_increment(v).ok_or_else(|| ConfigError::InvalidValue {
                section: "grid".to_string(),
                key: "inc".to_string(),
                value: v.to_string(),
                reason: "expected a positive size like '1' or '0.5/0.25'".to_string(),
            })?;
        }
    }

    // [index] section
    if let Some(section) = ini.section(Some("index")) {
        if let Some(v) = section.get("byte_order") {
            config.byte_order =
                v.parse::<Endianness>()
                    .map_err(|_| ConfigError::InvalidValue {
                        section: "index".to_string(),
                        key: "byte_order".to_string(),
                        value: v.to_string(),
                        reason: "must be one of: native, little, big".to_string(),
                    })?;
        }
    }

    // [paths] section
    if let Some(section) = ini.section(Some("paths")) {
        if let Some(v) = section.get("data") {
            config.data_paths = v
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(expand_tilde)
                .collect();
        }
    }

    Ok(config)
}

/// Parse `d` or `dx/dy` into a positive increment pair.
pub fn parse_increment(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.trim().split('/');
    let dx: f64 = parts.next()?.trim().parse().ok()?;
    let dy: f64 = match parts.next() {
        Some(p) => p.trim().parse().ok()?,
        None => dx,
    };
    if parts.next().is_some() || !(dx > 0.0 && dy > 0.0) {
        return None;
    }
    Some((dx, dy))
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<TagConfig, ConfigError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini("TEST", &ini)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse("[tag]\nformat = geo\n").unwrap();
        assert_eq!(config.tag, "TEST");
        assert_eq!(config.format, "geo");
        assert_eq!(config.region, Region::global());
        assert_eq!(config.increment, (1.0, 1.0));
        assert_eq!(config.byte_order, Endianness::native());
        assert!(config.suffix.is_none());
        assert!(config.data_paths.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            "[tag]\nformat = mgd77\nsuffix = .m77t\n\
             [grid]\nregion = -180/180/-80/80\ninc = 0.5/0.25\n\
             [index]\nbyte_order = big\n\
             [paths]\ndata = /data/a, /data/b\n",
        )
        .unwrap();
        assert_eq!(config.suffix.as_deref(), Some("m77t"));
        assert_eq!(config.region, Region::new(-180.0, 180.0, -80.0, 80.0).unwrap());
        assert_eq!(config.increment, (0.5, 0.25));
        assert_eq!(config.byte_order, Endianness::Big);
        assert_eq!(
            config.data_paths,
            vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")]
        );
    }

    #[test]
    fn test_single_increment_applies_to_both_axes() {
        let config = parse("[tag]\nformat = geo\n[grid]\ninc = 2\n").unwrap();
        assert_eq!(config.increment, (2.0, 2.0));
    }

    #[test]
    fn test_missing_format() {
        let err = parse("[grid]\ninc = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { .. }));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            parse("[tag]\nformat = g\n[grid]\ninc = 0\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse("[tag]\nformat = g\n[grid]\ninc = 1/2/3\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse("[tag]\nformat = g\n[grid]\nregion = 10/0/0/1\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse("[tag]\nformat = g\n[index]\nbyte_order = middle\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_increment() {
        assert_eq!(parse_increment("0.5"), Some((0.5, 0.5)));
        assert_eq!(parse_increment(" 2 / 1 "), Some((2.0, 1.0)));
        assert_eq!(parse_increment("-1"), None);
        assert_eq!(parse_increment("a/b"), None);
    }

    #[test]
    fn test_expand_tilde_plain_path() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
