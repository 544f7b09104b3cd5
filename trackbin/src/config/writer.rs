//! INI serialization logic for converting `TagConfig` → INI string.

use std::path::Path;

use super::settings::TagConfig;

/// Convert a `TagConfig` to a commented INI string for saving.
pub(super) fn to_tag_string(config: &TagConfig) -> String {
    let suffix = config.suffix.as_deref().unwrap_or("");
    let data_paths = config
        .data_paths
        .iter()
        .map(|p| path_to_string(p))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"; trackbin TAG configuration for {tag}

[tag]
; Name of the format definition (<name>.def in the TAG directory or home)
format = {format}
; Track file extension, without the dot
suffix = {suffix}

[grid]
; Bin grid domain as west/east/south/north
region = {region}
; Bin size as dx/dy (or a single value for square bins)
inc = {dx}/{dy}

[index]
; Byte order of the bin index file: native, little, big
byte_order = {byte_order}

[paths]
; Comma-separated directories searched for track files
data = {data_paths}
"#,
        tag = config.tag,
        format = config.format,
        suffix = suffix,
        region = config.region,
        dx = config.increment.0,
        dy = config.increment.1,
        byte_order = config.byte_order,
        data_paths = data_paths,
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
