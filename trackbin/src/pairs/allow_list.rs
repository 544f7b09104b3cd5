//! Allow-lists: the track names a pairing run is restricted to.

use std::path::Path;

use super::PairError;

/// Track names read from an allow-list file.
///
/// One name per line; blank lines and `#` lines are ignored and a trailing
/// file extension is dropped, so `leg01.m77t` matches track `leg01`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: Vec<String>,
}

impl AllowList {
    pub fn parse(text: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let name = strip_extension(line).to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }

    pub fn load(path: &Path) -> Result<Self, PairError> {
        let text = std::fs::read_to_string(path).map_err(|source| PairError::AllowListRead {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&text);
        tracing::debug!(path = %path.display(), names = list.len(), "Loaded allow-list");
        Ok(list)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in iter {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let list = AllowList::parse("# cruise list\n\nleg01.m77t\n  leg02  \n#leg03\nleg04\n");
        assert_eq!(list.names(), &["leg01", "leg02", "leg04"]);
    }

    #[test]
    fn test_parse_strips_only_last_extension() {
        let list = AllowList::parse("a.b.nc\n.hidden\nplain\n");
        assert_eq!(list.names(), &["a.b", ".hidden", "plain"]);
    }

    #[test]
    fn test_parse_deduplicates() {
        let list = AllowList::parse("x.a\nx.b\nx\n");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        assert!(AllowList::parse("\n# nothing\n").is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = AllowList::load(&temp_dir.path().join("none.lst")).unwrap_err();
        assert!(matches!(err, PairError::AllowListRead { .. }));
    }

    #[test]
    fn test_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracks.lst");
        std::fs::write(&path, "one.xyz\ntwo\n").unwrap();
        assert_eq!(AllowList::load(&path).unwrap().names(), &["one", "two"]);
    }
}
