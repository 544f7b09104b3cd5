//! Track registry: dense ids, unique names and global presence flags.
//!
//! On disk the registry is a text file with a `# <TAG>` header followed by
//! one `name<TAB>id<TAB>flags` line per track, ids ascending from 0.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use super::error::DatabaseError;

/// One registered track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub id: u32,
    pub name: String,
    /// Columns that hold data anywhere in the track.
    pub global_flags: u32,
}

/// Append-only list of tracks with a name lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRegistry {
    tracks: Vec<TrackRecord>,
    by_name: HashMap<String, u32>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Register `name`, returning its id. Re-registering returns the
    /// existing id without growing the registry.
    pub fn register(&mut self, name: &str) -> Result<u32, DatabaseError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        validate_name(name)?;

        let id = self.tracks.len() as u32;
        self.tracks.push(TrackRecord {
            id,
            name: name.to_string(),
            global_flags: 0,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// OR `mask` into the global flags of track `id`.
    pub fn set_global_flags(&mut self, id: u32, mask: u32) -> Result<(), DatabaseError> {
        let record = self
            .tracks
            .get_mut(id as usize)
            .ok_or(DatabaseError::UnknownTrack(id))?;
        record.global_flags |= mask;
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&TrackRecord> {
        self.tracks.get(id as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRecord> {
        self.tracks.iter()
    }

    /// Write the registry text, headed by `# <tag>`.
    pub fn write_to<W: Write>(&self, writer: &mut W, tag: &str) -> Result<(), DatabaseError> {
        writeln!(writer, "# {}", tag)?;
        for record in &self.tracks {
            writeln!(
                writer,
                "{}\t{}\t{}",
                record.name, record.id, record.global_flags
            )?;
        }
        Ok(())
    }

    /// Read registry text.
    ///
    /// Returns the registry and the TAG named by the header, if any. Ids
    /// must run densely from 0 in file order.
    pub fn read_from<R: BufRead>(reader: R) -> Result<(Self, Option<String>), DatabaseError> {
        let mut registry = Self::new();
        let mut header_tag = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                if line_no == 0 {
                    header_tag = Some(comment.trim().to_string());
                }
                continue;
            }

            let (name, id, flags) = split_record(trimmed).ok_or_else(|| {
                DatabaseError::corrupt(format!("registry line {}: malformed record", line_no + 1))
            })?;

            let expected = registry.len() as u32;
            if id != expected {
                return Err(DatabaseError::corrupt(format!(
                    "registry line {}: track id {} where {} was expected",
                    line_no + 1,
                    id,
                    expected
                )));
            }
            if registry.by_name.contains_key(name) {
                return Err(DatabaseError::corrupt(format!(
                    "registry line {}: duplicate track name '{}'",
                    line_no + 1,
                    name
                )));
            }

            registry.register(name)?;
            registry.set_global_flags(id, flags)?;
        }

        Ok((registry, header_tag))
    }
}

/// Split `name id flags` from the right so names may contain spaces.
fn split_record(line: &str) -> Option<(&str, u32, u32)> {
    let (rest, flags) = line.rsplit_once(char::is_whitespace)?;
    let (name, id) = rest.trim_end().rsplit_once(char::is_whitespace)?;
    let name = name.trim_end();
    if name.is_empty() {
        return None;
    }
    Some((name, id.trim().parse().ok()?, flags.trim().parse().ok()?))
}

fn validate_name(name: &str) -> Result<(), DatabaseError> {
    if name.trim().is_empty()
        || name != name.trim()
        || name.contains(['\t', '\n', '\r'])
        || name.starts_with('#')
    {
        return Err(DatabaseError::InvalidTrackName(name.to_string()));
    }
    Ok(())
}
