//! Sparse inverted index: bin → tracks crossing it, with local flags.

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read, Write};

use super::codec::{Endianness, WORD_BYTES};
use super::error::DatabaseError;

/// One track's presence in a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinTrack {
    pub track_id: u32,
    /// Columns that hold data in this track within this bin.
    pub local_flags: u32,
}

/// Occupied bins only. Tracks within a bin keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinIndex {
    bins: BTreeMap<u32, Vec<BinTrack>>,
}

impl BinIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `track_id` in `bin`, OR-ing flags into an existing entry.
    pub fn add(&mut self, bin: u32, track_id: u32, local_flags: u32) {
        let tracks = self.bins.entry(bin).or_default();
        match tracks.iter_mut().find(|t| t.track_id == track_id) {
            Some(existing) => existing.local_flags |= local_flags,
            None => tracks.push(BinTrack {
                track_id,
                local_flags,
            }),
        }
    }

    /// Append a batch of tracks to `bin` in one pass, OR-merging ids that
    /// are already present or repeated within the batch.
    fn extend_bin(&mut self, bin: u32, batch: Vec<BinTrack>) {
        let tracks = self.bins.entry(bin).or_default();
        let mut position: HashMap<u32, usize> = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.track_id, i))
            .collect();

        for entry in batch {
            match position.get(&entry.track_id) {
                Some(&i) => tracks[i].local_flags |= entry.local_flags,
                None => {
                    position.insert(entry.track_id, tracks.len());
                    tracks.push(entry);
                }
            }
        }
    }

    /// Tracks in `bin`; empty for unoccupied bins.
    pub fn tracks_in_bin(&self, bin: u32) -> &[BinTrack] {
        self.bins.get(&bin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occupied bins in ascending order.
    pub fn occupied_bins(&self) -> impl Iterator<Item = u32> + '_ {
        self.bins.keys().copied()
    }

    /// Occupied bins with their tracks, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[BinTrack])> {
        self.bins.iter().map(|(bin, tracks)| (*bin, tracks.as_slice()))
    }

    pub fn occupied_count(&self) -> usize {
        self.bins.len()
    }

    /// Total (bin, track) entries.
    pub fn entry_count(&self) -> usize {
        self.bins.values().map(Vec::len).sum()
    }

    pub fn max_bin(&self) -> Option<u32> {
        self.bins.keys().next_back().copied()
    }

    /// Write `[bin][count]` + `count × [id][flags]` records in ascending bin
    /// order.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        order: Endianness,
    ) -> Result<(), DatabaseError> {
        for (&bin, tracks) in &self.bins {
            order.write_i32(writer, to_word(bin, "bin index")?)?;
            order.write_i32(writer, to_word(tracks.len() as u32, "track count")?)?;
            for t in tracks {
                order.write_i32(writer, to_word(t.track_id, "track id")?)?;
                // Flags are a bit pattern; keep all 32 bits.
                order.write_i32(writer, t.local_flags as i32)?;
            }
        }
        Ok(())
    }

    /// Read an index written by [`BinIndex::write_to`].
    ///
    /// `track_count` is the registry size; any id at or beyond it makes the
    /// file [`DatabaseError::CorruptIndex`].
    pub fn read_from<R: Read>(
        mut reader: R,
        order: Endianness,
        track_count: usize,
    ) -> Result<Self, DatabaseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        if bytes.len() % WORD_BYTES != 0 {
            return Err(DatabaseError::corrupt(format!(
                "bin index length {} is not a multiple of {}",
                bytes.len(),
                WORD_BYTES
            )));
        }

        let total = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut index = Self::new();

        while cursor.position() < total {
            let offset = cursor.position();
            if total - offset < 2 * WORD_BYTES as u64 {
                return Err(DatabaseError::corrupt(format!(
                    "truncated bin header at byte {}",
                    offset
                )));
            }

            let bin = order.read_i32(&mut cursor)?;
            let count = order.read_i32(&mut cursor)?;
            if bin < 0 || count < 0 {
                return Err(DatabaseError::corrupt(format!(
                    "negative bin {} or track count {} at byte {}",
                    bin, count, offset
                )));
            }

            let needed = count as u64 * 2 * WORD_BYTES as u64;
            if total - cursor.position() < needed {
                return Err(DatabaseError::corrupt(format!(
                    "bin {} lists {} tracks but the file ends early",
                    bin, count
                )));
            }

            let mut batch = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let id = order.read_i32(&mut cursor)?;
                let flags = order.read_i32(&mut cursor)? as u32;
                if id < 0 || id as usize >= track_count {
                    return Err(DatabaseError::corrupt(format!(
                        "bin {} references track id {} but the registry has {} tracks",
                        bin, id, track_count
                    )));
                }
                batch.push(BinTrack {
                    track_id: id as u32,
                    local_flags: flags,
                });
            }
            index.extend_bin(bin as u32, batch);
        }

        Ok(index)
    }
}

fn to_word(value: u32, what: &str) -> Result<i32, DatabaseError> {
    i32::try_from(value)
        .map_err(|_| DatabaseError::corrupt(format!("{} {} exceeds the file format", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(order: Endianness, values: &[i32]) -> Vec<u8> {
        let mut buf = Vec::new();
        for v in values {
            order.write_i32(&mut buf, *v).unwrap();
        }
        buf
    }

    #[test]
    fn test_add_merges_duplicates_and_keeps_order() {
        let mut index = BinIndex::new();
        index.add(3, 2, 0b01);
        index.add(3, 0, 0b10);
        index.add(3, 2, 0b100);

        let tracks = index.tracks_in_bin(3);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0], BinTrack { track_id: 2, local_flags: 0b101 });
        assert_eq!(tracks[1].track_id, 0);
        assert_eq!(index.entry_count(), 2);
    }

    #[test]
    fn test_unoccupied_bin_is_empty() {
        let index = BinIndex::new();
        assert!(index.tracks_in_bin(42).is_empty());
        assert_eq!(index.occupied_count(), 0);
        assert_eq!(index.max_bin(), None);
    }

    #[test]
    fn test_written_in_ascending_bin_order() {
        let mut index = BinIndex::new();
        index.add(9, 0, 1);
        index.add(2, 1, 3);

        let mut buf = Vec::new();
        index.write_to(&mut buf, Endianness::Little).unwrap();
        assert_eq!(buf, words(Endianness::Little, &[2, 1, 1, 3, 9, 1, 0, 1]));
    }

    #[test]
    fn test_roundtrip_both_orders() {
        let mut index = BinIndex::new();
        index.add(0, 1, 0xFFFF_FFFF);
        index.add(0, 0, 5);
        index.add(17, 1, 2);

        for order in [Endianness::Little, Endianness::Big] {
            let mut buf = Vec::new();
            index.write_to(&mut buf, order).unwrap();
            let loaded = BinIndex::read_from(buf.as_slice(), order, 2).unwrap();
            assert_eq!(loaded, index);
        }
    }

    #[test]
    fn test_unknown_track_id_is_corrupt() {
        let buf = words(Endianness::Little, &[0, 1, 7, 1]);
        let err = BinIndex::read_from(buf.as_slice(), Endianness::Little, 5).unwrap_err();
        assert!(matches!(err, DatabaseError::CorruptIndex(_)));
    }

    #[test]
    fn test_negative_values_are_corrupt() {
        for values in [[-1, 1, 0, 1], [0, -1, 0, 1], [0, 1, -3, 1]] {
            let buf = words(Endianness::Little, &values);
            let err = BinIndex::read_from(buf.as_slice(), Endianness::Little, 5).unwrap_err();
            assert!(matches!(err, DatabaseError::CorruptIndex(_)));
        }
    }

    #[test]
    fn test_truncated_files_are_corrupt() {
        // Trailing partial word
        let mut buf = words(Endianness::Little, &[0, 1, 0, 1]);
        buf.push(0);
        assert!(BinIndex::read_from(buf.as_slice(), Endianness::Little, 1).is_err());

        // Count promises more tracks than present
        let buf = words(Endianness::Little, &[0, 2, 0, 1]);
        assert!(BinIndex::read_from(buf.as_slice(), Endianness::Little, 1).is_err());

        // Header cut in half
        let buf = words(Endianness::Little, &[0, 1, 0, 1, 4]);
        assert!(BinIndex::read_from(buf.as_slice(), Endianness::Little, 1).is_err());
    }

    #[test]
    fn test_read_merges_repeated_entries() {
        // Track 1 twice within one record, bin 4 split over two records
        let buf = words(
            Endianness::Big,
            &[4, 3, 1, 0b001, 0, 0b010, 1, 0b100, 4, 2, 2, 0b1, 0, 0b1000],
        );
        let index = BinIndex::read_from(buf.as_slice(), Endianness::Big, 3).unwrap();

        assert_eq!(
            index.tracks_in_bin(4),
            &[
                BinTrack { track_id: 1, local_flags: 0b101 },
                BinTrack { track_id: 0, local_flags: 0b1010 },
                BinTrack { track_id: 2, local_flags: 0b1 },
            ]
        );
        assert_eq!(index.entry_count(), 3);
    }

    #[test]
    fn test_read_large_bin() {
        let count = 20_000;
        let mut values = vec![7, count];
        for id in 0..count {
            values.extend([id, 1]);
        }
        let buf = words(Endianness::Little, &values);
        let index = BinIndex::read_from(buf.as_slice(), Endianness::Little, count as usize).unwrap();
        assert_eq!(index.tracks_in_bin(7).len(), count as usize);
        assert_eq!(index.tracks_in_bin(7)[19_999].track_id, 19_999);
    }

    #[test]
    fn test_empty_file_is_empty_index() {
        let index = BinIndex::read_from(std::io::empty(), Endianness::Big, 0).unwrap();
        assert_eq!(index.occupied_count(), 0);
    }
}
