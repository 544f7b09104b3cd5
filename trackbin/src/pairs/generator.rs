//! Candidate-pair scan over the bin index.

use std::fmt;

use rayon::prelude::*;
use roaring::RoaringBitmap;
use tracing::{info, warn};

use super::allow_list::AllowList;
use crate::database::{BinTrack, TrackDatabase};

/// Which pairs an allow-list admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairMode {
    /// At least one endpoint must be on the allow-list.
    #[default]
    ExternalOnly,
    /// The allow-list does not restrict pairs.
    IncludeInternal,
}

/// Two tracks sharing at least one bin, names in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    pub first: String,
    pub second: String,
}

impl fmt::Display for CandidatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.first, self.second)
    }
}

/// Per-track bitsets of pair partners.
///
/// Row `a` holds bit `b` for every recorded pair with `a < b`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairMatrix {
    rows: Vec<RoaringBitmap>,
}

impl PairMatrix {
    pub fn new(track_count: usize) -> Self {
        Self {
            rows: vec![RoaringBitmap::new(); track_count],
        }
    }

    /// Record `(a, b)`. Self pairs are ignored.
    pub fn insert(&mut self, a: u32, b: u32) {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        if low == high {
            return;
        }
        if let Some(row) = self.rows.get_mut(low as usize) {
            row.insert(high);
        }
    }

    pub fn contains(&self, a: u32, b: u32) -> bool {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.rows
            .get(low as usize)
            .is_some_and(|row| row.contains(high))
    }

    /// OR another matrix into this one.
    pub fn merge(&mut self, other: PairMatrix) {
        if self.rows.len() < other.rows.len() {
            self.rows.resize(other.rows.len(), RoaringBitmap::new());
        }
        for (row, other_row) in self.rows.iter_mut().zip(other.rows) {
            *row |= other_row;
        }
    }

    pub fn len(&self) -> u64 {
        self.rows.iter().map(RoaringBitmap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(RoaringBitmap::is_empty)
    }

    /// Pairs ordered by (smaller id, larger id).
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(low, row)| row.iter().map(move |high| (low as u32, high)))
    }
}

/// Finds every pair of tracks that share a bin.
///
/// # Example
///
/// ```
/// use trackbin::database::TrackDatabase;
/// use trackbin::pairs::PairGenerator;
///
/// let mut db = TrackDatabase::new("DEMO");
/// let a = db.register_track("a").unwrap();
/// let b = db.register_track("b").unwrap();
/// db.add_to_bin(0, a, 1).unwrap();
/// db.add_to_bin(0, b, 1).unwrap();
///
/// let pairs = PairGenerator::new(&db).generate();
/// assert_eq!(pairs[0].to_string(), "a\tb");
/// ```
pub struct PairGenerator<'a> {
    db: &'a TrackDatabase,
    mode: PairMode,
    listed: Option<Vec<bool>>,
    missing: Vec<String>,
}

impl<'a> PairGenerator<'a> {
    pub fn new(db: &'a TrackDatabase) -> Self {
        Self {
            db,
            mode: PairMode::default(),
            listed: None,
            missing: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: PairMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restrict pairs to an allow-list.
    ///
    /// Names not in the database are warned about and skipped. A list with
    /// no known names leaves every track eligible.
    pub fn with_allow_list(mut self, list: &AllowList) -> Self {
        let mut listed = vec![false; self.db.track_count()];
        let mut resolved = 0usize;
        self.missing.clear();

        for name in list.names() {
            match self.db.track_id(name) {
                Some(id) => {
                    listed[id as usize] = true;
                    resolved += 1;
                }
                None => {
                    warn!(track = %name, tag = %self.db.tag(), "Allow-list track not found, skipping");
                    self.missing.push(name.clone());
                }
            }
        }

        if resolved == 0 {
            warn!(
                names = list.len(),
                "Allow-list matches no tracks; pairing all tracks"
            );
            self.listed = None;
        } else {
            self.listed = Some(listed);
        }
        self
    }

    /// Allow-list names that are not in the database.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    fn eligible(&self, a: u32, b: u32) -> bool {
        match (&self.listed, self.mode) {
            (None, _) | (_, PairMode::IncludeInternal) => true,
            (Some(listed), PairMode::ExternalOnly) => listed[a as usize] || listed[b as usize],
        }
    }

    fn scan_bin(&self, tracks: &[BinTrack], matrix: &mut PairMatrix) {
        for (i, first) in tracks.iter().enumerate() {
            for second in &tracks[i + 1..] {
                let (a, b) = (first.track_id, second.track_id);
                if a != b && self.eligible(a, b) {
                    matrix.insert(a, b);
                }
            }
        }
    }

    /// Scan all occupied bins on the current thread.
    pub fn matrix(&self) -> PairMatrix {
        let mut matrix = PairMatrix::new(self.db.track_count());
        for (_, tracks) in self.db.index().iter() {
            self.scan_bin(tracks, &mut matrix);
        }
        matrix
    }

    /// Scan bins across the rayon pool, merging per-worker matrices.
    pub fn matrix_parallel(&self) -> PairMatrix {
        let track_count = self.db.track_count();
        let bins: Vec<&[BinTrack]> = self.db.index().iter().map(|(_, tracks)| tracks).collect();

        bins.par_iter()
            .fold(
                || PairMatrix::new(track_count),
                |mut matrix, tracks| {
                    self.scan_bin(tracks, &mut matrix);
                    matrix
                },
            )
            .reduce(
                || PairMatrix::new(track_count),
                |mut left, right| {
                    left.merge(right);
                    left
                },
            )
    }

    pub fn generate(&self) -> Vec<CandidatePair> {
        self.emit(&self.matrix())
    }

    /// Same output as [`PairGenerator::generate`], scanned in parallel.
    pub fn generate_parallel(&self) -> Vec<CandidatePair> {
        self.emit(&self.matrix_parallel())
    }

    fn emit(&self, matrix: &PairMatrix) -> Vec<CandidatePair> {
        let pairs: Vec<CandidatePair> = matrix
            .iter()
            .filter_map(|(a, b)| {
                let a = &self.db.track(a)?.name;
                let b = &self.db.track(b)?.name;
                let (first, second) = if a <= b { (a, b) } else { (b, a) };
                Some(CandidatePair {
                    first: first.clone(),
                    second: second.clone(),
                })
            })
            .collect();

        info!(
            tag = %self.db.tag(),
            bins = self.db.index().occupied_count(),
            tracks = self.db.track_count(),
            pairs = pairs.len(),
            mode = ?self.mode,
            restricted = self.listed.is_some(),
            "Generated candidate pairs"
        );
        pairs
    }
}
