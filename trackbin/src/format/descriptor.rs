//! The [`FormatDescriptor`] value object.

use std::collections::HashMap;

use super::error::FormatError;
use super::types::{ColumnRef, ColumnRole, FieldSpec, FileKind, LonConvention};

/// Width of the column presence bitmask.
pub const MAX_FIELDS: usize = 32;

/// Column layout of one data system (TAG).
///
/// Column names are resolved to indices once, when the descriptor is
/// built; masks and lookups afterwards work on integer indices only.
#[derive(Debug, Clone)]
pub struct FormatDescriptor {
    fields: Vec<FieldSpec>,
    lookup: HashMap<String, u8>,
    x_column: Option<usize>,
    y_column: Option<usize>,
    t_column: Option<usize>,
    geographic: bool,
    lon_convention: LonConvention,
    header_lines: usize,
    file_kind: FileKind,
    multi_segment: bool,
}

impl FormatDescriptor {
    /// Build a descriptor from a list of fields.
    ///
    /// Fails with [`FormatError::ConfigMalformed`] on duplicate names,
    /// duplicate reserved roles, or more than [`MAX_FIELDS`] fields.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, FormatError> {
        let mut descriptor = Self::empty();
        for field in fields {
            descriptor.push(field).map_err(FormatError::ConfigMalformed)?;
        }
        Ok(descriptor)
    }

    pub(super) fn empty() -> Self {
        Self {
            fields: Vec::new(),
            lookup: HashMap::new(),
            x_column: None,
            y_column: None,
            t_column: None,
            geographic: false,
            lon_convention: LonConvention::default(),
            header_lines: 0,
            file_kind: FileKind::default(),
            multi_segment: false,
        }
    }

    /// Append a field, enforcing the descriptor invariants.
    pub(super) fn push(&mut self, field: FieldSpec) -> Result<(), String> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(format!(
                "too many fields: at most {} columns fit the presence mask",
                MAX_FIELDS
            ));
        }
        if self.lookup.contains_key(&field.name) {
            return Err(format!("duplicate column name '{}'", field.name));
        }

        let index = self.fields.len();
        if let Some(role) = field.role() {
            let slot = match role {
                ColumnRole::X => &mut self.x_column,
                ColumnRole::Y => &mut self.y_column,
                ColumnRole::Time => &mut self.t_column,
            };
            if let Some(existing) = slot {
                return Err(format!(
                    "column '{}' claims the {} role already held by '{}'",
                    field.name, role, self.fields[*existing].name
                ));
            }
            *slot = Some(index);
        }

        self.lookup.insert(field.name.clone(), index as u8);
        self.fields.push(field);
        Ok(())
    }

    /// Mark the coordinates as geographic with the given longitude range.
    pub fn with_geographic(mut self, convention: LonConvention) -> Self {
        self.geographic = true;
        self.lon_convention = convention;
        self
    }

    pub(super) fn set_geographic(&mut self, geographic: bool) {
        self.geographic = geographic;
    }

    pub(super) fn set_lon_convention(&mut self, convention: LonConvention) {
        self.lon_convention = convention;
    }

    pub(super) fn set_header_lines(&mut self, lines: usize) {
        self.header_lines = lines;
    }

    pub(super) fn set_file_kind(&mut self, kind: FileKind) {
        self.file_kind = kind;
    }

    pub(super) fn set_multi_segment(&mut self, multi_segment: bool) {
        self.multi_segment = multi_segment;
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldSpec> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn x_column(&self) -> Option<usize> {
        self.x_column
    }

    pub fn y_column(&self) -> Option<usize> {
        self.y_column
    }

    pub fn t_column(&self) -> Option<usize> {
        self.t_column
    }

    pub fn is_geographic(&self) -> bool {
        self.geographic
    }

    pub fn longitude_convention(&self) -> LonConvention {
        self.lon_convention
    }

    /// Header lines to skip in ASCII track files.
    pub fn header_lines(&self) -> usize {
        self.header_lines
    }

    pub fn file_kind(&self) -> FileKind {
        self.file_kind
    }

    pub fn is_multi_segment(&self) -> bool {
        self.multi_segment
    }

    /// Bytes per binary record, or `None` if any column is ASCII.
    pub fn record_bytes(&self) -> Option<usize> {
        self.fields.iter().map(|f| f.encoding.byte_width()).sum()
    }

    /// Resolve a column name. Exact, case-sensitive match.
    pub fn resolve(&self, name: &str) -> ColumnRef {
        match self.lookup.get(name) {
            Some(&index) => ColumnRef::ColumnIndex(index),
            None => ColumnRef::Unrecognized,
        }
    }

    /// Index of a named column.
    pub fn index_of(&self, name: &str) -> Result<usize, FormatError> {
        match self.resolve(name) {
            ColumnRef::ColumnIndex(index) => Ok(index as usize),
            ColumnRef::Unrecognized => Err(FormatError::UnknownColumn(name.to_string())),
        }
    }

    /// Presence bit for a field index: `1 << index`.
    pub fn bit_for(&self, index: usize) -> Result<u32, FormatError> {
        if index >= MAX_FIELDS {
            return Err(FormatError::IndexOutOfRange(index));
        }
        Ok(1u32 << index)
    }

    /// OR of the presence bits of every named column.
    pub fn combined_mask<I, S>(&self, names: I) -> Result<u32, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(0u32, |mask, name| {
            let index = self.index_of(name.as_ref())?;
            Ok(mask | self.bit_for(index)?)
        })
    }

    /// Mask from a comma-separated column list such as `"lon,lat,depth"`.
    ///
    /// Blank entries are ignored, so an empty list yields 0.
    pub fn mask_from_list(&self, list: &str) -> Result<u32, FormatError> {
        self.combined_mask(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Names of the columns whose bits are set in `mask`, in column order.
    pub fn column_names(&self, mask: u32) -> Vec<&str> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1u32 << index) != 0)
            .map(|(_, field)| field.name.as_str())
            .collect()
    }

    /// Mask with a bit set for every column of this descriptor.
    pub fn full_mask(&self) -> u32 {
        match self.fields.len() {
            MAX_FIELDS => u32::MAX,
            n => (1u32 << n) - 1,
        }
    }
}
