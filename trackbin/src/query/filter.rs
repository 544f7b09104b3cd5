use crate::format::{FormatDescriptor, FormatError};

/// Column presence constraints as bit masks over descriptor columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnFilter {
    /// Columns a track must carry.
    pub must_have: u32,
    /// Columns that must be absent.
    pub must_lack: u32,
}

impl ColumnFilter {
    pub fn new(must_have: u32, must_lack: u32) -> Self {
        Self {
            must_have,
            must_lack,
        }
    }

    /// Build from comma-separated column names; an empty list means no
    /// constraint.
    pub fn from_lists(
        descriptor: &FormatDescriptor,
        must_have: &str,
        must_lack: &str,
    ) -> Result<Self, FormatError> {
        Ok(Self::new(
            descriptor.mask_from_list(must_have)?,
            descriptor.mask_from_list(must_lack)?,
        ))
    }

    /// All required columns are in `flags`.
    pub fn has_required(&self, flags: u32) -> bool {
        flags & self.must_have == self.must_have
    }

    /// Some forbidden column is in `flags`.
    pub fn has_forbidden(&self, flags: u32) -> bool {
        flags & self.must_lack != 0
    }

    /// Required columns present and forbidden ones absent.
    pub fn accepts(&self, flags: u32) -> bool {
        self.has_required(flags) && !self.has_forbidden(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> FormatDescriptor {
        FormatDescriptor::parse("lon d\nlat d\ndepth f\nmag f\n").unwrap()
    }

    #[test]
    fn test_from_lists() {
        let filter = ColumnFilter::from_lists(&descriptor(), "mag", "depth").unwrap();
        assert_eq!(filter, ColumnFilter::new(0b1000, 0b0100));

        let open = ColumnFilter::from_lists(&descriptor(), "", "").unwrap();
        assert_eq!(open, ColumnFilter::default());
        assert!(open.accepts(0));
    }

    #[test]
    fn test_unknown_column() {
        let err = ColumnFilter::from_lists(&descriptor(), "gravity", "").unwrap_err();
        assert!(matches!(err, FormatError::UnknownColumn(name) if name == "gravity"));
    }

    #[test]
    fn test_accepts() {
        let filter = ColumnFilter::new(0b1000, 0b0100);
        assert!(filter.accepts(0b1011));
        assert!(!filter.accepts(0b1111));
        assert!(!filter.accepts(0b0011));
    }
}
