//! Anchor locations pointing back into the host's source text.

use std::fmt;

pub use text_size::{TextRange, TextSize};

/// An opaque handle for a source file known to the host.
///
/// The engine never reads file contents. It only carries the handle so that
/// diagnostics can be mapped back by the host.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A range in one source file.
///
/// Ordering is by file, then by range start, then by range end. Diagnostics
/// are sorted with this ordering so that output is stable across runs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub file: FileId,
    pub range: TextRange,
}

impl Location {
    /// Create a location covering `range` in `file`.
    #[inline]
    pub const fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// Create a location from raw byte offsets.
    pub fn at(file: u32, start: u32, end: u32) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            file: FileId::new(file),
            range: TextRange::new(TextSize::from(start), TextSize::from(end)),
        }
    }

    /// Sort key used to order diagnostics.
    #[inline]
    pub fn sort_key(&self) -> (FileId, TextSize, TextSize) {
        (self.file, self.range.start(), self.range.end())
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{}..{}",
            self.file,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file#{}:{}",
            self.file.0,
            u32::from(self.range.start())
        )
    }
}
