use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A `(location, length)` pair over char indices of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub const fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub const fn cursor(location: usize) -> Self {
        Self {
            location,
            length: 0,
        }
    }

    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            location: start,
            length: end.saturating_sub(start),
        }
    }

    pub const fn end(&self) -> usize {
        self.location.saturating_add(self.length)
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.location && index < self.end()
    }

    pub fn to_range(self) -> Range<usize> {
        self.location..self.end()
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}

/// Clamps `requested` to a buffer of `len` chars.
///
/// Attribute lookups are only valid for an existing char, so with
/// `is_attribute_operation` the location never reaches `len` (unless the
/// buffer is empty). Clamping is total: stale ranges coming from the UI are
/// expected and never reported as errors.
pub fn safe_range(requested: TextRange, len: usize, is_attribute_operation: bool) -> TextRange {
    let max_location = if is_attribute_operation {
        len.saturating_sub(1)
    } else {
        len
    };
    let location = requested.location.min(max_location);
    let length = requested.length.min(len - location);
    TextRange { location, length }
}
