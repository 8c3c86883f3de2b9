use std::ops::Range;

/// A contiguous run of row indices to be processed together.
#[derive(Hash, Debug, Clone, PartialEq, Eq, Copy)]
pub struct Partition {
    start: usize,
    end: usize
}

impl Partition {
    /// `end` is exclusive.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "Partition start must not be past its end.");
        Self { start, end }
    }

    pub fn start(&self) -> usize { self.start }
    pub fn end(&self) -> usize { self.end }

    /// Returns size of the partition.
    pub fn size(&self) -> usize { self.end - self.start }

    /// Creates a range to work with when processing data for the partition.
    pub fn range(&self) -> Range<usize> { self.start..self.end }
}
