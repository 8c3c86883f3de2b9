use thiserror::Error;

/// Broad category an error falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Footprint larger than the input, empty or jagged tensors, rank or channel disagreements.
    ShapeMismatch,
    /// Matrix multiply with incompatible inner dimensions.
    DimensionIncompatibility,
    /// Col2im could not split a row evenly into output rows.
    DivisionInexactness,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvError {
    #[error("jagged input: axis {axis} expected length {expected}, found {found}")]
    Jagged { axis: usize, expected: usize, found: usize },

    #[error("expected {expected} values to fill shape, found {found}")]
    ValueCount { expected: usize, found: usize },

    #[error("expected tensor of rank {expected}, found rank {found}")]
    RankMismatch { expected: &'static str, found: usize },

    #[error("input extent, footprint, channel axis and filter bank must all be non-empty")]
    EmptyExtent,

    #[error("footprint {footprint:?} exceeds input extent {extent:?}")]
    FootprintExceedsExtent { footprint: (usize, usize), extent: (usize, usize) },

    #[error("input has {input} channels but kernel bank has {kernel}")]
    ChannelMismatch { input: usize, kernel: usize },

    #[error("cannot multiply {lhs:?} by {rhs:?}: inner dimensions differ")]
    DimensionMismatch { lhs: (usize, usize), rhs: (usize, usize) },

    #[error("right hand side of matrix multiply is empty")]
    EmptyOperand,

    #[error("{columns} columns cannot be split evenly into {rows} output rows")]
    InexactDivision { columns: usize, rows: usize },

    #[error("output width {found} does not match the {expected} valid window columns")]
    OutputWidthMismatch { expected: usize, found: usize },
}

impl ConvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvError::DimensionMismatch { .. } | ConvError::EmptyOperand => ErrorKind::DimensionIncompatibility,
            ConvError::InexactDivision { .. } => ErrorKind::DivisionInexactness,
            _ => ErrorKind::ShapeMismatch,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvError>;
