use std::env;

use tracing::warn;

/// Environment variable read by [`ConvConfig::from_env`].
pub const PARALLELISM_VAR: &str = "IM2COL_PARALLELISM";

/// Settings shared by the convolution layer and matrix multiply.
/// Every setting produces identical results, only the amount of threading changes.
/// Single-threaded unless threading is asked for explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvConfig {
    /// Number of partitions the rows of a matrix product are split into.
    pub parallelism: usize,
}

impl Default for ConvConfig {
    fn default() -> Self { Self::single_threaded() }
}

impl ConvConfig {
    pub fn single_threaded() -> Self { Self { parallelism: 1 } }

    pub fn with_parallelism(parallelism: usize) -> Self {
        Self { parallelism: parallelism.max(1) }
    }

    /// Reads `IM2COL_PARALLELISM`, falling back to the default when unset or invalid.
    pub fn from_env() -> Self {
        match env::var(PARALLELISM_VAR) {
            Ok(raw) => Self::parse_parallelism(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "{PARALLELISM_VAR} must be a positive integer, using default");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    fn parse_parallelism(raw: &str) -> Option<Self> {
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Some(Self { parallelism: n }),
            _ => None,
        }
    }
}
