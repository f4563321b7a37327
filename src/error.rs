//! Error type shared by the engine and the C ABI.

use thiserror::Error;

/// Axis names used when reporting the offending dimension.
pub const AXES: [char; 3] = ['x', 'y', 'z'];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    #[error("invalid grid: {value} voxels along {axis}")]
    InvalidGrid { axis: char, value: usize },

    #[error("invalid size: extent {value} along {axis}")]
    InvalidSize { axis: char, value: f64 },

    #[error("invalid domain decomposition: {grid} voxels along {axis} do not split into {parts} tiles")]
    InvalidDecomposition {
        axis: char,
        grid: usize,
        parts: usize,
    },

    #[error("label count {actual} does not match grid volume {expected}")]
    LabelCount { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl GrowthError {
    /// Stable negative status code handed across the C ABI.
    pub fn code(&self) -> i64 {
        match self {
            GrowthError::InvalidGrid { .. } => -2,
            GrowthError::InvalidSize { .. } => -3,
            GrowthError::InvalidDecomposition { .. } => -4,
            GrowthError::LabelCount { .. } => -5,
            GrowthError::InvalidConfig(_) => -6,
            GrowthError::ThreadPool(_) => -7,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for GrowthError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        GrowthError::ThreadPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GrowthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_axis() {
        let err = GrowthError::InvalidDecomposition {
            axis: 'y',
            grid: 10,
            parts: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("along y"), "{}", msg);
        assert!(msg.contains("3 tiles"), "{}", msg);
    }

    #[test]
    fn test_codes_are_distinct_and_negative() {
        let errors = [
            GrowthError::InvalidGrid { axis: 'x', value: 0 },
            GrowthError::InvalidSize { axis: 'x', value: 0.0 },
            GrowthError::InvalidDecomposition {
                axis: 'x',
                grid: 3,
                parts: 2,
            },
            GrowthError::LabelCount {
                expected: 8,
                actual: 7,
            },
            GrowthError::InvalidConfig("distance"),
            GrowthError::ThreadPool("boom".into()),
        ];
        let mut codes: Vec<i64> = errors.iter().map(|e| e.code()).collect();
        assert!(codes.iter().all(|&c| c < 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
