//! Error type for catalog validation, tiling and matching.
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | [`Shape`](MatchError::Shape) | catalog adapters | wrong dimensionality, ragged rows or columns |
//! | [`ColumnResolution`](MatchError::ColumnResolution) | [`Table`](crate::Table) | no unique `ra`/`dec` column |
//! | [`ReservedColumn`](MatchError::ReservedColumn) | [`Table`](crate::Table) | caller used the reserved `index` name |
//! | [`NonNumericColumn`](MatchError::NonNumericColumn) | [`Table`](crate::Table) | coordinate column holds text |
//! | [`NonFinite`](MatchError::NonFinite) | [`Catalog`](crate::Catalog) | NaN or infinite coordinate |
//! | [`InvalidTolerance`](MatchError::InvalidTolerance) | matcher entry points | tolerance not positive and finite |
//! | [`InvalidConfig`](MatchError::InvalidConfig) | tiling / matcher config | malformed configuration |
//! | [`TileMismatch`](MatchError::TileMismatch) | cross-match | two tilings that must agree do not |
//! | [`UncoveredPoint`](MatchError::UncoveredPoint) | tiling | a custom layout leaves a gap |
//!
//! Input errors are always raised before any tiling or matching starts.
//! None of them are transient.

use thiserror::Error;

/// Which coordinate column failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateKind {
    Ra,
    Dec,
}

impl std::fmt::Display for CoordinateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateKind::Ra => write!(f, "ra"),
            CoordinateKind::Dec => write!(f, "dec"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// Input does not have the shape of a two-column coordinate list.
    #[error("Invalid catalog shape: {message}")]
    Shape { message: String },

    /// Zero or several columns look like the requested coordinate.
    #[error("Expected exactly one {kind} column, found {found:?}")]
    ColumnResolution {
        kind: CoordinateKind,
        found: Vec<String>,
    },

    /// Caller table uses a column name reserved for index tracking.
    #[error("Column name '{name}' is reserved")]
    ReservedColumn { name: String },

    /// A coordinate column is not numeric.
    #[error("Coordinate column '{name}' is not numeric")]
    NonNumericColumn { name: String },

    /// A coordinate is NaN or infinite.
    #[error("Non-finite coordinate at row {index}: ra={ra}, dec={dec}")]
    NonFinite { index: usize, ra: f64, dec: f64 },

    /// Matching tolerance is not strictly positive and finite.
    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    /// Malformed tiling or matcher configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Two tilings expected to be identical diverged.
    #[error("Tile {tile} mismatch between catalogs: {message}")]
    TileMismatch { tile: usize, message: String },

    /// The tiling has no tile whose region contains this point.
    #[error("No tile covers row {index} at ra={ra}, dec={dec}")]
    UncoveredPoint { index: usize, ra: f64, dec: f64 },
}

impl MatchError {
    pub fn shape(message: impl Into<String>) -> Self {
        MatchError::Shape {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        MatchError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = MatchError::ColumnResolution {
            kind: CoordinateKind::Dec,
            found: vec!["dec".into(), "DEC".into()],
        };
        assert_eq!(e.to_string(), r#"Expected exactly one dec column, found ["dec", "DEC"]"#);
        assert_eq!(
            MatchError::InvalidTolerance(-1.0).to_string(),
            "Tolerance must be positive and finite, got -1"
        );
        assert!(MatchError::config("bad").to_string().contains("bad"));
    }
}
