use thiserror::Error;

/// Errors raised by elevation-grid construction and sampling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A height token could not be parsed as a number.
    #[error("height token at position {position} is not numeric: '{token}'")]
    Parse { position: usize, token: String },

    /// The parsed height count does not match the declared grid shape.
    #[error("expected {expected} height values for a {rows}x{columns} grid, found {actual}")]
    Shape {
        rows: usize,
        columns: usize,
        expected: usize,
        actual: usize,
    },

    /// The declared grid metadata is degenerate (zero dimension,
    /// non-positive spacing, or zero exaggeration).
    #[error("invalid grid dimensions: {reason}")]
    Dimensions { reason: String },

    /// A lookup index fell outside the grid.
    #[error("grid index ({row}, {column}) outside {rows}x{columns} grid")]
    Index {
        row: i64,
        column: i64,
        rows: usize,
        columns: usize,
    },
}
