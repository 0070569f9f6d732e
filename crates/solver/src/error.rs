use std::fmt;

/// Why a matrix was rejected before solving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeProblem {
    /// No rows, or a single row with no cells.
    Empty,
    /// Rows are consistent but the matrix is not n×n.
    NotSquare { rows: usize, cols: usize },
    /// A row's length differs from the first row's.
    Ragged { row: usize, expected: usize, found: usize },
    /// Input is not an array of rows; `row` names the first non-array row.
    NotAMatrix { row: Option<usize> },
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "matrix is empty"),
            Self::NotSquare { rows, cols } => {
                write!(f, "matrix is {rows}x{cols}, expected a square matrix")
            }
            Self::Ragged { row, expected, found } => {
                write!(f, "row {row} has {found} cell(s), expected {expected}")
            }
            Self::NotAMatrix { row: None } => write!(f, "expected an array of rows"),
            Self::NotAMatrix { row: Some(row) } => write!(f, "row {row} is not an array"),
        }
    }
}

#[derive(Debug)]
pub enum SolveError {
    /// Input matrix is empty, non-square, ragged, or not an array of rows.
    InvalidShape(ShapeProblem),
    /// A cell is non-numeric, non-finite, fractional, or out of range.
    InvalidValue { row: usize, col: usize, value: String },
    /// Matrix JSON could not be parsed.
    MatrixParse(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error.
    ConfigValidation(String),
    /// The state machine reached a state that a correct run cannot reach.
    InternalInvariant(String),
}

impl SolveError {
    /// True when the error signals a solver defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalInvariant(_))
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape(problem) => write!(f, "invalid matrix shape: {problem}"),
            Self::InvalidValue { row, col, value } => {
                write!(f, "invalid cost at ({row}, {col}): '{value}'")
            }
            Self::MatrixParse(msg) => write!(f, "matrix parse error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InternalInvariant(msg) => write!(f, "internal solver error: {msg}"),
        }
    }
}

impl std::error::Error for SolveError {}
