use std::fmt;

use serde::Serialize;

use crate::error::{ShapeProblem, SolveError};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A validated, non-empty n×n matrix of integer costs.
///
/// Rows are agents and columns are tasks. The only way to build one is
/// through the validating constructors, so every `CostMatrix` is square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    n: usize,
    cells: Vec<i64>,
}

impl CostMatrix {
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, SolveError> {
        let n = check_shape(rows.iter().map(Vec::len))?;
        let cells = rows.into_iter().flatten().collect();
        Ok(Self { n, cells })
    }

    /// Accepts floats that hold exact integers in `i64` range.
    pub fn from_f64_rows(rows: &[Vec<f64>]) -> Result<Self, SolveError> {
        let n = check_shape(rows.iter().map(Vec::len))?;
        let mut cells = Vec::with_capacity(n * n);
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let cost = integral_f64(value).ok_or_else(|| SolveError::InvalidValue {
                    row,
                    col,
                    value: value.to_string(),
                })?;
                cells.push(cost);
            }
        }
        Ok(Self { n, cells })
    }

    /// Parse a JSON array of arrays of integers, e.g. `[[4, 2], [1, 3]]`.
    pub fn from_json(input: &str) -> Result<Self, SolveError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| SolveError::MatrixParse(e.to_string()))?;

        let outer = value
            .as_array()
            .ok_or(SolveError::InvalidShape(ShapeProblem::NotAMatrix { row: None }))?;
        let mut rows = Vec::with_capacity(outer.len());
        for (row, entry) in outer.iter().enumerate() {
            let cells = entry
                .as_array()
                .ok_or(SolveError::InvalidShape(ShapeProblem::NotAMatrix { row: Some(row) }))?;
            rows.push(cells);
        }

        let n = check_shape(rows.iter().map(|r| r.len()))?;
        let mut cells = Vec::with_capacity(n * n);
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                let cost = json_cost(value).ok_or_else(|| SolveError::InvalidValue {
                    row,
                    col,
                    value: value.to_string(),
                })?;
                cells.push(cost);
            }
        }
        Ok(Self { n, cells })
    }

    /// Number of agents (and tasks).
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.n && col < self.n {
            Some(self.cells[row * self.n + col])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        self.cells.chunks(self.n)
    }

    /// Total cost of a set of pairs. Out-of-range pairs are ignored.
    pub fn cost_of(&self, pairs: &[(usize, usize)]) -> i128 {
        pairs
            .iter()
            .filter_map(|&(row, col)| self.get(row, col))
            .map(i128::from)
            .sum()
    }
}

fn check_shape(lengths: impl Iterator<Item = usize>) -> Result<usize, SolveError> {
    let lengths: Vec<usize> = lengths.collect();
    let rows = lengths.len();
    let Some(&expected) = lengths.first() else {
        return Err(SolveError::InvalidShape(ShapeProblem::Empty));
    };
    if let Some((row, &found)) = lengths.iter().enumerate().find(|&(_, &len)| len != expected) {
        return Err(SolveError::InvalidShape(ShapeProblem::Ragged { row, expected, found }));
    }
    if expected == 0 {
        return Err(SolveError::InvalidShape(ShapeProblem::Empty));
    }
    if expected != rows {
        return Err(SolveError::InvalidShape(ShapeProblem::NotSquare { rows, cols: expected }));
    }
    Ok(rows)
}

fn integral_f64(value: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value.fract() != 0.0 || value >= LIMIT || value < -LIMIT {
        return None;
    }
    Some(value as i64)
}

fn json_cost(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(num) => num.as_i64().or_else(|| num.as_f64().and_then(integral_f64)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Counters gathered while the state machine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    /// State-machine dispatches, including the terminal coverage test.
    pub steps: u64,
    /// Augmenting paths applied.
    pub augmentations: u64,
    /// Matrix adjustments applied.
    pub adjustments: u64,
    /// Zeros primed during augmenting searches.
    pub primes: u64,
}

/// An optimal one-to-one assignment of agents (rows) to tasks (columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pairs: Vec<(usize, usize)>,
    total_cost: i128,
    stats: SolveStats,
}

impl Assignment {
    pub(crate) fn new(pairs: Vec<(usize, usize)>, total_cost: i128, stats: SolveStats) -> Self {
        Self { pairs, total_cost, stats }
    }

    /// `(agent, task)` pairs ordered by agent.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn total_cost(&self) -> i128 {
        self.total_cost
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    pub fn task_for(&self, agent: usize) -> Option<usize> {
        self.pairs.get(agent).map(|&(_, task)| task)
    }

    pub fn into_pairs(self) -> Vec<(usize, usize)> {
        self.pairs
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(agent, task) in &self.pairs {
            writeln!(f, "Agent #{} --> Task #{}", agent + 1, task + 1)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
