//! Hungarian (Kuhn-Munkres) state machine.
//!
//! The solver walks six steps until the starred zeros of the reduced matrix
//! form a perfect matching:
//!
//! 1. Row reduction
//! 2. Initial starring
//! 3. Column coverage test (terminates when n columns are covered)
//! 4. Augmenting search (prime uncovered zeros)
//! 5. Augmenting path construction (flip stars and primes)
//! 6. Matrix adjustment by the smallest uncovered value
//!
//! Every call builds its own `SolverState`; nothing survives between calls.

use crate::config::{SolverConfig, ZeroScan};
use crate::error::SolveError;
use crate::model::{Assignment, CostMatrix, SolveStats};
use crate::state::{Mark, SolverState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    ReduceRows,
    StarZeros,
    CoverColumns,
    AugmentSearch,
    /// Path origin: a primed zero with no star in its row.
    AugmentPath { row: usize, col: usize },
    Adjust,
    Done,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Solve with the default configuration.
pub fn solve(cost: &CostMatrix) -> Result<Assignment, SolveError> {
    solve_with(&SolverConfig::default(), cost)
}

/// Find a minimum-cost perfect matching of rows to columns.
pub fn solve_with(config: &SolverConfig, cost: &CostMatrix) -> Result<Assignment, SolveError> {
    config.validate()?;
    let n = cost.size();
    let budget = config.step_budget(n);
    log::debug!("solving {n}x{n} assignment (scan: {}, step budget: {budget})", config.scan);

    let mut run = Run {
        state: SolverState::new(cost),
        scan: config.scan,
        stats: SolveStats::default(),
    };

    let mut step = Step::ReduceRows;
    while step != Step::Done {
        if run.stats.steps >= budget {
            return Err(SolveError::InternalInvariant(format!(
                "step budget of {budget} exhausted at {step:?} without reaching an assignment"
            )));
        }
        run.stats.steps += 1;
        log::trace!("step {}: {step:?}", run.stats.steps);
        step = run.advance(step)?;
    }

    let pairs = run.state.starred();
    check_perfect_matching(&pairs, n)?;
    let total_cost = cost.cost_of(&pairs);

    log::debug!(
        "assignment found: cost {total_cost}, {} augmentation(s), {} adjustment(s), {} step(s)",
        run.stats.augmentations,
        run.stats.adjustments,
        run.stats.steps
    );
    Ok(Assignment::new(pairs, total_cost, run.stats))
}

/// `pairs` is in row-major order, so row i must hold the i-th pair.
fn check_perfect_matching(pairs: &[(usize, usize)], n: usize) -> Result<(), SolveError> {
    if pairs.len() != n {
        return Err(SolveError::InternalInvariant(format!(
            "finished with {} starred zero(s) for {n} row(s)",
            pairs.len()
        )));
    }
    let mut col_used = vec![false; n];
    for (i, &(row, col)) in pairs.iter().enumerate() {
        if row != i || col_used[col] {
            return Err(SolveError::InternalInvariant(format!(
                "starred zero at ({row}, {col}) shares a row or column with another"
            )));
        }
        col_used[col] = true;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

struct Run {
    state: SolverState,
    scan: ZeroScan,
    stats: SolveStats,
}

impl Run {
    fn advance(&mut self, step: Step) -> Result<Step, SolveError> {
        match step {
            Step::ReduceRows => {
                self.state.reduce_rows();
                Ok(Step::StarZeros)
            }
            Step::StarZeros => Ok(self.star_zeros()),
            Step::CoverColumns => Ok(self.cover_columns()),
            Step::AugmentSearch => self.augment_search(),
            Step::AugmentPath { row, col } => self.augment_path(row, col),
            Step::Adjust => self.adjust(),
            Step::Done => Ok(Step::Done),
        }
    }

    /// Star the first usable zero of each row. Covers act as "already used"
    /// flags here and are cleared afterwards.
    fn star_zeros(&mut self) -> Step {
        let n = self.state.size();
        for row in 0..n {
            let free = (0..n).find(|&col| {
                self.state.value(row, col) == 0 && !self.state.is_col_covered(col)
            });
            if let Some(col) = free {
                self.state.set_mark(row, col, Mark::Starred);
                self.state.cover_row(row);
                self.state.cover_col(col);
            }
        }
        self.state.clear_covers();
        Step::CoverColumns
    }

    fn cover_columns(&mut self) -> Step {
        let n = self.state.size();
        let mut covered = 0;
        for col in 0..n {
            if self.state.find_in_col(col, Mark::Starred).is_some() {
                self.state.cover_col(col);
                covered += 1;
            }
        }
        if covered >= n {
            Step::Done
        } else {
            Step::AugmentSearch
        }
    }

    fn augment_search(&mut self) -> Result<Step, SolveError> {
        let n = self.state.size();
        let mut start = (0, 0);
        // Each non-final prime covers a row that holds a star, and fewer than
        // n rows hold stars here.
        for _ in 0..n {
            let Some((row, col)) = self.state.find_uncovered_zero(start) else {
                return Ok(Step::Adjust);
            };
            self.state.set_mark(row, col, Mark::Primed);
            self.stats.primes += 1;

            match self.state.find_in_row(row, Mark::Starred) {
                None => return Ok(Step::AugmentPath { row, col }),
                Some(star_col) => {
                    self.state.cover_row(row);
                    self.state.uncover_col(star_col);
                    start = self.next_start(row, col);
                }
            }
        }
        Err(SolveError::InternalInvariant(format!(
            "augmenting search primed {n} zeros without finding a path or exhausting zeros"
        )))
    }

    fn next_start(&self, row: usize, col: usize) -> (usize, usize) {
        match self.scan {
            ZeroScan::Restart => (0, 0),
            ZeroScan::Wraparound => {
                let n = self.state.size();
                let next = (row * n + col + 1) % (n * n);
                (next / n, next % n)
            }
        }
    }

    fn augment_path(&mut self, row: usize, col: usize) -> Result<Step, SolveError> {
        let n = self.state.size();
        log::trace!("augmenting from primed zero at ({row}, {col})");
        let mut series = vec![(row, col)];
        let mut col = col;

        while let Some(star_row) = self.state.find_in_col(col, Mark::Starred) {
            series.push((star_row, col));
            // Step 4 only covers a starred row after priming a zero in it.
            let prime_col = self.state.find_in_row(star_row, Mark::Primed).ok_or_else(|| {
                SolveError::InternalInvariant(format!(
                    "starred zero at ({star_row}, {col}) has no primed zero in its row"
                ))
            })?;
            series.push((star_row, prime_col));
            col = prime_col;

            if series.len() > 2 * n {
                return Err(SolveError::InternalInvariant(format!(
                    "augmenting series grew past {} cells",
                    2 * n
                )));
            }
        }

        for &(r, c) in &series {
            let flipped = match self.state.mark(r, c) {
                Mark::Starred => Mark::None,
                Mark::Primed | Mark::None => Mark::Starred,
            };
            self.state.set_mark(r, c, flipped);
        }
        self.state.clear_covers();
        self.state.erase_primes();
        self.stats.augmentations += 1;
        log::trace!("augmented along {} cell(s)", series.len());
        Ok(Step::CoverColumns)
    }

    fn adjust(&mut self) -> Result<Step, SolveError> {
        let min = self.state.smallest_uncovered().ok_or_else(|| {
            SolveError::InternalInvariant("every cell is covered during adjustment".into())
        })?;
        // Step 4 exhausted every uncovered zero and reductions keep cells >= 0.
        if min <= 0 {
            return Err(SolveError::InternalInvariant(format!(
                "smallest uncovered value is {min}, adjustment would not progress"
            )));
        }
        self.state.adjust(min);
        self.stats.adjustments += 1;
        Ok(Step::AugmentSearch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
