//! `assignkit-solver` — Hungarian (Kuhn-Munkres) assignment solver.
//!
//! Pure engine crate: receives a validated square cost matrix, returns the
//! minimum-cost one-to-one assignment of rows (agents) to columns (tasks).
//! No CLI or IO dependencies.
//!
//! ```
//! use assignkit_solver::{solve, CostMatrix};
//!
//! let cost = CostMatrix::from_rows(vec![vec![4, 2, 8], vec![4, 3, 7], vec![3, 1, 6]])?;
//! let assignment = solve(&cost)?;
//! assert_eq!(assignment.total_cost(), 12);
//! # Ok::<(), assignkit_solver::SolveError>(())
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod solver;
mod state;

pub use config::{SolverConfig, ZeroScan};
pub use error::{ShapeProblem, SolveError};
pub use model::{Assignment, CostMatrix, SolveStats};
pub use solver::{solve, solve_with};
