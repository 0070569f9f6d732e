use serde::Deserialize;

use crate::error::SolveError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    #[serde(default)]
    pub scan: ZeroScan,
    /// Upper bound on state-machine steps. Derived from the matrix size when unset.
    #[serde(default)]
    pub max_steps: Option<u64>,
}

// ---------------------------------------------------------------------------
// Zero scan order
// ---------------------------------------------------------------------------

/// Where the augmenting search looks for the next uncovered zero.
///
/// Both orders are deterministic and reach an optimal assignment. They can
/// pick different optima when several exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroScan {
    /// Every search starts over at (0, 0). Lowest row, then lowest column wins.
    #[default]
    Restart,
    /// Each search resumes after the last primed zero and wraps around.
    Wraparound,
}

impl std::fmt::Display for ZeroScan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restart => write!(f, "restart"),
            Self::Wraparound => write!(f, "wraparound"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SolverConfig {
    pub fn from_toml(input: &str) -> Result<Self, SolveError> {
        let config: SolverConfig =
            toml::from_str(input).map_err(|e| SolveError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if self.max_steps == Some(0) {
            return Err(SolveError::ConfigValidation(
                "max_steps must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Step budget for an n×n problem.
    pub fn step_budget(&self, n: usize) -> u64 {
        self.max_steps.unwrap_or_else(|| derived_budget(n))
    }
}

/// n augmentations, each preceded by at most n + 1 rounds of steps 4 and 6,
/// plus the fixed steps 1-3, with headroom.
fn derived_budget(n: usize) -> u64 {
    let n = n as u64 + 1;
    8 * n * n + 16
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
