// Property-based tests for the assignment solver.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use assignkit_solver::{solve, solve_with, CostMatrix, SolverConfig, ZeroScan};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Square matrix up to 6x6. Small value range so ties are common.
fn arb_small_matrix() -> impl Strategy<Value = Vec<Vec<i64>>> {
    (1usize..=6).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0i64..20, n), n)
    })
}

/// Larger matrices with wide values, too big for brute force.
fn arb_large_matrix() -> impl Strategy<Value = Vec<Vec<i64>>> {
    (7usize..=24).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(-1_000_000i64..1_000_000, n), n)
    })
}

fn arb_scan() -> impl Strategy<Value = ZeroScan> {
    prop_oneof![Just(ZeroScan::Restart), Just(ZeroScan::Wraparound)]
}

// ---------------------------------------------------------------------------
// Oracles
// ---------------------------------------------------------------------------

/// Minimum cost over every permutation (Heap's algorithm).
fn brute_force_min(rows: &[Vec<i64>]) -> i128 {
    let n = rows.len();
    let mut perm: Vec<usize> = (0..n).collect();
    let cost = |p: &[usize]| -> i128 {
        p.iter().enumerate().map(|(r, &c)| i128::from(rows[r][c])).sum()
    };
    let mut best = cost(&perm);
    let mut counters = vec![0usize; n];
    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                perm.swap(0, i);
            } else {
                perm.swap(counters[i], i);
            }
            best = best.min(cost(&perm));
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    best
}

fn assert_perfect_matching(pairs: &[(usize, usize)], n: usize) {
    assert_eq!(pairs.len(), n);
    let mut rows = vec![false; n];
    let mut cols = vec![false; n];
    for &(r, c) in pairs {
        assert!(!rows[r], "row {r} assigned twice");
        assert!(!cols[c], "column {c} assigned twice");
        rows[r] = true;
        cols[c] = true;
    }
}

#[test]
fn brute_force_oracle_sanity() {
    let rows = vec![vec![4, 2, 8], vec![4, 3, 7], vec![3, 1, 6]];
    assert_eq!(brute_force_min(&rows), 12);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn optimal_against_brute_force(rows in arb_small_matrix(), scan in arb_scan()) {
        let n = rows.len();
        let expected = brute_force_min(&rows);
        let cost = CostMatrix::from_rows(rows).unwrap();
        let config = SolverConfig { scan, max_steps: None };
        let assignment = solve_with(&config, &cost).unwrap();

        assert_perfect_matching(assignment.pairs(), n);
        prop_assert_eq!(assignment.total_cost(), expected);
        prop_assert_eq!(cost.cost_of(assignment.pairs()), expected);
    }

    #[test]
    fn perfect_matching_on_large_inputs(rows in arb_large_matrix(), scan in arb_scan()) {
        let n = rows.len();
        let cost = CostMatrix::from_rows(rows).unwrap();
        let config = SolverConfig { scan, max_steps: None };
        let assignment = solve_with(&config, &cost).unwrap();
        assert_perfect_matching(assignment.pairs(), n);
    }

    #[test]
    fn row_shift_moves_optimum_by_constant(
        rows in arb_small_matrix(),
        pick in any::<prop::sample::Index>(),
        shift in -50i64..50,
    ) {
        let base = solve(&CostMatrix::from_rows(rows.clone()).unwrap()).unwrap();
        let r = pick.index(rows.len());
        let mut shifted = rows;
        shifted[r].iter_mut().for_each(|v| *v += shift);
        let shifted_cost = CostMatrix::from_rows(shifted).unwrap();
        let moved = solve(&shifted_cost).unwrap();

        prop_assert_eq!(moved.total_cost(), base.total_cost() + i128::from(shift));
        // The original optimum is still optimal after the shift.
        prop_assert_eq!(shifted_cost.cost_of(base.pairs()), moved.total_cost());
    }

    #[test]
    fn column_shift_moves_optimum_by_constant(
        rows in arb_small_matrix(),
        pick in any::<prop::sample::Index>(),
        shift in -50i64..50,
    ) {
        let base = solve(&CostMatrix::from_rows(rows.clone()).unwrap()).unwrap();
        let c = pick.index(rows.len());
        let mut shifted = rows;
        shifted.iter_mut().for_each(|row| row[c] += shift);
        let shifted_cost = CostMatrix::from_rows(shifted).unwrap();
        let moved = solve(&shifted_cost).unwrap();

        prop_assert_eq!(moved.total_cost(), base.total_cost() + i128::from(shift));
        prop_assert_eq!(shifted_cost.cost_of(base.pairs()), moved.total_cost());
    }

    #[test]
    fn solving_twice_is_deterministic(rows in arb_small_matrix(), scan in arb_scan()) {
        let cost = CostMatrix::from_rows(rows).unwrap();
        let config = SolverConfig { scan, max_steps: None };
        let first = solve_with(&config, &cost).unwrap();
        let second = solve_with(&config, &cost).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn steps_stay_within_derived_budget(rows in arb_large_matrix()) {
        let n = rows.len();
        let cost = CostMatrix::from_rows(rows).unwrap();
        let assignment = solve(&cost).unwrap();
        let stats = assignment.stats();
        prop_assert!(stats.augmentations <= n as u64);
        prop_assert!(stats.steps <= SolverConfig::default().step_budget(n));
    }
}
