//! Working state for a single solve: the reduced cost matrix, cover flags,
//! and the star/prime marks. A fresh `SolverState` is built for every call.

use crate::model::CostMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    None,
    Starred,
    Primed,
}

pub(crate) struct SolverState {
    n: usize,
    /// Row-major working copy. Widened so reductions never overflow.
    work: Vec<i128>,
    row_covered: Vec<bool>,
    col_covered: Vec<bool>,
    marks: Vec<Mark>,
}

impl SolverState {
    pub(crate) fn new(cost: &CostMatrix) -> Self {
        let n = cost.size();
        let work = cost.rows().flatten().map(|&c| i128::from(c)).collect();
        Self {
            n,
            work,
            row_covered: vec![false; n],
            col_covered: vec![false; n],
            marks: vec![Mark::None; n * n],
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.n
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.n + col
    }

    pub(crate) fn value(&self, row: usize, col: usize) -> i128 {
        self.work[self.idx(row, col)]
    }

    pub(crate) fn mark(&self, row: usize, col: usize) -> Mark {
        self.marks[self.idx(row, col)]
    }

    pub(crate) fn set_mark(&mut self, row: usize, col: usize, mark: Mark) {
        let i = self.idx(row, col);
        self.marks[i] = mark;
    }

    // -----------------------------------------------------------------------
    // Covers
    // -----------------------------------------------------------------------

    pub(crate) fn is_col_covered(&self, col: usize) -> bool {
        self.col_covered[col]
    }

    pub(crate) fn cover_row(&mut self, row: usize) {
        self.row_covered[row] = true;
    }

    pub(crate) fn cover_col(&mut self, col: usize) {
        self.col_covered[col] = true;
    }

    pub(crate) fn uncover_col(&mut self, col: usize) {
        self.col_covered[col] = false;
    }

    pub(crate) fn clear_covers(&mut self) {
        self.row_covered.fill(false);
        self.col_covered.fill(false);
    }

    fn is_uncovered(&self, row: usize, col: usize) -> bool {
        !self.row_covered[row] && !self.col_covered[col]
    }

    // -----------------------------------------------------------------------
    // Matrix updates
    // -----------------------------------------------------------------------

    /// Subtract each row's minimum from every cell in that row.
    pub(crate) fn reduce_rows(&mut self) {
        for row in self.work.chunks_mut(self.n) {
            if let Some(&min) = row.iter().min() {
                row.iter_mut().for_each(|v| *v -= min);
            }
        }
    }

    /// Add `delta` to covered rows, subtract it from uncovered columns.
    pub(crate) fn adjust(&mut self, delta: i128) {
        for row in 0..self.n {
            for col in 0..self.n {
                let i = self.idx(row, col);
                if self.row_covered[row] {
                    self.work[i] += delta;
                }
                if !self.col_covered[col] {
                    self.work[i] -= delta;
                }
            }
        }
    }

    pub(crate) fn erase_primes(&mut self) {
        for mark in self.marks.iter_mut().filter(|m| **m == Mark::Primed) {
            *mark = Mark::None;
        }
    }

    // -----------------------------------------------------------------------
    // Scans
    // -----------------------------------------------------------------------

    /// First uncovered zero in row-major order, starting at `start` and
    /// wrapping around the whole matrix.
    pub(crate) fn find_uncovered_zero(&self, start: (usize, usize)) -> Option<(usize, usize)> {
        let total = self.n * self.n;
        let origin = self.idx(start.0, start.1);
        (0..total)
            .map(|offset| (origin + offset) % total)
            .map(|i| (i / self.n, i % self.n))
            .find(|&(row, col)| self.is_uncovered(row, col) && self.value(row, col) == 0)
    }

    pub(crate) fn smallest_uncovered(&self) -> Option<i128> {
        (0..self.n)
            .filter(|&row| !self.row_covered[row])
            .flat_map(|row| {
                (0..self.n)
                    .filter(move |&col| !self.col_covered[col])
                    .map(move |col| (row, col))
            })
            .map(|(row, col)| self.value(row, col))
            .min()
    }

    pub(crate) fn find_in_row(&self, row: usize, mark: Mark) -> Option<usize> {
        (0..self.n).find(|&col| self.mark(row, col) == mark)
    }

    pub(crate) fn find_in_col(&self, col: usize, mark: Mark) -> Option<usize> {
        (0..self.n).find(|&row| self.mark(row, col) == mark)
    }

    /// Starred cells in row-major order.
    pub(crate) fn starred(&self) -> Vec<(usize, usize)> {
        (0..self.n)
            .flat_map(|row| (0..self.n).map(move |col| (row, col)))
            .filter(|&(row, col)| self.mark(row, col) == Mark::Starred)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rows: Vec<Vec<i64>>) -> SolverState {
        SolverState::new(&CostMatrix::from_rows(rows).unwrap())
    }

    #[test]
    fn reduce_rows_leaves_a_zero_per_row() {
        let mut s = state(vec![vec![4, 2, 8], vec![4, 3, 7], vec![3, 1, 6]]);
        s.reduce_rows();
        let rows: Vec<Vec<i128>> = (0..3).map(|r| (0..3).map(|c| s.value(r, c)).collect()).collect();
        assert_eq!(rows, vec![vec![2, 0, 6], vec![1, 0, 4], vec![2, 0, 5]]);
    }

    #[test]
    fn reduce_rows_handles_extreme_values() {
        let mut s = state(vec![vec![i64::MIN, i64::MAX], vec![0, 0]]);
        s.reduce_rows();
        assert_eq!(s.value(0, 1), i128::from(i64::MAX) - i128::from(i64::MIN));
    }

    #[test]
    fn find_zero_wraps_from_start() {
        let mut s = state(vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(s.find_uncovered_zero((0, 1)), Some((1, 1)));
        assert_eq!(s.find_uncovered_zero((0, 0)), Some((0, 0)));
        s.cover_row(1);
        assert_eq!(s.find_uncovered_zero((0, 1)), Some((0, 0)));
        s.cover_col(0);
        assert_eq!(s.find_uncovered_zero((0, 0)), None);
    }

    #[test]
    fn adjust_adds_to_covered_rows_and_subtracts_from_uncovered_cols() {
        let mut s = state(vec![vec![5, 5], vec![5, 5]]);
        s.cover_row(0);
        s.cover_col(0);
        s.adjust(2);
        assert_eq!(s.value(0, 0), 7);
        assert_eq!(s.value(0, 1), 5);
        assert_eq!(s.value(1, 0), 5);
        assert_eq!(s.value(1, 1), 3);
    }

    #[test]
    fn smallest_uncovered_skips_covered_lines() {
        let mut s = state(vec![vec![1, 9], vec![4, 6]]);
        s.cover_col(0);
        assert_eq!(s.smallest_uncovered(), Some(6));
        s.cover_col(1);
        assert_eq!(s.smallest_uncovered(), None);
    }

    #[test]
    fn erase_primes_keeps_stars() {
        let mut s = state(vec![vec![0, 0], vec![0, 0]]);
        s.set_mark(0, 0, Mark::Starred);
        s.set_mark(0, 1, Mark::Primed);
        s.set_mark(1, 0, Mark::Primed);
        s.erase_primes();
        assert_eq!(s.starred(), vec![(0, 0)]);
        assert_eq!(s.find_in_row(0, Mark::Primed), None);
        assert_eq!(s.find_in_col(0, Mark::Starred), Some(0));
    }
}
