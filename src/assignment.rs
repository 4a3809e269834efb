//! Rectangular minimum-cost assignment (Hungarian algorithm with potentials).
//!
//! Used by the bipartite-matching cover to place the members of one exclusivity
//! group into distinct clique slots.

const INF: i64 = i64::MAX / 4;

/// Assigns every row to a distinct column minimizing the summed cost.
///
/// `cost(r, c)` returns `None` for a forbidden arc. Returns `ans` with
/// `ans[r]` the column of row `r`, or `None` when `rows > cols` or no assignment
/// avoids every forbidden arc.
pub fn solve_min_cost_assignment<F>(rows: usize, cols: usize, cost: F) -> Option<Vec<usize>>
where
    F: Fn(usize, usize) -> Option<i64>,
{
    if rows > cols {
        return None;
    }
    if rows == 0 {
        return Some(Vec::new());
    }

    let mut matrix = vec![vec![None; cols]; rows];
    let mut big: i64 = 1;
    for (r, row) in matrix.iter_mut().enumerate() {
        let mut row_max: Option<i64> = None;
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = cost(r, c);
            if let Some(x) = *cell {
                row_max = Some(row_max.map_or(x.abs(), |m: i64| m.max(x.abs())));
            }
        }
        // A row without any arc can never be placed.
        big = big.saturating_add(row_max?.saturating_mul(2));
    }
    let a = |r: usize, c: usize| matrix[r][c].unwrap_or(big);

    // 1-based potentials; p[j] is the row matched to column j (0 = free).
    let mut u = vec![0i64; rows + 1];
    let mut v = vec![0i64; cols + 1];
    let mut p = vec![0usize; cols + 1];
    let mut way = vec![0usize; cols + 1];

    for i in 1..=rows {
        p[0] = i;
        let mut j0 = 0;
        let mut minv = vec![INF; cols + 1];
        let mut used = vec![false; cols + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0;
            for j in 1..=cols {
                if used[j] {
                    continue;
                }
                let cur = a(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=cols {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut ans = vec![usize::MAX; rows];
    for j in 1..=cols {
        if p[j] != 0 {
            ans[p[j] - 1] = j - 1;
        }
    }
    for (r, &c) in ans.iter().enumerate() {
        if c == usize::MAX || matrix[r][c].is_none() {
            return None;
        }
    }
    Some(ans)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn brute_force(matrix: &[Vec<Option<i64>>], cols: usize) -> Option<i64> {
        fn go(
            matrix: &[Vec<Option<i64>>],
            row: usize,
            taken: &mut Vec<bool>,
            acc: i64,
            best: &mut Option<i64>,
        ) {
            if row == matrix.len() {
                if best.is_none_or(|b| acc < b) {
                    *best = Some(acc);
                }
                return;
            }
            for c in 0..taken.len() {
                if let (false, Some(x)) = (taken[c], matrix[row][c]) {
                    taken[c] = true;
                    go(matrix, row + 1, taken, acc + x, best);
                    taken[c] = false;
                }
            }
        }
        let mut best = None;
        go(matrix, 0, &mut vec![false; cols], 0, &mut best);
        best
    }

    #[test]
    fn square_instance() {
        let m = [[4, 1, 3], [2, 0, 5], [3, 2, 2]];
        let ans = solve_min_cost_assignment(3, 3, |r, c| Some(m[r][c])).unwrap();
        let total: i64 = ans.iter().enumerate().map(|(r, &c)| m[r][c]).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn more_rows_than_columns_is_infeasible() {
        assert!(solve_min_cost_assignment(3, 2, |_, _| Some(1)).is_none());
        assert_eq!(solve_min_cost_assignment(0, 2, |_, _| Some(1)), Some(vec![]));
    }

    #[test]
    fn forbidden_arcs_are_respected() {
        // Both rows only fit column 0.
        let cost = |_, c: usize| if c == 0 { Some(1) } else { None };
        assert!(solve_min_cost_assignment(2, 3, cost).is_none());

        let cost = |r: usize, c: usize| if r == c { None } else { Some(1) };
        let ans = solve_min_cost_assignment(2, 2, cost).unwrap();
        assert_eq!(ans, vec![1, 0]);
    }

    #[test]
    fn random_instances_match_brute_force() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        for _ in 0..200 {
            let rows = rng.random_range(1..5);
            let cols = rng.random_range(rows..7);
            let matrix: Vec<Vec<Option<i64>>> = (0..rows)
                .map(|_| {
                    (0..cols)
                        .map(|_| rng.random_bool(0.75).then(|| rng.random_range(0..50)))
                        .collect()
                })
                .collect();
            let expected = brute_force(&matrix, cols);
            let got = solve_min_cost_assignment(rows, cols, |r, c| matrix[r][c]);
            match (expected, got) {
                (None, None) => {}
                (Some(best), Some(ans)) => {
                    let mut seen = vec![false; cols];
                    let mut total = 0;
                    for (r, &c) in ans.iter().enumerate() {
                        assert!(!seen[c]);
                        seen[c] = true;
                        total += matrix[r][c].unwrap();
                    }
                    assert_eq!(total, best);
                }
                (e, g) => panic!("brute force {e:?} vs solver {g:?}"),
            }
        }
    }
}
