//! Reduced-row-echelon (Gauss-Jordan) elimination over symbolic entries.
//!
//! The balancer needs more than a numeric solve: entries are [`Expr`] values
//! that may carry free symbols, and the three outcomes — a unique solution,
//! a solution family with free parameters, and no solution — map onto three
//! different balancing verdicts.

use super::Expr;

/// Outcome of eliminating `A·v = b`.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearSolution {
    /// Exactly one solution; entries may still contain the free symbols that
    /// already occur in `A` or `b` (e.g. a dopant fraction `x`).
    Unique(Vec<Expr>),
    /// Consistent, but with `free` solver-introduced parameters.
    Underdetermined { free: usize },
    /// No assignment satisfies every row.
    Inconsistent,
}

/// Solves `A·v = b` by Gauss-Jordan elimination in exact symbolic arithmetic.
///
/// `matrix` is row-major with one row per conserved element and one column
/// per unknown species amount. Rows in excess of the rank are admitted as
/// long as they are consistent.
pub fn gauss_jordan(matrix: &[Vec<Expr>], rhs: &[Expr]) -> LinearSolution {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let mut a: Vec<Vec<Expr>> = matrix.to_vec();
    let mut b: Vec<Expr> = rhs.to_vec();

    let mut pivot_row_of_col: Vec<Option<usize>> = vec![None; cols];
    let mut rank = 0;

    for col in 0..cols {
        let Some(pivot) = (rank..rows).find(|&row| !a[row][col].is_zero()) else {
            continue;
        };
        a.swap(rank, pivot);
        b.swap(rank, pivot);

        let Some(inverse) = a[rank][col].recip() else {
            continue;
        };
        for j in col..cols {
            a[rank][j] = &a[rank][j] * &inverse;
        }
        b[rank] = &b[rank] * &inverse;

        for row in 0..rows {
            if row == rank || a[row][col].is_zero() {
                continue;
            }
            let factor = a[row][col].clone();
            for j in col..cols {
                let scaled = &factor * &a[rank][j];
                a[row][j] = &a[row][j] - &scaled;
            }
            let scaled = &factor * &b[rank];
            b[row] = &b[row] - &scaled;
        }

        pivot_row_of_col[col] = Some(rank);
        rank += 1;
    }

    // Every row beyond the rank has an all-zero coefficient part.
    if b.iter().skip(rank).any(|value| !value.is_zero()) {
        return LinearSolution::Inconsistent;
    }

    let free = cols - rank;
    if free > 0 {
        return LinearSolution::Underdetermined { free };
    }

    let mut solution = vec![Expr::zero(); cols];
    for (col, row) in pivot_row_of_col.iter().enumerate() {
        if let Some(row) = row {
            solution[col] = b[*row].clone();
        }
    }
    LinearSolution::Unique(solution)
}
