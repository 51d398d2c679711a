//! Thomas-algorithm solve of a tridiagonal system.
//!
//! Forward elimination followed by back substitution, O(n) and
//! allocation-light. `a` holds the sub-diagonal (`a[0]` unused), `b` the
//! main diagonal, `c` the super-diagonal (`c[n-1]` unused) and `d` the
//! right-hand side; the solution lands in `x`.

use crate::error::{Result, VadoseError};

/// Pivot magnitude below which elimination is refused.
const MIN_PIVOT: f64 = 1.0e-30;

/// Solve one tridiagonal system.
///
/// All slices must share the same length. Returns
/// [`VadoseError::SingularSystem`] when a pivot vanishes during the
/// forward sweep.
pub(crate) fn solve(a: &[f64], b: &[f64], c: &[f64], d: &[f64], x: &mut [f64]) -> Result<()> {
    let n = b.len();
    debug_assert!(a.len() == n && c.len() == n && d.len() == n && x.len() == n);
    if n == 0 {
        return Ok(());
    }

    // Forward sweep: eliminate the sub-diagonal
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if b[0].abs() < MIN_PIVOT {
        return Err(VadoseError::SingularSystem { row: 0 });
    }
    c_prime[0] = c[0] / b[0];
    d_prime[0] = d[0] / b[0];

    for i in 1..n {
        let pivot = b[i] - a[i] * c_prime[i - 1];
        if pivot.abs() < MIN_PIVOT {
            return Err(VadoseError::SingularSystem { row: i });
        }
        c_prime[i] = c[i] / pivot;
        d_prime[i] = (d[i] - a[i] * d_prime[i - 1]) / pivot;
    }

    // Back substitution
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_row() {
        let mut x = [0.0];
        solve(&[0.0], &[2.0], &[0.0], &[6.0], &mut x).unwrap();
        assert_relative_eq!(x[0], 3.0);
    }

    #[test]
    fn test_laplacian_system() {
        // [ 2 -1  0]         [1]
        // [-1  2 -1] * x  =  [0]   has the solution x = [1, 1, 1]
        // [ 0 -1  2]         [1]
        let a = [0.0, -1.0, -1.0];
        let b = [2.0, 2.0, 2.0];
        let c = [-1.0, -1.0, 0.0];
        let d = [1.0, 0.0, 1.0];
        let mut x = [0.0; 3];
        solve(&a, &b, &c, &d, &mut x).unwrap();
        for v in x {
            assert_relative_eq!(v, 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_solution_satisfies_system() {
        let a = [0.0, 1.3, -0.4, 2.1];
        let b = [4.0, -3.5, 5.2, 6.1];
        let c = [0.7, 1.1, -2.2, 0.0];
        let d = [1.0, -2.0, 0.5, 3.0];
        let mut x = [0.0; 4];
        solve(&a, &b, &c, &d, &mut x).unwrap();

        // Multiply back through the band
        for i in 0..4 {
            let mut lhs = b[i] * x[i];
            if i > 0 {
                lhs += a[i] * x[i - 1];
            }
            if i < 3 {
                lhs += c[i] * x[i + 1];
            }
            assert_relative_eq!(lhs, d[i], max_relative = 1e-10);
        }
    }

    #[test]
    fn test_zero_pivot_is_an_error() {
        let mut x = [0.0];
        let err = solve(&[0.0], &[0.0], &[0.0], &[1.0], &mut x).unwrap_err();
        assert!(matches!(err, VadoseError::SingularSystem { row: 0 }));
    }

    #[test]
    fn test_empty_system_is_a_noop() {
        let mut x: [f64; 0] = [];
        solve(&[], &[], &[], &[], &mut x).unwrap();
    }
}
