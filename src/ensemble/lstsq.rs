/// Pivots at or below this magnitude mark the normal matrix singular. The
/// design entries here are predictions on the data's own scale, so an
/// absolute tolerance is adequate.
const PIVOT_EPSILON: f64 = 1e-12;

/// Solves the least-squares problem `min ‖A·w − b‖²` through the normal
/// equations `AᵀA·w = Aᵀb`, eliminating with partial pivoting.
///
/// `rows` is the design matrix row-major; rows beyond `targets` (or vice
/// versa), rows of the wrong width, an empty system, and a singular normal
/// matrix (collinear or constant predictor columns) all yield `None`, which
/// callers treat as "keep the previous weights".
pub fn solve_least_squares(
    rows: &[Vec<f64>],
    targets: &[f64],
    columns: usize,
) -> Option<Vec<f64>> {
    if columns == 0
        || rows.is_empty()
        || rows.len() != targets.len()
        || rows.iter().any(|row| row.len() != columns)
    {
        return None;
    }

    // Augmented normal system [AᵀA | Aᵀb], flat row-major.
    let width = columns + 1;
    let mut system = vec![0.0; columns * width];
    for (row, target) in rows.iter().zip(targets) {
        for i in 0..columns {
            for j in 0..columns {
                system[i * width + j] += row[i] * row[j];
            }
            system[i * width + columns] += row[i] * target;
        }
    }

    // Forward elimination.
    for col in 0..columns {
        let pivot_row = (col..columns)
            .max_by(|&a, &b| {
                system[a * width + col]
                    .abs()
                    .total_cmp(&system[b * width + col].abs())
            })?;
        if system[pivot_row * width + col].abs() <= PIVOT_EPSILON {
            return None;
        }
        if pivot_row != col {
            for j in 0..width {
                system.swap(col * width + j, pivot_row * width + j);
            }
        }

        let pivot = system[col * width + col];
        for row in (col + 1)..columns {
            let factor = system[row * width + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..width {
                system[row * width + j] -= factor * system[col * width + j];
            }
        }
    }

    // Back substitution.
    let mut weights = vec![0.0; columns];
    for col in (0..columns).rev() {
        let mut sum = system[col * width + columns];
        for j in (col + 1)..columns {
            sum -= system[col * width + j] * weights[j];
        }
        weights[col] = sum / system[col * width + col];
    }

    weights.iter().all(|w| w.is_finite()).then_some(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() <= 1e-9, "got {got:?}, want {want:?}");
        }
    }

    #[test]
    fn exact_overdetermined_system_recovers_known_weights() {
        let want = [2.0, -1.0, 0.5];
        let rows: Vec<Vec<f64>> = (0..50)
            .map(|i| {
                let x = i as f64;
                vec![x.sin(), (0.3 * x).cos(), x * 0.01 + 1.0]
            })
            .collect();
        let targets: Vec<f64> = rows
            .iter()
            .map(|r| r.iter().zip(want).map(|(a, w)| a * w).sum())
            .collect();

        let weights = solve_least_squares(&rows, &targets, 3).unwrap();
        assert_close(&weights, &want);
    }

    #[test]
    fn single_column_reduces_to_the_projection_formula() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = [2.0, 3.9, 6.1];
        let weights = solve_least_squares(&rows, &targets, 1).unwrap();

        let dot_ab = 1.0 * 2.0 + 2.0 * 3.9 + 3.0 * 6.1;
        let dot_aa = 1.0 + 4.0 + 9.0;
        assert!((weights[0] - dot_ab / dot_aa).abs() <= 1e-12);
    }

    #[test]
    fn noisy_solution_satisfies_the_normal_equations() {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let x = i as f64;
                vec![1.0, x, (x * 0.5).sin()]
            })
            .collect();
        let targets: Vec<f64> = (0..40)
            .map(|i| {
                let x = i as f64;
                3.0 + 0.5 * x + ((i * 7919) % 13) as f64 * 0.01
            })
            .collect();

        let weights = solve_least_squares(&rows, &targets, 3).unwrap();

        // Residual must be orthogonal to every column.
        for col in 0..3 {
            let mut dot = 0.0;
            for (row, target) in rows.iter().zip(&targets) {
                let fitted: f64 = row.iter().zip(&weights).map(|(a, w)| a * w).sum();
                dot += row[col] * (target - fitted);
            }
            assert!(dot.abs() <= 1e-7, "column {col} residual dot {dot}");
        }
    }

    #[test]
    fn collinear_columns_are_reported_singular() {
        let rows: Vec<Vec<f64>> = (1..20)
            .map(|i| vec![i as f64, 2.0 * i as f64])
            .collect();
        let targets: Vec<f64> = (1..20).map(|i| i as f64).collect();
        assert!(solve_least_squares(&rows, &targets, 2).is_none());
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(solve_least_squares(&[], &[], 2).is_none());
        assert!(solve_least_squares(&[vec![1.0]], &[1.0, 2.0], 1).is_none());
        assert!(solve_least_squares(&[vec![1.0, 2.0]], &[1.0], 1).is_none());
        assert!(solve_least_squares(&[vec![0.0], vec![0.0]], &[1.0, 1.0], 1).is_none());
    }
}
