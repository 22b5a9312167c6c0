//! Property-based tests for the dense matrix container.

#[cfg(test)]
mod tests {
    use crate::DenseMatrix;
    use proptest::prelude::*;

    fn proptest_config() -> ProptestConfig {
        ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        }
    }

    fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = DenseMatrix<f64>> {
        prop::collection::vec(-10.0..10.0, rows * cols)
            .prop_map(move |v| DenseMatrix::from_vec(v, (rows, cols)).unwrap())
    }

    proptest! {
        #![proptest_config(proptest_config())]

        // Transposing twice restores the original
        #[test]
        fn transpose_is_an_involution(m in matrix_strategy(3, 5)) {
            prop_assert!(m.transpose().transpose().all_eq(&m));
        }

        // The norm of a stack combines the operand norms in quadrature
        #[test]
        fn vstack_norm_combines_in_quadrature(
            a in matrix_strategy(2, 4),
            b in matrix_strategy(3, 4),
        ) {
            let stacked = a.vstack(&b).unwrap();
            let expected = (a.frobenius_norm().powi(2) + b.frobenius_norm().powi(2)).sqrt();
            prop_assert!((stacked.frobenius_norm() - expected).abs() < 1e-9);
        }

        // max_scalar dominates its threshold and fixes points above it
        #[test]
        fn max_scalar_clamps_from_below(m in matrix_strategy(3, 3)) {
            let clamped = m.max_scalar(0.0);
            for i in 0..3 {
                for j in 0..3 {
                    let original = m[(i, j)];
                    let value = clamped[(i, j)];
                    prop_assert!(value >= 0.0);
                    if original >= 0.0 {
                        prop_assert_eq!(value, original);
                    }
                }
            }
        }

        // mul_sum against itself is the squared Frobenius norm
        #[test]
        fn mul_sum_self_is_squared_norm(m in matrix_strategy(4, 3)) {
            let norm = m.frobenius_norm();
            let self_product = m.mul_sum(&m).unwrap();
            prop_assert!((self_product - norm * norm).abs() < 1e-9);
        }
    }
}
