use ndarray::ArrayView2;
use num_complex::Complex;

/// Tests for hermiticity of a matrix to an absolute tolerance
pub(crate) fn is_hermitian(matrix: ArrayView2<Complex<f64>>, tolerance: f64) -> bool {
    let matrix_transpose = matrix.t();
    matrix
        .iter()
        .zip(matrix_transpose.iter())
        .all(|(element, adjoint_element)| (element - adjoint_element.conj()).norm() < tolerance)
}

/// The largest element-wise modulus of the difference of two equal-shaped matrices
pub(crate) fn max_deviation(
    left: ArrayView2<Complex<f64>>,
    right: ArrayView2<Complex<f64>>,
) -> f64 {
    left.iter()
        .zip(right.iter())
        .map(|(l, r)| (l - r).norm())
        .fold(0_f64, f64::max)
}
