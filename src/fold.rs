//! # Fold
//!
//! The k-space accumulation kernels. A real-space operator `M` of shape
//! `no x no * n_s` folds into the unit cell at a k-point as
//!
//! `M(k)[i, uc] = sum over images of exp(i k.d) M[i, isc * no + uc]`
//!
//! with the phase and displacement tables supplied by [`Phases`](crate::phase::Phases).
//! Every kernel walks the stored entries exactly once and accumulates with a single
//! complex multiply per entry; at the Gamma point the multiply is skipped entirely.
//! Dense outputs land in `ndarray` matrices, the sparse variant produces a
//! `sprs::CsMat` with sorted, deduplicated columns.
//!
//! The stored scalar is generic: real-valued and complex-valued operators share the
//! same kernels through the `Complex<f64>: From<T>` conversion.

use crate::{error::BuildError, phase::Phases, sparse::SparseCsr};
use ndarray::Array2;
use num_complex::Complex;
use num_traits::Zero;

/// Check the operator shape against the phase tables before folding
fn check_shape<T>(matrix: &SparseCsr<T>, phases: &Phases) -> Result<(), BuildError> {
    let no = phases.num_orbitals();
    if matrix.nrows() != no || matrix.ncols() != phases.matrix_width() {
        return Err(BuildError::Dimension(format!(
            "cannot fold a {} x {} operator with phase tables built for {} x {}",
            matrix.nrows(),
            matrix.ncols(),
            no,
            phases.matrix_width(),
        )));
    }
    Ok(())
}

/// Fold a real-space operator into a dense k-space matrix
pub fn k_dense<T>(matrix: &SparseCsr<T>, phases: &Phases) -> Result<Array2<Complex<f64>>, BuildError>
where
    T: Copy,
    Complex<f64>: From<T>,
{
    check_shape(matrix, phases)?;
    let no = phases.num_orbitals();
    let mut out = Array2::zeros((no, no));
    if phases.is_gamma() {
        for i in 0..no {
            for (col, &value) in matrix.iter_row(i) {
                out[[i, col % no]] += Complex::from(value);
            }
        }
    } else {
        for i in 0..no {
            for (col, &value) in matrix.iter_row(i) {
                out[[i, col % no]] += phases.factor(i, col) * Complex::from(value);
            }
        }
    }
    Ok(out)
}

/// Fold a real-space operator into a k-space CSR matrix
///
/// Different periodic images of the same unit-cell orbital fold onto one column; the
/// kernel accumulates them in a dense scratch row and emits sorted column indices,
/// so the output satisfies the usual CSR invariants.
pub fn k_sparse<T>(
    matrix: &SparseCsr<T>,
    phases: &Phases,
) -> Result<sprs::CsMat<Complex<f64>>, BuildError>
where
    T: Copy,
    Complex<f64>: From<T>,
{
    check_shape(matrix, phases)?;
    let no = phases.num_orbitals();
    let gamma = phases.is_gamma();

    let mut indptr = Vec::with_capacity(no + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    indptr.push(0);

    // Scratch row: `stamp[uc] == i` marks `uc` as touched while assembling row `i`
    let mut scratch = vec![Complex::<f64>::zero(); no];
    let mut stamp = vec![usize::MAX; no];
    let mut touched = Vec::with_capacity(no);

    for i in 0..no {
        touched.clear();
        for (col, &value) in matrix.iter_row(i) {
            let uc = col % no;
            let contribution = if gamma {
                Complex::from(value)
            } else {
                phases.factor(i, col) * Complex::from(value)
            };
            if stamp[uc] == i {
                scratch[uc] += contribution;
            } else {
                stamp[uc] = i;
                scratch[uc] = contribution;
                touched.push(uc);
            }
        }
        touched.sort_unstable();
        for &uc in &touched {
            indices.push(uc);
            data.push(scratch[uc]);
        }
        indptr.push(indices.len());
    }

    Ok(sprs::CsMat::new((no, no), indptr, indices, data))
}

/// Fold the three Cartesian k-derivatives of a real-space operator
///
/// Each stored element contributes `i d_alpha exp(i k.d) M[i, col]` to component
/// `alpha`, with `d` the Cartesian displacement carried by the element (units of the
/// stored scalar times Angstrom).
pub fn dk_dense<T>(
    matrix: &SparseCsr<T>,
    phases: &Phases,
) -> Result<[Array2<Complex<f64>>; 3], BuildError>
where
    T: Copy,
    Complex<f64>: From<T>,
{
    check_shape(matrix, phases)?;
    let no = phases.num_orbitals();
    let mut out = [
        Array2::zeros((no, no)),
        Array2::zeros((no, no)),
        Array2::zeros((no, no)),
    ];
    for i in 0..no {
        for (col, &value) in matrix.iter_row(i) {
            let uc = col % no;
            let phased = phases.factor(i, col) * Complex::from(value);
            let d = phases.displacement(i, col);
            for (alpha, out_alpha) in out.iter_mut().enumerate() {
                out_alpha[[i, uc]] += Complex::new(0., d[alpha]) * phased;
            }
        }
    }
    Ok(out)
}
