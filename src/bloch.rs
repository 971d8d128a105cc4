//! # Bloch
//!
//! Bloch's-theorem expansion of small-cell matrices onto a supercell. A calculation
//! on a cell repeated `b0 x b1 x b2` times does not need the supercell matrices
//! directly: evaluating the small-cell matrix at the expansion points
//! `(T + k) / b` and phase-combining the results reproduces the supercell matrix at
//! `k` exactly, at a fraction of the cost of assembling the large system.
//!
//! The assembly kernel is separable: per-axis phase vectors combine into one
//! composite phase per cell copy, and block `(J, I)` of the output accumulates
//! `m_T exp(i 2 pi k_T.(c_J - c_I)) / B` over the expansion points `T`. The copy
//! ordering matches the supercell offset convention of [`Lattice`](crate::lattice::Lattice):
//! first axis fastest.

use crate::error::{BuildError, ExpansionError};
use ndarray::Array2;
use num_complex::Complex;
use std::f64::consts::PI;

/// A Bloch expansion of a small cell onto a supercell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlochExpansion {
    /// The number of cell copies along each lattice vector
    b: [usize; 3],
}

impl BlochExpansion {
    /// Create an expansion with `b` copies of the cell along each lattice vector
    pub fn new(b: [usize; 3]) -> Result<Self, ExpansionError> {
        if b.iter().any(|&count| count == 0) {
            return Err(ExpansionError::Empty(b));
        }
        Ok(Self { b })
    }

    /// The copy counts along the three lattice vectors
    pub fn counts(&self) -> [usize; 3] {
        self.b
    }

    /// The total number of cell copies
    pub fn size(&self) -> usize {
        self.b.iter().product()
    }

    /// The small-cell k-points which expand onto the supercell point `k`
    ///
    /// Points are ordered with the first axis fastest, matching the block layout of
    /// [`unfold`](Self::unfold).
    pub fn unfold_points(&self, k: &[f64; 3]) -> Vec<[f64; 3]> {
        let mut points = Vec::with_capacity(self.size());
        for t2 in 0..self.b[2] {
            for t1 in 0..self.b[1] {
                for t0 in 0..self.b[0] {
                    points.push([
                        (t0 as f64 + k[0]) / self.b[0] as f64,
                        (t1 as f64 + k[1]) / self.b[1] as f64,
                        (t2 as f64 + k[2]) / self.b[2] as f64,
                    ]);
                }
            }
        }
        points
    }

    /// Assemble the supercell matrix from the small-cell matrices at the expansion points
    ///
    /// `matrices[T]` must be the small-cell matrix evaluated at `k_unfold[T]`, in the
    /// order produced by [`unfold_points`](Self::unfold_points). The output is the
    /// `(n B) x (n B)` supercell matrix, with copy blocks ordered first axis fastest.
    pub fn unfold(
        &self,
        matrices: &[Array2<Complex<f64>>],
        k_unfold: &[[f64; 3]],
    ) -> Result<Array2<Complex<f64>>, ExpansionError> {
        let copies = self.size();
        if matrices.len() != copies {
            return Err(ExpansionError::MatrixCount {
                expected: copies,
                found: matrices.len(),
            });
        }
        if k_unfold.len() != copies {
            return Err(ExpansionError::MatrixCount {
                expected: copies,
                found: k_unfold.len(),
            });
        }
        let n = matrices[0].nrows();
        for matrix in matrices {
            if matrix.nrows() != n || matrix.ncols() != n {
                return Err(ExpansionError::Dimension(format!(
                    "every expansion matrix must be {} x {}, got {} x {}",
                    n,
                    n,
                    matrix.nrows(),
                    matrix.ncols()
                )));
            }
        }

        let weight = 1. / copies as f64;
        let mut out = Array2::zeros((n * copies, n * copies));
        // Composite phase of each cell copy, exp(i 2 pi k_T.c), first axis fastest
        let mut composite = vec![Complex::new(0., 0.); copies];

        for (matrix, k_t) in matrices.iter().zip(k_unfold) {
            let mut copy = 0;
            for c2 in 0..self.b[2] {
                let ph2 = Complex::new(0., 2. * PI * k_t[2] * c2 as f64).exp();
                for c1 in 0..self.b[1] {
                    let ph1 = ph2 * Complex::new(0., 2. * PI * k_t[1] * c1 as f64).exp();
                    for c0 in 0..self.b[0] {
                        composite[copy] =
                            ph1 * Complex::new(0., 2. * PI * k_t[0] * c0 as f64).exp();
                        copy += 1;
                    }
                }
            }
            for (block_row, row_phase) in composite.iter().enumerate() {
                for (block_col, col_phase) in composite.iter().enumerate() {
                    let block = weight * row_phase * col_phase.conj();
                    for r in 0..n {
                        for c in 0..n {
                            out[[block_row * n + r, block_col * n + c]] +=
                                matrix[[r, c]] * block;
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Drive `f` over the expansion points of `k` and assemble the supercell matrix
    pub fn unfold_with<F>(&self, k: &[f64; 3], mut f: F) -> Result<Array2<Complex<f64>>, BuildError>
    where
        F: FnMut(&[f64; 3]) -> Result<Array2<Complex<f64>>, BuildError>,
    {
        let points = self.unfold_points(k);
        let matrices = points
            .iter()
            .map(|k_t| f(k_t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.unfold(&matrices, &points)?)
    }
}
