//! # Phase
//!
//! Bloch phase factors connecting the real-space operators to a k-point. The fold
//! kernels consume a [`Phases`] table rather than the k-point itself: building the
//! table once amortizes the trigonometry over every stored matrix element, and the
//! table also carries the Cartesian displacements the k-derivative kernels need.
//!
//! Two gauges are supported. In the lattice gauge the phase attached to an element
//! depends only on the supercell image of its column, `exp(i 2 pi k.c)`. In the
//! orbital gauge the element phase is `exp(i k.(r_j + R - r_i))`, resolved into a
//! per-column factor and a per-row factor so the kernels still apply one complex
//! multiply per stored element. Both gauges produce unitarily equivalent k-space
//! matrices; eigenvalues are gauge independent.

use crate::{error::BuildError, lattice::Lattice};
use ndarray::ArrayView2;
use num_complex::Complex;
use std::f64::consts::PI;

/// The gauge convention of the Bloch phases
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Gauge {
    /// Phases depend on the supercell image only, `exp(i 2 pi k.c)`
    Lattice,
    /// Phases resolve orbital positions, `exp(i k.(r_j + R - r_i))`
    Orbital,
}

/// Precomputed phase and displacement tables for one k-point
#[derive(Clone, Debug)]
pub struct Phases {
    gauge: Gauge,
    /// Per-image (lattice gauge) or per-column (orbital gauge) phase factors
    col: Vec<Complex<f64>>,
    /// Per-row factors, empty in the lattice gauge
    row: Vec<Complex<f64>>,
    /// Cartesian displacements matching `col`: `R` or `r_uc + R`
    col_displacements: Vec<[f64; 3]>,
    /// Orbital positions subtracted per row in the orbital gauge
    row_positions: Vec<[f64; 3]>,
    n_orbitals: usize,
    gamma: bool,
}

impl Phases {
    /// Build the phase tables for `k` (reduced coordinates) in the requested gauge
    ///
    /// `orbitals` are the Cartesian orbital positions of the unit cell, shape
    /// `(no, 3)`; the row count fixes the orbital block size of the fold kernels.
    pub fn build(
        lattice: &Lattice,
        orbitals: ArrayView2<'_, f64>,
        k: &[f64; 3],
        gauge: Gauge,
    ) -> Result<Self, BuildError> {
        if orbitals.ncols() != 3 {
            return Err(BuildError::Dimension(format!(
                "orbital positions must be Cartesian triples, got width {}",
                orbitals.ncols()
            )));
        }
        let n_orbitals = orbitals.nrows();
        if n_orbitals == 0 {
            return Err(BuildError::Dimension(
                "a model needs at least one orbital".into(),
            ));
        }

        let k_cart = lattice.k_cartesian(k);
        // k is periodic up to a reciprocal lattice vector in the lattice gauge; the
        // orbital gauge keeps the intra-cell factors so only k = 0 is trivial there.
        let on_lattice = k.iter().all(|&k_ax| (k_ax - k_ax.round()).abs() < 1e-12);
        let at_zero = k.iter().all(|&k_ax| k_ax.abs() < 1e-12);
        let gamma = match gauge {
            Gauge::Lattice => on_lattice,
            Gauge::Orbital => at_zero,
        };

        let num_images = lattice.num_supercells();
        let mut col = Vec::new();
        let mut col_displacements = Vec::new();
        let mut row = Vec::new();
        let mut row_positions = Vec::new();

        match gauge {
            Gauge::Lattice => {
                col.reserve(num_images);
                col_displacements.reserve(num_images);
                for isc in 0..num_images {
                    let c = lattice.offset(isc);
                    let argument =
                        2. * PI * (k[0] * c[0] as f64 + k[1] * c[1] as f64 + k[2] * c[2] as f64);
                    col.push(Complex::new(0., argument).exp());
                    col_displacements.push(lattice.cartesian_offset(isc));
                }
            }
            Gauge::Orbital => {
                col.reserve(num_images * n_orbitals);
                col_displacements.reserve(num_images * n_orbitals);
                row.reserve(n_orbitals);
                row_positions.reserve(n_orbitals);
                for isc in 0..num_images {
                    let c = lattice.offset(isc);
                    let lattice_argument =
                        2. * PI * (k[0] * c[0] as f64 + k[1] * c[1] as f64 + k[2] * c[2] as f64);
                    let image = lattice.cartesian_offset(isc);
                    for uc in 0..n_orbitals {
                        let position = [
                            orbitals[[uc, 0]] + image[0],
                            orbitals[[uc, 1]] + image[1],
                            orbitals[[uc, 2]] + image[2],
                        ];
                        let argument = lattice_argument
                            + k_cart[0] * orbitals[[uc, 0]]
                            + k_cart[1] * orbitals[[uc, 1]]
                            + k_cart[2] * orbitals[[uc, 2]];
                        col.push(Complex::new(0., argument).exp());
                        col_displacements.push(position);
                    }
                }
                for i in 0..n_orbitals {
                    let argument = k_cart[0] * orbitals[[i, 0]]
                        + k_cart[1] * orbitals[[i, 1]]
                        + k_cart[2] * orbitals[[i, 2]];
                    row.push(Complex::new(0., -argument).exp());
                    row_positions.push([orbitals[[i, 0]], orbitals[[i, 1]], orbitals[[i, 2]]]);
                }
            }
        }

        Ok(Self {
            gauge,
            col,
            row,
            col_displacements,
            row_positions,
            n_orbitals,
            gamma,
        })
    }

    /// The gauge the tables were built in
    pub fn gauge(&self) -> Gauge {
        self.gauge
    }

    /// True when every phase factor is exactly unity
    pub fn is_gamma(&self) -> bool {
        self.gamma
    }

    /// The orbital block size `no` of the associated operators
    pub fn num_orbitals(&self) -> usize {
        self.n_orbitals
    }

    /// The column count `no * n_s` the associated operators must have
    pub(crate) fn matrix_width(&self) -> usize {
        match self.gauge {
            Gauge::Lattice => self.col.len() * self.n_orbitals,
            Gauge::Orbital => self.col.len(),
        }
    }

    /// The combined phase factor of the stored element at `(row, col)`
    #[inline]
    pub(crate) fn factor(&self, row: usize, col: usize) -> Complex<f64> {
        match self.gauge {
            Gauge::Lattice => self.col[col / self.n_orbitals],
            Gauge::Orbital => self.row[row] * self.col[col],
        }
    }

    /// The Cartesian displacement entering the k-derivative of element `(row, col)`
    #[inline]
    pub(crate) fn displacement(&self, row: usize, col: usize) -> [f64; 3] {
        match self.gauge {
            Gauge::Lattice => self.col_displacements[col / self.n_orbitals],
            Gauge::Orbital => {
                let d = self.col_displacements[col];
                let r = self.row_positions[row];
                [d[0] - r[0], d[1] - r[1], d[2] - r[2]]
            }
        }
    }
}
