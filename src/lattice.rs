//! # Lattice
//!
//! Periodic lattice and supercell bookkeeping. A `Lattice` couples the unit cell (rows
//! are lattice vectors, in Angstrom) to the table of periodic images retained by a
//! model. Images are counted by `nsc`, an odd number of supercells along each lattice
//! vector, and enumerated FFT-style: along each axis the integer offsets run
//! `0, 1, .., m, -m, .., -1` with `m = nsc / 2`, the first axis varying fastest. The
//! home cell `[0, 0, 0]` therefore always sits at image index zero, which the sparse
//! operators rely on when laying out their column blocks.

use crate::error::BuildError;
use ndarray::{Array2, ArrayView2};
use std::f64::consts::PI;

/// A periodic lattice with its retained supercell images
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    /// The unit cell, rows are lattice vectors in Angstrom
    cell: Array2<f64>,
    /// The number of supercells along each lattice vector, odd
    nsc: [usize; 3],
    /// The integer supercell offsets in the normative FFT ordering
    sc_off: Vec<[isize; 3]>,
}

impl Lattice {
    /// Build a lattice from a `3 x 3` cell and the number of supercells along each axis
    ///
    /// Fails if the cell is not `3 x 3` or is singular, or if any element of `nsc` is
    /// even or zero.
    pub fn new(cell: Array2<f64>, nsc: [usize; 3]) -> Result<Self, BuildError> {
        if cell.shape() != [3, 3] {
            return Err(BuildError::Lattice(format!(
                "the cell must be 3 x 3, got {:?}",
                cell.shape()
            )));
        }
        if nsc.iter().any(|&n| n == 0 || n % 2 == 0) {
            return Err(BuildError::Lattice(format!(
                "the number of supercells along each axis must be odd, got {:?}",
                nsc
            )));
        }
        let volume = as_matrix3(cell.view()).determinant();
        if volume.abs() < f64::EPSILON {
            return Err(BuildError::Lattice(
                "the cell is singular: lattice vectors must be linearly independent".into(),
            ));
        }
        let sc_off = supercell_offsets(nsc);
        Ok(Self { cell, nsc, sc_off })
    }

    /// The unit cell, rows are lattice vectors in Angstrom
    pub fn cell(&self) -> ArrayView2<'_, f64> {
        self.cell.view()
    }

    /// The number of supercells along each lattice vector
    pub fn nsc(&self) -> [usize; 3] {
        self.nsc
    }

    /// The total number of retained supercell images
    pub fn num_supercells(&self) -> usize {
        self.sc_off.len()
    }

    /// The integer supercell offsets in the normative ordering
    pub fn offsets(&self) -> &[[isize; 3]] {
        &self.sc_off
    }

    /// The integer offset of image `isc`
    ///
    /// Panics if `isc` exceeds the image count, matching slice indexing.
    pub fn offset(&self, isc: usize) -> [isize; 3] {
        self.sc_off[isc]
    }

    /// The image index of an integer offset, if the offset is retained by this lattice
    pub fn sc_index(&self, offset: [isize; 3]) -> Option<usize> {
        let mut index = 0;
        let mut stride = 1;
        for (ax, &c) in offset.iter().enumerate() {
            let n = self.nsc[ax] as isize;
            if c.abs() > n / 2 {
                return None;
            }
            let position = if c >= 0 { c } else { c + n } as usize;
            index += position * stride;
            stride *= self.nsc[ax];
        }
        Some(index)
    }

    /// The image index of the inverted offset `-c`, used by Hermitian pairing
    pub(crate) fn conjugate_index(&self, isc: usize) -> usize {
        let c = self.sc_off[isc];
        self.sc_index([-c[0], -c[1], -c[2]])
            .expect("the offset table is symmetric under inversion")
    }

    /// The Cartesian offset of image `isc` in Angstrom
    pub fn cartesian_offset(&self, isc: usize) -> [f64; 3] {
        let c = self.sc_off[isc];
        let mut r = [0_f64; 3];
        for (ax, r_ax) in r.iter_mut().enumerate() {
            *r_ax = (0..3)
                .map(|v| c[v] as f64 * self.cell[[v, ax]])
                .sum::<f64>();
        }
        r
    }

    /// The reciprocal cell `2 pi (cell^-1)^T`, rows are reciprocal lattice vectors
    pub fn reciprocal(&self) -> Array2<f64> {
        let inverse = as_matrix3(self.cell.view())
            .try_inverse()
            .expect("the cell was checked to be non-singular on construction");
        let mut reciprocal = Array2::zeros((3, 3));
        for row in 0..3 {
            for col in 0..3 {
                reciprocal[[row, col]] = 2. * PI * inverse[(col, row)];
            }
        }
        reciprocal
    }

    /// Transform a k-point from reduced to Cartesian coordinates (inverse Angstrom)
    pub fn k_cartesian(&self, k: &[f64; 3]) -> [f64; 3] {
        let reciprocal = self.reciprocal();
        let mut k_cart = [0_f64; 3];
        for (ax, k_ax) in k_cart.iter_mut().enumerate() {
            *k_ax = (0..3).map(|v| k[v] * reciprocal[[v, ax]]).sum::<f64>();
        }
        k_cart
    }

    /// The unit cell volume in cubic Angstrom
    pub fn volume(&self) -> f64 {
        as_matrix3(self.cell.view()).determinant().abs()
    }
}

/// Enumerate the integer supercell offsets in FFT order, first axis fastest
fn supercell_offsets(nsc: [usize; 3]) -> Vec<[isize; 3]> {
    let unfft = |index: usize, n: usize| -> isize {
        if index <= n / 2 {
            index as isize
        } else {
            index as isize - n as isize
        }
    };
    let mut offsets = Vec::with_capacity(nsc.iter().product());
    for i2 in 0..nsc[2] {
        for i1 in 0..nsc[1] {
            for i0 in 0..nsc[0] {
                offsets.push([unfft(i0, nsc[0]), unfft(i1, nsc[1]), unfft(i2, nsc[2])]);
            }
        }
    }
    offsets
}

fn as_matrix3(cell: ArrayView2<'_, f64>) -> nalgebra::Matrix3<f64> {
    nalgebra::Matrix3::from_fn(|row, col| cell[[row, col]])
}
