//! # Hamiltonian
//!
//! The tight-binding model tying the kernels together. A [`TightBinding`] couples a
//! [`Lattice`] and the Cartesian orbital positions to a real-space sparse Hamiltonian
//! of shape `no x no * n_s`, and optionally a same-shaped overlap for non-orthogonal
//! bases. The model is constructed through the `TightBindingBuilder` as
//!
//! ```ignore
//! TightBindingBuilder::default()
//!     .with_lattice(lattice)
//!     .with_orbitals(orbitals)
//!     .with_hamiltonian(hamiltonian)
//!     .build()?;
//! ```
//!
//! Once built, the model exposes the k-space operators (`hk`, `sk` and their
//! Cartesian derivatives), Hermitian and Cholesky-reduced generalized eigensolves,
//! and the post-processing operations built on them: band structures over a path,
//! Gaussian-broadened densities of states over a Monkhorst-Pack grid, and
//! Hellmann-Feynman band velocities.

use crate::{
    brillouin::MonkhorstPack,
    constants::HBAR_EV,
    error::{BuildError, SolveError},
    fold,
    lattice::Lattice,
    phase::{Gauge, Phases},
    sparse::SparseCsr,
};
use nalgebra::{Cholesky, DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView2};
use num_complex::Complex;
use num_traits::Zero;
use rayon::prelude::*;
use std::f64::consts::PI;

/// A tight-binding model on a periodic lattice
#[derive(Clone, Debug)]
pub struct TightBinding {
    /// The lattice carrying the supercell image table
    lattice: Lattice,
    /// Cartesian orbital positions of the unit cell, shape `(no, 3)`
    orbitals: Array2<f64>,
    /// The real-space Hamiltonian, shape `(no, no * n_s)`, in eV
    h: SparseCsr<Complex<f64>>,
    /// The real-space overlap for non-orthogonal bases, same shape as `h`
    s: Option<SparseCsr<Complex<f64>>>,
}

impl TightBinding {
    /// The number of orbitals in the unit cell
    pub fn num_orbitals(&self) -> usize {
        self.orbitals.nrows()
    }

    /// The lattice the model lives on
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// The Cartesian orbital positions, shape `(no, 3)`
    pub fn orbitals(&self) -> ArrayView2<'_, f64> {
        self.orbitals.view()
    }

    /// The real-space Hamiltonian
    pub fn hamiltonian(&self) -> &SparseCsr<Complex<f64>> {
        &self.h
    }

    /// The real-space overlap, if the basis is non-orthogonal
    pub fn overlap(&self) -> Option<&SparseCsr<Complex<f64>>> {
        self.s.as_ref()
    }

    /// Whether the real-space Hamiltonian is Hermitian under image conjugation
    ///
    /// Every stored element `H[i, isc * no + j]` must match the conjugate of its
    /// partner `H[j, conj(isc) * no + i]`; missing partners count as zero.
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        let no = self.num_orbitals();
        for i in 0..no {
            for (col, &value) in self.h.iter_row(i) {
                let (isc, j) = (col / no, col % no);
                let partner_col = self.lattice.conjugate_index(isc) * no + i;
                let partner = self
                    .h
                    .get(j, partner_col)
                    .copied()
                    .unwrap_or_else(Complex::zero);
                if (value - partner.conj()).norm() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    fn phases(&self, k: &[f64; 3], gauge: Gauge) -> Result<Phases, BuildError> {
        Phases::build(&self.lattice, self.orbitals.view(), k, gauge)
    }

    /// The dense k-space Hamiltonian
    pub fn hk(&self, k: &[f64; 3], gauge: Gauge) -> Result<Array2<Complex<f64>>, BuildError> {
        fold::k_dense(&self.h, &self.phases(k, gauge)?)
    }

    /// The k-space Hamiltonian in CSR form
    pub fn hk_sparse(
        &self,
        k: &[f64; 3],
        gauge: Gauge,
    ) -> Result<sprs::CsMat<Complex<f64>>, BuildError> {
        fold::k_sparse(&self.h, &self.phases(k, gauge)?)
    }

    /// The three Cartesian k-derivatives of the Hamiltonian, in eV Angstrom
    pub fn dhk(
        &self,
        k: &[f64; 3],
        gauge: Gauge,
    ) -> Result<[Array2<Complex<f64>>; 3], BuildError> {
        fold::dk_dense(&self.h, &self.phases(k, gauge)?)
    }

    /// The dense k-space overlap; the identity when the basis is orthogonal
    pub fn sk(&self, k: &[f64; 3], gauge: Gauge) -> Result<Array2<Complex<f64>>, BuildError> {
        match &self.s {
            Some(s) => fold::k_dense(s, &self.phases(k, gauge)?),
            None => Ok(Array2::<f64>::eye(self.num_orbitals()).mapv(Complex::from)),
        }
    }

    /// The k-space overlap in CSR form; the identity when the basis is orthogonal
    pub fn sk_sparse(
        &self,
        k: &[f64; 3],
        gauge: Gauge,
    ) -> Result<sprs::CsMat<Complex<f64>>, BuildError> {
        match &self.s {
            Some(s) => fold::k_sparse(s, &self.phases(k, gauge)?),
            None => Ok(sprs::CsMat::eye(self.num_orbitals())),
        }
    }

    /// The Cartesian k-derivatives of the overlap; zero when the basis is orthogonal
    pub fn dsk(
        &self,
        k: &[f64; 3],
        gauge: Gauge,
    ) -> Result<[Array2<Complex<f64>>; 3], BuildError> {
        match &self.s {
            Some(s) => fold::dk_dense(s, &self.phases(k, gauge)?),
            None => {
                let no = self.num_orbitals();
                Ok([
                    Array2::zeros((no, no)),
                    Array2::zeros((no, no)),
                    Array2::zeros((no, no)),
                ])
            }
        }
    }

    /// The eigenvalues at `k`, ascending, in eV
    ///
    /// With an overlap attached the generalized problem `H psi = e S psi` is reduced
    /// to standard form through the Cholesky factorization `S = L L^H`.
    pub fn eigenvalues(&self, k: &[f64; 3], gauge: Gauge) -> Result<Vec<f64>, SolveError> {
        Ok(self.eigenpairs(k, gauge)?.0)
    }

    /// The eigenvalues and eigenvectors at `k`
    ///
    /// Eigenvalues are ascending and the eigenvector columns follow the same order.
    /// With an overlap attached the vectors are S-orthonormal, `psi^H S psi = 1`.
    pub fn eigenpairs(
        &self,
        k: &[f64; 3],
        gauge: Gauge,
    ) -> Result<(Vec<f64>, DMatrix<Complex<f64>>), SolveError> {
        let h = to_dmatrix(&self.hk(k, gauge)?);
        let (reduced, factor) = match &self.s {
            None => (h, None),
            Some(_) => {
                let s = to_dmatrix(&self.sk(k, gauge)?);
                let cholesky =
                    Cholesky::new(s).ok_or(SolveError::OverlapNotPositiveDefinite(*k))?;
                let l = cholesky.l();
                let y = l
                    .solve_lower_triangular(&h)
                    .ok_or(SolveError::Reduction(*k))?;
                let reduced = l
                    .solve_lower_triangular(&y.adjoint())
                    .ok_or(SolveError::Reduction(*k))?
                    .adjoint();
                (reduced, Some(l))
            }
        };

        let eigen = SymmetricEigen::new(reduced);
        let vectors = match factor {
            None => eigen.eigenvectors,
            // Back-transform the reduced vectors, psi = L^-H phi
            Some(l) => l
                .adjoint()
                .solve_upper_triangular(&eigen.eigenvectors)
                .ok_or(SolveError::Reduction(*k))?,
        };

        let n = eigen.eigenvalues.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
        let values = order.iter().map(|&band| eigen.eigenvalues[band]).collect();
        let vectors = DMatrix::from_fn(n, n, |row, col| vectors[(row, order[col])]);
        Ok((values, vectors))
    }

    /// The band energies over a set of k-points, shape `(nk, no)`, in parallel
    #[tracing::instrument(name = "Band structure", level = "info", skip_all, fields(points = kpts.len()))]
    pub fn band_structure(
        &self,
        kpts: &[[f64; 3]],
        gauge: Gauge,
    ) -> Result<Array2<f64>, SolveError> {
        let bands: Vec<Vec<f64>> = kpts
            .par_iter()
            .map(|k| self.eigenvalues(k, gauge))
            .collect::<Result<_, _>>()?;
        let no = self.num_orbitals();
        let mut out = Array2::zeros((kpts.len(), no));
        for (row, band) in bands.iter().enumerate() {
            for (col, &energy) in band.iter().enumerate() {
                out[[row, col]] = energy;
            }
        }
        Ok(out)
    }

    /// Hellmann-Feynman band velocities at `k`, shape `(no, 3)`, in Angstrom per second
    ///
    /// The diagonal approximation `v_n = Re <n| dH - e_n dS |n> / hbar`, which is
    /// exact away from degeneracies.
    pub fn velocities(&self, k: &[f64; 3], gauge: Gauge) -> Result<Array2<f64>, SolveError> {
        let (values, vectors) = self.eigenpairs(k, gauge)?;
        let dh = self.dhk(k, gauge)?;
        let ds = self.dsk(k, gauge)?;
        let no = self.num_orbitals();
        let mut out = Array2::zeros((no, 3));
        for alpha in 0..3 {
            let dh_alpha = to_dmatrix(&dh[alpha]);
            let ds_alpha = to_dmatrix(&ds[alpha]);
            for band in 0..no {
                let psi = vectors.column(band);
                let expectation = psi.dotc(&(&dh_alpha * psi))
                    - Complex::from(values[band]) * psi.dotc(&(&ds_alpha * psi));
                out[[band, alpha]] = expectation.re / HBAR_EV;
            }
        }
        Ok(out)
    }

    /// The Gaussian-broadened density of states on a Monkhorst-Pack grid
    ///
    /// Evaluated at `energies` (eV) with standard deviation `broadening` (eV), in
    /// parallel over the grid. The result integrates to the orbital count over a
    /// wide enough energy window.
    #[tracing::instrument(name = "Density of states", level = "info", skip_all, fields(points = grid.num_points()))]
    pub fn density_of_states(
        &self,
        grid: &MonkhorstPack,
        energies: &[f64],
        broadening: f64,
        gauge: Gauge,
    ) -> Result<Array1<f64>, SolveError> {
        if broadening <= 0. {
            return Err(SolveError::Build(BuildError::Dimension(format!(
                "the Gaussian broadening must be positive, got {}",
                broadening
            ))));
        }
        let prefactor = 1. / (broadening * (2. * PI).sqrt());
        let accumulated = grid
            .points()
            .par_iter()
            .map(|k| -> Result<Array1<f64>, SolveError> {
                let eigenvalues = self.eigenvalues(k, gauge)?;
                let mut local = Array1::zeros(energies.len());
                for energy_band in eigenvalues {
                    for (bin, &energy) in energies.iter().enumerate() {
                        let argument = (energy - energy_band) / broadening;
                        local[bin] += (-0.5 * argument * argument).exp();
                    }
                }
                Ok(local)
            })
            .try_reduce(|| Array1::zeros(energies.len()), |a, b| Ok(a + b))?;
        Ok(accumulated * (prefactor * grid.weight()))
    }
}

/// Builder for a `TightBinding` from a lattice, orbital table and real-space operators
pub struct TightBindingBuilder<LatticeRef, OrbitalsRef, HamiltonianRef> {
    lattice: LatticeRef,
    orbitals: OrbitalsRef,
    hamiltonian: HamiltonianRef,
    overlap: Option<SparseCsr<Complex<f64>>>,
}

impl Default for TightBindingBuilder<(), (), ()> {
    /// Initialize an empty instance of TightBindingBuilder
    fn default() -> Self {
        Self {
            lattice: (),
            orbitals: (),
            hamiltonian: (),
            overlap: None,
        }
    }
}

impl<LatticeRef, OrbitalsRef, HamiltonianRef>
    TightBindingBuilder<LatticeRef, OrbitalsRef, HamiltonianRef>
{
    /// Attach the lattice
    pub fn with_lattice(
        self,
        lattice: Lattice,
    ) -> TightBindingBuilder<Lattice, OrbitalsRef, HamiltonianRef> {
        TightBindingBuilder {
            lattice,
            orbitals: self.orbitals,
            hamiltonian: self.hamiltonian,
            overlap: self.overlap,
        }
    }

    /// Attach the Cartesian orbital positions, shape `(no, 3)`
    pub fn with_orbitals(
        self,
        orbitals: Array2<f64>,
    ) -> TightBindingBuilder<LatticeRef, Array2<f64>, HamiltonianRef> {
        TightBindingBuilder {
            lattice: self.lattice,
            orbitals,
            hamiltonian: self.hamiltonian,
            overlap: self.overlap,
        }
    }

    /// Attach the real-space Hamiltonian
    pub fn with_hamiltonian(
        self,
        hamiltonian: SparseCsr<Complex<f64>>,
    ) -> TightBindingBuilder<LatticeRef, OrbitalsRef, SparseCsr<Complex<f64>>> {
        TightBindingBuilder {
            lattice: self.lattice,
            orbitals: self.orbitals,
            hamiltonian,
            overlap: self.overlap,
        }
    }

    /// Attach a real-space overlap for a non-orthogonal basis
    pub fn with_overlap(mut self, overlap: SparseCsr<Complex<f64>>) -> Self {
        self.overlap = Some(overlap);
        self
    }
}

impl TightBindingBuilder<Lattice, Array2<f64>, SparseCsr<Complex<f64>>> {
    /// Builds an instance of `TightBinding`, validating the table shapes
    #[tracing::instrument(name = "TightBinding Builder", level = "info", skip(self))]
    pub fn build(self) -> Result<TightBinding, BuildError> {
        if self.orbitals.ncols() != 3 {
            return Err(BuildError::Dimension(format!(
                "orbital positions must be Cartesian triples, got width {}",
                self.orbitals.ncols()
            )));
        }
        let no = self.orbitals.nrows();
        if no == 0 {
            return Err(BuildError::Dimension(
                "a model needs at least one orbital".into(),
            ));
        }
        let expected = (no, no * self.lattice.num_supercells());
        if self.hamiltonian.shape() != expected {
            return Err(BuildError::Dimension(format!(
                "the Hamiltonian must be {} x {} for this lattice, got {} x {}",
                expected.0,
                expected.1,
                self.hamiltonian.nrows(),
                self.hamiltonian.ncols()
            )));
        }
        if let Some(overlap) = &self.overlap {
            if overlap.shape() != expected {
                return Err(BuildError::Dimension(format!(
                    "the overlap must match the Hamiltonian shape {} x {}, got {} x {}",
                    expected.0,
                    expected.1,
                    overlap.nrows(),
                    overlap.ncols()
                )));
            }
        }
        tracing::trace!("assembled a model with {} orbitals", no);
        Ok(TightBinding {
            lattice: self.lattice,
            orbitals: self.orbitals,
            h: self.hamiltonian,
            s: self.overlap,
        })
    }
}

fn to_dmatrix(matrix: &Array2<Complex<f64>>) -> DMatrix<Complex<f64>> {
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |row, col| matrix[[row, col]])
}

#[cfg(test)]
mod test {
    use super::{TightBinding, TightBindingBuilder};
    use crate::{
        brillouin::MonkhorstPack,
        constants::HBAR_EV,
        error::SolveError,
        lattice::Lattice,
        phase::Gauge,
        sparse::{CsrBuilder, SparseCsr},
    };
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use num_complex::Complex;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::PI;

    /// Single-orbital chain with hopping `t` and optional overlap element `s`
    fn chain(t: f64, s: Option<f64>) -> TightBinding {
        let lattice = Lattice::new(Array2::eye(3), [3, 1, 1]).unwrap();
        let forward = lattice.sc_index([1, 0, 0]).unwrap();
        let backward = lattice.sc_index([-1, 0, 0]).unwrap();
        let home = lattice.sc_index([0, 0, 0]).unwrap();
        let hamiltonian = SparseCsr::from_triplets(
            1,
            3,
            [
                (0, forward, Complex::from(t)),
                (0, backward, Complex::from(t)),
            ],
        )
        .unwrap();
        let builder = TightBindingBuilder::default()
            .with_lattice(lattice)
            .with_orbitals(Array2::zeros((1, 3)))
            .with_hamiltonian(hamiltonian);
        match s {
            None => builder.build().unwrap(),
            Some(s) => {
                let overlap = SparseCsr::from_triplets(
                    1,
                    3,
                    [
                        (0, home, Complex::from(1.)),
                        (0, forward, Complex::from(s)),
                        (0, backward, Complex::from(s)),
                    ],
                )
                .unwrap();
                builder.with_overlap(overlap).build().unwrap()
            }
        }
    }

    /// A Hermitian random two-orbital model on a cubic lattice
    fn random_model(seed: u64) -> TightBinding {
        let mut rng = StdRng::seed_from_u64(seed);
        let lattice = Lattice::new(Array2::eye(3), [3, 3, 3]).unwrap();
        let no = 2;
        let mut orbitals = Array2::zeros((no, 3));
        for mut row in orbitals.rows_mut() {
            for x in row.iter_mut() {
                *x = rng.gen_range(0.0..1.0);
            }
        }
        let mut builder = CsrBuilder::new(no, no * lattice.num_supercells());
        for isc in 0..lattice.num_supercells() {
            let conjugate = lattice.conjugate_index(isc);
            for i in 0..no {
                for j in 0..no {
                    if rng.gen_bool(0.6) {
                        continue;
                    }
                    let value = Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                    builder.insert(i, isc * no + j, value).unwrap();
                    builder.insert(j, conjugate * no + i, value.conj()).unwrap();
                }
            }
        }
        TightBindingBuilder::default()
            .with_lattice(lattice)
            .with_orbitals(orbitals)
            .with_hamiltonian(builder.build())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_rejects_mismatched_tables() {
        let lattice = Lattice::new(Array2::eye(3), [3, 1, 1]).unwrap();
        // Hamiltonian sized for a single image instead of three
        let hamiltonian = SparseCsr::<Complex<f64>>::from_triplets(1, 1, []).unwrap();
        assert!(TightBindingBuilder::default()
            .with_lattice(lattice.clone())
            .with_orbitals(Array2::zeros((1, 3)))
            .with_hamiltonian(hamiltonian.clone())
            .build()
            .is_err());
        // Overlap disagreeing with the Hamiltonian shape
        let good = SparseCsr::<Complex<f64>>::from_triplets(1, 3, []).unwrap();
        assert!(TightBindingBuilder::default()
            .with_lattice(lattice)
            .with_orbitals(Array2::zeros((1, 3)))
            .with_hamiltonian(good)
            .with_overlap(hamiltonian)
            .build()
            .is_err());
    }

    #[test]
    fn real_space_hermiticity_check_accepts_hermitian_models() {
        let model = random_model(3);
        assert!(model.is_hermitian(1e-14));
    }

    #[test]
    fn real_space_hermiticity_check_rejects_broken_models() {
        let lattice = Lattice::new(Array2::eye(3), [3, 1, 1]).unwrap();
        let forward = lattice.sc_index([1, 0, 0]).unwrap();
        // A forward hop with no backward partner
        let hamiltonian =
            SparseCsr::from_triplets(1, 3, [(0, forward, Complex::from(1.))]).unwrap();
        let model = TightBindingBuilder::default()
            .with_lattice(lattice)
            .with_orbitals(Array2::zeros((1, 3)))
            .with_hamiltonian(hamiltonian)
            .build()
            .unwrap();
        assert!(!model.is_hermitian(1e-14));
    }

    #[test]
    fn chain_bands_follow_the_cosine_dispersion() {
        let t = -1.;
        let model = chain(t, None);
        for k in [0., 0.15, 0.5, -0.33] {
            let bands = model.eigenvalues(&[k, 0., 0.], Gauge::Lattice).unwrap();
            assert_eq!(bands.len(), 1);
            assert_relative_eq!(bands[0], 2. * t * (2. * PI * k).cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn eigenvalues_are_gauge_independent() {
        let model = random_model(17);
        for k in [[0.1, 0.2, 0.3], [-0.4, 0.05, 0.]] {
            let lattice_gauge = model.eigenvalues(&k, Gauge::Lattice).unwrap();
            let orbital_gauge = model.eigenvalues(&k, Gauge::Orbital).unwrap();
            for (a, b) in lattice_gauge.iter().zip(&orbital_gauge) {
                assert_relative_eq!(a, b, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn eigenvalues_ascend() {
        let model = random_model(23);
        let bands = model.eigenvalues(&[0.12, 0.34, -0.21], Gauge::Lattice).unwrap();
        assert!(bands.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn identity_overlap_reproduces_the_orthogonal_solve() {
        let t = -0.8;
        let orthogonal = chain(t, None);
        let with_identity = chain(t, Some(0.));
        for k in [0., 0.2, 0.45] {
            let a = orthogonal.eigenvalues(&[k, 0., 0.], Gauge::Lattice).unwrap();
            let b = with_identity
                .eigenvalues(&[k, 0., 0.], Gauge::Lattice)
                .unwrap();
            assert_relative_eq!(a[0], b[0], epsilon = 1e-12);
        }
    }

    #[test]
    fn generalized_solve_matches_the_analytic_nonorthogonal_band() {
        let (t, s) = (-1., 0.2);
        let model = chain(t, Some(s));
        for k in [0., 0.1, 0.37, -0.25] {
            let theta = 2. * PI * k;
            let expected = 2. * t * theta.cos() / (1. + 2. * s * theta.cos());
            let bands = model.eigenvalues(&[k, 0., 0.], Gauge::Lattice).unwrap();
            assert_relative_eq!(bands[0], expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn indefinite_overlap_is_reported_not_propagated_as_garbage() {
        let model = chain(-1., Some(0.6));
        // S(k) = 1 + 1.2 cos(2 pi k) turns negative at the zone boundary
        let result = model.eigenvalues(&[0.5, 0., 0.], Gauge::Lattice);
        assert!(matches!(
            result,
            Err(SolveError::OverlapNotPositiveDefinite(_))
        ));
    }

    #[test]
    fn band_structure_rows_match_single_point_solves() {
        let model = random_model(31);
        let kpts = [[0., 0., 0.], [0.25, 0., 0.], [0.1, 0.1, 0.1]];
        let bands = model.band_structure(&kpts, Gauge::Lattice).unwrap();
        assert_eq!(bands.shape(), &[3, 2]);
        for (row, k) in kpts.iter().enumerate() {
            let single = model.eigenvalues(k, Gauge::Lattice).unwrap();
            for (col, &energy) in single.iter().enumerate() {
                assert_relative_eq!(bands[[row, col]], energy, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn chain_velocities_match_the_analytic_derivative() {
        let t = -1.;
        let model = chain(t, None);
        for k in [0.1, 0.3, -0.2] {
            let velocities = model.velocities(&[k, 0., 0.], Gauge::Lattice).unwrap();
            let expected = -2. * t * (2. * PI * k).sin() / HBAR_EV;
            assert_relative_eq!(velocities[[0, 0]], expected, max_relative = 1e-10);
            assert_relative_eq!(velocities[[0, 1]], 0., epsilon = 1e-6);
            assert_relative_eq!(velocities[[0, 2]], 0., epsilon = 1e-6);
        }
    }

    #[test]
    fn velocities_vanish_at_band_extrema() {
        let model = chain(-1., None);
        for k in [0., 0.5] {
            let velocities = model.velocities(&[k, 0., 0.], Gauge::Lattice).unwrap();
            // The sine vanishes there; allow for the 1 / hbar amplification
            assert!(velocities[[0, 0]].abs() < 1e-3);
        }
    }

    #[test]
    fn density_of_states_integrates_to_the_orbital_count() {
        let model = chain(-1., None);
        let grid = MonkhorstPack::new([64, 1, 1]).unwrap();
        let energies: Vec<f64> = (0..801).map(|i| -4. + i as f64 * 0.01).collect();
        let dos = model
            .density_of_states(&grid, &energies, 0.1, Gauge::Lattice)
            .unwrap();
        let integral: f64 = dos.iter().sum::<f64>() * 0.01;
        assert_relative_eq!(integral, 1., epsilon = 1e-2);
    }

    #[test]
    fn negative_broadening_is_rejected() {
        let model = chain(-1., None);
        let grid = MonkhorstPack::new([2, 1, 1]).unwrap();
        assert!(model
            .density_of_states(&grid, &[0.], -0.1, Gauge::Lattice)
            .is_err());
    }
}
