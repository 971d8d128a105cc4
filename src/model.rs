//! # Model
//!
//! Native model descriptions read from disk. A model file is a `.toml` document
//! carrying the lattice, the Cartesian orbital positions and the real-space matrix
//! elements; it is deserialized through the `config` crate and assembled into a
//! [`TightBinding`]. Matrix elements are inserted verbatim: a Hermitian model lists
//! both directions of every hop (the assembled model can be audited with
//! [`TightBinding::is_hermitian`]).

use crate::{
    error::BuildError,
    hamiltonian::{TightBinding, TightBindingBuilder},
    lattice::Lattice,
    sparse::CsrBuilder,
};
use color_eyre::eyre::eyre;
use config::{Config, File};
use ndarray::Array2;
use num_complex::Complex;
use serde::Deserialize;
use std::path::PathBuf;

/// A model description as laid out in a `.toml` file
#[derive(Debug, Deserialize)]
pub struct ModelFile {
    /// The unit cell, rows are lattice vectors in Angstrom
    pub cell: [[f64; 3]; 3],
    /// The number of supercells along each lattice vector
    pub nsc: [usize; 3],
    /// Cartesian orbital positions in Angstrom
    pub orbitals: Vec<[f64; 3]>,
    /// Hamiltonian matrix elements in eV
    pub hoppings: Vec<MatrixElement>,
    /// Overlap matrix elements; empty for an orthogonal basis
    #[serde(default)]
    pub overlaps: Vec<MatrixElement>,
}

/// A single real-space matrix element
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    /// The integer supercell offset carrying the column orbital
    pub offset: [isize; 3],
    /// The row orbital
    pub i: usize,
    /// The column orbital, in the cell displaced by `offset`
    pub j: usize,
    /// The real part of the element
    pub value: f64,
    /// The imaginary part of the element
    #[serde(default)]
    pub imag: f64,
}

impl ModelFile {
    /// Read a model description from `path`
    pub fn build(path: PathBuf) -> color_eyre::Result<Self> {
        let s = Config::builder().add_source(File::from(path)).build()?;
        s.try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize model: {:?}", e))
    }

    /// Assemble the description into a `TightBinding` model
    pub fn assemble(&self) -> Result<TightBinding, BuildError> {
        let cell = Array2::from_shape_fn((3, 3), |(row, col)| self.cell[row][col]);
        let lattice = Lattice::new(cell, self.nsc)?;
        let no = self.orbitals.len();
        let mut orbitals = Array2::zeros((no, 3));
        for (row, position) in self.orbitals.iter().enumerate() {
            for (col, &x) in position.iter().enumerate() {
                orbitals[[row, col]] = x;
            }
        }

        let hamiltonian = assemble_matrix(&lattice, no, &self.hoppings)?;
        let builder = TightBindingBuilder::default()
            .with_lattice(lattice.clone())
            .with_orbitals(orbitals)
            .with_hamiltonian(hamiltonian);
        if self.overlaps.is_empty() {
            builder.build()
        } else {
            let overlap = assemble_matrix(&lattice, no, &self.overlaps)?;
            builder.with_overlap(overlap).build()
        }
    }
}

fn assemble_matrix(
    lattice: &Lattice,
    no: usize,
    elements: &[MatrixElement],
) -> Result<crate::sparse::SparseCsr<Complex<f64>>, BuildError> {
    let mut builder = CsrBuilder::new(no, no * lattice.num_supercells());
    for element in elements {
        let isc = lattice.sc_index(element.offset).ok_or_else(|| {
            BuildError::Dimension(format!(
                "offset {:?} is outside the supercell range {:?}",
                element.offset,
                lattice.nsc()
            ))
        })?;
        builder.insert(
            element.i,
            isc * no + element.j,
            Complex::new(element.value, element.imag),
        )?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod test {
    use super::ModelFile;
    use crate::phase::Gauge;
    use approx::assert_relative_eq;
    use config::{Config, File, FileFormat};

    fn parse(document: &str) -> ModelFile {
        Config::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn a_chain_model_assembles_and_solves() {
        let model_file = parse(
            r#"
            cell = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
            nsc = [3, 1, 1]
            orbitals = [[0.0, 0.0, 0.0]]

            [[hoppings]]
            offset = [1, 0, 0]
            i = 0
            j = 0
            value = -1.0

            [[hoppings]]
            offset = [-1, 0, 0]
            i = 0
            j = 0
            value = -1.0
        "#,
        );
        let model = model_file.assemble().unwrap();
        assert!(model.is_hermitian(1e-14));
        let bands = model.eigenvalues(&[0., 0., 0.], Gauge::Lattice).unwrap();
        assert_relative_eq!(bands[0], -2., epsilon = 1e-12);
    }

    #[test]
    fn offsets_outside_the_supercell_range_are_rejected() {
        let model_file = parse(
            r#"
            cell = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
            nsc = [1, 1, 1]
            orbitals = [[0.0, 0.0, 0.0]]

            [[hoppings]]
            offset = [1, 0, 0]
            i = 0
            j = 0
            value = -1.0
        "#,
        );
        assert!(model_file.assemble().is_err());
    }

    #[test]
    fn the_sample_model_on_disk_assembles() {
        let model_file = ModelFile::build(".config/model.toml".into()).unwrap();
        let model = model_file.assemble().unwrap();
        assert!(model.is_hermitian(1e-14));
    }
}
