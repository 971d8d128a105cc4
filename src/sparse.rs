//! # Sparse storage
//!
//! Row-compressed storage for the real-space operators. A model retaining `n_s`
//! periodic images stores its Hamiltonian (and overlap) as an `no x no * n_s` matrix
//! where column `isc * no + uc` couples the row orbital to orbital `uc` in image
//! `isc`. The matrices are assembled incrementally through a [`CsrBuilder`] and
//! finalized into an immutable [`SparseCsr`] with strictly ascending column indices
//! in every row, the layout the fold kernels iterate over.

use crate::error::CsrError;
use num_traits::Zero;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// An immutable compressed sparse row matrix
///
/// Row `i` owns the half-open slice `offsets[i]..offsets[i + 1]` of the column and
/// data arrays, and its column indices are strictly ascending.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseCsr<T> {
    nrows: usize,
    ncols: usize,
    offsets: Vec<usize>,
    columns: Vec<usize>,
    data: Vec<T>,
}

impl<T> SparseCsr<T> {
    /// Reassemble a matrix from raw CSR arrays, validating the layout
    pub fn try_from_parts(
        nrows: usize,
        ncols: usize,
        offsets: Vec<usize>,
        columns: Vec<usize>,
        data: Vec<T>,
    ) -> Result<Self, CsrError> {
        if offsets.len() != nrows + 1 {
            return Err(CsrError::Layout(format!(
                "expected {} row offsets, got {}",
                nrows + 1,
                offsets.len()
            )));
        }
        if offsets[0] != 0 || *offsets.last().unwrap_or(&0) != columns.len() {
            return Err(CsrError::Layout(
                "row offsets must start at zero and end at the number of entries".into(),
            ));
        }
        if columns.len() != data.len() {
            return Err(CsrError::Layout(format!(
                "{} column indices disagree with {} stored values",
                columns.len(),
                data.len()
            )));
        }
        if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(CsrError::Layout("row offsets must be non-decreasing".into()));
        }
        for row in 0..nrows {
            let slice = &columns[offsets[row]..offsets[row + 1]];
            if slice.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(CsrError::Layout(format!(
                    "columns in row {} are not strictly ascending",
                    row
                )));
            }
            if let Some(&last) = slice.last() {
                if last >= ncols {
                    return Err(CsrError::Column {
                        column: last,
                        ncols,
                    });
                }
            }
        }
        Ok(Self {
            nrows,
            ncols,
            offsets,
            columns,
            data,
        })
    }

    /// The `(rows, columns)` shape of the matrix
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// The number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// The number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// The number of explicitly stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// The fraction of the full matrix which is explicitly stored
    pub fn density(&self) -> f64 {
        self.nnz() as f64 / (self.nrows * self.ncols) as f64
    }

    /// The row offset array, length `nrows + 1`
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The column indices of every stored entry, row-major
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// The stored values, row-major
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// The column indices and values of row `row`
    pub fn row(&self, row: usize) -> (&[usize], &[T]) {
        let span = self.offsets[row]..self.offsets[row + 1];
        (&self.columns[span.clone()], &self.data[span])
    }

    /// Iterate over the `(column, value)` pairs of row `row`
    pub fn iter_row(&self, row: usize) -> impl Iterator<Item = (usize, &T)> + '_ {
        let (columns, values) = self.row(row);
        columns.iter().copied().zip(values.iter())
    }

    /// Look up the stored value at `(row, column)`, if one exists
    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        let (columns, values) = self.row(row);
        columns
            .binary_search(&column)
            .ok()
            .map(|position| &values[position])
    }
}

impl<T: Copy + Zero + AddAssign> SparseCsr<T> {
    /// Assemble a matrix from `(row, column, value)` triplets, accumulating duplicates
    pub fn from_triplets<I>(
        nrows: usize,
        ncols: usize,
        triplets: I,
    ) -> Result<Self, CsrError>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut builder = CsrBuilder::new(nrows, ncols);
        for (row, column, value) in triplets {
            builder.insert(row, column, value)?;
        }
        Ok(builder.build())
    }
}

/// An incremental assembler for [`SparseCsr`] matrices
///
/// Entries arrive in any order; duplicates accumulate. Rows are kept as ordered maps
/// so finalization is a straight concatenation.
#[derive(Clone, Debug)]
pub struct CsrBuilder<T> {
    nrows: usize,
    ncols: usize,
    rows: Vec<BTreeMap<usize, T>>,
}

impl<T: Copy + Zero + AddAssign> CsrBuilder<T> {
    /// Create an empty builder for an `nrows x ncols` matrix
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            rows: vec![BTreeMap::new(); nrows],
        }
    }

    /// Add `value` at `(row, column)`, accumulating onto any previous entry
    pub fn insert(&mut self, row: usize, column: usize, value: T) -> Result<(), CsrError> {
        if row >= self.nrows {
            return Err(CsrError::Row {
                row,
                nrows: self.nrows,
            });
        }
        if column >= self.ncols {
            return Err(CsrError::Column {
                column,
                ncols: self.ncols,
            });
        }
        *self.rows[row].entry(column).or_insert_with(T::zero) += value;
        Ok(())
    }

    /// The number of entries currently held
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    /// Finalize into an immutable matrix
    pub fn build(self) -> SparseCsr<T> {
        let nnz = self.nnz();
        let mut offsets = Vec::with_capacity(self.nrows + 1);
        let mut columns = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        offsets.push(0);
        for row in self.rows {
            for (column, value) in row {
                columns.push(column);
                data.push(value);
            }
            offsets.push(columns.len());
        }
        SparseCsr {
            nrows: self.nrows,
            ncols: self.ncols,
            offsets,
            columns,
            data,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CsrBuilder, SparseCsr};
    use crate::error::CsrError;

    #[test]
    fn builder_accumulates_duplicate_entries() {
        let mut builder = CsrBuilder::new(2, 4);
        builder.insert(0, 1, 1.5).unwrap();
        builder.insert(0, 1, 0.5).unwrap();
        builder.insert(1, 3, -1.).unwrap();
        let matrix = builder.build();
        assert_eq!(matrix.nnz(), 2);
        assert_eq!(matrix.get(0, 1), Some(&2.));
        assert_eq!(matrix.get(1, 3), Some(&-1.));
        assert_eq!(matrix.get(1, 0), None);
    }

    #[test]
    fn rows_finalize_with_ascending_columns() {
        let matrix = SparseCsr::from_triplets(
            1,
            6,
            [(0, 4, 1.), (0, 0, 2.), (0, 2, 3.)],
        )
        .unwrap();
        let (columns, values) = matrix.row(0);
        assert_eq!(columns, &[0, 2, 4]);
        assert_eq!(values, &[2., 3., 1.]);
    }

    #[test]
    fn out_of_bounds_insertion_is_an_error_not_a_panic() {
        let mut builder = CsrBuilder::new(2, 2);
        assert!(matches!(
            builder.insert(2, 0, 1.),
            Err(CsrError::Row { row: 2, nrows: 2 })
        ));
        assert!(matches!(
            builder.insert(0, 5, 1.),
            Err(CsrError::Column { column: 5, ncols: 2 })
        ));
    }

    #[test]
    fn empty_rows_are_legal() {
        let matrix = SparseCsr::<f64>::from_triplets(3, 3, [(2, 0, 1.)]).unwrap();
        assert_eq!(matrix.row(0).0.len(), 0);
        assert_eq!(matrix.row(1).0.len(), 0);
        assert_eq!(matrix.iter_row(2).count(), 1);
    }

    #[test]
    fn raw_parts_round_trip_through_validation() {
        let matrix = SparseCsr::from_triplets(2, 3, [(0, 0, 1.), (0, 2, 2.), (1, 1, 3.)]).unwrap();
        let rebuilt = SparseCsr::try_from_parts(
            2,
            3,
            matrix.offsets().to_vec(),
            matrix.columns().to_vec(),
            matrix.values().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, matrix);
    }

    #[test]
    fn malformed_raw_parts_are_rejected() {
        // Offsets not covering the data
        assert!(SparseCsr::try_from_parts(1, 3, vec![0, 1], vec![0, 1], vec![1., 2.]).is_err());
        // Unsorted columns within a row
        assert!(
            SparseCsr::try_from_parts(1, 3, vec![0, 2], vec![2, 0], vec![1., 2.]).is_err()
        );
        // Column beyond the matrix width
        assert!(SparseCsr::try_from_parts(1, 2, vec![0, 1], vec![2], vec![1.]).is_err());
        // Decreasing offsets
        assert!(
            SparseCsr::try_from_parts(2, 3, vec![0, 2, 1], vec![0, 1, 2], vec![1., 2., 3.])
                .is_err()
        );
    }
}
