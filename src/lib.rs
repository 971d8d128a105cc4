// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Umklapp is a post-processing toolkit for lattice-periodic electronic structure
//!
//! # Overview
//! Umklapp works on tight-binding models stored as real-space sparse operators: a
//! Hamiltonian (and optionally an overlap) of shape `no x no * n_s`, where `no` is the
//! number of orbitals in the unit cell and `n_s` the number of periodic images retained
//! by the model. Its numerical core is a pair of kernels:
//!
//! - construction of k-space matrices and their Cartesian k-derivatives from the
//!   real-space operators and lattice phase factors `exp(i k.R)`,
//! - Bloch's-theorem expansion of matrices computed in a small cell onto a supercell.
//!
//! On top of the kernels sit Brillouin-zone sampling (Monkhorst-Pack grids and
//! high-symmetry paths), Hermitian and generalized eigensolves, and band-structure /
//! density-of-states post-processing.
//!
//! # Usage
//! Umklapp builds as a library together with a thin command line binary. The binary
//! consumes a model description in a `.toml` file:
//!
//! ```toml
//! cell = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
//! nsc = [3, 1, 1]
//! orbitals = [[0.0, 0.0, 0.0]]
//!
//! [[hoppings]]
//! offset = [1, 0, 0]
//! i = 0
//! j = 0
//! value = -1.0
//! ```
//!
//! and a calculation (`bands` or `dos`) configured through `.config/default.toml`.

#![warn(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::type_complexity)]

/// The command line global application, tracing and display primitives
pub mod app;

/// Bloch's-theorem expansion of small-cell matrices onto a supercell
pub mod bloch;

/// Brillouin-zone sampling: Monkhorst-Pack grids and high-symmetry paths
pub mod brillouin;

/// Physical constants
mod constants;

/// Error handling
pub mod error;

/// k-space accumulation kernels over the sparse real-space operators
pub mod fold;

/// The tight-binding model: sparse Hamiltonian and overlap on a lattice
pub mod hamiltonian;

/// Periodic lattice and supercell bookkeeping
pub mod lattice;

/// Model descriptions read from disk
pub mod model;

/// Bloch phase factors connecting real-space operators to a k-point
pub mod phase;

/// Compressed sparse row storage for real-space operators
pub mod sparse;

/// Helper functions and traits
mod utilities;
