// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Constants
//!
//! Defines physical constants used in the post-processing routines

pub const ELECTRON_CHARGE: f64 = 1.60217662e-19; // Single electron charge in C
pub const HBAR: f64 = 1.0545718e-34; // Reduced Planck constant in J s
pub const HBAR_EV: f64 = 6.582119569e-16; // Reduced Planck constant in eV s
pub const ANGSTROM: f64 = 1e-10; // One Angstrom in m
