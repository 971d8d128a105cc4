//! # Brillouin
//!
//! Discrete k-space sampling for the post-processing operations, in the spirit of the
//! energy and wavevector spaces scaffolding the Green's function calculations: a
//! sampling owns its points and their integration weights, and consumers only
//! iterate. Two samplings are provided: uniform Monkhorst-Pack grids for zone
//! integrals, and piecewise-linear paths through named high-symmetry points for band
//! structures.

use crate::{error::BuildError, lattice::Lattice};
use itertools::{iproduct, Itertools};

/// A uniform Monkhorst-Pack grid over the Brillouin zone
///
/// Points along each axis sit at `(2 i - n + 1) / (2 n)`, so odd counts include the
/// zone centre and even counts straddle it. Weights are uniform and sum to one.
#[derive(Clone, Debug)]
pub struct MonkhorstPack {
    grid: [usize; 3],
    displacement: [f64; 3],
    points: Vec<[f64; 3]>,
}

impl MonkhorstPack {
    /// Create a `n0 x n1 x n2` grid centred on the zone centre
    pub fn new(grid: [usize; 3]) -> Result<Self, BuildError> {
        if grid.iter().any(|&n| n == 0) {
            return Err(BuildError::Dimension(format!(
                "every Monkhorst-Pack division must be positive, got {:?}",
                grid
            )));
        }
        let mut sampling = Self {
            grid,
            displacement: [0.; 3],
            points: Vec::new(),
        };
        sampling.populate();
        Ok(sampling)
    }

    /// Displace the whole grid by `displacement` in reduced coordinates
    pub fn with_displacement(mut self, displacement: [f64; 3]) -> Self {
        self.displacement = displacement;
        self.populate();
        self
    }

    fn populate(&mut self) {
        let axis = |n: usize| -> Vec<f64> {
            (0..n)
                .map(|i| (2. * i as f64 - n as f64 + 1.) / (2. * n as f64))
                .collect()
        };
        let (axis0, axis1, axis2) = (axis(self.grid[0]), axis(self.grid[1]), axis(self.grid[2]));
        self.points = iproduct!(&axis2, &axis1, &axis0)
            .map(|(&k2, &k1, &k0)| {
                [
                    k0 + self.displacement[0],
                    k1 + self.displacement[1],
                    k2 + self.displacement[2],
                ]
            })
            .collect();
    }

    /// The grid divisions along the three axes
    pub fn grid(&self) -> [usize; 3] {
        self.grid
    }

    /// The number of sampled k-points
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The sampled k-points in reduced coordinates, first axis fastest
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// The integration weight of every point
    pub fn weight(&self) -> f64 {
        1. / self.num_points() as f64
    }
}

/// A piecewise-linear path through named high-symmetry points
#[derive(Clone, Debug)]
pub struct BandPath {
    points: Vec<[f64; 3]>,
    distances: Vec<f64>,
    labels: Vec<(usize, String)>,
}

impl BandPath {
    /// Interpolate `divisions` points along the path through `vertices`
    ///
    /// Divisions are distributed over the segments in proportion to their Cartesian
    /// length, with at least one point per segment; the reported distance axis is the
    /// cumulative Cartesian arc length in inverse Angstrom.
    pub fn new(
        lattice: &Lattice,
        vertices: &[(&str, [f64; 3])],
        divisions: usize,
    ) -> Result<Self, BuildError> {
        if vertices.len() < 2 {
            return Err(BuildError::Dimension(
                "a band path needs at least two vertices".into(),
            ));
        }
        let lengths: Vec<f64> = vertices
            .iter()
            .tuple_windows()
            .map(|((_, a), (_, b))| {
                let ka = lattice.k_cartesian(a);
                let kb = lattice.k_cartesian(b);
                ((kb[0] - ka[0]).powi(2) + (kb[1] - ka[1]).powi(2) + (kb[2] - ka[2]).powi(2))
                    .sqrt()
            })
            .collect();
        let total: f64 = lengths.iter().sum();
        if total < f64::EPSILON {
            return Err(BuildError::Dimension(
                "the band path has zero length: vertices coincide".into(),
            ));
        }

        let counts: Vec<usize> = lengths
            .iter()
            .map(|length| (((divisions as f64) * length / total).round() as usize).max(1))
            .collect();

        let mut points = vec![vertices[0].1];
        let mut labels = vec![(0, vertices[0].0.to_string())];
        for (segment, count) in counts.iter().enumerate() {
            let (_, start) = vertices[segment];
            let (label, end) = vertices[segment + 1];
            for step in 1..=*count {
                let fraction = step as f64 / *count as f64;
                points.push([
                    start[0] + (end[0] - start[0]) * fraction,
                    start[1] + (end[1] - start[1]) * fraction,
                    start[2] + (end[2] - start[2]) * fraction,
                ]);
            }
            labels.push((points.len() - 1, label.to_string()));
        }

        let mut distances = Vec::with_capacity(points.len());
        let mut accumulated = 0.;
        distances.push(0.);
        for (a, b) in points.iter().tuple_windows() {
            let ka = lattice.k_cartesian(a);
            let kb = lattice.k_cartesian(b);
            accumulated += ((kb[0] - ka[0]).powi(2)
                + (kb[1] - ka[1]).powi(2)
                + (kb[2] - ka[2]).powi(2))
            .sqrt();
            distances.push(accumulated);
        }

        Ok(Self {
            points,
            distances,
            labels,
        })
    }

    /// The interpolated k-points in reduced coordinates
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// The cumulative Cartesian arc length at every point, in inverse Angstrom
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// The point index and name of every path vertex
    pub fn labels(&self) -> &[(usize, String)] {
        &self.labels
    }

    /// The number of interpolated points
    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}
