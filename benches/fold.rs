use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use num_complex::Complex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use umklapp::fold::{k_dense, k_sparse};
use umklapp::lattice::Lattice;
use umklapp::phase::{Gauge, Phases};
use umklapp::sparse::{CsrBuilder, SparseCsr};

/// A Hermitian random model with `no` orbitals on a cubic lattice with 27 images
fn construct_test_model(no: usize) -> (Lattice, Array2<f64>, SparseCsr<Complex<f64>>) {
    let mut rng = StdRng::seed_from_u64(no as u64);
    let lattice = Lattice::new(Array2::eye(3), [3, 3, 3]).unwrap();
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
                // Keep the operator sparse, roughly ten couplings per row and image pair
                if rng.gen_bool(1. - (10. / no as f64).min(0.5)) {
                    continue;
                }
                let value = Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                builder.insert(i, isc * no + j, value).unwrap();
                builder.insert(j, conjugate * no + i, value.conj()).unwrap();
            }
        }
    }
    (lattice, orbitals, builder.build())
}

pub fn bench_k_dense(c: &mut Criterion) {
    let k = [0.13, 0.29, -0.41];
    let mut group = c.benchmark_group("k_dense");

    for no in [16, 32, 64, 128, 256].into_iter() {
        let (lattice, orbitals, hamiltonian) = construct_test_model(no);
        for (name, gauge) in [("lattice", Gauge::Lattice), ("orbital", Gauge::Orbital)] {
            let phases = Phases::build(&lattice, orbitals.view(), &k, gauge).unwrap();
            group.bench_with_input(BenchmarkId::new(name, no), &no, |b, _| {
                b.iter(|| k_dense(black_box(&hamiltonian), black_box(&phases)))
            });
        }
    }
}

pub fn bench_k_sparse(c: &mut Criterion) {
    let k = [0.13, 0.29, -0.41];
    let mut group = c.benchmark_group("k_sparse");

    for no in [16, 32, 64, 128, 256].into_iter() {
        let (lattice, orbitals, hamiltonian) = construct_test_model(no);
        let phases = Phases::build(&lattice, orbitals.view(), &k, Gauge::Lattice).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(no), &no, |b, _| {
            b.iter(|| k_sparse(black_box(&hamiltonian), black_box(&phases)))
        });
    }
}

criterion_group!(benches, bench_k_dense, bench_k_sparse);
criterion_main!(benches);
