//! Benchmarks for the explicit step and diagnostics.
//!
//! Run with: `cargo bench --bench step_bench`
//! Add `--features parallel` to include the rayon variant.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use swe_fd::analysis::GridDiagnostics;
use swe_fd::config::{ModelConfig, ModelSetup};
use swe_fd::initial;
use swe_fd::solver::{FluxWorkspace, GridState};
use swe_fd::time::StepIntegrator;

/// Setup the reference problem at resolution n×n.
fn setup_problem(n: usize) -> (ModelSetup, GridState) {
    let model = ModelConfig::reference()
        .with_resolution(n, n)
        .build()
        .expect("reference configuration is valid");
    let state = initial::reference_state(model.grid());
    (model, state)
}

fn integrators() -> Vec<(&'static str, StepIntegrator)> {
    #[allow(unused_mut)]
    let mut list = vec![("serial", StepIntegrator::serial())];
    #[cfg(feature = "parallel")]
    list.push(("parallel", StepIntegrator::parallel()));
    list
}

/// Benchmark a single step.
fn bench_single_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for n in [64, 150, 400] {
        let (model, state) = setup_problem(n);
        let res = model.grid().resolution();

        for (name, integrator) in integrators() {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{n}x{n}")),
                &n,
                |b, _| {
                    let mut next = GridState::zeros(res);
                    let mut workspace = FluxWorkspace::new(res);
                    b.iter(|| {
                        integrator.advance(
                            black_box(&model),
                            black_box(&state),
                            &mut next,
                            &mut workspace,
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark multiple time steps with buffer swapping.
fn bench_multiple_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiple_steps");
    group.sample_size(20);

    let (model, state) = setup_problem(150);
    let res = model.grid().resolution();

    for n_steps in [10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("steps", n_steps.to_string()),
            &n_steps,
            |b, &n_steps| {
                let mut next = GridState::zeros(res);
                let mut workspace = FluxWorkspace::new(res);
                b.iter(|| {
                    let mut current = state.clone();
                    for _ in 0..n_steps {
                        swe_fd::advance(&model, &current, &mut next, &mut workspace);
                        std::mem::swap(&mut current, &mut next);
                    }
                    black_box(current)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark diagnostics computation.
fn bench_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnostics");

    for n in [64, 150, 400] {
        let (model, state) = setup_problem(n);

        group.bench_with_input(BenchmarkId::new("compute", format!("{n}x{n}")), &n, |b, _| {
            b.iter(|| GridDiagnostics::compute(black_box(&state), black_box(&model)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_step,
    bench_multiple_steps,
    bench_diagnostics,
);
criterion_main!(benches);
