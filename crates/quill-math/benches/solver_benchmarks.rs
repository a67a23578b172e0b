//! Benchmarks for the quill-math solvers and optimizers.
//!
//! Run with: cargo bench -p quill-math

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use quill_math::optimization::{
    Constraint, EndCriteria, OptimizationMethod, Problem, Simplex, SteepestDescent,
};
use quill_math::solvers::{
    Bisection, Brent, FalsePosition, Newton, NewtonSafe, Ridder, Secant, Solver1D, WithDerivative,
};

// =============================================================================
// OBJECTIVES
// =============================================================================

/// Price of a 10y annual 5% bond as a function of its yield, minus a target.
fn bond_price_error(y: f64) -> f64 {
    let coupons: f64 = (1..=10).map(|t| 5.0 / (1.0 + y).powi(t)).sum();
    coupons + 100.0 / (1.0 + y).powi(10) - 92.0
}

fn bond_price_derivative(y: f64) -> f64 {
    let coupons: f64 = (1..=10)
        .map(|t| -f64::from(t) * 5.0 / (1.0 + y).powi(t + 1))
        .sum();
    coupons - 1000.0 / (1.0 + y).powi(11)
}

// =============================================================================
// SOLVERS
// =============================================================================

fn bench_solvers(c: &mut Criterion) {
    let accuracy = 1e-12;
    let mut group = c.benchmark_group("solver_yield");

    group.bench_function("bisection", |b| {
        b.iter(|| Bisection::default().solve(bond_price_error, accuracy, black_box(0.05), 0.01))
    });
    group.bench_function("brent", |b| {
        b.iter(|| Brent::default().solve(bond_price_error, accuracy, black_box(0.05), 0.01))
    });
    group.bench_function("false_position", |b| {
        b.iter(|| FalsePosition::default().solve(bond_price_error, accuracy, black_box(0.05), 0.01))
    });
    group.bench_function("ridder", |b| {
        b.iter(|| Ridder::default().solve(bond_price_error, accuracy, black_box(0.05), 0.01))
    });
    group.bench_function("secant", |b| {
        b.iter(|| Secant::default().solve(bond_price_error, accuracy, black_box(0.05), 0.01))
    });
    group.bench_function("newton", |b| {
        b.iter(|| {
            let f = WithDerivative::new(bond_price_error, bond_price_derivative);
            Newton::default().solve(f, accuracy, black_box(0.05), 0.01)
        })
    });
    group.bench_function("newton_safe", |b| {
        b.iter(|| {
            let f = WithDerivative::new(bond_price_error, bond_price_derivative);
            NewtonSafe::default().solve(f, accuracy, black_box(0.05), 0.01)
        })
    });

    group.finish();
}

// =============================================================================
// OPTIMIZERS
// =============================================================================

fn bench_optimizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer_quadratic");

    group.bench_function("simplex", |b| {
        b.iter(|| {
            let mut f = |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2);
            let constraint = Constraint::NoConstraint;
            let mut problem = Problem::new(&mut f, &constraint);
            let mut method = Simplex::new(0.5, EndCriteria::default());
            method.set_initial_value(black_box(vec![0.0, 0.0]));
            method.minimize(&mut problem)
        })
    });
    group.bench_function("steepest_descent", |b| {
        b.iter(|| {
            let mut f = |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2);
            let constraint = Constraint::NoConstraint;
            let mut problem = Problem::new(&mut f, &constraint);
            let mut method = SteepestDescent::new(EndCriteria::default());
            method.set_initial_value(black_box(vec![0.0, 0.0]));
            method.minimize(&mut problem)
        })
    });

    group.finish();
}

criterion_group!(solvers, bench_solvers);
criterion_group!(optimizers, bench_optimizers);
criterion_main!(solvers, optimizers);
