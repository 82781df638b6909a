#![allow(dead_code)]

pub mod synthetic_spk;

use std::f64::consts::PI;

use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng};
use spacerocks::{kepler::angle_diff, BodyBatch};

pub const EPOCH: f64 = 2_460_600.5;

/// Keplerian elements of a batch, with the mean anomaly as anomaly.
#[derive(Debug, Clone)]
pub struct ElementSet {
    pub a: Vec<f64>,
    pub e: Vec<f64>,
    pub inc: Vec<f64>,
    pub node: Vec<f64>,
    pub arg: Vec<f64>,
    pub mean_anomaly: Vec<f64>,
}

impl ElementSet {
    fn random<F>(rng: &mut StdRng, n: usize, mut shape: F) -> Self
    where
        F: FnMut(&mut StdRng) -> (f64, f64, f64),
    {
        let mut set = ElementSet {
            a: Vec::with_capacity(n),
            e: Vec::with_capacity(n),
            inc: Vec::with_capacity(n),
            node: Vec::with_capacity(n),
            arg: Vec::with_capacity(n),
            mean_anomaly: Vec::with_capacity(n),
        };
        for _ in 0..n {
            let (a, e, m) = shape(rng);
            set.a.push(a);
            set.e.push(e);
            set.inc.push(rng.random_range(0.05..PI - 0.05));
            set.node.push(rng.random_range(0.0..2.0 * PI));
            set.arg.push(rng.random_range(0.0..2.0 * PI));
            set.mean_anomaly.push(m);
        }
        set
    }

    /// Bound orbits, e in [0.05, 0.95].
    pub fn random_elliptic(rng: &mut StdRng, n: usize) -> Self {
        Self::random(rng, n, |rng| {
            (
                rng.random_range(0.5..50.0),
                rng.random_range(0.05..0.95),
                rng.random_range(0.0..2.0 * PI),
            )
        })
    }

    /// Unbound orbits, a in [-10, -0.5], e in [1.1, 5], M in [-5, 5].
    pub fn random_hyperbolic(rng: &mut StdRng, n: usize) -> Self {
        Self::random(rng, n, |rng| {
            (
                rng.random_range(-10.0..-0.5),
                rng.random_range(1.1..5.0),
                rng.random_range(-5.0..5.0),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Batch driven by `(a, e, inc, node, arg, M)`.
    pub fn batch(&self) -> BodyBatch {
        BodyBatch::builder(vec![EPOCH; self.len()])
            .semi_major_axis(self.a.clone())
            .eccentricity(self.e.clone())
            .inclination(self.inc.clone())
            .node(self.node.clone())
            .arg(self.arg.clone())
            .mean_anomaly(self.mean_anomaly.clone())
            .build()
            .unwrap()
    }
}

/// Batch driven by the Cartesian state of `rocks`.
pub fn cartesian_copy(rocks: &mut BodyBatch) -> BodyBatch {
    let epoch = rocks.epoch().to_vec();
    BodyBatch::builder(epoch)
        .frame(rocks.frame())
        .x(rocks.x().unwrap().to_vec())
        .y(rocks.y().unwrap().to_vec())
        .z(rocks.z().unwrap().to_vec())
        .vx(rocks.vx().unwrap().to_vec())
        .vy(rocks.vy().unwrap().to_vec())
        .vz(rocks.vz().unwrap().to_vec())
        .build()
        .unwrap()
}

/// Angles equal modulo 2π.
pub fn assert_angles_close(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, b)) in actual.iter().zip(expected).enumerate() {
        assert!(
            angle_diff(*a, *b).abs() < epsilon,
            "body {i}: {a} and {b} differ by {}",
            angle_diff(*a, *b)
        );
    }
}

pub fn assert_slices_close(actual: &[f64], expected: &[f64], max_relative: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, b) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12, max_relative = max_relative);
    }
}

/// Compare the Cartesian state of two batches of the same bodies.
pub fn assert_same_state(actual: &mut BodyBatch, expected: &mut BodyBatch, max_relative: f64) {
    let reference: Vec<Vec<f64>> = spacerocks::Quantity::CARTESIAN
        .iter()
        .map(|&q| expected.get(q).unwrap().to_vec())
        .collect();
    for (q, values) in spacerocks::Quantity::CARTESIAN.iter().zip(reference) {
        let computed = actual.get(*q).unwrap();
        for (a, b) in computed.iter().zip(&values) {
            assert_relative_eq!(*a, *b, epsilon = 1e-11, max_relative = max_relative);
        }
    }
}
