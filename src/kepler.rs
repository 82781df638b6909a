//! # Kepler equation
//!
//! Conversions between mean anomaly `M`, eccentric anomaly `E` and true anomaly `ν`
//! for elliptic (`e < 1`) and hyperbolic (`e ≥ 1`) orbits.
//!
//! ## Elliptic branch
//!
//! `M = E − e·sin(E)` is inverted without iteration: Markley's cubic starter
//! (*Celestial Mechanics and Dynamical Astronomy* 63, 1995) followed by his fifth-order
//! correction and a final Newton pass. The number of operations is the same for every
//! input, and the result is accurate to double precision over `0 ≤ e < 1`.
//!
//! ## Hyperbolic branch
//!
//! `M = e·sinh(E) − E` is solved with Newton–Raphson seeded at `E₀ = M`. The iteration cap
//! is generous (see [`KeplerSolverConfig`]) to accommodate near-parabolic orbits; running
//! out of iterations is an error, never a silently returned iterate.
//!
//! ## Conventions
//!
//! Elliptic `M`, `E` and every true anomaly are principal angles in `[0, 2π)`.
//! Hyperbolic `M` and `E` are unbounded reals and keep their sign (negative before
//! pericenter passage).
use std::f64::consts::PI;

use roots::{find_root_newton_raphson, SimpleConvergency};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{constants::DPI, spacerocks_errors::SpaceRocksError};

/// Principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    let wrapped = a.rem_euclid(DPI);
    // rem_euclid rounds up to exactly 2π for tiny negative inputs
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Difference `a − b` reduced to `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Settings of the hyperbolic Newton solver.
///
/// The elliptic branch is non-iterative and has no settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeplerSolverConfig {
    /// Maximum number of Newton iterations per body.
    pub hyperbolic_max_iter: usize,
    /// Convergence threshold, applied to both the residual and the Newton step.
    pub hyperbolic_tolerance: f64,
}

impl Default for KeplerSolverConfig {
    fn default() -> Self {
        KeplerSolverConfig {
            hyperbolic_max_iter: 10_000,
            hyperbolic_tolerance: 1e-12,
        }
    }
}

/// Solve the elliptic Kepler equation `M = E − e·sin(E)` for `E`.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: Mean anomaly `M` (radians, any real value).
/// * `e`: Eccentricity, `0 ≤ e < 1`.
///
/// Return
/// ----------
/// * Eccentric anomaly `E` in `[0, 2π)`.
pub fn solve_elliptic(mean_anomaly: f64, e: f64) -> f64 {
    let mut m = principal_angle(mean_anomaly);
    if m > PI {
        m -= DPI;
    }

    // Markley starter: root of a cubic in E
    let pi2 = PI * PI;
    let alpha = (3.0 * pi2 + 1.6 * (pi2 - PI * m.abs()) / (1.0 + e)) / (pi2 - 6.0);
    let d = 3.0 * (1.0 - e) + alpha * e;
    let q = 2.0 * alpha * d * (1.0 - e) - m * m;
    let r = 3.0 * alpha * d * (d - 1.0 + e) * m + m.powi(3);
    let w = (r.abs() + (q.powi(3) + r * r).sqrt()).powf(2.0 / 3.0);
    let e1 = if w == 0.0 {
        0.0
    } else {
        (2.0 * r * w / (w * w + w * q + q * q) + m) / d
    };

    // fifth-order Halley-like correction
    let f2 = e * e1.sin();
    let f3 = e * e1.cos();
    let f0 = e1 - f2 - m;
    let f1 = 1.0 - f3;
    let d3 = -f0 / (f1 - f0 * f2 / (2.0 * f1));
    let d4 = -f0 / (f1 + f2 * d3 / 2.0 + d3 * d3 * f3 / 6.0);
    let d5 = -f0 / (f1 + d4 * f2 / 2.0 + d4 * d4 * f3 / 6.0 - d4.powi(3) * f2 / 24.0);
    let mut ecc_anom = e1 + d5;

    // cleanup pass, removes the last ulps of the starter error
    let denom = 1.0 - e * ecc_anom.cos();
    if denom > 0.0 {
        ecc_anom -= (ecc_anom - e * ecc_anom.sin() - m) / denom;
    }

    principal_angle(ecc_anom)
}

/// Solve the hyperbolic Kepler equation `M = e·sinh(E) − E` for `E`.
///
/// Newton–Raphson seeded with `E₀ = M`.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: Hyperbolic mean anomaly `M` (any real value).
/// * `e`: Eccentricity, `e ≥ 1`.
/// * `config`: Iteration cap and tolerance.
///
/// Return
/// ----------
/// * The hyperbolic anomaly `E`, or the [`roots::SearchError`] raised when the
///   iteration cap is exhausted.
pub fn solve_hyperbolic(
    mean_anomaly: f64,
    e: f64,
    config: &KeplerSolverConfig,
) -> Result<f64, roots::SearchError> {
    let f = |h: f64| -> f64 { e * h.sinh() - h - mean_anomaly };
    let df = |h: f64| -> f64 { e * h.cosh() - 1.0 };

    let mut tol = SimpleConvergency {
        eps: config.hyperbolic_tolerance,
        max_iter: config.hyperbolic_max_iter,
    };

    let root = find_root_newton_raphson(mean_anomaly, &f, &df, &mut tol)?;
    if root.is_finite() {
        Ok(root)
    } else {
        Err(roots::SearchError::NoConvergency)
    }
}

/// Eccentric anomaly of every body, dispatching on its own regime.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: Mean anomalies (radians).
/// * `eccentricity`: Eccentricities, same length.
/// * `config`: Settings of the hyperbolic branch.
///
/// Return
/// ----------
/// * The eccentric anomalies, or [`SpaceRocksError::KeplerNonConvergence`] naming the
///   first hyperbolic body whose Newton iteration did not converge.
pub fn eccentric_anomaly(
    mean_anomaly: &[f64],
    eccentricity: &[f64],
    config: &KeplerSolverConfig,
) -> Result<Vec<f64>, SpaceRocksError> {
    mean_anomaly
        .iter()
        .zip(eccentricity)
        .enumerate()
        .map(|(index, (&m, &e))| {
            if e < 1.0 {
                Ok(solve_elliptic(m, e))
            } else {
                solve_hyperbolic(m, e, config).map_err(|source| {
                    warn!(
                        index = index,
                        mean_anomaly = m,
                        eccentricity = e,
                        "hyperbolic Kepler equation did not converge"
                    );
                    SpaceRocksError::KeplerNonConvergence {
                        index,
                        mean_anomaly: m,
                        eccentricity: e,
                        source,
                    }
                })
            }
        })
        .collect()
}

/// Mean anomaly from the eccentric anomaly (closed form, exact inverse of the solver).
pub fn mean_from_eccentric(ecc_anom: f64, e: f64) -> f64 {
    if e < 1.0 {
        principal_angle(ecc_anom - e * ecc_anom.sin())
    } else {
        e * ecc_anom.sinh() - ecc_anom
    }
}

/// Eccentric anomaly from the true anomaly (tangent half-angle relations).
///
/// * Elliptic: `tan(E/2) = sqrt((1−e)/(1+e))·tan(ν/2)`, result in `[0, 2π)`.
/// * Hyperbolic: `tanh(E/2) = sqrt((e−1)/(e+1))·tan(ν/2)`.
pub fn eccentric_from_true(true_anom: f64, e: f64) -> f64 {
    let half = true_anom / 2.0;
    if e < 1.0 {
        principal_angle(2.0 * ((1.0 - e).sqrt() * half.sin()).atan2((1.0 + e).sqrt() * half.cos()))
    } else {
        let tanh_half = ((e - 1.0) / (e + 1.0)).sqrt() * half.tan();
        2.0 * tanh_half.atanh()
    }
}

/// True anomaly from the eccentric anomaly, in `[0, 2π)`.
///
/// * Elliptic: `ν = 2·atan2(sqrt(1+e)·sin(E/2), sqrt(1−e)·cos(E/2))`.
/// * Hyperbolic: `ν = 2·atan2(sqrt(e+1)·tanh(E/2), sqrt(e−1))`.
pub fn true_from_eccentric(ecc_anom: f64, e: f64) -> f64 {
    let half = ecc_anom / 2.0;
    let nu = if e < 1.0 {
        2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
    } else {
        2.0 * ((e + 1.0).sqrt() * half.tanh()).atan2((e - 1.0).sqrt())
    };
    principal_angle(nu)
}
