//! Derivation rules of the quantity graph.
//!
//! [`BodyBatch::ensure`] materializes a quantity by first resolving its prerequisites,
//! then applying the rule selected by the current [`StateSource`]. Every rule works on the
//! whole batch and branches per body on the orbital regime.
use itertools::izip;
use nalgebra::Vector3;

use super::BodyBatch;
use crate::{
    constants::{DPI, JUPITER_SEMI_MAJOR_AXIS},
    kepler::{
        eccentric_anomaly, eccentric_from_true, mean_from_eccentric, principal_angle,
        true_from_eccentric,
    },
    quantity::{AnomalyChoice, Quantity, StateSource, VectorQuantity},
    spacerocks_errors::SpaceRocksError,
    vector_batch::Vector3Batch,
};

/// Below this eccentricity an orbit is circular: arg is 0 and anomalies are measured from
/// the ascending node.
pub(crate) const CIRCULAR_TOLERANCE: f64 = 1e-12;

/// An orbit is equatorial when `|n| < EQUATORIAL_TOLERANCE · |h|`: node is 0.
pub(crate) const EQUATORIAL_TOLERANCE: f64 = 1e-12;

fn is_equatorial(node_vec: &Vector3<f64>, h: &Vector3<f64>) -> bool {
    node_vec.norm() <= EQUATORIAL_TOLERANCE * h.norm()
}

/// `acos` with the argument clamped to `[-1, 1]`.
fn safe_acos(cos: f64) -> f64 {
    cos.clamp(-1.0, 1.0).acos()
}

impl BodyBatch {
    pub(super) fn ensure(&mut self, q: Quantity) -> Result<(), SpaceRocksError> {
        if self.lookup(q).is_some() {
            return Ok(());
        }
        match q {
            Quantity::X | Quantity::Y | Quantity::Z => {
                self.ensure_vector(VectorQuantity::Position)
            }
            Quantity::Vx | Quantity::Vy | Quantity::Vz => {
                self.ensure_vector(VectorQuantity::Velocity)
            }
            _ => {
                let values = self.derive(q)?;
                self.cache.keplerian.insert(q, values);
                Ok(())
            }
        }
    }

    pub(super) fn ensure_vector(&mut self, v: VectorQuantity) -> Result<(), SpaceRocksError> {
        if self.cache.vector(v).is_some() {
            return Ok(());
        }
        let value = self.derive_vector(v)?;
        self.cache.store_vector(v, value);
        Ok(())
    }

    fn ensure_all(&mut self, quantities: &[Quantity]) -> Result<(), SpaceRocksError> {
        quantities.iter().try_for_each(|&q| self.ensure(q))
    }

    fn ensure_all_vectors(&mut self, vectors: &[VectorQuantity]) -> Result<(), SpaceRocksError> {
        vectors.iter().try_for_each(|&v| self.ensure_vector(v))
    }

    fn derive(&mut self, q: Quantity) -> Result<Vec<f64>, SpaceRocksError> {
        use Quantity::*;

        let values = match q {
            X | Y | Z | Vx | Vy | Vz => {
                unreachable!("Cartesian components are views on position and velocity")
            }

            SemiMajorAxis => {
                self.ensure_all_vectors(&[VectorQuantity::Position, VectorQuantity::Velocity])?;
                let mu = self.mu;
                let r = self.materialized_vector(VectorQuantity::Position).norm();
                let v2 = self
                    .materialized_vector(VectorQuantity::Velocity)
                    .norm_squared();
                r.iter()
                    .zip(v2)
                    .map(|(r, v2)| 1.0 / (2.0 / r - v2 / mu))
                    .collect()
            }

            Eccentricity => {
                self.ensure_vector(VectorQuantity::Eccentricity)?;
                self.materialized_vector(VectorQuantity::Eccentricity).norm()
            }

            Inclination => {
                self.ensure_vector(VectorQuantity::AngularMomentum)?;
                self.materialized_vector(VectorQuantity::AngularMomentum)
                    .iter()
                    .map(|h| safe_acos(h.z / h.norm()))
                    .collect()
            }

            Node => match self.source {
                StateSource::Cartesian => self.node_from_vectors()?,
                StateSource::Elements { .. } => {
                    self.ensure_all(&[Varpi, Arg])?;
                    izip!(self.materialized(Varpi), self.materialized(Arg))
                        .map(|(varpi, arg)| principal_angle(varpi - arg))
                        .collect()
                }
            },

            Arg => match self.source {
                StateSource::Cartesian => self.arg_from_vectors()?,
                StateSource::Elements { .. } => {
                    self.ensure_all(&[Varpi, Node])?;
                    izip!(self.materialized(Varpi), self.materialized(Node))
                        .map(|(varpi, node)| principal_angle(varpi - node))
                        .collect()
                }
            },

            Varpi => {
                self.ensure_all(&[Node, Arg])?;
                izip!(self.materialized(Node), self.materialized(Arg))
                    .map(|(node, arg)| principal_angle(node + arg))
                    .collect()
            }

            MeanAnomaly => match self.source {
                StateSource::Elements {
                    anomaly: AnomalyChoice::MeanLongitude,
                    ..
                } => {
                    self.ensure_all(&[MeanLongitude, Varpi, Eccentricity])?;
                    izip!(
                        self.materialized(MeanLongitude),
                        self.materialized(Varpi),
                        self.materialized(Eccentricity)
                    )
                    .map(|(lambda, varpi, &e)| wrap_if_elliptic(lambda - varpi, e))
                    .collect()
                }
                StateSource::Elements {
                    anomaly: AnomalyChoice::TPeri,
                    ..
                } => {
                    self.ensure_all(&[TPeri, MeanMotion, Eccentricity])?;
                    izip!(
                        &self.epoch,
                        self.materialized(TPeri),
                        self.materialized(MeanMotion),
                        self.materialized(Eccentricity)
                    )
                    .map(|(epoch, tp, n, &e)| wrap_if_elliptic(n * (epoch - tp), e))
                    .collect()
                }
                _ => {
                    self.ensure_all(&[EccentricAnomaly, Eccentricity])?;
                    izip!(
                        self.materialized(EccentricAnomaly),
                        self.materialized(Eccentricity)
                    )
                    .map(|(&ecc_anom, &e)| mean_from_eccentric(ecc_anom, e))
                    .collect()
                }
            },

            EccentricAnomaly => match self.source {
                StateSource::Cartesian
                | StateSource::Elements {
                    anomaly: AnomalyChoice::TrueAnomaly | AnomalyChoice::TrueLongitude,
                    ..
                } => {
                    self.ensure_all(&[TrueAnomaly, Eccentricity])?;
                    izip!(self.materialized(TrueAnomaly), self.materialized(Eccentricity))
                        .map(|(&nu, &e)| eccentric_from_true(nu, e))
                        .collect()
                }
                StateSource::Elements { .. } => {
                    self.ensure_all(&[MeanAnomaly, Eccentricity])?;
                    eccentric_anomaly(
                        self.materialized(MeanAnomaly),
                        self.materialized(Eccentricity),
                        &self.solver,
                    )?
                }
            },

            TrueAnomaly => match self.source {
                StateSource::Cartesian => self.true_anomaly_from_vectors()?,
                StateSource::Elements {
                    anomaly: AnomalyChoice::TrueLongitude,
                    ..
                } => {
                    self.ensure_all(&[TrueLongitude, Varpi])?;
                    izip!(self.materialized(TrueLongitude), self.materialized(Varpi))
                        .map(|(theta, varpi)| principal_angle(theta - varpi))
                        .collect()
                }
                StateSource::Elements { .. } => {
                    self.ensure_all(&[EccentricAnomaly, Eccentricity])?;
                    izip!(
                        self.materialized(EccentricAnomaly),
                        self.materialized(Eccentricity)
                    )
                    .map(|(&ecc_anom, &e)| true_from_eccentric(ecc_anom, e))
                    .collect()
                }
            },

            TrueLongitude => {
                self.ensure_all(&[TrueAnomaly, Varpi])?;
                izip!(self.materialized(TrueAnomaly), self.materialized(Varpi))
                    .map(|(nu, varpi)| principal_angle(nu + varpi))
                    .collect()
            }

            MeanLongitude => {
                self.ensure_all(&[MeanAnomaly, Varpi])?;
                izip!(self.materialized(MeanAnomaly), self.materialized(Varpi))
                    .map(|(m, varpi)| principal_angle(m + varpi))
                    .collect()
            }

            TPeri => {
                self.ensure_all(&[MeanAnomaly, MeanMotion])?;
                izip!(
                    &self.epoch,
                    self.materialized(MeanAnomaly),
                    self.materialized(MeanMotion)
                )
                .map(|(epoch, m, n)| epoch - m / n)
                .collect()
            }

            SemiMinorAxis => {
                self.ensure_all(&[SemiMajorAxis, Eccentricity])?;
                izip!(self.materialized(SemiMajorAxis), self.materialized(Eccentricity))
                    .map(|(&a, &e)| {
                        if e < 1.0 {
                            a * (1.0 - e * e).sqrt()
                        } else {
                            a.abs() * (e * e - 1.0).sqrt()
                        }
                    })
                    .collect()
            }

            SemiLatusRectum => {
                self.ensure_all(&[SemiMajorAxis, Eccentricity])?;
                izip!(self.materialized(SemiMajorAxis), self.materialized(Eccentricity))
                    .map(|(a, e)| a * (1.0 - e * e))
                    .collect()
            }

            Pericenter => {
                self.ensure_all(&[SemiMajorAxis, Eccentricity])?;
                izip!(self.materialized(SemiMajorAxis), self.materialized(Eccentricity))
                    .map(|(a, e)| a * (1.0 - e))
                    .collect()
            }

            Apocenter => {
                self.ensure_all(&[SemiMajorAxis, Eccentricity])?;
                izip!(self.materialized(SemiMajorAxis), self.materialized(Eccentricity))
                    .map(|(&a, &e)| if e < 1.0 { a * (1.0 + e) } else { f64::INFINITY })
                    .collect()
            }

            MeanMotion => {
                self.ensure(SemiMajorAxis)?;
                let mu = self.mu;
                self.materialized(SemiMajorAxis)
                    .iter()
                    .map(|a| (mu / a.abs().powi(3)).sqrt())
                    .collect()
            }

            Radius => match self.source {
                StateSource::Cartesian => {
                    self.ensure_vector(VectorQuantity::Position)?;
                    self.materialized_vector(VectorQuantity::Position).norm()
                }
                StateSource::Elements { .. } => {
                    self.ensure_all(&[SemiMajorAxis, Eccentricity, EccentricAnomaly])?;
                    izip!(
                        self.materialized(SemiMajorAxis),
                        self.materialized(Eccentricity),
                        self.materialized(EccentricAnomaly)
                    )
                    .map(|(&a, &e, &ecc_anom)| {
                        if e < 1.0 {
                            a * (1.0 - e * ecc_anom.cos())
                        } else {
                            a * (1.0 - e * ecc_anom.cosh())
                        }
                    })
                    .collect()
                }
            },

            Rrdot => {
                self.ensure_all_vectors(&[VectorQuantity::Position, VectorQuantity::Velocity])?;
                self.materialized_vector(VectorQuantity::Position)
                    .dot(self.materialized_vector(VectorQuantity::Velocity))
            }

            Tisserand => {
                self.ensure_all(&[SemiMajorAxis, SemiLatusRectum, Inclination])?;
                izip!(
                    self.materialized(SemiMajorAxis),
                    self.materialized(SemiLatusRectum),
                    self.materialized(Inclination)
                )
                .map(|(a, p, inc)| {
                    JUPITER_SEMI_MAJOR_AXIS / a
                        + 2.0 * inc.cos() * (p / JUPITER_SEMI_MAJOR_AXIS).sqrt()
                })
                .collect()
            }
        };
        Ok(values)
    }

    fn derive_vector(&mut self, v: VectorQuantity) -> Result<Vector3Batch, SpaceRocksError> {
        use Quantity::*;

        let value = match v {
            VectorQuantity::Position => match self.source {
                StateSource::Cartesian => Vector3Batch::new(
                    self.materialized(X).to_vec(),
                    self.materialized(Y).to_vec(),
                    self.materialized(Z).to_vec(),
                ),
                StateSource::Elements { .. } => {
                    self.ensure_vector(VectorQuantity::OrbitalPosition)?;
                    self.rotate_to_reference(VectorQuantity::OrbitalPosition)?
                }
            },

            VectorQuantity::Velocity => match self.source {
                StateSource::Cartesian => Vector3Batch::new(
                    self.materialized(Vx).to_vec(),
                    self.materialized(Vy).to_vec(),
                    self.materialized(Vz).to_vec(),
                ),
                StateSource::Elements { .. } => {
                    self.ensure_vector(VectorQuantity::OrbitalVelocity)?;
                    self.rotate_to_reference(VectorQuantity::OrbitalVelocity)?
                }
            },

            VectorQuantity::AngularMomentum => {
                self.ensure_all_vectors(&[VectorQuantity::Position, VectorQuantity::Velocity])?;
                self.materialized_vector(VectorQuantity::Position)
                    .cross(self.materialized_vector(VectorQuantity::Velocity))
            }

            VectorQuantity::Eccentricity => {
                self.ensure_all_vectors(&[
                    VectorQuantity::Position,
                    VectorQuantity::Velocity,
                    VectorQuantity::AngularMomentum,
                ])?;
                let position = self.materialized_vector(VectorQuantity::Position);
                let v_cross_h = self
                    .materialized_vector(VectorQuantity::Velocity)
                    .cross(self.materialized_vector(VectorQuantity::AngularMomentum))
                    .scale(1.0 / self.mu);
                let r_hat = position.div_each(&position.norm());
                &v_cross_h - &r_hat
            }

            VectorQuantity::AscendingNode => {
                self.ensure_vector(VectorQuantity::AngularMomentum)?;
                self.materialized_vector(VectorQuantity::AngularMomentum)
                    .map(|h| Vector3::new(-h.y, h.x, 0.0))
            }

            VectorQuantity::OrbitalPosition => {
                self.ensure_all(&[Radius, TrueAnomaly])?;
                let direction: Vector3Batch = self
                    .materialized(TrueAnomaly)
                    .iter()
                    .map(|nu| Vector3::new(nu.cos(), nu.sin(), 0.0))
                    .collect();
                direction.scale_each(self.materialized(Radius))
            }

            VectorQuantity::OrbitalVelocity => {
                self.ensure_all(&[SemiMajorAxis, Eccentricity, EccentricAnomaly, Radius])?;
                let mu = self.mu;
                izip!(
                    self.materialized(SemiMajorAxis),
                    self.materialized(Eccentricity),
                    self.materialized(EccentricAnomaly),
                    self.materialized(Radius)
                )
                .map(|(&a, &e, &ecc_anom, &r)| {
                    let factor = (mu * a.abs()).sqrt() / r;
                    if e < 1.0 {
                        Vector3::new(
                            -factor * ecc_anom.sin(),
                            factor * (1.0 - e * e).sqrt() * ecc_anom.cos(),
                            0.0,
                        )
                    } else {
                        Vector3::new(
                            -factor * ecc_anom.sinh(),
                            factor * (e * e - 1.0).sqrt() * ecc_anom.cosh(),
                            0.0,
                        )
                    }
                })
                .collect()
            }
        };
        Ok(value)
    }

    /// Orbital-plane vectors rotated by `(arg, inc, node)` into the reference frame.
    fn rotate_to_reference(&mut self, v: VectorQuantity) -> Result<Vector3Batch, SpaceRocksError> {
        self.ensure_all(&[Quantity::Arg, Quantity::Inclination, Quantity::Node])?;
        Ok(self.materialized_vector(v).euler_rotation(
            self.materialized(Quantity::Arg),
            self.materialized(Quantity::Inclination),
            self.materialized(Quantity::Node),
        ))
    }

    fn node_from_vectors(&mut self) -> Result<Vec<f64>, SpaceRocksError> {
        self.ensure_all_vectors(&[VectorQuantity::AscendingNode, VectorQuantity::AngularMomentum])?;
        let node_vec = self.materialized_vector(VectorQuantity::AscendingNode);
        let h = self.materialized_vector(VectorQuantity::AngularMomentum);

        Ok(node_vec
            .iter()
            .zip(h.iter())
            .map(|(n, h)| {
                if is_equatorial(&n, &h) {
                    return 0.0;
                }
                let node = safe_acos(n.x / n.norm());
                if n.y < 0.0 {
                    DPI - node
                } else {
                    node
                }
            })
            .collect())
    }

    fn arg_from_vectors(&mut self) -> Result<Vec<f64>, SpaceRocksError> {
        self.ensure_all_vectors(&[
            VectorQuantity::Eccentricity,
            VectorQuantity::AscendingNode,
            VectorQuantity::AngularMomentum,
        ])?;
        let e_vec = self.materialized_vector(VectorQuantity::Eccentricity);
        let node_vec = self.materialized_vector(VectorQuantity::AscendingNode);
        let h = self.materialized_vector(VectorQuantity::AngularMomentum);

        Ok(izip!(e_vec.iter(), node_vec.iter(), h.iter())
            .map(|(e, n, h)| {
                let ecc = e.norm();
                if ecc < CIRCULAR_TOLERANCE {
                    return 0.0;
                }
                if is_equatorial(&n, &h) {
                    // node is 0: the pericenter longitude is the argument, mirrored
                    // for retrograde orbits
                    let varpi = e.y.atan2(e.x);
                    return if h.z < 0.0 {
                        principal_angle(-varpi)
                    } else {
                        principal_angle(varpi)
                    };
                }
                let arg = safe_acos(n.dot(&e) / (n.norm() * ecc));
                if e.z < 0.0 {
                    DPI - arg
                } else {
                    arg
                }
            })
            .collect())
    }

    fn true_anomaly_from_vectors(&mut self) -> Result<Vec<f64>, SpaceRocksError> {
        self.ensure_all_vectors(&[
            VectorQuantity::Position,
            VectorQuantity::Velocity,
            VectorQuantity::Eccentricity,
            VectorQuantity::AscendingNode,
            VectorQuantity::AngularMomentum,
        ])?;
        let position = self.materialized_vector(VectorQuantity::Position);
        let velocity = self.materialized_vector(VectorQuantity::Velocity);
        let e_vec = self.materialized_vector(VectorQuantity::Eccentricity);
        let node_vec = self.materialized_vector(VectorQuantity::AscendingNode);
        let h = self.materialized_vector(VectorQuantity::AngularMomentum);

        Ok(izip!(
            position.iter(),
            velocity.iter(),
            e_vec.iter(),
            node_vec.iter(),
            h.iter()
        )
        .map(|(r, v, e, n, h)| {
            let ecc = e.norm();
            let r_norm = r.norm();

            if ecc >= CIRCULAR_TOLERANCE {
                let nu = safe_acos(e.dot(&r) / (ecc * r_norm));
                return if r.dot(&v) < 0.0 { DPI - nu } else { nu };
            }

            // circular: measured from the ascending node, or from the x axis when the
            // node is undefined too
            if is_equatorial(&n, &h) {
                let lambda = r.y.atan2(r.x);
                return if h.z < 0.0 {
                    principal_angle(-lambda)
                } else {
                    principal_angle(lambda)
                };
            }
            let u = safe_acos(n.dot(&r) / (n.norm() * r_norm));
            if r.z < 0.0 {
                DPI - u
            } else {
                u
            }
        })
        .collect())
    }
}

/// Wrap an anomaly for elliptic bodies, leave hyperbolic ones untouched.
fn wrap_if_elliptic(anomaly: f64, e: f64) -> f64 {
    if e < 1.0 {
        principal_angle(anomaly)
    } else {
        anomaly
    }
}
