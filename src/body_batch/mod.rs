//! # Body batches
//!
//! A [`BodyBatch`] holds the orbital state of N bodies, each at its own epoch, and derives
//! any [`Quantity`] or [`VectorQuantity`] from whichever primaries were supplied.
//!
//! ## Laziness
//!
//! Nothing is computed at construction. Reading a quantity resolves its prerequisites
//! recursively, stores every intermediate result and returns a view on the stored array.
//! Repeated reads are free. Reads take `&mut self` because they may fill the cache.
//!
//! ## Assignment
//!
//! Assigning a primary with [`BodyBatch::set`] clears every derived quantity. When the
//! assigned quantity does not belong to the current input set, the batch first
//! materializes the state it needs and switches input set:
//!
//! * a Cartesian component on an element-driven batch switches to the Cartesian state,
//! * an element on a Cartesian batch switches to `(a, e, inc, node, arg, M)`,
//! * a new anomaly choice replaces the previous one,
//! * a third orientation angle replaces one of the current pair (arg is kept first,
//!   then node).
//!
//! ## Example
//!
//! ```rust
//! use spacerocks::body_batch::BodyBatch;
//! use spacerocks::quantity::Quantity;
//!
//! let mut rocks = BodyBatch::builder(vec![2_451_545.0])
//!     .semi_major_axis(vec![1.0])
//!     .eccentricity(vec![0.0167])
//!     .inclination(vec![0.0])
//!     .node(vec![0.0])
//!     .arg(vec![102.9_f64.to_radians()])
//!     .mean_anomaly(vec![0.0])
//!     .build()
//!     .unwrap();
//!
//! let r = rocks.get(Quantity::Radius).unwrap();
//! assert!((r[0] - 0.9833).abs() < 1e-12);
//! ```
use tracing::debug;

use crate::{
    kepler::KeplerSolverConfig,
    quantity::{AnomalyChoice, Orientation, Quantity, StateSource, VectorQuantity},
    spacerocks_errors::SpaceRocksError,
    vector_batch::Vector3Batch,
};

pub mod builder;
mod cache;
mod derivation;
pub mod frame;

pub use builder::BodyBatchBuilder;
pub use frame::Frame;

use cache::{DerivedCache, Primaries};

/// Orbital state of N bodies.
#[derive(Debug, Clone)]
pub struct BodyBatch {
    epoch: Vec<f64>,
    frame: Frame,
    mu: f64,
    source: StateSource,
    solver: KeplerSolverConfig,
    inputs: Primaries,
    cache: DerivedCache,
}

pub(crate) fn check_length(q: Quantity, found: usize, expected: usize) -> Result<(), SpaceRocksError> {
    if found == expected {
        Ok(())
    } else {
        Err(SpaceRocksError::LengthMismatch {
            quantity: q.to_string(),
            expected,
            found,
        })
    }
}

/// Semi-major axis and eccentricity must agree on the regime of every body: `a > 0`
/// for `e < 1`, `a < 0` for `e >= 1`.
pub(crate) fn check_regime(a: &[f64], e: &[f64]) -> Result<(), SpaceRocksError> {
    match a
        .iter()
        .zip(e)
        .position(|(&a, &e)| (a > 0.0 && e >= 1.0) || (a < 0.0 && e < 1.0))
    {
        None => Ok(()),
        Some(i) => Err(SpaceRocksError::ConflictingInputs(format!(
            "body {i}: a = {} does not match e = {}, expected a > 0 for e < 1 and a < 0 for e >= 1",
            a[i], e[i]
        ))),
    }
}

impl BodyBatch {
    /// Start a batch of bodies at the given epochs (Julian dates, TDB).
    pub fn builder(epoch: Vec<f64>) -> BodyBatchBuilder {
        BodyBatchBuilder::new(epoch)
    }

    pub fn len(&self) -> usize {
        self.epoch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epoch.is_empty()
    }

    pub fn epoch(&self) -> &[f64] {
        &self.epoch
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Gravitational parameter in AU³/day², set by the frame.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// The input set the derivation rules currently dispatch on.
    pub fn source(&self) -> StateSource {
        self.source
    }

    pub fn solver_config(&self) -> &KeplerSolverConfig {
        &self.solver
    }

    /// Whether `q` is currently stored, either as an input or as a derived value.
    pub fn is_materialized(&self, q: Quantity) -> bool {
        self.lookup(q).is_some()
    }

    /// Values of `q` for every body, derived on first read.
    ///
    /// Arguments
    /// -----------------
    /// * `q`: The quantity to read.
    ///
    /// Return
    /// ----------
    /// * A slice of length N, or the error raised while deriving a prerequisite
    ///   (hyperbolic solver non-convergence).
    pub fn get(&mut self, q: Quantity) -> Result<&[f64], SpaceRocksError> {
        self.ensure(q)?;
        Ok(self.materialized(q))
    }

    /// Same as [`BodyBatch::get`], with the quantity given by its short name (`"a"`, `"M"`,
    /// `"true_anomaly"`...).
    pub fn get_by_name(&mut self, name: &str) -> Result<&[f64], SpaceRocksError> {
        let q: Quantity = name.parse()?;
        self.get(q)
    }

    /// Per-body vectors of `v`, derived on first read.
    pub fn get_vector(&mut self, v: VectorQuantity) -> Result<&Vector3Batch, SpaceRocksError> {
        self.ensure_vector(v)?;
        Ok(self.materialized_vector(v))
    }

    /// Assign a primary quantity for every body.
    ///
    /// Every derived quantity is discarded. See the module documentation for the way the
    /// input set follows the assignment.
    ///
    /// Arguments
    /// -----------------
    /// * `q`: A primary quantity.
    /// * `values`: One value per body.
    ///
    /// Return
    /// ----------
    /// * [`SpaceRocksError::ReadOnlyQuantity`] for a derived-only quantity,
    ///   [`SpaceRocksError::LengthMismatch`] when `values` does not hold N values,
    ///   [`SpaceRocksError::ConflictingInputs`] when a new `a` or `e` disagrees with the
    ///   regime given by the other one, or the
    ///   error raised while materializing the state needed to switch input set. The batch
    ///   is left untouched on error.
    pub fn set(&mut self, q: Quantity, values: Vec<f64>) -> Result<(), SpaceRocksError> {
        if !q.is_primary() {
            return Err(SpaceRocksError::ReadOnlyQuantity(q.to_string()));
        }
        check_length(q, values.len(), self.len())?;

        match q {
            Quantity::SemiMajorAxis => {
                self.ensure(Quantity::Eccentricity)?;
                check_regime(&values, self.materialized(Quantity::Eccentricity))?;
            }
            Quantity::Eccentricity => {
                self.ensure(Quantity::SemiMajorAxis)?;
                check_regime(self.materialized(Quantity::SemiMajorAxis), &values)?;
            }
            _ => {}
        }

        if q.is_cartesian() {
            if self.source != StateSource::Cartesian {
                self.switch_to_cartesian()?;
            }
        } else {
            let (orientation, anomaly) = match self.source {
                StateSource::Elements {
                    orientation,
                    anomaly,
                } => (orientation, anomaly),
                StateSource::Cartesian => self.switch_to_elements()?,
            };

            let mut orientation = orientation;
            let mut anomaly = anomaly;
            if q.is_orientation() {
                let (replaced, dropped) = orientation.replace(q);
                if let Some(dropped) = dropped {
                    self.inputs.remove(dropped);
                }
                orientation = replaced;
            } else if let Some(choice) = q.anomaly_choice() {
                if choice != anomaly {
                    self.inputs.remove(anomaly.quantity());
                }
                anomaly = choice;
            }
            self.source = StateSource::Elements {
                orientation,
                anomaly,
            };
        }

        self.inputs.insert(q, values);
        self.cache.clear();
        Ok(())
    }

    /// Same as [`BodyBatch::set`], with the quantity given by its short name.
    pub fn set_by_name(&mut self, name: &str, values: Vec<f64>) -> Result<(), SpaceRocksError> {
        let q: Quantity = name.parse()?;
        self.set(q, values)
    }

    fn switch_to_cartesian(&mut self) -> Result<(), SpaceRocksError> {
        self.ensure_vector(VectorQuantity::Position)?;
        self.ensure_vector(VectorQuantity::Velocity)?;

        let state: Vec<_> = Quantity::CARTESIAN
            .into_iter()
            .map(|q| (q, self.materialized(q).to_vec()))
            .collect();
        self.inputs.reset(state);
        self.source = StateSource::Cartesian;

        debug!(bodies = self.len(), "body batch switched to Cartesian inputs");
        Ok(())
    }

    fn switch_to_elements(&mut self) -> Result<(Orientation, AnomalyChoice), SpaceRocksError> {
        let orientation = Orientation::NodeArg;
        let anomaly = AnomalyChoice::MeanAnomaly;
        let inputs = StateSource::Elements {
            orientation,
            anomaly,
        }
        .inputs();

        for &q in &inputs {
            self.ensure(q)?;
        }
        let elements: Vec<_> = inputs
            .into_iter()
            .map(|q| (q, self.materialized(q).to_vec()))
            .collect();
        self.inputs.reset(elements);
        self.source = StateSource::Elements {
            orientation,
            anomaly,
        };

        debug!(bodies = self.len(), "body batch switched to Keplerian inputs");
        Ok((orientation, anomaly))
    }

    fn lookup(&self, q: Quantity) -> Option<&[f64]> {
        self.inputs
            .get(q)
            .or_else(|| self.cache.component(q))
            .or_else(|| self.cache.keplerian.get(&q).map(Vec::as_slice))
    }

    /// Stored values of `q`; callers ensure it first.
    fn materialized(&self, q: Quantity) -> &[f64] {
        self.lookup(q)
            .unwrap_or_else(|| unreachable!("{q} read before being materialized"))
    }

    fn materialized_vector(&self, v: VectorQuantity) -> &Vector3Batch {
        self.cache
            .vector(v)
            .unwrap_or_else(|| unreachable!("{v:?} read before being materialized"))
    }
}

macro_rules! quantity_getters {
    ($($(#[$doc:meta])* $name:ident => $q:ident),* $(,)?) => {
        impl BodyBatch {
            $(
                $(#[$doc])*
                pub fn $name(&mut self) -> Result<&[f64], SpaceRocksError> {
                    self.get(Quantity::$q)
                }
            )*
        }
    };
}

quantity_getters! {
    x => X,
    y => Y,
    z => Z,
    vx => Vx,
    vy => Vy,
    vz => Vz,
    /// Semi-major axis (AU), negative for hyperbolic orbits.
    semi_major_axis => SemiMajorAxis,
    eccentricity => Eccentricity,
    inclination => Inclination,
    node => Node,
    arg => Arg,
    varpi => Varpi,
    /// Mean anomaly, in `[0, 2π)` for elliptic bodies and unbounded for hyperbolic ones.
    mean_anomaly => MeanAnomaly,
    eccentric_anomaly => EccentricAnomaly,
    true_anomaly => TrueAnomaly,
    true_longitude => TrueLongitude,
    mean_longitude => MeanLongitude,
    /// Julian date (TDB) of pericenter passage.
    t_peri => TPeri,
    semi_minor_axis => SemiMinorAxis,
    semi_latus_rectum => SemiLatusRectum,
    /// Pericenter distance `q = a(1 − e)`.
    pericenter => Pericenter,
    /// Apocenter distance `Q = a(1 + e)`, infinite for hyperbolic orbits.
    apocenter => Apocenter,
    mean_motion => MeanMotion,
    /// Distance to the origin of the frame.
    radius => Radius,
    rrdot => Rrdot,
    /// Tisserand parameter with respect to Jupiter.
    tisserand => Tisserand,
}

impl BodyBatch {
    pub fn position(&mut self) -> Result<&Vector3Batch, SpaceRocksError> {
        self.get_vector(VectorQuantity::Position)
    }

    pub fn velocity(&mut self) -> Result<&Vector3Batch, SpaceRocksError> {
        self.get_vector(VectorQuantity::Velocity)
    }
}
