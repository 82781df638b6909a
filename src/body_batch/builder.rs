use std::collections::BTreeMap;

use itertools::Itertools;

use super::{cache::DerivedCache, check_length, check_regime, BodyBatch, Frame, Primaries};
use crate::{
    kepler::KeplerSolverConfig,
    quantity::{AnomalyChoice, Orientation, Quantity, StateSource},
    spacerocks_errors::SpaceRocksError,
};

/// Collects the primaries of a [`BodyBatch`] and validates them as a whole.
///
/// Nothing is checked until [`BodyBatchBuilder::build`]; supplying the same quantity twice
/// keeps the last values.
#[derive(Debug, Clone)]
pub struct BodyBatchBuilder {
    epoch: Vec<f64>,
    frame: Frame,
    solver: KeplerSolverConfig,
    supplied: BTreeMap<Quantity, Vec<f64>>,
}

impl BodyBatchBuilder {
    pub fn new(epoch: Vec<f64>) -> Self {
        BodyBatchBuilder {
            epoch,
            frame: Frame::default(),
            solver: KeplerSolverConfig::default(),
            supplied: BTreeMap::new(),
        }
    }

    /// Origin of the supplied state. Defaults to [`Frame::Heliocentric`].
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn solver_config(mut self, solver: KeplerSolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Supply the values of `q` for every body.
    pub fn with(mut self, q: Quantity, values: Vec<f64>) -> Self {
        self.supplied.insert(q, values);
        self
    }

    /// Validate the supplied quantities and create the batch.
    ///
    /// Return
    /// ----------
    /// * [`SpaceRocksError::ReadOnlyQuantity`] if a derived quantity was supplied.
    /// * [`SpaceRocksError::LengthMismatch`] if an array does not match the epochs.
    /// * [`SpaceRocksError::ConflictingInputs`] for Cartesian components mixed with
    ///   elements, several anomaly choices, node, arg and varpi together, or a semi-major
    ///   axis whose sign contradicts the eccentricity.
    /// * [`SpaceRocksError::UnderSpecified`] when neither a full Cartesian state nor a full
    ///   element set was supplied.
    pub fn build(self) -> Result<BodyBatch, SpaceRocksError> {
        let n = self.epoch.len();
        for (&q, values) in &self.supplied {
            if !q.is_primary() {
                return Err(SpaceRocksError::ReadOnlyQuantity(q.to_string()));
            }
            check_length(q, values.len(), n)?;
        }

        let supplied: Vec<Quantity> = self.supplied.keys().copied().collect();
        let source = resolve_source(&supplied)?;
        if let (Some(a), Some(e)) = (
            self.supplied.get(&Quantity::SemiMajorAxis),
            self.supplied.get(&Quantity::Eccentricity),
        ) {
            check_regime(a, e)?;
        }

        let mut inputs = Primaries::default();
        inputs.reset(self.supplied);

        Ok(BodyBatch {
            epoch: self.epoch,
            frame: self.frame,
            mu: self.frame.mu(),
            source,
            solver: self.solver,
            inputs,
            cache: DerivedCache::default(),
        })
    }
}

/// Input set described by the supplied primaries.
fn resolve_source(supplied: &[Quantity]) -> Result<StateSource, SpaceRocksError> {
    if supplied.is_empty() {
        return Err(SpaceRocksError::UnderSpecified(
            "nothing supplied, expected a Cartesian state or an element set".into(),
        ));
    }

    let (cartesian, elements): (Vec<Quantity>, Vec<Quantity>) =
        supplied.iter().partition(|q| q.is_cartesian());

    if !cartesian.is_empty() && !elements.is_empty() {
        return Err(SpaceRocksError::ConflictingInputs(format!(
            "Cartesian components ({}) mixed with orbital elements ({})",
            cartesian.iter().join(", "),
            elements.iter().join(", ")
        )));
    }

    if !cartesian.is_empty() {
        let missing: Vec<_> = Quantity::CARTESIAN
            .into_iter()
            .filter(|q| !cartesian.contains(q))
            .collect();
        if !missing.is_empty() {
            return Err(SpaceRocksError::UnderSpecified(format!(
                "missing Cartesian components: {}",
                missing.iter().join(", ")
            )));
        }
        return Ok(StateSource::Cartesian);
    }

    let angles: Vec<Quantity> = elements
        .iter()
        .copied()
        .filter(|q| q.is_orientation())
        .collect();
    let anomalies: Vec<AnomalyChoice> = elements
        .iter()
        .filter_map(|q| q.anomaly_choice())
        .collect();

    if angles.len() > 2 {
        return Err(SpaceRocksError::ConflictingInputs(
            "node, arg and varpi supplied together, give exactly two of them".into(),
        ));
    }
    if anomalies.len() > 1 {
        return Err(SpaceRocksError::ConflictingInputs(format!(
            "several anomaly choices supplied: {}",
            anomalies.iter().map(|a| a.quantity()).join(", ")
        )));
    }

    let mut missing: Vec<String> = [
        Quantity::SemiMajorAxis,
        Quantity::Eccentricity,
        Quantity::Inclination,
    ]
    .into_iter()
    .filter(|q| !elements.contains(q))
    .map(|q| q.to_string())
    .collect();
    if angles.len() < 2 {
        missing.push("two of node, arg, varpi".into());
    }
    if anomalies.is_empty() {
        missing.push("one of M, E, true_anomaly, true_longitude, mean_longitude, t_peri".into());
    }

    let orientation = match angles.as_slice() {
        [first, second] => Orientation::from_pair(*first, *second),
        _ => None,
    };
    match (orientation, anomalies.first()) {
        (Some(orientation), Some(&anomaly)) if missing.is_empty() => Ok(StateSource::Elements {
            orientation,
            anomaly,
        }),
        _ => Err(SpaceRocksError::UnderSpecified(format!(
            "missing {}",
            missing.join("; ")
        ))),
    }
}

macro_rules! builder_setters {
    ($($name:ident => $q:ident),* $(,)?) => {
        impl BodyBatchBuilder {
            $(
                pub fn $name(self, values: Vec<f64>) -> Self {
                    self.with(Quantity::$q, values)
                }
            )*
        }
    };
}

builder_setters! {
    x => X,
    y => Y,
    z => Z,
    vx => Vx,
    vy => Vy,
    vz => Vz,
    semi_major_axis => SemiMajorAxis,
    eccentricity => Eccentricity,
    inclination => Inclination,
    node => Node,
    arg => Arg,
    varpi => Varpi,
    mean_anomaly => MeanAnomaly,
    eccentric_anomaly => EccentricAnomaly,
    true_anomaly => TrueAnomaly,
    true_longitude => TrueLongitude,
    mean_longitude => MeanLongitude,
    t_peri => TPeri,
}
