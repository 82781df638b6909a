//! Origin of the Cartesian state and conversion between origins.
//!
//! A frame change translates position and velocity by the offset of the Sun relative to
//! the solar-system barycenter, read from an [`OriginOffset`] once per distinct epoch.
//! The translated Cartesian state becomes the new input set: every other quantity is
//! dropped and derived again on demand with the gravitational parameter of the new origin.
use std::{collections::hash_map::Entry, fmt};

use ahash::AHashMap;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BodyBatch;
use crate::{
    constants::{MU_BARY, MU_HELIO},
    jpl_ephem::OriginOffset,
    quantity::{Quantity, StateSource, VectorQuantity},
    spacerocks_errors::SpaceRocksError,
    vector_batch::Vector3Batch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frame {
    /// Centered on the Sun.
    #[default]
    Heliocentric,
    /// Centered on the solar-system barycenter.
    Barycentric,
}

impl Frame {
    /// Gravitational parameter of the central mass, AU³/day².
    pub fn mu(self) -> f64 {
        match self {
            Frame::Heliocentric => MU_HELIO,
            Frame::Barycentric => MU_BARY,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Heliocentric => write!(f, "heliocentric"),
            Frame::Barycentric => write!(f, "barycentric"),
        }
    }
}

impl BodyBatch {
    /// Move the origin to the solar-system barycenter. No-op if already barycentric.
    ///
    /// Arguments
    /// -----------------
    /// * `ephem`: Source of the Sun offset relative to the barycenter.
    ///
    /// Return
    /// ----------
    /// * The first error raised by `ephem` or by the derivation of the Cartesian state.
    ///   The batch is left untouched on error.
    pub fn to_barycentric<E: OriginOffset + ?Sized>(
        &mut self,
        ephem: &E,
    ) -> Result<(), SpaceRocksError> {
        self.change_frame(Frame::Barycentric, ephem)
    }

    /// Move the origin to the Sun. No-op if already heliocentric.
    ///
    /// See [`BodyBatch::to_barycentric`].
    pub fn to_heliocentric<E: OriginOffset + ?Sized>(
        &mut self,
        ephem: &E,
    ) -> Result<(), SpaceRocksError> {
        self.change_frame(Frame::Heliocentric, ephem)
    }

    fn change_frame<E: OriginOffset + ?Sized>(
        &mut self,
        target: Frame,
        ephem: &E,
    ) -> Result<(), SpaceRocksError> {
        if self.frame == target {
            return Ok(());
        }

        self.ensure_vector(VectorQuantity::Position)?;
        self.ensure_vector(VectorQuantity::Velocity)?;

        // one ephemeris query per distinct epoch, all before touching the state
        let mut offsets: AHashMap<u64, (Vector3<f64>, Vector3<f64>)> = AHashMap::new();
        for &epoch in &self.epoch {
            if let Entry::Vacant(slot) = offsets.entry(epoch.to_bits()) {
                slot.insert(ephem.origin_offset(epoch)?);
            }
        }

        let sign = match target {
            Frame::Barycentric => 1.0,
            Frame::Heliocentric => -1.0,
        };
        let position = self.materialized_vector(VectorQuantity::Position);
        let velocity = self.materialized_vector(VectorQuantity::Velocity);
        let mut new_position = Vector3Batch::zeros(self.len());
        let mut new_velocity = Vector3Batch::zeros(self.len());

        for (i, epoch) in self.epoch.iter().enumerate() {
            let (dr, dv) = offsets[&epoch.to_bits()];
            let r = position.get(i) + sign * dr;
            let v = velocity.get(i) + sign * dv;
            (new_position.x[i], new_position.y[i], new_position.z[i]) = (r.x, r.y, r.z);
            (new_velocity.x[i], new_velocity.y[i], new_velocity.z[i]) = (v.x, v.y, v.z);
        }

        self.inputs.reset([
            (Quantity::X, new_position.x.clone()),
            (Quantity::Y, new_position.y.clone()),
            (Quantity::Z, new_position.z.clone()),
            (Quantity::Vx, new_velocity.x.clone()),
            (Quantity::Vy, new_velocity.y.clone()),
            (Quantity::Vz, new_velocity.z.clone()),
        ]);
        self.source = StateSource::Cartesian;
        self.cache.clear();
        self.cache.store_vector(VectorQuantity::Position, new_position);
        self.cache.store_vector(VectorQuantity::Velocity, new_velocity);

        debug!(
            bodies = self.len(),
            distinct_epochs = offsets.len(),
            from = %self.frame,
            to = %target,
            "body batch origin changed"
        );
        self.frame = target;
        self.mu = target.mu();
        Ok(())
    }
}
