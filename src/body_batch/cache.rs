//! Storage of the materialized quantities of a batch.
//!
//! Inputs live in [`Primaries`] and are never invalidated. Everything derived lives in
//! [`DerivedCache`], split in three groups that are always cleared together when the
//! state changes.
use ahash::AHashMap;

use crate::{
    quantity::{Quantity, VectorQuantity},
    vector_batch::Vector3Batch,
};

/// The primaries currently driving the batch.
#[derive(Debug, Clone, Default)]
pub(crate) struct Primaries {
    values: AHashMap<Quantity, Vec<f64>>,
}

impl Primaries {
    pub(crate) fn get(&self, q: Quantity) -> Option<&[f64]> {
        self.values.get(&q).map(Vec::as_slice)
    }

    pub(crate) fn contains(&self, q: Quantity) -> bool {
        self.values.contains_key(&q)
    }

    pub(crate) fn insert(&mut self, q: Quantity, values: Vec<f64>) {
        self.values.insert(q, values);
    }

    pub(crate) fn remove(&mut self, q: Quantity) {
        self.values.remove(&q);
    }

    /// Replace every input at once.
    pub(crate) fn reset<I>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = (Quantity, Vec<f64>)>,
    {
        self.values = inputs.into_iter().collect();
    }
}

/// Position and velocity, in the frame of the batch.
#[derive(Debug, Clone, Default)]
pub(crate) struct CartesianGroup {
    pub(crate) position: Option<Vector3Batch>,
    pub(crate) velocity: Option<Vector3Batch>,
}

/// Intermediate two-body vectors.
#[derive(Debug, Clone, Default)]
pub(crate) struct VectorGroup {
    pub(crate) angular_momentum: Option<Vector3Batch>,
    pub(crate) eccentricity: Option<Vector3Batch>,
    pub(crate) ascending_node: Option<Vector3Batch>,
    pub(crate) orbital_position: Option<Vector3Batch>,
    pub(crate) orbital_velocity: Option<Vector3Batch>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DerivedCache {
    pub(crate) cartesian: CartesianGroup,
    pub(crate) vectors: VectorGroup,
    pub(crate) keplerian: AHashMap<Quantity, Vec<f64>>,
}

impl DerivedCache {
    pub(crate) fn vector(&self, v: VectorQuantity) -> Option<&Vector3Batch> {
        match v {
            VectorQuantity::Position => self.cartesian.position.as_ref(),
            VectorQuantity::Velocity => self.cartesian.velocity.as_ref(),
            VectorQuantity::AngularMomentum => self.vectors.angular_momentum.as_ref(),
            VectorQuantity::Eccentricity => self.vectors.eccentricity.as_ref(),
            VectorQuantity::AscendingNode => self.vectors.ascending_node.as_ref(),
            VectorQuantity::OrbitalPosition => self.vectors.orbital_position.as_ref(),
            VectorQuantity::OrbitalVelocity => self.vectors.orbital_velocity.as_ref(),
        }
    }

    pub(crate) fn store_vector(&mut self, v: VectorQuantity, value: Vector3Batch) {
        let slot = match v {
            VectorQuantity::Position => &mut self.cartesian.position,
            VectorQuantity::Velocity => &mut self.cartesian.velocity,
            VectorQuantity::AngularMomentum => &mut self.vectors.angular_momentum,
            VectorQuantity::Eccentricity => &mut self.vectors.eccentricity,
            VectorQuantity::AscendingNode => &mut self.vectors.ascending_node,
            VectorQuantity::OrbitalPosition => &mut self.vectors.orbital_position,
            VectorQuantity::OrbitalVelocity => &mut self.vectors.orbital_velocity,
        };
        *slot = Some(value);
    }

    /// Scalar component of position or velocity, when that vector is materialized.
    pub(crate) fn component(&self, q: Quantity) -> Option<&[f64]> {
        let (vector, axis) = match q {
            Quantity::X => (&self.cartesian.position, 0),
            Quantity::Y => (&self.cartesian.position, 1),
            Quantity::Z => (&self.cartesian.position, 2),
            Quantity::Vx => (&self.cartesian.velocity, 0),
            Quantity::Vy => (&self.cartesian.velocity, 1),
            Quantity::Vz => (&self.cartesian.velocity, 2),
            _ => return None,
        };
        vector.as_ref().map(|v| match axis {
            0 => v.x.as_slice(),
            1 => v.y.as_slice(),
            _ => v.z.as_slice(),
        })
    }

    /// Drop every derived quantity.
    pub(crate) fn clear(&mut self) {
        self.cartesian = CartesianGroup::default();
        self.vectors = VectorGroup::default();
        self.keplerian.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cartesian.position.is_none()
            && self.cartesian.velocity.is_none()
            && self.vectors.angular_momentum.is_none()
            && self.vectors.eccentricity.is_none()
            && self.vectors.ascending_node.is_none()
            && self.vectors.orbital_position.is_none()
            && self.vectors.orbital_velocity.is_none()
            && self.keplerian.is_empty()
    }
}
