//! # Quantity catalogue
//!
//! Names of every per-body quantity a [`BodyBatch`](crate::body_batch::BodyBatch) can
//! produce, and the tags describing which of them were supplied as inputs.
//!
//! ## Primaries
//!
//! The first eighteen [`Quantity`] variants are *primaries*: they may be supplied at
//! construction or assigned later. Everything else is read-only and always derived.
//!
//! ## Input sets
//!
//! A batch is driven either by a full Cartesian state or by a Keplerian set made of
//! `(a, e, inc)`, one [`Orientation`] pair and one [`AnomalyChoice`]. [`StateSource`] is the
//! tag the derivation rules dispatch on.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::spacerocks_errors::SpaceRocksError;

/// A scalar per-body quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quantity {
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
    /// Semi-major axis (AU), negative for hyperbolic orbits.
    SemiMajorAxis,
    Eccentricity,
    Inclination,
    /// Longitude of the ascending node.
    Node,
    /// Argument of pericenter.
    Arg,
    /// Longitude of pericenter, `node + arg`.
    Varpi,
    MeanAnomaly,
    EccentricAnomaly,
    TrueAnomaly,
    TrueLongitude,
    MeanLongitude,
    /// Julian date of pericenter passage.
    TPeri,
    SemiMinorAxis,
    SemiLatusRectum,
    /// Pericenter distance `q`.
    Pericenter,
    /// Apocenter distance `Q`, infinite for hyperbolic orbits.
    Apocenter,
    MeanMotion,
    /// Heliocentric (or barycentric) distance.
    Radius,
    /// `r · v`
    Rrdot,
    /// Tisserand parameter with respect to Jupiter.
    Tisserand,
}

impl Quantity {
    pub const ALL: [Quantity; 26] = [
        Quantity::X,
        Quantity::Y,
        Quantity::Z,
        Quantity::Vx,
        Quantity::Vy,
        Quantity::Vz,
        Quantity::SemiMajorAxis,
        Quantity::Eccentricity,
        Quantity::Inclination,
        Quantity::Node,
        Quantity::Arg,
        Quantity::Varpi,
        Quantity::MeanAnomaly,
        Quantity::EccentricAnomaly,
        Quantity::TrueAnomaly,
        Quantity::TrueLongitude,
        Quantity::MeanLongitude,
        Quantity::TPeri,
        Quantity::SemiMinorAxis,
        Quantity::SemiLatusRectum,
        Quantity::Pericenter,
        Quantity::Apocenter,
        Quantity::MeanMotion,
        Quantity::Radius,
        Quantity::Rrdot,
        Quantity::Tisserand,
    ];

    pub const CARTESIAN: [Quantity; 6] = [
        Quantity::X,
        Quantity::Y,
        Quantity::Z,
        Quantity::Vx,
        Quantity::Vy,
        Quantity::Vz,
    ];

    /// Short name, as used by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Quantity::X => "x",
            Quantity::Y => "y",
            Quantity::Z => "z",
            Quantity::Vx => "vx",
            Quantity::Vy => "vy",
            Quantity::Vz => "vz",
            Quantity::SemiMajorAxis => "a",
            Quantity::Eccentricity => "e",
            Quantity::Inclination => "inc",
            Quantity::Node => "node",
            Quantity::Arg => "arg",
            Quantity::Varpi => "varpi",
            Quantity::MeanAnomaly => "M",
            Quantity::EccentricAnomaly => "E",
            Quantity::TrueAnomaly => "true_anomaly",
            Quantity::TrueLongitude => "true_longitude",
            Quantity::MeanLongitude => "mean_longitude",
            Quantity::TPeri => "t_peri",
            Quantity::SemiMinorAxis => "b",
            Quantity::SemiLatusRectum => "p",
            Quantity::Pericenter => "q",
            Quantity::Apocenter => "Q",
            Quantity::MeanMotion => "n",
            Quantity::Radius => "r",
            Quantity::Rrdot => "rrdot",
            Quantity::Tisserand => "tisserand",
        }
    }

    /// Whether the quantity may be supplied or assigned.
    pub fn is_primary(self) -> bool {
        self <= Quantity::TPeri
    }

    pub fn is_cartesian(self) -> bool {
        self <= Quantity::Vz
    }

    pub fn is_orientation(self) -> bool {
        matches!(self, Quantity::Node | Quantity::Arg | Quantity::Varpi)
    }

    /// The anomaly tag carried by this quantity, if it is one of the six anomaly choices.
    pub fn anomaly_choice(self) -> Option<AnomalyChoice> {
        match self {
            Quantity::MeanAnomaly => Some(AnomalyChoice::MeanAnomaly),
            Quantity::EccentricAnomaly => Some(AnomalyChoice::EccentricAnomaly),
            Quantity::TrueAnomaly => Some(AnomalyChoice::TrueAnomaly),
            Quantity::TrueLongitude => Some(AnomalyChoice::TrueLongitude),
            Quantity::MeanLongitude => Some(AnomalyChoice::MeanLongitude),
            Quantity::TPeri => Some(AnomalyChoice::TPeri),
            _ => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantity {
    type Err = SpaceRocksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.name() == s)
            .ok_or_else(|| SpaceRocksError::UnknownQuantity(s.to_string()))
    }
}

/// A per-body 3-vector quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorQuantity {
    Position,
    Velocity,
    /// Specific angular momentum `h = r × v`.
    AngularMomentum,
    /// Eccentricity vector, pointing to the pericenter.
    Eccentricity,
    /// Node vector `ẑ × h`, pointing to the ascending node.
    AscendingNode,
    /// Position in the orbital plane, x toward the pericenter.
    OrbitalPosition,
    /// Velocity in the orbital plane.
    OrbitalVelocity,
}

/// The pair of orientation angles supplied with a Keplerian set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    NodeArg,
    VarpiArg,
    VarpiNode,
}

impl Orientation {
    pub fn angles(self) -> [Quantity; 2] {
        match self {
            Orientation::NodeArg => [Quantity::Node, Quantity::Arg],
            Orientation::VarpiArg => [Quantity::Varpi, Quantity::Arg],
            Orientation::VarpiNode => [Quantity::Varpi, Quantity::Node],
        }
    }

    pub fn contains(self, q: Quantity) -> bool {
        self.angles().contains(&q)
    }

    /// Orientation made of two distinct angles, `None` otherwise.
    pub fn from_pair(first: Quantity, second: Quantity) -> Option<Self> {
        use Quantity::{Arg, Node, Varpi};
        match (first, second) {
            (Node, Arg) | (Arg, Node) => Some(Orientation::NodeArg),
            (Varpi, Arg) | (Arg, Varpi) => Some(Orientation::VarpiArg),
            (Varpi, Node) | (Node, Varpi) => Some(Orientation::VarpiNode),
            _ => None,
        }
    }

    /// Pair obtained when `new_angle` is assigned to a batch oriented by `self`.
    ///
    /// The new angle is kept together with the current angle ranking first in
    /// arg, node, varpi order.
    ///
    /// Return
    /// ----------
    /// * The new orientation and the angle that left the input set, if any.
    pub fn replace(self, new_angle: Quantity) -> (Self, Option<Quantity>) {
        if self.contains(new_angle) {
            return (self, None);
        }
        let [first, second] = self.angles();
        let kept = [Quantity::Arg, Quantity::Node, Quantity::Varpi]
            .into_iter()
            .find(|q| *q == first || *q == second)
            .unwrap_or(first);
        let dropped = if kept == first { second } else { first };
        match Orientation::from_pair(new_angle, kept) {
            Some(orientation) => (orientation, Some(dropped)),
            None => (self, None),
        }
    }
}

/// The anomaly (or longitude, or pericenter time) supplied with a Keplerian set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyChoice {
    MeanAnomaly,
    EccentricAnomaly,
    TrueAnomaly,
    TrueLongitude,
    MeanLongitude,
    TPeri,
}

impl AnomalyChoice {
    pub fn quantity(self) -> Quantity {
        match self {
            AnomalyChoice::MeanAnomaly => Quantity::MeanAnomaly,
            AnomalyChoice::EccentricAnomaly => Quantity::EccentricAnomaly,
            AnomalyChoice::TrueAnomaly => Quantity::TrueAnomaly,
            AnomalyChoice::TrueLongitude => Quantity::TrueLongitude,
            AnomalyChoice::MeanLongitude => Quantity::MeanLongitude,
            AnomalyChoice::TPeri => Quantity::TPeri,
        }
    }
}

/// Which input set drives the derivation rules of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateSource {
    Cartesian,
    Elements {
        orientation: Orientation,
        anomaly: AnomalyChoice,
    },
}

impl StateSource {
    /// The primaries making up this input set.
    pub fn inputs(self) -> Vec<Quantity> {
        match self {
            StateSource::Cartesian => Quantity::CARTESIAN.to_vec(),
            StateSource::Elements {
                orientation,
                anomaly,
            } => {
                let [first, second] = orientation.angles();
                vec![
                    Quantity::SemiMajorAxis,
                    Quantity::Eccentricity,
                    Quantity::Inclination,
                    first,
                    second,
                    anomaly.quantity(),
                ]
            }
        }
    }
}

#[cfg(test)]
mod quantity_test {
    use super::*;

    #[test]
    fn test_primaries() {
        let primaries: Vec<_> = Quantity::ALL.into_iter().filter(|q| q.is_primary()).collect();
        assert_eq!(primaries.len(), 18);
        assert_eq!(primaries.last(), Some(&Quantity::TPeri));
        assert!(!Quantity::Tisserand.is_primary());
        assert!(Quantity::Vz.is_cartesian());
        assert!(!Quantity::SemiMajorAxis.is_cartesian());
    }

    #[test]
    fn test_names_round_trip() {
        for q in Quantity::ALL {
            assert_eq!(q.name().parse::<Quantity>().unwrap(), q);
        }
        assert_eq!("Q".parse::<Quantity>().unwrap(), Quantity::Apocenter);
        assert_eq!("q".parse::<Quantity>().unwrap(), Quantity::Pericenter);
        assert_eq!(
            "omega".parse::<Quantity>(),
            Err(SpaceRocksError::UnknownQuantity("omega".into()))
        );
    }

    #[test]
    fn test_orientation_replacement() {
        // arg is preferred over node and varpi
        assert_eq!(
            Orientation::NodeArg.replace(Quantity::Varpi),
            (Orientation::VarpiArg, Some(Quantity::Node))
        );
        assert_eq!(
            Orientation::VarpiArg.replace(Quantity::Node),
            (Orientation::NodeArg, Some(Quantity::Varpi))
        );
        // node is preferred over varpi
        assert_eq!(
            Orientation::VarpiNode.replace(Quantity::Arg),
            (Orientation::NodeArg, Some(Quantity::Varpi))
        );
        assert_eq!(Orientation::VarpiNode.replace(Quantity::Node), (Orientation::VarpiNode, None));
    }

    #[test]
    fn test_source_inputs() {
        let source = StateSource::Elements {
            orientation: Orientation::VarpiNode,
            anomaly: AnomalyChoice::TPeri,
        };
        assert_eq!(
            source.inputs(),
            vec![
                Quantity::SemiMajorAxis,
                Quantity::Eccentricity,
                Quantity::Inclination,
                Quantity::Varpi,
                Quantity::Node,
                Quantity::TPeri
            ]
        );
        assert_eq!(StateSource::Cartesian.inputs().len(), 6);
    }
}
