//! Rotations between the equatorial and ecliptic J2000 planes.
//!
//! SPK kernels store states in the ICRF, aligned with the mean equator of J2000. Bodies
//! are carried in the mean ecliptic of J2000, obtained by a rotation about the x axis by
//! the mean obliquity at J2000.
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{Radian, MJD, RADSEC, T2000};

/// Reference plane of a Cartesian state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferencePlane {
    /// Mean ecliptic and equinox of J2000.
    #[default]
    Ecliptic,
    /// Mean equator and equinox of J2000 (ICRF).
    Equatorial,
}

impl ReferencePlane {
    /// Rotation taking vectors expressed in `self` to vectors expressed in `target`.
    pub fn rotation_to(self, target: ReferencePlane) -> Rotation3<f64> {
        match (self, target) {
            (ReferencePlane::Equatorial, ReferencePlane::Ecliptic) => equatorial_to_ecliptic(),
            (ReferencePlane::Ecliptic, ReferencePlane::Equatorial) => ecliptic_to_equatorial(),
            _ => Rotation3::identity(),
        }
    }
}

/// Mean obliquity of the ecliptic (IAU 1976).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TDT).
///
/// Return
/// ------
/// * The mean obliquity in radians.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Rotation from the J2000 equator to the J2000 ecliptic.
pub fn equatorial_to_ecliptic() -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), -obleq(T2000))
}

/// Rotation from the J2000 ecliptic to the J2000 equator.
pub fn ecliptic_to_equatorial() -> Rotation3<f64> {
    equatorial_to_ecliptic().inverse()
}
