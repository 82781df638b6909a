//! # Constants and type definitions for spacerocks
//!
//! This module centralizes the **physical constants**, **conversion factors**, and
//! **type aliases** shared by the derivation engine, the Kepler solver and the SPK reader.
//!
//! ## Overview
//!
//! - Gravitational parameters of the Sun and of the whole solar system
//! - Unit conversions (arcseconds → radians, days ↔ seconds, AU ↔ km)
//! - Reference epochs
//! - Type aliases documenting the unit carried by a plain `f64`
//!
//! The engine works on plain scalars in fixed units: **AU**, **AU/day**, **radians**, **days**.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Julian date of J2000.0 (2000-01-01 12:00:00 TDB)
pub const J2000_JD: f64 = 2_451_545.0;

/// MJD epoch of J2000.0
pub const T2000: f64 = 51544.5;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Heliocentric gravitational parameter GM☉ in AU³/day²
pub const MU_HELIO: f64 = 2.959_122_082_855_911e-4;

/// Gravitational parameter of the Sun plus the planets in AU³/day², used when the origin
/// is the solar-system barycenter.
pub const MU_BARY: f64 = 2.963_092_749_345_747_5e-4;

/// Semi-major axis of Jupiter in AU, reference for the Tisserand parameter
pub const JUPITER_SEMI_MAJOR_AXIS: f64 = 5.2;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Julian Date (days, TDB)
pub type JulianDate = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_mu_consistency() {
        // k², with k the Gaussian gravitational constant
        assert!((0.01720209895_f64.powi(2) - MU_HELIO).abs() < 1e-15);

        // the planets add roughly 1/744 of a solar mass
        let mass_ratio = MU_BARY / MU_HELIO;
        assert!(mass_ratio > 1.0013 && mass_ratio < 1.0014);
    }

    #[test]
    fn test_epoch_offsets() {
        assert_eq!(J2000_JD - 2_400_000.5, T2000);
    }
}
