//! Epoch conversions.
//!
//! Body epochs are Julian dates in the TDB scale. SPK kernels are indexed by ephemeris
//! time, TDB seconds past J2000.
use hifitime::Epoch;
use std::str::FromStr;

use crate::{constants::JulianDate, spacerocks_errors::SpaceRocksError};

/// Julian date (TDB) to TDB seconds past J2000.
pub fn jd_tdb_to_et_seconds(jd: JulianDate) -> f64 {
    Epoch::from_jde_tdb(jd).to_tdb_seconds()
}

/// TDB seconds past J2000 to Julian date (TDB).
pub fn et_seconds_to_jd_tdb(et_seconds: f64) -> JulianDate {
    Epoch::from_tdb_seconds(et_seconds).to_jde_tdb_days()
}

/// Parse a date into a Julian date in the TDB scale.
///
/// Argument
/// --------
/// * `date`: an ISO 8601 / RFC 3339 date, such as `"2024-04-10T12:30:45 TDB"`. Dates
///   without a time scale suffix are read as UTC.
///
/// Return
/// ------
/// * the Julian date (TDB), or [`SpaceRocksError::InvalidDate`] if the string cannot be
///   parsed
pub fn date_to_jd_tdb(date: &str) -> Result<JulianDate, SpaceRocksError> {
    Epoch::from_str(date)
        .map(|epoch| epoch.to_jde_tdb_days())
        .map_err(|err| SpaceRocksError::InvalidDate(format!("{date}: {err}")))
}
