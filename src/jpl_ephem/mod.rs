//! Offset between the heliocentric and barycentric origins.
//!
//! Frame conversions only need the state of the Sun relative to the solar-system
//! barycenter at a given epoch. Anything able to provide it implements [`OriginOffset`]:
//! the SPK-backed [`JPLEphem`], or a plain closure.
use std::io::{Read, Seek};

use nalgebra::Vector3;
use tracing::info;

use crate::{
    constants::{JulianDate, AU, SECONDS_PER_DAY},
    ref_system::ReferencePlane,
    spacerocks_errors::SpaceRocksError,
    time::jd_tdb_to_et_seconds,
};

use download_jpl_file::EphemFileSource;
use naif::naif_data::NaifData;

pub mod download_jpl_file;
pub mod naif;

/// Source of the Sun offset used by frame conversions.
pub trait OriginOffset {
    /// Position (AU) and velocity (AU/day) of the Sun relative to the solar-system
    /// barycenter.
    ///
    /// Arguments
    /// -----------------
    /// * `epoch`: Julian date (TDB).
    fn origin_offset(
        &self,
        epoch: JulianDate,
    ) -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError>;
}

impl<F> OriginOffset for F
where
    F: Fn(JulianDate) -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError>,
{
    fn origin_offset(
        &self,
        epoch: JulianDate,
    ) -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError> {
        self(epoch)
    }
}

/// Sun ephemeris read from a JPL SPK kernel, rotated into a reference plane.
#[derive(Debug, Clone)]
pub struct JPLEphem {
    naif: NaifData,
    plane: ReferencePlane,
}

impl JPLEphem {
    /// Locate (and possibly download) the kernel, then load its Sun segments.
    ///
    /// Arguments
    /// -----------------
    /// * `file_source`: Where the kernel lives, see [`EphemFileSource`].
    /// * `plane`: Plane the offsets are expressed in.
    pub fn new(
        file_source: &EphemFileSource,
        plane: ReferencePlane,
    ) -> Result<Self, SpaceRocksError> {
        let path = file_source.resolve()?;
        info!(source = %file_source, path = %path, "loading JPL ephemeris");
        Ok(Self::from_naif(NaifData::read_naif_file(&path)?, plane))
    }

    /// Load the Sun segments of a kernel from any seekable source.
    pub fn from_reader<R: Read + Seek>(
        reader: &mut R,
        plane: ReferencePlane,
    ) -> Result<Self, SpaceRocksError> {
        Ok(Self::from_naif(NaifData::from_reader(reader)?, plane))
    }

    pub fn from_naif(naif: NaifData, plane: ReferencePlane) -> Self {
        JPLEphem { naif, plane }
    }

    pub fn plane(&self) -> ReferencePlane {
        self.plane
    }

    pub fn naif_data(&self) -> &NaifData {
        &self.naif
    }
}

impl OriginOffset for JPLEphem {
    fn origin_offset(
        &self,
        epoch: JulianDate,
    ) -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError> {
        let (position_km, velocity_km_s) = self
            .naif
            .sun_state(jd_tdb_to_et_seconds(epoch))
            .map_err(|err| match err {
                // report the epoch as the caller gave it
                SpaceRocksError::EphemerisUnavailable { reason, .. } => {
                    SpaceRocksError::EphemerisUnavailable { epoch, reason }
                }
                other => other,
            })?;

        let rotation = ReferencePlane::Equatorial.rotation_to(self.plane);
        let position = rotation * (position_km / AU);
        let velocity = rotation * (velocity_km_s * SECONDS_PER_DAY / AU);
        Ok((position, velocity))
    }
}
