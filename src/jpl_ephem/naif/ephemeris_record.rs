//! Type-2 SPK records and their Chebyshev evaluation.
//!
//! A record holds, as little-endian doubles: the midpoint `mid` of its interval (TDB
//! seconds past J2000), the half-width `radius` (seconds), then `ncoeff` Chebyshev
//! coefficients for each of x, y and z (km).
//!
//! With `τ = (t − mid) / radius`, the position is `Σ cₙ·Tₙ(τ)` and the velocity is
//! `Σ cₙ·T'ₙ(τ) / radius` (km/s).
use nalgebra::Vector3;
use nom::{multi::count, number::complete::le_f64, IResult};

use crate::spacerocks_errors::SpaceRocksError;

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub mid: f64,
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    pub fn parse(input: &[u8], ncoeff: usize) -> IResult<&[u8], Self> {
        let (input, mid) = le_f64(input)?;
        let (input, radius) = le_f64(input)?;
        let (input, x) = count(le_f64, ncoeff)(input)?;
        let (input, y) = count(le_f64, ncoeff)(input)?;
        let (input, z) = count(le_f64, ncoeff)(input)?;
        Ok((
            input,
            EphemerisRecord {
                mid,
                radius,
                x,
                y,
                z,
            },
        ))
    }

    /// Decode the contiguous records of a segment.
    ///
    /// Arguments
    /// -----------------
    /// * `data`: The bytes of the `n_records` records, without the directory footer.
    /// * `rsize`: Record size in double-precision words.
    /// * `n_records`: Number of records to decode.
    pub fn parse_segment(
        data: &[u8],
        rsize: usize,
        n_records: usize,
    ) -> Result<Vec<Self>, SpaceRocksError> {
        let ncoeff = (rsize - 2) / 3;
        let records: Vec<Self> = data
            .chunks_exact(rsize * 8)
            .take(n_records)
            .map(|chunk| Self::parse(chunk, ncoeff).map(|(_, record)| record))
            .collect::<Result<_, _>>()?;

        if records.len() != n_records {
            return Err(SpaceRocksError::NomParsingError(format!(
                "segment holds {} complete records, its directory announces {n_records}",
                records.len()
            )));
        }
        Ok(records)
    }

    /// Position (km) and velocity (km/s) at `et_seconds`.
    ///
    /// The normalized time is clamped to `[-1, 1]`.
    pub fn interpolate(&self, et_seconds: f64) -> (Vector3<f64>, Vector3<f64>) {
        let tau = ((et_seconds - self.mid) / self.radius).clamp(-1.0, 1.0);
        let n = self.x.len();

        // Tₙ(τ) and T'ₙ(τ) by the three-term recurrences
        let mut poly = vec![0.0; n];
        let mut deriv = vec![0.0; n];
        if n > 0 {
            poly[0] = 1.0;
        }
        if n > 1 {
            poly[1] = tau;
            deriv[1] = 1.0;
        }
        for k in 2..n {
            poly[k] = 2.0 * tau * poly[k - 1] - poly[k - 2];
            deriv[k] = 2.0 * tau * deriv[k - 1] + 2.0 * poly[k - 1] - deriv[k - 2];
        }

        let series = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis).map(|(c, b)| c * b).sum()
        };

        let position = Vector3::new(
            series(&self.x, &poly),
            series(&self.y, &poly),
            series(&self.z, &poly),
        );
        let velocity = Vector3::new(
            series(&self.x, &deriv),
            series(&self.y, &deriv),
            series(&self.z, &deriv),
        ) / self.radius;

        (position, velocity)
    }
}
