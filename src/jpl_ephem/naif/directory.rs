//! Directory footer of an SPK type-2 segment.
//!
//! The last four double-precision words of a segment hold:
//!
//! * `init`: start of the first record (TDB seconds past J2000),
//! * `intlen`: time span covered by each record (seconds),
//! * `rsize`: record size in double-precision words,
//! * `n`: number of records.
//!
//! DAF addresses count 8-byte words from 1, so the footer of a segment ending at address
//! `final_addr` starts at byte `(final_addr − 4) · 8`.
use std::{
    fmt,
    io::{Read, Seek, SeekFrom},
};

use hifitime::{Duration, Epoch};
use nom::{number::complete::le_f64, IResult};

use crate::spacerocks_errors::SpaceRocksError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    fn parse_words(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, init) = le_f64(input)?;
        let (input, intlen) = le_f64(input)?;
        let (input, rsize) = le_f64(input)?;
        let (input, n_records) = le_f64(input)?;
        Ok((
            input,
            DirectoryData {
                init,
                intlen,
                rsize: rsize as usize,
                n_records: n_records as usize,
            },
        ))
    }

    /// Read the footer of the segment ending at `final_addr`.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: The kernel, positioned anywhere.
    /// * `final_addr`: Last address of the segment, in double-precision words (1-based).
    ///
    /// Return
    /// ----------
    /// * The directory, or an error if the footer cannot be read or is inconsistent
    ///   (a record needs at least the midpoint, the radius and one coefficient per axis).
    pub fn read<R: Read + Seek>(reader: &mut R, final_addr: usize) -> Result<Self, SpaceRocksError> {
        if final_addr < 4 {
            return Err(SpaceRocksError::NomParsingError(format!(
                "segment ending at address {final_addr} is too short for a directory"
            )));
        }
        let mut buffer = [0u8; 32];
        reader.seek(SeekFrom::Start(((final_addr - 4) * 8) as u64))?;
        reader.read_exact(&mut buffer)?;

        let (_, directory) = Self::parse_words(&buffer)?;
        if directory.rsize < 5
            || !directory.init.is_finite()
            || !directory.intlen.is_finite()
            || directory.intlen <= 0.0
            || directory.n_records == 0
        {
            return Err(SpaceRocksError::NomParsingError(format!(
                "inconsistent segment directory: {directory:?}"
            )));
        }
        Ok(directory)
    }

    /// Number of Chebyshev coefficients per axis in each record.
    pub fn n_coefficients(&self) -> usize {
        (self.rsize - 2) / 3
    }

    /// Index of the record covering `et_seconds`, clamped to the existing records.
    pub fn record_index(&self, et_seconds: f64) -> usize {
        let index = ((et_seconds - self.init) / self.intlen).floor();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(self.n_records - 1)
        }
    }
}

impl fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records of {} words, {} each from {}",
            self.n_records,
            self.rsize,
            Duration::from_seconds(self.intlen),
            Epoch::from_tdb_seconds(self.init)
        )
    }
}
