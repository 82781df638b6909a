//! DAF (Double precision Array File) file record.
//!
//! The first 1024-byte record of an SPK kernel describes the layout of the rest of the
//! file:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for ephemeris kernels.
//! * **`nd`** / **`ni`**: number of double / integer components of each segment summary
//!   (`2` and `6` for SPK).
//! * **`fward`** / **`bward`**: record numbers (1-based) of the first and last summary
//!   records.
//! * **`free`**: first free address, in double-precision words.
//! * **`locfmt`**: binary format of the numbers stored in the file (`"LTL-IEEE"` or
//!   `"BIG-IEEE"`).
//!
//! Only little-endian kernels are supported; [`DAFHeader::validate`] rejects the others.
use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::spacerocks_errors::SpaceRocksError;

/// Size of a DAF physical record, in bytes.
pub(crate) const RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

impl DAFHeader {
    /// Parse the file record.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: The first bytes of the file, at least 727 of them.
    ///
    /// Return
    /// ----------
    /// * The remaining input and the header, text fields trimmed of their padding.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, id_word) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        // reserved block, then the FTP validation string
        let (input, _) = take(603usize)(input)?;
        let (input, _) = take(28usize)(input)?;
        Ok((
            input,
            DAFHeader {
                idword: String::from_utf8_lossy(id_word).trim().to_string(),
                internal_filename: String::from_utf8_lossy(ifname).trim().to_string(),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: String::from_utf8_lossy(locfmt).trim().to_string(),
            },
        ))
    }

    /// Check that the file is a little-endian SPK kernel with a usable summary layout.
    pub fn validate(&self) -> Result<(), SpaceRocksError> {
        if self.idword != "DAF/SPK" {
            return Err(SpaceRocksError::NomParsingError(format!(
                "not an SPK kernel, id word is {:?}",
                self.idword
            )));
        }
        if self.locfmt != "LTL-IEEE" {
            return Err(SpaceRocksError::NomParsingError(format!(
                "unsupported binary format {:?}, only LTL-IEEE kernels are read",
                self.locfmt
            )));
        }
        if self.nd < 2 || self.ni < 6 || self.fward < 2 {
            return Err(SpaceRocksError::NomParsingError(format!(
                "inconsistent DAF layout: nd = {}, ni = {}, fward = {}",
                self.nd, self.ni, self.fward
            )));
        }
        Ok(())
    }

    /// Size of one segment summary, in double-precision words: `nd + ceil(ni / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 14;
        let border = format!("+{:-<w$}+{:-<32}+", "", "", w = LABEL_WIDTH + 2);

        writeln!(f, "{border}")?;
        let rows = [
            ("ID word", self.idword.clone()),
            ("Internal name", self.internal_filename.clone()),
            ("ND / NI", format!("{} / {}", self.nd, self.ni)),
            ("Summaries", format!("records {} to {}", self.fward, self.bward)),
            ("Free address", self.free.to_string()),
            ("Binary format", self.locfmt.clone()),
        ];
        for (label, value) in rows {
            writeln!(f, "| {label:<LABEL_WIDTH$} | {value:<30} |")?;
        }
        writeln!(f, "{border}")
    }
}
