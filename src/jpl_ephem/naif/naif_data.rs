//! Loader for the Sun segments of a NAIF SPK kernel.
//!
//! The pipeline is:
//!
//! 1. read the **DAF file record** to discover the summary layout and the first summary
//!    record,
//! 2. follow the chain of **summary records**,
//! 3. for every segment of the Sun (NAIF 10) relative to the solar-system barycenter
//!    (NAIF 0), read the **directory** footer and decode all **Chebyshev records**.
//!
//! The other segments of the kernel are skipped without being read. Times are TDB
//! seconds past J2000, positions are kilometers and velocities km/s.
use std::{
    fmt,
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::Utf8Path;
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::{spacerocks_errors::SpaceRocksError, time::et_seconds_to_jd_tdb};

use super::{
    daf_header::{DAFHeader, RECORD_BYTES},
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    naif_ids::NaifId,
    summary_record::{Summary, SummaryRecord},
};

/// Only Chebyshev position-only segments are read.
const SPK_CHEBYSHEV_TYPE: i32 = 2;

/// A decoded segment: its descriptor, directory and records.
#[derive(Debug, Clone)]
pub struct Segment {
    pub summary: Summary,
    pub directory: DirectoryData,
    pub records: Vec<EphemerisRecord>,
}

impl Segment {
    /// Interpolate the segment at `et_seconds`, which must lie in its coverage.
    pub fn state(&self, et_seconds: f64) -> (Vector3<f64>, Vector3<f64>) {
        let index = self.directory.record_index(et_seconds);
        self.records[index].interpolate(et_seconds)
    }
}

/// In-memory Sun ephemeris read from an SPK kernel.
///
/// See also
/// ------------
/// * [`NaifData::read_naif_file`] – Build this structure from a kernel on disk.
/// * [`NaifData::sun_state`] – Barycentric state of the Sun at an ET epoch.
#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    pub(crate) segments: Vec<Segment>,
}

impl NaifData {
    /// Load the Sun segments of the SPK kernel at `path`.
    pub fn read_naif_file(path: &Utf8Path) -> Result<Self, SpaceRocksError> {
        if !path.exists() {
            return Err(SpaceRocksError::JPLFileNotFound(path.to_string()));
        }
        info!(path = %path, "reading SPK kernel");
        let mut reader = BufReader::new(File::open(path)?);
        Self::from_reader(&mut reader)
    }

    /// Load the Sun segments of an SPK kernel from any seekable source.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: The kernel bytes.
    ///
    /// Return
    /// ----------
    /// * The loaded segments, or an error if the kernel is malformed, holds a Sun segment
    ///   of a type other than 2, or has no Sun segment at all.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, SpaceRocksError> {
        let mut buffer = [0u8; RECORD_BYTES];
        reader.seek(SeekFrom::Start(0))?;
        reader.read_exact(&mut buffer)?;
        let (_, daf_header) = DAFHeader::parse(&buffer)?;
        daf_header.validate()?;
        debug!(
            fward = daf_header.fward,
            bward = daf_header.bward,
            "DAF file record parsed"
        );

        let summary_words = daf_header.summary_words();
        let target = NaifId::Sun.to_id();
        let center = NaifId::SolarSystemBarycenter.to_id();

        let mut segments = Vec::new();
        let mut next_record = daf_header.fward;
        let mut visited = 0;
        while next_record > 0 {
            // a corrupted chain could point backwards forever
            visited += 1;
            if visited > daf_header.bward.max(daf_header.fward) as usize {
                return Err(SpaceRocksError::NomParsingError(
                    "summary record chain does not terminate".to_string(),
                ));
            }

            reader.seek(SeekFrom::Start(
                (next_record as u64 - 1) * RECORD_BYTES as u64,
            ))?;
            reader.read_exact(&mut buffer)?;
            let (_, record) = SummaryRecord::parse(&buffer, summary_words)?;

            for summary in record
                .summaries
                .into_iter()
                .filter(|s| s.target == target && s.center == center)
            {
                if summary.data_type != SPK_CHEBYSHEV_TYPE {
                    return Err(SpaceRocksError::InvalidSpkDataType(summary.data_type));
                }
                segments.push(Self::read_segment(reader, summary)?);
            }
            next_record = record.next;
        }

        if segments.is_empty() {
            return Err(SpaceRocksError::MissingSpkSegment { target, center });
        }
        info!(segments = segments.len(), "Sun ephemeris loaded");

        Ok(NaifData {
            daf_header,
            segments,
        })
    }

    fn read_segment<R: Read + Seek>(
        reader: &mut R,
        summary: Summary,
    ) -> Result<Segment, SpaceRocksError> {
        if summary.initial_addr < 1 || summary.final_addr <= summary.initial_addr {
            return Err(SpaceRocksError::NomParsingError(format!(
                "invalid segment addresses {}..{}",
                summary.initial_addr, summary.final_addr
            )));
        }
        let directory = DirectoryData::read(reader, summary.final_addr as usize)?;

        // records followed by the four directory words fill the segment exactly
        let segment_words = (summary.final_addr - summary.initial_addr) as usize + 1;
        let record_words = directory
            .rsize
            .checked_mul(directory.n_records)
            .filter(|words| words.checked_add(4) == Some(segment_words))
            .ok_or_else(|| {
                SpaceRocksError::NomParsingError(format!(
                    "segment directory ({directory}) does not match the {segment_words} words of segment {summary}"
                ))
            })?;

        let mut data = vec![0u8; record_words * 8];
        reader.seek(SeekFrom::Start((summary.initial_addr as u64 - 1) * 8))?;
        reader.read_exact(&mut data)?;
        let records = EphemerisRecord::parse_segment(&data, directory.rsize, directory.n_records)?;

        debug!(segment = %summary, directory = %directory, "segment decoded");
        Ok(Segment {
            summary,
            directory,
            records,
        })
    }

    /// The decoded Sun segments, in file order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Position (km) and velocity (km/s) of the Sun relative to the solar-system
    /// barycenter, in the kernel frame.
    ///
    /// Arguments
    /// -----------------
    /// * `et_seconds`: TDB seconds past J2000.
    ///
    /// Return
    /// ----------
    /// * The state from the first segment covering the epoch, or
    ///   [`SpaceRocksError::EphemerisUnavailable`] if none does.
    pub fn sun_state(
        &self,
        et_seconds: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), SpaceRocksError> {
        self.segments
            .iter()
            .find(|segment| segment.summary.covers(et_seconds))
            .map(|segment| segment.state(et_seconds))
            .ok_or_else(|| SpaceRocksError::EphemerisUnavailable {
                epoch: et_seconds_to_jd_tdb(et_seconds),
                reason: format!("outside the coverage of the loaded kernel ({self})"),
            })
    }
}

impl fmt::Display for NaifData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "{}, Sun covered from ET {} s to ET {} s",
                self.daf_header.internal_filename, first.summary.start_epoch, last.summary.end_epoch
            ),
            _ => write!(f, "{}, no Sun segment", self.daf_header.internal_filename),
        }
    }
}
