//! Summary records: the linked list of segment descriptors of a DAF file.
//!
//! Each summary record starts with three control words stored as doubles (next record,
//! previous record, number of summaries), followed by the packed summaries. An SPK
//! summary holds the time coverage (TDB seconds past J2000) and six integers: target,
//! center, reference frame, data type, first and last address of the segment.
use std::fmt;

use hifitime::Epoch;
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    number::complete::{le_f64, le_i32},
    IResult,
};

use super::{daf_header::RECORD_BYTES, naif_ids::NaifId};

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub start_epoch: f64,
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub initial_addr: i32,
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;
        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        et_seconds >= self.start_epoch && et_seconds <= self.end_epoch
    }
}

/// One summary record: its forward pointer and the summaries it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    /// Record number of the next summary record, 0 for the last one.
    pub next: i32,
    pub summaries: Vec<Summary>,
}

impl SummaryRecord {
    /// Parse a 1024-byte summary record.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: The record bytes.
    /// * `summary_words`: Size of one summary in double-precision words.
    ///
    /// Fails when the record claims more summaries than it can hold.
    pub fn parse(input: &[u8], summary_words: usize) -> IResult<&[u8], Self> {
        let record = input;
        let (input, next) = le_f64(input)?;
        let (input, _prev) = le_f64(input)?;
        let (mut input, nsum) = le_f64(input)?;

        let capacity = (RECORD_BYTES / 8 - 3) / summary_words.max(1);
        if !(0.0..=capacity as f64).contains(&nsum) {
            return Err(nom::Err::Failure(Error::new(record, ErrorKind::TooLarge)));
        }

        let mut summaries = Vec::with_capacity(nsum as usize);
        for _ in 0..nsum as usize {
            let (rest, bytes) = take(summary_words * 8)(input)?;
            let (_, summary) = Summary::parse(bytes)?;
            summaries.push(summary);
            input = rest;
        }
        Ok((
            input,
            SummaryRecord {
                next: next as i32,
                summaries,
            },
        ))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} relative to {}, {} to {}, frame {}, type {}, addresses {}..{}",
            NaifId::from_id(self.target),
            NaifId::from_id(self.center),
            Epoch::from_tdb_seconds(self.start_epoch),
            Epoch::from_tdb_seconds(self.end_epoch),
            self.frame_id,
            self.data_type,
            self.initial_addr,
            self.final_addr
        )
    }
}
