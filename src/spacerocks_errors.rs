use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpaceRocksError {
    #[error("Under-specified body batch: {0}")]
    UnderSpecified(String),

    #[error("Conflicting inputs for body batch: {0}")]
    ConflictingInputs(String),

    #[error("Unknown quantity name: {0}")]
    UnknownQuantity(String),

    #[error("Quantity {0} is derived and cannot be assigned")]
    ReadOnlyQuantity(String),

    #[error("Array length mismatch for {quantity}: expected {expected}, found {found}")]
    LengthMismatch {
        quantity: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "Hyperbolic Kepler equation did not converge for body {index} (M = {mean_anomaly}, e = {eccentricity}): {source}"
    )]
    KeplerNonConvergence {
        index: usize,
        mean_anomaly: f64,
        eccentricity: f64,
        #[source]
        source: roots::SearchError,
    },

    #[error("Ephemeris unavailable at epoch JD {epoch}: {reason}")]
    EphemerisUnavailable { epoch: f64, reason: String },

    #[error("Invalid JPL string format: {0}")]
    InvalidJPLStringFormat(String),

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidJPLEphemFileSource(String),

    #[error("JPL File not found at: {0}")]
    JPLFileNotFound(String),

    #[error("Base dir creation error for JPL ephemeris file: {0}")]
    UnableToCreateBaseDir(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "jpl-download")]
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("No SPK segment for target {target} relative to center {center}")]
    MissingSpkSegment { target: i32, center: i32 },

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("Invalid date string: {0}")]
    InvalidDate(String),
}

impl<I: std::fmt::Debug> From<nom::Err<nom::error::Error<I>>> for SpaceRocksError {
    fn from(err: nom::Err<nom::error::Error<I>>) -> Self {
        SpaceRocksError::NomParsingError(format!("{err:?}"))
    }
}

impl PartialEq for SpaceRocksError {
    fn eq(&self, other: &Self) -> bool {
        use SpaceRocksError::*;
        match (self, other) {
            (UnderSpecified(a), UnderSpecified(b)) => a == b,
            (ConflictingInputs(a), ConflictingInputs(b)) => a == b,
            (UnknownQuantity(a), UnknownQuantity(b)) => a == b,
            (ReadOnlyQuantity(a), ReadOnlyQuantity(b)) => a == b,
            (
                LengthMismatch {
                    quantity: q1,
                    expected: e1,
                    found: f1,
                },
                LengthMismatch {
                    quantity: q2,
                    expected: e2,
                    found: f2,
                },
            ) => q1 == q2 && e1 == e2 && f1 == f2,
            (
                KeplerNonConvergence {
                    index: i1,
                    source: s1,
                    ..
                },
                KeplerNonConvergence {
                    index: i2,
                    source: s2,
                    ..
                },
            ) => i1 == i2 && s1 == s2,
            (
                EphemerisUnavailable {
                    epoch: e1,
                    reason: r1,
                },
                EphemerisUnavailable {
                    epoch: e2,
                    reason: r2,
                },
            ) => e1 == e2 && r1 == r2,
            (InvalidJPLStringFormat(a), InvalidJPLStringFormat(b)) => a == b,
            (InvalidJPLEphemFileSource(a), InvalidJPLEphemFileSource(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,
            (
                MissingSpkSegment {
                    target: t1,
                    center: c1,
                },
                MissingSpkSegment {
                    target: t2,
                    center: c2,
                },
            ) => t1 == t2 && c1 == c2,
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,

            // io and http errors carry no comparable payload
            (IoError(_), IoError(_)) => true,
            #[cfg(feature = "jpl-download")]
            (ReqwestError(_), ReqwestError(_)) => true,

            _ => false,
        }
    }
}
