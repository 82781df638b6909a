//! In-memory SPK kernels with hand-picked Chebyshev coefficients.
use spacerocks::constants::AU;

const RECORD_BYTES: usize = 1024;

/// One type-2 segment; coefficients are given in AU and converted to km on write.
#[derive(Debug, Clone)]
pub struct SyntheticSegment {
    pub target: i32,
    pub center: i32,
    pub data_type: i32,
    /// Start of the first record, TDB seconds past J2000.
    pub init: f64,
    /// Length of each record, seconds.
    pub intlen: f64,
    /// Per record: coefficients of x, y and z.
    pub records: Vec<[Vec<f64>; 3]>,
}

impl SyntheticSegment {
    /// Sun relative to the barycenter with linear motion in every record:
    /// record k is centered on `(k + 1, 0, 0.1)` AU and moves by `(0.5, −0.25, 0)` AU
    /// across its half-width.
    pub fn sun(init: f64, intlen: f64, n_records: usize) -> Self {
        let records = (0..n_records)
            .map(|k| {
                [
                    vec![(k + 1) as f64, 0.5, 0.0],
                    vec![0.0, -0.25, 0.0],
                    vec![0.1, 0.0, 0.0],
                ]
            })
            .collect();
        SyntheticSegment {
            target: 10,
            center: 0,
            data_type: 2,
            init,
            intlen,
            records,
        }
    }

    pub fn end(&self) -> f64 {
        self.init + self.intlen * self.records.len() as f64
    }

    fn ncoeff(&self) -> usize {
        self.records.first().map_or(0, |r| r[0].len())
    }

    fn rsize(&self) -> usize {
        2 + 3 * self.ncoeff()
    }

    fn n_words(&self) -> usize {
        self.rsize() * self.records.len() + 4
    }

    fn words(&self) -> Vec<f64> {
        let radius = self.intlen / 2.0;
        let mut words = Vec::with_capacity(self.n_words());
        for (k, record) in self.records.iter().enumerate() {
            words.push(self.init + radius * (2 * k + 1) as f64);
            words.push(radius);
            for axis in record {
                words.extend(axis.iter().map(|c| c * AU));
            }
        }
        words.extend([
            self.init,
            self.intlen,
            self.rsize() as f64,
            self.records.len() as f64,
        ]);
        words
    }
}

fn push_f64(bytes: &mut Vec<u8>, value: f64) {
    bytes.extend_from_slice(&value.to_le_bytes());
}

fn push_i32(bytes: &mut Vec<u8>, value: i32) {
    bytes.extend_from_slice(&value.to_le_bytes());
}

/// Kernel bytes holding `segments`.
///
/// With `summary_per_record`, each summary goes to its own summary record and the records
/// are chained through their forward pointers.
pub fn kernel(segments: &[SyntheticSegment], summary_per_record: bool, locfmt: &[u8; 8]) -> Vec<u8> {
    let n_summary_records = if summary_per_record {
        segments.len().max(1)
    } else {
        1
    };
    let first_data_address = (1 + n_summary_records) * RECORD_BYTES / 8 + 1;

    // segment addresses
    let mut addresses = Vec::with_capacity(segments.len());
    let mut next_address = first_data_address;
    for segment in segments {
        let initial = next_address;
        let last = initial + segment.n_words() - 1;
        addresses.push((initial as i32, last as i32));
        next_address = last + 1;
    }

    // file record
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DAF/SPK ");
    push_i32(&mut bytes, 2);
    push_i32(&mut bytes, 6);
    let mut name = b"SYNTHETIC".to_vec();
    name.resize(60, b' ');
    bytes.extend_from_slice(&name);
    push_i32(&mut bytes, 2);
    push_i32(&mut bytes, 1 + n_summary_records as i32);
    push_i32(&mut bytes, next_address as i32);
    bytes.extend_from_slice(locfmt);
    bytes.resize(RECORD_BYTES, 0);

    // summary records
    let chunks: Vec<Vec<usize>> = if summary_per_record {
        (0..segments.len()).map(|i| vec![i]).collect()
    } else {
        vec![(0..segments.len()).collect()]
    };
    for record in 0..n_summary_records {
        let start = bytes.len();
        let members = chunks.get(record).cloned().unwrap_or_default();
        let next = if record + 1 < n_summary_records {
            (record + 3) as f64
        } else {
            0.0
        };
        let prev = if record == 0 { 0.0 } else { (record + 1) as f64 };
        push_f64(&mut bytes, next);
        push_f64(&mut bytes, prev);
        push_f64(&mut bytes, members.len() as f64);
        for i in members {
            let segment = &segments[i];
            push_f64(&mut bytes, segment.init);
            push_f64(&mut bytes, segment.end());
            push_i32(&mut bytes, segment.target);
            push_i32(&mut bytes, segment.center);
            push_i32(&mut bytes, 1);
            push_i32(&mut bytes, segment.data_type);
            push_i32(&mut bytes, addresses[i].0);
            push_i32(&mut bytes, addresses[i].1);
        }
        bytes.resize(start + RECORD_BYTES, 0);
    }

    // segment data
    for segment in segments {
        for word in segment.words() {
            push_f64(&mut bytes, word);
        }
    }
    bytes
}
