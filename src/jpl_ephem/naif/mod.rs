mod daf_header;
mod directory;
mod ephemeris_record;
pub mod naif_data;
pub mod naif_ids;
mod summary_record;

pub use directory::DirectoryData;
pub use ephemeris_record::EphemerisRecord;
pub use summary_record::Summary;
