pub mod body_batch;
pub mod constants;
pub mod jpl_ephem;
pub mod kepler;
pub mod quantity;
pub mod ref_system;
pub mod spacerocks_errors;
pub mod time;
pub mod vector_batch;

pub use body_batch::{BodyBatch, BodyBatchBuilder, Frame};
pub use jpl_ephem::{download_jpl_file::EphemFileSource, JPLEphem, OriginOffset};
pub use kepler::KeplerSolverConfig;
pub use quantity::{AnomalyChoice, Orientation, Quantity, StateSource, VectorQuantity};
pub use ref_system::ReferencePlane;
pub use spacerocks_errors::SpaceRocksError;
pub use vector_batch::Vector3Batch;
