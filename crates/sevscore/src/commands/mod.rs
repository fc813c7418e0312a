//! CLI command implementations for sevscore

mod batch;
mod calibrate;
mod common;
mod predict;
mod profile;
mod serve;

pub use batch::batch;
pub use calibrate::calibrate;
pub use common::PredictorArgs;
pub use predict::predict;
pub use profile::profile;
pub use serve::serve;
