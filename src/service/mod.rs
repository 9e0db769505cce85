pub mod classifier;
pub mod encoder;
pub mod prediction;
pub mod predictor;
pub mod schema;

pub use prediction::PredictionService;
pub use predictor::{ModelState, PredictionError};
