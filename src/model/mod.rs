pub mod config;
pub mod employee;
pub mod prediction;

pub use config::{Config, ModelConfig};
pub use employee::*;
pub use prediction::*;
