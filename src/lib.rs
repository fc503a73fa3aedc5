pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod seed;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use model::SignalRecord;
