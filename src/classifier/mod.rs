pub mod classifier;
pub mod config;
pub mod engine;
pub mod preprocess;
pub mod types;
pub mod worker;
