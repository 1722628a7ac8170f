pub mod classifier;
pub mod engine;
pub mod messages;
pub mod traits;
