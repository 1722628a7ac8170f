pub mod reel_store;

pub use reel_store::JsonReelStore;
