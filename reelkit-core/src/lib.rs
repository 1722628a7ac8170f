pub mod classify;
pub mod link;
pub mod types;

// Keep the public surface small and intentional.
pub use classify::*;
pub use link::*;
pub use types::*;
