pub mod sample;
pub mod serve;
pub mod watch;

// Re-export command functions for convenience
pub use sample::sample;
pub use serve::{serve, ServeParams};
pub use watch::{watch, WatchParams};
