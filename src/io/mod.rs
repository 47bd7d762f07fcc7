//! Input/output operations and error handling

/// Level start-up modes
pub mod bootstrap;
/// Command-line front end
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error taxonomy
pub mod error;
/// PNG mask decoding and export
pub mod image;
/// Batch progress display
pub mod progress;
/// Level persistence
pub mod store;
