/// Log line parsing and dispatch module
///
/// Converts files discovered during a bundle walk into structured log
/// events, one event per matched line.
///
/// # Architecture
///
/// - `traits.rs`: the capability contract every parser variant implements
/// - `registry.rs`: the fixed-order dispatch over registered parsers
/// - `formats/`: one file per platform format
/// - `model.rs`: the `LogEvent` record and parse errors
pub mod formats;
pub mod model;
pub mod registry;
pub mod traits;

// Re-export commonly used types
pub use model::{LogEvent, ParseError};
pub use registry::ParserRegistry;
pub use traits::LogParser;

/// Timestamp layout shared by every supported format (`yyyy-MM-dd HH:mm:ss.SSS`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
