//! Pipeline — orchestration of extract → descend → parse for one bundle,
//! and the worker pool that runs it off the caller's path.

pub mod pool;
pub mod run;

pub use pool::{IngestPool, SubmitError};
pub use run::{process, PipelineError};
