//! Runtime module — boot sequence and the command-line driver.

pub mod boot;
pub mod drive;
