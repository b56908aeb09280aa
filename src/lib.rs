//! Internal library crate for sgt.
//!
//! The shipped application is the `sgt` binary (`src/main.rs`).
//!
//! This library exists to share code between targets (binary, tests) and to keep modules
//! organized. This API is only used to build the `sgt` binary and is not considered a library
//! for external use.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod ui;
pub mod utils;

pub use error::{Result, SgtError};
