//! Multiple linear regression on housing data.
//!
//! The library is the whole pipeline; `main.rs` only parses flags, picks a
//! mode and maps errors to exit codes.

pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod predict;
pub mod regression;
pub mod report;

pub use error::{Error, Result};
