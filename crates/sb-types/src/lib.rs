//! # sb-types
//!
//! Shared types for the SaddleBench min-max evaluation harness: candidate
//! and optimum point pairs, worst-case search reports, and the error
//! taxonomy used across the workspace.

pub mod errors;
pub mod point;
pub mod report;

pub use errors::*;
pub use point::*;
pub use report::*;
