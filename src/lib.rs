//! Local WordPress + MySQL container stack driven through the docker CLI.
//!
//! The [`docker`] module runs CLI invocations and streams their output,
//! [`pull`] turns `pull` output into per-layer progress, and [`machine`]
//! starts, stops and inspects the two containers.

pub mod config;
pub mod docker;
pub mod error;
pub mod machine;
pub mod pull;

pub use error::{Error, Result};
