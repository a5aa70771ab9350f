//! Common utilities and types shared across the CARP plugin crates.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
