//! Common error types for the CARP plugin.

use std::fmt;
use std::io;

/// A specialized Result type for CARP check operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a check run can fail.
///
/// The `Display` text of the first four variants is exactly what follows
/// `CARP UNKNOWN - ` on the plugin output line.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("socket creation failed")]
    Socket(#[source] io::Error),

    #[error("ioctl failed (SIOCGVH)")]
    Ioctl(#[source] io::Error),

    #[error("bad vhid {0}")]
    BadVhid(i32),

    #[error("state: ???")]
    UnknownState(i32),

    #[error("usage error: {0}")]
    Usage(String),
}

impl Error {
    /// Create a new usage error.
    pub fn usage(msg: impl fmt::Display) -> Self {
        Error::Usage(msg.to_string())
    }

    /// Whether this error is a command line problem rather than a failed check.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}
