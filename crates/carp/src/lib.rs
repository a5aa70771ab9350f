//! CARP (Common Address Redundancy Protocol) status check.
//!
//! Queries the kernel for the state of a CARP virtual host with the
//! `SIOCGVH` ioctl and turns it into a Nagios-style plugin result.
//!
//! # Example
//!
//! ```no_run
//! use carp::{CarpQuery, CarpSocket};
//!
//! let query = CarpQuery::new("carp0").expecting("master");
//! let output = carp::check(&query, CarpSocket::new);
//!
//! println!("{output}");
//! std::process::exit(output.exit_code().into());
//! ```

mod check;
mod plugin;
mod socket;
mod types;

pub use check::{check, evaluate, try_check};
pub use plugin::{PluginOutput, SERVICE_NAME, ServiceState};
pub use socket::{CarpSocket, StatusSource};
pub use types::{
    CARP_MAXSTATE, CARP_MAXVHID, CARP_MINVHID, CARP_STATES, CarpQuery, CarpState, CarpStatus,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_types() {
        let query = CarpQuery::new("carp0");
        assert!(query.expect.is_none());

        assert_eq!(CarpState::Master.to_string(), "MASTER");
        assert_eq!(ServiceState::Unknown.exit_code(), 3);
    }
}
