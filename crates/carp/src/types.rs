//! CARP data types and the state label table.
//!
//! Values mirror `netinet/ip_carp.h`.

use std::ffi::OsString;
use std::fmt;

/// Lowest valid virtual host id.
pub const CARP_MINVHID: i32 = 1;

/// Highest valid virtual host id.
pub const CARP_MAXVHID: i32 = 255;

/// Highest state code the driver reports.
pub const CARP_MAXSTATE: i32 = 2;

/// State labels indexed by state code, as the driver names them.
pub const CARP_STATES: [&str; 3] = ["INIT", "BACKUP", "MASTER"];

/// CARP state of a virtual host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarpState {
    /// Not yet running
    Init,
    /// Listening for the master's advertisements
    Backup,
    /// Owns the virtual addresses and advertises
    Master,
}

impl CarpState {
    /// All states in code order.
    pub const ALL: [CarpState; 3] = [CarpState::Init, CarpState::Backup, CarpState::Master];

    /// Decode a raw state code.
    ///
    /// Returns `None` for any code outside `0..=CARP_MAXSTATE`.
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    /// Raw state code as reported by the driver.
    pub fn code(self) -> i32 {
        match self {
            CarpState::Init => 0,
            CarpState::Backup => 1,
            CarpState::Master => 2,
        }
    }

    /// Label from [`CARP_STATES`].
    pub fn label(self) -> &'static str {
        CARP_STATES[self.code() as usize]
    }

    /// Case-insensitive comparison against a user supplied state name.
    pub fn matches(self, expected: &str) -> bool {
        self.label().eq_ignore_ascii_case(expected)
    }
}

impl fmt::Display for CarpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of one virtual host as returned by `SIOCGVH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarpStatus {
    /// Virtual host id (valid range 1-255)
    pub vhid: i32,

    /// Raw state code, see [`CARP_STATES`]
    pub state: i32,

    /// Advertisement base interval in seconds
    pub advbase: i32,

    /// Advertisement skew
    pub advskew: i32,
}

impl CarpStatus {
    /// Whether the vhid is in the range the protocol allows.
    pub fn has_valid_vhid(&self) -> bool {
        (CARP_MINVHID..=CARP_MAXVHID).contains(&self.vhid)
    }

    /// Decoded state, if the code is known.
    pub fn carp_state(&self) -> Option<CarpState> {
        CarpState::from_code(self.state)
    }
}

/// What to check: an interface and, optionally, the state it should be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarpQuery {
    /// Interface name, e.g. `carp0`; passed to the kernel byte for byte
    pub interface: OsString,

    /// Expected state label, compared case-insensitively
    pub expect: Option<String>,
}

impl CarpQuery {
    pub fn new(interface: impl Into<OsString>) -> Self {
        Self {
            interface: interface.into(),
            expect: None,
        }
    }

    /// Require the interface to be in `state`.
    pub fn expecting(mut self, state: impl Into<String>) -> Self {
        self.expect = Some(state.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_table_is_bijection() {
        for code in 0..=CARP_MAXSTATE {
            let state = CarpState::from_code(code).unwrap();
            assert_eq!(state.code(), code);
            assert_eq!(state.label(), CARP_STATES[code as usize]);
        }

        let mut labels = CARP_STATES.to_vec();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), CARP_STATES.len());
        assert_eq!(CARP_STATES.len() as i32, CARP_MAXSTATE + 1);
    }

    #[test]
    fn test_out_of_range_codes_have_no_label() {
        for code in [CARP_MAXSTATE + 1, 10, i32::MAX, -1, i32::MIN] {
            assert_eq!(CarpState::from_code(code), None);
        }
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CarpState::Init.to_string(), "INIT");
        assert_eq!(CarpState::Backup.to_string(), "BACKUP");
        assert_eq!(CarpState::Master.to_string(), "MASTER");
    }

    #[test]
    fn test_matches_ignores_case() {
        assert!(CarpState::Master.matches("master"));
        assert!(CarpState::Master.matches("Master"));
        assert!(CarpState::Master.matches("MASTER"));
        assert!(!CarpState::Master.matches("backup"));
        assert!(!CarpState::Master.matches("maste"));
        assert!(!CarpState::Master.matches(""));
    }

    #[test]
    fn test_vhid_bounds() {
        let mut status = CarpStatus {
            vhid: 1,
            ..Default::default()
        };
        assert!(status.has_valid_vhid());

        status.vhid = 255;
        assert!(status.has_valid_vhid());

        for vhid in [0, 256, -1] {
            status.vhid = vhid;
            assert!(!status.has_valid_vhid());
        }
    }

    #[test]
    fn test_query_builder() {
        let query = CarpQuery::new("carp0");
        assert_eq!(query.expect, None);

        let query = query.expecting("master");
        assert_eq!(query.interface, "carp0");
        assert_eq!(query.expect.as_deref(), Some("master"));
    }
}
