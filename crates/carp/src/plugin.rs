//! Monitoring plugin result types.
//!
//! Nagios-compatible plugins print a single line and exit with one of
//! four codes:
//! - `0` = OK
//! - `1` = WARNING
//! - `2` = CRITICAL
//! - `3` = UNKNOWN (the check itself could not be performed)

use common::Error;
use std::fmt;

pub use nagiosplugin::ServiceState;

/// Prefix of every output line.
pub const SERVICE_NAME: &str = "CARP";

/// One line of plugin output together with its state.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginOutput {
    state: ServiceState,
    message: String,
}

impl PluginOutput {
    pub fn new(state: ServiceState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    /// Create an OK result
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(ServiceState::Ok, message)
    }

    /// Create a CRITICAL result
    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(ServiceState::Critical, message)
    }

    /// Create an UNKNOWN result
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ServiceState::Unknown, message)
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Process exit code for the state, as the plugin convention defines it.
    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }
}

impl From<&Error> for PluginOutput {
    fn from(err: &Error) -> Self {
        PluginOutput::unknown(err.to_string())
    }
}

impl From<Error> for PluginOutput {
    fn from(err: Error) -> Self {
        PluginOutput::from(&err)
    }
}

impl fmt::Display for PluginOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", SERVICE_NAME, self.state, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(PluginOutput::unknown("x").exit_code(), 3);
        assert_eq!(PluginOutput::critical("x").exit_code(), 2);
        assert_eq!(ServiceState::Ok.exit_code(), 0);
        assert_eq!(ServiceState::Warning.exit_code(), 1);
        assert_eq!(ServiceState::Critical.exit_code(), 2);
        assert_eq!(ServiceState::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_service_state_display() {
        assert_eq!(ServiceState::Ok.to_string(), "OK");
        assert_eq!(ServiceState::Warning.to_string(), "WARNING");
        assert_eq!(ServiceState::Critical.to_string(), "CRITICAL");
        assert_eq!(ServiceState::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_output_line() {
        let output = PluginOutput::ok("state MASTER (vhid 1 advbase 1 advskew 0)");
        assert_eq!(
            output.to_string(),
            "CARP OK - state MASTER (vhid 1 advbase 1 advskew 0)"
        );
        assert_eq!(output.exit_code(), 0);
    }

    #[test]
    fn test_output_from_error() {
        let output = PluginOutput::from(Error::BadVhid(256));
        assert_eq!(output.state(), ServiceState::Unknown);
        assert_eq!(output.message(), "bad vhid 256");
        assert_eq!(output.to_string(), "CARP UNKNOWN - bad vhid 256");
    }
}
