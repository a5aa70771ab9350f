//! The CARP check itself: one query, one verdict.

use crate::plugin::PluginOutput;
use crate::socket::StatusSource;
use crate::types::{CarpQuery, CarpStatus};
use common::{Error, Result};
use std::error::Error as _;
use std::io;
use tracing::debug;

/// Run the check and turn every failure into an UNKNOWN result.
///
/// `open` acquires the status source; pass `CarpSocket::new` for the real
/// kernel query.
pub fn check<S, F>(query: &CarpQuery, open: F) -> PluginOutput
where
    S: StatusSource,
    F: FnOnce() -> io::Result<S>,
{
    match try_check(query, open) {
        Ok(output) => output,
        Err(err) => {
            // UNKNOWN is a normal plugin answer; stderr stays quiet unless asked.
            debug!(
                interface = %query.interface.display(),
                error = %err,
                cause = ?err.source(),
                "CARP check failed"
            );
            PluginOutput::from(&err)
        }
    }
}

/// Open the source, query `query.interface` and evaluate the result.
pub fn try_check<S, F>(query: &CarpQuery, open: F) -> Result<PluginOutput>
where
    S: StatusSource,
    F: FnOnce() -> io::Result<S>,
{
    let source = open().map_err(Error::Socket)?;
    let status = source
        .carp_status(&query.interface)
        .map_err(Error::Ioctl)?;

    evaluate(&status, query.expect.as_deref())
}

/// Validate a status record and compare it with the expected state.
///
/// A missing expectation always yields OK.
pub fn evaluate(status: &CarpStatus, expect: Option<&str>) -> Result<PluginOutput> {
    if !status.has_valid_vhid() {
        return Err(Error::BadVhid(status.vhid));
    }

    let state = status
        .carp_state()
        .ok_or(Error::UnknownState(status.state))?;

    let message = format!(
        "state {} (vhid {} advbase {} advskew {})",
        state, status.vhid, status.advbase, status.advskew
    );

    match expect {
        Some(expected) if !state.matches(expected) => {
            debug!(%state, expected, "State mismatch");
            Ok(PluginOutput::critical(message))
        }
        _ => Ok(PluginOutput::ok(message)),
    }
}
