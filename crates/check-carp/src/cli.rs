//! Command line handling.
//!
//! The plugin keeps the classic getopt surface: `-h` and `-V` print to
//! stderr and exit with failure, anything malformed prints the usage text.
//! Options are honoured in the order given and stop at the first operand,
//! so `-V -h` prints the version and `carp0 -e master` is a usage error.
//! An unknown option is always a usage error, even after `-h` or `-V`.

use carp::CarpQuery;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use common::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Program name when `argv[0]` is unusable.
pub const DEFAULT_NAME: &str = "check_carp";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DESCRIPTION: &str = "\
This plugin checks what state a given CARP interface is in.

If an expected state is given and the current state doesn't
match it, the plugin returns CRITICAL.  If no expected state
is given, the plugin returns OK.  If there is a problem
retrieving the information, the plugin returns UNKNOWN.
";

// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = DEFAULT_NAME,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Args {
    /// Print the full plugin help
    #[arg(short = 'h', action = ArgAction::Count)]
    help: u8,

    /// Print the plugin version
    #[arg(short = 'V', action = ArgAction::Count)]
    version: u8,

    /// Critical when state is not this
    #[arg(short = 'e', value_name = "state", allow_hyphen_values = true)]
    expect: Option<String>,

    /// Exactly one is accepted; collected so a wrong count is a usage error
    /// and not a clap error. Everything from the first operand on lands here.
    #[arg(num_args = 1.., trailing_var_arg = true)]
    interfaces: Vec<OsString>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Version,
    Check(CarpQuery),
}

/// Parse a full argument vector, `argv[0]` included.
pub fn parse<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Args::command()
        .try_get_matches_from(args)
        .map_err(usage_error)?;

    let args = Args::from_arg_matches(&matches).map_err(usage_error)?;

    // Whichever of -h and -V comes first wins, as with getopt.
    let help = first_index(&matches, "help", args.help);
    let version = first_index(&matches, "version", args.version);
    match (help, version) {
        (Some(help), Some(version)) if version < help => return Ok(Invocation::Version),
        (Some(_), _) => return Ok(Invocation::Help),
        (None, Some(_)) => return Ok(Invocation::Version),
        (None, None) => {}
    }

    let [interface] = <[OsString; 1]>::try_from(args.interfaces).map_err(|found| {
        Error::usage(format!(
            "expected exactly one interface, got {}",
            found.len()
        ))
    })?;

    let mut query = CarpQuery::new(interface);
    query.expect = args.expect;

    Ok(Invocation::Check(query))
}

fn usage_error(err: clap::Error) -> Error {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    Error::usage(first.trim_start_matches("error: "))
}

/// Position of the first occurrence of a counted flag, if it was given.
fn first_index(matches: &ArgMatches, id: &str, count: u8) -> Option<usize> {
    if count == 0 {
        return None;
    }
    matches.index_of(id)
}

/// Basename of `argv[0]`.
pub fn progname(arg0: Option<&OsStr>) -> String {
    arg0.map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

pub fn usage(progname: &str) -> String {
    format!(
        "Usage: {progname} [-hV] [-e state] interface\n\
         \t-h        - Print the full plugin help\n\
         \t-V        - Print the plugin version\n\
         \t-e state  - Critical when state is not this\n"
    )
}

pub fn version(progname: &str) -> String {
    format!("{progname} {VERSION}\n")
}

/// Version, description, then usage.
pub fn help(progname: &str) -> String {
    format!("{}\n{DESCRIPTION}\n{}", version(progname), usage(progname))
}
