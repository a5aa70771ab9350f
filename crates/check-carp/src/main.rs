//! check_carp: Nagios plugin reporting the state of a CARP interface.

mod cli;

use carp::CarpSocket;
use cli::Invocation;
use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

fn main() -> ExitCode {
    common::logging::init();

    let args: Vec<OsString> = env::args_os().collect();
    let progname = cli::progname(args.first().map(OsString::as_os_str));

    match cli::parse(args) {
        Ok(Invocation::Help) => {
            eprint!("{}", cli::help(&progname));
            ExitCode::FAILURE
        }
        Ok(Invocation::Version) => {
            eprint!("{}", cli::version(&progname));
            ExitCode::FAILURE
        }
        Ok(Invocation::Check(query)) => {
            tracing::debug!(
                interface = %query.interface.display(),
                expect = ?query.expect,
                "Checking CARP interface"
            );

            let output = carp::check(&query, CarpSocket::new);
            println!("{output}");

            u8::try_from(output.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
        }
        Err(err) => {
            tracing::debug!(error = %err, "Rejected command line");
            eprint!("{}", cli::usage(&progname));
            ExitCode::FAILURE
        }
    }
}
