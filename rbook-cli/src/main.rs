//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use rbook_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "fatal errors are reported on stderr before exiting"
)]
fn main() {
    match rbook_cli::run() {
        Ok(()) => {}
        // Help and version requests are clap errors with their own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("rbook: {err}");
            std::process::exit(1);
        }
    }
}
