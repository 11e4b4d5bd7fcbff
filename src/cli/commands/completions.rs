//! Shell completion scripts.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::KeytimeError;

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, KeytimeError> {
    let mut buf = Vec::new();
    generate_to(&mut buf, shell);
    String::from_utf8(buf).map_err(|e| KeytimeError::Parse(format!("UTF-8 error: {e}")))
}

fn generate_to<W: Write>(buf: &mut W, shell: Shell) {
    clap_complete::generate(shell, &mut Cli::command(), "keytime", buf);
}
