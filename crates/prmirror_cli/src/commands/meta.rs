//! Meta commands that never touch the database.

use clap::CommandFactory;

use super::CliError;

pub fn handle_completions(shell: clap_complete::Shell) -> Result<(), CliError> {
    let mut cmd = crate::Cli::command();
    clap_complete::generate(shell, &mut cmd, "prmirror", &mut std::io::stdout());
    Ok(())
}
