//! `mdtf directives` command implementation.

use std::io::Write;

use clap::Args;
use mdtf_directives::compile;

use super::ConfigArgs;
use crate::error::CliError;

/// Arguments for the directives command.
#[derive(Args)]
pub(crate) struct DirectivesArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl DirectivesArgs {
    /// Execute the directives command.
    ///
    /// Prints the compiled directive set as pretty JSON on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or compiled.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let directives = compile(&config.snapshot)?;
        let json = serde_json::to_string_pretty(&directives)?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}
