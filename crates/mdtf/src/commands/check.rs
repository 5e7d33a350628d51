//! `mdtf check` command implementation.

use clap::Args;
use mdtf_directives::{compile, field};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or compiled.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        match &config.config_path {
            Some(path) => output.info(&format!("Configuration: {}", path.display())),
            None => output.info("Configuration: defaults (no mdtf.toml found)"),
        }

        for (name, _) in config.snapshot.iter() {
            if field(name).is_none() {
                output.warning(&format!("Unknown formatter setting: {name}"));
            }
        }

        compile(&config.snapshot)?;

        output.success(&format!(
            "Configuration OK ({} formatter settings)",
            config.snapshot.len()
        ));
        Ok(())
    }
}
