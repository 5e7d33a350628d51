//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod directives;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use mdtf_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use directives::DirectivesArgs;
pub(crate) use render::RenderArgs;

/// Configuration arguments shared by every command.
#[derive(Args, Debug)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover mdtf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Close void elements HTML5 style, e.g. `<br>` (overrides config).
    #[arg(long, conflicts_with = "xhtml")]
    html5: bool,

    /// Close void elements XHTML style, e.g. `<br />` (overrides config).
    #[arg(long)]
    xhtml: bool,

    /// Render single line breaks as `<br>` (overrides config).
    #[arg(long, conflicts_with = "no_breaks")]
    breaks: bool,

    /// Keep single line breaks as soft breaks (overrides config).
    #[arg(long)]
    no_breaks: bool,

    /// Do not turn bare URLs into links (overrides config).
    #[arg(long)]
    no_urls_linked: bool,

    /// Override a formatter setting, e.g. `--set tableClass=table`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_setting)]
    settings: Vec<(String, String)>,
}

impl ConfigArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            html5_element_suffix: self.xhtml.then_some(false).or(self.html5.then_some(true)),
            breaks_enabled: self.no_breaks.then_some(false).or(self.breaks.then_some(true)),
            urls_linked: self.no_urls_linked.then_some(false),
            overrides: self.settings.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Parse a `KEY=VALUE` setting override.
fn parse_setting(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing setting name in {s:?}"));
    }
    Ok((key.to_owned(), value.to_owned()))
}
