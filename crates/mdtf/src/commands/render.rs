//! `mdtf render` command implementation.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use mdtf_config::Config;
use mdtf_renderer::Formatter;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to render (default: read stdin).
    inputs: Vec<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Render every input into this directory as `<name>.<extension>`.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, an input cannot be read,
    /// or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;

        if let Some(out_dir) = &self.out_dir {
            return render_to_dir(&self.inputs, out_dir, &config);
        }

        let text = match self.inputs.as_slice() {
            [] => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
            [input] => read_input(input)?,
            _ => {
                return Err(CliError::Validation(
                    "Multiple inputs require --out-dir".to_owned(),
                ));
            }
        };

        let html = Formatter::new().format(&text, &config.snapshot)?;

        match &self.output {
            Some(path) => std::fs::write(path, html).map_err(|e| {
                CliError::Input(format!("Failed to write {}: {e}", path.display()))
            })?,
            None => std::io::stdout().lock().write_all(html.as_bytes())?,
        }
        Ok(())
    }
}

/// Render `inputs` in parallel into `out_dir`.
///
/// Every input is attempted; failures are reported individually and the
/// command fails once all others have been written.
fn render_to_dir(inputs: &[PathBuf], out_dir: &Path, config: &Config) -> Result<(), CliError> {
    let output = Output::new();
    if inputs.is_empty() {
        return Err(CliError::Validation(
            "--out-dir requires at least one input file".to_owned(),
        ));
    }

    let targets = output_targets(inputs, out_dir, &config.output.extension)?;

    let texts = inputs
        .iter()
        .map(|path| read_input(path.as_path()))
        .collect::<Result<Vec<_>, _>>()?;

    std::fs::create_dir_all(out_dir).map_err(|e| {
        CliError::Input(format!(
            "Failed to create output directory {}: {e}",
            out_dir.display()
        ))
    })?;

    let start = Instant::now();
    let results = Formatter::new().format_batch(&texts, &config.snapshot)?;

    let mut failed = 0usize;
    for ((input, target), result) in inputs.iter().zip(&targets).zip(results) {
        let written = result
            .map_err(|e| e.to_string())
            .and_then(|html| std::fs::write(target, html).map_err(|e| e.to_string()));
        match written {
            Ok(()) => tracing::info!(
                input = %input.display(),
                output = %target.display(),
                "Rendered"
            ),
            Err(e) => {
                output.warning(&format!("Failed to render {}: {e}", input.display()));
                failed += 1;
            }
        }
    }

    let rendered = inputs.len() - failed;
    output.success(&format!(
        "Rendered {rendered} of {} files in {:.2}s",
        inputs.len(),
        start.elapsed().as_secs_f64()
    ));

    if failed > 0 {
        return Err(CliError::Validation(format!("{failed} files failed to render")));
    }
    Ok(())
}

/// Output path for every input, rejecting inputs that would overwrite each other.
fn output_targets(
    inputs: &[PathBuf],
    out_dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, CliError> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
    let mut targets = Vec::with_capacity(inputs.len());
    for input in inputs {
        let target = output_path(input, out_dir, extension);
        if let Some(previous) = seen.insert(target.clone(), input) {
            return Err(CliError::Validation(format!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                target.display()
            )));
        }
        targets.push(target);
    }
    Ok(targets)
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("Failed to read {}: {e}", path.display())))
}

/// `docs/guide.md` rendered into `out` becomes `out/guide.html`.
fn output_path(input: &Path, out_dir: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    out_dir.join(stem).with_extension(extension)
}
