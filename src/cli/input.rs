//! User input utilities for interactive CLI prompts

use anyhow::{Context, Result};
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Ask for the source path, offering `default` when the answer is empty
pub fn prompt_source_path(default: Option<PathBuf>) -> Result<PathBuf> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    read_source_path(&mut stdin.lock(), &mut stdout, default)
}

/// Prompt loop over arbitrary streams
///
/// Empty answers take the default, if any. Surrounding quotes (left by
/// drag-and-drop into a terminal) are removed.
pub fn read_source_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: Option<PathBuf>,
) -> Result<PathBuf> {
    let label = "Takeout archive or watch history file".bright_cyan();
    loop {
        let prompt = match &default {
            Some(path) => write!(output, "{} [{}]: ", label, path.display()),
            None => write!(output, "{}: ", label),
        };
        prompt.context("Failed to write prompt")?;
        output.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read user input")?;
        if read == 0 {
            anyhow::bail!("No source path given");
        }

        let answer = line.trim().trim_matches(|c| c == '"' || c == '\'');
        if !answer.is_empty() {
            return Ok(PathBuf::from(answer));
        }
        if let Some(path) = &default {
            return Ok(path.clone());
        }
        writeln!(output, "Please enter a path.").context("Failed to write prompt")?;
    }
}

/// The most recent Takeout archive in the download directory, if any
pub fn default_source_path() -> Option<PathBuf> {
    let downloads = dirs::download_dir()?;
    std::fs::read_dir(downloads)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("takeout") && name.ends_with(".zip"))
        })
        .max_by_key(|path| {
            std::fs::metadata(path)
                .and_then(|meta| meta.modified())
                .ok()
        })
}
