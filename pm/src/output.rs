//! Rendering merged documents and writing them to their destination

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::*;
use log::{debug, info};

use crate::document::Document;
use crate::error::MergeError;

/// Render a document as block-style YAML, keeping key order and non-ASCII text
pub fn render(doc: &Document) -> Result<String, MergeError> {
    debug!("render: called keys={}", doc.len());
    let text = serde_yaml::to_string(doc)?;
    Ok(text)
}

/// Where rendered output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Destination::File(path),
            None => Destination::Stdout,
        }
    }
}

/// Write rendered text to `dest`
///
/// `stdout` receives the text itself for [`Destination::Stdout`], or a single
/// confirmation line once the file has been written for [`Destination::File`].
pub fn write<W: Write>(text: &str, dest: &Destination, stdout: &mut W) -> Result<(), MergeError> {
    debug!("write: called dest={:?} len={}", dest, text.len());
    match dest {
        Destination::Stdout => {
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(stream_error)?;
        }
        Destination::File(path) => {
            fs::write(path, text).map_err(|source| MergeError::WriteFailure {
                path: path.clone(),
                source,
            })?;
            info!("Wrote {} bytes to {}", text.len(), path.display());
            writeln!(stdout, "{}", confirmation(path)).map_err(stream_error)?;
        }
    }
    Ok(())
}

fn confirmation(path: &Path) -> String {
    format!("{} Saved merged template to {}", "✓".green(), path.display().to_string().cyan())
}

fn stream_error(source: std::io::Error) -> MergeError {
    MergeError::WriteFailure {
        path: PathBuf::from("<stdout>"),
        source,
    }
}
