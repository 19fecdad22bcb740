//! Output file naming, overwrite policy and cleanup shared by the writing modes

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use shnwave_core::format::WAV;
use tracing::debug;

use crate::config::ToolConfig;
use crate::error::{Result, ServiceError};

/// `<dir>/<stem>-<postfix>.wav`, next to the input unless `output_dir` is given
pub fn output_path(input: &Path, postfix: &str, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = format!("{}-{}.{}", stem, postfix, WAV.extension);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Refuse outputs that resolve to the input or that the clobber policy protects
pub(crate) fn check_output(input: &Path, output: &Path, config: &ToolConfig) -> Result<()> {
    if same_file(input, output) {
        return Err(ServiceError::WouldOverwriteInput {
            output: output.to_path_buf(),
            input: input.to_path_buf(),
        });
    }
    if output.exists() && !config.may_overwrite() {
        return Err(ServiceError::OutputExists {
            path: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Create `path`, fill it with `write`, and remove it again if anything fails
pub(crate) fn write_output<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).map_err(|source| ServiceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut output = BufWriter::new(file);

    let result = write(&mut output).and_then(|()| output.flush().map_err(ServiceError::from));
    if let Err(e) = result {
        drop(output);
        if let Err(rm) = fs::remove_file(path) {
            debug!("could not remove partial output '{}': {}", path.display(), rm);
        }
        return Err(e);
    }
    Ok(())
}

pub(crate) fn expect_moved(context: &'static str, expected: u64, actual: u64) -> Result<()> {
    if actual != expected {
        return Err(short_transfer(context, expected, actual));
    }
    Ok(())
}

pub(crate) fn short_transfer(context: &'static str, expected: u64, actual: u64) -> ServiceError {
    ServiceError::ShortTransfer { context, expected, actual }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
