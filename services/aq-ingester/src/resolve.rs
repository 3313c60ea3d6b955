//! Forecast file resolution.
//!
//! Resolves a file name, partial path or absolute path against the data
//! directory without ever prompting: ambiguity and misses are returned to
//! the caller, which decides how to present them.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No forecast file matches '{0}'")]
    NotFound(String),

    #[error("Multiple forecast files match '{pattern}': {candidates:?}")]
    Ambiguous {
        pattern: String,
        candidates: Vec<PathBuf>,
    },
}

/// Resolve `pattern` to exactly one NetCDF file under `data_dir`.
///
/// The `.nc` extension may be omitted. An absolute pattern must point at
/// an existing file; a relative pattern matches by path suffix, so
/// `run-24/ENS_FORECAST` disambiguates between files of the same name in
/// different subdirectories.
pub fn resolve(data_dir: &Path, pattern: &str) -> Result<PathBuf, ResolveError> {
    let wanted = with_nc_extension(Path::new(pattern));

    if wanted.is_absolute() {
        if wanted.is_file() {
            return Ok(wanted);
        }
        return Err(ResolveError::NotFound(pattern.to_string()));
    }

    let mut matches: Vec<PathBuf> = WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "nc"))
        .filter(|path| path.ends_with(&wanted))
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(ResolveError::NotFound(pattern.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(ResolveError::Ambiguous {
            pattern: pattern.to_string(),
            candidates: matches,
        }),
    }
}

fn with_nc_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "nc") {
        path.to_path_buf()
    } else {
        path.with_extension("nc")
    }
}
