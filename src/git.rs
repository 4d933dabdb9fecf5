use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command as GitCommand;

use crate::error::GgptError;

/// Name of the metadata directory that marks a working tree.
pub const GIT_DIR: &str = ".git";

/// Which changes to hand to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// `git show <hash>`
    Commit(String),
    /// `git diff --cached`
    Staged,
    /// `git diff`
    WorkingTree,
}

impl DiffSource {
    fn git_args(&self) -> Vec<&str> {
        match self {
            DiffSource::Commit(hash) => vec!["show", hash.as_str()],
            DiffSource::Staged => vec!["diff", "--cached"],
            DiffSource::WorkingTree => vec!["diff"],
        }
    }
}

/// True when `path` contains a `.git` directory.
pub fn is_repository(path: &Path) -> bool {
    path.join(GIT_DIR).is_dir()
}

/// Produce the trimmed diff for `source` inside the repository at `path`.
///
/// A non-zero exit from git (for example an unknown revision) is reported the
/// same way as an empty diff: `GgptError::NoContent`.
pub fn get_diff(path: &Path, source: &DiffSource, max_len: usize) -> Result<String> {
    if !is_repository(path) {
        return Err(GgptError::NotARepository {
            path: path.to_path_buf(),
        }
        .into());
    }

    // Never let a revision be read as a git option.
    if let DiffSource::Commit(hash) = source {
        if hash.starts_with('-') {
            log::debug!("Refusing revision {hash:?}");
            return Err(GgptError::NoContent.into());
        }
    }

    let args = source.git_args();
    log::debug!("Running git {:?} in {}", args, path.display());

    let output = GitCommand::new("git")
        .args(&args)
        .current_dir(path)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        log::debug!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Err(GgptError::NoContent.into());
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let diff = check_diff(&raw, max_len)?;

    log::info!("Collected diff of {} characters", diff.chars().count());
    Ok(diff)
}

/// Trim `raw` and enforce the non-empty and maximum-length rules.
pub fn check_diff(raw: &str, max_len: usize) -> Result<String, GgptError> {
    let diff = raw.trim();
    if diff.is_empty() {
        return Err(GgptError::NoContent);
    }

    let length = diff.chars().count();
    if length > max_len {
        return Err(GgptError::DiffTooLong {
            length,
            max: max_len,
        });
    }

    Ok(diff.to_string())
}
