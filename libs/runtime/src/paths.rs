//! Home directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve the application home directory.
///
/// - `Some(path)`: used as-is, with a leading `~` expanded to the user's home.
/// - `None`: platform default, `$HOME/<default_subdir>` (Unix/macOS) or
///   `%APPDATA%\<default_subdir>` (Windows).
///
/// The directory is created when `create` is set.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match explicit {
        Some(raw) => expand_tilde(&raw)?,
        None => platform_base_dir()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("creating home dir {}", resolved.display()))?;
    }

    Ok(resolved)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base_dir()?.join(rest));
    }
    if raw == "~" {
        return platform_base_dir();
    }
    Ok(PathBuf::from(raw))
}

#[cfg(target_os = "windows")]
fn platform_base_dir() -> Result<PathBuf> {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .context("APPDATA is not set")
}

#[cfg(not(target_os = "windows"))]
fn platform_base_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("HOME is not set")
}
