//! Path derivation for inputs, outputs and backups.
//!
//! - The tool directory is where the running executable lives; outputs and
//!   the `template_src` directory default to it.
//! - An output keeps the input's file name: `page/about.html` is written to
//!   `<output_dir>/about.html`.
//! - A backup of `<output_dir>/about.html` is `<backup_dir>/about.html.<unix-seconds>.bkp`,
//!   with a `-N` suffix on the timestamp when that name is already taken.

use std::path::{Path, PathBuf};

/// Name of the template directory inside the tool directory.
pub const TEMPLATE_DIR_NAME: &str = "template_src";

/// The directory containing the running executable.
pub fn tool_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Where the expanded form of `input` is written.
///
/// Returns `None` when `input` has no file name (e.g. `..` or `/`).
pub fn output_path_for(input: &Path, output_dir: &Path) -> Option<PathBuf> {
    input.file_name().map(|name| output_dir.join(name))
}

/// Where a previous output is moved before being overwritten.
///
/// `seq` disambiguates backups taken within the same second: 0 gives
/// `<name>.<ts>.bkp`, N gives `<name>.<ts>-N.bkp`.
pub fn backup_path_for(output: &Path, backup_dir: &Path, timestamp: u64, seq: u32) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    if seq == 0 {
        backup_dir.join(format!("{name}.{timestamp}.bkp"))
    } else {
        backup_dir.join(format!("{name}.{timestamp}-{seq}.bkp"))
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
