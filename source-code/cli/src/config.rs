use anyhow::{bail, Context, Result};
use simpleshell_core::Options;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────
// Config file — <config dir>/simpleshell/config.toml
// ─────────────────────────────────────────────────────────────

/// e.g. `~/.config/simpleshell/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("simpleshell").join("config.toml"))
}

/// Load options from `explicit`, or from the default location when it
/// exists. No file at all means built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Options> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file {} does not exist", path.display());
        }
        return load_file(path);
    }

    match default_path() {
        Some(path) if path.is_file() => load_file(&path),
        _ => Ok(Options::default()),
    }
}

pub fn load_file(path: &Path) -> Result<Options> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let options: Options = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?options, "loaded config");
    Ok(options)
}
