use anyhow::{bail, Context};
use eventdeck_core::{SessionSnapshot, SNAPSHOT_VERSION};
use std::fs;
use std::path::{Path, PathBuf};

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("EVENTDECK_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".eventdeck_state.json"))
}

/// Writes through a sibling temp file so a failed write never truncates
/// the previous save.
pub fn save_state_file(snapshot: &SessionSnapshot, path: &Path) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(snapshot).context("encode session")?;
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, body).with_context(|| format!("write {}", temp.display()))?;
    fs::rename(&temp, path).with_context(|| format!("replace {}", path.display()))?;
    log::debug!("saved session to {}", path.display());
    Ok(())
}

pub fn load_state_file(path: &Path) -> anyhow::Result<SessionSnapshot> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let snapshot: SessionSnapshot =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }
    Ok(snapshot)
}
