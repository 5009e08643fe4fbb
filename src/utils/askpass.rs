use std::path::{Path, PathBuf};

/// Validate the configured askpass helper and ensure it is executable.
///
/// Returns `None` (after logging) when the helper does not exist, so callers
/// fall back to sudo's own prompt.
pub fn prepare_askpass(script: &Path) -> Option<PathBuf> {
    if !script.exists() {
        log::warn!("askpass helper not found at {}", script.display());
        return None;
    }

    // The helper may lose its execute bit when copied around.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = std::fs::metadata(script) {
            let mut perms = meta.permissions();
            let mode = perms.mode();
            if mode & 0o111 == 0 {
                perms.set_mode(mode | 0o755);
                if let Err(e) = std::fs::set_permissions(script, perms) {
                    log::warn!("Failed to mark {} executable: {}", script.display(), e);
                }
            }
        }
    }

    if !is_executable(script) {
        log::warn!("askpass helper at {} is not executable", script.display());
        return None;
    }

    log::info!("askpass helper ready at {}", script.display());
    Some(script.to_path_buf())
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.exists()
    }
}
