//! User supplied paths.

use std::path::PathBuf;

/// Expand a leading `~` to the home directory. Other paths are returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        p => match p.strip_prefix("~/") {
            Some(rest) => rest,
            None => return PathBuf::from(p),
        },
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
