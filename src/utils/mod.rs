pub mod askpass;
pub mod command;
pub mod error;
pub mod plist_parser;
pub mod progress;
pub mod sudo_session;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

pub use error::{AppError, AppResult};

/// Expand a leading `~/` against the invoking user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_untouched() {
        assert_eq!(expand_tilde("/tmp/leftover"), PathBuf::from("/tmp/leftover"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn home_prefix_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde("~/Library/Caches/com.example.app"),
                home.join("Library/Caches/com.example.app")
            );
            assert_eq!(expand_tilde("~"), home);
        }
    }
}
