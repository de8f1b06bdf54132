//! Filesystem location helpers.
//!
//! Resolves where the cache file and log files live, and expands `~` in
//! user-supplied paths.

use std::path::PathBuf;

/// Application directory name under the platform data directory.
const APP_DIR: &str = "news-brief";

/// File name of the durable cache inside the data directory.
pub const CACHE_FILE_NAME: &str = "cache.json";

/// Returns the default data directory.
///
/// Resolves to the platform data directory (`~/.local/share` on Linux,
/// `~/Library/Application Support` on macOS, `%APPDATA%` on Windows) joined
/// with `news-brief`. Falls back to a relative `.news-brief` directory when no
/// data directory can be determined.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".news-brief"), |dir| dir.join(APP_DIR))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use news_brief::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}
