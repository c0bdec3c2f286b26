use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Binary names to try on `$PATH`, most specific first.
const PATH_CANDIDATES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Locate a Chrome/Chromium binary.
///
/// Order: the explicit path if given, then a `$PATH` lookup of the common
/// binary names, then platform-specific install locations.
pub fn find_chrome(custom_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = custom_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::Browser(format!(
            "Chrome not found at: {}",
            path.display()
        )));
    }

    for name in PATH_CANDIDATES {
        if let Ok(found) = which::which(name) {
            tracing::debug!(binary = name, path = %found.display(), "found Chrome on PATH");
            return Ok(found);
        }
    }

    for path in install_paths() {
        if path.exists() {
            return Ok(path);
        }
    }

    Err(Error::Browser(format!(
        "Chrome not found. Looked for {} on PATH and checked: {}. Use --chrome-path to specify a location.",
        PATH_CANDIDATES.join(", "),
        install_paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

/// Platform-specific default install locations.
fn install_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    return vec![
        PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
    ];

    #[cfg(target_os = "linux")]
    return vec![
        PathBuf::from("/usr/bin/google-chrome"),
        PathBuf::from("/usr/bin/chromium"),
        PathBuf::from("/usr/bin/chromium-browser"),
        PathBuf::from("/snap/bin/chromium"),
    ];

    #[cfg(target_os = "windows")]
    return vec![
        PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return vec![];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let err = find_chrome(Some(Path::new("/nonexistent/chrome"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chrome"));
    }

    #[test]
    fn test_existing_custom_path_wins() {
        // Any existing file will do; the finder does not inspect it.
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let found = find_chrome(Some(tmp.path())).unwrap();
        assert_eq!(found, tmp.path());
    }
}
