//! Persistent login state.
//!
//! A logged-in session is kept as a named Chrome user-data directory, so
//! cookies and local storage survive between runs without exporting them to
//! a separate file. `login` fills a profile once; `find` reuses it.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Named, persistent Chrome profiles under a fixed root directory.
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// Store under `~/.postscout/profiles`.
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Profile("could not determine home directory".into()))?;
        Ok(Self {
            root: home.join(".postscout").join("profiles"),
        })
    }

    /// Store rooted at an arbitrary directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for the named profile, created on first use.
    pub fn persistent(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let path = self.root.join(name);
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    /// Whether the named profile holds any saved browser state.
    ///
    /// Chrome writes into the directory on first launch, so a non-empty
    /// directory is the signal that a login session exists.
    pub fn has_session(&self, name: &str) -> bool {
        let path = self.root.join(name);
        std::fs::read_dir(&path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Names of all existing profiles, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        match std::fs::read_dir(&self.root) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    if entry.file_type()?.is_dir() {
                        names.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        names.sort();
        Ok(names)
    }
}

/// A throwaway profile directory, deleted on drop.
pub struct TempProfile {
    dir: tempfile::TempDir,
}

impl TempProfile {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("postscout-profile-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Profile names become directory names, so path metacharacters are out.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(Error::Profile(format!("invalid profile name: {name:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(tmp.path());

        let path = store.persistent("alice").unwrap();
        assert!(path.is_dir());
        assert_eq!(path, tmp.path().join("alice"));
    }

    #[test]
    fn test_has_session_requires_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(tmp.path());

        assert!(!store.has_session("alice"));

        let path = store.persistent("alice").unwrap();
        assert!(!store.has_session("alice")); // empty dir: no saved state

        std::fs::write(path.join("Cookies"), b"").unwrap();
        assert!(store.has_session("alice"));
    }

    #[test]
    fn test_list_is_sorted_and_tolerates_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(tmp.path().join("does-not-exist-yet"));
        assert!(store.list().unwrap().is_empty());

        let store = ProfileStore::at(tmp.path());
        store.persistent("bob").unwrap();
        store.persistent("alice").unwrap();
        assert_eq!(store.list().unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_path_metacharacters_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(tmp.path());

        assert!(store.persistent("../escape").is_err());
        assert!(store.persistent("").is_err());
    }

    #[test]
    fn test_temp_profile_cleans_up() {
        let profile = TempProfile::new().unwrap();
        let path = profile.path().to_path_buf();
        assert!(path.is_dir());

        drop(profile);
        assert!(!path.exists());
    }
}
