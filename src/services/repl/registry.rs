//! Bookkeeping of live REPL sessions by working directory
//!
//! Entries keep registration order so that lookups by directory return the
//! session registered first. Directories are compared as-is; callers
//! normalize paths before registering if they need to.

use std::path::{Path, PathBuf};

use super::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub id: SessionId,
    pub working_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    entries: Vec<RegistryEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, overwriting the directory of an existing entry
    /// with the same id in place
    pub fn register(&mut self, id: SessionId, working_dir: impl Into<PathBuf>) {
        let working_dir = working_dir.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.working_dir = working_dir;
        } else {
            self.entries.push(RegistryEntry { id, working_dir });
        }
    }

    /// First registered session whose working directory is exactly `path`
    pub fn find_by_directory(&self, path: &Path) -> Option<&SessionId> {
        self.entries
            .iter()
            .find(|e| e.working_dir.as_os_str() == path.as_os_str())
            .map(|e| &e.id)
    }

    /// Remove a session; unknown ids are ignored
    pub fn remove(&mut self, id: &SessionId) -> Option<RegistryEntry> {
        let idx = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SessionId {
        SessionId::from_string(s.to_string())
    }

    #[test]
    fn test_find_and_remove() {
        let mut registry = SessionRegistry::new();
        registry.register(id("s1"), "/tmp/a");
        registry.register(id("s2"), "/tmp/b");

        assert_eq!(registry.find_by_directory(Path::new("/tmp/b")), Some(&id("s2")));

        registry.remove(&id("s1"));
        assert_eq!(registry.find_by_directory(Path::new("/tmp/a")), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = SessionRegistry::new();
        registry.register(id("s1"), "/tmp/a");
        registry.register(id("s2"), "/tmp/a");

        assert_eq!(registry.find_by_directory(Path::new("/tmp/a")), Some(&id("s1")));
        registry.remove(&id("s1"));
        assert_eq!(registry.find_by_directory(Path::new("/tmp/a")), Some(&id("s2")));
    }

    #[test]
    fn test_register_overwrites_in_place() {
        let mut registry = SessionRegistry::new();
        registry.register(id("s1"), "/tmp/a");
        registry.register(id("s2"), "/tmp/b");
        registry.register(id("s1"), "/tmp/b");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_directory(Path::new("/tmp/b")), Some(&id("s1")));
        assert_eq!(registry.find_by_directory(Path::new("/tmp/a")), None);
    }

    #[test]
    fn test_exact_path_comparison() {
        let mut registry = SessionRegistry::new();
        registry.register(id("s1"), "/tmp/a/");

        assert_eq!(registry.find_by_directory(Path::new("/tmp/a")), None);
        assert_eq!(registry.find_by_directory(Path::new("/tmp/a/")), Some(&id("s1")));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = SessionRegistry::new();
        registry.register(id("s1"), "/tmp/a");
        assert!(registry.remove(&id("nope")).is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_by_directory(Path::new("/tmp/a")), Some(&id("s1")));
    }
}
