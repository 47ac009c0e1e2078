//! Configuration persistence
//!
//! Each CLI invocation loads the config, mutates it in memory, and saves it
//! exactly once. Saves go through a temp-file-then-rename so a reader never
//! observes a partially written config.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::{LocaldevError, Result};

/// Project metadata directory
pub const CONFIG_DIR: &str = ".localdev";

/// Configuration filename inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Walk up from `start` looking for a directory containing `.localdev`
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(CONFIG_DIR).is_dir() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load the project configuration from a project root
pub fn load(root: &Path) -> Result<ProjectConfig> {
    let path = config_path(root);

    if !path.is_file() {
        return Err(LocaldevError::ProjectNotFound {
            path: root.display().to_string(),
        });
    }

    let content = fs::read_to_string(&path).map_err(|e| LocaldevError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| LocaldevError::ConfigParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Save the project configuration atomically
pub fn save(root: &Path, cfg: &ProjectConfig) -> Result<()> {
    let path = config_path(root);
    let content = serde_yaml::to_string(cfg).map_err(|e| LocaldevError::ConfigWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    // Write to a temporary file in the same directory first, then rename it
    // into place so a concurrent reader never sees a truncated config.
    let tmp_path = root.join(CONFIG_DIR).join(format!("{CONFIG_FILE}.tmp"));

    fs::write(&tmp_path, &content).map_err(|e| LocaldevError::ConfigWriteFailed {
        path: tmp_path.display().to_string(),
        reason: e.to_string(),
    })?;

    fs::rename(&tmp_path, &path).map_err(|e| LocaldevError::ConfigWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Create `.localdev/config.yaml` for a fresh project
///
/// Fails if the project is already initialized.
pub fn init(root: &Path, cfg: &ProjectConfig) -> Result<()> {
    let dir = root.join(CONFIG_DIR);
    if dir.join(CONFIG_FILE).exists() {
        return Err(LocaldevError::AlreadyInitialized {
            path: root.display().to_string(),
        });
    }

    fs::create_dir_all(&dir).map_err(|e| LocaldevError::ConfigWriteFailed {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    save(root, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_project() {
        let temp = TempDir::new().unwrap();
        let err = load(temp.path()).unwrap_err();
        assert!(matches!(err, LocaldevError::ProjectNotFound { .. }));
    }

    #[test]
    fn test_init_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut cfg = ProjectConfig::new("demo", "rag");
        cfg.enable("llm");

        init(temp.path(), &cfg).unwrap();
        let loaded = load(temp.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        let cfg = ProjectConfig::new("demo", "custom");
        init(temp.path(), &cfg).unwrap();
        let err = init(temp.path(), &cfg).unwrap_err();
        assert!(matches!(err, LocaldevError::AlreadyInitialized { .. }));
    }

    #[test]
    fn test_load_corrupt_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "version: [unclosed").unwrap();

        let err = load(temp.path()).unwrap_err();
        assert!(matches!(err, LocaldevError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_find_project_root_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        let cfg = ProjectConfig::new("demo", "custom");
        init(temp.path(), &cfg).unwrap();

        let nested = temp.path().join("deep/nested/dir");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_find_project_root_none_outside_project() {
        let temp = TempDir::new().unwrap();
        assert!(find_project_root(temp.path()).is_none());
    }
}
