//! Common test utilities for localdev integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway project directory for integration tests
#[allow(dead_code)]
pub struct TestProject {
    /// Temporary directory, removed on drop
    pub temp: TempDir,
    /// Path to the project root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Command pointed at this project, with a clean environment
    pub fn cmd(&self) -> Command {
        let mut cmd = localdev_cmd();
        cmd.arg("-w").arg(&self.path);
        cmd
    }

    /// Initialize the project non-interactively from a template
    pub fn init(&self, template: &str) {
        self.cmd()
            .args(["init", "--name", "testproj", "--template", template, "-y"])
            .assert()
            .success();
    }

    /// Raw contents of the persisted configuration
    pub fn config_contents(&self) -> String {
        std::fs::read_to_string(self.path.join(".localdev/config.yaml"))
            .expect("Failed to read config.yaml")
    }

    pub fn config_exists(&self) -> bool {
        self.path.join(".localdev/config.yaml").exists()
    }
}

/// Binary under test with developer environment overrides stripped
#[allow(deprecated)]
pub fn localdev_cmd() -> Command {
    let mut cmd = Command::cargo_bin("localdev").expect("binary builds");
    cmd.env_remove("LOCALDEV_WORKSPACE");
    cmd
}
