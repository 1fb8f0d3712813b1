use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SKIP_FORWARD: &str = include_str!("../fixtures/skip_forward.js");

/// Helper struct for managing test resources
pub struct TestContext {
    /// Temporary directory for test files; also the working directory of
    /// every command so no stray config file is picked up.
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self, std::io::Error> {
        let temp_dir = TempDir::new()?;
        Ok(TestContext { temp_dir })
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Create a file with the given content in the temporary directory
    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf, std::io::Error> {
        let file_path = self.temp_path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// The fixture script with `var line0` on line 1
    pub fn skip_forward_script(&self) -> PathBuf {
        self.create_file("skip_forward.js", SKIP_FORWARD)
            .expect("Failed to write fixture script")
    }

    /// The binary, run from the temporary directory without colors
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("line-debug").expect("Failed to find binary");
        cmd.current_dir(self.temp_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("LINE_DEBUG_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }
}
