use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::path::{Path, PathBuf};
use swagexpand_util::{TempDir, temp_dir, test_data_dir};

/// Get a command to run swagexpand from the test data directory. The config
/// path points into a fresh temp directory, which is also returned so tests
/// can write a config file there. Most tests can just ignore it.
pub fn swagexpand() -> (Command, TempDir) {
    let config_dir = temp_dir();
    let mut command = cargo_bin_cmd!("swagexpand_cli");
    command
        .current_dir(test_data_dir())
        .env("SWAGEXPAND_CONFIG_PATH", config_path(&config_dir));
    (command, config_dir)
}

/// Path to the config file within a test's config directory
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join("config.yml")
}
