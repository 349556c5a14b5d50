//! Shared integration-test harness for running the `testable-report`
//! binary and reading result files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

/// Variables the binary reads from the environment.
const PLATFORM_VARS: [&str; 7] = [
    "TESTABLE_RESULT_FILE",
    "TESTABLE_REGION_NAME",
    "TESTABLE_GLOBAL_CLIENT_INDEX",
    "TESTABLE_ITERATION",
    "PROXY_AUTOCONFIG_URL",
    "OUTPUT_DIR",
    "TESTABLE_RESOURCE_PATH",
];

/// Builds a command for the binary with a clean platform environment.
pub fn command(envs: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_testable-report"));
    for var in PLATFORM_VARS {
        cmd.env_remove(var);
    }
    cmd.env("TESTABLE_LOG_LEVEL", "off");
    cmd.envs(envs.iter().copied());
    cmd
}

/// Runs the binary to completion.
pub fn run(args: &[&str], envs: &[(&str, &str)]) -> Output {
    command(envs)
        .args(args)
        .output()
        .expect("failed to spawn testable-report")
}

/// Runs the binary to completion inside `dir`.
pub fn run_in(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    command(envs)
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to spawn testable-report")
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Parses every line of a result file, panicking on malformed lines.
pub fn read_records(path: &Path) -> Vec<Value> {
    let contents = std::fs::read_to_string(path).expect("result file should exist");
    contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("invalid JSON: {e}\nline: {l}")))
        .collect()
}
