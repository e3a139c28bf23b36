//! CLI Integration Tests for Flowgen
//!
//! Runs the flowgen binary against the fixture templates and data file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Get the path to the flowgen binary built for this test run
fn flowgen_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flowgen"))
}

/// Get the fixtures directory
fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("test");
    path.push("fixtures");
    path
}

/// Temp directory holding Chip.png and Chip.dat
fn chip_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::copy(fixtures_dir().join("chip.dat"), dir.path().join("Chip.dat"))
        .expect("Failed to copy data file");
    fs::write(dir.path().join("Chip.png"), b"\x89PNG\r\n").expect("Failed to write image");
    dir
}

fn flowgen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(flowgen_binary())
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to run flowgen")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "flowgen failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// ============================================================================
// Make Command Tests
// ============================================================================

#[test]
fn test_make_chip() {
    let dir = chip_dir();
    let templates = fixtures_dir().join("templates");

    let output = flowgen(
        dir.path(),
        &["make", "Chip", "--templates-dir", templates.to_str().unwrap()],
    );
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote"), "Expected written files: {}", stdout);
    assert!(stdout.contains("3 instructions, 1 parameter groups"));

    for module in ["Main", "Mapping", "Imaging", "Driver", "GUI"] {
        let path = dir.path().join(format!("Chip{}.java", module));
        assert!(path.exists(), "{} not created", path.display());
    }

    let driver = fs::read_to_string(dir.path().join("ChipDriver.java")).unwrap();
    assert!(driver.contains("public static final int[] Pump_instruction_map = {0,1};"));
    assert!(driver.contains("public static void Pump(int p0) {"));

    let gui = fs::read_to_string(dir.path().join("ChipGUI.java")).unwrap();
    assert!(gui.contains("IMAGE_FILENAME = \"Chip.png\""));
}

#[test]
fn test_make_explicit_inputs_and_out_dir() {
    let dir = chip_dir();
    let templates = fixtures_dir().join("templates");
    let out = dir.path().join("generated");

    let output = flowgen(
        dir.path(),
        &[
            "make",
            "Board",
            "Chip.png",
            "Chip.dat",
            "--templates-dir",
            templates.to_str().unwrap(),
            "--out-dir",
            out.to_str().unwrap(),
        ],
    );
    assert_success(&output);

    let main = fs::read_to_string(out.join("BoardMain.java")).unwrap();
    assert!(main.contains("BoardGUI.openPort(1);"));
}

#[test]
fn test_make_dry_run_writes_nothing() {
    let dir = chip_dir();
    let templates = fixtures_dir().join("templates");

    let output = flowgen(
        dir.path(),
        &[
            "make",
            "Chip",
            "--dry-run",
            "--templates-dir",
            templates.to_str().unwrap(),
        ],
    );
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would write"), "Expected dry run plan: {}", stdout);
    assert!(!dir.path().join("ChipDriver.java").exists());
}

#[test]
fn test_make_with_config_file() {
    let dir = chip_dir();
    let templates = fixtures_dir().join("templates");
    fs::write(
        dir.path().join("flowgen.toml"),
        format!(
            "[template]\ndir = {:?}\n\n[dispatch]\nfunction = \"Execute\"\n",
            templates.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = flowgen(dir.path(), &["make", "Chip"]);
    assert_success(&output);

    let driver = fs::read_to_string(dir.path().join("ChipDriver.java")).unwrap();
    assert!(driver.contains("Execute(Pump_instruction_map[i]);"));
}

#[test]
fn test_make_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();

    let output = flowgen(dir.path(), &["make", "Nope"]);
    assert!(!output.status.success(), "Should fail without inputs");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Nope.png"), "Expected missing image: {}", stderr);
    assert!(stderr.contains("Nope.dat"), "Expected missing data: {}", stderr);
}

#[test]
fn test_make_missing_template() {
    let dir = chip_dir();
    let empty = tempfile::tempdir().unwrap();

    let output = flowgen(
        dir.path(),
        &["make", "Chip", "--templates-dir", empty.path().to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(!dir.path().join("ChipMain.java").exists());
}

// ============================================================================
// Inspection Tests
// ============================================================================

#[test]
fn test_inspect() {
    let dir = chip_dir();

    let output = flowgen(dir.path(), &["inspect", "Chip.dat"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Image 640x480, 4 control lines, 3 instructions"));
    assert!(stdout.contains("Instructions (3):"));
    assert!(stdout.contains("Parameter groups (1):"));
    assert!(stdout.contains("map {0,1}"));
}

#[test]
fn test_shortcuts_stdout() {
    let dir = chip_dir();

    let output = flowgen(dir.path(), &["shortcuts", "Chip.dat"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("// BEGIN instruction shortcuts"));
    assert!(stdout.contains("public static void Mix(int runTime) {"));
    assert!(stdout.trim_end().ends_with("// END instruction shortcuts"));
}

#[test]
fn test_shortcuts_to_file() {
    let dir = chip_dir();

    let output = flowgen(dir.path(), &["shortcuts", "Chip.dat", "-o", "shortcuts.java"]);
    assert_success(&output);

    let code = fs::read_to_string(dir.path().join("shortcuts.java")).unwrap();
    assert!(code.contains("Pump_instruction_map"));
}

#[test]
fn test_help() {
    let output = Command::new(flowgen_binary())
        .arg("--help")
        .output()
        .expect("Failed to run flowgen");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("make"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("shortcuts"));
}

#[test]
fn test_version() {
    let output = Command::new(flowgen_binary())
        .arg("--version")
        .output()
        .expect("Failed to run flowgen");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("flowgen"));
}
