use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `pdfx` isolated from any config files on the host
fn pdfx(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pdfx").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("PDFX_INTERPRETER")
        .env_remove("PDFX_SCRIPT")
        .env_remove("PDFX_TIMEOUT");
    cmd
}

fn fake_extractor(dir: &Path) -> PathBuf {
    let script = dir.join("extract.sh");
    fs::write(
        &script,
        "#!/bin/sh\nif [ ! -f \"$1\" ]; then echo \"File not found: $1\" >&2; exit 1; fi\ncat \"$1\"\n",
    )
    .unwrap();
    script
}

#[test]
fn tools_lists_pdf_extract() {
    let dir = TempDir::new().unwrap();
    pdfx(dir.path())
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf_extract"))
        .stdout(predicate::str::contains(
            "Extract text, metadata, and images from a PDF",
        ));
}

#[test]
fn schema_prints_single_tool_definition() {
    let dir = TempDir::new().unwrap();
    let output = pdfx(dir.path())
        .args(["schema", "pdf_extract"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["function"]["name"], "pdf_extract");
    assert_eq!(
        value["function"]["parameters"]["properties"]["path"]["type"],
        "string"
    );
    assert_eq!(
        value["function"]["parameters"]["required"],
        serde_json::json!(["path"])
    );
}

#[test]
fn schema_rejects_unknown_tool() {
    let dir = TempDir::new().unwrap();
    pdfx(dir.path())
        .args(["schema", "bash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool: bash"));
}

#[cfg(unix)]
#[test]
fn extract_prints_trimmed_output() {
    let dir = TempDir::new().unwrap();
    let script = fake_extractor(dir.path());
    fs::write(dir.path().join("doc.pdf"), "\n   hello world  \n\n").unwrap();

    pdfx(dir.path())
        .args(["--interpreter", "sh", "--script"])
        .arg(&script)
        .args(["extract", "doc.pdf"])
        .assert()
        .success()
        .stdout("hello world\n");
}

#[cfg(unix)]
#[test]
fn extract_reads_config_file() {
    let dir = TempDir::new().unwrap();
    fake_extractor(dir.path());
    fs::write(
        dir.path().join("pdfx.json"),
        r#"{"interpreter": "sh", "script": "extract.sh"}"#,
    )
    .unwrap();
    fs::write(dir.path().join("doc.pdf"), "from config\n").unwrap();

    pdfx(dir.path())
        .args(["extract", "doc.pdf"])
        .assert()
        .success()
        .stdout("from config\n");
}

#[cfg(unix)]
#[test]
fn extract_reads_xdg_config() {
    let dir = TempDir::new().unwrap();
    let script = fake_extractor(dir.path());
    let xdg_config = dir.path().join("xdg/pdfx/config.json");
    fs::create_dir_all(xdg_config.parent().unwrap()).unwrap();
    fs::write(
        &xdg_config,
        serde_json::json!({"interpreter": "sh", "script": script}).to_string(),
    )
    .unwrap();
    fs::write(dir.path().join("doc.pdf"), "from xdg\n").unwrap();

    pdfx(dir.path())
        .args(["extract", "doc.pdf"])
        .assert()
        .success()
        .stdout("from xdg\n");
}

#[cfg(unix)]
#[test]
fn working_dir_flag_changes_discovery_and_relative_paths() {
    let caller = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    fake_extractor(project.path());
    fs::write(
        project.path().join("pdfx.json"),
        r#"{"interpreter": "sh", "script": "extract.sh"}"#,
    )
    .unwrap();
    fs::write(project.path().join("doc.pdf"), "from project\n").unwrap();

    pdfx(caller.path())
        .arg("--working-dir")
        .arg(project.path())
        .args(["extract", "doc.pdf"])
        .assert()
        .success()
        .stdout("from project\n");
}

#[test]
fn zero_timeout_from_env_is_rejected() {
    let dir = TempDir::new().unwrap();
    pdfx(dir.path())
        .env("PDFX_TIMEOUT", "0")
        .args(["extract", "doc.pdf"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Configuration validation failed"));
}

#[cfg(unix)]
#[test]
fn extract_fails_for_missing_file() {
    let dir = TempDir::new().unwrap();
    let script = fake_extractor(dir.path());

    pdfx(dir.path())
        .args(["--interpreter", "sh", "--script"])
        .arg(&script)
        .args(["extract", "missing.pdf"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("File not found: missing.pdf"));
}

#[cfg(unix)]
#[test]
fn extract_json_reports_result() {
    let dir = TempDir::new().unwrap();
    let script = fake_extractor(dir.path());
    fs::write(dir.path().join("doc.pdf"), "  body  ").unwrap();

    let output = pdfx(dir.path())
        .env("PDFX_INTERPRETER", "sh")
        .env("PDFX_SCRIPT", &script)
        .args(["extract", "doc.pdf", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["content"], "body");
}

#[test]
fn check_fails_when_interpreter_is_missing() {
    let dir = TempDir::new().unwrap();
    pdfx(dir.path())
        .args(["--interpreter", "pdfx-no-such-interpreter", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found on PATH"));
}

#[cfg(unix)]
#[test]
fn check_succeeds_for_ready_extractor() {
    let dir = TempDir::new().unwrap();
    let script = fake_extractor(dir.path());

    pdfx(dir.path())
        .args(["--interpreter", "sh", "--script"])
        .arg(&script)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Script"));
}
