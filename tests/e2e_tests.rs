//! End-to-end tests for the depbump CLI
//!
//! These tests verify:
//! - Dry-run mode leaves files unchanged
//! - --write patches every supported manifest format
//! - CLI produces correct JSON output schema
//! - Exit codes are correct for various scenarios

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const PACKAGE_JSON: &str = r#"{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": {
    "lodash": "^3.10.0"
  },
  "devDependencies": {
    "typescript": "~5.0.0"
  }
}"#;

const CARGO_TOML: &str = r#"[package]
name = "test-project"
version = "0.1.0"
edition = "2021"

[dependencies]
serde = "1.0.190"
tokio = { version = "1.35", features = ["full"] }
"#;

const REQUIREMENTS_TXT: &str = "flask==2.0.0\nrequests==2.25.1  # http\n";

const REQUEST_TOML: &str = r#"
[[dependencies]]
name = "lodash"
ecosystem = "npm"
latest_resolvable_version = "4.17.21"
requirements = [{ requirement = "^3.10.0", file = "package.json", groups = ["dependencies"] }]

[[dependencies]]
name = "typescript"
ecosystem = "npm"
latest_resolvable_version = "5.0.4"
requirements = [{ requirement = "~5.0.0", file = "package.json", groups = ["devDependencies"] }]

[[dependencies]]
name = "tokio"
ecosystem = "cargo"
latest_resolvable_version = "2.1.0"
requirements = [{ requirement = "1.35", file = "Cargo.toml" }]

[[dependencies]]
name = "requests"
ecosystem = "pip"
latest_resolvable_version = "2.31.0"
requirements = [{ requirement = "==2.25.1", file = "requirements.txt" }]
"#;

/// Create a test directory with sample manifest files and a request
fn create_test_project() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("package.json"), PACKAGE_JSON).unwrap();
    fs::write(temp_dir.path().join("Cargo.toml"), CARGO_TOML).unwrap();
    fs::write(temp_dir.path().join("requirements.txt"), REQUIREMENTS_TXT).unwrap();
    fs::write(temp_dir.path().join("request.toml"), REQUEST_TOML).unwrap();
    temp_dir
}

fn depbump() -> Command {
    Command::new(env!("CARGO_BIN_EXE_depbump"))
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

mod dry_run_tests {
    use super::*;

    /// Without --write nothing is touched
    #[test]
    fn test_report_only_leaves_files_unchanged() {
        let temp_dir = create_test_project();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .assert()
            .success()
            .stdout(predicate::str::contains("lodash ^3.10.0 → ^4.0.0"));

        assert_eq!(read(&temp_dir, "package.json"), PACKAGE_JSON);
        assert_eq!(read(&temp_dir, "Cargo.toml"), CARGO_TOML);
        assert_eq!(read(&temp_dir, "requirements.txt"), REQUIREMENTS_TXT);
    }

    /// --write --dry-run reports but does not write
    #[test]
    fn test_dry_run_with_write_leaves_files_unchanged() {
        let temp_dir = create_test_project();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .args(["--write", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(dry-run) Summary:"))
            .stdout(predicate::str::contains("Would write:"));

        assert_eq!(read(&temp_dir, "package.json"), PACKAGE_JSON);
        assert_eq!(read(&temp_dir, "Cargo.toml"), CARGO_TOML);
        assert_eq!(read(&temp_dir, "requirements.txt"), REQUIREMENTS_TXT);
    }

    /// Quiet mode prints a single summary line
    #[test]
    fn test_dry_run_with_quiet_mode() {
        let temp_dir = create_test_project();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .args(["--dry-run", "--quiet"])
            .assert()
            .success()
            .stdout("(dry-run) 3 updated, 0 failed\n");
    }
}

mod write_tests {
    use super::*;

    #[test]
    fn test_write_patches_all_manifests() {
        let temp_dir = create_test_project();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .arg("--write")
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote:"));

        let package_json = read(&temp_dir, "package.json");
        assert!(package_json.contains(r#""lodash": "^4.0.0""#));
        // 5.0.4 already satisfies ~5.0.0
        assert!(package_json.contains(r#""typescript": "~5.0.0""#));
        serde_json::from_str::<Value>(&package_json).unwrap();

        let cargo_toml = read(&temp_dir, "Cargo.toml");
        assert!(cargo_toml.contains(r#"tokio = { version = "2.0", features = ["full"] }"#));
        assert!(cargo_toml.contains(r#"serde = "1.0.190""#));

        assert_eq!(
            read(&temp_dir, "requirements.txt"),
            "flask==2.0.0\nrequests==2.31.0  # http\n"
        );
    }

    #[test]
    fn test_write_with_root_override() {
        let temp_dir = create_test_project();
        let request_dir = tempfile::tempdir().unwrap();
        let request = request_dir.path().join("request.toml");
        fs::write(&request, REQUEST_TOML).unwrap();

        depbump()
            .arg(&request)
            .arg("--root")
            .arg(temp_dir.path())
            .args(["--write", "--ecosystem", "npm"])
            .assert()
            .success();

        assert!(read(&temp_dir, "package.json").contains(r#""lodash": "^4.0.0""#));
        assert_eq!(read(&temp_dir, "Cargo.toml"), CARGO_TOML);
    }

    #[test]
    fn test_write_missing_requirement_is_partial_failure() {
        let temp_dir = create_test_project();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{"dependencies": {"lodash": "^3.0.0"}}"#,
        )
        .unwrap();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .args(["--write", "--ecosystem", "npm"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("Errors:"));
    }
}

mod output_format_tests {
    use super::*;

    #[test]
    fn test_json_output_schema() {
        let temp_dir = create_test_project();

        let output = depbump()
            .arg(temp_dir.path().join("request.toml"))
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["dry_run"], false);
        assert_eq!(json["summary"]["updates"], 3);
        assert_eq!(json["summary"]["skips"], 1);
        assert_eq!(json["summary"]["failures"], 0);
        assert!(json["errors"].as_array().unwrap().is_empty());

        let deps = json["dependencies"].as_array().unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0]["name"], "lodash");
        assert_eq!(deps[0]["requirements"][0]["to"], "^4.0.0");
        assert_eq!(deps[1]["name"], "tokio");
        assert_eq!(deps[1]["ecosystem"], "Cargo");
        assert_eq!(deps[1]["requirements"][0]["to"], "2.0");
        assert_eq!(deps[2]["requirements"][0]["to"], "==2.31.0");
    }

    #[test]
    fn test_diff_output() {
        let temp_dir = create_test_project();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .args(["--diff", "--only", "lodash"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "--- a/package.json\n+++ b/package.json\n@@ lodash @@\n",
            ))
            .stdout(predicate::str::contains("# 1 dependency(ies) were updated"));
    }

    #[test]
    fn test_no_color_output_is_plain() {
        let temp_dir = create_test_project();

        depbump()
            .arg(temp_dir.path().join("request.toml"))
            .arg("--no-color")
            .assert()
            .success()
            .stdout(predicate::str::contains("[major]"))
            .stdout(predicate::str::contains("\x1b[").not());
    }

    #[test]
    fn test_json_and_diff_conflict() {
        depbump()
            .args(["request.toml", "--json", "--diff"])
            .assert()
            .failure();
    }
}

mod exit_code_tests {
    use super::*;

    #[test]
    fn test_missing_request_file() {
        depbump()
            .arg("/nonexistent/request.json")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn test_unsupported_request_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = temp_dir.path().join("request.yaml");
        fs::write(&request, "dependencies: []").unwrap();

        depbump().arg(&request).assert().code(1);
    }

    #[test]
    fn test_failed_dependency_exits_with_two() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = temp_dir.path().join("request.json");
        fs::write(
            &request,
            r#"{
  "ecosystem": "cargo",
  "dependencies": [
    {
      "name": "broken",
      "latest_resolvable_version": "2.0",
      "requirements": [{"requirement": "^1.0.0", "file": "Cargo.toml"}]
    },
    {
      "name": "rand",
      "latest_resolvable_version": "0.8.5",
      "requirements": [{"requirement": "0.7", "file": "Cargo.toml"}]
    }
  ]
}"#,
        )
        .unwrap();

        depbump()
            .arg(&request)
            .assert()
            .code(2)
            .stdout(predicate::str::contains("✗ broken"))
            .stdout(predicate::str::contains("rand 0.7 → 0.8"));
    }

    #[test]
    fn test_nothing_to_do_succeeds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = temp_dir.path().join("request.json");
        fs::write(&request, r#"{"ecosystem": "npm", "dependencies": []}"#).unwrap();

        depbump()
            .arg(&request)
            .assert()
            .success()
            .stdout(predicate::str::contains("No dependencies updated"));
    }
}
