use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway copy of the jaffle_shop demo project.
struct TollgateTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl TollgateTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("demos/jaffle_shop");

        let dest = tmp.path().join("jaffle_shop");
        Self::copy_dir(&project_root, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.skip_exist = true;
        options.content_only = true;

        std::fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn append(&self, rel: &str, line: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(self.root.join(rel))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn run_results(&self) -> Result<serde_json::Value> {
        let raw = std::fs::read_to_string(self.root.join("target/run_results.json"))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn tollgate(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tollgate"));
        cmd.current_dir(&self.root);
        cmd.env_remove("TOLLGATE_PROFILE")
            .env_remove("TOLLGATE_DATABASE")
            .env_remove("TOLLGATE_TARGET_PATH");
        cmd
    }
}

#[test]
fn test_run_demo_project_passes() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS!"));

    let results = env.run_results()?;
    assert_eq!(results["success"], serde_json::Value::Bool(true));
    assert_eq!(results["environment"], "dev");
    let models = results["models"].as_array().context("models array")?;
    let names: Vec<&str> = models.iter().filter_map(|m| m["model"].as_str()).collect();
    assert_eq!(names, vec!["customers", "orders", "payments"]);
    assert_eq!(models[1]["quality"]["success_rate"], 100.0);
    Ok(())
}

#[test]
fn test_run_select_and_dry_run() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .args(["run", "--select", "orders", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"));

    let results = env.run_results()?;
    assert_eq!(results["executed"], serde_json::Value::Bool(false));
    let models = results["models"].as_array().context("models array")?;
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["validations"][0]["status"], "skipped");
    Ok(())
}

#[test]
fn test_bad_rows_fail_the_run() -> Result<()> {
    let env = TollgateTestEnv::new()?;
    env.append("data/orders.csv", "13,99,2018-01-20,lost,500")?;

    env.tollgate()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("FAILURE. 1 models failed: orders"));

    let results = env.run_results()?;
    assert_eq!(results["success"], serde_json::Value::Bool(false));
    let orders = &results["models"][1]["validations"];
    assert_eq!(orders[2]["rule_type"], "referential_integrity");
    assert_eq!(orders[2]["status"], "fail");
    assert_eq!(orders[3]["sample_messages"][0], "Unexpected value lost in status");
    Ok(())
}

#[test]
fn test_warn_severity_does_not_block() -> Result<()> {
    let env = TollgateTestEnv::new()?;
    env.append("data/payments.csv", "15,12,paypal,100")?;

    env.tollgate().arg("run").assert().success();

    let results = env.run_results()?;
    assert_eq!(results["models"][2]["validations"][2]["status"], "fail");
    assert_eq!(results["success"], serde_json::Value::Bool(true));
    Ok(())
}

#[test]
fn test_validate_single_rule() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .args(["validate", "--model", "orders", "--type", "not_null", "--column", "order_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS not_null(order_id) on orders"));

    env.tollgate()
        .args([
            "validate",
            "-m",
            "orders",
            "-t",
            "accepted_values",
            "-c",
            "status",
            "-C",
            "values=[placed, shipped]",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("failing rows for accepted_values(status)"));
    Ok(())
}

#[test]
fn test_validate_rejects_unknown_rule() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .args(["validate", "--model", "orders", "--type", "is_fresh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown validation type 'is_fresh'"));
    Ok(())
}

#[test]
fn test_quality_command_reports() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .args([
            "quality",
            "--model",
            "customers",
            "--null-check",
            "email",
            "--date-range-check",
            "signup_date",
            "--verbose",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Row count: 10"))
        .stdout(predicate::str::contains("email: 0 nulls (0.00%)"))
        .stdout(predicate::str::contains("Quality checks: all checks PASSED"));

    env.tollgate()
        .args(["quality", "--model", "customers", "--min-rows", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row count 10 is below minimum 50"));
    Ok(())
}

#[test]
fn test_compile_prints_sql() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .args(["compile", "--select", "orders"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "LEFT JOIN \"main\".\"customers\" AS parent",
        ))
        .stdout(predicate::str::contains("CAST((amount) / 100 AS DECIMAL(16, 2)) < 1000"));
    Ok(())
}

#[test]
fn test_query_and_clean() -> Result<()> {
    let env = TollgateTestEnv::new()?;

    env.tollgate()
        .args(["query", "SELECT COUNT(*) AS order_total FROM orders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("order_total"))
        .stdout(predicate::str::contains("12"));

    env.tollgate().arg("run").assert().success();
    assert!(env.root.join("target").exists());

    env.tollgate()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed target"));
    assert!(!env.root.join("target").exists());
    Ok(())
}
