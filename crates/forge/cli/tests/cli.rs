//! End-to-end tests for the `tokenforge` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TAXED_SPEC: &str = r#"{
  "name": "Moon",
  "symbol": "MOON",
  "totalSupply": "1000000",
  "decimals": 18,
  "features": {
    "tax": {
      "enabled": true,
      "parameters": { "buyTax": 5, "sellTax": 5, "liquidityShare": 50, "marketingShare": 50 }
    }
  }
}"#;

const INVALID_SPEC: &str = r#"{
  "name": "Moon",
  "symbol": "MOON",
  "totalSupply": "1000000",
  "decimals": 18,
  "features": { "tax": { "enabled": true, "parameters": { "buyTax": 40 } } }
}"#;

fn spec_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn tokenforge() -> Command {
    let mut cmd = Command::cargo_bin("tokenforge").unwrap();
    cmd.env_remove("TOKENFORGE_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn catalog_lists_features() {
    tokenforge()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"autoLiquidity\""))
        .stdout(predicate::str::contains("\"functionsToTimelock\""));
}

#[test]
fn generate_prints_source() {
    let file = spec_file(TAXED_SPEC, ".json");
    tokenforge()
        .arg("generate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("contract Moon is ERC20, Ownable {"))
        .stdout(predicate::str::contains("function _transfer("));
}

#[test]
fn generate_reads_yaml() {
    let yaml = "name: Moon\nsymbol: MOON\ntotalSupply: 1000\ndecimals: 18\n";
    let file = spec_file(yaml, ".yaml");
    tokenforge()
        .arg("generate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_mint(msg.sender, 1000 * 10 ** 18);"))
        .stdout(predicate::str::contains("function _transfer(").not());
}

#[test]
fn generate_json_format() {
    let file = spec_file(TAXED_SPEC, ".json");
    tokenforge()
        .args(["generate", "--format", "json"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"enabledFeatureIds\""))
        .stdout(predicate::str::contains("\"sourceHash\""));
}

#[test]
fn generate_writes_out_file() {
    let file = spec_file(TAXED_SPEC, ".json");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("Moon.sol");
    tokenforge()
        .arg("generate")
        .arg(file.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let written = std::fs::read_to_string(out).unwrap();
    assert!(written.starts_with("// SPDX-License-Identifier: MIT"));
}

#[test]
fn generate_rejects_invalid_spec() {
    let file = spec_file(INVALID_SPEC, ".json");
    tokenforge()
        .arg("generate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("tax.buyTax: must be at most 25"))
        .stderr(predicate::str::contains("tax.sellTax: required parameter is missing"));
}

#[test]
fn validate_reports_all_errors() {
    let file = spec_file(INVALID_SPEC, ".json");
    tokenforge()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("\"parameterId\": \"liquidityShare\""));
}

#[test]
fn validate_accepts_valid_spec() {
    let file = spec_file(TAXED_SPEC, ".json");
    tokenforge()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));
}

#[test]
fn validate_rejects_unknown_feature() {
    let spec = r#"{
  "name": "Moon",
  "symbol": "MOON",
  "totalSupply": "1000000",
  "decimals": 18,
  "features": { "mintable": { "enabled": true } }
}"#;
    let file = spec_file(spec, ".json");
    tokenforge()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": true").not())
        .stderr(predicate::str::contains("UnknownFeature"));
}

#[test]
fn config_sets_license() {
    let spec = spec_file(TAXED_SPEC, ".json");
    let config = spec_file("license = \"UNLICENSED\"\n", ".toml");
    tokenforge()
        .arg("--config")
        .arg(config.path())
        .arg("generate")
        .arg(spec.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("// SPDX-License-Identifier: UNLICENSED"));
}

#[test]
fn generate_reads_stdin() {
    tokenforge()
        .args(["generate", "-"])
        .write_stdin(TAXED_SPEC)
        .assert()
        .success()
        .stdout(predicate::str::contains("contract Moon"));
}
