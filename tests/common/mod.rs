#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub catalog: PathBuf,
    pub dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let dir = tmp.path().to_path_buf();
        let catalog = write_fixture_catalog(&dir);
        Self {
            _tmp: tmp,
            home,
            catalog,
            dir,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("hazid");
        cmd.env("HOME", &self.home)
            .env_remove("HAZID_CATALOG")
            .env_remove("HAZID_LOG");
        cmd
    }

    /// `hazid --json --catalog <fixture> <args>`, expecting success.
    pub fn run_json(&self, args: &[&str]) -> Value {
        self.run_json_stdin(args, "")
    }

    pub fn run_json_stdin(&self, args: &[&str], stdin: &str) -> Value {
        self.run_json_on(&self.catalog, args, stdin)
    }

    /// Like `run_json_stdin`, against another catalog file.
    pub fn run_json_on(&self, catalog: &Path, args: &[&str], stdin: &str) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .arg("--catalog")
            .arg(catalog)
            .args(args)
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Expects failure and returns the JSON error envelope.
    pub fn run_json_err(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let p = self.dir.join(name);
        fs::write(&p, body).expect("write fixture file");
        p
    }
}

pub fn codes(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("hazard list")
        .iter()
        .map(|e| e["code"].as_str().expect("code").to_string())
        .collect()
}

fn write_fixture_catalog(base: &Path) -> PathBuf {
    let catalog = serde_json::json!([
        {
            "Hazard_Code": "H1",
            "Hazard_Name": "Urban fire",
            "Hazard_Description": "Uncontrolled burning in a built-up area.",
            "Keywords": "fire, blaze",
            "Upstream_Hazards": null,
            "Questions": "Did a fire break out?",
            "Hazard_Category": "Societal"
        },
        {
            "Hazard_Code": "H2",
            "Hazard_Name": "Smoke pollution",
            "Hazard_Description": "Harmful smoke from a fire.",
            "Keywords": null,
            "Upstream_Hazards": "H1",
            "Questions": "Was there harmful smoke?",
            "Hazard_Category": "Environmental"
        },
        {
            "Hazard_Code": "H3",
            "Hazard_Name": "Flood",
            "Hazard_Description": "Overflow of water onto normally dry land.",
            "Keywords": "flood inundation",
            "Upstream_Hazards": "",
            "Questions": "Was there flooding?",
            "Hazard_Category": "Hydrological"
        }
    ]);
    let path = base.join("hazard_definitions.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&catalog).expect("serialize catalog"),
    )
    .expect("write catalog");
    path
}
