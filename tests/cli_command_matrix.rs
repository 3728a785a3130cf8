use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("hazid");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    run_help(&home, &[]);

    // classification
    run_help(&home, &["run"]);
    run_help(&home, &["start"]);
    run_help(&home, &["answer"]);
    run_help(&home, &["status"]);

    // stateless helpers
    run_help(&home, &["questions"]);
    run_help(&home, &["refine"]);
    run_help(&home, &["tokens"]);

    run_help(&home, &["catalog"]);
    run_help(&home, &["catalog", "list"]);
    run_help(&home, &["catalog", "show"]);
    run_help(&home, &["catalog", "validate"]);
}

#[test]
fn report_input_is_required_and_exclusive() {
    let home = TempDir::new().expect("temp home");
    cargo_bin_cmd!("hazid")
        .env("HOME", home.path())
        .arg("run")
        .assert()
        .failure();
    cargo_bin_cmd!("hazid")
        .env("HOME", home.path())
        .args(["run", "--text", "fire", "--report", "r.txt"])
        .assert()
        .failure();
    cargo_bin_cmd!("hazid")
        .env("HOME", home.path())
        .args(["run", "--text", "fire", "--passes", "2", "--until-stable"])
        .assert()
        .failure();
}
