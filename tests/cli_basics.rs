use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with no API key in the environment and a HOME without a config file.
fn ggpt(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.env("HOME", home.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("GGPT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_help() {
    let home = TempDir::new().unwrap();

    ggpt(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("docstring"))
        .stdout(predicate::str::contains("naming"));
}

#[test]
fn prints_version() {
    let home = TempDir::new().unwrap();

    ggpt(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn hash_and_staged_are_mutually_exclusive() {
    let home = TempDir::new().unwrap();

    ggpt(&home)
        .args(["review", "--hash", "abc123", "--staged", "--api-key", "k"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_api_key_shows_remedies() {
    let home = TempDir::new().unwrap();

    ggpt(&home)
        .args(["review", "--path"])
        .arg(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ggpt review --api-key <YOUR_API_KEY_HERE>"))
        .stdout(predicate::str::contains("export OPENAI_API_KEY=<YOUR_API_KEY_HERE>"));
}

#[test]
fn non_repository_path_is_reported() {
    let home = TempDir::new().unwrap();
    let not_a_repo = TempDir::new().unwrap();

    ggpt(&home)
        .args(["docstring", "--api-key", "k", "--path"])
        .arg(not_a_repo.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("is not a valid Git repository"));
}

#[test]
fn blank_naming_prompt_has_no_content() {
    let home = TempDir::new().unwrap();

    ggpt(&home)
        .args(["naming", "   ", "--api-key", "k"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("There is no content to request."));
}

#[test]
fn unknown_command_is_not_implemented() {
    let home = TempDir::new().unwrap();

    ggpt(&home)
        .args(["explain", "--api-key", "k"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Command 'explain' is not implemented."));
}
