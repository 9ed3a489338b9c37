use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("yt-transcriptor")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("transcribe")
                .and(predicate::str::contains("batch"))
                .and(predicate::str::contains("models")),
        );
}

#[test]
fn batch_requires_some_input() {
    Command::cargo_bin("yt-transcriptor")
        .unwrap()
        .args(["--quiet", "batch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn models_lists_all_sizes() {
    Command::cargo_bin("yt-transcriptor")
        .unwrap()
        .args(["--quiet", "models"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("tiny")
                .and(predicate::str::contains("base"))
                .and(predicate::str::contains("small"))
                .and(predicate::str::contains("medium"))
                .and(predicate::str::contains("large")),
        );
}
