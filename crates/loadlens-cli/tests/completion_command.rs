use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_loadlens_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("loadlens")
}

fn completion_for(shell: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("completion").arg("--shell").arg(shell);
    cmd.assert().success()
}

#[test]
fn test_bash_completion_offers_view_flags() {
    completion_for("bash")
        .stdout(predicate::str::contains("--highlight"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--collapse"))
        .stdout(predicate::str::contains("--exit-code"));
}

#[test]
fn test_zsh_completion_describes_subcommands() {
    completion_for("zsh")
        .stdout(predicate::str::contains("breakdown"))
        .stdout(predicate::str::contains("series"))
        .stdout(predicate::str::contains("Display the Apdex rating"));
}

#[test]
fn test_fish_completion_lists_output_formats() {
    completion_for("fish")
        .stdout(predicate::str::contains("pretty"))
        .stdout(predicate::str::contains("table"))
        .stdout(predicate::str::contains("Highlight a row and show its details"));
}

#[test]
fn test_completion_help_shows_loadlens_install_lines() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "loadlens completion --shell bash >> ~/.bashrc",
        ))
        .stdout(predicate::str::contains("~/.zfunc/_loadlens"));
}
