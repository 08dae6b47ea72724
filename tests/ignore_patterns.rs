use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

fn project_with_ignored_entry() -> tempfile::TempDir {
    common::project(&[
        (".gitignore", "generated/\n"),
        ("main.cpp", "int main() {}\n"),
        ("generated/gen_main.cpp", "int main() {}\n"),
    ])
}

#[test]
fn gitignored_entry_points_are_skipped() {
    let td = project_with_ignored_entry();
    Command::cargo_bin("include-tree")
        .unwrap()
        .current_dir(td.path())
        .args(["scan", "proj", "--no-separator"])
        .assert()
        .success()
        .stdout("proj/main.cpp\n");
}

#[test]
fn no_ignore_includes_everything() {
    let td = project_with_ignored_entry();
    Command::cargo_bin("include-tree")
        .unwrap()
        .current_dir(td.path())
        .args(["scan", "proj", "--no-separator", "--no-ignore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proj/generated/gen_main.cpp\n").and(predicate::str::contains("proj/main.cpp\n")));
}
