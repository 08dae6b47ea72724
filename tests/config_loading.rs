use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn config_file_beside_scanned_dir_is_picked_up() {
    let td = common::project(&[
        ("include-tree.toml", "entry_marker = \"void app_main(\"\n\n[output]\nseparator = false\n"),
        ("firmware.c", "#include <stdint.h>\nvoid app_main(void) {}\n"),
        ("host.cpp", "int main() {}\n"),
    ]);
    Command::cargo_bin("include-tree")
        .unwrap()
        .current_dir(td.path())
        .args(["scan", "proj"])
        .assert()
        .success()
        .stdout("proj/firmware.c\n  stdint.h (Ext)\n");
}

#[test]
fn cli_flags_override_config() {
    let td = common::project(&[
        ("include-tree.toml", "entry_marker = \"void app_main(\"\n"),
        ("firmware.c", "void app_main(void) {}\n"),
        ("host.cpp", "int main() {}\n"),
    ]);
    Command::cargo_bin("include-tree")
        .unwrap()
        .current_dir(td.path())
        .args(["scan", "proj", "--entry-marker", "int main(", "--no-separator"])
        .assert()
        .success()
        .stdout("proj/host.cpp\n");
}

#[test]
fn explicit_config_path_with_extensions() {
    let td = common::project(&[
        ("main.cc", "#include \"util.h\"\nint main() {}\n"),
        ("main.cpp", "int main() {}\n"),
        ("util.h", ""),
        ("util.cc", ""),
        ("util.cpp", ""),
    ]);
    common::write(&td.path().join("only-cc.toml"), b"[resolve]\nextensions = [\".cc\"]\n[output]\nseparator = false\n");
    Command::cargo_bin("include-tree")
        .unwrap()
        .current_dir(td.path())
        .args(["scan", "proj", "--config", "only-cc.toml"])
        .assert()
        .success()
        .stdout("proj/main.cc\n  proj/util.cc\n  proj/util.h\n");
}

#[test]
fn unknown_config_key_is_an_error() {
    let td = common::project(&[("include-tree.toml", "colour = \"red\"\n"), ("main.cpp", "int main() {}\n")]);
    Command::cargo_bin("include-tree")
        .unwrap()
        .current_dir(td.path())
        .args(["scan", "proj"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("include-tree.toml"));
}
