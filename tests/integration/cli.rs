//! The `zenfig` binary end to end.

use assert_cmd::Command;
use predicates::prelude::*;

use zenfig::test_utils::TestWorkspace;

const THEME: &str = r#"
base: "1A1A1A"
accent: "{{ @base|norm_hex }}"
font_size: 11
title: "Size {{ @font_size }}"
"#;

/// A workspace with an empty configuration file, isolated from the user's own.
fn workspace() -> TestWorkspace {
    let workspace = TestWorkspace::new().unwrap();
    workspace.write("config.toml", "include = []\n").unwrap();
    workspace
}

fn zenfig(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("zenfig").unwrap();
    cmd.current_dir(workspace.path())
        .env_remove("ZENFIG_VARS_PATH")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(workspace.path().join("config.toml"));
    cmd
}

#[test]
fn test_render_to_stdout() {
    let ws = workspace();
    ws.write("theme.yaml", THEME).unwrap();
    ws.write("app.conf.tera", "accent = {{ accent }}\nsize = {{ font_size + 1 }}\n").unwrap();

    zenfig(&ws)
        .args(["render", "-I", "theme.yaml", "app.conf.tera"])
        .assert()
        .success()
        .stdout("accent = #1a1a1a\nsize = 12\n");
}

#[test]
fn test_render_to_output_file() {
    let ws = workspace();
    ws.write("theme.yaml", THEME).unwrap();
    ws.write("app.conf.tera", "{{ title }} {{ accent | upper }}").unwrap();

    zenfig(&ws)
        .args(["render", "-I", "theme.yaml", "-o", "out/app.conf", "app.conf.tera"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(ws.read("out/app.conf").unwrap(), "Size 11 #1A1A1A");
}

#[test]
fn test_vars_as_json() {
    let ws = workspace();
    ws.write("theme.yaml", THEME).unwrap();

    let output = zenfig(&ws)
        .args(["vars", "-I", "theme.yaml", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["accent"], "#1a1a1a");
    assert_eq!(json["font_size"], 11);
    assert_eq!(json["title"], "Size 11");
}

#[test]
fn test_vars_tree() {
    let ws = workspace();
    ws.write("theme.yaml", THEME).unwrap();

    zenfig(&ws)
        .args(["vars", "-I", "theme.yaml", "--tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("└── accent\n    └── base\n"));
}

#[test]
fn test_later_include_wins_over_env_path() {
    let ws = workspace();
    ws.write("env.yaml", "name: from-env\nonly_env: yes-env\n").unwrap();
    ws.write("cli.yaml", "name: from-cli\n").unwrap();
    ws.write("t.tera", "{{ name }} {{ only_env }}").unwrap();

    zenfig(&ws)
        .env("ZENFIG_VARS_PATH", ws.path().join("env.yaml"))
        .args(["render", "-I", "cli.yaml", "t.tera"])
        .assert()
        .success()
        .stdout("from-cli yes-env");
}

#[test]
fn test_config_include_and_strict() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("vars.yaml", "greeting: 'hi {{ @nobody }}'\n").unwrap();
    let vars = ws.path().join("vars.yaml").display().to_string();
    ws.write("config.toml", &format!("strict = true\ninclude = [{vars:?}]\n")).unwrap();
    ws.write("t.tera", "{{ greeting }}").unwrap();

    zenfig(&ws)
        .args(["render", "t.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nobody"));
}

#[test]
fn test_undefined_reference_warns_and_renders_empty() {
    let ws = workspace();
    ws.write("vars.yaml", "greeting: 'hi {{ @nobody }}!'\n").unwrap();
    ws.write("t.tera", "{{ greeting }}").unwrap();

    zenfig(&ws)
        .args(["render", "-I", "vars.yaml", "t.tera"])
        .assert()
        .success()
        .stdout("hi !")
        .stderr(predicate::str::contains("undefined variable 'nobody'"));

    zenfig(&ws)
        .args(["render", "--strict", "-I", "vars.yaml", "t.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not defined"));
}

#[test]
fn test_cycle_fails_with_chain() {
    let ws = workspace();
    ws.write("vars.yaml", "a: '{{ @b }}'\nb: '{{ @c }}'\nc: '{{ @a }}'\n").unwrap();

    zenfig(&ws)
        .args(["vars", "-I", "vars.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("a ~> b ~> c ~> a"));
}

#[test]
fn test_missing_inputs() {
    let ws = workspace();
    ws.write("t.tera", "static").unwrap();

    zenfig(&ws)
        .args(["render", "-I", "missing.yaml", "t.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Variable source not found"));

    zenfig(&ws)
        .args(["render", "nope.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found"));
}

#[test]
fn test_invalid_env_search_path() {
    let ws = workspace();
    ws.write("t.tera", "static").unwrap();

    zenfig(&ws)
        .env("ZENFIG_VARS_PATH", "a::b")
        .args(["render", "t.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid search path"));
}

#[test]
fn test_template_error_is_reported() {
    let ws = workspace();
    ws.write("t.tera", "{{ undefined_thing }}").unwrap();

    zenfig(&ws)
        .args(["render", "t.tera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined_thing"))
        .stderr(predicate::str::contains("__tera_one_off").not());
}
