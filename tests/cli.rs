use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn bin() -> Command {
    let path = assert_cmd::cargo::cargo_bin!("tric");
    Command::new(path)
}

/// A tool root with the given plugins, and a `tric` command pointed at it.
fn tric_root(plugins: &[&str]) -> TempDir {
    let root = tempdir().unwrap();
    fs::write(root.path().join(".env.tric"), "CLI_VERBOSITY=0\nXDK=tric\n").unwrap();
    fs::write(root.path().join("tric-stack.yml"), "services: {}\n").unwrap();
    for plugin in plugins {
        let dir = root.path().join("dev/_plugins").join(plugin);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("{}.php", plugin)),
            format!("<?php\n/*\n * Plugin Name: {}\n */\n", plugin),
        )
        .unwrap();
    }
    root
}

fn tric(root: &Path) -> Command {
    let mut cmd = bin();
    cmd.env("TRIC_ROOT", root)
        .env_remove("TRIC_CURRENT_PROJECT")
        .env_remove("TRIC_PLUGINS_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .current_dir(root);
    cmd
}

/// Puts a fake `docker-compose` first on `PATH`. It logs `<target>|<args>` per call,
/// prints `FAKE_COMPOSE_STDOUT` and exits with `FAKE_COMPOSE_STATUS`.
#[cfg(unix)]
fn with_fake_compose(cmd: &mut Command, root: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin_dir = root.join("fake-bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let script = bin_dir.join("docker-compose");
    fs::write(
        &script,
        "#!/bin/sh\necho \"$TRIC_CURRENT_PROJECT|$*\" >> \"$FAKE_COMPOSE_LOG\"\nprintf '%s' \"${FAKE_COMPOSE_STDOUT:-}\"\nexit \"${FAKE_COMPOSE_STATUS:-0}\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let log = root.join("compose.log");
    let path = std::env::var("PATH").unwrap_or_default();
    cmd.env("PATH", format!("{}:{}", bin_dir.display(), path))
        .env("FAKE_COMPOSE_LOG", &log);
    log
}

fn run_file(root: &Path) -> String {
    fs::read_to_string(root.join(".env.tric.run")).unwrap_or_default()
}

#[test]
fn help_is_shown_without_arguments_or_root() {
    bin()
        .env_remove("TRIC_ROOT")
        .assert()
        .success()
        .stdout(contains("use"))
        .stdout(contains("xdebug"));
}

#[test]
fn use_sets_a_valid_target() {
    let root = tric_root(&["pluginA", "pluginB"]);

    tric(root.path())
        .args(["use", "pluginB"])
        .assert()
        .success()
        .stdout(contains("Using pluginB"));

    assert_eq!(run_file(root.path()), "TRIC_CURRENT_PROJECT=pluginB\n");

    tric(root.path())
        .arg("using")
        .assert()
        .success()
        .stdout(contains("Using pluginB"));
}

#[test]
fn use_rejects_an_unknown_target_and_lists_the_valid_ones() {
    let root = tric_root(&["pluginA", "pluginB"]);

    tric(root.path())
        .args(["use", "pluginC"])
        .assert()
        .code(1)
        .stderr(contains("'pluginC' is not a valid target"))
        .stderr(contains("  - pluginA\n  - pluginB"));

    assert!(!root.path().join(".env.tric.run").exists());
}

#[test]
fn npm_without_a_target_is_a_usage_error() {
    let root = tric_root(&["pluginA"]);

    tric(root.path())
        .args(["npm", "install"])
        .assert()
        .code(1)
        .stderr(contains("Use target not set"));
}

#[test]
fn unknown_commands_fail() {
    let root = tric_root(&[]);

    tric(root.path())
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(contains("Unknown command 'deploy'"));
}

#[test]
fn info_lists_files_and_values() {
    let root = tric_root(&["pluginA"]);
    fs::write(root.path().join(".env.tric.run"), "TRIC_CURRENT_PROJECT=pluginA\n").unwrap();

    tric(root.path())
        .arg("config")
        .assert()
        .success()
        .stdout(contains(".env.tric.run"))
        .stdout(contains("TRIC_CURRENT_PROJECT: pluginA"))
        .stdout(contains("XDK: tric"));
}

#[cfg(unix)]
#[test]
fn npm_exit_status_is_propagated() {
    let root = tric_root(&["pluginA"]);
    fs::write(root.path().join(".env.tric.run"), "TRIC_CURRENT_PROJECT=pluginA\n").unwrap();
    fs::create_dir_all(root.path().join("dev/_plugins/pluginA/common")).unwrap();

    let mut cmd = tric(root.path());
    let log = with_fake_compose(&mut cmd, root.path());
    cmd.args(["npm", "run", "--silent", "build"])
        .env("FAKE_COMPOSE_STATUS", "3")
        .assert()
        .code(3)
        .stdout(contains("Using pluginA"));

    let calls = fs::read_to_string(log).unwrap();
    assert_eq!(calls.lines().count(), 1, "a failing run never reaches common");
    assert!(calls.starts_with("pluginA|-f "));
    assert!(calls.trim_end().ends_with("tric-stack.yml run --rm npm run --silent build"));
}

#[cfg(unix)]
#[test]
fn npm_repeats_on_common_and_restores_the_target() {
    let root = tric_root(&["pluginA"]);
    fs::write(root.path().join(".env.tric.run"), "TRIC_CURRENT_PROJECT=pluginA\n").unwrap();
    fs::create_dir_all(root.path().join("dev/_plugins/pluginA/common")).unwrap();

    // No terminal: the confirmation takes its default, which is yes.
    let mut cmd = tric(root.path());
    let log = with_fake_compose(&mut cmd, root.path());
    cmd.args(["npm", "install"])
        .assert()
        .success()
        .stdout(contains("Temporarily using pluginA/common"))
        .stdout(contains("Using pluginA once again"));

    let calls = fs::read_to_string(log).unwrap();
    let targets: Vec<&str> = calls.lines().filter_map(|l| l.split('|').next()).collect();
    assert_eq!(targets, vec!["pluginA", "pluginA/common"]);
    assert_eq!(run_file(root.path()), "TRIC_CURRENT_PROJECT=pluginA\n");
}

#[cfg(unix)]
#[test]
fn down_tears_the_stack_down() {
    let root = tric_root(&[]);

    let mut cmd = tric(root.path());
    let log = with_fake_compose(&mut cmd, root.path());
    cmd.arg("stop").assert().success();

    let calls = fs::read_to_string(log).unwrap();
    assert!(calls.trim_end().ends_with("down --volumes --remove-orphans"));
}

#[test]
fn xdebug_status_shows_settings_and_path_mappings() {
    let root = tric_root(&[]);
    fs::write(root.path().join(".env.tric.run"), "XDE=true\nXDH=host.docker.internal\nXDP=9001\n").unwrap();

    tric(root.path())
        .args(["xdebug", "status"])
        .assert()
        .success()
        .stdout(contains("XDebug status is: on"))
        .stdout(contains("host.docker.internal"))
        .stdout(contains("9001"))
        .stdout(contains("Codeception IDE Key: tric_cc"))
        .stdout(contains("dev/_plugins => /plugins"))
        .stdout(contains("dev/_wordpress => /var/www/html"));

    assert_eq!(
        run_file(root.path()),
        "XDE=true\nXDH=host.docker.internal\nXDP=9001\n",
        "status never writes"
    );
}

#[cfg(unix)]
#[test]
fn restart_of_a_running_service_restarts_only_that_service() {
    let root = tric_root(&[]);

    let mut cmd = tric(root.path());
    let log = with_fake_compose(&mut cmd, root.path());
    cmd.args(["restart", "codeception"])
        .env("FAKE_COMPOSE_STDOUT", "abc123")
        .assert()
        .success()
        .stdout(contains("codeception service restarted."));

    let calls = fs::read_to_string(log).unwrap();
    let calls: Vec<&str> = calls.lines().collect();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].ends_with("ps -q codeception"));
    assert!(calls[1].ends_with("restart codeception"));
}

#[cfg(unix)]
#[test]
fn restart_of_a_stopped_service_leaves_it_alone() {
    let root = tric_root(&[]);

    let mut cmd = tric(root.path());
    let log = with_fake_compose(&mut cmd, root.path());
    cmd.args(["restart", "codeception"])
        .assert()
        .success()
        .stdout(contains("codeception service was not running."));

    let calls = fs::read_to_string(log).unwrap();
    assert_eq!(calls.lines().count(), 1);
    assert!(calls.trim_end().ends_with("ps -q codeception"));
}

#[cfg(unix)]
#[test]
fn non_utf8_environment_values_are_tolerated() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let root = tric_root(&["pluginA"]);
    fs::write(root.path().join(".env.tric.run"), "TRIC_CURRENT_PROJECT=pluginA\n").unwrap();

    tric(root.path())
        .arg("using")
        .env("LATIN1", OsString::from_vec(b"caf\xe9".to_vec()))
        .assert()
        .success()
        .stdout(contains("Using pluginA"));
}
