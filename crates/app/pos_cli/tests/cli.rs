use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn version_prints_package_version() {
    Command::cargo_bin("pos-cli")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("pos-cli")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create-user"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn create_user_requires_all_fields() {
    Command::cargo_bin("pos-cli")
        .unwrap()
        .args(["create-user", "--username", "kasir1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name"));
}

#[test]
fn create_user_without_database_fails() {
    Command::cargo_bin("pos-cli")
        .unwrap()
        .env_remove("DATABASE_URL")
        .current_dir(std::env::temp_dir())
        .args([
            "create-user",
            "--name",
            "Kasir Satu",
            "--username",
            "kasir1",
            "--email",
            "kasir1@example.com",
            "--role",
            "Admin",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn verbose_flag_is_accepted_anywhere() {
    Command::cargo_bin("pos-cli")
        .unwrap()
        .args(["version", "-vv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
