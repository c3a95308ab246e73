//! Smoke tests for the dataq binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::cargo_bin("dataq").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--acquire-timeout"))
        .stdout(predicate::str::contains("--env-file"));
}

#[test]
fn test_unreachable_database_exits_before_listening() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("dataq").unwrap();
    cmd.current_dir(dir.path())
        .env("DB_IP", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("DB_USER", "reader")
        .env("DB_PASSWORD", "pw")
        .env("DB_NAME", "bench")
        .env_remove("DB_SSLMODE")
        .env_remove("RUST_LOG")
        .args(["--port", "0", "--connect-timeout", "1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open database pool"))
        .stdout(predicate::str::contains("Server listening").not());
}

#[test]
fn test_invalid_port_in_environment_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("dataq").unwrap();
    cmd.current_dir(dir.path())
        .env("DB_IP", "127.0.0.1")
        .env("DB_PORT", "")
        .env_remove("RUST_LOG")
        .args(["--port", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid connection descriptor"));
}

#[test]
fn test_env_file_values_are_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("custom.env"),
        "DB_IP=127.0.0.1\nDB_PORT=not-a-port\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("dataq").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DB_IP")
        .env_remove("DB_PORT")
        .env_remove("RUST_LOG")
        .args(["--port", "0", "--env-file", "custom.env"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not-a-port"));
}

// Requires a reachable database configured through DB_IP, DB_PORT, DB_USER,
// DB_PASSWORD and DB_NAME.
// Run with: cargo test -p dataq-cli -- --ignored

#[test]
#[ignore = "requires database"]
fn test_port_in_use_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let occupied = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = occupied.local_addr().unwrap().port().to_string();

    let mut cmd = Command::cargo_bin("dataq").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["--bind", "0.0.0.0", "--port", port.as_str(), "--connect-timeout", "5"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Database connected successfully"))
        .stderr(predicate::str::contains("failed to bind"));
}
