// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use std::env;

// Nothing listens on the discard port, so any command that reaches the
// network fails with an HTTP error instead of the error under test.
const OFFLINE: [&str; 4] = ["--url", "http://127.0.0.1:9", "--api-key", "x"];

fn cli() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("rspace-client")?;
    cmd.env_remove("RSPACE_URL").env_remove("RSPACE_API_KEY");
    Ok(cmd)
}

#[test]
fn test_help() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("place-at"))
        .stdout(contains("add-to-list"));
    Ok(())
}

#[test]
fn test_version() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn test_place_rejects_samples() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["place", "IC5", "--fill", "column", "--start", "1,1", "--dims", "3,7"])
        .args(["SS1", "SA3"])
        .assert()
        .failure()
        .stderr(contains("WrongRole"));
    Ok(())
}

#[test]
fn test_place_rejects_start_outside_grid() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["place", "IC5", "--start", "4,1", "--dims", "3,7", "SS1"])
        .assert()
        .failure()
        .stderr(contains("OutOfRange"));
    Ok(())
}

#[test]
fn test_place_at_mismatched_lengths() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["place-at", "IC5", "--at", "1,1", "--at", "1,2", "SS1"])
        .assert()
        .failure()
        .stderr(contains("MismatchedLengths"));
    Ok(())
}

#[test]
fn test_place_rejects_bad_dimensions() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["place", "IC5", "--dims", "0,3", "SS1"])
        .assert()
        .failure()
        .stderr(contains("grid dimensions"));
    Ok(())
}

#[test]
fn test_place_at_repeated_cell() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["place-at", "IC5", "--at", "1,1", "--at", "1,1", "SS1", "SS2"])
        .assert()
        .failure()
        .stderr(contains("InvalidParameters"))
        .stderr(contains("more than once"));
    Ok(())
}

// The settings directory is resolved through XDG_CONFIG_HOME on Linux only.
#[cfg(target_os = "linux")]
#[test]
fn test_url_flag_completes_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let settings = home.path().join("rspace-client");
    std::fs::create_dir_all(&settings)?;
    std::fs::write(settings.join("config.toml"), "api_key = \"from-file\"\nmax_retries = 0\n")?;

    // Gets past configuration and fails on the closed port instead.
    cli()?
        .env("XDG_CONFIG_HOME", home.path())
        .args(["--url", "http://127.0.0.1:9", "status"])
        .assert()
        .failure()
        .stderr(contains("HttpError"))
        .stderr(contains("ConfigError").not());

    // Without the flag the file alone is incomplete.
    cli()?
        .env("XDG_CONFIG_HOME", home.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(contains("ConfigError"));
    Ok(())
}

#[test]
fn test_add_to_list_requires_container() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["add-to-list", "SS4", "SS1"])
        .assert()
        .failure()
        .stderr(contains("WrongRole"));
    Ok(())
}

#[test]
fn test_bad_arguments() -> Result<(), Box<dyn std::error::Error>> {
    cli()?
        .args(OFFLINE)
        .args(["place", "IC5", "--fill", "diagonal", "SS1"])
        .assert()
        .failure()
        .stderr(contains("diagonal"));
    cli()?
        .args(OFFLINE)
        .args(["place-at", "IC5", "--at", "0,1", "SS1"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_live_status() -> Result<(), Box<dyn std::error::Error>> {
    let (Ok(url), Ok(key)) = (env::var("RSPACE_URL"), env::var("RSPACE_API_KEY")) else {
        return Ok(());
    };
    cli()?
        .args(["--url", &url, "--api-key", &key, "status"])
        .assert()
        .success();
    Ok(())
}
