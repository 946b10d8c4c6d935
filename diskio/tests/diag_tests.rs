//! Process-wide logger installation and the fatal tier

use diskio::diag::{self, OrFatal, Verbosity};
use std::process::Command;

/// Set in the re-executed test binary to pick which fatal path to take
const FATAL_MODE_VAR: &str = "DISKIO_FATAL_MODE";

/// Runs only inside the child started by `test_fatal_exits_with_status_1`
#[test]
fn fatal_child() {
    match std::env::var(FATAL_MODE_VAR).as_deref() {
        Ok("macro") => {
            diag::set_verbosity(Verbosity::empty());
            diskio::fatal!("image {} vanished", "GAME.DIM");
        }
        Ok("or_fatal") => {
            let failed: Result<(), &str> = Err("boom");
            failed.or_fatal("mount");
        }
        _ => {}
    }
}

fn run_fatal_child(mode: &str) -> (Option<i32>, String) {
    let exe = std::env::current_exe().unwrap();
    let output = Command::new(exe)
        .args(["--exact", "fatal_child", "--nocapture", "--test-threads=1"])
        .env(FATAL_MODE_VAR, mode)
        .output()
        .unwrap();
    (
        output.status.code(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_fatal_exits_with_status_1() {
    let (code, stderr) = run_fatal_child("macro");
    assert_eq!(code, Some(1));
    let line = stderr
        .lines()
        .find(|l| l.starts_with("[FATAL] ("))
        .expect("no fatal line on stderr");
    assert!(line.contains("diag_tests.rs:"));
    assert!(line.ends_with(") image GAME.DIM vanished"));
}

#[test]
fn test_or_fatal_exits_with_status_1() {
    let (code, stderr) = run_fatal_child("or_fatal");
    assert_eq!(code, Some(1));
    assert!(stderr
        .lines()
        .any(|l| l.starts_with("[FATAL] (") && l.ends_with(") mount failed: boom")));
}

#[test]
fn test_init_installs_masked_logger() {
    diag::init(Verbosity::ERROR).unwrap();
    assert_eq!(diag::verbosity(), Verbosity::ERROR);
    assert!(log::log_enabled!(log::Level::Error));
    assert!(!log::log_enabled!(log::Level::Info));
    assert!(!log::log_enabled!(log::Level::Debug));

    diag::set_verbosity(Verbosity::ERROR | Verbosity::INFO);
    assert!(log::log_enabled!(log::Level::Info));

    // A second logger cannot replace the first
    assert!(diag::init(Verbosity::all()).is_err());
    diag::set_verbosity(Verbosity::ERROR);
}
