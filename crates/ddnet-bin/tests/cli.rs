//! Runs the ddnet-fifo binary as a child process.

use std::process::Command;

use tempfile::tempdir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ddnet-fifo"))
}

#[test]
fn test_runs_without_fifo_for_max_ticks() {
    let dir = tempdir().unwrap();
    let status = bin()
        .arg("--config")
        .arg(dir.path().join("settings.json"))
        .args(["--tick-rate", "1000", "--max-ticks", "5"])
        .env_remove("DDNET_INPUT_FIFO")
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn test_save_config_writes_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let status = bin()
        .arg("--config")
        .arg(&path)
        .args(["--fifo", "ddnet-input", "--tick-rate", "25", "--save-config"])
        .status()
        .unwrap();
    assert!(status.success());

    let config = ddnet_config::ClientConfig::load_from(&path).unwrap();
    assert_eq!(config.cl_input_fifo, "ddnet-input");
    assert_eq!(config.tick_rate, 25);
}

#[test]
fn test_save_config_leaves_malformed_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let original = r#"{ "cl_input_fifo": "keep-me", oops }"#;
    std::fs::write(&path, original).unwrap();

    let status = bin()
        .arg("--config")
        .arg(&path)
        .args(["--tick-rate", "25", "--save-config"])
        .env_remove("DDNET_INPUT_FIFO")
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_malformed_config_runs_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "not json").unwrap();

    let status = bin()
        .arg("--config")
        .arg(&path)
        .args(["--tick-rate", "1000", "--max-ticks", "2"])
        .env_remove("DDNET_INPUT_FIFO")
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
}

#[cfg(unix)]
#[test]
fn test_quit_command_from_fifo() {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::thread;
    use std::time::{Duration, Instant};

    let dir = tempdir().unwrap();
    let fifo = dir.path().join("client.fifo");
    let mut child = bin()
        .arg("--config")
        .arg(dir.path().join("settings.json"))
        .arg("--fifo")
        .arg(&fifo)
        .args(["--tick-rate", "200", "--max-ticks", "2000"])
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while !fifo.exists() {
        assert!(Instant::now() < deadline, "fifo was not created");
        thread::sleep(Duration::from_millis(10));
    }

    let mut writer = OpenOptions::new().write(true).open(&fifo).unwrap();
    writer.write_all(b"echo bye\nquit\n").unwrap();
    drop(writer);

    let status = child.wait().unwrap();
    assert!(status.success());
    assert!(!fifo.exists());
}
