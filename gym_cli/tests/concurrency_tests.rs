//! Concurrency tests for gymwiz.
//!
//! Several processes writing preferences at once must keep every write and
//! never leave a truncated or unparseable preference file behind.

use assert_cmd::Command;
use std::thread;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gymwiz"));
    // Keep the user's own config file out of the run
    cmd.arg("--config").arg(missing_config_path());
    cmd
}

fn missing_config_path() -> std::path::PathBuf {
    std::env::temp_dir()
        .join("gymwiz-tests-no-config")
        .join("config.toml")
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_concurrent_override_writes_all_land() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let machines = ["chest_press", "lat_pull", "leg_press", "shoulder_press", "bicep_curl"];
    let handles: Vec<_> = machines
        .iter()
        .enumerate()
        .map(|(i, machine)| {
            let data_dir = data_dir.clone();
            let machine = machine.to_string();
            thread::spawn(move || {
                let seconds = (45 + i * 15).to_string();
                cli()
                    .args(["rest", "set", machine.as_str(), seconds.as_str()])
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let contents =
        std::fs::read_to_string(data_dir.join("preferences.json")).expect("Failed to read prefs");
    let value: serde_json::Value =
        serde_json::from_str(&contents).expect("preferences must stay valid JSON");

    let overrides = value["restTimeOverrides"]
        .as_object()
        .expect("overrides object present");
    assert_eq!(overrides.len(), machines.len(), "lost writes: {:?}", overrides);
    for (i, machine) in machines.iter().enumerate() {
        assert_eq!(overrides[*machine], (45 + i * 15) as u64);
    }
}

#[test]
fn test_concurrent_reads_while_writing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["rest", "set", "leg_press", "150"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let writer = {
        let data_dir = data_dir.clone();
        thread::spawn(move || {
            for seconds in ["60", "75", "90"] {
                cli()
                    .args(["rest", "set", "chest_press", seconds])
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .assert()
                    .success();
            }
        })
    };

    for _ in 0..3 {
        cli()
            .args(["plan", "--age", "30", "--weight", "70", "-m", "leg_press", "--json"])
            .arg("--data-dir")
            .arg(&data_dir)
            .assert()
            .success()
            .stdout(predicates::str::contains("\"rest_time_seconds\": 150"));
    }

    writer.join().expect("writer thread panicked");
}
