use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "warnet-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

const SMALL: [&str; 8] = [
    "--nodes",
    "20",
    "--edges",
    "60",
    "--workers-per-node",
    "10",
    "--turns",
    "8",
];

#[test]
fn cli_writes_csv_rows_for_both_doctrines() {
    let exe = env!("CARGO_BIN_EXE_warnet-runner");
    let output_path = temp_path("csv");
    let status = Command::new(exe)
        .args(SMALL)
        .args(["--doctrine", "both", "--seeds", "1,0x2", "--report", "csv", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("seed,doctrine,turn,network_output"));
    let rows: Vec<&str> = lines.collect();
    for prefix in ["1,precision,0,", "1,area,0,", "2,precision,0,", "2,area,0,"] {
        assert!(rows.iter().any(|row| row.starts_with(prefix)), "missing {prefix}");
    }
}

#[test]
fn cli_json_report_parses() {
    let exe = env!("CARGO_BIN_EXE_warnet-runner");
    let output = Command::new(exe)
        .args(SMALL)
        .args(["--doctrine", "area", "--seeds", "5", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(value[0]["seed"], 5);
    assert_eq!(value[0]["runs"].as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["runs"][0]["strategy"], "area");
}

#[test]
fn cli_config_file_is_overridden_by_flags() {
    let exe = env!("CARGO_BIN_EXE_warnet-runner");
    let config_path = temp_path("config");
    std::fs::write(
        &config_path,
        r#"{"num_nodes": 3, "num_edges": 2, "max_turns": 2, "seed": 9}"#,
    )
    .expect("write config");
    let output = Command::new(exe)
        .arg("--config")
        .arg(&config_path)
        .args(["--nodes", "12", "--edges", "30", "--doctrine", "precision"])
        .args(["--report", "markdown"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Warfare Network Doctrine Results"));
    assert!(stdout.contains("| 9 | precision |"));
}

#[test]
fn cli_rejects_invalid_configuration() {
    let exe = env!("CARGO_BIN_EXE_warnet-runner");
    let output = Command::new(exe)
        .args(["--nodes", "3", "--edges", "50", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid simulation configuration"));
}

#[test]
fn cli_rejects_malformed_seeds() {
    let exe = env!("CARGO_BIN_EXE_warnet-runner");
    let output = Command::new(exe)
        .args(SMALL)
        .args(["--seeds", "banana"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid seed"));
}
