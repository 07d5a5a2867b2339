use std::io::Write;
use std::process::{Command, Stdio};

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "cyberdefense-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_logic_mode_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_cyberdefense-tester");
    let output_path = temp_path("logic");
    let output = Command::new(exe)
        .args([
            "--mode",
            "logic",
            "--policies",
            "all",
            "--seeds",
            "7,8",
            "--iterations",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cyber Defense Automated Tester"));
    let content = std::fs::read_to_string(output_path).expect("read output");
    let runs: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let runs = runs.as_array().expect("array of runs");
    assert_eq!(runs.len(), 8);
    assert!(runs.iter().all(|run| run["passed"] == true));
}

#[test]
fn cli_rejects_unknown_policy() {
    let exe = env!("CARGO_BIN_EXE_cyberdefense-tester");
    let output = Command::new(exe)
        .args(["--policies", "cheater"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown policy"));
}

#[test]
fn cli_play_mode_completes_scripted_match() {
    let exe = env!("CARGO_BIN_EXE_cyberdefense-tester");
    let mut child = Command::new(exe)
        .args([
            "--mode",
            "play",
            "--player",
            "Ada",
            "--seed",
            "99",
            "--api-base",
            "http://127.0.0.1:9",
            "--timeout-secs",
            "1",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    let script = "1\n\n".repeat(10);
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("write script");
    let output = child.wait_with_output().expect("wait cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Match complete"));
    assert!(stdout.contains("Turn 10: Attacker:"));
    assert!(stdout.contains("Ada: Deny"));
    assert!(stdout.contains("result kept locally"));
    assert!(stdout.contains("No matches yet."));
    assert!(!stdout.contains("Automated Tester"));
}

#[test]
fn cli_play_mode_no_submit_skips_scoreboard() {
    let exe = env!("CARGO_BIN_EXE_cyberdefense-tester");
    let mut child = Command::new(exe)
        .args(["--mode", "play", "--player", "Ada", "--seed", "5", "--no-submit"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all("2\n\n".repeat(10).as_bytes())
        .expect("write script");
    let output = child.wait_with_output().expect("wait cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Match complete"));
    assert!(!stdout.contains("Recent Matches"));
}

#[test]
fn cli_play_mode_refuses_blank_player() {
    let exe = env!("CARGO_BIN_EXE_cyberdefense-tester");
    let output = Command::new(exe)
        .args(["--mode", "play", "--player", "   ", "--seed", "1"])
        .stdin(Stdio::null())
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
