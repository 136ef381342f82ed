use std::{fs, path::PathBuf, process::Command};

fn troposphere() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_troposphere"));
    let _ = command.env("RUST_LOG", "warn");
    command
}

fn write_script(name: &str, contents: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, contents).expect("script written");
    path
}

#[test]
fn scripted_run_prints_a_summary() {
    let script = write_script("walk.script", "60 right\n10 right jump\n30 idle\n");
    let output = troposphere()
        .args(["run", "--level", "1", "--seed", "5", "--script"])
        .arg(&script)
        .output()
        .expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("level      1"));
    assert!(stdout.contains("ticks      100"));
    assert!(stdout.contains("level_started"));
}

#[test]
fn identical_runs_print_identical_output() {
    let script = write_script("replay.script", "40 right\n20 rewind\n15 left jump\n");
    let run = || {
        troposphere()
            .args(["run", "--level", "2", "--seed", "9", "--export-layout", "--script"])
            .arg(&script)
            .output()
            .expect("binary runs")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn exported_layout_can_be_inspected() {
    let output = troposphere()
        .args(["run", "--level", "1", "--export-layout"])
        .output()
        .expect("binary runs");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let layout = stdout
        .lines()
        .find(|line| line.starts_with("tropo:v1:"))
        .expect("layout line printed")
        .to_owned();

    let inspected = troposphere()
        .args(["inspect", &layout])
        .output()
        .expect("binary runs");
    assert!(inspected.status.success());
    let text = String::from_utf8_lossy(&inspected.stdout);
    assert!(text.contains("size       2000x1500"));
}

#[test]
fn malformed_script_fails_with_context() {
    let script = write_script("broken.script", "10 right\nfive left\n");
    let output = troposphere()
        .args(["run", "--script"])
        .arg(&script)
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load input script"));
    assert!(stderr.contains("line 2"));
}
