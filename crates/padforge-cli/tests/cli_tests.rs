use std::io::Write;
use std::process::Command;

fn performance_fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"tempo":120.0,"events":[{{"pitch":36,"startTime":0.0,"duration":0.25}},{{"pitch":38,"startTime":0.5,"duration":0.25}}]}}"#
    )
    .unwrap();
    file
}

fn padforge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_padforge"))
}

#[test]
fn solve_with_beam_prints_a_summary() {
    let performance = performance_fixture();
    let output = padforge()
        .arg("solve")
        .arg("--performance")
        .arg(performance.path())
        .arg("--solver")
        .arg("beam")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Score"));
}

#[test]
fn solve_writes_result_json_when_out_is_given() {
    let performance = performance_fixture();
    let out = tempfile::NamedTempFile::new().unwrap();
    let status = padforge()
        .arg("solve")
        .arg("--performance")
        .arg(performance.path())
        .arg("--out")
        .arg(out.path())
        .status()
        .unwrap();
    assert!(status.success());

    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.contains("\"score\""));
}

#[test]
fn analyze_reads_a_saved_result_and_prints_moments() {
    let performance = performance_fixture();
    let out = tempfile::NamedTempFile::new().unwrap();
    let status = padforge()
        .arg("solve")
        .arg("--performance")
        .arg(performance.path())
        .arg("--out")
        .arg(out.path())
        .status()
        .unwrap();
    assert!(status.success());

    let status = padforge().arg("analyze").arg("--result").arg(out.path()).status().unwrap();
    assert!(status.success());
}

#[test]
fn grid_prints_the_pitch_to_pad_table() {
    let output = padforge().arg("grid").arg("--from").arg("36").arg("--to").arg("40").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Pitch"));
}

#[test]
fn solve_on_a_missing_performance_file_is_a_clean_failure() {
    let status = padforge().arg("solve").arg("--performance").arg("/no/such/file.json").status().unwrap();
    assert!(!status.success());
}
