use std::fs;
use std::process::Command;

fn fieldfill() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fieldfill"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn fill_writes_cleaned_staged_and_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input.csv");
    fs::write(
        &input,
        "level,level_name,field_of_study,academic_field\n\
         bachelor,bachelor,BA Economics,Economics\n\
         bachelor,bachelor,Applied Economics,\n\
         bachelor,bachelor,Fine Arts,\n",
    )
    .expect("write input");
    let cleaned = dir.path().join("out").join("cleaned.csv");
    let staged = dir.path().join("stg").join("staged.csv");
    let report = dir.path().join("report.txt");

    let output = fieldfill()
        .arg("fill")
        .arg(&input)
        .args(["--level", "1", "--debug"])
        .arg("--output")
        .arg(&cleaned)
        .arg("--staged")
        .arg(&staged)
        .arg("--report")
        .arg(&report)
        .output()
        .expect("run fieldfill");
    assert!(output.status.success(), "{output:?}");

    let cleaned_text = fs::read_to_string(&cleaned).expect("cleaned written");
    assert!(cleaned_text.contains("Applied Economics,economics"));
    assert!(cleaned_text.contains("Fine Arts,other"));
    assert!(staged.exists());

    let report_text = fs::read_to_string(&report).expect("report written");
    assert!(report_text.contains("Number of records: 3"));
    assert!(report_text.contains("Number of matches using keywords: 1"));
    assert!(report_text.contains("Percentage of filled academic fields: 66.67"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Number of records: 3"));
}

#[test]
fn fill_rejects_unknown_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input.csv");
    fs::write(&input, "field_of_study,academic_field\nx,y\n").expect("write input");

    let output = fieldfill()
        .arg("fill")
        .arg(&input)
        .args(["--level", "4"])
        .output()
        .expect("run fieldfill");
    assert!(!output.status.success());
}

#[test]
fn add_appends_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("cleaned.csv");

    for _ in 0..2 {
        let status = fieldfill()
            .args(["add", "BSc Marine Biology", "Biology", "--level", "Bachelor"])
            .arg("--file")
            .arg(&file)
            .status()
            .expect("run fieldfill");
        assert!(status.success());
    }

    assert_eq!(
        fs::read_to_string(&file).expect("file written"),
        "level,level_name,field_of_study,academic_field\n\
         bachelor,unknown,BSc Marine Biology,biology\n"
    );
}
