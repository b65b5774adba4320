use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn dutop_cmd() -> Command {
    Command::cargo_bin("dutop").unwrap()
}

/// Write and sync, so measured sizes are settled before the binary runs
fn write_file(path: &std::path::Path, len: usize) {
    use std::io::Write;
    let mut file = fs::File::create(path).unwrap();
    file.write_all(&vec![0u8; len]).unwrap();
    file.sync_all().unwrap();
}

fn create_sized_tree(temp: &TempDir) {
    let root = temp.path();

    fs::create_dir_all(root.join("big/nested")).unwrap();
    fs::create_dir(root.join("small")).unwrap();

    write_file(&root.join("big/payload.bin"), 300 * 1024);
    write_file(&root.join("big/nested/deep.bin"), 100 * 1024);
    write_file(&root.join("small/tiny.bin"), 4 * 1024);
}

#[test]
fn tree_report_lists_every_directory_largest_first() {
    let temp = TempDir::new().unwrap();
    create_sized_tree(&temp);

    let output = dutop_cmd().arg(temp.path()).output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 4); // root, big, nested, small

    let big_pos = stdout.find("/big\n").unwrap();
    let nested_pos = stdout.find("/big/nested\n").unwrap();
    let small_pos = stdout.find("/small\n").unwrap();

    assert!(big_pos < nested_pos);
    assert!(nested_pos < small_pos);

    // The root is the largest directory, so it leads the report
    let root_line = stdout.lines().next().unwrap();
    assert!(root_line.ends_with(temp.path().canonicalize().unwrap().to_str().unwrap()));
}

#[test]
fn table_mode_has_header_and_respects_n() {
    let temp = TempDir::new().unwrap();
    create_sized_tree(&temp);

    let output = dutop_cmd()
        .arg("--top=2")
        .arg(temp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3); // header + 2 rows
    assert_eq!(lines[0], "SIZE (MB)  DIRECTORY");
    assert!(stdout.contains("/big"));
    assert!(!stdout.contains("/small"));
}

#[test]
fn table_mode_defaults_to_ten_rows() {
    let temp = TempDir::new().unwrap();
    for i in 0..12 {
        let dir = temp.path().join(format!("dir{i:02}"));
        fs::create_dir(&dir).unwrap();
        write_file(&dir.join("data.bin"), 4 * 1024);
    }

    let output = dutop_cmd().arg("-t").arg(temp.path()).output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 11); // header + 10 rows
}

#[test]
fn depth_flag_limits_reported_depth() {
    let temp = TempDir::new().unwrap();
    create_sized_tree(&temp);

    let output = dutop_cmd()
        .args(["-d", "1"])
        .arg(temp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/big\n"));
    assert!(stdout.contains("/small\n"));
    assert!(!stdout.contains("/big/nested"));
}

#[test]
fn hidden_directories_excluded_by_default() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir(root.join(".stash")).unwrap();
    fs::create_dir(root.join("visible")).unwrap();
    write_file(&root.join(".stash/blob.bin"), 8 * 1024);
    write_file(&root.join("visible/data.bin"), 8 * 1024);

    dutop_cmd()
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/visible"))
        .stdout(predicate::str::contains("/.stash").not());

    dutop_cmd()
        .arg("-a")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/.stash"));
}

#[test]
fn min_size_hides_small_directories() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir(root.join("heavy")).unwrap();
    fs::create_dir(root.join("light")).unwrap();
    write_file(&root.join("heavy/blob.bin"), 2 * 1024 * 1024);
    write_file(&root.join("light/tiny.bin"), 4 * 1024);

    dutop_cmd()
        .args(["-m", "1"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/heavy"))
        .stdout(predicate::str::contains("/light").not());
}

#[test]
fn empty_directory_reports_only_root() {
    let temp = TempDir::new().unwrap();

    let output = dutop_cmd().arg(temp.path()).output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("0B"));
}

#[test]
fn nonexistent_root_fails_with_message() {
    let output = dutop_cmd()
        .arg("/nonexistent/path/that/does/not/exist")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn file_root_fails_with_message() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "content").unwrap();

    let output = dutop_cmd().arg(&file).output().unwrap();

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn current_directory_is_the_default_root() {
    let temp = TempDir::new().unwrap();
    create_sized_tree(&temp);

    dutop_cmd()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/big"));
}

#[test]
fn help_output() {
    dutop_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Rank directories by disk usage and print a leaderboard",
        ))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--max-depth"))
        .stdout(predicate::str::contains("--top"))
        .stdout(predicate::str::contains("--min-size"))
        .stdout(predicate::str::contains("--hidden"));
}
