use predicates::prelude::*;

#[test]
fn dimensions_lists_every_sheet_in_crawl_order() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rankbook");
    let assert = cmd.args(["dimensions"]).assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 18);
    assert_eq!(lines[0], "人氣榜-愛情文藝-週榜");
    assert_eq!(lines[17], "珍珠榜-百合-月榜");
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rankbook");
    cmd.env("RUST_LOG", "debug")
        .args(["dimensions"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
}

#[test]
fn unknown_sheet_is_rejected_before_launching_a_browser() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rankbook");
    cmd.args(["crawl", "--only", "不存在的榜"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown ranking sheet"));
}
