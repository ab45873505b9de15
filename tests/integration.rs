use std::path::Path;
use std::process::Command;

fn termloc_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_termloc"));
    cmd.current_dir(Path::new("tests/fixtures/basic"));
    cmd
}

#[test]
fn locates_predicate_scoped_to_subject() {
    let out = termloc_cmd()
        .args([
            "locate",
            "data.ttl",
            "https://schema.org/name",
            "--context",
            "urn:book:1",
        ])
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "locate failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 match(es)"), "stdout: {stdout}");
    assert!(stdout.contains("3:14..3:25"), "stdout: {stdout}");
    assert!(stdout.contains("context anchor at line 3"), "stdout: {stdout}");
}

#[test]
fn quad_snapshot_pins_the_match_count() {
    let out = termloc_cmd()
        .args([
            "locate",
            "data.ttl",
            "https://schema.org/publisher",
            "--context",
            "urn:book:1",
            "--quads",
            "data.quads.json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 match(es)"), "stdout: {stdout}");
    assert!(stdout.contains("4:3..4:19"), "stdout: {stdout}");
}

#[test]
fn stale_snapshot_falls_back_to_text() {
    let out = termloc_cmd()
        .args([
            "locate",
            "data.ttl",
            "https://schema.org/publisher",
            "--context",
            "urn:book:1",
            "--quads",
            "stale.quads.json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("stale"), "stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("4:3..4:19"), "stdout: {stdout}");
}

#[test]
fn shapes_graph_highlights_the_path_value() {
    let out = termloc_cmd()
        .args([
            "locate",
            "shapes.ttl",
            "https://schema.org/name",
            "--context",
            "https://schema.org/BookShape",
            "--model",
            "shapes",
        ])
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "locate failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("7:13..7:24"), "stdout: {stdout}");
    assert!(stdout.contains("context anchor at line 4"), "stdout: {stdout}");
}

#[test]
fn locates_jsonld_key() {
    let out = termloc_cmd()
        .args(["locate", "book.jsonld", "https://schema.org/name"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("4:3..4:16"), "stdout: {stdout}");
}

#[test]
fn missing_term_exits_one() {
    let out = termloc_cmd()
        .args(["locate", "data.ttl", "urn:absent"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("not found"), "stdout: {stdout}");
}

#[test]
fn json_output_is_machine_readable() {
    let out = termloc_cmd()
        .args([
            "locate",
            "data.ttl",
            "https://schema.org/name",
            "--context",
            "urn:book:1",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["outcome"], "matched");
    assert_eq!(v["ranges"][0]["start"]["line"], 2);
    assert_eq!(v["ranges"][0]["start"]["column"], 13);
}

#[test]
fn variants_lists_spellings() {
    let out = termloc_cmd()
        .args(["variants", "https://schema.org/name", "--file", "data.ttl"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("<https://schema.org/name>"), "stdout: {stdout}");
    assert!(stdout.contains("schema:name"), "stdout: {stdout}");
    assert!(stdout.contains("last resort"), "stdout: {stdout}");
}

#[test]
fn context_reports_anchor_and_block() {
    let out = termloc_cmd()
        .args(["context", "data.ttl", "urn:book:2"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("anchor line 6"), "stdout: {stdout}");
}

#[test]
fn scan_reports_graph_files() {
    let out = termloc_cmd().arg("scan").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("data.ttl"), "stdout: {stdout}");
    assert!(stdout.contains("turtle"), "stdout: {stdout}");
    assert!(stdout.contains("json-ld"), "stdout: {stdout}");
    assert!(stdout.contains("graph files"), "stdout: {stdout}");
}

#[test]
fn scan_locates_term_across_files() {
    let out = termloc_cmd()
        .args(["scan", ".", "https://schema.org/name"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("data.ttl  2 match(es)"), "stdout: {stdout}");
    assert!(stdout.contains("shapes.ttl  1 match(es)"), "stdout: {stdout}");
    assert!(stdout.contains("book.jsonld  1 match(es)"), "stdout: {stdout}");
}

#[test]
fn prefix_add_list_remove_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_termloc");

    let add = Command::new(bin)
        .current_dir(dir.path())
        .args(["prefix", "add", "ex", "http://example.org/"])
        .output()
        .unwrap();
    assert!(add.status.success(), "{}", String::from_utf8_lossy(&add.stderr));

    let list = Command::new(bin)
        .current_dir(dir.path())
        .args(["prefix", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&list.stdout);
    assert!(stdout.contains("ex: -> <http://example.org/>"), "stdout: {stdout}");

    let remove = Command::new(bin)
        .current_dir(dir.path())
        .args(["prefix", "remove", "ex"])
        .output()
        .unwrap();
    assert!(remove.status.success());

    let missing = Command::new(bin)
        .current_dir(dir.path())
        .args(["prefix", "remove", "ex"])
        .output()
        .unwrap();
    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("Unknown Prefix"), "stderr: {stderr}");
}
