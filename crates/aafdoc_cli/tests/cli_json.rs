#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use aafdoc_testkit::fixtures;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn info_json_reports_pattern_and_class_counts() {
	let (_dir, path) = write_fixture("opatom.mxf", &fixtures::opatom_picture());
	let json = run_json(&["info", &display(&path), "--json"]);

	assert_eq!(json["operational_pattern"], "OPAtom");
	assert_eq!(json["partition"]["kind"], "header");
	assert_eq!(json["primer_entries"], 3);
	assert_eq!(json["objects"], 13);
	assert_eq!(json["unknown_sets"], 1);

	let classes = json["classes"].as_array().expect("classes array");
	let tracks = classes.iter().find(|item| item["class"] == "Track").expect("track count");
	assert_eq!(tracks["count"], 3);
}

#[test]
fn objects_json_filters_by_class() {
	let (_dir, path) = write_fixture("opatom.mxf", &fixtures::opatom_picture());
	let json = run_json(&["objects", &display(&path), "--class", "cdcidescriptor", "--json"]);

	assert_eq!(json["count"], 1);
	let cdci = &json["objects"][0];
	assert_eq!(cdci["class"], "CDCIDescriptor");
	assert_eq!(cdci["fields"]["StoredWidth"], 1920);
	assert_eq!(cdci["fields"]["FrameSampleSize"], 458_752);
	assert!(cdci["fields"]["Locator"].is_array(), "locator refs render as ids");
}

#[test]
fn objects_all_keeps_unknown_sets() {
	let (_dir, path) = write_fixture("opatom.mxf", &fixtures::opatom_picture());
	let json = run_json(&["objects", &display(&path), "--all", "--class", "other", "--json"]);

	assert_eq!(json["count"], 1);
	assert!(json["objects"][0]["class"].as_str().is_some_and(|class| class.starts_with("Other(")));
}

#[test]
fn dump_json_follows_strong_refs_from_preface() {
	let (_dir, path) = write_fixture("opatom.mxf", &fixtures::opatom_picture());
	let json = run_json(&["dump", &display(&path), "--json"]);

	let root = &json["root"];
	assert_eq!(root["class"], "Preface");
	let storage = &root["children"][0];
	assert_eq!(storage["field"], "ContentStorage");
	assert_eq!(storage["node"]["class"], "ContentStorage");
	assert_eq!(storage["node"]["children"].as_array().map(Vec::len), Some(2));
}

#[test]
fn dump_json_marks_truncated_nodes_at_depth_limit() {
	let (_dir, path) = write_fixture("opatom.mxf", &fixtures::opatom_picture());
	let json = run_json(&["dump", &display(&path), "--max-depth", "1", "--json"]);

	let storage = &json["root"]["children"][0]["node"];
	assert_eq!(storage["truncated"], true);
	assert!(storage["children"].as_array().is_some_and(Vec::is_empty));
}

#[test]
fn dump_json_reports_dangling_targets_as_null_nodes() {
	let (_dir, path) = write_fixture("dangling.mxf", &fixtures::dangling_second_package());
	let json = run_json(&["dump", &display(&path), "--json"]);

	let source = &json["root"]["children"][0]["node"]["children"][1]["node"];
	assert_eq!(source["class"], "SourcePackage");
	let track = &source["children"][0]["node"];
	assert_eq!(track["children"][0]["field"], "Segment");
	assert!(track["children"][0]["node"].is_null());
}

#[test]
fn link_json_lists_linked_mobs_and_descriptor() {
	let (_dir, path) = write_fixture("opatom.mxf", &fixtures::opatom_picture());
	let json = run_json(&["link", &display(&path), "--json"]);

	assert_eq!(json["clean"], true);
	assert_eq!(json["linked"].as_array().map(Vec::len), Some(2));

	let master = &json["mobs"][0];
	assert_eq!(master["class"], "MasterMob");
	assert_eq!(master["name"], "interview");
	assert_eq!(master["slots"][0]["segment"], "Sequence");
	assert_eq!(master["slots"][1]["segment"], "Timecode");

	let source = &json["mobs"][1];
	assert_eq!(source["class"], "SourceMob");
	assert_eq!(source["descriptor"]["class"], "CDCIDescriptor");
	assert_eq!(source["descriptor"]["properties"]["StoredWidth"], 1920);
}

#[test]
fn link_json_reports_failed_package_and_keeps_sibling() {
	let (_dir, path) = write_fixture("dangling.mxf", &fixtures::dangling_second_package());
	let json = run_json(&["link", &display(&path), "--json"]);

	assert_eq!(json["clean"], false);
	assert_eq!(json["linked"].as_array().map(Vec::len), Some(1));
	let failed = json["failed"].as_array().expect("failed array");
	assert_eq!(failed.len(), 1);
	assert!(failed[0]["error"].as_str().is_some_and(|error| error.contains("Segment")));
}

#[test]
fn link_rejects_non_opatom_files() {
	let (_dir, path) = write_fixture("op1a.mxf", &fixtures::op1a());
	let output = run(&["link", &display(&path)]);

	assert!(!output.status.success(), "OP1a should be rejected");
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error:"), "unexpected stderr: {stderr}");
	assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_exits_with_error() {
	let output = run(&["info", "/nonexistent/aafdoc/missing.mxf"]);
	assert!(!output.status.success());
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_aafdoc")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"command should succeed: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn write_fixture(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join(name);
	std::fs::write(&path, bytes).expect("fixture written");
	(dir, path)
}

fn display(path: &Path) -> String {
	path.display().to_string()
}
