use std::io::Write;

use stackprof_studio::aggregator::{EdgePolicy, MergeOptions};
use stackprof_studio::commands::{
    execute_merge, execute_report, load_and_merge, render_report, MergeArgs, ReportArgs,
    ReportFormat,
};
use stackprof_studio::parser::load_dump_file;
use tempfile::{tempdir, NamedTempFile};

fn dump_file(name: &str, count: u64) -> NamedTempFile {
    let json = format!(
        r#"{{"version": 1.2, "mode": "cpu", "interval": 1000, "samples": {count},
            "frames": {{
                "7": {{"name": "main", "file": "app.rb", "line": 1, "samples": 0, "total_samples": {count},
                       "edges": {{"8": {count}}}}},
                "8": {{"name": "{name}", "file": "lib.rb", "line": 3, "samples": {count}, "total_samples": {count}}}
            }},
            "raw": [2, 7, 8, {count}]}}"#
    );
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn path_arg(file: &NamedTempFile) -> String {
    file.path().display().to_string()
}

#[test]
fn test_execute_merge_writes_dump() {
    let a = dump_file("work", 3);
    let b = dump_file("idle", 4);
    let dir = tempdir().unwrap();
    let output = dir.path().join("merged.json");

    execute_merge(MergeArgs {
        inputs: vec![path_arg(&a), path_arg(&b)],
        output: output.clone(),
        options: MergeOptions::new(),
        compact: true,
    })
    .unwrap();

    let merged = load_dump_file(&output).unwrap();
    assert_eq!(merged.frames.len(), 3);
    assert_eq!(merged.samples, 7);
    assert_eq!(merged.raw_weight(), 7);
}

#[test]
fn test_merge_skips_unloadable_inputs() {
    let a = dump_file("work", 3);
    let merged = load_and_merge(
        &[path_arg(&a), "/nonexistent/dump.json".to_string()],
        &MergeOptions::new(),
    )
    .unwrap();
    assert_eq!(merged.samples, 3);
}

#[test]
fn test_merge_requires_inputs() {
    let dir = tempdir().unwrap();
    let result = execute_merge(MergeArgs {
        inputs: vec![],
        output: dir.path().join("merged.json"),
        ..Default::default()
    });
    assert!(result.is_err());
}

#[test]
fn test_report_renames_edges_across_dumps() {
    let a = dump_file("work", 3);
    let b = dump_file("idle", 4);
    let options = MergeOptions::new().with_edge_policy(EdgePolicy::Rename);
    let merged = load_and_merge(&[path_arg(&a), path_arg(&b)], &options).unwrap();

    let args = ReportArgs {
        format: ReportFormat::Stackcollapse,
        ..Default::default()
    };
    assert_eq!(render_report(&merged, &args).unwrap(), "main;work 3\nmain;idle 4\n");

    let main = merged.frames.iter().find(|f| f.name == "main").unwrap();
    assert_eq!(main.edges.as_ref().unwrap().len(), 2);
}

#[test]
fn test_execute_report_to_file() {
    let a = dump_file("work", 3);
    let dir = tempdir().unwrap();
    let output = dir.path().join("report/flame.svg");

    execute_report(ReportArgs {
        inputs: vec![path_arg(&a)],
        format: ReportFormat::Svg,
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("<svg"));
}
