use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;

fn kgsplit_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_kgsplit"))
}

fn write_graph(dir: &Path) -> PathBuf {
    let mut text = String::new();
    for i in 0..60 {
        text.push_str(&format!("e{}\tr{}\te{}\n", i % 17, i % 4, (i * 5 + 3) % 19));
    }
    let path = dir.join("graph.tsv");
    fs::write(&path, text).expect("write graph");
    path
}

fn read_rows(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read partition")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn split_writes_three_partitions_and_a_report() {
    let dir = tempdir().unwrap();
    let input = write_graph(dir.path());
    let out = dir.path().join("out");

    let status = Command::new(kgsplit_bin())
        .args(["split"])
        .arg(&input)
        .args(["--ratios", "0.8,0.1", "--seed", "42", "--out"])
        .arg(&out)
        .status()
        .expect("run kgsplit split");
    assert!(status.success());

    let training = read_rows(&out.join("training.tsv"));
    let testing = read_rows(&out.join("testing.tsv"));
    let validation = read_rows(&out.join("validation.tsv"));
    assert!(!training.is_empty());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("split_report.json")).unwrap()).unwrap();
    assert_eq!(report["seed"], 42);
    assert_eq!(report["cleanup"], "deterministic");
    let actual: Vec<u64> = report["actual_sizes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect();
    assert_eq!(
        actual,
        vec![
            training.len() as u64,
            testing.len() as u64,
            validation.len() as u64
        ]
    );
}

#[test]
fn same_seed_gives_same_files() {
    let dir = tempdir().unwrap();
    let input = write_graph(dir.path());

    let mut outputs = Vec::new();
    for name in ["a", "b"] {
        let out = dir.path().join(name);
        let status = Command::new(kgsplit_bin())
            .arg("split")
            .arg(&input)
            .args(["--ratios", "0.7", "--seed", "7", "--randomized", "--out"])
            .arg(&out)
            .status()
            .expect("run kgsplit split");
        assert!(status.success());
        outputs.push(fs::read_to_string(out.join("training.tsv")).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn oversized_ratios_exit_with_error() {
    let dir = tempdir().unwrap();
    let input = write_graph(dir.path());
    let out = dir.path().join("out");

    let output = Command::new(kgsplit_bin())
        .arg("split")
        .arg(&input)
        .args(["--ratios", "0.6,0.5", "--out"])
        .arg(&out)
        .output()
        .expect("run kgsplit split");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ratios sum to more than 1.0"), "stderr: {stderr}");
    assert!(!out.join("training.tsv").exists());
}

#[test]
fn stats_json_reports_counts() {
    let dir = tempdir().unwrap();
    let input = write_graph(dir.path());

    let output = Command::new(kgsplit_bin())
        .arg("stats")
        .arg(&input)
        .args(["--top", "2", "--json"])
        .output()
        .expect("run kgsplit stats");
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["num_relations"], 4);
    assert_eq!(summary["top_relations"].as_array().unwrap().len(), 2);
}
