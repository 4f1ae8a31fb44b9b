use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCAN_FIXTURE: &str = r#"{
  "meta": {
    "started_at": "2026-01-02T03:00:00Z",
    "finished_at": "2026-01-02T03:10:00Z",
    "source": "wikidata",
    "max_sites": 2,
    "max_workers": 4,
    "timeout_s": 15.0
  },
  "sites": [
    {
      "name": "Exemplo",
      "site_url": "https://example.com/",
      "source": "wikidata",
      "feeds": [
        {"url": "https://example.com/feed", "kind": "rss", "title": "Exemplo", "entries": 10,
         "topics": ["Brasil", "Política"], "error": null},
        {"url": "https://example.com/esportes/feed", "kind": "rss", "entries": 4,
         "topics": ["Esportes", "Brasil"]}
      ],
      "discovered_candidates": ["https://example.com/feed", "https://example.com/esportes/feed"],
      "error": null
    },
    {
      "name": "Outro",
      "site_url": "https://other.example/",
      "source": "wikidata",
      "feeds": [
        {"url": "https://other.example/rss", "kind": "atom", "entries": 3, "topics": ["Política"]}
      ]
    }
  ]
}"#;

fn feedscan_cmd() -> Command {
    let mut cmd = Command::cargo_bin("feedscan").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

fn write_fixture(dir: &TempDir) -> String {
    let path = dir.path().join("feeds.json");
    fs::write(&path, SCAN_FIXTURE).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_scan_help_lists_options() {
    feedscan_cmd()
        .arg("scan")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-workers"))
        .stdout(predicate::str::contains("--max-candidates"))
        .stdout(predicate::str::contains("--out-dir"));
}

#[test]
fn test_report_help_lists_min_count() {
    feedscan_cmd()
        .arg("report")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--min-count"));
}

#[test]
fn test_report_prints_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir);

    let output = feedscan_cmd()
        .arg("report")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_topics"], 2);
    assert_eq!(report["topics"][0]["topic"], "Brasil");
    assert_eq!(report["topics"][0]["feeds"], 2);
    assert_eq!(report["topics"][0]["sites"], 1);
    assert_eq!(report["topics"][1]["topic"], "Política");
    assert_eq!(report["topics"][1]["sites"], 2);
}

#[test]
fn test_report_min_count_one_keeps_everything() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir);

    feedscan_cmd()
        .args(["report", "--input", &input, "--min-count", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Esportes\""))
        .stdout(predicate::str::contains("\"total_topics\": 3"));
}

#[test]
fn test_report_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir);
    let out = dir.path().join("reports").join("topics.json");

    feedscan_cmd()
        .args(["report", "--input", &input, "--out", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved to"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("\"total_topics\": 2"));
}

#[test]
fn test_report_missing_input_fails() {
    feedscan_cmd()
        .args(["report", "--input", "/nonexistent/feeds.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: reading scan file"));
}

mod scan {
    use super::*;

    #[test]
    fn test_file_source_requires_sites_file() {
        feedscan_cmd()
            .args(["scan", "--source", "file"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--source file requires --sites-file"));
    }

    #[test]
    fn test_unknown_source_rejected() {
        feedscan_cmd()
            .args(["scan", "--source", "dmoz"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported source: dmoz"));
    }

    #[test]
    fn test_scan_writes_files_even_when_every_site_fails() {
        let dir = TempDir::new().unwrap();
        let sites = dir.path().join("sites.txt");
        fs::write(&sites, "Quebrado,http://[broken\n").unwrap();
        let out_dir = dir.path().join("out");

        feedscan_cmd()
            .args([
                "scan",
                "--source",
                "file",
                "--sites-file",
                sites.to_str().unwrap(),
                "--out-dir",
                out_dir.to_str().unwrap(),
                "--max-workers",
                "2",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Sites processed: 1 | with feeds: 0 | valid feeds: 0",
            ));

        let scan: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join("feeds.json")).unwrap()).unwrap();
        assert_eq!(scan["meta"]["source"], "file");
        assert_eq!(scan["sites"][0]["name"], "Quebrado");
        assert!(scan["sites"][0]["error"].as_str().is_some_and(|e| !e.is_empty()));
        assert_eq!(scan["sites"][0]["feeds"], serde_json::json!([]));

        let csv = fs::read_to_string(out_dir.join("feeds.csv")).unwrap();
        assert!(csv.starts_with("site_name,site_url,source,site_error"));
        assert_eq!(csv.lines().count(), 2);

        let topics = fs::read_to_string(out_dir.join("topics.json")).unwrap();
        assert!(topics.contains("\"total_topics\": 0"));
    }
}
