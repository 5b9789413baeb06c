use promptdupe::duplicates::{DuplicateScanner, NoopYielder, ScanOptions};
use promptdupe::entry::Entry;
use promptdupe::error::ExitCode;
use promptdupe::output::{CsvOutput, JsonOutput, TextOutput};
use std::sync::Arc;

fn scan_fixture() -> (
    Vec<promptdupe::duplicates::DuplicateGroup>,
    promptdupe::duplicates::ScanSummary,
) {
    let entries = vec![
        Entry::new("a", "Translate", "Translate the text into French"),
        Entry::new("b", "Haiku", "Write a haiku about autumn leaves"),
        Entry::new("c", "Translate", "Translate the text into French "),
        Entry::new("d", "Haiku", "Write a haiku about autumn leafs"),
        Entry::new("e", "Unrelated", "List prime numbers below 100"),
    ];
    DuplicateScanner::new(ScanOptions::default().with_yielder(Arc::new(NoopYielder)))
        .scan_with_summary(&entries)
        .unwrap()
}

#[test]
fn test_json_export_round_trip_fields() {
    let (groups, summary) = scan_fixture();
    let json = JsonOutput::new(&groups, &summary, ExitCode::Success)
        .to_json_pretty()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["groups"].as_array().unwrap().len(), 2);
    assert_eq!(value["groups"][0]["original"]["id"], "a");
    assert_eq!(value["groups"][0]["duplicates"][0]["id"], "c");
    assert_eq!(value["groups"][1]["original"]["id"], "b");
    assert_eq!(value["groups"][1]["duplicates"][0]["id"], "d");
    assert_eq!(value["summary"]["total_entries"], 5);
    assert_eq!(value["summary"]["total_comparisons"], 10);
    assert_eq!(value["summary"]["duplicate_entries"], 2);
    assert_eq!(value["summary"]["exit_code_name"], "PD000");
}

#[test]
fn test_csv_export_rows() {
    let (groups, _) = scan_fixture();
    let csv = CsvOutput::new(&groups).to_string().unwrap();

    let expected = "group_id,role,id,title\n\
                    1,original,a,Translate\n\
                    1,duplicate,c,Translate\n\
                    2,original,b,Haiku\n\
                    2,duplicate,d,Haiku\n";
    assert_eq!(csv, expected);
}

#[test]
fn test_text_export_lists_groups() {
    let (groups, summary) = scan_fixture();
    let text = TextOutput::new(&groups, &summary)
        .with_color(false)
        .to_string()
        .unwrap();

    assert!(text.contains("Group 1 (2 prompts)"));
    assert!(text.contains("Group 2 (2 prompts)"));
    assert!(text.contains("2 duplicate groups, 2 redundant prompts"));
}
