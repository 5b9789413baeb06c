use promptdupe::duplicates::{
    CountingYielder, DuplicateScanner, NoopYielder, ScanError, ScanOptions, SleepYielder,
};
use promptdupe::entry::Entry;
use promptdupe::progress::ProgressCallback;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingProgress {
    calls: Mutex<Vec<(u8, u64, u64)>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, percent: u8, current: u64, total: u64) {
        self.calls.lock().unwrap().push((percent, current, total));
    }
}

fn options() -> ScanOptions {
    ScanOptions::default().with_yielder(Arc::new(NoopYielder))
}

fn padded(id: &str, len: usize) -> Entry {
    let base = "Hello world";
    Entry::new(id, "Greeting", format!("{}{}", base, " ".repeat(len - base.len())))
}

#[test]
fn test_exact_duplicate_scenario() {
    let entries = vec![
        Entry::new("1", "A", "Hello world"),
        Entry::new("2", "A", "Hello world"),
    ];

    let groups = DuplicateScanner::new(options()).scan(&entries).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].original.id, "1");
    assert_eq!(groups[0].duplicates, vec![Entry::new("2", "A", "Hello world")]);
}

#[test]
fn test_transitive_group_scenario() {
    let entries: Vec<Entry> = ["1", "2", "3"]
        .iter()
        .map(|id| Entry::new(*id, "Summarize", "Summarize the following article"))
        .collect();

    let groups = DuplicateScanner::new(options()).scan(&entries).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].original.id, "1");
    assert_eq!(groups[0].ids(), vec!["1", "2", "3"]);
}

#[test]
fn test_distant_buckets_never_compared() {
    // Trimmed contents are identical, but buckets 0 and 2 are not adjacent
    let entries = vec![padded("1", 50), padded("2", 250)];

    let (groups, summary) = DuplicateScanner::new(options())
        .scan_with_summary(&entries)
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_comparisons, 1);
    assert_eq!(summary.performed_comparisons, 0);
    assert_eq!(summary.bucket_count, 2);
}

#[test]
fn test_adjacent_buckets_compared() {
    let entries = vec![
        Entry::new("1", "Long", "x".repeat(99)),
        Entry::new("2", "Long", "x".repeat(100)),
    ];

    let (groups, summary) = DuplicateScanner::new(options())
        .scan_with_summary(&entries)
        .unwrap();

    assert_eq!(summary.performed_comparisons, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].ids(), vec!["1", "2"]);
    assert_eq!(summary.fuzzy_matches, 1);
}

#[test]
fn test_size_guard_scenario() {
    let entries: Vec<Entry> = (0..15)
        .map(|i| Entry::new(i.to_string(), format!("title {}", i), format!("unique {}", i)))
        .collect();

    let result = DuplicateScanner::new(options().with_max_items(10)).scan(&entries);

    assert_eq!(
        result,
        Err(ScanError::SizeLimitExceeded {
            count: 15,
            max_items: 10,
            estimated_comparisons: 105,
        })
    );
}

#[test]
fn test_size_guard_allows_exact_limit() {
    let entries: Vec<Entry> = (0..10)
        .map(|i| Entry::new(i.to_string(), "t", "x".repeat(i * 20 + 1)))
        .collect();
    assert!(DuplicateScanner::new(options().with_max_items(10))
        .scan(&entries)
        .is_ok());
}

#[test]
fn test_comparison_accounting_without_groups() {
    let progress = Arc::new(RecordingProgress::default());
    // All in bucket 0, pairwise too different in length to match
    let entries: Vec<Entry> = (0..6)
        .map(|i| Entry::new(i.to_string(), format!("t{}", i), "y".repeat(1 << i)))
        .collect();

    let groups = DuplicateScanner::new(options().with_progress_callback(progress.clone()))
        .scan(&entries)
        .unwrap();

    assert!(groups.is_empty());
    let calls = progress.calls.lock().unwrap();
    assert_eq!(calls.len(), 16);
    assert!(calls.iter().all(|&(_, _, total)| total == 15));
    assert_eq!(calls[14], (100, 15, 15));
    assert_eq!(*calls.last().unwrap(), (100, 15, 15));
}

#[test]
fn test_progress_is_monotonic() {
    let progress = Arc::new(RecordingProgress::default());
    let entries: Vec<Entry> = (0..8)
        .map(|i| Entry::new(i.to_string(), "same", format!("Prompt number {}", i % 3)))
        .collect();

    DuplicateScanner::new(options().with_progress_callback(progress.clone()))
        .scan(&entries)
        .unwrap();

    let calls = progress.calls.lock().unwrap();
    for pair in calls.windows(2) {
        assert!(pair[0].1 <= pair[1].1);
        assert!(pair[0].0 <= pair[1].0);
    }
    assert_eq!(*calls.last().unwrap(), (100, 28, 28));
}

#[test]
fn test_timeout_returns_no_groups() {
    let entries: Vec<Entry> = (0..20)
        .map(|i| Entry::new(i.to_string(), "same", "same content"))
        .collect();

    let result = DuplicateScanner::new(
        ScanOptions::default()
            .with_timeout_ms(1)
            .with_yield_interval_ms(0)
            .with_yielder(Arc::new(SleepYielder::new(Duration::from_millis(3)))),
    )
    .scan(&entries);

    match result {
        Err(ScanError::Timeout {
            total_comparisons,
            processed_comparisons,
            ..
        }) => {
            assert_eq!(total_comparisons, 190);
            assert!(processed_comparisons < total_comparisons);
        }
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[test]
fn test_cancellation_mid_scan() {
    struct CancelAfter {
        flag: Arc<AtomicBool>,
        after: u64,
    }

    impl ProgressCallback for CancelAfter {
        fn on_progress(&self, _percent: u8, current: u64, _total: u64) {
            if current >= self.after {
                self.flag.store(true, Ordering::SeqCst);
            }
        }
    }

    let flag = Arc::new(AtomicBool::new(false));
    let entries: Vec<Entry> = (0..10)
        .map(|i| Entry::new(i.to_string(), format!("t{}", i), "z".repeat(i * 7 + 1)))
        .collect();

    let result = DuplicateScanner::new(
        options()
            .with_shutdown_flag(flag.clone())
            .with_progress_callback(Arc::new(CancelAfter {
                flag: flag.clone(),
                after: 3,
            })),
    )
    .scan(&entries);

    assert_eq!(
        result,
        Err(ScanError::Cancelled {
            processed_comparisons: 3,
            total_comparisons: 45,
        })
    );
}

#[test]
fn test_yields_counted() {
    let yielder = Arc::new(CountingYielder::new(NoopYielder));
    let entries: Vec<Entry> = (0..4)
        .map(|i| Entry::new(i.to_string(), format!("t{}", i), "w".repeat(i * 9 + 1)))
        .collect();

    let (_, summary) = DuplicateScanner::new(
        ScanOptions::default()
            .with_yield_interval_ms(0)
            .with_yielder(yielder.clone()),
    )
    .scan_with_summary(&entries)
    .unwrap();

    assert_eq!(yielder.count(), 6);
    assert_eq!(summary.yields, 6);
}

#[test]
fn test_unicode_lengths_counted_in_chars() {
    // 60 chars but 180 bytes: stays in bucket 0 next to a 60-char ASCII entry
    let entries = vec![
        Entry::new("1", "Emoji", "日".repeat(60)),
        Entry::new("2", "Emoji", "日".repeat(60)),
        Entry::new("3", "Ascii", "a".repeat(60)),
    ];

    let (groups, summary) = DuplicateScanner::new(options())
        .scan_with_summary(&entries)
        .unwrap();

    assert_eq!(summary.bucket_count, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].ids(), vec!["1", "2"]);
}

#[test]
fn test_thresholds_are_strict() {
    let entries = vec![
        Entry::new("1", "abcd", "same body text"),
        Entry::new("2", "abcd", "same body text!"),
    ];

    // Equal titles score exactly 1.0, which never exceeds a cutoff of 1.0
    let strict = DuplicateScanner::new(options().with_title_threshold(1.0));
    assert!(strict.scan(&entries).unwrap().is_empty());

    let relaxed = DuplicateScanner::new(options().with_content_threshold(0.5));
    assert_eq!(relaxed.scan(&entries).unwrap().len(), 1);
}
