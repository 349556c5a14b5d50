use testable_reporter::{ReportError, Reporter, ReporterConfig};

// Single test: the global reporter lives for the whole test binary.
#[test]
fn global_reporter_is_installed_once() {
    assert!(Reporter::global().is_none());

    let tmp = tempfile::tempdir().unwrap();
    let first = Reporter::install(ReporterConfig {
        result_file: Some(tmp.path().join("results.jsonl")),
        ..ReporterConfig::default()
    })
    .unwrap();

    let second = Reporter::install(ReporterConfig::default());
    assert!(matches!(second, Err(ReportError::AlreadyInstalled)));

    let global = Reporter::global().unwrap();
    assert!(std::ptr::eq(first, global));
    assert_eq!(
        global.config().result_file,
        Some(tmp.path().join("results.jsonl"))
    );
}
