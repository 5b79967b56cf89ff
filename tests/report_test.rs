//! Integration tests for the page report writer.

use std::fs;

use unwiki::{
    load_page_contents, write_report, Context, Error, PageContent, PageContents, ReportOptions,
    ReportWriter,
};

fn sample_pages() -> PageContents {
    let json = r#"{
        "page-1": {
            "id": "page-1",
            "title": "Introduction to Project",
            "content": "This is the main introduction. ```mermaid\ngraph TD;\nA-->B;\n``` Some more text. <p>HTML paragraph</p> [A link](http://example.com)",
            "importance": "high",
            "relatedPages": ["page-2"],
            "filePaths": ["src/main.py", "README.md"]
        },
        "page-2": {
            "id": "page-2",
            "title": "Advanced Topics",
            "content": "Details about advanced stuff. Source: [docs](http://example.com/docs)",
            "importance": "medium",
            "relatedPages": [],
            "filePaths": ["src/advanced.py"]
        }
    }"#;
    load_page_contents(json, &Context::default()).unwrap()
}

fn heading_lines(report: &str) -> Vec<(String, usize)> {
    let lines: Vec<&str> = report.lines().collect();
    lines
        .windows(2)
        .filter(|pair| pair[0].starts_with("# "))
        .map(|pair| (pair[0][2..].to_string(), pair[1].len()))
        .collect()
}

#[test]
fn test_report_sections_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llms.txt");

    let summary = write_report(&sample_pages(), &path).unwrap();
    assert_eq!(summary.page_count, 2);
    assert_eq!(summary.path, path);

    let report = fs::read_to_string(&path).unwrap();
    assert_eq!(summary.bytes_written, report.len());

    let headings = heading_lines(&report);
    assert_eq!(headings.len(), 2);
    assert_eq!(headings[0].0, "Introduction to Project");
    assert_eq!(headings[1].0, "Advanced Topics");
    for (title, underline) in &headings {
        assert_eq!(*underline, title.chars().count() + 2);
    }
}

#[test]
fn test_report_content_is_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llms.txt");
    write_report(&sample_pages(), &path).unwrap();

    let report = fs::read_to_string(&path).unwrap();
    assert!(report.contains(
        "## Content\nThis is the main introduction. Some more text. HTML paragraph A link\n\n"
    ));
    assert!(report.contains("**Importance:** High\n"));
    assert!(report.contains("**Related Pages:** page-2\n"));
    assert!(report.contains("**Relevant Files:** src/main.py, README.md\n"));
    assert!(report.contains("**Related Pages:** None\n"));
    assert!(!report.contains("```mermaid"));
}

#[test]
fn test_report_missing_lists_write_none() {
    let mut pages = PageContents::new();
    pages.insert("orphan-page".to_string(), PageContent::new("Text"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llms.txt");
    write_report(&pages, &path).unwrap();

    let report = fs::read_to_string(&path).unwrap();
    assert!(report.contains("**Related Pages:** None\n"));
    assert!(report.contains("**Relevant Files:** None\n"));
    assert!(!report.contains("**Related Pages:** \n"));
}

#[test]
fn test_report_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("llms.txt");

    write_report(&sample_pages(), &path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_report_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llms.txt");
    fs::write(&path, "STALE CONTENT THAT IS MUCH LONGER THAN ANYTHING ELSE ".repeat(200)).unwrap();

    let mut pages = PageContents::new();
    pages.insert("p".to_string(), PageContent::new("fresh"));
    write_report(&pages, &path).unwrap();

    let report = fs::read_to_string(&path).unwrap();
    assert!(!report.contains("STALE"));
    assert!(report.starts_with("# P\n---\n"));
}

#[test]
fn test_report_write_error_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();
    let path = blocker.join("llms.txt");

    let err = write_report(&sample_pages(), &path).unwrap_err();
    match err {
        Error::Write { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected write error, got {:?}", other),
    }
}

#[test]
fn test_report_writer_default_destination() {
    let dir = tempfile::tempdir().unwrap();
    let options = ReportOptions::new()
        .with_output_dir(dir.path().join("repo_wiki_generations"))
        .with_filename("wiki.txt")
        .sequential();

    let summary = ReportWriter::new(options)
        .write_default(&sample_pages(), &Context::for_repo("o/r"))
        .unwrap();
    assert_eq!(
        summary.path,
        dir.path().join("repo_wiki_generations").join("wiki.txt")
    );
    assert_eq!(summary.pages_with_defaults, 0);
}

#[test]
fn test_report_counts_defaulted_pages() {
    let json = r#"{"a": {"content": "x", "title": "A", "importance": "low"}, "b": 17}"#;
    let pages = load_page_contents(json, &Context::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let summary = write_report(&pages, dir.path().join("llms.txt")).unwrap();
    assert_eq!(summary.page_count, 2);
    assert_eq!(summary.pages_with_defaults, 1);
}

#[cfg(feature = "async")]
#[test]
fn test_report_write_async() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("async").join("llms.txt");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let summary = runtime
        .block_on(ReportWriter::default().write_async(&sample_pages(), &path, &Context::default()))
        .unwrap();

    assert_eq!(summary.page_count, 2);
    assert_eq!(fs::read_to_string(&path).unwrap().len(), summary.bytes_written);
}

#[cfg(feature = "async")]
#[test]
fn test_report_write_async_truncates_and_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("llms.txt");
    fs::write(&path, "STALE ".repeat(5000)).unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let writer = ReportWriter::default();
    let ctx = Context::default();

    let summary = runtime
        .block_on(writer.write_async(&sample_pages(), &path, &ctx))
        .unwrap();
    let report = fs::read_to_string(&path).unwrap();
    assert!(!report.contains("STALE"));
    assert_eq!(report.len(), summary.bytes_written);
    assert_eq!(report, writer.render(&sample_pages(), &ctx));

    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();
    let bad = blocker.join("llms.txt");
    match runtime.block_on(writer.write_async(&sample_pages(), &bad, &ctx)) {
        Err(Error::Write { path: failed, .. }) => assert_eq!(failed, bad),
        other => panic!("expected write error, got {:?}", other),
    }
}
