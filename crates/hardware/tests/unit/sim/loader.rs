//! Access-trace parsing tests.

use std::io::Write;

use dramsim::mem::request::AccessKind;
use dramsim::sim::loader::{TraceError, load_trace};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn parses_reads_and_writes() {
    let file = trace_file("R 0x240\nW 1f\nr 0X10\nw 0\n");
    let accesses = load_trace(file.path()).unwrap();

    assert_eq!(accesses.len(), 4);
    assert_eq!(accesses[0].kind, AccessKind::Read);
    assert_eq!(accesses[0].addr, 0x240);
    assert_eq!(accesses[1].kind, AccessKind::Write);
    assert_eq!(accesses[1].addr, 0x1f);
    assert_eq!(accesses[2].addr, 0x10);
    assert_eq!(accesses[3].addr, 0);
}

#[test]
fn skips_blank_lines_and_comments() {
    let file = trace_file("# warmup\n\nR 4\n   \n# done\nW 8\n");
    let accesses = load_trace(file.path()).unwrap();
    assert_eq!(accesses.len(), 2);
}

#[test]
fn rejects_malformed_lines_with_their_position() {
    let file = trace_file("R 4\nX 8\n");
    let error = load_trace(file.path()).unwrap_err();
    match error {
        TraceError::Malformed { line, content, .. } => {
            assert_eq!(line, 2);
            assert_eq!(content, "X 8");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn rejects_trailing_tokens_and_bad_digits() {
    let file = trace_file("R 4 extra\n");
    assert!(matches!(
        load_trace(file.path()),
        Err(TraceError::Malformed { line: 1, .. })
    ));

    let file = trace_file("W zz\n");
    assert!(matches!(
        load_trace(file.path()),
        Err(TraceError::Malformed { line: 1, .. })
    ));
}

#[test]
fn missing_file_reports_an_io_error() {
    let error = load_trace("/no/such/trace.txt").unwrap_err();
    assert!(matches!(error, TraceError::Io { .. }));
}
