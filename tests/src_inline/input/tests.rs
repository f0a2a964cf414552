use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;
use super::meta::parse_meta;
use super::reader::delimiter_for;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_spotenrich_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

#[test]
fn test_delimiter_by_extension() {
    assert_eq!(delimiter_for(Path::new("counts.csv")), b',');
    assert_eq!(delimiter_for(Path::new("counts.CSV.gz")), b',');
    assert_eq!(delimiter_for(Path::new("counts.tsv.gz")), b'\t');
    assert_eq!(delimiter_for(Path::new("counts.txt")), b'\t');
}

#[test]
fn test_load_gz_csv() {
    let dir = make_temp_dir();
    let path = dir.join("counts.csv.gz");
    write_gz(&path, ",A,B\ns1,10,1\ns2,9,8\n");

    let table = load_count_table(&path, None).unwrap();
    assert_eq!(table.n_spots(), 2);
    assert_eq!(table.row(0), &[10.0, 1.0]);
}

#[test]
fn test_missing_file() {
    let dir = make_temp_dir();
    let err = load_count_table(&dir.join("absent.tsv"), None).unwrap_err();
    assert!(matches!(err, InputError::Open { .. }));
}

#[test]
fn test_meta_join_supplies_sample_column() {
    let dir = make_temp_dir();
    let table_path = dir.join("counts.tsv");
    let meta_path = dir.join("meta.tsv");
    write_file(&table_path, "spot\tA\tB\ns1\t1\t2\ns2\t3\t1\n");
    write_file(&meta_path, "sample\tbarcode\nx\ts2\ny\ts1\nz\ts2\n");

    let paths = InputPaths {
        table: table_path,
        meta: Some(meta_path),
    };
    let table = load_input(&paths, Some("sample")).unwrap();
    let group = table.group().unwrap();
    assert_eq!(group.values, vec!["y".to_string(), "x".to_string()]);
}

#[test]
fn test_table_sample_column_wins_over_meta() {
    let dir = make_temp_dir();
    let table_path = dir.join("counts.tsv");
    let meta_path = dir.join("meta.tsv");
    write_file(&table_path, "spot\tA\tB\tsample\ns1\t1\t2\tq\n");
    write_file(&meta_path, "barcode\tsample\ns1\tz\n");

    let paths = InputPaths {
        table: table_path,
        meta: Some(meta_path),
    };
    let table = load_input(&paths, Some("sample")).unwrap();
    assert_eq!(table.group().unwrap().values, vec!["q".to_string()]);
}

#[test]
fn test_meta_missing_barcode_is_an_error() {
    let dir = make_temp_dir();
    let table_path = dir.join("counts.tsv");
    let meta_path = dir.join("meta.tsv");
    write_file(&table_path, "spot\tA\tB\ns1\t1\t2\ns2\t3\t1\n");
    write_file(&meta_path, "barcode\tsample\ns1\tx\n");

    let paths = InputPaths {
        table: table_path,
        meta: Some(meta_path),
    };
    let err = load_input(&paths, Some("sample")).unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
}

#[test]
fn test_meta_blank_sample_value_is_an_error() {
    let dir = make_temp_dir();
    let table_path = dir.join("counts.tsv");
    let meta_path = dir.join("meta.tsv");
    write_file(&table_path, "spot\tA\tB\ns1\t1\t2\ns2\t3\t1\n");
    write_file(&meta_path, "barcode\tsample\ns1\tx\ns2\t\n");

    let paths = InputPaths {
        table: table_path,
        meta: Some(meta_path),
    };
    match load_input(&paths, Some("sample")).unwrap_err() {
        InputError::Parse(msg) => assert!(msg.contains("s2"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_meta_quoted_values_with_delimiter() {
    let dir = make_temp_dir();
    let table_path = dir.join("counts.csv");
    let meta_path = dir.join("meta.csv");
    write_file(&table_path, "spot,A,B\ns1,1,2\ns2,3,1\n");
    write_file(&meta_path, "barcode,sample\ns1,\"slide 1, left\"\ns2,slide 2\n");

    let paths = InputPaths {
        table: table_path,
        meta: Some(meta_path),
    };
    let table = load_input(&paths, Some("sample")).unwrap();
    assert_eq!(
        table.group().unwrap().values,
        vec!["slide 1, left".to_string(), "slide 2".to_string()]
    );
}

#[test]
fn test_meta_without_requested_column_leaves_table_ungrouped() {
    let dir = make_temp_dir();
    let table_path = dir.join("counts.tsv");
    let meta_path = dir.join("meta.tsv");
    write_file(&table_path, "spot\tA\tB\ns1\t1\t2\n");
    write_file(&meta_path, "barcode\tslide\ns1\tx\n");

    let paths = InputPaths {
        table: table_path,
        meta: Some(meta_path),
    };
    let table = load_input(&paths, Some("sample")).unwrap();
    assert!(table.group().is_none());
}

#[test]
fn test_parse_meta_defaults_to_first_column() {
    let meta = parse_meta(Cursor::new("id\tsample\nb1\tx\n\nb2\ty\n"), b'\t').unwrap();
    assert_eq!(meta.columns, vec!["sample".to_string()]);
    assert_eq!(meta.rows["b2"], vec!["y".to_string()]);
}
