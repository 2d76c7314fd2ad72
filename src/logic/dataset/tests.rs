use std::fs;

use tempfile::tempdir;

use super::loader::{load_datasets, load_file, parse_candump_line, parse_csv_line};
use crate::logic::frame::Label;

#[test]
fn test_parse_candump_line() {
    let line = "Timestamp: 1479121434.850202        ID: 0153    000    DLC: 8    00 80 10 ff 00 ff 40 ce";
    let frame = parse_candump_line(line).unwrap();

    assert_eq!(frame.timestamp, 1479121434.850202);
    assert_eq!(frame.can_id, "0153");
    assert_eq!(frame.dlc, 8);
    assert_eq!(frame.payload, "008010ff00ff40ce");
    assert_eq!(frame.label, Label::Normal);
}

#[test]
fn test_parse_csv_line_full_payload() {
    let line = "1478198376.389427,0316,8,05,21,68,09,21,21,00,6f,R";
    let frame = parse_csv_line(line).unwrap();

    assert_eq!(frame.can_id, "0316");
    assert_eq!(frame.dlc, 8);
    assert_eq!(frame.payload, "052168092121006f");
    assert_eq!(frame.label, Label::Normal);
}

#[test]
fn test_parse_csv_line_short_dlc_shifts_label() {
    // DLC 2: the label is the field right after the two data bytes.
    let line = "1478198376.389427,05f0,2,01,00,T";
    let frame = parse_csv_line(line).unwrap();

    assert_eq!(frame.dlc, 2);
    assert_eq!(frame.payload, "0100");
    assert_eq!(frame.label, Label::Attack);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Gear_dataset.csv");
    fs::write(
        &path,
        "1478198376.1,043f,8,01,45,60,ff,6b,02,7f,74,T\n\
         not,a,frame\n\
         1478198376.2,043f,8,01,45,60,ff,6b,02,7f,74,R\n",
    )
    .unwrap();

    let frames = load_file(&path).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].label, Label::Attack);
    assert_eq!(frames[1].label, Label::Normal);
}

#[test]
fn test_truncated_payload_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("DoS_dataset.csv");
    // DLC claims 8 bytes but the row ends early: no label column to read.
    fs::write(&path, "1478198376.1,0000,8,00,00,00\n").unwrap();

    let frames = load_file(&path).unwrap();
    assert!(frames.is_empty());
}

#[test]
fn test_load_datasets_registers_present_files_only() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("normal_run_data.txt"),
        "Timestamp: 1479121434.850202        ID: 0153    000    DLC: 2    00 80\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("DoS_dataset.csv"),
        "1478198376.389427,0316,2,05,21,T\n",
    )
    .unwrap();

    let datasets = load_datasets(dir.path());

    assert_eq!(datasets.len(), 2);
    assert!(datasets.contains_key("normal"));
    assert!(datasets.contains_key("dos"));
    assert!(!datasets.contains_key("fuzzy"));
    assert_eq!(datasets["normal"][0].payload, "0080");
}
