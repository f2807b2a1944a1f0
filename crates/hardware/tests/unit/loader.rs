//! Loader tests against real files on disk.

use std::io::Write;

use tomasim_core::SimError;
use tomasim_core::sim::loader;

#[test]
fn test_load_program_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "; counter demo\nstart: ADDI R1, R0, 2\n       BEQ R1, R0, start\n"
    )
    .unwrap();

    let program = loader::load_program(file.path().to_str().unwrap(), 0).unwrap();
    assert_eq!(program.len(), 2);
    assert_eq!(program.origin(), 0);
}

#[test]
fn test_load_program_reports_parse_error_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "ADDI R1, R0, 1\nFROB R2\n").unwrap();

    let err = loader::load_program(file.path().to_str().unwrap(), 0).unwrap_err();
    assert!(matches!(err, SimError::Parse { line: 2, .. }));
}

#[test]
fn test_load_memory_image_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "0 42\n0x10, 0xFF\n; trailing comment\n").unwrap();

    let pairs = loader::load_memory_image(file.path().to_str().unwrap()).unwrap();
    assert_eq!(pairs, vec![(0, 42), (16, 255)]);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = loader::load_program("no/such/file.asm", 0).unwrap_err();
    assert!(matches!(err, SimError::Io { .. }));

    let err = loader::load_memory_image("no/such/image.mem").unwrap_err();
    assert!(matches!(err, SimError::Io { .. }));
}
