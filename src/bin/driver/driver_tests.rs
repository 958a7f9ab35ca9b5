use super::*;

use std::ffi::OsStr;
use std::path::PathBuf;

fn write_source(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

fn args_for(input: &Path) -> Args {
    Args::try_parse_from([OsStr::new("misc"), input.as_os_str()]).unwrap()
}

#[test]
fn test_failed_compile_writes_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "bad.mis", "func start() { frobnicate(1) }");

    let err = run(&args_for(&input)).unwrap_err();
    assert!(err.to_string().contains("frobnicate"));
    assert!(!dir.path().join("bad.c").exists());
}

#[test]
fn test_successful_compile_writes_c_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "good.mis", "func start() { printInt(1) }");

    run(&args_for(&input)).unwrap();
    let output = fs::read_to_string(dir.path().join("good.c")).unwrap();
    assert!(output.contains("int main() {"));
}

#[test]
fn test_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path(), "hello.mis", "func start() { printNewLine() }");
    let target = dir.path().join("out.c");

    let args = Args::try_parse_from([
        OsStr::new("misc"),
        input.as_os_str(),
        OsStr::new("-o"),
        target.as_os_str(),
    ])
    .unwrap();
    run(&args).unwrap();
    assert!(target.exists());
    assert!(!dir.path().join("hello.c").exists());
}

#[test]
fn test_missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&args_for(&dir.path().join("absent.mis"))).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DriverError>(),
        Some(DriverError::InputFileDoesNotExist(_))
    ));
}
