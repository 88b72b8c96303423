use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new(tag: &str) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path =
            std::env::temp_dir().join(format!("ripple_cli_{tag}_{}_{}", std::process::id(), ts));
        fs::create_dir_all(&path).expect("create temp test dir");
        Self { path }
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_ripple(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ripple"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("run ripple")
}

#[test]
fn eval_prints_to_stdout() {
    let dir = TestDir::new("eval_print");
    let output = run_ripple(&["-e", "builtin print 2 + 40"], &dir.path);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("42"), "expected 42 in stdout, got: {stdout}");
}

#[test]
fn script_file_draws_and_stores_svg() {
    let dir = TestDir::new("file_store");
    let script = dir.path.join("square.rpl");
    fs::write(
        &script,
        "builtin canvas width: 40, height: 40, background: [255, 255, 255]\n\
         builtin color [0, 0, 255]\n\
         repeat i --> 4 {\n\
             builtin line from: [$i * 10, 0], to: [$i * 10, 39]\n\
         }\n\
         builtin store file: \"out.svg\"\n",
    )
    .expect("write script");

    let output = run_ripple(&["square.rpl"], &dir.path);
    assert!(output.status.success(), "process failed: {output:?}");

    let svg_path = dir.path.join("out.svg");
    assert!(svg_path.is_file(), "expected output at {svg_path:?}");
    let svg = fs::read_to_string(svg_path).expect("read svg output");
    assert!(svg.contains("<svg"), "expected svg root element");
    assert_eq!(svg.matches("<line").count(), 4, "expected 4 line elements");
    assert!(svg.contains("rgb(0,0,255)"), "expected the pen color");
}

#[test]
fn parse_failure_reports_with_parser_prefix_and_aborts() {
    let dir = TestDir::new("parse_fail");
    // The print before the error must not run: parsing aborts evaluation.
    let output = run_ripple(&["-e", "builtin print 1 decl x = )"], &dir.path);

    assert!(!output.status.success(), "expected failure: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[Parser]"), "got stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains('1'), "evaluation ran anyway: {stdout}");
}

#[test]
fn runtime_failure_reports_with_runtime_prefix_and_keeps_side_effects() {
    let dir = TestDir::new("runtime_fail");
    let output = run_ripple(
        &["-e", "builtin print \"before\" builtin vanish"],
        &dir.path,
    );

    assert!(!output.status.success(), "expected failure: {output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[Runtime]") && stderr.contains("vanish"),
        "got stderr: {stderr}"
    );
    // The print that ran before the failure is kept.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("before"), "got stdout: {stdout}");
}

#[test]
fn dump_ast_prints_the_tree() {
    let dir = TestDir::new("dump_ast");
    let output = run_ripple(&["--dump-ast", "-e", "decl x = 1 + 2"], &dir.path);

    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Variable operation Declare \"x\""),
        "got stdout: {stdout}"
    );
    assert!(stdout.contains("Binary operation (add)"), "got stdout: {stdout}");
}

#[test]
fn missing_input_is_an_error() {
    let dir = TestDir::new("no_input");
    let output = run_ripple(&[], &dir.path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No input"), "got stderr: {stderr}");
}
