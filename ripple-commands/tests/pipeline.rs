//! Full-pipeline tests: scripts through the evaluator against the default
//! command set, observed on the surface.

use ripple_commands::register_defaults;
use ripple_core::{parse, CommandRegistry, Evaluator, RuntimeError};
use ripple_graphics::{Point, Rgba, Surface};

fn run(source: &str) -> Result<Surface, RuntimeError> {
    let mut registry = CommandRegistry::new();
    register_defaults(&mut registry)?;

    let script = parse(source).expect("source should parse");
    let mut surface = Surface::new();
    Evaluator::new(registry, &mut surface).run(&script)?;
    Ok(surface)
}

#[test]
fn canvas_color_and_lines_accumulate_on_the_surface() {
    let surface = run("
        builtin canvas width: 100, height: 80, background: [255, 255, 255]
        builtin line from: [0, 0], to: [10, 10]
        builtin color [255, 0, 0]
        builtin line from: [10, 10], to: [20, 0]
    ")
    .unwrap();

    assert_eq!(surface.dimensions(), Ok((100.0, 80.0)));
    assert_eq!(surface.background(), Some(Rgba::WHITE));

    let segments = surface.segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].color, Rgba::BLACK);
    assert_eq!(segments[0].to, Point::new(10.0, 10.0));
    assert_eq!(segments[1].color, Rgba::new(255, 0, 0, 255));
}

#[test]
fn loops_draw_computed_geometry() {
    let surface = run("
        builtin canvas width: 64, height: 64
        decl instant step = [8, 0]
        repeat i --> 4 {
            builtin line from: [$i * 8, 0], to: [$i * 8 + $step @ 0, 8]
        }
    ")
    .unwrap();

    let segments = surface.segments();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[3].from, Point::new(24.0, 0.0));
    assert_eq!(segments[3].to, Point::new(32.0, 8.0));
}

#[test]
fn line_before_canvas_is_a_runtime_error() {
    let err = run("builtin line from: [0, 0], to: [1, 1]").unwrap_err();
    let RuntimeError::Command { command, message, line } = err else {
        panic!("expected a command error");
    };
    assert_eq!(command, "line");
    assert_eq!(line, 1);
    assert!(message.contains("not been initialized"), "got: {message}");
}

#[test]
fn color_range_violation_surfaces_with_the_script_line() {
    let err = run("builtin canvas width: 10, height: 10\nbuiltin color [0, 0, 256]").unwrap_err();
    let RuntimeError::Command { line, message, .. } = err else {
        panic!("expected a command error");
    };
    assert_eq!(line, 2);
    assert!(message.contains("256"), "got: {message}");
}

#[test]
fn missing_required_argument_is_caught_before_preflight() {
    let err = run("builtin canvas width: 10").unwrap_err();
    assert!(
        matches!(err, RuntimeError::MissingArgument { ref label, .. } if label == "height"),
        "got {err:?}"
    );
}

#[test]
fn wrong_argument_kind_is_caught_by_validation() {
    let err = run("builtin color \"red\"").unwrap_err();
    assert!(
        matches!(
            err,
            RuntimeError::ArgumentType {
                expected: "an array",
                found: "string literal",
                ..
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn store_writes_an_svg_file() {
    let path = std::env::temp_dir().join(format!(
        "ripple_pipeline_store_{}.svg",
        std::process::id()
    ));
    let path_text = path.to_string_lossy().replace('\\', "/");

    let source = format!(
        "builtin canvas width: 32, height: 32\n\
         builtin line from: [0, 0], to: [31, 31]\n\
         builtin store file: \"{path_text}\""
    );
    run(&source).unwrap();

    let written = std::fs::read_to_string(&path).expect("store should write the file");
    let _ = std::fs::remove_file(&path);
    assert!(written.contains("<svg"), "got: {written}");
    assert!(written.contains("<line"), "got: {written}");
}
