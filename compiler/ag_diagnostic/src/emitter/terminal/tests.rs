use super::*;
use crate::ErrorCode;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message("cannot resolve type `Vec3`")
        .with_label("gfx.Shape.move", "referenced here")
        .with_secondary_label("gfx", "searched from here")
        .with_note("paths are resolved from the root")
        .with_suggestion("declare `Vec3` in the document")
}

fn render(mode: ColorMode, emit: impl FnOnce(&mut TerminalEmitter<&mut Vec<u8>>)) -> String {
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false);
        emit(&mut emitter);
        emitter.flush();
    }
    String::from_utf8(output).unwrap()
}

#[test]
fn plain_rendering_lists_labels_then_notes() {
    let text = render(ColorMode::Never, |emitter| emitter.emit(&sample_diagnostic()));

    assert_eq!(
        text,
        "error[E2001]: cannot resolve type `Vec3`\n\
         \x20 at gfx.Shape.move: referenced here\n\
         \x20 in gfx: searched from here\n\
         \x20 note: paths are resolved from the root\n\
         \x20 help: declare `Vec3` in the document\n\n"
    );
}

#[test]
fn colored_rendering_wraps_headline() {
    let text = render(ColorMode::Always, |emitter| emitter.emit(&sample_diagnostic()));
    assert!(text.starts_with("\x1b[1;31merror\x1b[0m\x1b[1m[E2001]\x1b[0m"));
    assert!(text.contains("cannot resolve type `Vec3`"));
}

#[test]
fn auto_mode_follows_tty() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn color_flag_values() {
    assert_eq!(ColorMode::from_flag("always"), Some(ColorMode::Always));
    assert_eq!(ColorMode::from_flag("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::from_flag("auto"), Some(ColorMode::Auto));
    assert_eq!(ColorMode::from_flag("sometimes"), None);
}

#[test]
fn emit_all_renders_each() {
    let diagnostics = vec![
        Diagnostic::error(ErrorCode::E1001).with_message("error 1"),
        Diagnostic::error(ErrorCode::E2001).with_message("error 2"),
    ];
    let text = render(ColorMode::Never, |emitter| emitter.emit_all(&diagnostics));
    assert!(text.contains("error 1"));
    assert!(text.contains("error 2"));
}

#[test]
fn summary_counts() {
    let text = render(ColorMode::Never, |emitter| emitter.emit_summary(2, 1));
    assert_eq!(text, "error: description rejected with 2 errors and 1 warning\n");

    let text = render(ColorMode::Never, |emitter| emitter.emit_summary(0, 3));
    assert_eq!(text, "warning: 3 warnings\n");

    let text = render(ColorMode::Never, |emitter| emitter.emit_summary(1, 0));
    assert_eq!(text, "error: description rejected with 1 error\n");

    let text = render(ColorMode::Never, |emitter| emitter.emit_summary(0, 0));
    assert_eq!(text, "");
}
