//! Line editor state machine tests

mod common;

use common::{TestOutput, DOWN, LEFT, RIGHT, UP};
use uart_shell::console::editor::{LineEditor, LineOutcome, BACKSPACE, CTRL_C, DELETE};
use uart_shell::console::line_buffer::MAX_LINE_LEN;

const PROMPT: &str = "> ";

fn feed_all(editor: &mut LineEditor, bytes: &[u8], out: &mut TestOutput) {
    for &b in bytes {
        let _ = editor.feed(b, out);
    }
}

#[test]
fn test_editor_submits_help() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"help", &mut out);
    let outcome = editor.feed(b'\n', &mut out);

    assert_eq!(outcome, LineOutcome::Submitted("help"));
    assert_eq!(editor.history().slot(0), Some("help"));
    assert_eq!(editor.line().cursor(), 0);
    assert_eq!(out.as_str(), "help\r\n");
}

#[test]
fn test_editor_backspace_then_type() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"abc", &mut out);
    feed_all(&mut editor, &[BACKSPACE], &mut out);
    feed_all(&mut editor, b"d", &mut out);
    let outcome = editor.feed(b'\n', &mut out);

    assert_eq!(outcome.submitted(), Some("abd"));
    assert_eq!(out.as_str(), "abc\x08 \x08d\r\n");
}

#[test]
fn test_editor_delete_key_is_backspace() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"ab", &mut out);
    feed_all(&mut editor, &[DELETE], &mut out);

    assert_eq!(editor.line().as_str(), "a");
    assert!(out.contains("\x08 \x08"));
}

#[test]
fn test_editor_backspace_on_empty_line_is_silent() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, &[BACKSPACE, DELETE], &mut out);

    assert!(out.is_empty());
    assert_eq!(editor.line().cursor(), 0);
}

#[test]
fn test_editor_ctrl_c_discards_line() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"status gp", &mut out);
    out.clear();
    let outcome = editor.feed(CTRL_C, &mut out);

    assert_eq!(outcome, LineOutcome::Continue);
    assert!(editor.line().is_empty());
    assert_eq!(editor.line().cursor(), 0);
    assert!(editor.history().is_empty());
    assert_eq!(out.as_str(), "^C\r\n> ");
}

#[test]
fn test_editor_ctrl_c_cancels_recall() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"one\ntwo\n", &mut out);
    feed_all(&mut editor, UP, &mut out);
    assert!(editor.history().is_browsing());

    editor.feed(CTRL_C, &mut out);

    assert!(!editor.history().is_browsing());
    assert_eq!(editor.history().browse_index(), editor.history().commit_index());
}

#[test]
fn test_editor_up_with_empty_history_is_noop() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"ab", &mut out);
    out.clear();
    feed_all(&mut editor, UP, &mut out);

    assert!(out.is_empty());
    assert_eq!(editor.line().as_str(), "ab");
    assert_eq!(editor.line().cursor(), 2);
    assert!(!editor.escape().is_active());
}

#[test]
fn test_editor_up_recalls_newest_first() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"echo one\necho two\n", &mut out);
    out.clear();

    feed_all(&mut editor, UP, &mut out);
    assert_eq!(editor.line().as_str(), "echo two");
    assert_eq!(editor.line().cursor(), 8);
    assert_eq!(out.as_str(), "echo two");

    out.clear();
    feed_all(&mut editor, UP, &mut out);
    assert_eq!(editor.line().as_str(), "echo one");
    assert_eq!(out.as_str(), format!("{}echo one", "\x08 \x08".repeat(8)));
}

#[test]
fn test_editor_down_after_up() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"a\nb\nc\n", &mut out);
    feed_all(&mut editor, UP, &mut out);
    feed_all(&mut editor, UP, &mut out);
    assert_eq!(editor.line().as_str(), "b");

    feed_all(&mut editor, DOWN, &mut out);
    assert_eq!(editor.line().as_str(), "c");
    assert_eq!(editor.line().cursor(), 1);
}

#[test]
fn test_editor_recalled_line_submits() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"sysinfo\n", &mut out);
    feed_all(&mut editor, UP, &mut out);
    let outcome = editor.feed(b'\n', &mut out);

    assert_eq!(outcome, LineOutcome::Submitted("sysinfo"));
    assert_eq!(editor.history().count(), 2);
}

#[test]
fn test_editor_cursor_moves() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"ab", &mut out);
    out.clear();

    feed_all(&mut editor, RIGHT, &mut out);
    assert!(out.is_empty()); // already at end

    feed_all(&mut editor, LEFT, &mut out);
    feed_all(&mut editor, LEFT, &mut out);
    feed_all(&mut editor, LEFT, &mut out); // at start, no-op
    assert_eq!(out.as_str(), "\x1b[D\x1b[D");
    assert_eq!(editor.line().cursor(), 0);

    out.clear();
    feed_all(&mut editor, RIGHT, &mut out);
    assert_eq!(out.as_str(), "\x1b[C");
    assert_eq!(editor.line().cursor(), 1);
}

#[test]
fn test_editor_submits_text_before_cursor() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"abc", &mut out);
    feed_all(&mut editor, LEFT, &mut out);
    feed_all(&mut editor, LEFT, &mut out);
    let outcome = editor.feed(b'\n', &mut out);

    assert_eq!(outcome, LineOutcome::Submitted("a"));
}

#[test]
fn test_editor_unknown_escape_swallowed() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"\x1b[Zx", &mut out);

    assert_eq!(out.as_str(), "x");
    assert_eq!(editor.line().as_str(), "x");
    assert!(!editor.escape().is_active());
}

#[test]
fn test_editor_ctrl_c_aborts_escape() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"\x1b[", &mut out);
    assert!(editor.escape().is_active());

    editor.feed(CTRL_C, &mut out);
    assert!(!editor.escape().is_active());

    feed_all(&mut editor, b"A", &mut out);
    assert_eq!(editor.line().as_str(), "A");
}

#[test]
fn test_editor_blank_line() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    let outcome = editor.feed(b'\n', &mut out);

    assert_eq!(outcome, LineOutcome::Blank);
    assert!(editor.history().is_empty());
    assert_eq!(out.as_str(), "\r\n");
}

#[test]
fn test_editor_ignores_control_bytes() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, &[0x00, 0x07, b'\r', b'\t', 0x80, 0xFF], &mut out);

    assert!(out.is_empty());
    assert!(editor.line().is_empty());
}

#[test]
fn test_editor_line_overflow_drops() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    let input = vec![b'q'; MAX_LINE_LEN + 10];
    feed_all(&mut editor, &input, &mut out);

    assert_eq!(editor.line().len(), MAX_LINE_LEN);
    assert_eq!(out.as_str().len(), MAX_LINE_LEN);
}

#[test]
fn test_editor_reset_keeps_history() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"help\npartial", &mut out);
    editor.reset();

    assert!(editor.line().is_empty());
    assert_eq!(editor.history().count(), 1);
}

#[test]
fn test_editor_up_works_after_down_on_fresh_line() {
    let mut editor = LineEditor::new(PROMPT);
    let mut out = TestOutput::new();

    feed_all(&mut editor, b"help\n", &mut out);
    feed_all(&mut editor, DOWN, &mut out);
    assert_eq!(editor.line().as_str(), "");

    feed_all(&mut editor, UP, &mut out);
    feed_all(&mut editor, UP, &mut out);
    feed_all(&mut editor, UP, &mut out);

    assert_eq!(editor.line().as_str(), "help");
    assert_eq!(editor.line().cursor(), 4);
}
