//! Integration tests for the escape-sequence backend through the public
//! `Console` contract.

use simple_console::backend::ansi::AnsiConsole;
use simple_console::{Attribute, Color, Console, ConsoleError};

fn capture() -> AnsiConsole<Vec<u8>> {
    AnsiConsole::with_writer(Vec::new())
}

fn emitted(console: AnsiConsole<Vec<u8>>) -> String {
    String::from_utf8(console.into_writer()).unwrap()
}

// ============================================================================
// Scripted Session
// ============================================================================

#[test]
fn full_session_emits_the_expected_byte_stream() {
    let console = capture();
    {
        // Everything reachable through the contract, no downcasts needed.
        let console: &dyn Console = &console;
        console.clear().unwrap();
        console.set_title("status board").unwrap();
        console.show_cursor(false).unwrap();
        console.set_color(Attribute::new(Color::White, Color::DarkRed)).unwrap();
        console.set_cursor(2, 1).unwrap();
        console.clear_line().unwrap();
        console.set_foreground(Color::Yellow).unwrap();
        console.set_background(Color::Black).unwrap();
        console.reset_color().unwrap();
        console.show_cursor(true).unwrap();
    }
    assert_eq!(
        emitted(console),
        concat!(
            "\x1b[2J\x1b[H",          // clear + home
            "\x1b]0;status board\x07", // OSC title
            "\x1b[?25l",               // hide cursor
            "\x1b[97;41m",             // white on dark red
            "\x1b[2;3H",               // (x=2, y=1) one-based
            "\x1b[K",                  // clear to end of line
            "\x1b[93m",                // bright yellow foreground
            "\x1b[40m",                // black background
            "\x1b[0m",                 // reset
            "\x1b[?25h",               // show cursor
        )
    );
}

// ============================================================================
// Shadow-State Consistency
// ============================================================================

#[test]
fn queries_reflect_the_last_set_calls() {
    let console = capture();
    console.set_cursor(33, 11).unwrap();
    console.set_foreground(Color::Cyan).unwrap();
    console.show_cursor(false).unwrap();

    assert_eq!(console.cursor_x().unwrap(), 33);
    assert_eq!(console.cursor_y().unwrap(), 11);
    assert_eq!(console.foreground(), Color::Cyan);
    assert!(!console.is_cursor_visible());

    // clear() resets only the cursor fields, not colors or visibility.
    console.clear().unwrap();
    assert_eq!(console.cursor_x().unwrap(), 0);
    assert_eq!(console.cursor_y().unwrap(), 0);
    assert_eq!(console.foreground(), Color::Cyan);
    assert!(!console.is_cursor_visible());
}

#[test]
fn consoles_do_not_share_state() {
    let first = capture();
    let second = capture();
    first.set_foreground(Color::Red).unwrap();
    assert_eq!(second.foreground(), Color::Gray);
}

// ============================================================================
// Palette Boundary
// ============================================================================

#[test]
fn rejected_indices_never_touch_the_console() {
    let console = capture();
    let err = Color::from_index(99).unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidColor(99)));

    // Nothing was emitted and state is untouched.
    assert_eq!(console.foreground(), Color::Gray);
    assert_eq!(console.background(), Color::Black);
    assert!(emitted(console).is_empty());
}

// ============================================================================
// Interactivity
// ============================================================================

#[test]
fn writer_bound_console_reports_no_real_console() {
    let console = capture();
    assert!(!console.has_real_console());
    // Still fully functional as an escape stream.
    console.set_foreground(Color::Green).unwrap();
    assert_eq!(emitted(console), "\x1b[92m");
}
