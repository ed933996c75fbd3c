//! Output helpers for the CLI
//!
//! Status lines for the operator outside the chat window: usage text, the
//! handshake progress notices, and fatal errors.

use std::io::Write;

/// One-line usage summary
pub const USAGE: &str = "usage: mytalk [ -v ] [ -a ] [ -N ] [ hostname ] port";

/// Print the usage line to stdout, preceded by `reason` if given
pub fn print_usage(reason: Option<&str>) {
    let mut stdout = std::io::stdout();
    if let Some(reason) = reason {
        let _ = writeln!(stdout, "{}", reason);
    }
    let _ = writeln!(stdout, "{}", USAGE);
    let _ = stdout.flush();
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr with red coloring for error feedback to the user.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan with an info symbol prefix
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a plain line to stdout with no decoration
pub fn print_notice(msg: &str) {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "{}", msg);
    let _ = stdout.flush();
}

/// Print a question without a newline and flush, so the answer goes on the
/// same line
pub fn print_question(msg: &str) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "{}", msg);
    let _ = stdout.flush();
}
