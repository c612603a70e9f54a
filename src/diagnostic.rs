use owo_colors::OwoColorize;

use crate::{error::Error, interpreter::lexer::Position};

/// Renders an error for a terminal.
///
/// The first line names the failing phase and carries the message. When the
/// error has a position, the offending source line follows with a caret
/// underline spanning the token:
///
/// ```text
/// semantic error: Error on line 2, column 11: ...
///   --> 2:11
///    |
///  2 |     x = x + true;
///    |           ^
/// ```
///
/// # Parameters
/// - `source`: The program text the error was found in.
/// - `error`: The error.
/// - `color`: Whether to emit ANSI colors.
///
/// # Example
/// ```
/// use fwap::{diagnostic::render, parse};
///
/// let source = "func Main() { x = 1; ";
/// let error = parse(source).unwrap_err();
/// let text = render(source, &error, false);
/// assert!(text.starts_with("parse error: "));
/// ```
#[must_use]
pub fn render(source: &str, error: &Error, color: bool) -> String {
    let heading = error.phase();
    let mut out = if color {
        format!("{}: {}\n", heading.red().bold(), error.bold())
    } else {
        format!("{heading}: {error}\n")
    };

    if let Some(position) = error.position() {
        render_snippet(&mut out, source, position, color);
    }
    out
}

fn render_snippet(out: &mut String, source: &str, position: Position, color: bool) {
    let Some(line) = source.lines().nth(position.line.saturating_sub(1)) else {
        return;
    };
    let number = position.line.to_string();
    let gutter = " ".repeat(number.len() + 1);
    let blue = |s: &str| if color { s.blue().to_string() } else { s.to_string() };

    out.push_str(&format!("{}{} {}:{}\n",
                          " ".repeat(number.len()),
                          blue("-->"),
                          position.line,
                          position.column));
    out.push_str(&format!("{gutter}{}\n", blue("|")));
    out.push_str(&format!(" {} {} {line}\n", blue(&number), blue("|")));

    let width = underline_width(line, position);
    let carets = "^".repeat(width);
    let carets = if color { carets.red().bold().to_string() } else { carets };
    out.push_str(&format!("{gutter}{} {}{carets}\n",
                          blue("|"),
                          " ".repeat(position.column.saturating_sub(1))));
}

/// The number of characters to underline: the token, clipped to the end of
/// its line, and at least one.
fn underline_width(line: &str, position: Position) -> usize {
    let start = position.column.saturating_sub(1);
    let rest = line.chars().skip(start).count();
    let token = source_chars(line, start, position.length);
    token.min(rest).max(1)
}

/// Counts the characters covered by `bytes` bytes starting at character
/// `start` of `line`.
fn source_chars(line: &str, start: usize, bytes: usize) -> usize {
    let mut taken = 0;
    let mut count = 0;
    for c in line.chars().skip(start) {
        if taken >= bytes {
            break;
        }
        taken += c.len_utf8();
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::check_source;

    #[test]
    fn underlines_the_offending_token() {
        let source = "func Main() {\n    var x int = 1;\n    x = x + true;\n}\n";
        let error = check_source(source).unwrap_err();
        let text = render(source, &error, false);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("semantic error: Error on line 3, column 11"));
        assert_eq!(lines[3], " 3 |     x = x + true;");
        assert_eq!(lines[4], "   |           ^");
    }

    #[test]
    fn errors_without_source_line_render_message_only() {
        let error = crate::parse("func Main() {").unwrap_err();
        let text = render("", &error, false);
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn errors_without_position_render_message_only() {
        let error = Error::from(std::io::Error::other("no threads left"));
        let text = render("func Main() { }", &error, false);
        assert_eq!(text, "i/o error: Cannot start the interpreter: no threads left\n");
    }
}
