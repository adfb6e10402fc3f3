//! `//` and `/* */` comments in JSON input.
//!
//! Comments are blanked out rather than removed: every character of a comment
//! becomes a space and line breaks are kept, so line and column numbers
//! reported on the stripped text still point into the original input.

use std::borrow::Cow;

/// Start of a `/*` comment with no closing `*/`, as 0-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnterminatedComment {
    pub line: usize,
    pub col: usize,
}

#[derive(Clone, Copy)]
enum State {
    Code,
    Str,
    Escape,
    Line,
    Block { line: usize, col: usize },
}

pub(crate) fn strip_comments(input: &str) -> Result<Cow<'_, str>, UnterminatedComment> {
    if !input.contains('/') {
        return Ok(Cow::Borrowed(input));
    }

    let mut out = String::with_capacity(input.len());
    let mut state = State::Code;
    let (mut line, mut col) = (0, 0);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let (start_line, start_col) = (line, col);
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }

        state = match state {
            State::Code => match (c, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    col += 1;
                    out.push_str("  ");
                    State::Line
                }
                ('/', Some('*')) => {
                    chars.next();
                    col += 1;
                    out.push_str("  ");
                    State::Block {
                        line: start_line,
                        col: start_col,
                    }
                }
                ('"', _) => {
                    out.push(c);
                    State::Str
                }
                _ => {
                    out.push(c);
                    State::Code
                }
            },
            State::Str => {
                out.push(c);
                match c {
                    '\\' => State::Escape,
                    '"' => State::Code,
                    _ => State::Str,
                }
            }
            State::Escape => {
                out.push(c);
                State::Str
            }
            State::Line if c == '\n' => {
                out.push('\n');
                State::Code
            }
            State::Line => {
                out.push(' ');
                State::Line
            }
            State::Block { .. } if c == '*' && chars.peek() == Some(&'/') => {
                chars.next();
                col += 1;
                out.push_str("  ");
                State::Code
            }
            State::Block { .. } if c == '\n' => {
                out.push('\n');
                state
            }
            State::Block { .. } => {
                out.push(' ');
                state
            }
        };
    }

    match state {
        State::Block { line, col } => Err(UnterminatedComment { line, col }),
        _ => Ok(Cow::Owned(out)),
    }
}
