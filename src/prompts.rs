//! User interaction prompts and colored output macros
//!
//! ERROR HANDLING STRATEGY FOR DECORATIVE I/O:
//! All termcolor operations use `let _ =` to deliberately ignore errors.
//! Colored output is decorative and non-essential. If stderr/stdout is unavailable
//! (broken pipe, no TTY, etc.), the program continues gracefully without colors.
//!
//! The macros call `Write`/`WriteColor` through fully qualified paths so call
//! sites do not need either trait in scope.

use crate::error::Result;
use std::io::{self, BufRead, Write};

#[doc(hidden)]
#[macro_export]
macro_rules! __colored_line {
    ($writer:ident, $color:expr, $prefix:expr, $($arg:tt)*) => {{
        let bufwtr = termcolor::BufferWriter::$writer(termcolor::ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = termcolor::WriteColor::set_color(
            &mut buffer,
            termcolor::ColorSpec::new().set_fg($color),
        );
        let _ = std::io::Write::write_all(&mut buffer, $prefix.as_bytes());
        let _ = termcolor::WriteColor::reset(&mut buffer);
        let _ = std::io::Write::write_fmt(&mut buffer, format_args!($($arg)*));
        let _ = std::io::Write::write_all(&mut buffer, b"\n");
        let _ = bufwtr.print(&buffer);
    }};
}

/// Macro for printing warnings with yellow color
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__colored_line!(stderr, Some(termcolor::Color::Yellow), "⚠️  ", $($arg)*)
    };
}

/// Macro for printing errors with red color
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__colored_line!(stderr, Some(termcolor::Color::Red), "❌ ", $($arg)*)
    };
}

/// Macro for printing success messages with green color
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__colored_line!(stdout, Some(termcolor::Color::Green), "✓ ", $($arg)*)
    };
}

/// Macro for printing progress messages with cyan color
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__colored_line!(stdout, Some(termcolor::Color::Cyan), "→ ", $($arg)*)
    };
}

/// Prompt user for yes/no answer, looping until valid input
///
/// Features:
/// - Accepts "y", "yes", "n", "no" (case insensitive)
/// - Re-prompts on invalid or empty input
/// - Handles EOF (Ctrl+D) gracefully, treating as "no"
///
/// # Returns
/// * `Ok(true)` - User answered yes
/// * `Ok(false)` - User answered no or EOF detected
/// * `Err(DevCertError)` - IO error occurred
pub fn prompt_yes_no(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    prompt_yes_no_from(question, &mut stdin.lock(), &mut io::stdout())
}

/// Same as [`prompt_yes_no`] but reads and writes the given streams
pub fn prompt_yes_no_from<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    loop {
        write!(output, "{question} (y/n): ")?;
        output.flush()?;

        let mut response = String::new();
        let bytes_read = input.read_line(&mut response)?;

        // EOF (Ctrl+D)
        if bytes_read == 0 {
            writeln!(output, "\nEOF detected, treating as 'no'")?;
            return Ok(false);
        }

        match response.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            "" => {
                crate::warn!("Empty input. Please enter 'y' for yes or 'n' for no.");
            }
            other => {
                crate::warn!("Invalid input: '{other}'. Please enter 'y' or 'n'.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn accepts_yes_after_invalid_input() {
        let mut input = Cursor::new(b"maybe\n\nYES\n".to_vec());
        let mut output = Vec::new();
        assert!(prompt_yes_no_from("Trust?", &mut input, &mut output).unwrap());
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Trust? (y/n): ").count(), 3);
    }

    #[test]
    fn eof_means_no() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert!(!prompt_yes_no_from("Trust?", &mut input, &mut output).unwrap());
    }
}
