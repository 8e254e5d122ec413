//! Console prompts
//!
//! Generic over the reader/writer so prompting can be driven from tests.

use std::io::{BufRead, Write};

use crate::core::{GoldError, GoldResult};

/// Startup banner
pub fn banner() -> String {
    let rule = "=".repeat(40);
    format!(
        "Gold Options Volume Chart\nData source: CME Group (COMEX gold options, product 192)\n{}",
        rule
    )
}

/// Print `prompt` and read one line; end of input is an error
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> GoldResult<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(GoldError::invalid_input("input ended before a value was entered"));
    }
    Ok(line.trim().to_string())
}

/// Ask until the answer parses as a finite number
pub fn prompt_float<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> GoldResult<f64> {
    loop {
        let answer = prompt_line(input, output, prompt)?;
        match answer.parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(value),
            _ => writeln!(output, "Invalid input, please enter a number")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_float_reasks() {
        let mut input = Cursor::new("abc\n\n3300.5\n");
        let mut output = Vec::new();

        let value = prompt_float(&mut input, &mut output, "Low strike: ").unwrap();
        assert_eq!(value, 3300.5);

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Low strike: ").count(), 3);
        assert_eq!(shown.matches("Invalid input").count(), 2);
    }

    #[test]
    fn test_prompt_float_rejects_non_finite() {
        let mut input = Cursor::new("inf\nNaN\n-12\n");
        let mut output = Vec::new();
        assert_eq!(prompt_float(&mut input, &mut output, "> ").unwrap(), -12.0);
    }

    #[test]
    fn test_end_of_input() {
        let mut input = Cursor::new("oops\n");
        let mut output = Vec::new();
        assert!(matches!(
            prompt_float(&mut input, &mut output, "> "),
            Err(GoldError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_prompt_line_trims() {
        let mut input = Cursor::new("  202508 \r\n");
        let mut output = Vec::new();
        assert_eq!(prompt_line(&mut input, &mut output, "> ").unwrap(), "202508");
    }
}
