//! User interaction operations (line prompts).

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
/// Returns `None` on end of input so callers can stop asking.
pub fn prompt_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    write!(output, "{}: ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

impl RealRuntime {
    pub(crate) fn prompt_impl(&self, prompt: &str) -> Result<Option<String>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        prompt_with_io(prompt, &mut stdin_lock, &mut stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::prompt_with_io;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn reads_one_line_without_newline() -> Result<()> {
        let cases = [("v1.0.0\n", "v1.0.0"), ("v1.0.0\r\n", "v1.0.0"), ("last", "last")];
        for (raw, expected) in cases {
            let mut input = Cursor::new(raw.as_bytes());
            let mut output = Vec::new();
            let line = prompt_with_io("Enter tag", &mut input, &mut output)?;
            assert_eq!(line.as_deref(), Some(expected));
        }
        Ok(())
    }

    #[test]
    fn keeps_inner_whitespace() -> Result<()> {
        let mut input = Cursor::new(b"  Release 1.0 build  \n");
        let mut output = Vec::new();
        let line = prompt_with_io("Enter release name", &mut input, &mut output)?;
        assert_eq!(line.as_deref(), Some("  Release 1.0 build  "));
        Ok(())
    }

    #[test]
    fn eof_returns_none() -> Result<()> {
        let mut input = Cursor::new(b"");
        let mut output = Vec::new();
        assert_eq!(prompt_with_io("Anything", &mut input, &mut output)?, None);
        Ok(())
    }

    #[test]
    fn consecutive_prompts_consume_successive_lines() -> Result<()> {
        let mut input = Cursor::new(b"first\nsecond\n");
        let mut output = Vec::new();
        assert_eq!(
            prompt_with_io("A", &mut input, &mut output)?.as_deref(),
            Some("first")
        );
        assert_eq!(
            prompt_with_io("B", &mut input, &mut output)?.as_deref(),
            Some("second")
        );
        assert_eq!(String::from_utf8(output)?, "A: B: ");
        Ok(())
    }
}
