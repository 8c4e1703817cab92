//! Write confirmation.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Decides whether tags for a file may be written.
pub trait ConsentGate {
    fn confirm(&mut self, path: &Path) -> Result<bool>;
}

/// Always says yes (auto-accept mode)
pub struct AutoAccept;

impl ConsentGate for AutoAccept {
    fn confirm(&mut self, _path: &Path) -> Result<bool> {
        Ok(true)
    }
}

const PROMPT: &str = "Do you want to overwrite the tags for this file?";

/// Asks on the terminal; anything but an explicit yes declines.
///
/// When stdin is not a terminal (piped answers), one line is read per file
/// instead of an interactive prompt.
pub struct TerminalPrompt;

impl ConsentGate for TerminalPrompt {
    fn confirm(&mut self, _path: &Path) -> Result<bool> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return dialoguer::Confirm::new()
                .with_prompt(PROMPT)
                .default(false)
                .interact()
                .map_err(|e| Error::Prompt(e.to_string()));
        }

        print!("{PROMPT} [y/N] ");
        std::io::stdout()
            .flush()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        let answer = read_answer(&mut stdin.lock())?;
        println!();
        Ok(answer)
    }
}

/// Read one answer line; `y`/`yes` in any case accepts, anything else or EOF declines.
fn read_answer<R: BufRead>(reader: &mut R) -> Result<bool> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| Error::Prompt(e.to_string()))?;
    if read == 0 {
        return Ok(false);
    }

    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_auto_accept_always_confirms() {
        let mut gate = AutoAccept;
        assert!(gate.confirm(Path::new("a.mp3")).unwrap());
        assert!(gate.confirm(Path::new("b.mp3")).unwrap());
    }

    #[test]
    fn test_piped_answers() {
        let answer = |input: &str| read_answer(&mut Cursor::new(input.as_bytes())).unwrap();

        assert!(answer("y\n"));
        assert!(answer("YES\n"));
        assert!(answer("  Yes  \r\n"));
        assert!(answer("y"));
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
        assert!(!answer("yep\n"));
        assert!(!answer(""));
    }

    #[test]
    fn test_one_line_per_answer() {
        let mut input = Cursor::new("yes\nno\ny\n".as_bytes());
        assert!(read_answer(&mut input).unwrap());
        assert!(!read_answer(&mut input).unwrap());
        assert!(read_answer(&mut input).unwrap());
        assert!(!read_answer(&mut input).unwrap());
    }
}
