//! Line-based prompts over any reader and writer

use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Reads answers from `input`, writing prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a line
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Ask once; `None` at end of input
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask once and parse. `Ok(Some(Err(_)))` means the answer did not parse.
    pub fn ask_parsed<T: FromStr>(&mut self, prompt: &str) -> io::Result<Option<Result<T, T::Err>>> {
        Ok(self.ask(prompt)?.map(|answer| answer.parse()))
    }

    /// Ask until `accept` returns a value; `None` at end of input
    pub fn ask_until<T>(
        &mut self,
        prompt: &str,
        retry: &str,
        mut accept: impl FnMut(&str) -> Option<T>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            if let Some(value) = accept(&answer) {
                return Ok(Some(value));
            }
            self.say(retry)?;
        }
    }

    /// `y`/`yes` is true; anything else, including end of input, is false
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(self
            .ask(prompt)?
            .is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}

/// Positive finite number
pub fn positive_amount(answer: &str) -> Option<f64> {
    answer
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Positive whole number
pub fn positive_count(answer: &str) -> Option<u32> {
    answer.parse::<u32>().ok().filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_trims_and_reports_eof() {
        let mut p = prompter("  ana \n");
        assert_eq!(p.ask("Name: ").unwrap().as_deref(), Some("ana"));
        assert_eq!(p.ask("Name: ").unwrap(), None);
        assert_eq!(String::from_utf8(p.output).unwrap(), "Name: Name: ");
    }

    #[test]
    fn test_ask_until_reprompts() {
        let mut p = prompter("zero\n-3\n4\n");
        let count = p.ask_until("Spins: ", "Invalid input.", positive_count).unwrap();
        assert_eq!(count, Some(4));
        let out = String::from_utf8(p.output).unwrap();
        assert_eq!(out.matches("Invalid input.").count(), 2);
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("Y\nno\n");
        assert!(p.confirm("? ").unwrap());
        assert!(!p.confirm("? ").unwrap());
        assert!(!p.confirm("? ").unwrap());
    }

    #[test]
    fn test_amount_validation() {
        assert_eq!(positive_amount("12.5"), Some(12.5));
        assert_eq!(positive_amount("0"), None);
        assert_eq!(positive_amount("nan"), None);
        assert_eq!(positive_amount("ten"), None);
    }
}
