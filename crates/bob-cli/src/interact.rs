//! Line-oriented prompts for the interactive command modes.
//!
//! Readers and writers are passed in so the loops can be driven from tests;
//! commands use [`Console::stdio`].

use std::io::{BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Console::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line without its line ending.
    /// `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }

    /// Ask until a non-blank answer is given. `None` at end of input.
    pub fn ask_required(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        loop {
            match self.ask(prompt)? {
                None => return Ok(None),
                Some(answer) if answer.trim().is_empty() => continue,
                Some(answer) => return Ok(Some(answer.trim().to_string())),
            }
        }
    }

    /// Yes/no question defaulting to no. End of input counts as no.
    pub fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]: "))?;
        Ok(answer.as_deref().is_some_and(is_yes))
    }

    pub fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
