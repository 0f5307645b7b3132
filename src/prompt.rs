//! Line-oriented console prompts.
//!
//! Generic over `BufRead`/`Write` so the orchestration flow can be driven from
//! a script in tests. Invalid answers re-prompt; end of input is an error.

use crate::error::{Error, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Console prompt over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompter on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InvalidInput("unexpected end of input".into()));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer parses as `T` and passes `check`.
    ///
    /// `check` returns the message shown before asking again.
    pub fn ask<T, F>(&mut self, label: &str, check: F) -> Result<T>
    where
        T: FromStr,
        F: Fn(&T) -> std::result::Result<(), String>,
    {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;
            let line = self.read_line()?;
            match line.parse::<T>() {
                Ok(v) => match check(&v) {
                    Ok(()) => return Ok(v),
                    Err(msg) => writeln!(self.output, "{msg}")?,
                },
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
    }

    /// Ask for an integer `>= min`.
    pub fn ask_at_least(&mut self, label: &str, min: u32) -> Result<u32> {
        self.ask(label, |v: &u32| {
            if *v >= min {
                Ok(())
            } else {
                Err(format!("Value must be at least {min}."))
            }
        })
    }

    /// Yes/no question. An empty answer picks `default`.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{question} {hint} ")?;
            self.output.flush()?;
            let line = self.read_line()?.to_ascii_lowercase();
            match line.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Block until the user presses Enter.
    pub fn wait_for_enter(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line().map(|_| ())
    }
}
